//! Significant-weather code presentation and cloud-cover refinement
//!
//! Maps MOSMIX `ww` codes to display labels and icon URLs. Codes 0-3 only
//! describe cloudiness; for them the representative code of a bucket is
//! recomputed from the mean effective cloud cover.

/// Label and icon for one significant-weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionInfo {
    /// German display label
    pub label: &'static str,
    /// Icon URL for the rendering consumer
    pub icon: &'static str,
}

#[allow(dead_code)]
const ICON_BASE: &str = "https://raw.githubusercontent.com/stefan436/weather_image/main/docs/icons";

macro_rules! icon {
    ($file:expr) => {
        concat!(
            "https://raw.githubusercontent.com/stefan436/weather_image/main/docs/icons/",
            $file
        )
    };
}

/// Looks up label and icon for a `ww` code.
///
/// Unknown codes map to a placeholder entry, never to an error: the coding
/// scheme grows and the summary must not fail on a new phenomenon.
pub fn condition_info(code: u16) -> ConditionInfo {
    match code {
        // Thunderstorm
        95 => ConditionInfo { label: "Gewitter mit Regen/Schnee", icon: icon!("thunderstorm.png") },

        // Freezing drizzle / freezing rain
        57 => ConditionInfo { label: "Starker gefrierender Sprühregen", icon: icon!("heavy freeting rain.png") },
        56 => ConditionInfo { label: "Leichter gefrierender Sprühregen", icon: icon!("light freezing rain.png") },
        67 => ConditionInfo { label: "Starker gefrierender Regen", icon: icon!("heavy freeting rain.png") },
        66 => ConditionInfo { label: "Leichter gefrierender Regen", icon: icon!("light freezing rain.png") },

        // Snow and snow showers
        86 => ConditionInfo { label: "Starker Schneeschauer", icon: icon!("heavy snow.png") },
        85 => ConditionInfo { label: "Leichter Schneeschauer", icon: icon!("light snow.png") },
        84 => ConditionInfo { label: "Starker Schneeregenschauer", icon: icon!("heavy sleet.png") },
        83 => ConditionInfo { label: "Leichter Schneeregenschauer", icon: icon!("light sleet.png") },
        75 => ConditionInfo { label: "Starker Schneefall", icon: icon!("heavy snow.png") },
        73 => ConditionInfo { label: "Mäßiger Schneefall", icon: icon!("moderate snow.png") },
        71 => ConditionInfo { label: "Leichter Schneefall", icon: icon!("light snow.png") },
        69 => ConditionInfo { label: "Starker Schneeregen", icon: icon!("heavy sleet.png") },
        68 => ConditionInfo { label: "Leichter Schneeregen", icon: icon!("light sleet.png") },

        // Rain and showers
        82 => ConditionInfo { label: "Heftiger Regenschauer", icon: icon!("heavy rain.png") },
        81 => ConditionInfo { label: "Starker Regenschauer", icon: icon!("moderate rain.png") },
        80 => ConditionInfo { label: "Leichter Regenschauer", icon: icon!("light rain.png") },
        65 => ConditionInfo { label: "Starker Regen", icon: icon!("heavy rain.png") },
        63 => ConditionInfo { label: "Mäßiger Regen", icon: icon!("moderate rain.png") },
        61 => ConditionInfo { label: "Leichter Regen", icon: icon!("light rain.png") },

        // Drizzle
        55 => ConditionInfo { label: "Starker Sprühregen", icon: icon!("heavy rain.png") },
        53 => ConditionInfo { label: "Mäßiger Sprühregen", icon: icon!("moderate rain.png") },
        51 => ConditionInfo { label: "Leichter Sprühregen", icon: icon!("light rain.png") },

        // Fog
        49 => ConditionInfo { label: "Nebel mit Reif", icon: icon!("fog.png") },
        45 => ConditionInfo { label: "Nebel", icon: icon!("fog.png") },

        // Cloud cover
        3 => ConditionInfo { label: "Bewölkung zunehmend", icon: icon!("total cloud cover.png") },
        2 => ConditionInfo { label: "Bewölkung unverändert", icon: icon!("medium cloud cover.png") },
        1 => ConditionInfo { label: "Bewölkung abnehmend", icon: icon!("low cloud cover.png") },
        0 => ConditionInfo { label: "Klarer Himmel", icon: icon!("clear-day-night.png") },

        _ => ConditionInfo { label: "unbekannt", icon: "URL/unknown.png" },
    }
}

/// Whether a code belongs to the cloud-only family (0-3).
pub fn is_cloud_code(code: u16) -> bool {
    code <= 3
}

/// Refines a cloud-family dominant code from the bucket's mean effective
/// cloud cover (percent).
///
/// Only fires for codes 0-3; a precipitation, fog or storm code passes
/// through untouched, as does a cloud code when no cloud-cover values were
/// reported.
pub fn refine_cloud_code(code: u16, mean_cloud_cover: Option<f64>) -> u16 {
    if !is_cloud_code(code) {
        return code;
    }
    match mean_cloud_cover {
        Some(cover) if cover <= 20.0 => 0,
        Some(cover) if cover <= 50.0 => 1,
        Some(cover) if cover <= 80.0 => 2,
        Some(_) => 3,
        None => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_have_labels() {
        assert_eq!(condition_info(95).label, "Gewitter mit Regen/Schnee");
        assert_eq!(condition_info(61).label, "Leichter Regen");
        assert_eq!(condition_info(45).label, "Nebel");
        assert_eq!(condition_info(0).label, "Klarer Himmel");
    }

    #[test]
    fn test_icon_urls_point_at_icon_directory() {
        assert!(condition_info(95).icon.starts_with(ICON_BASE));
        assert!(condition_info(95).icon.ends_with("thunderstorm.png"));
        assert!(condition_info(71).icon.ends_with("light snow.png"));
    }

    #[test]
    fn test_unknown_code_maps_to_fallback() {
        let info = condition_info(42);
        assert_eq!(info.label, "unbekannt");
        assert_eq!(info.icon, "URL/unknown.png");

        let info = condition_info(999);
        assert_eq!(info.label, "unbekannt");
    }

    #[test]
    fn test_cloud_family_detection() {
        for code in 0..=3 {
            assert!(is_cloud_code(code));
        }
        assert!(!is_cloud_code(45));
        assert!(!is_cloud_code(61));
        assert!(!is_cloud_code(95));
    }

    #[test]
    fn test_refinement_thresholds() {
        assert_eq!(refine_cloud_code(2, Some(10.0)), 0);
        assert_eq!(refine_cloud_code(2, Some(20.0)), 0);
        assert_eq!(refine_cloud_code(0, Some(35.0)), 1);
        assert_eq!(refine_cloud_code(0, Some(50.0)), 1);
        assert_eq!(refine_cloud_code(1, Some(80.0)), 2);
        assert_eq!(refine_cloud_code(2, Some(85.0)), 3);
        assert_eq!(refine_cloud_code(3, Some(100.0)), 3);
    }

    #[test]
    fn test_refinement_keeps_code_without_cloud_values() {
        assert_eq!(refine_cloud_code(2, None), 2);
        assert_eq!(refine_cloud_code(0, None), 0);
    }

    #[test]
    fn test_refinement_never_touches_other_families() {
        assert_eq!(refine_cloud_code(61, Some(85.0)), 61);
        assert_eq!(refine_cloud_code(95, Some(0.0)), 95);
        assert_eq!(refine_cloud_code(45, Some(100.0)), 45);
    }
}
