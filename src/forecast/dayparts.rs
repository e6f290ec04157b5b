//! Daypart table and calendar-day classification
//!
//! A day is divided into six fixed segments. The late-evening segment
//! crosses midnight; its post-midnight hours are attributed to the previous
//! calendar day so that "tonight" stays one user-facing block.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Timelike, Utc};

/// One named segment of the 24-hour day.
///
/// `end_hour` is exclusive. A segment with `start_hour > end_hour` wraps
/// around midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Daypart {
    /// Display name, also used as the `period` key in the output
    pub name: &'static str,
    /// First hour of the segment (inclusive, 0-23)
    pub start_hour: u32,
    /// End hour of the segment (exclusive, 0-23)
    pub end_hour: u32,
}

/// The six dayparts. Together they partition all 24 hours; exactly one
/// entry wraps around midnight.
pub const DAYPARTS: [Daypart; 6] = [
    Daypart { name: "Früh", start_hour: 6, end_hour: 10 },
    Daypart { name: "Mittag", start_hour: 10, end_hour: 14 },
    Daypart { name: "Nachmittag", start_hour: 14, end_hour: 18 },
    Daypart { name: "Abend", start_hour: 18, end_hour: 22 },
    Daypart { name: "Spät Abends", start_hour: 22, end_hour: 2 },
    Daypart { name: "Nacht", start_hour: 2, end_hour: 6 },
];

/// Canonical emission order of dayparts within a day, from night to late
/// evening. Identical for every day.
pub const DAYPART_ORDER: [&str; 6] = [
    "Nacht",
    "Früh",
    "Mittag",
    "Nachmittag",
    "Abend",
    "Spät Abends",
];

impl Daypart {
    /// Whether this segment crosses midnight.
    pub fn wraps(&self) -> bool {
        self.start_hour > self.end_hour
    }

    /// Whether the given local hour falls into this segment.
    pub fn contains(&self, hour: u32) -> bool {
        if self.wraps() {
            hour >= self.start_hour || hour < self.end_hour
        } else {
            self.start_hour <= hour && hour < self.end_hour
        }
    }
}

/// Result of classifying one hourly timestamp against the daypart table.
#[derive(Debug, Clone, Copy)]
pub struct Classification {
    /// Whether the hour lies at or after the anchor and takes part in
    /// bucketing
    pub included: bool,
    /// Calendar day the hour's bucket belongs to
    pub day: NaiveDate,
    /// Matched daypart
    pub daypart: &'static Daypart,
}

/// Assigns a forecast hour to its (calendar day, daypart) bucket.
///
/// The hour is taken from the timestamp's own offset. For the wrapping
/// daypart, hours before its end hour belong to the *previous* day's
/// bucket: weather after midnight groups with the evening it started in.
///
/// Hours strictly before `now` are marked excluded; they stay out of every
/// bucket but remain part of the raw output series.
pub fn classify(timestamp: DateTime<FixedOffset>, now: DateTime<Utc>) -> Classification {
    let included = timestamp.with_timezone(&Utc) >= now;
    let hour = timestamp.hour();

    let daypart = DAYPARTS
        .iter()
        .find(|daypart| daypart.contains(hour))
        // The table partitions 0-24; a fall-through is a table bug,
        // not bad input.
        .unwrap_or_else(|| panic!("daypart table does not cover hour {hour}"));

    let mut day = timestamp.date_naive();
    if daypart.wraps() && hour < daypart.end_hour {
        day = day - Days::new(1);
    }

    Classification {
        included,
        day,
        daypart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        at(s).with_timezone(&Utc)
    }

    #[test]
    fn test_table_partitions_every_hour_exactly_once() {
        for hour in 0..24 {
            let matches = DAYPARTS.iter().filter(|p| p.contains(hour)).count();
            assert_eq!(matches, 1, "hour {} matched {} dayparts", hour, matches);
        }
    }

    #[test]
    fn test_exactly_one_daypart_wraps() {
        let wrapping: Vec<_> = DAYPARTS.iter().filter(|p| p.wraps()).collect();
        assert_eq!(wrapping.len(), 1);
        assert_eq!(wrapping[0].name, "Spät Abends");
    }

    #[test]
    fn test_order_covers_all_dayparts() {
        for daypart in &DAYPARTS {
            assert!(DAYPART_ORDER.contains(&daypart.name));
        }
        assert_eq!(DAYPART_ORDER.len(), DAYPARTS.len());
    }

    #[test]
    fn test_daytime_hour_keeps_its_date() {
        let c = classify(at("2025-08-06T15:00:00+00:00"), utc("2025-08-06T00:00:00+00:00"));
        assert!(c.included);
        assert_eq!(c.daypart.name, "Nachmittag");
        assert_eq!(c.day, NaiveDate::from_ymd_opt(2025, 8, 6).unwrap());
    }

    #[test]
    fn test_wraparound_hour_belongs_to_previous_day() {
        // 01:00 is in the tail of the 22-2 segment and groups with the
        // evening of the day before
        let c = classify(at("2025-08-06T01:00:00+00:00"), utc("2025-08-05T00:00:00+00:00"));
        assert!(c.included);
        assert_eq!(c.daypart.name, "Spät Abends");
        assert_eq!(c.day, NaiveDate::from_ymd_opt(2025, 8, 5).unwrap());
    }

    #[test]
    fn test_wraparound_head_keeps_its_date() {
        // 23:00 is before midnight and stays on its own day
        let c = classify(at("2025-08-06T23:00:00+00:00"), utc("2025-08-05T00:00:00+00:00"));
        assert_eq!(c.daypart.name, "Spät Abends");
        assert_eq!(c.day, NaiveDate::from_ymd_opt(2025, 8, 6).unwrap());
    }

    #[test]
    fn test_past_hour_is_excluded() {
        let c = classify(at("2025-08-06T13:00:00+00:00"), utc("2025-08-06T14:00:00+00:00"));
        assert!(!c.included);
    }

    #[test]
    fn test_anchor_hour_itself_is_included() {
        let c = classify(at("2025-08-06T14:00:00+00:00"), utc("2025-08-06T14:00:00+00:00"));
        assert!(c.included);
    }

    #[test]
    fn test_hour_is_taken_from_the_timestamp_offset() {
        // 22:00+02:00 is 20:00 UTC but classifies by its local hour
        let c = classify(at("2025-08-06T22:00:00+02:00"), utc("2025-08-06T00:00:00+00:00"));
        assert_eq!(c.daypart.name, "Spät Abends");
    }

    #[test]
    fn test_segment_boundaries() {
        let cases = [
            (2, "Nacht"),
            (5, "Nacht"),
            (6, "Früh"),
            (9, "Früh"),
            (10, "Mittag"),
            (14, "Nachmittag"),
            (18, "Abend"),
            (21, "Abend"),
            (22, "Spät Abends"),
            (0, "Spät Abends"),
            (1, "Spät Abends"),
        ];
        for (hour, expected) in cases {
            let ts = at(&format!("2025-08-06T{hour:02}:00:00+00:00"));
            let c = classify(ts, utc("2025-08-01T00:00:00+00:00"));
            assert_eq!(c.daypart.name, expected, "hour {}", hour);
        }
    }
}
