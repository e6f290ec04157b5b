//! DWD MOSMIX point-forecast producer
//!
//! This module fetches a station's MOSMIX-L KMZ archive from DWD Open Data
//! (or reads it from a local file), extracts the contained KML document, and
//! decodes it into a [`RawForecast`] of timestamps and raw parameter tokens.

use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::RawForecast;

/// Base URL for MOSMIX-L single-station forecasts on DWD Open Data
const MOSMIX_BASE_URL: &str =
    "https://opendata.dwd.de/weather/local_forecasts/mos/MOSMIX_L/single_stations";

/// Errors that can occur while obtaining or decoding a forecast run
#[derive(Debug, Error)]
pub enum MosmixError {
    /// HTTP request failed or returned a non-success status
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The KMZ container could not be read
    #[error("failed to read KMZ archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The KMZ container holds no KML document
    #[error("KMZ archive contains no KML document")]
    MissingKml,

    /// The KML document is not well-formed
    #[error("failed to parse KML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A local input file could not be read
    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),
}

/// Client for fetching MOSMIX forecast runs from DWD Open Data
#[derive(Debug, Clone, Default)]
pub struct MosmixClient {
    client: Client,
}

impl MosmixClient {
    /// Create a new client with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a new client reusing an existing HTTP client
    #[allow(dead_code)]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Returns the download URL for a station's latest MOSMIX-L run
    pub fn station_url(station: &str) -> String {
        format!("{MOSMIX_BASE_URL}/{station}/kml/MOSMIX_L_LATEST_{station}.kmz")
    }

    /// Fetch and decode the latest forecast run for the given station
    ///
    /// # Arguments
    /// * `station` - DWD station identifier (e.g. "P755" or "10865")
    ///
    /// # Returns
    /// * `Ok(RawForecast)` - decoded timestamps and parameter tokens
    /// * `Err(MosmixError)` - if the download or decoding fails
    pub async fn fetch_forecast(&self, station: &str) -> Result<RawForecast, MosmixError> {
        let url = Self::station_url(station);
        debug!(%url, "fetching MOSMIX run");

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        let kml = read_kmz(&bytes)?;
        parse_kml(&kml)
    }
}

/// Reads a forecast run from a local `.kmz` or `.kml` file.
///
/// The container format is sniffed from the file content, not the
/// extension: zip archives start with `PK`.
pub fn load_file(path: &Path) -> Result<RawForecast, MosmixError> {
    let bytes = std::fs::read(path)?;
    let kml = if bytes.starts_with(b"PK") {
        read_kmz(&bytes)?
    } else {
        String::from_utf8_lossy(&bytes).into_owned()
    };
    parse_kml(&kml)
}

/// Extracts the first KML document from a KMZ (zip) archive.
pub fn read_kmz(bytes: &[u8]) -> Result<String, MosmixError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let name = archive
        .file_names()
        .find(|name| name.ends_with(".kml"))
        .map(String::from)
        .ok_or(MosmixError::MissingKml)?;

    let mut kml = String::new();
    archive.by_name(&name)?.read_to_string(&mut kml)?;
    Ok(kml)
}

/// Parses a MOSMIX KML document into a [`RawForecast`].
///
/// Extracts the `dwd:ForecastTimeSteps` list, the station name and
/// description from the placemark, and every `dwd:Forecast` element's
/// whitespace-separated value run. Namespace prefixes are ignored; elements
/// are matched by local name.
pub fn parse_kml(xml: &str) -> Result<RawForecast, MosmixError> {
    let mut reader = Reader::from_str(xml);

    let mut raw = RawForecast::default();

    let mut in_placemark = false;
    let mut text_target: Option<TextTarget> = None;
    let mut text_buf = String::new();
    // Currently open dwd:Forecast element and its collected value runs
    let mut current_parameter: Option<String> = None;
    let mut value_runs: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"Placemark" => in_placemark = true,
                b"TimeStep" => {
                    text_buf.clear();
                    text_target = Some(TextTarget::TimeStep);
                }
                b"name" if in_placemark && raw.station_name.is_empty() => {
                    text_buf.clear();
                    text_target = Some(TextTarget::Name);
                }
                b"description" if in_placemark && raw.station_description.is_empty() => {
                    text_buf.clear();
                    text_target = Some(TextTarget::Description);
                }
                b"Forecast" => {
                    current_parameter = element_name_attribute(&e)?;
                    value_runs.clear();
                }
                b"value" if current_parameter.is_some() => {
                    text_buf.clear();
                    text_target = Some(TextTarget::Value);
                }
                _ => {}
            },
            Event::Text(t) => {
                if text_target.is_some() {
                    text_buf.push_str(&t.unescape()?);
                }
            }
            Event::CData(t) => {
                if text_target.is_some() {
                    text_buf.push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"Placemark" => in_placemark = false,
                b"TimeStep" => {
                    if let Some(TextTarget::TimeStep) = text_target.take() {
                        raw.time_steps.push(text_buf.trim().to_string());
                    }
                }
                b"name" => {
                    if let Some(TextTarget::Name) = text_target.take() {
                        raw.station_name = text_buf.trim().to_string();
                    }
                }
                b"description" => {
                    if let Some(TextTarget::Description) = text_target.take() {
                        raw.station_description = text_buf.trim().to_string();
                    }
                }
                b"value" => {
                    if let Some(TextTarget::Value) = text_target.take() {
                        value_runs.push(text_buf.trim().to_string());
                    }
                }
                b"Forecast" => {
                    if let Some(parameter) = current_parameter.take() {
                        raw.parameters.insert(parameter, split_value_runs(&value_runs));
                    }
                }
                _ => {
                    // Closing tag of an element whose text we were not
                    // collecting inside; drop any stale target.
                    text_target = None;
                }
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(raw)
}

/// Which element's character data is currently being collected
enum TextTarget {
    TimeStep,
    Name,
    Description,
    Value,
}

/// Reads the `elementName` attribute of a `dwd:Forecast` element,
/// regardless of namespace prefix.
fn element_name_attribute(
    e: &quick_xml::events::BytesStart<'_>,
) -> Result<Option<String>, MosmixError> {
    for attribute in e.attributes().flatten() {
        if attribute.key.local_name().as_ref() == b"elementName" {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Turns the collected `dwd:value` runs of one forecast element into
/// individual tokens.
///
/// MOSMIX emits either a single element holding one whitespace-separated
/// run for all timesteps, or one element per timestep.
fn split_value_runs(runs: &[String]) -> Vec<String> {
    if runs.len() == 1 {
        runs[0].split_whitespace().map(String::from).collect()
    } else {
        runs.to_vec()
    }
}
