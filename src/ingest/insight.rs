/// InSight Mars Weather Service API client and document parser
///
/// Retrieves the per-sol weather summary published for the InSight lander
/// and normalizes it into `DailyWeatherRecord`s, most recent sol first.
///
/// API Documentation: https://api.nasa.gov/assets/insight/InSight%20Weather%20API%20Documentation.pdf
/// Endpoint: https://api.nasa.gov/insight_weather/?api_key=KEY&feedtype=json&ver=1.0
///
/// Document shape (abridged):
/// ```text
/// {
///   "sol_keys": ["675", "676"],
///   "675": {
///     "AT":  { "av": -62.3, "ct": 177556, "mn": -96.9, "mx": -15.5 },
///     "HWS": { "av": 7.2,   "ct": 88628,  "mn": 1.1,   "mx": 22.5 },
///     "PRE": { "av": 750.6, "ct": 887776, "mn": 722.0, "mx": 768.8 },
///     "WD":  { "most_common": { "compass_degrees": 292.5, "compass_point": "WNW",
///                               "compass_right": -0.92, "compass_up": 0.38, "ct": 27 } },
///     "First_UTC": "2020-10-19T18:32:20Z",
///     "Last_UTC":  "2020-10-20T19:11:55Z",
///     "Season": "summer"
///   },
///   ...
/// }
/// ```

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;

use crate::feed::WeatherSource;
use crate::ingest::placeholder;
use crate::logging::{self, DataSource};
use crate::model::{
    CompassPoint, DailyWeatherRecord, InsightError, Provenance, Season, SensorReading,
    WindDirectionReading,
};

pub const INSIGHT_BASE_URL: &str = "https://api.nasa.gov";

/// `yyyy-MM-dd'T'HH:mm:ssZ` with a numeric offset. A trailing `Z` is
/// rewritten to `+0000` before parsing.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

// ============================================================================
// Parse options
// ============================================================================

/// What to do when a sol is missing a sensor sub-object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Substitution {
    /// Temperature, wind speed and wind direction get placeholder readings.
    /// Pressure is never substituted.
    #[default]
    Synthesize,
    /// Missing sensors stay `None`.
    LeaveAbsent,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub substitution: Substitution,
}

// ============================================================================
// Raw API structures
// ============================================================================

/// One `AT` / `HWS` / `PRE` sub-object. All four fields are required.
#[derive(Debug, Deserialize)]
struct RawSensor {
    av: f64,
    ct: u32,
    mn: f64,
    mx: f64,
}

/// `WD.most_common`
#[derive(Debug, Deserialize)]
struct RawWindDirection {
    compass_point: String,
    compass_degrees: f64,
    compass_right: f64,
    compass_up: f64,
    ct: u32,
}

// ============================================================================
// URL construction & fetching
// ============================================================================

/// Builds the weather endpoint URL for the given base and API key.
pub fn build_insight_url(base_url: &str, api_key: &str) -> String {
    format!(
        "{}/insight_weather/?api_key={}&feedtype=json&ver=1.0",
        base_url.trim_end_matches('/'),
        api_key
    )
}

/// Fetches the raw response body. Parsing is left to the caller.
pub fn fetch_raw_document(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<String, InsightError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| InsightError::RequestFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(InsightError::HttpError(response.status().as_u16()));
    }

    response
        .text()
        .map_err(|e| InsightError::RequestFailed(e.to_string()))
}

/// Blocking client bound to one endpoint URL.
pub struct InsightClient {
    client: reqwest::blocking::Client,
    url: String,
}

impl InsightClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, InsightError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InsightError::RequestFailed(e.to_string()))?;

        Ok(InsightClient {
            client,
            url: build_insight_url(base_url, api_key),
        })
    }
}

impl WeatherSource for InsightClient {
    fn fetch_raw(&mut self) -> Result<String, InsightError> {
        fetch_raw_document(&self.client, &self.url)
    }
}

// ============================================================================
// Document parsing
// ============================================================================

/// Parses a full InSight document using default options and the
/// thread-local RNG for placeholders.
/// Use `parse_weather_document_with` in tests to keep them deterministic.
pub fn parse_weather_document(raw: &str) -> Result<Vec<DailyWeatherRecord>, InsightError> {
    parse_weather_document_with(raw, &ParseOptions::default(), &mut rand::thread_rng())
}

/// Parses a full InSight document into one record per sol, ordered by
/// sol descending.
///
/// Any malformed part fails the whole call; there is no partial result.
/// `rng` is only consulted for placeholder readings.
pub fn parse_weather_document_with<R: Rng + ?Sized>(
    raw: &str,
    options: &ParseOptions,
    rng: &mut R,
) -> Result<Vec<DailyWeatherRecord>, InsightError> {
    let doc: Value = serde_json::from_str(raw)
        .map_err(|e| InsightError::MalformedDocument(format!("invalid JSON: {}", e)))?;

    let sol_keys = doc
        .get("sol_keys")
        .ok_or_else(|| InsightError::MalformedDocument("missing sol_keys".to_string()))?
        .as_array()
        .ok_or_else(|| InsightError::MalformedDocument("sol_keys is not an array".to_string()))?;

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(sol_keys.len());

    for key in sol_keys {
        let key = key.as_str().ok_or_else(|| {
            InsightError::MalformedDocument(format!("sol key {} is not a string", key))
        })?;
        let sol: u32 = key.parse().map_err(|_| {
            InsightError::MalformedDocument(format!("sol key {:?} is not a sol number", key))
        })?;

        if !seen.insert(sol) {
            logging::debug(DataSource::Insight, Some(key), "duplicate sol key skipped");
            continue;
        }

        let sol_json = doc
            .get(key)
            .filter(|v| v.is_object())
            .ok_or_else(|| {
                InsightError::MalformedDocument(format!("sol {} listed but has no data object", key))
            })?;

        records.push(parse_sol(sol_json, sol, options, rng)?);
    }

    records.sort_by(|a, b| b.sol.cmp(&a.sol));
    Ok(records)
}

/// Parses one sol's sub-object.
fn parse_sol<R: Rng + ?Sized>(
    sol_json: &Value,
    sol: u32,
    options: &ParseOptions,
    rng: &mut R,
) -> Result<DailyWeatherRecord, InsightError> {
    logging::debug(DataSource::Insight, Some(&sol.to_string()), "parsing weather data");

    let synthesize = options.substitution == Substitution::Synthesize;

    let temperature = match sensor_object(sol_json, "AT", sol)? {
        Some(at) => Some(parse_sensor(at, sol, "AT")?),
        None if synthesize => Some(placeholder::temperature(rng)),
        None => None,
    };

    let wind_speed = match sensor_object(sol_json, "HWS", sol)? {
        Some(hws) => Some(parse_sensor(hws, sol, "HWS")?),
        None if synthesize => Some(placeholder::wind_speed(rng)),
        None => None,
    };

    // Pressure is never substituted.
    let pressure = match sensor_object(sol_json, "PRE", sol)? {
        Some(pre) => Some(parse_sensor(pre, sol, "PRE")?),
        None => None,
    };

    let most_common = match sensor_object(sol_json, "WD", sol)? {
        Some(wd) => sensor_object(wd, "most_common", sol)?,
        None => None,
    };
    let wind_direction = match most_common {
        Some(mc) => Some(parse_wind_direction(mc, sol)?),
        None if synthesize => Some(placeholder::wind_direction(rng)),
        None => None,
    };

    let period_start = parse_timestamp_field(sol_json, "First_UTC", sol)?;
    let period_end = parse_timestamp_field(sol_json, "Last_UTC", sol)?;

    let season = sol_json
        .get("Season")
        .and_then(Value::as_str)
        .map(Season::from_code)
        .unwrap_or(Season::Unknown);

    Ok(DailyWeatherRecord {
        sol,
        temperature,
        wind_speed,
        pressure,
        wind_direction,
        season,
        period_start,
        period_end,
    })
}

/// Looks up an optional object-valued key. JSON `null` counts as absent.
fn sensor_object<'a>(
    parent: &'a Value,
    key: &'static str,
    sol: u32,
) -> Result<Option<&'a Value>, InsightError> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) if v.is_object() => Ok(Some(v)),
        Some(other) => Err(InsightError::MalformedSensorData {
            sol,
            sensor: key,
            reason: format!("expected an object, got {}", other),
        }),
    }
}

fn parse_sensor(value: &Value, sol: u32, sensor: &'static str) -> Result<SensorReading, InsightError> {
    let raw = RawSensor::deserialize(value).map_err(|e| InsightError::MalformedSensorData {
        sol,
        sensor,
        reason: e.to_string(),
    })?;

    Ok(SensorReading::measured(raw.av, raw.mn, raw.mx, raw.ct))
}

fn parse_wind_direction(value: &Value, sol: u32) -> Result<WindDirectionReading, InsightError> {
    let raw = RawWindDirection::deserialize(value).map_err(|e| InsightError::MalformedSensorData {
        sol,
        sensor: "WD",
        reason: e.to_string(),
    })?;

    let compass_point =
        CompassPoint::from_label(&raw.compass_point).ok_or_else(|| InsightError::MalformedSensorData {
            sol,
            sensor: "WD",
            reason: format!("unknown compass point {:?}", raw.compass_point),
        })?;

    Ok(WindDirectionReading {
        compass_point,
        compass_degrees: raw.compass_degrees,
        compass_right: raw.compass_right,
        compass_up: raw.compass_up,
        sample_count: raw.ct,
        provenance: Provenance::Measured,
    })
}

fn parse_timestamp_field(
    sol_json: &Value,
    field: &'static str,
    sol: u32,
) -> Result<DateTime<Utc>, InsightError> {
    let value = sol_json.get(field).and_then(Value::as_str).ok_or_else(|| {
        InsightError::MalformedDocument(format!("sol {} is missing {}", sol, field))
    })?;

    parse_utc_timestamp(value).ok_or_else(|| InsightError::MalformedTimestamp {
        sol,
        field,
        value: value.to_string(),
    })
}

/// Parses an InSight timestamp such as `"2020-10-19T18:32:20Z"`.
///
/// Strict: fractional seconds, missing offsets and trailing text are
/// rejected.
pub fn parse_utc_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let normalized = match value.strip_suffix('Z') {
        Some(base) => format!("{}+0000", base),
        None => value.to_string(),
    };

    DateTime::parse_from_str(&normalized, TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ============================================================================
// Tests
// ============================================================================
