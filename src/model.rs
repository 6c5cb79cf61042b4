/// Core data types for the Mars weather service.
///
/// This module defines the shared domain model imported by all other modules:
/// per-sol weather records, the readings they carry, and the error type for
/// fetching and ingesting InSight data. Apart from the Celsius conversion
/// there is no logic here and no I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// Where a reading came from.
///
/// `Placeholder` readings are synthesized to stand in for sensor dropout
/// (see `ingest::placeholder`). They are never real telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Measured,
    Placeholder,
}

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// Statistical summary of one physical quantity over a sol.
///
/// Corresponds to an `AT`, `HWS` or `PRE` sub-object of an InSight sol:
/// `av` → average, `ct` → sample_count, `mn` → minimum, `mx` → maximum.
/// Units are whatever the source field uses (°F, m/s, Pa).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    pub average: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub sample_count: u32,
    pub provenance: Provenance,
}

/// How `SensorReading::to_celsius` treats minimum and maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CelsiusConversion {
    /// Each field is converted from its own Fahrenheit value.
    #[default]
    PerField,
    /// Minimum and maximum are both derived from the average, as the
    /// first mobile client did. Kept for output parity with that client.
    FromAverage,
}

impl SensorReading {
    pub fn measured(average: f64, minimum: f64, maximum: f64, sample_count: u32) -> Self {
        SensorReading {
            average,
            minimum,
            maximum,
            sample_count,
            provenance: Provenance::Measured,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.provenance == Provenance::Placeholder
    }

    /// Returns a new reading with Fahrenheit values converted to Celsius.
    pub fn to_celsius(&self, conversion: CelsiusConversion) -> SensorReading {
        let average = convert_to_celsius(self.average);
        let (minimum, maximum) = match conversion {
            CelsiusConversion::PerField => {
                (convert_to_celsius(self.minimum), convert_to_celsius(self.maximum))
            }
            CelsiusConversion::FromAverage => (average, average),
        };

        SensorReading {
            average,
            minimum,
            maximum,
            sample_count: self.sample_count,
            provenance: self.provenance,
        }
    }
}

pub fn convert_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// The 16 compass points in clockwise order starting at north.
///
/// Index `i` in `CompassPoint::ALL` covers `i * 22.5` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompassPoint {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl CompassPoint {
    pub const ALL: [CompassPoint; 16] = [
        CompassPoint::N,
        CompassPoint::NNE,
        CompassPoint::NE,
        CompassPoint::ENE,
        CompassPoint::E,
        CompassPoint::ESE,
        CompassPoint::SE,
        CompassPoint::SSE,
        CompassPoint::S,
        CompassPoint::SSW,
        CompassPoint::SW,
        CompassPoint::WSW,
        CompassPoint::W,
        CompassPoint::WNW,
        CompassPoint::NW,
        CompassPoint::NNW,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NNE => "NNE",
            CompassPoint::NE => "NE",
            CompassPoint::ENE => "ENE",
            CompassPoint::E => "E",
            CompassPoint::ESE => "ESE",
            CompassPoint::SE => "SE",
            CompassPoint::SSE => "SSE",
            CompassPoint::S => "S",
            CompassPoint::SSW => "SSW",
            CompassPoint::SW => "SW",
            CompassPoint::WSW => "WSW",
            CompassPoint::W => "W",
            CompassPoint::WNW => "WNW",
            CompassPoint::NW => "NW",
            CompassPoint::NNW => "NNW",
        }
    }

    /// Looks up a point by its exact label, e.g. `"WNW"`.
    pub fn from_label(label: &str) -> Option<CompassPoint> {
        CompassPoint::ALL.into_iter().find(|p| p.label() == label)
    }
}

impl std::fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Most common wind direction for a sol (`WD.most_common`).
///
/// `compass_right` / `compass_up` are the unit-vector projection of
/// `compass_degrees`, used to draw a compass needle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindDirectionReading {
    pub compass_point: CompassPoint,
    pub compass_degrees: f64,
    pub compass_right: f64,
    pub compass_up: f64,
    pub sample_count: u32,
    pub provenance: Provenance,
}

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

/// Martian season as reported by the lander (not Earth-relative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
    Unknown,
}

impl Season {
    /// Maps a season code. Matching is exact and case-sensitive; anything
    /// unrecognized is `Unknown`.
    pub fn from_code(code: &str) -> Season {
        match code {
            "winter" => Season::Winter,
            "spring" => Season::Spring,
            "summer" => Season::Summer,
            "fall" => Season::Fall,
            _ => Season::Unknown,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Season::Winter => write!(f, "winter"),
            Season::Spring => write!(f, "spring"),
            Season::Summer => write!(f, "summer"),
            Season::Fall => write!(f, "fall"),
            Season::Unknown => write!(f, "unknown"),
        }
    }
}

// ---------------------------------------------------------------------------
// Record type
// ---------------------------------------------------------------------------

/// Weather summary for a single sol.
///
/// Built fresh on every ingestion call. Holds no reference back to the
/// source document. `period_start <= period_end` is expected but not
/// checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyWeatherRecord {
    pub sol: u32,
    pub temperature: Option<SensorReading>, // °F
    pub wind_speed: Option<SensorReading>,  // m/s
    pub pressure: Option<SensorReading>,    // Pa
    pub wind_direction: Option<WindDirectionReading>,
    pub season: Season,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}

impl DailyWeatherRecord {
    pub fn temperature_celsius(&self, conversion: CelsiusConversion) -> Option<SensorReading> {
        self.temperature.as_ref().map(|t| t.to_celsius(conversion))
    }

    /// True if any reading on this record is a placeholder.
    pub fn has_placeholders(&self) -> bool {
        [&self.temperature, &self.wind_speed, &self.pressure]
            .into_iter()
            .flatten()
            .any(SensorReading::is_placeholder)
            || self
                .wind_direction
                .as_ref()
                .is_some_and(|wd| wd.provenance == Provenance::Placeholder)
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or ingesting InSight weather data.
///
/// Every variant is fatal for the current call; ingestion never returns a
/// partial list.
#[derive(Debug, PartialEq)]
pub enum InsightError {
    /// Non-2xx HTTP response from the API.
    HttpError(u16),
    /// The request could not be sent or the body could not be read.
    RequestFailed(String),
    /// Required top-level structure is missing: `sol_keys`, a listed sol's
    /// sub-object, or a sol's timestamp fields.
    MalformedDocument(String),
    /// A present sensor sub-object is missing fields or has mistyped ones.
    MalformedSensorData {
        sol: u32,
        sensor: &'static str,
        reason: String,
    },
    /// `First_UTC` / `Last_UTC` could not be parsed.
    MalformedTimestamp {
        sol: u32,
        field: &'static str,
        value: String,
    },
}

impl std::fmt::Display for InsightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsightError::HttpError(code) => write!(f, "HTTP error: {}", code),
            InsightError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            InsightError::MalformedDocument(msg) => write!(f, "Malformed document: {}", msg),
            InsightError::MalformedSensorData { sol, sensor, reason } => {
                write!(f, "Malformed sensor data for sol {} ({}): {}", sol, sensor, reason)
            }
            InsightError::MalformedTimestamp { sol, field, value } => {
                write!(f, "Malformed timestamp for sol {}: {} = {:?}", sol, field, value)
            }
        }
    }
}

impl std::error::Error for InsightError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_codes_are_case_sensitive() {
        assert_eq!(Season::from_code("fall"), Season::Fall);
        assert_eq!(Season::from_code("winter"), Season::Winter);
        assert_eq!(Season::from_code("Fall"), Season::Unknown);
        assert_eq!(Season::from_code("martian"), Season::Unknown);
        assert_eq!(Season::from_code(""), Season::Unknown);
    }

    #[test]
    fn test_compass_labels_round_trip_and_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for point in CompassPoint::ALL {
            assert!(seen.insert(point.label()), "duplicate label {}", point);
            assert_eq!(CompassPoint::from_label(point.label()), Some(point));
        }
        assert_eq!(CompassPoint::from_label("wnw"), None);
        assert_eq!(CompassPoint::from_label("NEE"), None);
    }

    #[test]
    fn test_convert_to_celsius_known_points() {
        assert_eq!(convert_to_celsius(32.0), 0.0);
        assert_eq!(convert_to_celsius(212.0), 100.0);
        assert!((convert_to_celsius(-40.0) - -40.0).abs() < 1e-12);
    }

    #[test]
    fn test_per_field_celsius_converts_each_field() {
        let reading = SensorReading::measured(-40.0, -112.0, 32.0, 10);
        let c = reading.to_celsius(CelsiusConversion::PerField);
        assert!((c.average - -40.0).abs() < 1e-9);
        assert!((c.minimum - -80.0).abs() < 1e-9);
        assert!((c.maximum - 0.0).abs() < 1e-9);
        assert_eq!(c.sample_count, 10);
    }

    #[test]
    fn test_from_average_celsius_collapses_min_and_max() {
        let reading = SensorReading::measured(-40.0, -112.0, 32.0, 10);
        let c = reading.to_celsius(CelsiusConversion::FromAverage);
        assert_eq!(c.minimum, c.average);
        assert_eq!(c.maximum, c.average);
        assert_eq!(c.provenance, Provenance::Measured);
    }

    #[test]
    fn test_error_display_mentions_sol() {
        let err = InsightError::MalformedTimestamp {
            sol: 675,
            field: "First_UTC",
            value: "yesterday".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("675"));
        assert!(msg.contains("First_UTC"));
    }
}
