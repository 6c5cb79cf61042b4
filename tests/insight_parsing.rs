/// Integration tests for InSight document ingestion
///
/// These tests run the full parser against a captured-style document in
/// `tests/fixtures/insight_sample.json` (five sols, including sensor
/// dropout and an unrecognized season code) and against small hand-built
/// documents for the failure paths.
///
/// No network access is needed. See `live_api.rs` for the live check.
///
/// Run with: cargo test --test insight_parsing

use mars_weather::ingest::insight::{
    parse_weather_document, parse_weather_document_with, ParseOptions, Substitution,
};
use mars_weather::ingest::placeholder;
use mars_weather::model::{CelsiusConversion, CompassPoint, InsightError, Provenance, Season};

use chrono::{TimeZone, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SAMPLE: &str = include_str!("fixtures/insight_sample.json");

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn parse_seeded(raw: &str, seed: u64) -> Result<Vec<mars_weather::model::DailyWeatherRecord>, InsightError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    parse_weather_document_with(raw, &ParseOptions::default(), &mut rng)
}

fn minimal_sol(first_utc: &str) -> String {
    format!(
        r#"{{ "First_UTC": "{}", "Last_UTC": "{}", "Season": "spring" }}"#,
        first_utc, first_utc
    )
}

// ---------------------------------------------------------------------------
// Ordering & uniqueness
// ---------------------------------------------------------------------------

#[test]
fn test_sample_records_sorted_newest_first() {
    let records = parse_seeded(SAMPLE, 1).expect("sample document should parse");
    let sols: Vec<u32> = records.iter().map(|r| r.sol).collect();
    assert_eq!(sols, vec![679, 678, 677, 676, 675]);

    for pair in records.windows(2) {
        assert!(pair[0].sol > pair[1].sol, "sols must be strictly descending");
    }
}

#[test]
fn test_sol_keys_out_of_order_are_reordered() {
    let raw = format!(
        r#"{{ "sol_keys": ["10", "9", "11"], "10": {}, "9": {}, "11": {} }}"#,
        minimal_sol("2021-01-10T00:00:00Z"),
        minimal_sol("2021-01-09T00:00:00Z"),
        minimal_sol("2021-01-11T00:00:00Z"),
    );
    let sols: Vec<u32> = parse_seeded(&raw, 0).unwrap().iter().map(|r| r.sol).collect();
    assert_eq!(sols, vec![11, 10, 9]);
}

// ---------------------------------------------------------------------------
// Measured readings
// ---------------------------------------------------------------------------

#[test]
fn test_sample_measured_values_are_not_converted() {
    let records = parse_seeded(SAMPLE, 1).unwrap();
    let sol_675 = records.iter().find(|r| r.sol == 675).expect("sol 675 present");

    let at = sol_675.temperature.as_ref().unwrap();
    assert_eq!(at.average, -62.314);
    assert_eq!(at.minimum, -96.872);
    assert_eq!(at.maximum, -15.908);
    assert_eq!(at.sample_count, 177556);
    assert_eq!(at.provenance, Provenance::Measured);

    let pre = sol_675.pressure.as_ref().unwrap();
    assert_eq!(pre.average, 750.563);

    let wd = sol_675.wind_direction.as_ref().unwrap();
    assert_eq!(wd.compass_point, CompassPoint::WNW);
    assert_eq!(wd.sample_count, 27, "most_common must be used, not the numbered bins");

    assert_eq!(sol_675.season, Season::Fall);
    assert_eq!(
        sol_675.period_start,
        Utc.with_ymd_and_hms(2020, 10, 19, 18, 32, 20).unwrap()
    );
    assert_eq!(
        sol_675.period_end,
        Utc.with_ymd_and_hms(2020, 10, 20, 19, 11, 55).unwrap()
    );
}

#[test]
fn test_documented_temperature_example_is_verbatim() {
    let raw = r#"{
        "sol_keys": ["1"],
        "1": {
            "AT": { "av": -60.5, "ct": 310000, "mn": -95.0, "mx": -10.0 },
            "First_UTC": "2021-01-01T00:00:00Z",
            "Last_UTC": "2021-01-01T23:00:00Z",
            "Season": "fall"
        }
    }"#;
    let records = parse_seeded(raw, 0).unwrap();
    let at = records[0].temperature.as_ref().unwrap();
    assert_eq!((at.average, at.sample_count, at.minimum, at.maximum), (-60.5, 310000, -95.0, -10.0));
    assert_eq!(records[0].period_start, Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
}

// ---------------------------------------------------------------------------
// Sensor dropout
// ---------------------------------------------------------------------------

#[test]
fn test_dropout_sol_gets_placeholders_within_range() {
    let records = parse_seeded(SAMPLE, 99).unwrap();
    let sol_677 = records.iter().find(|r| r.sol == 677).unwrap();

    let t = sol_677.temperature.as_ref().expect("temperature substituted");
    assert!(t.is_placeholder());
    assert!(t.average >= placeholder::TEMPERATURE_AVERAGE.0 && t.average < placeholder::TEMPERATURE_AVERAGE.1);
    assert!(t.minimum >= placeholder::TEMPERATURE_MINIMUM.0 && t.minimum < placeholder::TEMPERATURE_MINIMUM.1);
    assert!(t.maximum >= placeholder::TEMPERATURE_MAXIMUM.0 && t.maximum < placeholder::TEMPERATURE_MAXIMUM.1);
    assert!(t.sample_count >= placeholder::TEMPERATURE_SAMPLES.0 && t.sample_count < placeholder::TEMPERATURE_SAMPLES.1);

    let w = sol_677.wind_speed.as_ref().expect("wind speed substituted");
    assert!(w.is_placeholder());
    assert!(w.average >= placeholder::WIND_SPEED_AVERAGE.0 && w.average < placeholder::WIND_SPEED_AVERAGE.1);

    // "WD": {} has no most_common
    let wd = sol_677.wind_direction.as_ref().expect("wind direction substituted");
    assert_eq!(wd.provenance, Provenance::Placeholder);

    // Pressure was present on this sol and stays measured
    assert_eq!(sol_677.pressure.as_ref().unwrap().provenance, Provenance::Measured);
}

#[test]
fn test_missing_pressure_is_absent_not_substituted() {
    let records = parse_seeded(SAMPLE, 5).unwrap();
    let sol_678 = records.iter().find(|r| r.sol == 678).unwrap();
    assert!(sol_678.pressure.is_none());
    assert_eq!(sol_678.season, Season::Winter);
}

#[test]
fn test_same_seed_same_document_is_deterministic() {
    let a = parse_seeded(SAMPLE, 2024).unwrap();
    let b = parse_seeded(SAMPLE, 2024).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_leave_absent_keeps_dropout_visible() {
    let options = ParseOptions { substitution: Substitution::LeaveAbsent };
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let records = parse_weather_document_with(SAMPLE, &options, &mut rng).unwrap();

    let sol_677 = records.iter().find(|r| r.sol == 677).unwrap();
    assert!(sol_677.temperature.is_none());
    assert!(sol_677.wind_speed.is_none());
    assert!(sol_677.wind_direction.is_none());
    assert!(records.iter().all(|r| !r.has_placeholders()));
}

#[test]
fn test_unrecognized_season_is_unknown() {
    let records = parse_seeded(SAMPLE, 1).unwrap();
    let sol_679 = records.iter().find(|r| r.sol == 679).unwrap();
    assert_eq!(sol_679.season, Season::Unknown);
}

#[test]
fn test_thread_rng_wrapper_parses_sample() {
    let records = parse_weather_document(SAMPLE).expect("sample should parse with default options");
    assert_eq!(records.len(), 5);
}

// ---------------------------------------------------------------------------
// Celsius conversion
// ---------------------------------------------------------------------------

#[test]
fn test_celsius_modes_differ_only_in_min_max() {
    let records = parse_seeded(SAMPLE, 1).unwrap();
    let sol_675 = records.iter().find(|r| r.sol == 675).unwrap();

    let per_field = sol_675.temperature_celsius(CelsiusConversion::PerField).unwrap();
    let from_average = sol_675.temperature_celsius(CelsiusConversion::FromAverage).unwrap();

    assert_eq!(per_field.average, from_average.average);
    assert!((per_field.minimum - (-96.872 - 32.0) * 5.0 / 9.0).abs() < 1e-9);
    assert!(per_field.minimum < per_field.average && per_field.average < per_field.maximum);
    assert_eq!(from_average.minimum, from_average.average);
    assert_eq!(from_average.maximum, from_average.average);
}

// ---------------------------------------------------------------------------
// Failure semantics
// ---------------------------------------------------------------------------

#[test]
fn test_missing_sol_keys_is_malformed_document() {
    let raw = format!(r#"{{ "1": {} }}"#, minimal_sol("2021-01-01T00:00:00Z"));
    assert!(matches!(parse_seeded(&raw, 0), Err(InsightError::MalformedDocument(_))));
}

#[test]
fn test_one_bad_sol_fails_the_whole_document() {
    // Sol 2 is fine; sol 1 has a broken sensor. No partial list comes back.
    let raw = format!(
        r#"{{ "sol_keys": ["1", "2"],
             "1": {{ "AT": {{ "av": -60.0, "ct": "many", "mn": -90.0, "mx": -10.0 }},
                    "First_UTC": "2021-01-01T00:00:00Z", "Last_UTC": "2021-01-01T23:00:00Z",
                    "Season": "fall" }},
             "2": {} }}"#,
        minimal_sol("2021-01-02T00:00:00Z")
    );
    match parse_seeded(&raw, 0) {
        Err(InsightError::MalformedSensorData { sol, sensor, .. }) => {
            assert_eq!(sol, 1);
            assert_eq!(sensor, "AT");
        }
        other => panic!("expected MalformedSensorData, got {:?}", other),
    }
}

#[test]
fn test_bad_timestamp_is_malformed_timestamp() {
    let raw = format!(r#"{{ "sol_keys": ["4"], "4": {} }}"#, minimal_sol("20/10/2020 18:32"));
    assert!(matches!(
        parse_seeded(&raw, 0),
        Err(InsightError::MalformedTimestamp { sol: 4, field: "First_UTC", .. })
    ));
}
