//! Mars weather CLI.
//!
//! Loads configuration, performs one refresh against the InSight API and
//! prints the per-sol summary, most recent sol first.
//!
//! Usage: mars_weather [--json] [--fahrenheit]

use std::process::ExitCode;

use mars_weather::config::{self, Config};
use mars_weather::feed::WeatherFeed;
use mars_weather::ingest::insight::InsightClient;
use mars_weather::logging::{self, DataSource};
use mars_weather::model::{DailyWeatherRecord, SensorReading};

struct Options {
    json: bool,
    fahrenheit: bool,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options { json: false, fahrenheit: false };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => options.json = true,
            "--fahrenheit" => options.fahrenheit = true,
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(options)
}

fn main() -> ExitCode {
    let options = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}\nUsage: mars_weather [--json] [--fahrenheit]", e);
            return ExitCode::from(2);
        }
    };

    let config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logger(
        config.log_level(),
        config.logging.file.as_deref(),
        config.logging.timestamps,
    );

    match run(&config, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logging::error(DataSource::System, None, &e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let client = InsightClient::new(&config.api.base_url, &config.api.api_key, config.timeout())?;
    let mut feed = WeatherFeed::new(client, config.parse_options());

    // Connection problems are logged by the feed.
    feed.refresh()?;

    let records = feed.records();
    let placeholder_sols = records.iter().filter(|r| r.has_placeholders()).count();
    logging::log_refresh_summary(records.len(), placeholder_sols);

    if options.json {
        println!("{}", serde_json::to_string_pretty(records)?);
    } else {
        print_table(records, config, options.fahrenheit);
    }

    Ok(())
}

fn print_table(records: &[DailyWeatherRecord], config: &Config, fahrenheit: bool) {
    let unit = if fahrenheit { "°F" } else { "°C" };

    println!(
        "{:>5}  {:<8}  {:<10}  {:>22}  {:>14}  {:>10}  {:>8}",
        "SOL", "SEASON", "EARTH DATE", format!("TEMP {} (min/avg/max)", unit), "WIND m/s (avg)", "PRESS Pa", "WIND DIR"
    );

    for record in records {
        let temperature = if fahrenheit {
            record.temperature.clone()
        } else {
            record.temperature_celsius(config.celsius_conversion())
        };

        let temp = temperature
            .as_ref()
            .map(|t| format!("{:.1}/{:.1}/{:.1}{}", t.minimum, t.average, t.maximum, marker(t)))
            .unwrap_or_else(|| "-".to_string());
        let wind = record
            .wind_speed
            .as_ref()
            .map(|w| format!("{:.1}{}", w.average, marker(w)))
            .unwrap_or_else(|| "-".to_string());
        let pressure = record
            .pressure
            .as_ref()
            .map(|p| format!("{:.1}", p.average))
            .unwrap_or_else(|| "-".to_string());
        let direction = record
            .wind_direction
            .as_ref()
            .map(|wd| wd.compass_point.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:>5}  {:<8}  {:<10}  {:>22}  {:>14}  {:>10}  {:>8}",
            record.sol,
            record.season.to_string(),
            record.period_start.format("%Y-%m-%d").to_string(),
            temp,
            wind,
            pressure,
            direction
        );
    }

    if records.iter().any(DailyWeatherRecord::has_placeholders) {
        println!("\n* placeholder reading (sensor data missing for that sol)");
    }
}

fn marker(reading: &SensorReading) -> &'static str {
    if reading.is_placeholder() { "*" } else { "" }
}
