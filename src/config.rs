/// Service configuration.
///
/// Loaded from `mars_weather.toml` (or the path in `MARS_WEATHER_CONFIG`).
/// Every section and key is optional; missing values fall back to the
/// defaults below. `NASA_API_KEY` from the environment or `.env` overrides
/// the file's API key so keys stay out of version control.

use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use std::time::Duration;

use crate::ingest::insight::{ParseOptions, Substitution, INSIGHT_BASE_URL};
use crate::logging::{self, DataSource, LogLevel};
use crate::model::CelsiusConversion;

pub const DEFAULT_CONFIG_PATH: &str = "./mars_weather.toml";
pub const CONFIG_PATH_ENV: &str = "MARS_WEATHER_CONFIG";
pub const API_KEY_ENV: &str = "NASA_API_KEY";

/// NASA's shared demo key; rate limited, but works without signup.
pub const DEMO_API_KEY: &str = "DEMO_KEY";

// ---------------------------------------------------------------------------
// File structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub parse: ParseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParseConfig {
    /// Substitute placeholder readings for missing temperature, wind speed
    /// and wind direction.
    pub substitute_missing: bool,
    pub celsius: CelsiusConversion,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: INSIGHT_BASE_URL.to_string(),
            api_key: DEMO_API_KEY.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            substitute_missing: true,
            celsius: CelsiusConversion::PerField,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived settings
// ---------------------------------------------------------------------------

impl Config {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            substitution: if self.parse.substitute_missing {
                Substitution::Synthesize
            } else {
                Substitution::LeaveAbsent
            },
        }
    }

    pub fn celsius_conversion(&self) -> CelsiusConversion {
        self.parse.celsius
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Unknown level names fall back to `Info`.
    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_name(&self.logging.level).unwrap_or(LogLevel::Info)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses config text. Unknown keys are ignored.
pub fn parse_config(text: &str) -> Result<Config, Box<dyn Error>> {
    let config: Config = toml::from_str(text)?;
    if config.api.base_url.trim().is_empty() {
        return Err("api.base_url must not be empty".into());
    }
    Ok(config)
}

/// Loads config from `path`. A missing file yields the defaults; an
/// unreadable or malformed one is an error.
pub fn load_config_from(path: &Path) -> Result<Config, Box<dyn Error>> {
    if !path.exists() {
        logging::debug(
            DataSource::Config,
            None,
            &format!("{} not found, using defaults", path.display()),
        );
        return Ok(Config::default());
    }

    let text = std::fs::read_to_string(path)?;
    parse_config(&text).map_err(|e| Box::<dyn Error>::from(format!("{}: {}", path.display(), e)))
}

/// Loads `.env`, then the config file, then applies the API key override.
pub fn load_config() -> Result<Config, Box<dyn Error>> {
    dotenv::dotenv().ok();

    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = load_config_from(Path::new(&path))?;

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            config.api.api_key = key.trim().to_string();
        }
    }

    Ok(config)
}
