/// Structured logging for the Mars weather service
///
/// Provides context-rich logging with a data source tag, an optional sol
/// context, timestamps, and severity levels. Supports both console output
/// and file-based logging for unattended runs.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::model::InsightError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Parses a config-file level name (`debug`, `info`, `warn`/`warning`, `error`).
    pub fn from_name(name: &str) -> Option<LogLevel> {
        match name.to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Insight,
    Config,
    Feed,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Insight => write!(f, "INSIGHT"),
            DataSource::Config => write!(f, "CONFIG"),
            DataSource::Feed => write!(f, "FEED"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - rate limiting or a rejected API key
    Expected,
    /// Unexpected failure - server errors or a payload we cannot read
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    fn format_entry(level: LogLevel, source: &DataSource, context: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let context_part = context.map(|c| format!(" [sol {}]", c)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, source, context_part, message)
    }

    fn log(&self, level: LogLevel, source: &DataSource, context: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, source, context, message);
        let context_part = context.map(|c| format!(" [sol {}]", c)).unwrap_or_default();

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG]{} {}", context_part, message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, context_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, context_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn dispatch(level: LogLevel, source: DataSource, context: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, &source, context, message);
        }
    }
}

/// Log a general informational message
pub fn info(source: DataSource, context: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, source, context, message);
}

/// Log a warning message
pub fn warn(source: DataSource, context: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, source, context, message);
}

/// Log an error message
pub fn error(source: DataSource, context: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, source, context, message);
}

/// Log a debug message
pub fn debug(source: DataSource, context: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, source, context, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify an InSight fetch or ingest failure
pub fn classify_insight_failure(err: &InsightError) -> FailureType {
    match err {
        // DEMO_KEY is heavily rate limited; 403 means the key was rejected
        InsightError::HttpError(403) | InsightError::HttpError(429) => FailureType::Expected,
        InsightError::HttpError(code) if *code >= 500 => FailureType::Unexpected,
        InsightError::HttpError(_) => FailureType::Unknown,
        InsightError::RequestFailed(_) => FailureType::Unknown,
        // Payload problems suggest an API change
        InsightError::MalformedDocument(_)
        | InsightError::MalformedSensorData { .. }
        | InsightError::MalformedTimestamp { .. } => FailureType::Unexpected,
    }
}

fn failure_context(err: &InsightError) -> Option<String> {
    match err {
        InsightError::MalformedSensorData { sol, .. } | InsightError::MalformedTimestamp { sol, .. } => {
            Some(sol.to_string())
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log an InSight failure with automatic classification
pub fn log_insight_failure(operation: &str, err: &InsightError) {
    let failure_type = classify_insight_failure(err);
    let context = failure_context(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(DataSource::Insight, context.as_deref(), &message),
        FailureType::Unexpected => error(DataSource::Insight, context.as_deref(), &message),
        FailureType::Unknown => warn(DataSource::Insight, context.as_deref(), &message),
    }
}

/// Log a summary of a completed refresh
pub fn log_refresh_summary(total_sols: usize, placeholder_sols: usize) {
    let message = format!(
        "Refresh complete: {} sols, {} with placeholder readings",
        total_sols, placeholder_sols
    );

    if total_sols == 0 {
        warn(DataSource::Feed, None, &message);
    } else {
        info(DataSource::Feed, None, &message);
    }
}
