//! Weather feed: holds the latest records and refresh state.
//!
//! A `WeatherFeed` owns a `WeatherSource` (the live InSight client, or a stub
//! in tests) and exposes the two flags a display needs: whether a refresh
//! is in flight and whether the last refresh hit a connection problem.
//!
//! A failed refresh never clears the list. Whatever was last shown stays
//! available until a later refresh succeeds.

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::ingest::insight::{parse_weather_document_with, ParseOptions};
use crate::logging;
use crate::model::{DailyWeatherRecord, InsightError};

/// Anything that can produce a raw InSight document.
pub trait WeatherSource {
    fn fetch_raw(&mut self) -> Result<String, InsightError>;
}

pub struct WeatherFeed<S, R = ThreadRng> {
    source: S,
    options: ParseOptions,
    rng: R,
    records: Vec<DailyWeatherRecord>,
    is_loading: bool,
    connection_error: bool,
}

impl<S: WeatherSource> WeatherFeed<S, ThreadRng> {
    pub fn new(source: S, options: ParseOptions) -> Self {
        WeatherFeed::with_rng(source, options, rand::thread_rng())
    }
}

impl<S: WeatherSource, R: Rng> WeatherFeed<S, R> {
    /// Builds a feed with an explicit RNG for placeholder readings.
    pub fn with_rng(source: S, options: ParseOptions, rng: R) -> Self {
        WeatherFeed {
            source,
            options,
            rng,
            records: Vec::new(),
            is_loading: false,
            connection_error: false,
        }
    }

    /// Fetches and parses a fresh document.
    ///
    /// On success the record list is replaced and the new sol count is
    /// returned. On failure the previous list is kept, `connection_error`
    /// is set, and the error is returned.
    pub fn refresh(&mut self) -> Result<usize, InsightError> {
        self.connection_error = false;
        self.is_loading = true;
        logging::info(logging::DataSource::Feed, None, "Refreshing Mars weather data...");

        let outcome = self
            .source
            .fetch_raw()
            .and_then(|raw| parse_weather_document_with(&raw, &self.options, &mut self.rng));

        let result = match outcome {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                logging::info(
                    logging::DataSource::Feed,
                    None,
                    &format!("Got weather data for {} sols", count),
                );
                Ok(count)
            }
            Err(e) => {
                self.connection_error = true;
                logging::log_insight_failure("refresh", &e);
                Err(e)
            }
        };

        self.is_loading = false;
        result
    }

    pub fn records(&self) -> &[DailyWeatherRecord] {
        &self.records
    }

    /// Most recent sol, if any data has been loaded.
    pub fn latest(&self) -> Option<&DailyWeatherRecord> {
        self.records.first()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn connection_error(&self) -> bool {
        self.connection_error
    }
}
