//! Mars weather service.
//!
//! Fetches the InSight lander's per-sol weather summary and normalizes it
//! into typed records, most recent sol first.
//!
//! - `model`: records, readings, and `InsightError`
//! - `ingest`: the InSight client, document parser, and placeholder readings
//! - `feed`: refresh holder with loading / connection-error state
//! - `config`, `logging`: ambient service plumbing

pub mod config;
pub mod feed;
pub mod ingest;
pub mod logging;
pub mod model;
