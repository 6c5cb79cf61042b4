/// Data ingestion from the InSight weather API.
///
/// Submodules:
/// - `insight` — endpoint client and the document → records parser.
/// - `placeholder` — synthetic readings that stand in for sensor dropout.

pub mod insight;
pub mod placeholder;
