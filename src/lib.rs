//! Sync a published spreadsheet (CSV) into a Meilisearch-style index.
//!
//! One run fetches the sheet, keeps the rows with an `id` and a `title`,
//! makes sure the index exists, bulk-uploads the rows and sets the searchable
//! and displayed attributes.

pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod publish;

pub use config::{Config, SettingsFailurePolicy};
pub use error::SyncError;
pub use pipeline::{run, StepOutcome, SyncReport};
