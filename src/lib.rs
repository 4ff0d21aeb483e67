//! Context Ranker
//!
//! A small HTTP service that exposes a pre-trained binary classifier's
//! predictions over a fixed catalog of music tracks. The catalog is loaded
//! and batch-scored against every listening context once at startup; all
//! query endpoints are pure reads over the resulting immutable table.

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod inference;
pub mod server;
pub mod types;

pub use catalog::{CatalogError, ScoredCatalog, ScoredTrack};
pub use config::AppConfig;
pub use context::{Context, CONTEXTS, CONTEXT_COUNT};
pub use error::{AppError, Result};
