//! Catalog loading and the scored, immutable track table.
//!
//! The catalog is built exactly once at startup: raw rows are loaded from a
//! CSV dataset, every declared feature column is coerced (or synthesized with
//! a default), and the classifier is run once per context over the whole
//! table. After that the table never changes; every query operation is a pure
//! read producing a new view.

mod loader;
mod table;

pub use loader::{RawCatalog, RawTrack};
pub use table::{RankedTrack, ScoredCatalog, ScoredTrack};

use thiserror::Error;

use crate::inference::InferenceError;

/// Numeric feature columns, in the exact order the model was trained with.
pub const NUMERIC_FEATURES: [&str; 10] = [
    "acousticness",
    "danceability",
    "duration_ms",
    "energy",
    "instrumentalness",
    "liveness",
    "loudness",
    "speechiness",
    "tempo",
    "valence",
];

/// Categorical feature columns, in the exact order the model was trained
/// with. The full feature vector is numeric features followed by these.
pub const CATEGORICAL_FEATURES: [&str; 6] = [
    "genre",
    "base_ctx",
    "context_class",
    "key",
    "mode",
    "time_signature",
];

/// Position of `genre` within [`CATEGORICAL_FEATURES`].
pub const GENRE_IDX: usize = 0;

/// Position of `context_class` within [`CATEGORICAL_FEATURES`]. This is the
/// column overridden per context during batch scoring.
pub const CONTEXT_CLASS_IDX: usize = 2;

/// Errors raised while building the scored catalog. All of these are fatal
/// at startup; none can occur at request time.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),
}
