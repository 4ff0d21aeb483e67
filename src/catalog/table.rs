//! The scored track table and its query operations.
//!
//! Scoring runs once: for every context in the fixed order the classifier is
//! invoked over the whole catalog with `context_class` forced to that label,
//! producing one probability per track per context. The derived columns
//! (`best_context`, `best_probability`, weighted score) are computed row-wise
//! from those probabilities. Every query below is a pure read returning a
//! fresh view; the table itself never changes after construction.

use std::cmp::Ordering;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::context::{Context, CONTEXTS, CONTEXT_COUNT};
use crate::inference::ContextClassifier;

use super::{CatalogError, RawCatalog, GENRE_IDX};

/// One fully scored catalog row.
#[derive(Debug, Clone)]
pub struct ScoredTrack {
    pub track_name: String,
    pub artist_name: String,
    pub genre: String,
    /// Positive-class probability per context, indexed by [`Context::index`].
    pub probabilities: [f32; CONTEXT_COUNT],
    /// First context in declaration order attaining the maximum probability.
    pub best_context: Context,
    pub best_probability: f32,
    /// Fixed convex combination of the per-context probabilities.
    pub weighted_score: f32,
}

impl ScoredTrack {
    /// Build a scored row, computing the derived fields from the
    /// per-context probabilities.
    pub fn from_probabilities(
        track_name: String,
        artist_name: String,
        genre: String,
        probabilities: [f32; CONTEXT_COUNT],
    ) -> Self {
        let (best_context, best_probability) = best_of(&probabilities);
        let weighted_score = weighted_score(&probabilities);
        Self {
            track_name,
            artist_name,
            genre,
            probabilities,
            best_context,
            best_probability,
            weighted_score,
        }
    }
}

/// Row-wise argmax over the fixed context order. Ties resolve to the first
/// context attaining the maximum (strict greater-than while scanning).
fn best_of(probabilities: &[f32; CONTEXT_COUNT]) -> (Context, f32) {
    let mut best = CONTEXTS[0];
    let mut best_p = probabilities[0];
    for ctx in CONTEXTS.iter().skip(1) {
        let p = probabilities[ctx.index()];
        if p > best_p {
            best = *ctx;
            best_p = p;
        }
    }
    (best, best_p)
}

/// Fixed-weight linear combination of the per-context probabilities. The
/// weights sum to 1, so the result stays in [0, 1].
fn weighted_score(probabilities: &[f32; CONTEXT_COUNT]) -> f32 {
    CONTEXTS
        .iter()
        .map(|ctx| ctx.weight() * probabilities[ctx.index()])
        .sum()
}

/// A row of a ranked query result. Serialized verbatim in track responses.
#[derive(Debug, Clone, Serialize)]
pub struct RankedTrack {
    /// Row position in the table, stable for the process lifetime.
    pub id: usize,
    pub track_name: String,
    pub artist_name: String,
    pub genre: String,
    pub best_context: Context,
    pub probability: f32,
}

/// The immutable scored table, shared read-only across all request handlers.
#[derive(Debug, Clone, Default)]
pub struct ScoredCatalog {
    tracks: Vec<ScoredTrack>,
}

impl ScoredCatalog {
    /// Load the dataset and the classifier and batch-score the whole catalog.
    /// Any failure here is fatal: the process must not start serving without
    /// a scored table.
    pub fn initialize(dataset_path: &Path, model_path: &Path) -> Result<Self, CatalogError> {
        let raw = RawCatalog::from_path(dataset_path)?;
        let classifier = ContextClassifier::load(model_path)?;
        Self::score(&raw, &classifier)
    }

    /// Run one batch inference pass per context and assemble the table.
    pub fn score(raw: &RawCatalog, classifier: &ContextClassifier) -> Result<Self, CatalogError> {
        let mut per_context: Vec<Vec<f32>> = Vec::with_capacity(CONTEXT_COUNT);
        for ctx in CONTEXTS {
            debug!(context = %ctx, rows = raw.len(), "Scoring catalog against context");
            per_context.push(classifier.predict_positive(raw, ctx)?);
        }

        let tracks = raw
            .tracks
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut probabilities = [0.0f32; CONTEXT_COUNT];
                for (slot, probs) in probabilities.iter_mut().zip(per_context.iter()) {
                    *slot = probs[i];
                }
                ScoredTrack::from_probabilities(
                    row.track_name.clone(),
                    row.artist_name.clone(),
                    row.categorical[GENRE_IDX].clone(),
                    probabilities,
                )
            })
            .collect::<Vec<_>>();

        info!(rows = tracks.len(), contexts = CONTEXT_COUNT, "Catalog scored");
        Ok(Self { tracks })
    }

    /// Build a table directly from scored rows. Used by tests and tools that
    /// already have probabilities in hand.
    pub fn from_tracks(tracks: Vec<ScoredTrack>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Sorted, deduplicated, non-empty genre strings.
    pub fn genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = self
            .tracks
            .iter()
            .map(|t| t.genre.clone())
            .filter(|g| !g.trim().is_empty())
            .collect();
        genres.sort();
        genres.dedup();
        genres
    }

    /// Look up a single scored row by id (row position).
    pub fn track(&self, id: usize) -> Option<&ScoredTrack> {
        self.tracks.get(id)
    }

    /// Top-N tracks, optionally filtered to an exact genre and ranked by a
    /// single context's probability; without a context, ranked by the
    /// weighted global score.
    pub fn top(&self, genre: Option<&str>, context: Option<Context>, limit: usize) -> Vec<RankedTrack> {
        let indices = (0..self.tracks.len())
            .filter(|&i| genre.map_or(true, |g| self.tracks[i].genre == g))
            .collect();
        self.rank(indices, context, limit)
    }

    /// Case-insensitive substring search over track name, artist name, and
    /// genre; a row qualifies if any one field matches. Empty query text
    /// yields an empty result, not an error. Results are filtered, ranked,
    /// and truncated with the same rules as [`Self::top`].
    pub fn search(
        &self,
        query: &str,
        genre: Option<&str>,
        context: Option<Context>,
        limit: usize,
    ) -> Vec<RankedTrack> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let indices = (0..self.tracks.len())
            .filter(|&i| {
                let t = &self.tracks[i];
                t.track_name.to_lowercase().contains(&needle)
                    || t.artist_name.to_lowercase().contains(&needle)
                    || t.genre.to_lowercase().contains(&needle)
            })
            .filter(|&i| genre.map_or(true, |g| self.tracks[i].genre == g))
            .collect();
        self.rank(indices, context, limit)
    }

    /// Stable descending sort of the given row indices by the chosen score
    /// column, truncated to `limit`. Equal scores retain their relative row
    /// order. With a context, the emitted `best_context`/`probability` are
    /// overridden to that context; otherwise the row's precomputed best pair
    /// is used.
    fn rank(&self, mut indices: Vec<usize>, context: Option<Context>, limit: usize) -> Vec<RankedTrack> {
        let score = |i: usize| match context {
            Some(ctx) => self.tracks[i].probabilities[ctx.index()],
            None => self.tracks[i].weighted_score,
        };

        indices.sort_by(|&a, &b| score(b).partial_cmp(&score(a)).unwrap_or(Ordering::Equal));
        indices.truncate(limit);

        indices
            .into_iter()
            .map(|i| {
                let t = &self.tracks[i];
                let (best_context, probability) = match context {
                    Some(ctx) => (ctx, t.probabilities[ctx.index()]),
                    None => (t.best_context, t.best_probability),
                };
                RankedTrack {
                    id: i,
                    track_name: t.track_name.clone(),
                    artist_name: t.artist_name.clone(),
                    genre: t.genre.clone(),
                    best_context,
                    probability,
                }
            })
            .collect()
    }
}
