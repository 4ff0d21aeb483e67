//! API response types.

use serde::Serialize;

use crate::catalog::RankedTrack;
use crate::context::Context;

/// Response for GET /api/v1/genres
#[derive(Debug, Serialize)]
pub struct GenresResponse {
    /// Sorted, deduplicated, non-empty genre strings
    pub genres: Vec<String>,
}

/// Response for GET /api/v1/contexts
#[derive(Debug, Serialize)]
pub struct ContextsResponse {
    /// The fixed context labels, in declaration order
    pub contexts: Vec<&'static str>,
}

/// Response shape shared by all ranked track listings
#[derive(Debug, Serialize)]
pub struct TracksResponse {
    pub tracks: Vec<RankedTrack>,
}

/// One per-context score entry in a predict response
#[derive(Debug, Serialize)]
pub struct ContextScore {
    pub context: Context,
    pub probability: f32,
}

/// The winning context/probability pair in a predict response
#[derive(Debug, Serialize)]
pub struct BestScore {
    pub context: Context,
    pub probability: f32,
}

/// Response for POST /api/v1/predict
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub id: usize,
    /// One entry per context, in fixed declaration order
    pub scores: Vec<ContextScore>,
    pub best: BestScore,
}

/// Response for GET /api/v1/health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    /// Number of rows in the scored catalog
    pub tracks: usize,
    pub uptime_seconds: u64,
}
