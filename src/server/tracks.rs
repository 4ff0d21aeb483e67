//! Catalog query route handlers.
//!
//! All handlers are pure reads over the immutable scored catalog. Validation
//! failures map to 400; missing optional parameters degrade to defaults or
//! empty result sets, never to errors.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::context::{Context, CONTEXTS};
use crate::error::AppError;
use crate::types::{
    BestScore, ContextScore, ContextsResponse, GenresResponse, PredictResponse, TracksResponse,
};

use super::extractors::JsonBody;
use super::AppState;

/// Default result cap for the top listings
const DEFAULT_TOP_N: usize = 20;

/// Default result cap for ranked search
const DEFAULT_SEARCH_TOP_N: usize = 50;

/// Parse an optional `top_n` parameter. An unparsable value falls back to
/// the default rather than erroring, preserving the service's historical
/// behavior.
fn parse_top_n(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

/// Validate an optional `context` parameter against the fixed set. An empty
/// or absent value means "no context filter"; anything else must be a known
/// label.
fn parse_context(raw: Option<&str>) -> Result<Option<Context>, AppError> {
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Context::parse(s).map(Some).ok_or_else(|| {
            let labels: Vec<&str> = CONTEXTS.iter().map(|c| c.as_str()).collect();
            AppError::BadRequest(format!("context must be one of {labels:?}"))
        }),
    }
}

/// Treat an empty genre string the same as an absent one.
fn nonempty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().filter(|s| !s.is_empty())
}

/// GET /api/v1/genres
///
/// Sorted distinct non-empty genres present in the catalog.
pub async fn list_genres(State(state): State<AppState>) -> Json<GenresResponse> {
    Json(GenresResponse {
        genres: state.catalog.genres(),
    })
}

/// GET /api/v1/contexts
///
/// The fixed context labels, verbatim, in declaration order.
pub async fn list_contexts() -> Json<ContextsResponse> {
    Json(ContextsResponse {
        contexts: CONTEXTS.iter().map(|c| c.as_str()).collect(),
    })
}

/// Query parameters for GET /api/v1/top
#[derive(Debug, Deserialize)]
pub struct TopParams {
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub top_n: Option<String>,
}

/// GET /api/v1/top
///
/// Top-N tracks, optionally filtered by genre and ranked by a context's
/// probability; without a context, ranked by the weighted global score.
pub async fn top_tracks(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> Result<Json<TracksResponse>, AppError> {
    let top_n = parse_top_n(params.top_n.as_deref(), DEFAULT_TOP_N);
    let context = parse_context(params.context.as_deref())?;
    let genre = nonempty(&params.genre);

    debug!(?genre, ?context, top_n, "Ranking top tracks");

    Ok(Json(TracksResponse {
        tracks: state.catalog.top(genre, context, top_n),
    }))
}

/// Query parameters for GET /api/v1/top_by_genre
#[derive(Debug, Deserialize)]
pub struct TopByGenreParams {
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub top_n: Option<String>,
}

/// GET /api/v1/top_by_genre
///
/// Top-N tracks for one genre, ranked by the weighted global score. An
/// empty genre yields an empty result, not an error.
pub async fn top_tracks_by_genre(
    State(state): State<AppState>,
    Query(params): Query<TopByGenreParams>,
) -> Json<TracksResponse> {
    let Some(genre) = nonempty(&params.genre) else {
        return Json(TracksResponse { tracks: Vec::new() });
    };

    let top_n = parse_top_n(params.top_n.as_deref(), DEFAULT_TOP_N);
    Json(TracksResponse {
        tracks: state.catalog.top(Some(genre), None, top_n),
    })
}

/// Query parameters for GET /api/v1/top_by_context
#[derive(Debug, Deserialize)]
pub struct TopByContextParams {
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub top_n: Option<String>,
}

/// GET /api/v1/top_by_context
///
/// Top-N tracks ranked by one context's probability. An empty context
/// yields an empty result; an unknown one is a validation error.
pub async fn top_tracks_by_context(
    State(state): State<AppState>,
    Query(params): Query<TopByContextParams>,
) -> Result<Json<TracksResponse>, AppError> {
    if nonempty(&params.context).is_none() {
        return Ok(Json(TracksResponse { tracks: Vec::new() }));
    }

    let context = parse_context(params.context.as_deref())?;
    let top_n = parse_top_n(params.top_n.as_deref(), DEFAULT_TOP_N);

    Ok(Json(TracksResponse {
        tracks: state.catalog.top(None, context, top_n),
    }))
}

/// Query parameters for GET /api/v1/search_ranked
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub top_n: Option<String>,
}

/// GET /api/v1/search_ranked
///
/// Case-insensitive substring search over track name, artist name, and
/// genre, with the same filter/sort/truncate rules as /top. An empty query
/// yields an empty result before any other validation runs.
pub async fn search_ranked(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<TracksResponse>, AppError> {
    let q = params.q.as_deref().unwrap_or("").trim();
    if q.is_empty() {
        return Ok(Json(TracksResponse { tracks: Vec::new() }));
    }

    let top_n = parse_top_n(params.top_n.as_deref(), DEFAULT_SEARCH_TOP_N);
    let context = parse_context(params.context.as_deref())?;
    let genre = nonempty(&params.genre);

    debug!(q, ?genre, ?context, top_n, "Ranked search");

    Ok(Json(TracksResponse {
        tracks: state.catalog.search(q, genre, context, top_n),
    }))
}

/// POST /api/v1/predict
///
/// Precomputed per-context probabilities for one track. Reads only the
/// scored table; no live inference happens here.
pub async fn predict_track_contexts(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<serde_json::Value>,
) -> Result<Json<PredictResponse>, AppError> {
    let id = body
        .get("id")
        .and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
        })
        .ok_or_else(|| AppError::BadRequest("Invalid JSON or id".to_string()))?;

    if id < 0 || id as usize >= state.catalog.len() {
        return Err(AppError::BadRequest("Track id out of range".to_string()));
    }
    let id = id as usize;

    // Lookup cannot fail after the range check above.
    let track = state
        .catalog
        .track(id)
        .ok_or_else(|| AppError::Internal("Scored track missing".to_string()))?;

    let scores = CONTEXTS
        .iter()
        .map(|&context| ContextScore {
            context,
            probability: track.probabilities[context.index()],
        })
        .collect();

    Ok(Json(PredictResponse {
        id,
        scores,
        best: BestScore {
            context: track.best_context,
            probability: track.best_probability,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_top_n_fallback() {
        assert_eq!(parse_top_n(None, 20), 20);
        assert_eq!(parse_top_n(Some("5"), 20), 5);
        assert_eq!(parse_top_n(Some("abc"), 20), 20);
        assert_eq!(parse_top_n(Some("-3"), 20), 20);
        assert_eq!(parse_top_n(Some(""), 50), 50);
    }

    #[test]
    fn test_parse_context() {
        assert_eq!(parse_context(None).unwrap(), None);
        assert_eq!(parse_context(Some("")).unwrap(), None);
        assert_eq!(
            parse_context(Some("party")).unwrap(),
            Some(Context::Party)
        );
        assert!(parse_context(Some("bogus")).is_err());
    }
}
