//! Integration tests for API endpoints.
//!
//! These tests verify the API endpoints work correctly without requiring a
//! real model artifact: the scored table is built directly from probability
//! rows, which is all the query surface ever reads.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use context_ranker::catalog::{ScoredCatalog, ScoredTrack};
use context_ranker::config::AppConfig;
use context_ranker::server::{create_router, AppState};

fn track(name: &str, artist: &str, genre: &str, probs: [f32; 5]) -> ScoredTrack {
    ScoredTrack::from_probabilities(
        name.to_string(),
        artist.to_string(),
        genre.to_string(),
        probs,
    )
}

/// Four tracks with hand-picked probabilities.
///
/// Weighted scores (weights 0.25/0.20/0.25/0.20/0.10):
/// row 0: 0.36, row 1: 0.33, row 2: 0.3765, row 3: 0.325
fn sample_catalog() -> ScoredCatalog {
    ScoredCatalog::from_tracks(vec![
        track("Lose Yourself", "Eminem", "hip hop", [0.9, 0.4, 0.1, 0.05, 0.2]),
        track("Levels", "Avicii", "edm", [0.5, 0.8, 0.1, 0.05, 0.1]),
        track("Weightless", "Marconi Union", "ambient", [0.05, 0.02, 0.6, 0.9, 0.3]),
        track("Yellow", "Coldplay", "hip hop", [0.2, 0.1, 0.7, 0.3, 0.2]),
    ])
}

fn create_test_server() -> TestServer {
    let state = AppState::new(AppConfig::default(), sample_catalog());
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn track_ids(body: &Value) -> Vec<u64> {
    body["tracks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/api/v1/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["tracks"], 4);
}

#[tokio::test]
async fn test_genres_sorted_and_deduped() {
    let server = create_test_server();

    let response = server.get("/api/v1/genres").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["genres"],
        serde_json::json!(["ambient", "edm", "hip hop"])
    );
}

#[tokio::test]
async fn test_contexts_fixed_order() {
    let server = create_test_server();

    let response = server.get("/api/v1/contexts").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body["contexts"],
        serde_json::json!(["workout", "party", "focus", "sleep_relax", "art"])
    );
}

#[tokio::test]
async fn test_top_default_sorts_by_weighted_score() {
    let server = create_test_server();

    let response = server.get("/api/v1/top").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(track_ids(&body), [2, 0, 1, 3]);

    // Without a context, the row's own best pair is emitted
    let first = &body["tracks"][0];
    assert_eq!(first["best_context"], "sleep_relax");
    assert!((first["probability"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    assert_eq!(first["track_name"], "Weightless");
    assert_eq!(first["artist_name"], "Marconi Union");
    assert_eq!(first["genre"], "ambient");
}

#[tokio::test]
async fn test_top_n_truncates_after_sorting() {
    let server = create_test_server();

    let response = server.get("/api/v1/top").add_query_param("top_n", "1").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(track_ids(&body), [2]);
}

#[tokio::test]
async fn test_top_with_context_sorts_by_that_probability() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/top")
        .add_query_param("context", "party")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    // party probabilities: 0.4, 0.8, 0.02, 0.1
    assert_eq!(track_ids(&body), [1, 0, 3, 2]);

    for hit in body["tracks"].as_array().unwrap() {
        assert_eq!(hit["best_context"], "party");
    }
    assert!((body["tracks"][0]["probability"].as_f64().unwrap() - 0.8).abs() < 1e-6);
}

#[tokio::test]
async fn test_top_with_genre_filter() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/top")
        .add_query_param("genre", "hip hop")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(track_ids(&body), [0, 3]);
}

#[tokio::test]
async fn test_top_unknown_context_is_bad_request() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/top")
        .add_query_param("context", "bogus")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["detail"].as_str().unwrap().contains("context"));
}

#[tokio::test]
async fn test_top_unparsable_top_n_falls_back_to_default() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/top")
        .add_query_param("top_n", "not-a-number")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["tracks"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_top_by_genre() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/top_by_genre")
        .add_query_param("genre", "hip hop")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(track_ids(&body), [0, 3]);
    // best_context stays the row's own best here
    assert_eq!(body["tracks"][0]["best_context"], "workout");
}

#[tokio::test]
async fn test_top_by_genre_empty_genre_yields_empty() {
    let server = create_test_server();

    let response = server.get("/api/v1/top_by_genre").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["tracks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_top_by_context() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/top_by_context")
        .add_query_param("context", "focus")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    // focus probabilities: 0.1, 0.1, 0.6, 0.7; rows 0 and 1 tie and keep
    // their relative row order
    assert_eq!(track_ids(&body), [3, 2, 0, 1]);
}

#[tokio::test]
async fn test_top_by_context_empty_yields_empty() {
    let server = create_test_server();

    let response = server.get("/api/v1/top_by_context").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["tracks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_top_by_context_unknown_is_bad_request() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/top_by_context")
        .add_query_param("context", "gym")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_matches_artist_case_insensitively() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/search_ranked")
        .add_query_param("q", "coldplay")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(track_ids(&body), [3]);
    assert_eq!(body["tracks"][0]["artist_name"], "Coldplay");
}

#[tokio::test]
async fn test_search_empty_query_yields_empty() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/search_ranked")
        .add_query_param("q", "")
        .add_query_param("genre", "hip hop")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["tracks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_empty_query_wins_over_context_validation() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/search_ranked")
        .add_query_param("q", "  ")
        .add_query_param("context", "bogus")
        .await;

    // The empty-query check runs before context validation
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["tracks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_with_unknown_context_is_bad_request() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/search_ranked")
        .add_query_param("q", "levels")
        .add_query_param("context", "bogus")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_ranked_by_context() {
    let server = create_test_server();

    // "e" matches every track name or artist in the fixture
    let response = server
        .get("/api/v1/search_ranked")
        .add_query_param("q", "e")
        .add_query_param("context", "workout")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let ids = track_ids(&body);
    assert_eq!(ids[0], 0); // highest workout probability
    for hit in body["tracks"].as_array().unwrap() {
        assert_eq!(hit["best_context"], "workout");
    }
}

#[tokio::test]
async fn test_predict_returns_all_contexts_in_order() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/predict")
        .json(&serde_json::json!({ "id": 0 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], 0);

    let scores = body["scores"].as_array().unwrap();
    let labels: Vec<&str> = scores
        .iter()
        .map(|s| s["context"].as_str().unwrap())
        .collect();
    assert_eq!(labels, ["workout", "party", "focus", "sleep_relax", "art"]);

    assert_eq!(body["best"]["context"], "workout");
    assert!((body["best"]["probability"].as_f64().unwrap() - 0.9).abs() < 1e-6);
}

#[tokio::test]
async fn test_predict_accepts_string_id() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/predict")
        .json(&serde_json::json!({ "id": "2" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], 2);
}

#[tokio::test]
async fn test_predict_out_of_range_ids() {
    let server = create_test_server();

    let below = server
        .post("/api/v1/predict")
        .json(&serde_json::json!({ "id": -1 }))
        .await;
    below.assert_status(StatusCode::BAD_REQUEST);

    // row_count itself is out of range
    let above = server
        .post("/api/v1/predict")
        .json(&serde_json::json!({ "id": 4 }))
        .await;
    above.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_predict_missing_or_invalid_id() {
    let server = create_test_server();

    let missing = server
        .post("/api/v1/predict")
        .json(&serde_json::json!({}))
        .await;
    missing.assert_status(StatusCode::BAD_REQUEST);

    let wrong_type = server
        .post("/api/v1/predict")
        .json(&serde_json::json!({ "id": "abc" }))
        .await;
    wrong_type.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_predict_malformed_body() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/predict")
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_repeated_queries_are_identical() {
    let server = create_test_server();

    let first = server
        .get("/api/v1/top")
        .add_query_param("context", "focus")
        .await;
    let second = server
        .get("/api/v1/top")
        .add_query_param("context", "focus")
        .await;

    first.assert_status_ok();
    second.assert_status_ok();
    assert_eq!(first.text(), second.text());
}
