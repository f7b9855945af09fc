//! End-to-end tests for the streaming endpoint.
//!
//! Drives the real router against the simulated swarm engine and checks the
//! full request lifecycle: status line, headers, streamed bytes, and the
//! exactly-once session teardown.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use undertow_core::UndertowConfig;
use undertow_core::swarm::{Readiness, SimFile, SimSwarmEngine};
use undertow_web::{AppState, router};

const MAGNET: &str = "magnet:?xt=urn:btih:deadbeefcafebabe";

fn app(engine: Arc<SimSwarmEngine>, config: UndertowConfig) -> Router {
    router(AppState::new(engine, config))
}

fn config_with_timeout(timeout: Duration) -> UndertowConfig {
    let mut config = UndertowConfig::default();
    config.stream.readiness_timeout = timeout;
    config
}

async fn get(app: Router, uri: &str, range: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().uri(uri);
    if let Some(range) = range {
        request = request.header(header::RANGE, range);
    }
    app.oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn stream_uri() -> String {
    format!("/api/stream?magnet={MAGNET}")
}

fn pattern(range: std::ops::Range<usize>) -> Vec<u8> {
    range.map(|i| (i % 251) as u8).collect()
}

/// Waits out the spawned teardown task after a body drop.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_full_delivery_without_range() {
    let engine = Arc::new(SimSwarmEngine::new(vec![SimFile::patterned(
        "movie.mp4",
        1000,
    )]));
    let app = app(engine.clone(), UndertowConfig::default());

    let response = get(app, &stream_uri(), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "video/mp4"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_LENGTH).unwrap(),
        "1000"
    );
    assert_eq!(body_bytes(response).await, pattern(0..1000));

    settle().await;
    assert_eq!(engine.sessions()[0].destroy_count(), 1);
}

#[tokio::test]
async fn test_partial_delivery_closed_range() {
    let engine = Arc::new(SimSwarmEngine::new(vec![SimFile::patterned(
        "movie.mp4",
        1000,
    )]));
    let app = app(engine.clone(), UndertowConfig::default());

    let response = get(app, &stream_uri(), Some("bytes=100-199")).await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers().get(header::CONTENT_RANGE).unwrap(),
        "bytes 100-199/1000"
    );
    assert_eq!(
        response.headers().get(header::ACCEPT_RANGES).unwrap(),
        "bytes"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_LENGTH).unwrap(),
        "100"
    );
    assert_eq!(body_bytes(response).await, pattern(100..200));

    settle().await;
    assert_eq!(engine.sessions()[0].destroy_count(), 1);
}

#[tokio::test]
async fn test_partial_delivery_open_ended_range() {
    let engine = Arc::new(SimSwarmEngine::new(vec![SimFile::patterned(
        "movie.mp4",
        1000,
    )]));
    let app = app(engine.clone(), UndertowConfig::default());

    let response = get(app, &stream_uri(), Some("bytes=900-")).await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers().get(header::CONTENT_RANGE).unwrap(),
        "bytes 900-999/1000"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_LENGTH).unwrap(),
        "100"
    );
    assert_eq!(body_bytes(response).await, pattern(900..1000));
}

#[tokio::test]
async fn test_unsatisfiable_range() {
    let engine = Arc::new(SimSwarmEngine::new(vec![SimFile::patterned(
        "movie.mp4",
        1000,
    )]));
    let app = app(engine.clone(), UndertowConfig::default());

    let response = get(app, &stream_uri(), Some("bytes=2000-2100")).await;

    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(
        response.headers().get(header::CONTENT_RANGE).unwrap(),
        "bytes */1000"
    );
    assert!(body_bytes(response).await.is_empty());
    assert_eq!(engine.sessions()[0].destroy_count(), 1);
}

#[tokio::test]
async fn test_malformed_range_rejected_as_unsatisfiable() {
    let engine = Arc::new(SimSwarmEngine::new(vec![SimFile::patterned(
        "movie.mp4",
        1000,
    )]));
    let app = app(engine.clone(), UndertowConfig::default());

    let response = get(app, &stream_uri(), Some("bytes=abc-")).await;

    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    assert_eq!(engine.sessions()[0].destroy_count(), 1);
}

#[tokio::test]
async fn test_missing_magnet_is_rejected() {
    let engine = Arc::new(SimSwarmEngine::new(vec![SimFile::patterned(
        "movie.mp4",
        1000,
    )]));
    let app_router = app(engine.clone(), UndertowConfig::default());

    let response = get(app_router.clone(), "/api/stream", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "err": "magnet query value is required" })
    );

    // An empty value counts as missing.
    let response = get(app_router, "/api/stream?magnet=", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(engine.sessions().is_empty());
}

#[tokio::test]
async fn test_no_playable_media() {
    let engine = Arc::new(SimSwarmEngine::new(vec![
        SimFile::patterned("a.avi", 100),
        SimFile::patterned("b.txt", 100),
    ]));
    let app = app(engine.clone(), UndertowConfig::default());

    let response = get(app, &stream_uri(), None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "err": "mp4 file not found :(" })
    );
    assert_eq!(engine.sessions()[0].destroy_count(), 1);
}

#[tokio::test]
async fn test_mkv_fallback_advertised_on_full_delivery() {
    let engine = Arc::new(SimSwarmEngine::new(vec![SimFile::patterned(
        "movie.mkv",
        500,
    )]));
    let app = app(engine.clone(), UndertowConfig::default());

    let response = get(app, &stream_uri(), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "video/mkv"
    );
}

#[tokio::test]
async fn test_partial_delivery_always_advertises_mp4() {
    let engine = Arc::new(SimSwarmEngine::new(vec![SimFile::patterned(
        "movie.mkv",
        500,
    )]));
    let app = app(engine.clone(), UndertowConfig::default());

    let response = get(app, &stream_uri(), Some("bytes=0-99")).await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "video/mp4"
    );
}

#[tokio::test]
async fn test_mp4_preferred_over_mkv() {
    let engine = Arc::new(SimSwarmEngine::new(vec![
        SimFile::patterned("b.mkv", 700),
        SimFile::patterned("a.mp4", 300),
    ]));
    let app = app(engine.clone(), UndertowConfig::default());

    let response = get(app, &stream_uri(), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_LENGTH).unwrap(),
        "300"
    );
}

#[tokio::test]
async fn test_timeout_when_readiness_never_arrives() {
    let engine = Arc::new(
        SimSwarmEngine::new(vec![SimFile::patterned("movie.mp4", 100)])
            .with_readiness(Readiness::Never),
    );
    let app = app(
        engine.clone(),
        config_with_timeout(Duration::from_millis(50)),
    );

    let response = get(app, &stream_uri(), None).await;

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Could not stream the given magnet URI : Time Out." })
    );
    assert_eq!(engine.sessions()[0].destroy_count(), 1);
}

#[tokio::test]
async fn test_no_timeout_when_readiness_wins_the_race() {
    let engine = Arc::new(
        SimSwarmEngine::new(vec![SimFile::patterned("movie.mp4", 100)])
            .with_readiness(Readiness::Delayed(Duration::from_millis(10))),
    );
    let app = app(
        engine.clone(),
        config_with_timeout(Duration::from_millis(500)),
    );

    let response = get(app, &stream_uri(), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_zero_timeout_disables_the_deadline() {
    let engine = Arc::new(
        SimSwarmEngine::new(vec![SimFile::patterned("movie.mp4", 100)])
            .with_readiness(Readiness::Delayed(Duration::from_millis(100))),
    );
    let app = app(engine.clone(), config_with_timeout(Duration::ZERO));

    let response = get(app, &stream_uri(), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_engine_open_failure_yields_internal_error() {
    let engine = Arc::new(SimSwarmEngine::failing());
    let app = app(engine, UndertowConfig::default());

    let response = get(app, &stream_uri(), None).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Internal Server Error" })
    );
}

#[tokio::test]
async fn test_disconnect_after_headers_destroys_session() {
    let engine = Arc::new(SimSwarmEngine::new(vec![SimFile::patterned(
        "movie.mp4",
        1000,
    )]));
    let app = app(engine.clone(), UndertowConfig::default());

    let response = get(app, &stream_uri(), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    // Client walks away without consuming the body.
    drop(response);

    settle().await;
    assert_eq!(engine.sessions()[0].destroy_count(), 1);
}

#[tokio::test]
async fn test_disconnect_while_pending_destroys_session() {
    let engine = Arc::new(
        SimSwarmEngine::new(vec![SimFile::patterned("movie.mp4", 100)])
            .with_readiness(Readiness::Never),
    );
    let app = app(engine.clone(), config_with_timeout(Duration::from_secs(5)));

    let request = Request::builder()
        .uri(stream_uri())
        .body(Body::empty())
        .unwrap();
    let in_flight = tokio::spawn(async move { app.oneshot(request).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(engine.sessions().len(), 1);
    assert_eq!(engine.sessions()[0].destroy_count(), 0);

    in_flight.abort();
    settle().await;
    assert_eq!(engine.sessions()[0].destroy_count(), 1);
}
