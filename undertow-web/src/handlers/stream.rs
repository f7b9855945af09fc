//! Magnet streaming handler.
//!
//! One request = one swarm session. The handler races swarm readiness
//! against the configured timeout, with a client disconnect able to cancel
//! the whole future at any await point. Whichever trigger wins owns the
//! response; teardown of the session is funneled through the lifecycle so
//! the engine's destroy runs exactly once per request.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};
use undertow_core::media::select_playable;
use undertow_core::swarm::SwarmError;

use super::range::negotiate_range;
use crate::server::AppState;
use crate::streaming::{Lifecycle, guarded_body, response};

/// Query parameters for streaming requests
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    /// Magnet URI identifying the swarm
    pub magnet: Option<String>,
}

/// Failures that escape the handled response paths and become a 500.
#[derive(Debug, thiserror::Error)]
enum StreamFailure {
    #[error(transparent)]
    Swarm(#[from] SwarmError),

    #[error("response build rejected: {0}")]
    Response(StatusCode),
}

impl From<StatusCode> for StreamFailure {
    fn from(status: StatusCode) -> Self {
        Self::Response(status)
    }
}

/// Streaming endpoint: `GET /api/stream?magnet=<uri>`.
pub async fn stream_magnet(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(magnet) = query.magnet.filter(|magnet| !magnet.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "err": "magnet query value is required" })),
        )
            .into_response();
    };

    let range_header = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());

    match serve_stream(&state, &magnet, range_header).await {
        Ok(response) => response,
        Err(error) => {
            warn!(%magnet, %error, "stream request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
                .into_response()
        }
    }
}

/// Runs the request lifecycle once the magnet parameter is known good.
///
/// Handled outcomes (timeout, no playable file, bad range) come back as
/// `Ok` responses; only genuinely unexpected failures surface as errors
/// for the 500 path.
async fn serve_stream(
    state: &AppState,
    magnet: &str,
    range_header: Option<&str>,
) -> Result<Response, StreamFailure> {
    let session = state.engine().open(magnet)?;
    let mut lifecycle = Lifecycle::new(session);

    let timeout = state.config().stream.readiness_timeout;
    let became_ready = if timeout.is_zero() {
        lifecycle.session().ready().await;
        true
    } else {
        tokio::time::timeout(timeout, lifecycle.session().ready())
            .await
            .is_ok()
    };

    if !became_ready {
        info!(magnet, ?timeout, "swarm discovery timed out");
        lifecycle.observe_timeout();
        lifecycle.teardown().await;
        return Ok((
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Could not stream the given magnet URI : Time Out." })),
        )
            .into_response());
    }

    lifecycle.observe_ready();
    let files = lifecycle.session().files();

    let media = match select_playable(&files) {
        Ok(media) => media,
        Err(error) => {
            info!(magnet, %error, "destroying session, nothing playable");
            lifecycle.teardown().await;
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(json!({ "err": "mp4 file not found :(" })),
            )
                .into_response());
        }
    };
    info!(file = %media.file.name, length = media.file.length, "streaming file");

    let range = match negotiate_range(range_header, media.file.length) {
        Ok(range) => range,
        Err(error) => {
            debug!(?range_header, %error, "rejecting range request");
            let total = media.file.length;
            lifecycle.teardown().await;
            return Ok(response::range_not_satisfiable(total)?);
        }
    };

    match range {
        None => {
            let end = media.file.length.saturating_sub(1);
            let stream = lifecycle.session().stream_range(media.file.index, 0, end);
            let body = guarded_body(stream, lifecycle);
            Ok(response::full_content(media.kind, media.file.length, body)?)
        }
        Some(range) => {
            let stream = lifecycle
                .session()
                .stream_range(media.file.index, range.start, range.end);
            let body = guarded_body(stream, lifecycle);
            Ok(response::partial_content(&range, body)?)
        }
    }
}
