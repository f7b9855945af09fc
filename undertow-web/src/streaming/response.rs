//! Response construction for full, partial and unsatisfiable deliveries.
//!
//! Emits status, headers and streamed body per RFC 7233 semantics. Headers
//! are written exactly once per request; callers pick exactly one of these
//! constructors.

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;
use undertow_core::media::MediaKind;

use crate::handlers::range::ByteRange;

/// 200 with the entire file streamed.
///
/// # Errors
/// Returns StatusCode error if response building fails
pub fn full_content(kind: MediaKind, total: u64, body: Body) -> Result<Response, StatusCode> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, kind.content_type())
        .header(header::CONTENT_LENGTH, total.to_string())
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// 206 with the inclusive `[start, end]` sub-sequence streamed.
///
/// Partial delivery always advertises `video/mp4`, also for `.mkv`
/// selections.
///
/// # Errors
/// Returns StatusCode error if response building fails
pub fn partial_content(range: &ByteRange, body: Body) -> Result<Response, StatusCode> {
    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(
            header::CONTENT_RANGE,
            format!("bytes {}-{}/{}", range.start, range.end, range.total),
        )
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_LENGTH, range.chunk_size().to_string())
        .header(header::CONTENT_TYPE, MediaKind::Mp4.content_type())
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// 416 with an empty body.
///
/// # Errors
/// Returns StatusCode error if response building fails
pub fn range_not_satisfiable(total: u64) -> Result<Response, StatusCode> {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(header::CONTENT_RANGE, format!("bytes */{total}"))
        .body(Body::empty())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
