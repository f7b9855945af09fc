//! Response body that ties session teardown to its own lifetime.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use undertow_core::swarm::ByteStream;

use super::lifecycle::Lifecycle;

/// Byte stream that keeps the request lifecycle alive until the transfer
/// ends.
///
/// Dropping the body, whether through normal completion or a client that
/// walked away mid-stream, drops the lifecycle, which tears the swarm
/// session down.
struct GuardedStream {
    inner: ByteStream,
    _lifecycle: Lifecycle,
}

impl Stream for GuardedStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.poll_next_unpin(cx)
    }
}

/// Wraps a swarm read stream into a response body owning `lifecycle`.
pub fn guarded_body(stream: ByteStream, lifecycle: Lifecycle) -> Body {
    Body::from_stream(GuardedStream {
        inner: stream,
        _lifecycle: lifecycle,
    })
}
