//! HTTP Range header negotiation for media streaming.
//!
//! Parses a client's `Range` request header into a concrete byte interval
//! validated against the selected file's length. Only single simple ranges
//! (`bytes=start-end`, `bytes=start-`) are supported; of a comma-separated
//! list only the first segment is considered.

use thiserror::Error;

/// A validated inclusive byte interval within a file.
///
/// Invariant: `0 <= start <= end <= total - 1`. Construction goes through
/// [`negotiate_range`], which rejects everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl ByteRange {
    /// Number of bytes the interval covers.
    pub fn chunk_size(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Range negotiation failures. Both map to 416.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("range start beyond file bounds or inverted interval")]
    Unsatisfiable,
    #[error("malformed range header")]
    Malformed,
}

/// Parses an optional `Range` header against a file of `total` bytes.
///
/// Returns `Ok(None)` when no header is present, in which case the caller
/// serves the full file. An open-ended `bytes=start-` runs to the end of
/// the file; an `end` past the last byte is clamped to it.
///
/// # Examples
/// ```
/// use undertow_web::handlers::range::negotiate_range;
///
/// let range = negotiate_range(Some("bytes=100-199"), 1000).unwrap().unwrap();
/// assert_eq!((range.start, range.end, range.chunk_size()), (100, 199, 100));
/// ```
///
/// # Errors
///
/// - `RangeError::Unsatisfiable` - `start >= total` or `start > end`
/// - `RangeError::Malformed` - missing `bytes=` prefix, missing dash, or
///   non-numeric bounds (including suffix forms like `bytes=-500`)
pub fn negotiate_range(header: Option<&str>, total: u64) -> Result<Option<ByteRange>, RangeError> {
    let Some(raw) = header else {
        return Ok(None);
    };

    let range_spec = raw.strip_prefix("bytes=").ok_or(RangeError::Malformed)?;
    // Multi-range requests collapse to their first segment.
    let first = range_spec.split(',').next().unwrap_or(range_spec).trim();

    let (start_str, end_str) = first.split_once('-').ok_or(RangeError::Malformed)?;
    let start: u64 = start_str
        .trim()
        .parse()
        .map_err(|_| RangeError::Malformed)?;
    let end: u64 = if end_str.trim().is_empty() {
        total.saturating_sub(1)
    } else {
        end_str.trim().parse().map_err(|_| RangeError::Malformed)?
    };

    if start >= total || start > end {
        return Err(RangeError::Unsatisfiable);
    }

    Ok(Some(ByteRange {
        start,
        end: end.min(total.saturating_sub(1)),
        total,
    }))
}
