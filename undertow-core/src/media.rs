//! Playable file selection for discovered swarms.
//!
//! A swarm usually carries one video file next to samples, subtitles and
//! text files. Selection is deliberately dumb: first `.mp4` in list order,
//! then first `.mkv`, nothing else.

use crate::swarm::SwarmFile;

/// Video container kinds Undertow knows how to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// MP4 container format
    Mp4,
    /// Matroska container format
    Mkv,
}

impl MediaKind {
    /// Returns the `Content-Type` value advertised for this container.
    pub fn content_type(self) -> &'static str {
        match self {
            MediaKind::Mp4 => "video/mp4",
            MediaKind::Mkv => "video/mkv",
        }
    }

    /// File extension associated with this container, including the dot.
    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::Mp4 => ".mp4",
            MediaKind::Mkv => ".mkv",
        }
    }
}

/// The file chosen for streaming together with its container kind.
#[derive(Debug, Clone)]
pub struct SelectedMedia {
    pub file: SwarmFile,
    pub kind: MediaKind,
}

/// Errors from playable file selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    #[error("no playable media file in swarm")]
    NoPlayableMedia,
}

/// Picks the playable file out of a discovered file list.
///
/// Scans for the first `.mp4` entry in list order; if the swarm carries
/// none, falls back to the first `.mkv`. No size or bitrate heuristics.
///
/// # Errors
///
/// - `MediaError::NoPlayableMedia` - The list contains neither container
pub fn select_playable(files: &[SwarmFile]) -> Result<SelectedMedia, MediaError> {
    for kind in [MediaKind::Mp4, MediaKind::Mkv] {
        if let Some(file) = files.iter().find(|f| f.name.ends_with(kind.extension())) {
            return Ok(SelectedMedia {
                file: file.clone(),
                kind,
            });
        }
    }
    Err(MediaError::NoPlayableMedia)
}
