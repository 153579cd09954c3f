use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::{AudioFilter, ScratchKey};

/// Output of a link-sourced transcode.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkTranscode {
    pub output: PathBuf,
    pub source_title: String,
}

#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Writes `data` to scratch space and produces the filtered
    /// `{key}-1.mp3`.
    async fn filter_by_file(
        &self,
        data: &[u8],
        key: &ScratchKey,
        filter: AudioFilter,
    ) -> Result<PathBuf, TranscoderError>;

    /// Resolves a playable stream for `source_url`, rejects it before
    /// download if it is live, reports no duration, or exceeds the ceiling,
    /// then runs the same filter pipeline.
    async fn filter_by_link(
        &self,
        source_url: &str,
        key: &ScratchKey,
        filter: AudioFilter,
    ) -> Result<LinkTranscode, TranscoderError>;

    /// Duration of the produced file in seconds.
    async fn measure_duration(&self, path: &Path) -> Result<f64, TranscoderError>;

    /// Best-effort removal of every scratch file for `key`.
    async fn cleanup(&self, key: &ScratchKey);
}

#[derive(Debug, thiserror::Error)]
pub enum TranscoderError {
    #[error("audio is too long: {seconds:.1}s (max {max_seconds}s)")]
    TooLong { seconds: f64, max_seconds: u64 },
    #[error("source has no fixed duration: {0}")]
    UnboundedSource(String),
    #[error("unreadable media: {0}")]
    UnreadableMedia(String),
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("process failed: {0}")]
    ProcessFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
