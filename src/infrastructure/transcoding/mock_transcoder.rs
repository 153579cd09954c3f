use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::application::ports::{LinkTranscode, Transcoder, TranscoderError};
use crate::domain::{AudioFilter, ScratchKey};

pub const MOCK_SOURCE_TITLE: &str = "Mock Source Title";

/// Writes the input bytes straight through as the "filtered" output and
/// reports a fixed duration.
pub struct MockTranscoder {
    scratch_dir: PathBuf,
    duration_seconds: f64,
    max_duration_secs: u64,
}

impl MockTranscoder {
    pub fn new(
        scratch_dir: impl Into<PathBuf>,
        duration_seconds: f64,
        max_duration_secs: u64,
    ) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            duration_seconds,
            max_duration_secs,
        }
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    async fn filter_by_file(
        &self,
        data: &[u8],
        key: &ScratchKey,
        _filter: AudioFilter,
    ) -> Result<PathBuf, TranscoderError> {
        tokio::fs::create_dir_all(&self.scratch_dir).await?;
        let output = self.scratch_dir.join(key.output_file_name());
        tokio::fs::write(&output, data).await?;
        Ok(output)
    }

    async fn filter_by_link(
        &self,
        _source_url: &str,
        key: &ScratchKey,
        filter: AudioFilter,
    ) -> Result<LinkTranscode, TranscoderError> {
        let output = self.filter_by_file(b"mock", key, filter).await?;
        Ok(LinkTranscode {
            output,
            source_title: MOCK_SOURCE_TITLE.to_string(),
        })
    }

    async fn measure_duration(&self, _path: &Path) -> Result<f64, TranscoderError> {
        if self.duration_seconds > self.max_duration_secs as f64 {
            return Err(TranscoderError::TooLong {
                seconds: self.duration_seconds,
                max_seconds: self.max_duration_secs,
            });
        }
        Ok(self.duration_seconds)
    }

    async fn cleanup(&self, key: &ScratchKey) {
        let _ = tokio::fs::remove_file(self.scratch_dir.join(key.output_file_name())).await;
    }
}
