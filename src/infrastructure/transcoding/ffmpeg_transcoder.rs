use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Semaphore;

use crate::application::ports::{LinkTranscode, Transcoder, TranscoderError};
use crate::domain::{AudioFilter, ScratchKey};
use crate::presentation::config::TranscoderSettings;

use super::duration_probe::probe_duration;
use super::filter_args::filter_args;
use super::stream_source::{resolve_source, select_stream};

const STDERR_TAIL_CHARS: usize = 500;

/// Shells out to ffmpeg (and yt-dlp for links). Scratch files live in
/// `scratch_dir`, named after the [`ScratchKey`].
pub struct FfmpegTranscoder {
    ffmpeg_path: PathBuf,
    ytdlp_path: PathBuf,
    scratch_dir: PathBuf,
    impulse_response: PathBuf,
    max_duration_secs: u64,
    permits: Arc<Semaphore>,
}

impl FfmpegTranscoder {
    pub fn new(settings: &TranscoderSettings) -> Result<Self, TranscoderError> {
        let scratch_dir = PathBuf::from(&settings.scratch_dir);
        std::fs::create_dir_all(&scratch_dir)?;

        tracing::info!(
            ffmpeg = %settings.ffmpeg_path,
            scratch_dir = %scratch_dir.display(),
            max_concurrent_jobs = settings.max_concurrent_jobs,
            "Transcoder initialized"
        );

        Ok(Self {
            ffmpeg_path: PathBuf::from(&settings.ffmpeg_path),
            ytdlp_path: PathBuf::from(&settings.ytdlp_path),
            scratch_dir,
            impulse_response: PathBuf::from(&settings.impulse_response_path),
            max_duration_secs: settings.max_duration_secs,
            permits: Arc::new(Semaphore::new(settings.max_concurrent_jobs.max(1))),
        })
    }

    fn scratch_path(&self, file_name: &str) -> PathBuf {
        self.scratch_dir.join(file_name)
    }

    fn check_ceiling(&self, seconds: f64) -> Result<(), TranscoderError> {
        if seconds > self.max_duration_secs as f64 {
            return Err(TranscoderError::TooLong {
                seconds,
                max_seconds: self.max_duration_secs,
            });
        }
        Ok(())
    }

    async fn run_ffmpeg(
        &self,
        input: &str,
        output: &Path,
        filter: AudioFilter,
    ) -> Result<(), TranscoderError> {
        let _permit = self.permits.acquire().await.map_err(|e| {
            TranscoderError::ProcessFailed(format!("transcode slots closed: {}", e))
        })?;

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .args(["-y", "-hide_banner", "-loglevel", "error", "-i", input])
            .args(filter_args(filter, &self.impulse_response))
            .args(["-t", &output_cap_secs(self.max_duration_secs)])
            .args(["-c:a", "libmp3lame", "-b:a", "192k"])
            .arg(output)
            .kill_on_drop(true);

        tracing::debug!(%filter, output = %output.display(), "Running ffmpeg");
        let result = command
            .output()
            .await
            .map_err(|e| TranscoderError::ProcessFailed(format!("spawn ffmpeg: {}", e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(TranscoderError::ProcessFailed(format!(
                "ffmpeg exited with {}: {}",
                result.status,
                stderr_tail(&stderr)
            )));
        }

        Ok(())
    }
}

/// Hard cap on output length, one second past the ceiling so an over-long
/// source still measures as too long.
fn output_cap_secs(max_duration_secs: u64) -> String {
    max_duration_secs.saturating_add(1).to_string()
}

fn stderr_tail(stderr: &str) -> &str {
    let trimmed = stderr.trim();
    let skip = trimmed.chars().count().saturating_sub(STDERR_TAIL_CHARS);
    match trimmed.char_indices().nth(skip) {
        Some((start, _)) => &trimmed[start..],
        None => trimmed,
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    #[tracing::instrument(skip(self, data, key), fields(key = %key, bytes = data.len()))]
    async fn filter_by_file(
        &self,
        data: &[u8],
        key: &ScratchKey,
        filter: AudioFilter,
    ) -> Result<PathBuf, TranscoderError> {
        let input = self.scratch_path(&key.input_file_name());
        let output = self.scratch_path(&key.output_file_name());
        tokio::fs::write(&input, data).await?;

        self.run_ffmpeg(&input.to_string_lossy(), &output, filter).await?;
        Ok(output)
    }

    #[tracing::instrument(skip(self, key), fields(key = %key))]
    async fn filter_by_link(
        &self,
        source_url: &str,
        key: &ScratchKey,
        filter: AudioFilter,
    ) -> Result<LinkTranscode, TranscoderError> {
        let info = resolve_source(&self.ytdlp_path, source_url).await?;
        if info.is_live == Some(true) {
            return Err(TranscoderError::UnboundedSource("live stream".to_string()));
        }
        let seconds = info.duration.ok_or_else(|| {
            TranscoderError::UnboundedSource("duration not reported".to_string())
        })?;
        self.check_ceiling(seconds)?;

        let stream_url = select_stream(&info.formats).ok_or_else(|| {
            TranscoderError::SourceUnavailable("no audio stream found".to_string())
        })?;

        let output = self.scratch_path(&key.output_file_name());
        self.run_ffmpeg(stream_url, &output, filter).await?;

        Ok(LinkTranscode {
            output,
            source_title: info.title,
        })
    }

    async fn measure_duration(&self, path: &Path) -> Result<f64, TranscoderError> {
        let seconds = probe_duration(path).await?;
        self.check_ceiling(seconds)?;
        Ok(seconds)
    }

    async fn cleanup(&self, key: &ScratchKey) {
        for name in [key.input_file_name(), key.output_file_name()] {
            let path = self.scratch_path(&name);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to remove scratch file"
                    );
                }
            }
        }
    }
}
