use std::path::Path;

use serde::Deserialize;
use tokio::process::Command;

use crate::application::ports::TranscoderError;

/// Subset of the `yt-dlp -J` document this service reads.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceInfo {
    #[serde(default)]
    pub title: String,
    pub duration: Option<f64>,
    #[serde(default)]
    pub is_live: Option<bool>,
    #[serde(default)]
    pub formats: Vec<SourceFormat>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceFormat {
    pub format_id: Option<String>,
    pub url: Option<String>,
    pub acodec: Option<String>,
    pub vcodec: Option<String>,
    pub format_note: Option<String>,
}

impl SourceFormat {
    fn is_audio_only(&self) -> bool {
        let has_audio = self.acodec.as_deref().is_some_and(|c| c != "none");
        let has_video = self.vcodec.as_deref().is_some_and(|c| c != "none");
        has_audio && !has_video && self.url.is_some()
    }

    fn has_quality(&self, quality: &str) -> bool {
        self.format_note
            .as_deref()
            .is_some_and(|note| note.to_ascii_lowercase().contains(quality))
    }
}

/// Picks the stream URL to transcode: the first medium-quality audio-only
/// format, else the first low-quality one.
pub fn select_stream(formats: &[SourceFormat]) -> Option<&str> {
    let audio: Vec<&SourceFormat> = formats.iter().filter(|f| f.is_audio_only()).collect();

    ["medium", "low"].iter().find_map(|quality| {
        audio
            .iter()
            .find(|f| f.has_quality(quality))
            .and_then(|f| f.url.as_deref())
    })
}

/// Resolves `source_url` with `yt-dlp -J`.
#[tracing::instrument(skip(ytdlp_path))]
pub async fn resolve_source(
    ytdlp_path: &Path,
    source_url: &str,
) -> Result<SourceInfo, TranscoderError> {
    let output = Command::new(ytdlp_path)
        .args(["-J", "--no-playlist", "--no-warnings", source_url])
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| TranscoderError::SourceUnavailable(format!("spawn yt-dlp: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TranscoderError::SourceUnavailable(format!(
            "yt-dlp exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    serde_json::from_slice(&output.stdout)
        .map_err(|e| TranscoderError::SourceUnavailable(format!("parse yt-dlp output: {}", e)))
}
