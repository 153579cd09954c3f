use std::fs::File;
use std::path::{Path, PathBuf};

use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::TranscoderError;

/// Duration in seconds of the media file at `path`, probed off the async
/// runtime.
pub async fn probe_duration(path: &Path) -> Result<f64, TranscoderError> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || probe_file(&path))
        .await
        .map_err(|e| TranscoderError::ProcessFailed(format!("probe task: {}", e)))?
}

fn probe_file(path: &Path) -> Result<f64, TranscoderError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| TranscoderError::UnreadableMedia(format!("probe: {}", e)))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| TranscoderError::UnreadableMedia("no audio track found".to_string()))?;
    let track_id = track.id;
    let params = track.codec_params.clone();

    if let (Some(frames), Some(rate)) = (params.n_frames, params.sample_rate) {
        if rate > 0 {
            return Ok(frames as f64 / rate as f64);
        }
    }

    // No frame count in the header: sum packet durations.
    let time_base = params
        .time_base
        .ok_or_else(|| TranscoderError::UnreadableMedia("unknown time base".to_string()))?;
    let mut total_ts: u64 = 0;
    loop {
        match format.next_packet() {
            Ok(packet) if packet.track_id() == track_id => total_ts += packet.dur,
            Ok(_) => continue,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(TranscoderError::UnreadableMedia(format!("packet: {}", e))),
        }
    }

    let time = time_base.calc_time(total_ts);
    Ok(time.seconds as f64 + time.frac)
}

