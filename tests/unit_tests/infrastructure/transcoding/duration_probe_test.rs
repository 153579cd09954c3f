use std::path::Path;

use tunefold::application::ports::TranscoderError;
use tunefold::infrastructure::transcoding::probe_duration;

fn build_wav(sample_rate: u32, seconds: u32) -> Vec<u8> {
    let data_size = sample_rate * seconds * 2;
    let mut wav = Vec::with_capacity(44 + data_size as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.resize(44 + data_size as usize, 0);
    wav
}

#[tokio::test]
async fn given_two_second_wav_when_probing_then_returns_two_seconds() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("tone.wav");
    std::fs::write(&path, build_wav(8_000, 2)).unwrap();

    let seconds = probe_duration(&path).await.unwrap();

    assert!((seconds - 2.0).abs() < 0.01, "got {seconds}");
}

#[tokio::test]
async fn given_garbage_bytes_when_probing_then_returns_unreadable_media() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("broken.mp3");
    std::fs::write(&path, b"definitely not audio").unwrap();

    let result = probe_duration(&path).await;

    assert!(matches!(result, Err(TranscoderError::UnreadableMedia(_))));
}

#[tokio::test]
async fn given_missing_file_when_probing_then_returns_io_error() {
    let result = probe_duration(Path::new("/nonexistent/tunefold/none.mp3")).await;

    assert!(matches!(result, Err(TranscoderError::Io(_))));
}
