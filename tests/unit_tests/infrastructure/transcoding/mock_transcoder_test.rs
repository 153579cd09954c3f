use tunefold::application::ports::{Transcoder, TranscoderError};
use tunefold::domain::{AudioFilter, ScratchKey};
use tunefold::infrastructure::transcoding::{MOCK_SOURCE_TITLE, MockTranscoder};

#[tokio::test]
async fn given_file_when_filtering_then_writes_numbered_output() {
    let dir = tempfile::TempDir::new().unwrap();
    let transcoder = MockTranscoder::new(dir.path(), 42.0, 300);
    let key = ScratchKey::generate();

    let output = transcoder
        .filter_by_file(b"bytes", &key, AudioFilter::Stereo)
        .await
        .unwrap();

    assert_eq!(output, dir.path().join(key.output_file_name()));
    assert!(output.exists());
}

#[tokio::test]
async fn given_link_when_filtering_then_reports_source_title() {
    let dir = tempfile::TempDir::new().unwrap();
    let transcoder = MockTranscoder::new(dir.path(), 42.0, 300);

    let result = transcoder
        .filter_by_link("https://youtu.be/x", &ScratchKey::generate(), AudioFilter::Default)
        .await
        .unwrap();

    assert_eq!(result.source_title, MOCK_SOURCE_TITLE);
}

#[tokio::test]
async fn given_duration_over_ceiling_when_measuring_then_returns_too_long() {
    let dir = tempfile::TempDir::new().unwrap();
    let transcoder = MockTranscoder::new(dir.path(), 301.0, 300);

    let result = transcoder.measure_duration(dir.path()).await;

    assert!(matches!(
        result,
        Err(TranscoderError::TooLong { max_seconds: 300, .. })
    ));
}

#[tokio::test]
async fn given_output_when_cleaning_up_then_scratch_file_is_removed() {
    let dir = tempfile::TempDir::new().unwrap();
    let transcoder = MockTranscoder::new(dir.path(), 42.0, 300);
    let key = ScratchKey::generate();
    let output = transcoder
        .filter_by_file(b"bytes", &key, AudioFilter::Default)
        .await
        .unwrap();

    transcoder.cleanup(&key).await;

    assert!(!output.exists());
}
