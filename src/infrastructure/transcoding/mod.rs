mod duration_probe;
mod ffmpeg_transcoder;
mod filter_args;
mod mock_transcoder;
mod stream_source;

pub use duration_probe::probe_duration;
pub use ffmpeg_transcoder::FfmpegTranscoder;
pub use filter_args::{filter_args, filter_select};
pub use mock_transcoder::{MOCK_SOURCE_TITLE, MockTranscoder};
pub use stream_source::{SourceFormat, SourceInfo, resolve_source, select_stream};
