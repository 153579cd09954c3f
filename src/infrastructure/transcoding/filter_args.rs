use std::path::Path;

use crate::domain::AudioFilter;

/// ffmpeg argument fragment for `filter`, inserted between the input and
/// the encoder options. `Stereo` adds a second input (the reverb impulse
/// response), so the fragment must follow the primary `-i`.
pub fn filter_args(filter: AudioFilter, impulse_response: &Path) -> Vec<String> {
    match filter {
        AudioFilter::Default => Vec::new(),
        AudioFilter::NightCore => vec![
            "-filter:a".to_string(),
            "atempo=1.06,asetrate=44100*1.25".to_string(),
        ],
        AudioFilter::Stereo => vec![
            "-i".to_string(),
            impulse_response.to_string_lossy().into_owned(),
            "-filter_complex".to_string(),
            "[0] [1] afir=dry=10:wet=10 [reverb]; [0] [reverb] amix=inputs=2:weights=1"
                .to_string(),
        ],
        AudioFilter::NoiseFilter => vec![
            "-af".to_string(),
            "afftdn=nf=-25,highpass=f=80,lowpass=f=12000".to_string(),
        ],
    }
}

/// Same as [`filter_args`] keyed by name; unknown names get the no-op
/// `Default` fragment.
pub fn filter_select(name: &str, impulse_response: &Path) -> Vec<String> {
    let filter = name.parse::<AudioFilter>().unwrap_or_default();
    filter_args(filter, impulse_response)
}

