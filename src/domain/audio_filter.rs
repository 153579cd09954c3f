use std::fmt;
use std::str::FromStr;

/// Named post-processing preset applied while transcoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioFilter {
    #[default]
    Default,
    NightCore,
    Stereo,
    NoiseFilter,
}

impl AudioFilter {
    pub const ALL: [AudioFilter; 4] = [
        AudioFilter::Default,
        AudioFilter::NightCore,
        AudioFilter::Stereo,
        AudioFilter::NoiseFilter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFilter::Default => "Default",
            AudioFilter::NightCore => "NightCore",
            AudioFilter::Stereo => "Stereo",
            AudioFilter::NoiseFilter => "NoiseFilter",
        }
    }
}

impl FromStr for AudioFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(AudioFilter::Default),
            "nightcore" => Ok(AudioFilter::NightCore),
            "stereo" => Ok(AudioFilter::Stereo),
            "noisefilter" => Ok(AudioFilter::NoiseFilter),
            _ => Err(format!("Invalid filter: {}", s)),
        }
    }
}

impl fmt::Display for AudioFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
