use std::fmt;
use std::str::FromStr;

/// Ordering for the unfiltered audio listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioOrder {
    #[default]
    Latest,
    Last,
    ViewsDesc,
    ViewsAsc,
}

impl AudioOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioOrder::Latest => "Latest",
            AudioOrder::Last => "Last",
            AudioOrder::ViewsDesc => "ViewsDesc",
            AudioOrder::ViewsAsc => "ViewsAsc",
        }
    }
}

impl FromStr for AudioOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Ok(AudioOrder::Latest),
            "last" => Ok(AudioOrder::Last),
            "viewsdesc" => Ok(AudioOrder::ViewsDesc),
            "viewsasc" => Ok(AudioOrder::ViewsAsc),
            _ => Err(format!("Invalid audio order: {}", s)),
        }
    }
}

impl fmt::Display for AudioOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
