use std::fmt;
use std::str::FromStr;

/// Ordering for folder search results. Ties are broken by most recently
/// updated first, then by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FolderSort {
    #[default]
    DateLatest,
    DateLast,
    LikeAsc,
    LikeDesc,
}

impl FolderSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            FolderSort::DateLatest => "DateLatest",
            FolderSort::DateLast => "DateLast",
            FolderSort::LikeAsc => "LikeAsc",
            FolderSort::LikeDesc => "LikeDesc",
        }
    }
}

impl FromStr for FolderSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "datelatest" => Ok(FolderSort::DateLatest),
            "datelast" => Ok(FolderSort::DateLast),
            "likeasc" => Ok(FolderSort::LikeAsc),
            "likedesc" => Ok(FolderSort::LikeDesc),
            _ => Err(format!("Invalid folder sort: {}", s)),
        }
    }
}

impl fmt::Display for FolderSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
