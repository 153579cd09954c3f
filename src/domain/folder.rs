use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{AudioRecord, FolderSort, Owned, PageRequest, UserId};

/// Longest accepted folder name, in characters.
pub const MAX_FOLDER_NAME_CHARS: usize = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FolderId(Uuid);

impl FolderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for FolderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub id: FolderId,
    pub creator_id: UserId,
    pub name: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Folder {
    fn owner(&self) -> &UserId {
        &self.creator_id
    }
}

/// A folder row as returned by list queries. `like_status` is only set
/// when the query was made on behalf of a known user.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderSummary {
    pub folder: Folder,
    pub like_status: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FolderDetail {
    pub folder: Folder,
    pub audio: Vec<AudioRecord>,
    pub like_status: Option<bool>,
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    Liked,
    Unliked,
}

impl LikeToggle {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeToggle::Liked => "liked",
            LikeToggle::Unliked => "unliked",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FolderQuery {
    pub keyword: Option<String>,
    pub creator: Option<UserId>,
    pub sort: FolderSort,
    pub page: PageRequest,
}
