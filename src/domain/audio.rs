use std::fmt;

use uuid::Uuid;

use super::{AudioFilter, Owned, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioId(Uuid);

impl AudioId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parses a client-supplied id. Malformed ids yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AudioId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AudioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A transcoded, stored audio clip.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioRecord {
    pub id: AudioId,
    pub owner_id: UserId,
    pub url: String,
    pub title: String,
    pub filter: AudioFilter,
    pub view_count: i64,
    pub duration_seconds: f64,
}

impl Owned for AudioRecord {
    fn owner(&self) -> &UserId {
        &self.owner_id
    }
}

/// Metadata for a record that has not been persisted yet. The id is
/// assigned by the store on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAudio {
    pub owner_id: UserId,
    pub url: String,
    pub title: String,
    pub filter: AudioFilter,
    pub duration_seconds: f64,
}
