use std::fmt;

use chrono::Utc;
use uuid::Uuid;

/// Collision-resistant name for the scratch files of one upload:
/// `<unix millis>-<random token>`. Never derived from user input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScratchKey(String);

impl ScratchKey {
    pub fn generate() -> Self {
        Self(format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple()
        ))
    }

    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the raw input written before transcoding.
    pub fn input_file_name(&self) -> String {
        format!("{}.mp3", self.0)
    }

    /// File name of the filtered transcoder output.
    pub fn output_file_name(&self) -> String {
        format!("{}-1.mp3", self.0)
    }

    /// Key under which the finished asset is stored remotely.
    pub fn object_key(&self) -> String {
        format!("{}.mp3", self.0)
    }
}

impl fmt::Display for ScratchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
