use std::fmt;

/// Stable external identity of a user (the email carried in the bearer
/// token).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Entities that belong to exactly one user.
pub trait Owned {
    fn owner(&self) -> &UserId;

    fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner() == user
    }
}
