/// Failures surfaced by the audio and folder record stores.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("store unreachable: {0}")]
    ConnectionFailed(String),
    #[error("store query failed: {0}")]
    QueryFailed(String),
    /// A referenced folder or audio record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),
    /// Duplicate folder name, or an audio record already in the folder.
    #[error("uniqueness violated: {0}")]
    ConstraintViolation(String),
}
