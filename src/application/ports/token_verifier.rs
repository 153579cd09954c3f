use serde::{Deserialize, Serialize};

/// Payload carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: String,
    pub exp: i64,
}

pub trait TokenVerifier: Send + Sync {
    /// Verifies an `Authorization` header value (with or without the
    /// `Bearer ` prefix) and returns its claims.
    fn verify(&self, bearer: &str) -> Result<TokenClaims, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing token")]
    Missing,
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
}
