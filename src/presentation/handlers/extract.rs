use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::domain::UserId;
use crate::presentation::state::AppState;

use super::error::ApiError;

const UNKNOWN_CLIENT: &str = "unknown";

/// Caller identity from a verified bearer token. Rejects with 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserId);

/// Caller identity when a valid bearer token is present. Missing or invalid
/// tokens yield `None`.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<UserId>);

/// Best-known client address. When [`TrustProxyHeaders`] is enabled:
/// `cf-connecting-ip`, then the first `x-forwarded-for` hop, then the socket
/// peer. Otherwise the socket peer only.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

/// Request extension enabling proxy-supplied client address headers.
/// Absent means untrusted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustProxyHeaders(pub bool);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing token".to_string()))?;

        let claims = state.token_verifier.verify(header).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            ApiError::from(e)
        })?;

        Ok(AuthUser(UserId::new(claims.id)))
    }
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|header| state.token_verifier.verify(header).ok())
            .map(|claims| UserId::new(claims.id));

        Ok(OptionalUser(user))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let trusted = parts
            .extensions
            .get::<TrustProxyHeaders>()
            .is_some_and(|trust| trust.0);

        let forwarded = if trusted {
            header("cf-connecting-ip").or_else(|| header("x-forwarded-for"))
        } else {
            None
        };

        let ip = forwarded
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|info| info.0.ip().to_string())
            })
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

        Ok(ClientIp(ip))
    }
}
