//! Resolution of the acting principal from a raw `Authorization` header.

use jiff::Timestamp;

use super::Principal;
use crate::handler::{Error, ErrorKind};
use crate::service::{TokenCodec, TokenError};
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;

/// Only this exact, case-sensitive scheme prefix is accepted.
const BEARER_PREFIX: &str = "Bearer ";

/// Failure to resolve a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The header is absent or does not use the `Bearer` scheme.
    #[error("missing bearer token")]
    MissingToken,
    /// The token is malformed, has a bad signature or carries bad claims.
    #[error("invalid bearer token")]
    InvalidToken,
    /// The token is well-formed and signed but past its expiry.
    #[error("expired bearer token")]
    ExpiredToken,
}

impl From<TokenError> for ResolveError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::InvalidToken => Self::InvalidToken,
            TokenError::ExpiredToken => Self::ExpiredToken,
        }
    }
}

impl From<ResolveError> for Error<'static> {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::MissingToken => ErrorKind::MissingAuthToken
                .with_context("Missing Authorization header with Bearer token")
                .with_resource("authentication"),
            ResolveError::InvalidToken => ErrorKind::MalformedAuthToken
                .with_context("Bearer token failed verification")
                .with_resource("authentication"),
            ResolveError::ExpiredToken => ErrorKind::MalformedAuthToken
                .with_context("Bearer token has expired")
                .with_resource("authentication"),
        }
    }
}

/// Turns a raw `Authorization` header into a [`Principal`].
///
/// Stateless: the token's embedded claims are trusted as-is, so a role
/// change in storage only takes effect once a new token is issued.
#[derive(Debug, Clone)]
pub struct PrincipalResolver {
    token_codec: TokenCodec,
}

impl PrincipalResolver {
    /// Creates a new resolver delegating to `token_codec`.
    pub fn new(token_codec: TokenCodec) -> Self {
        Self { token_codec }
    }

    /// Resolves the principal carried by `authorization` at instant `now`.
    pub fn resolve(
        &self,
        authorization: Option<&str>,
        now: Timestamp,
    ) -> Result<Principal, ResolveError> {
        let token = authorization
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .ok_or(ResolveError::MissingToken)?;

        if token.is_empty() {
            return Err(ResolveError::InvalidToken);
        }

        let claims = self.token_codec.decode(token, now).inspect_err(|error| {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %error,
                "bearer token could not be resolved",
            );
        })?;

        Ok(Principal::new(claims.identity, claims.role))
    }
}
