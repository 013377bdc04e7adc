//! Issuance and verification of signed session tokens.
//!
//! Tokens are compact JWS values (HS256) carrying the identity in `sub`,
//! the role in `role`, and `iat`/`exp` as seconds since the Unix epoch.
//! Decoding is pure: the caller supplies `now`, and expiry is checked only
//! after the signature has been verified.

use derive_more::{Deref, Display};
use jiff::Timestamp;
use jsonwebtoken::{Algorithm, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::extract::Role;
use crate::service::SessionKeys;
use crate::utility::tracing_targets::TRACING_TARGET_AUTHENTICATION;
use crate::{Error, Result};

/// Failure to decode a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Malformed token, bad signature, unknown role or empty identity.
    #[error("session token is invalid")]
    InvalidToken,
    /// Signature is valid but the expiry has passed.
    #[error("session token has expired")]
    ExpiredToken,
}

/// Encoded and signed session token.
#[derive(Debug, Clone, PartialEq, Eq, Deref, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Returns the compact token string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token and returns the compact string.
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Claims carried by a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Identity of the principal the token was issued to.
    pub identity: String,
    /// Role of the principal at the time of issuance.
    pub role: Role,
    /// Issued at.
    pub issued_at: Timestamp,
    /// Expires at.
    pub expires_at: Timestamp,
}

/// On-the-wire representation of [`SessionClaims`].
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Creates and parses session tokens using the process-wide [`SessionKeys`].
#[derive(Debug, Clone)]
pub struct TokenCodec {
    session_keys: SessionKeys,
}

impl TokenCodec {
    /// Creates a new codec backed by the provided keys.
    pub fn new(session_keys: SessionKeys) -> Self {
        Self { session_keys }
    }

    /// Returns the keys this codec signs with.
    #[inline]
    pub fn session_keys(&self) -> &SessionKeys {
        &self.session_keys
    }

    /// Issues a token for `identity` with `role`, valid from `now` for the
    /// configured lifetime.
    ///
    /// # Errors
    ///
    /// Fails for an empty identity, when the expiry overflows the timestamp
    /// range, or if signing fails.
    pub fn issue(&self, identity: &str, role: Role, now: Timestamp) -> Result<SessionToken> {
        if identity.is_empty() {
            return Err(Error::auth("cannot issue a session token for an empty identity"));
        }

        let expires_at = now
            .checked_add(self.session_keys.token_ttl())
            .map_err(|e| Error::internal("token_codec", "token expiry overflow").with_source(e))?;

        let claims = WireClaims {
            sub: identity.to_owned(),
            role: role.to_string(),
            iat: now.as_second(),
            exp: expires_at.as_second(),
        };

        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, &claims, self.session_keys.encoding_key()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                identity = %identity,
                "failed to encode session token",
            );
            Error::auth("session token generation failed").with_source(e)
        })?;

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            identity = %identity,
            role = %role,
            expires_at = %expires_at,
            "session token issued",
        );

        Ok(SessionToken(token))
    }

    /// Verifies `token` and returns its claims.
    ///
    /// The token is expired when `now >= expiry`.
    pub fn decode(&self, token: &str, now: Timestamp) -> Result<SessionClaims, TokenError> {
        let data = decode::<WireClaims>(token, self.session_keys.decoding_key(), &Self::validation())
            .map_err(|e| {
                tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    error = %e,
                    "session token rejected",
                );
                TokenError::InvalidToken
            })?;

        let WireClaims { sub, role, iat, exp } = data.claims;
        if sub.is_empty() {
            return Err(TokenError::InvalidToken);
        }

        let role = role.parse::<Role>().map_err(|_| TokenError::InvalidToken)?;
        let issued_at = Timestamp::from_second(iat).map_err(|_| TokenError::InvalidToken)?;
        let expires_at = Timestamp::from_second(exp).map_err(|_| TokenError::InvalidToken)?;

        if now >= expires_at {
            return Err(TokenError::ExpiredToken);
        }

        Ok(SessionClaims {
            identity: sub,
            role,
            issued_at,
            expires_at,
        })
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);
        validation
    }
}
