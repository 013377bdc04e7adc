//! Signing secret management for session tokens.
//!
//! This module provides functionality for loading and validating the
//! process-wide HMAC secret used to sign and verify session tokens.

use std::fmt;
use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jiff::SignedDuration;
use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};

use crate::utility::tracing_targets::TRACING_TARGET_SESSION_KEYS as TRACING_TARGET;
use crate::{Error, Result};

/// Secrets shorter than this are accepted but logged as weak.
const RECOMMENDED_SECRET_LEN: usize = 32;

/// Default session token lifetime (24 hours).
const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// Session signing configuration.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct SessionKeysConfig {
    /// Shared secret used to sign session tokens (HS256).
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_SECRET", hide_env_values = true)
    )]
    #[serde(skip_serializing, default)]
    pub auth_secret: String,

    /// Session token lifetime in seconds.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_TOKEN_TTL", default_value_t = DEFAULT_TOKEN_TTL_SECS)
    )]
    #[serde(default = "SessionKeysConfig::default_token_ttl")]
    pub auth_token_ttl: u64,
}

impl SessionKeysConfig {
    /// Creates a new configuration with the default token lifetime.
    pub fn new(auth_secret: impl Into<String>) -> Self {
        Self {
            auth_secret: auth_secret.into(),
            auth_token_ttl: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Overrides the token lifetime.
    pub fn with_token_ttl(mut self, seconds: u64) -> Self {
        self.auth_token_ttl = seconds;
        self
    }

    fn default_token_ttl() -> u64 {
        DEFAULT_TOKEN_TTL_SECS
    }
}

impl fmt::Debug for SessionKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeysConfig")
            .field("auth_secret", &"[REDACTED]")
            .field("auth_token_ttl", &self.auth_token_ttl)
            .finish()
    }
}

/// Secret keys used for session token signing.
///
/// Cheap to clone: the key material lives behind an [`Arc`] and is never
/// rotated for the lifetime of the process.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

/// Internal container for the actual key data.
struct SessionKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    token_ttl: SignedDuration,
}

impl SessionKeys {
    /// Creates a new `SessionKeys` instance from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the secret is empty or the token
    /// lifetime is zero or does not fit into a signed duration.
    pub fn from_config(config: &SessionKeysConfig) -> Result<Self> {
        Self::validate_config(config)?;

        let token_ttl = i64::try_from(config.auth_token_ttl)
            .map(SignedDuration::from_secs)
            .map_err(|e| Error::config("session token lifetime is too large").with_source(e))?;

        Self::new(config.auth_secret.as_bytes(), token_ttl)
    }

    /// Creates a new `SessionKeys` instance from raw secret bytes.
    pub fn new(secret: &[u8], token_ttl: SignedDuration) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::config("session signing secret must not be empty"));
        }

        if !token_ttl.is_positive() {
            return Err(Error::config("session token lifetime must be positive"));
        }

        if secret.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                target: TRACING_TARGET,
                secret_len = secret.len(),
                recommended_len = RECOMMENDED_SECRET_LEN,
                "session signing secret is shorter than recommended",
            );
        }

        let inner = Arc::new(SessionKeysInner {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            token_ttl,
        });

        tracing::info!(
            target: TRACING_TARGET,
            token_ttl_secs = token_ttl.as_secs(),
            "session signing keys loaded",
        );

        Ok(Self { inner })
    }

    /// Returns a reference to the decoding key.
    ///
    /// This key is used to verify session tokens.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns a reference to the encoding key.
    ///
    /// This key is used to sign session tokens.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Returns the lifetime given to every issued token.
    #[inline]
    pub fn token_ttl(&self) -> SignedDuration {
        self.inner.token_ttl
    }

    /// Validates that the loaded keys are functional for signing operations.
    ///
    /// Performs a round-trip by signing and verifying a throwaway token.
    pub fn validate_keys(&self) -> Result<()> {
        use jsonwebtoken::{Algorithm, Header, Validation, decode, encode};

        #[derive(Debug, Clone, Serialize, Deserialize)]
        struct KeyCheckClaims {
            sub: String,
        }

        let claims = KeyCheckClaims {
            sub: "key-check".to_owned(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, self.encoding_key())
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "key validation failed during encoding",
                );
                Error::auth("key validation encoding failed").with_source(e)
            })?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub"]);

        decode::<KeyCheckClaims>(&token, self.decoding_key(), &validation).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "key validation failed during decoding",
            );
            Error::auth("key validation decoding failed").with_source(e)
        })?;

        tracing::debug!(target: TRACING_TARGET, "key validation successful");
        Ok(())
    }

    fn validate_config(config: &SessionKeysConfig) -> Result<()> {
        if config.auth_secret.is_empty() {
            return Err(Error::config("AUTH_SECRET must not be empty"));
        }

        if config.auth_token_ttl == 0 {
            return Err(Error::config("AUTH_TOKEN_TTL must be greater than zero"));
        }

        Ok(())
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("token_ttl", &self.inner.token_ttl)
            .finish_non_exhaustive()
    }
}
