//! Security infrastructure services.
//!
//! This module provides session key management, session token issuance and
//! verification, and credential comparison.

mod credential_verifier;
mod session_keys;
mod token_codec;

pub use credential_verifier::CredentialVerifier;
pub use session_keys::{SessionKeys, SessionKeysConfig};
pub use token_codec::{SessionClaims, SessionToken, TokenCodec, TokenError};
