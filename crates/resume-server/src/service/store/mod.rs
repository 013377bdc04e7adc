//! Credential storage consumed by the account handlers.
//!
//! The access gate never touches the store: it trusts the claims embedded in
//! session tokens. Only the account handlers read or write credential
//! records.

mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use self::memory::MemoryCredentialStore;
use crate::extract::Role;

/// Stored credential for a single account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Unique human-readable handle.
    pub identity: String,
    /// Secret as stored (plaintext).
    pub secret: String,
    /// Privilege domain the account belongs to.
    pub role: Role,
}

impl CredentialRecord {
    /// Creates a new credential record.
    pub fn new(identity: impl Into<String>, secret: impl Into<String>, role: Role) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
            role,
        }
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("identity", &self.identity)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Credential store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No account with the given identity exists.
    #[error("account not found: {0}")]
    NotFound(String),
    /// An account with the given identity already exists.
    #[error("account already exists: {0}")]
    Conflict(String),
}

/// Result type alias for credential store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence collaborator for credential records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Looks up the credential record for `identity`.
    async fn find_principal_by_identity(
        &self,
        identity: &str,
    ) -> StoreResult<Option<CredentialRecord>>;

    /// Inserts a new record, failing with [`StoreError::Conflict`] on a
    /// duplicate identity.
    async fn insert(&self, record: CredentialRecord) -> StoreResult<()>;

    /// Replaces the stored secret for `identity`.
    async fn update_secret(&self, identity: &str, secret: &str) -> StoreResult<()>;

    /// Moves the record of `identity` to `new_identity`, keeping its secret
    /// and role. Fails with [`StoreError::Conflict`] if `new_identity` is
    /// taken by another record.
    async fn rename(&self, identity: &str, new_identity: &str) -> StoreResult<()>;

    /// Deletes the record of `identity`.
    async fn remove(&self, identity: &str) -> StoreResult<()>;

    /// Returns every record ordered by identity.
    async fn list(&self) -> StoreResult<Vec<CredentialRecord>>;
}
