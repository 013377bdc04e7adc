//! Application state and dependency injection.

mod config;
mod security;
mod store;

use std::sync::Arc;

pub use crate::service::config::ServiceConfig;
pub use crate::service::security::{
    CredentialVerifier, SessionClaims, SessionKeys, SessionKeysConfig, SessionToken, TokenCodec,
    TokenError,
};
pub use crate::service::store::{
    CredentialRecord, CredentialStore, MemoryCredentialStore, StoreError, StoreResult,
};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};
use crate::extract::{PrincipalResolver, Role};
use crate::middleware::{AccessGate, AccessRules};
use crate::utility::tracing_targets::TRACING_TARGET_CREDENTIAL_STORE;

/// Shared handle to the credential store.
pub type SharedCredentialStore = Arc<dyn CredentialStore>;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    // External services:
    pub credential_store: SharedCredentialStore,

    // Internal services:
    pub token_codec: TokenCodec,
    pub principal_resolver: PrincipalResolver,
    pub credential_verifier: CredentialVerifier,
    pub access_gate: AccessGate,
}

impl ServiceState {
    /// Initializes application state from configuration with an in-memory
    /// credential store.
    pub async fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        Self::with_store(service_config, Arc::new(MemoryCredentialStore::new())).await
    }

    /// Initializes application state from configuration around the provided
    /// credential store, seeding the bootstrap administrator if configured.
    pub async fn with_store(
        service_config: &ServiceConfig,
        credential_store: SharedCredentialStore,
    ) -> Result<Self> {
        let session_keys = SessionKeys::from_config(&service_config.session_keys)?;
        session_keys.validate_keys()?;

        let token_codec = TokenCodec::new(session_keys);
        let principal_resolver = PrincipalResolver::new(token_codec.clone());
        let access_rules = AccessRules::from_config(&service_config.access_rules)?;
        let access_gate = AccessGate::new(access_rules, principal_resolver.clone());

        if let Some((username, password)) = service_config.bootstrap_admin()? {
            let record = CredentialRecord::new(username, password, Role::Admin);
            match credential_store.insert(record).await {
                Ok(()) => tracing::info!(
                    target: TRACING_TARGET_CREDENTIAL_STORE,
                    identity = %username,
                    "bootstrap administrator seeded"
                ),
                Err(StoreError::Conflict(_)) => tracing::info!(
                    target: TRACING_TARGET_CREDENTIAL_STORE,
                    identity = %username,
                    "bootstrap administrator already present"
                ),
                Err(e) => {
                    return Err(Error::storage("failed to seed bootstrap administrator")
                        .with_source(e));
                }
            }
        }

        Ok(Self {
            credential_store,
            token_codec,
            principal_resolver,
            credential_verifier: CredentialVerifier::new(),
            access_gate,
        })
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(credential_store: SharedCredentialStore);

// Internal services:
impl_di!(token_codec: TokenCodec);
impl_di!(principal_resolver: PrincipalResolver);
impl_di!(credential_verifier: CredentialVerifier);
impl_di!(access_gate: AccessGate);
