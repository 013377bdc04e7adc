//! In-memory implementation of the credential store.
//!
//! Records live in a `HashMap` guarded by `tokio::sync::RwLock` and are lost
//! on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CredentialRecord, CredentialStore, StoreError, StoreResult};
use crate::utility::tracing_targets::TRACING_TARGET_CREDENTIAL_STORE;

/// In-memory credential store shared across request handlers.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    records: Arc<RwLock<HashMap<String, CredentialRecord>>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `records`.
    ///
    /// Later records replace earlier ones with the same identity.
    pub fn with_records(records: impl IntoIterator<Item = CredentialRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.identity.clone(), record))
            .collect();

        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_principal_by_identity(
        &self,
        identity: &str,
    ) -> StoreResult<Option<CredentialRecord>> {
        let records = self.records.read().await;
        Ok(records.get(identity).cloned())
    }

    async fn insert(&self, record: CredentialRecord) -> StoreResult<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.identity) {
            return Err(StoreError::Conflict(record.identity));
        }

        tracing::debug!(
            target: TRACING_TARGET_CREDENTIAL_STORE,
            identity = %record.identity,
            role = %record.role,
            "credential record inserted",
        );

        records.insert(record.identity.clone(), record);
        Ok(())
    }

    async fn update_secret(&self, identity: &str, secret: &str) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(identity)
            .ok_or_else(|| StoreError::NotFound(identity.to_owned()))?;

        record.secret = secret.to_owned();

        tracing::debug!(
            target: TRACING_TARGET_CREDENTIAL_STORE,
            identity = %identity,
            "credential secret updated",
        );

        Ok(())
    }

    async fn rename(&self, identity: &str, new_identity: &str) -> StoreResult<()> {
        let mut records = self.records.write().await;
        if !records.contains_key(identity) {
            return Err(StoreError::NotFound(identity.to_owned()));
        }
        if identity == new_identity {
            return Ok(());
        }
        if records.contains_key(new_identity) {
            return Err(StoreError::Conflict(new_identity.to_owned()));
        }

        if let Some(mut record) = records.remove(identity) {
            record.identity = new_identity.to_owned();
            records.insert(record.identity.clone(), record);
        }

        tracing::debug!(
            target: TRACING_TARGET_CREDENTIAL_STORE,
            identity = %identity,
            new_identity = %new_identity,
            "credential record renamed",
        );

        Ok(())
    }

    async fn remove(&self, identity: &str) -> StoreResult<()> {
        let mut records = self.records.write().await;
        records
            .remove(identity)
            .ok_or_else(|| StoreError::NotFound(identity.to_owned()))?;

        tracing::debug!(
            target: TRACING_TARGET_CREDENTIAL_STORE,
            identity = %identity,
            "credential record removed",
        );

        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<CredentialRecord>> {
        let records = self.records.read().await;
        let mut items: Vec<_> = records.values().cloned().collect();
        items.sort_by(|a, b| a.identity.cmp(&b.identity));
        Ok(items)
    }
}
