//! Account response types.

use serde::{Deserialize, Serialize};

use crate::extract::Role;
use crate::service::CredentialRecord;

/// Public view of an account; never includes the secret.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Username of the account.
    pub username: String,
    /// Role of the account.
    pub role: Role,
}

impl From<CredentialRecord> for Account {
    fn from(record: CredentialRecord) -> Self {
        Self {
            username: record.identity,
            role: record.role,
        }
    }
}
