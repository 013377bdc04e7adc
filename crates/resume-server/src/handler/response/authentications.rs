//! Authentication response types.

use serde::{Deserialize, Serialize};

use crate::extract::Role;

/// Response returned after a successful login.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed session token to send as `Authorization: Bearer <token>`.
    pub token: String,
    /// Username of the authenticated account.
    pub username: String,
    /// Role embedded in the token.
    pub role: Role,
}
