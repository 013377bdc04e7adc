//! Authentication request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for login and registration.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Username of the account.
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    /// Password of the account.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Request payload for self-service password reset.
///
/// Fields may be omitted; emptiness is reported with a dedicated message.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPassword {
    /// Username of the account.
    #[serde(default)]
    #[validate(length(max = 64))]
    pub username: Option<String>,
    /// New password.
    #[serde(default)]
    #[validate(length(max = 128))]
    pub password: Option<String>,
}

impl ResetPassword {
    /// Returns both fields when neither is absent or empty.
    pub fn fields(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|s| !s.is_empty())?;
        let password = self.password.as_deref().filter(|s| !s.is_empty())?;
        Some((username, password))
    }
}
