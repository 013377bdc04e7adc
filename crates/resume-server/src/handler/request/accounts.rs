//! Account request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for an administrator password change.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    /// Current password of the acting administrator.
    #[validate(length(min = 1, max = 128))]
    pub old_password: String,
    /// Replacement password.
    #[validate(length(min = 1, max = 128))]
    pub new_password: String,
}

/// Request payload for editing another account as an administrator.
///
/// An absent field is left unchanged, as is an empty password.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccount {
    /// New username.
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub username: Option<String>,
    /// New password.
    #[serde(default)]
    #[validate(length(max = 128))]
    pub password: Option<String>,
}

impl UpdateAccount {
    /// Returns the new password unless it is absent or empty.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|s| !s.is_empty())
    }
}

/// Request payload for an administrator resetting another account's password.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ResetAccountPassword {
    /// New password; absent or empty is rejected by the handler.
    #[serde(default)]
    #[validate(length(max = 128))]
    pub password: Option<String>,
}

impl ResetAccountPassword {
    /// Returns the new password unless it is absent or empty.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|s| !s.is_empty())
    }
}
