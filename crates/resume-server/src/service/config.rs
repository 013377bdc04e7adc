use std::fmt;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::middleware::AccessRulesConfig;
use crate::service::SessionKeysConfig;
use crate::{Error, Result};

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Session token signing configuration.
    #[cfg_attr(any(test, feature = "config"), command(flatten))]
    #[serde(flatten)]
    pub session_keys: SessionKeysConfig,

    /// Path-prefix authorization rules.
    #[cfg_attr(any(test, feature = "config"), command(flatten))]
    #[serde(flatten)]
    pub access_rules: AccessRulesConfig,

    /// Username of the administrator account seeded at startup.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "ADMIN_USERNAME", requires = "admin_password")
    )]
    #[serde(default)]
    pub admin_username: Option<String>,

    /// Password of the administrator account seeded at startup.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "ADMIN_PASSWORD", hide_env_values = true, requires = "admin_username")
    )]
    #[serde(default, skip_serializing)]
    pub admin_password: Option<String>,
}

impl ServiceConfig {
    /// Creates a configuration with the given signing secret and defaults
    /// for everything else.
    pub fn new(auth_secret: impl Into<String>) -> Self {
        Self {
            session_keys: SessionKeysConfig::new(auth_secret),
            access_rules: AccessRulesConfig::default(),
            admin_username: None,
            admin_password: None,
        }
    }

    /// Seeds an administrator account at startup.
    pub fn with_admin(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.admin_username = Some(username.into());
        self.admin_password = Some(password.into());
        self
    }

    /// Returns the bootstrap administrator credentials, if configured.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when only one of the two is set, or
    /// either is empty.
    pub fn bootstrap_admin(&self) -> Result<Option<(&str, &str)>> {
        match (self.admin_username.as_deref(), self.admin_password.as_deref()) {
            (None, None) => Ok(None),
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok(Some((username, password)))
            }
            (Some(_), Some(_)) => Err(Error::config(
                "ADMIN_USERNAME and ADMIN_PASSWORD must not be empty",
            )),
            _ => Err(Error::config(
                "ADMIN_USERNAME and ADMIN_PASSWORD must be set together",
            )),
        }
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("session_keys", &self.session_keys)
            .field("access_rules", &self.access_rules)
            .field("admin_username", &self.admin_username)
            .finish_non_exhaustive()
    }
}
