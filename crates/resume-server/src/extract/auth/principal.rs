//! Acting principal of a request.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::PrincipalResolver;
use crate::handler::{Error, ErrorKind};

/// Privilege domain of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Administrator, allowed under the admin path prefix.
    Admin,
    /// Regular user, allowed under the user path prefix.
    User,
}

impl Role {
    /// Returns the role as it appears in tokens and responses.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

/// Identity and role of the caller, resolved from a session token.
///
/// Immutable for the lifetime of the request. As an extractor it returns the
/// principal attached by the access gate, or resolves the `Authorization`
/// header itself on routes the gate does not cover.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Unique human-readable handle.
    pub identity: String,
    /// Role embedded in the token.
    pub role: Role,
}

impl Principal {
    /// Creates a new principal.
    pub fn new(identity: impl Into<String>, role: Role) -> Self {
        Self {
            identity: identity.into(),
            role,
        }
    }

    /// Returns `true` if the principal holds `role`.
    #[inline]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: Sync + Send,
    PrincipalResolver: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Self>() {
            return Ok(principal.clone());
        }

        let authorization = match parts.headers.get(header::AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| {
                ErrorKind::MissingAuthToken
                    .with_context("Authorization header is not valid ASCII")
                    .with_resource("authentication")
            })?),
            None => None,
        };

        let resolver = PrincipalResolver::from_ref(state);
        let principal = resolver.resolve(authorization, Timestamp::now())?;

        parts.extensions.insert(principal.clone());
        Ok(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!("admin".parse::<Role>().ok(), Some(Role::Admin));
        assert!("Admin".parse::<Role>().is_err());
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn principal_serialization() {
        let principal = Principal::new("alice", Role::User);
        let json = serde_json::to_value(&principal).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "identity": "alice", "role": "user" })
        );
        assert!(principal.has_role(Role::User));
        assert!(!principal.has_role(Role::Admin));
    }
}
