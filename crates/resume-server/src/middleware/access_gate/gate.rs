//! Per-request access decision.

use axum::http::Method;
use jiff::Timestamp;

use super::{AccessRules, RuleScope};
use crate::extract::{Principal, PrincipalResolver, ResolveError, Role};
use crate::handler::ErrorKind;
use crate::utility::tracing_targets::TRACING_TARGET_AUTHORIZATION;

/// Terminal outcome of [`AccessGate::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Proceed; carries the resolved principal when a token was checked.
    Allow(Option<Principal>),
    /// Halt with the given denial.
    Deny(ErrorKind),
}

impl GateDecision {
    /// Returns `true` if the request may proceed.
    #[inline]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

/// Decides whether a request may reach the handlers.
///
/// Holds no per-request state; cloning is cheap.
#[derive(Debug, Clone)]
pub struct AccessGate {
    rules: AccessRules,
    resolver: PrincipalResolver,
}

impl AccessGate {
    /// Creates a new gate.
    pub fn new(rules: AccessRules, resolver: PrincipalResolver) -> Self {
        Self { rules, resolver }
    }

    /// Returns the rules this gate enforces.
    #[inline]
    pub fn rules(&self) -> &AccessRules {
        &self.rules
    }

    /// Runs the single-pass check for one request.
    ///
    /// `authorization` is the raw `Authorization` header, if present and
    /// readable as text.
    pub fn evaluate(
        &self,
        method: &Method,
        path: &str,
        authorization: Option<&str>,
        now: Timestamp,
    ) -> GateDecision {
        if method == Method::OPTIONS {
            return GateDecision::Allow(None);
        }

        let scope = self.rules.resolve(path);
        if scope == RuleScope::Public {
            return GateDecision::Allow(None);
        }

        let principal = match self.resolver.resolve(authorization, now) {
            Ok(principal) => principal,
            Err(error) => {
                let denial = match error {
                    ResolveError::MissingToken => ErrorKind::MissingAuthToken,
                    ResolveError::InvalidToken | ResolveError::ExpiredToken => {
                        ErrorKind::MalformedAuthToken
                    }
                };

                tracing::debug!(
                    target: TRACING_TARGET_AUTHORIZATION,
                    method = %method,
                    path = %path,
                    reason = %error,
                    "request denied"
                );

                return GateDecision::Deny(denial);
            }
        };

        match scope {
            RuleScope::Require(required) if principal.role != required => {
                tracing::warn!(
                    target: TRACING_TARGET_AUTHORIZATION,
                    method = %method,
                    path = %path,
                    identity = %principal.identity,
                    role = %principal.role,
                    required_role = %required,
                    "request denied: role mismatch"
                );

                GateDecision::Deny(match required {
                    Role::Admin => ErrorKind::AdminRequired,
                    Role::User => ErrorKind::UserRequired,
                })
            }
            _ => GateDecision::Allow(Some(principal)),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;
    use crate::service::{SessionKeys, TokenCodec};

    const NOW: i64 = 1_700_000_000;

    fn at(second: i64) -> Timestamp {
        Timestamp::from_second(second).unwrap()
    }

    fn setup() -> (AccessGate, TokenCodec) {
        let keys = SessionKeys::new(b"gate-test-secret", SignedDuration::from_hours(24)).unwrap();
        let codec = TokenCodec::new(keys);
        let gate = AccessGate::new(
            AccessRules::default(),
            PrincipalResolver::new(codec.clone()),
        );
        (gate, codec)
    }

    fn bearer(codec: &TokenCodec, identity: &str, role: Role) -> String {
        let token = codec.issue(identity, role, at(NOW)).unwrap();
        format!("Bearer {token}")
    }

    #[test]
    fn user_token_on_admin_and_user_paths() {
        let (gate, codec) = setup();
        let header = bearer(&codec, "alice", Role::User);

        let decision = gate.evaluate(&Method::GET, "/api/admin/user/list", Some(&header), at(NOW + 1));
        assert_eq!(decision, GateDecision::Deny(ErrorKind::AdminRequired));

        let decision = gate.evaluate(&Method::GET, "/api/user/resume/list", Some(&header), at(NOW + 1));
        assert_eq!(
            decision,
            GateDecision::Allow(Some(Principal::new("alice", Role::User)))
        );
    }

    #[test]
    fn admin_token_on_user_path() {
        let (gate, codec) = setup();
        let header = bearer(&codec, "root", Role::Admin);

        let decision = gate.evaluate(&Method::GET, "/api/user/profile", Some(&header), at(NOW + 1));
        assert_eq!(decision, GateDecision::Deny(ErrorKind::UserRequired));

        let decision = gate.evaluate(&Method::GET, "/api/admin/profile", Some(&header), at(NOW + 1));
        assert!(decision.is_allowed());
    }

    #[test]
    fn missing_header_on_gated_path() {
        let (gate, _) = setup();

        let decision = gate.evaluate(&Method::GET, "/api/user/profile", None, at(NOW));
        assert_eq!(decision, GateDecision::Deny(ErrorKind::MissingAuthToken));

        let decision = gate.evaluate(&Method::GET, "/api/user/profile", Some("Token abc"), at(NOW));
        assert_eq!(decision, GateDecision::Deny(ErrorKind::MissingAuthToken));
    }

    #[test]
    fn invalid_or_expired_token() {
        let (gate, codec) = setup();

        let decision = gate.evaluate(&Method::GET, "/api/user/profile", Some("Bearer nope"), at(NOW));
        assert_eq!(decision, GateDecision::Deny(ErrorKind::MalformedAuthToken));

        let decision = gate.evaluate(&Method::GET, "/api/user/profile", Some("Bearer "), at(NOW));
        assert_eq!(decision, GateDecision::Deny(ErrorKind::MalformedAuthToken));

        let header = bearer(&codec, "alice", Role::User);
        let decision = gate.evaluate(
            &Method::GET,
            "/api/user/profile",
            Some(&header),
            at(NOW + 86_400 + 1),
        );
        assert_eq!(decision, GateDecision::Deny(ErrorKind::MalformedAuthToken));
    }

    #[test]
    fn public_paths_need_no_token() {
        let (gate, _) = setup();

        for path in ["/api/user/login", "/api/user/register", "/api/admin/login", "/"] {
            let decision = gate.evaluate(&Method::POST, path, None, at(NOW));
            assert_eq!(decision, GateDecision::Allow(None), "path: {path}");
        }
    }

    #[test]
    fn public_paths_ignore_bad_tokens() {
        let (gate, _) = setup();

        let decision = gate.evaluate(&Method::POST, "/api/user/login", Some("Bearer nope"), at(NOW));
        assert_eq!(decision, GateDecision::Allow(None));
    }

    #[test]
    fn options_bypasses_every_check() {
        let (gate, _) = setup();

        for path in ["/api/admin/user/list", "/api/user/profile", "/anything"] {
            let decision = gate.evaluate(&Method::OPTIONS, path, None, at(NOW));
            assert_eq!(decision, GateDecision::Allow(None));
        }
    }

    #[test]
    fn authenticated_scope_accepts_any_role() {
        let (_, codec) = setup();
        let gate = AccessGate::new(
            AccessRules::default().with_fallback(RuleScope::Authenticated),
            PrincipalResolver::new(codec.clone()),
        );

        let header = bearer(&codec, "root", Role::Admin);
        let decision = gate.evaluate(&Method::GET, "/api/resume/1", Some(&header), at(NOW + 1));
        assert_eq!(
            decision,
            GateDecision::Allow(Some(Principal::new("root", Role::Admin)))
        );

        let decision = gate.evaluate(&Method::GET, "/api/resume/1", None, at(NOW + 1));
        assert_eq!(decision, GateDecision::Deny(ErrorKind::MissingAuthToken));
    }
}
