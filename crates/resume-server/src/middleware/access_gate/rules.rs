//! Path-prefix authorization rules.
//!
//! Rules are kept in resolution order: public entries first, then the rest,
//! longer prefixes before shorter ones within each group, declaration order
//! on ties. The first rule whose prefix the request path starts with wins.

#[cfg(any(test, feature = "config"))]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::extract::Role;
use crate::{Error, Result};

/// Default values for configuration options.
mod defaults {
    /// Paths reachable without a token.
    pub const PUBLIC_PATHS: [&str; 4] = [
        "/api/user/reset-password",
        "/api/user/login",
        "/api/user/register",
        "/api/admin/login",
    ];

    /// Prefix of the admin privilege domain.
    pub const ADMIN_PATH_PREFIX: &str = "/api/admin";

    /// Prefix of the user privilege domain.
    pub const USER_PATH_PREFIX: &str = "/api/user";

    pub fn public_paths() -> Vec<String> {
        PUBLIC_PATHS.iter().map(|path| (*path).to_owned()).collect()
    }

    pub fn admin_path_prefix() -> String {
        ADMIN_PATH_PREFIX.to_owned()
    }

    pub fn user_path_prefix() -> String {
        USER_PATH_PREFIX.to_owned()
    }
}

/// Authorization rules configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct AccessRulesConfig {
    /// Path prefixes reachable without a token (explicit exclusions).
    #[cfg_attr(
        any(test, feature = "config"),
        arg(
            long,
            env = "PUBLIC_PATHS",
            value_delimiter = ',',
            default_values = defaults::PUBLIC_PATHS
        )
    )]
    #[serde(default = "defaults::public_paths")]
    pub public_paths: Vec<String>,

    /// Path prefix that requires the admin role.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "ADMIN_PATH_PREFIX", default_value = defaults::ADMIN_PATH_PREFIX)
    )]
    #[serde(default = "defaults::admin_path_prefix")]
    pub admin_path_prefix: String,

    /// Path prefix that requires the user role.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "USER_PATH_PREFIX", default_value = defaults::USER_PATH_PREFIX)
    )]
    #[serde(default = "defaults::user_path_prefix")]
    pub user_path_prefix: String,
}

impl Default for AccessRulesConfig {
    fn default() -> Self {
        Self {
            public_paths: defaults::public_paths(),
            admin_path_prefix: defaults::admin_path_prefix(),
            user_path_prefix: defaults::user_path_prefix(),
        }
    }
}

/// What a matching rule demands of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "scope", content = "role")]
pub enum RuleScope {
    /// No token needed.
    Public,
    /// Any valid token.
    Authenticated,
    /// A valid token carrying the given role.
    Require(Role),
}

/// A single `(prefix, scope)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    /// Path prefix, matched as a plain string prefix.
    pub prefix: String,
    /// Scope applied to matching paths.
    pub scope: RuleScope,
}

impl AccessRule {
    /// Creates a new rule.
    pub fn new(prefix: impl Into<String>, scope: RuleScope) -> Self {
        Self {
            prefix: prefix.into(),
            scope,
        }
    }

    /// Rule reachable without a token.
    pub fn public(prefix: impl Into<String>) -> Self {
        Self::new(prefix, RuleScope::Public)
    }

    /// Rule requiring any valid token.
    pub fn authenticated(prefix: impl Into<String>) -> Self {
        Self::new(prefix, RuleScope::Authenticated)
    }

    /// Rule requiring a token with `role`.
    pub fn require(prefix: impl Into<String>, role: Role) -> Self {
        Self::new(prefix, RuleScope::Require(role))
    }

    /// Returns `true` if `path` falls under this rule.
    #[inline]
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Ordered, immutable rule list with a fallback scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRules {
    rules: Vec<AccessRule>,
    fallback: RuleScope,
}

impl AccessRules {
    /// Orders `rules` for resolution. Unmatched paths are public.
    pub fn new(rules: impl IntoIterator<Item = AccessRule>) -> Self {
        let mut rules: Vec<_> = rules.into_iter().collect();
        rules.sort_by_key(|rule| {
            (
                rule.scope != RuleScope::Public,
                std::cmp::Reverse(rule.prefix.len()),
            )
        });

        Self {
            rules,
            fallback: RuleScope::Public,
        }
    }

    /// Replaces the scope applied to paths no rule matches.
    pub fn with_fallback(mut self, fallback: RuleScope) -> Self {
        self.fallback = fallback;
        self
    }

    /// Builds the rule list from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for any prefix that is empty or does
    /// not start with `/`.
    pub fn from_config(config: &AccessRulesConfig) -> Result<Self> {
        let public = config.public_paths.iter().map(AccessRule::public);
        let domains = [
            AccessRule::require(&config.admin_path_prefix, Role::Admin),
            AccessRule::require(&config.user_path_prefix, Role::User),
        ];

        let rules: Vec<_> = public.chain(domains).collect();
        if let Some(rule) = rules.iter().find(|rule| !rule.prefix.starts_with('/')) {
            return Err(Error::config(format!(
                "access rule prefix '{}' must start with '/'",
                rule.prefix
            )));
        }

        Ok(Self::new(rules))
    }

    /// Returns the scope governing `path`.
    pub fn resolve(&self, path: &str) -> RuleScope {
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map_or(self.fallback, |rule| rule.scope)
    }

    /// Returns the rules in resolution order.
    #[inline]
    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }

    /// Returns the fallback scope.
    #[inline]
    pub fn fallback(&self) -> RuleScope {
        self.fallback
    }
}

impl Default for AccessRules {
    fn default() -> Self {
        let rules = defaults::PUBLIC_PATHS
            .into_iter()
            .map(AccessRule::public)
            .chain([
                AccessRule::require(defaults::ADMIN_PATH_PREFIX, Role::Admin),
                AccessRule::require(defaults::USER_PATH_PREFIX, Role::User),
            ]);

        Self::new(rules)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        rules: AccessRulesConfig,
    }

    #[test]
    fn default_rules_resolve() {
        let rules = AccessRules::default();

        assert_eq!(rules.resolve("/api/user/login"), RuleScope::Public);
        assert_eq!(rules.resolve("/api/admin/login"), RuleScope::Public);
        assert_eq!(rules.resolve("/api/user/reset-password"), RuleScope::Public);
        assert_eq!(
            rules.resolve("/api/admin/user/list"),
            RuleScope::Require(Role::Admin)
        );
        assert_eq!(
            rules.resolve("/api/user/resume/list"),
            RuleScope::Require(Role::User)
        );
        assert_eq!(rules.resolve("/files/avatar.png"), RuleScope::Public);
    }

    #[test]
    fn public_rules_come_first() {
        let rules = AccessRules::new([
            AccessRule::require("/api/admin", Role::Admin),
            AccessRule::public("/api"),
            AccessRule::authenticated("/api/admin/login/extra"),
        ]);

        let prefixes: Vec<_> = rules.rules().iter().map(|r| r.prefix.as_str()).collect();
        assert_eq!(prefixes, ["/api", "/api/admin/login/extra", "/api/admin"]);
        assert_eq!(rules.resolve("/api/admin/user/list"), RuleScope::Public);
    }

    #[test]
    fn longest_prefix_wins_within_group() {
        let rules = AccessRules::new([
            AccessRule::require("/api", Role::User),
            AccessRule::require("/api/admin", Role::Admin),
        ]);

        assert_eq!(
            rules.resolve("/api/admin/profile"),
            RuleScope::Require(Role::Admin)
        );
        assert_eq!(rules.resolve("/api/other"), RuleScope::Require(Role::User));
    }

    #[test]
    fn ties_keep_declaration_order() {
        let rules = AccessRules::new([
            AccessRule::require("/api/x", Role::Admin),
            AccessRule::require("/api/x", Role::User),
        ]);

        assert_eq!(rules.resolve("/api/x/1"), RuleScope::Require(Role::Admin));
    }

    #[test]
    fn prefix_match_is_plain_string_prefix() {
        let rules = AccessRules::default();
        assert_eq!(
            rules.resolve("/api/username"),
            RuleScope::Require(Role::User)
        );
        assert_eq!(rules.resolve("/api/user/login-history"), RuleScope::Public);
    }

    #[test]
    fn fallback_scope() {
        let rules = AccessRules::default().with_fallback(RuleScope::Authenticated);
        assert_eq!(rules.resolve("/health"), RuleScope::Authenticated);
    }

    #[test]
    fn config_defaults_match_default_rules() {
        let cli = Cli::parse_from(["test"]);
        assert_eq!(cli.rules.public_paths, defaults::public_paths());

        let rules = AccessRules::from_config(&cli.rules).unwrap();
        assert_eq!(rules, AccessRules::default());
    }

    #[test]
    fn config_rejects_relative_prefix() {
        let config = AccessRulesConfig {
            admin_path_prefix: "api/admin".to_owned(),
            ..AccessRulesConfig::default()
        };

        assert!(AccessRules::from_config(&config).is_err());
    }
}
