//! Centralized tracing target constants for structured logging.
//!
//! This module defines all tracing target strings used throughout the crate,
//! providing a single source of truth for log categorization and filtering.
//! Using consistent targets enables fine-grained control over log output
//! via tracing subscriber filters.

/// Authentication-related operations including token issuance and resolution.
pub const TRACING_TARGET_AUTHENTICATION: &str = "resume_server::authentication";

/// Authorization checks including path rule resolution and role gating.
pub const TRACING_TARGET_AUTHORIZATION: &str = "resume_server::authorization";

/// Error recovery including middleware errors and request failures.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "resume_server::recovery::error";

/// Panic recovery including handler panics and service failures.
pub const TRACING_TARGET_RECOVERY_PANIC: &str = "resume_server::recovery::panic";

/// Session key management and token signing operations.
pub const TRACING_TARGET_SESSION_KEYS: &str = "resume_server::session_keys";

/// Credential store reads and writes.
pub const TRACING_TARGET_CREDENTIAL_STORE: &str = "resume_server::credential_store";

/// Account handlers (login, registration, password changes).
pub const TRACING_TARGET_ACCOUNTS: &str = "resume_server::accounts";
