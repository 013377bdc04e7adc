//! Middleware for `axum::Router` and HTTP request processing.
//!
//! Layers, innermost to outermost:
//!
//! - Access gate (token resolution and path-prefix role rules)
//! - Security (CORS)
//! - Observability (request ids, tracing, sensitive headers)
//! - Recovery (panics, timeouts, service errors)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use resume_server::middleware::{
//!     RouterAccessGateExt, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//! use resume_server::service::ServiceState;
//!
//! fn layered(router: Router<ServiceState>, state: ServiceState) -> Router<ServiceState> {
//!     router
//!         .with_access_gate(state)
//!         .with_default_security()
//!         .with_observability()
//!         .with_default_recovery()
//! }
//! ```

mod access_gate;
mod observability;
mod recovery;
mod security;

pub use access_gate::{
    AccessGate, AccessRule, AccessRules, AccessRulesConfig, GateDecision, RouterAccessGateExt,
    RuleScope, access_gate,
};
pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, RouterSecurityExt};
