//! Access gate middleware.
//!
//! Intercepts every request, resolves the path's [`RuleScope`], and either
//! lets the request through (attaching the resolved [`Principal`] to its
//! extensions) or short-circuits with the enveloped denial.
//!
//! [`Principal`]: crate::extract::Principal

mod gate;
mod rules;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use jiff::Timestamp;

pub use self::gate::{AccessGate, GateDecision};
pub use self::rules::{AccessRule, AccessRules, AccessRulesConfig, RuleScope};
use crate::service::ServiceState;

/// Extension trait for `axum::`[`Router`] to apply the access gate.
pub trait RouterAccessGateExt<S> {
    /// Layers the access gate over every route and the fallback.
    fn with_access_gate(self, state: ServiceState) -> Self;
}

impl<S> RouterAccessGateExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_access_gate(self, state: ServiceState) -> Self {
        self.layer(from_fn_with_state(state, access_gate))
    }
}

/// Enforces the access rules for a single request.
pub async fn access_gate(
    State(gate): State<AccessGate>,
    mut request: Request,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let decision = gate.evaluate(
        request.method(),
        request.uri().path(),
        authorization,
        Timestamp::now(),
    );

    match decision {
        GateDecision::Allow(principal) => {
            if let Some(principal) = principal {
                request.extensions_mut().insert(principal);
            }

            next.run(request).await
        }
        GateDecision::Deny(kind) => kind.into_response(),
    }
}
