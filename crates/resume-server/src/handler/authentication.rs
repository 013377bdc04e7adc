//! Authentication handlers for login, registration and password reset.
//!
//! User and administrator accounts share one credential store. The user
//! login accepts any account and issues its stored role; the admin login
//! only accepts administrators.

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use jiff::Timestamp;

use crate::extract::{Role, ValidateJson};
use crate::handler::request::{Credentials, ResetPassword};
use crate::handler::response::{ApiResponse, LoginResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::{
    CredentialRecord, CredentialVerifier, ServiceState, SharedCredentialStore, TokenCodec,
};
use crate::utility::tracing_targets::TRACING_TARGET_ACCOUNTS as TRACING_TARGET;

/// Verifies `credentials` and issues a token carrying the stored role.
///
/// With `required_role` set, accounts of any other role are rejected as if
/// the password were wrong.
async fn login(
    credential_store: &SharedCredentialStore,
    credential_verifier: &CredentialVerifier,
    token_codec: &TokenCodec,
    credentials: Credentials,
    required_role: Option<Role>,
) -> Result<ApiResponse<LoginResponse>> {
    let record = credential_store
        .find_principal_by_identity(&credentials.username)
        .await?
        .filter(|record| required_role.is_none_or(|role| record.role == role));

    let verified = record.as_ref().is_some_and(|record| {
        credential_verifier.verify(
            Some(credentials.password.as_str()),
            Some(record.secret.as_str()),
        )
    });

    let Some(CredentialRecord { role, .. }) = record.filter(|_| verified) else {
        tracing::warn!(
            target: TRACING_TARGET,
            username = %credentials.username,
            required_role = ?required_role,
            "login rejected"
        );

        return Err(ErrorKind::Unauthorized
            .with_context("unknown account or wrong password")
            .with_resource("authentication"));
    };

    let token = token_codec.issue(&credentials.username, role, Timestamp::now())?;

    tracing::info!(
        target: TRACING_TARGET,
        username = %credentials.username,
        role = %role,
        "login succeeded"
    );

    let response = LoginResponse {
        token: token.into_inner(),
        username: credentials.username,
        role,
    };

    Ok(ApiResponse::with_message("登录成功", response))
}

/// Logs in with any account; the token carries the account's stored role,
/// so an administrator logging in here receives an admin token.
#[tracing::instrument(skip_all)]
async fn user_login(
    State(credential_store): State<SharedCredentialStore>,
    State(credential_verifier): State<CredentialVerifier>,
    State(token_codec): State<TokenCodec>,
    ValidateJson(request): ValidateJson<Credentials>,
) -> Result<ApiResponse<LoginResponse>> {
    login(
        &credential_store,
        &credential_verifier,
        &token_codec,
        request,
        None,
    )
    .await
}

/// Logs in an administrator.
#[tracing::instrument(skip_all)]
async fn admin_login(
    State(credential_store): State<SharedCredentialStore>,
    State(credential_verifier): State<CredentialVerifier>,
    State(token_codec): State<TokenCodec>,
    ValidateJson(request): ValidateJson<Credentials>,
) -> Result<ApiResponse<LoginResponse>> {
    login(
        &credential_store,
        &credential_verifier,
        &token_codec,
        request,
        Some(Role::Admin),
    )
    .await
}

/// Creates a new regular user account.
#[tracing::instrument(skip_all)]
async fn register(
    State(credential_store): State<SharedCredentialStore>,
    ValidateJson(request): ValidateJson<Credentials>,
) -> Result<ApiResponse<()>> {
    let record = CredentialRecord::new(&request.username, request.password, Role::User);
    credential_store.insert(record).await?;

    tracing::info!(
        target: TRACING_TARGET,
        username = %request.username,
        "account registered"
    );

    Ok(ApiResponse::message("注册成功"))
}

/// Replaces the password of any account without the old one.
///
/// The endpoint is public and needs neither a token nor the old password,
/// so anyone who knows a username, including an administrator's, can take
/// the account over. Kept for compatibility with existing clients; it
/// should be removed or put behind a verified channel.
#[tracing::instrument(skip_all)]
async fn reset_password(
    State(credential_store): State<SharedCredentialStore>,
    ValidateJson(request): ValidateJson<ResetPassword>,
) -> Result<ApiResponse<()>> {
    let Some((username, password)) = request.fields() else {
        return Err(ErrorKind::BadRequest
            .with_message("用户名和新密码不能为空")
            .with_resource("account"));
    };

    credential_store.update_secret(username, password).await?;

    tracing::warn!(
        target: TRACING_TARGET,
        username = %username,
        "password reset without authentication"
    );

    Ok(ApiResponse::message("密码重置成功"))
}

/// Returns a [`Router`] with all public authentication routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/user/login", post(user_login))
        .route("/api/user/register", post(register))
        .route("/api/user/reset-password", post(reset_password))
        .route("/api/admin/login", post(admin_login))
}
