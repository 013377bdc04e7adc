//! Account handlers for authenticated principals.

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post, put};

use crate::extract::{Path, Principal, ValidateJson};
use crate::handler::request::{ChangePassword, ResetAccountPassword, UpdateAccount};
use crate::handler::response::{Account, ApiResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::{CredentialVerifier, ServiceState, SharedCredentialStore};
use crate::utility::tracing_targets::TRACING_TARGET_ACCOUNTS as TRACING_TARGET;

/// Returns the principal resolved from the session token.
#[tracing::instrument(skip_all)]
async fn profile(principal: Principal) -> ApiResponse<Principal> {
    ApiResponse::success(principal)
}

/// Lists all accounts without their secrets.
#[tracing::instrument(skip_all)]
async fn list_accounts(
    State(credential_store): State<SharedCredentialStore>,
) -> Result<ApiResponse<Vec<Account>>> {
    let accounts = credential_store
        .list()
        .await?
        .into_iter()
        .map(Account::from)
        .collect();

    Ok(ApiResponse::success(accounts))
}

/// Changes the password of the acting administrator.
#[tracing::instrument(skip_all)]
async fn change_password(
    principal: Principal,
    State(credential_store): State<SharedCredentialStore>,
    State(credential_verifier): State<CredentialVerifier>,
    ValidateJson(request): ValidateJson<ChangePassword>,
) -> Result<ApiResponse<()>> {
    let Some(record) = credential_store
        .find_principal_by_identity(&principal.identity)
        .await?
    else {
        return Err(ErrorKind::NotFound
            .with_message("用户不存在")
            .with_context("token identity has no stored account")
            .with_resource("account"));
    };

    let verified = credential_verifier.verify(
        Some(request.old_password.as_str()),
        Some(record.secret.as_str()),
    );

    if !verified {
        tracing::warn!(
            target: TRACING_TARGET,
            username = %principal.identity,
            "password change rejected: wrong old password"
        );

        return Err(ErrorKind::BadRequest
            .with_message("旧密码错误")
            .with_resource("account"));
    }

    credential_store
        .update_secret(&principal.identity, &request.new_password)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        username = %principal.identity,
        "password changed"
    );

    Ok(ApiResponse::message("密码修改成功"))
}

/// Renames and/or re-passwords another account.
///
/// Administrators edit their own account through the password change
/// endpoint instead.
#[tracing::instrument(skip_all)]
async fn update_account(
    principal: Principal,
    State(credential_store): State<SharedCredentialStore>,
    Path(username): Path<String>,
    ValidateJson(request): ValidateJson<UpdateAccount>,
) -> Result<ApiResponse<()>> {
    if username == principal.identity {
        return Err(ErrorKind::BadRequest
            .with_message("不能修改自己，请用修改密码接口")
            .with_resource("account"));
    }

    if credential_store
        .find_principal_by_identity(&username)
        .await?
        .is_none()
    {
        return Err(ErrorKind::NotFound
            .with_message("用户不存在")
            .with_context(format!("no account '{username}'"))
            .with_resource("account"));
    }

    // Rename first so a taken username leaves the account untouched.
    let mut identity = username.as_str();
    if let Some(new_username) = request.username.as_deref() {
        credential_store.rename(identity, new_username).await?;
        identity = new_username;
    }

    if let Some(password) = request.password() {
        credential_store.update_secret(identity, password).await?;
    }

    tracing::info!(
        target: TRACING_TARGET,
        admin = %principal.identity,
        username = %username,
        new_username = %identity,
        password_changed = request.password().is_some(),
        "account updated"
    );

    Ok(ApiResponse::message("用户信息修改成功"))
}

/// Deletes another account.
#[tracing::instrument(skip_all)]
async fn delete_account(
    principal: Principal,
    State(credential_store): State<SharedCredentialStore>,
    Path(username): Path<String>,
) -> Result<ApiResponse<()>> {
    if username == principal.identity {
        return Err(ErrorKind::BadRequest
            .with_message("不能删除自己")
            .with_resource("account"));
    }

    credential_store.remove(&username).await?;

    tracing::info!(
        target: TRACING_TARGET,
        admin = %principal.identity,
        username = %username,
        "account deleted"
    );

    Ok(ApiResponse::message("用户删除成功"))
}

/// Sets a new password on any account without knowing the old one.
#[tracing::instrument(skip_all)]
async fn reset_account_password(
    principal: Principal,
    State(credential_store): State<SharedCredentialStore>,
    Path(username): Path<String>,
    ValidateJson(request): ValidateJson<ResetAccountPassword>,
) -> Result<ApiResponse<()>> {
    let Some(password) = request.password() else {
        return Err(ErrorKind::BadRequest
            .with_message("新密码不能为空")
            .with_resource("account"));
    };

    credential_store.update_secret(&username, password).await?;

    tracing::info!(
        target: TRACING_TARGET,
        admin = %principal.identity,
        username = %username,
        "account password reset"
    );

    Ok(ApiResponse::message("密码重置成功"))
}

/// Returns a [`Router`] with all routes that require a principal.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/user/profile", get(profile))
        .route("/api/admin/profile", get(profile))
        .route("/api/admin/user/list", get(list_accounts))
        .route("/api/admin/changePassword", post(change_password))
        .route(
            "/api/admin/user/{username}",
            put(update_account).delete(delete_account),
        )
        .route(
            "/api/admin/user/{username}/reset-password",
            post(reset_account_password),
        )
}
