//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Every response, success or failure, is the JSON envelope
//! `{"code", "msg", "data"}` delivered with HTTP status 200.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod accounts;
mod authentication;
mod error;
mod request;
mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::request::{
    ChangePassword, Credentials, ResetAccountPassword, ResetPassword, UpdateAccount,
};
pub use crate::handler::response::{Account, ApiResponse, ErrorResponse, LoginResponse};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes and the not-found fallback.
///
/// Unknown paths and unsupported methods on known paths both answer with
/// the "接口不存在" envelope. The access gate is not applied here; layer it
/// with [`RouterAccessGateExt`](crate::middleware::RouterAccessGateExt).
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(authentication::routes())
        .merge(accounts::routes())
        .method_not_allowed_fallback(handler)
        .fallback(handler)
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::Method;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::handler::routes;
    use crate::middleware::RouterAccessGateExt;
    use crate::service::{ServiceConfig, ServiceState};

    static SERVER_COUNT: AtomicUsize = AtomicUsize::new(0);

    /// Returns a new [`TestServer`] with the full router, the access gate and
    /// a seeded `root`/`toor` administrator. Every server signs with its own
    /// secret.
    pub async fn create_test_server() -> anyhow::Result<TestServer> {
        let id = SERVER_COUNT.fetch_add(1, Ordering::Relaxed);
        let config = ServiceConfig::new(format!("handler-test-secret-{id:04}-0123456789abcdef"))
            .with_admin("root", "toor");
        let state = ServiceState::from_config(&config).await?;

        let app = routes()
            .with_access_gate(state.clone())
            .with_state(state);
        let server = TestServer::new(app)?;
        Ok(server)
    }

    async fn post_json(server: &TestServer, path: &str, body: Value) -> Value {
        server.post(path).json(&body).await.json::<Value>()
    }

    async fn login(server: &TestServer, path: &str, username: &str, password: &str) -> String {
        let body = post_json(
            server,
            path,
            json!({ "username": username, "password": password }),
        )
        .await;

        assert_eq!(body["code"], 200, "login failed: {body}");
        body["data"]["token"].as_str().unwrap_or_default().to_owned()
    }

    async fn register(server: &TestServer, username: &str, password: &str) -> Value {
        post_json(
            server,
            "/api/user/register",
            json!({ "username": username, "password": password }),
        )
        .await
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn register_login_and_profile() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let body = register(&server, "alice", "123456").await;
        assert_eq!(body, json!({ "code": 200, "msg": "注册成功", "data": null }));

        let body = post_json(
            &server,
            "/api/user/login",
            json!({ "username": "alice", "password": "123456" }),
        )
        .await;
        assert_eq!(body["code"], 200);
        assert_eq!(body["msg"], "登录成功");
        assert_eq!(body["data"]["username"], "alice");
        assert_eq!(body["data"]["role"], "user");

        let token = body["data"]["token"].as_str().unwrap_or_default();
        let body = server
            .get("/api/user/profile")
            .authorization_bearer(token)
            .await
            .json::<Value>();
        assert_eq!(
            body,
            json!({
                "code": 200,
                "msg": "成功",
                "data": { "identity": "alice", "role": "user" },
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn user_token_is_denied_admin_paths() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        register(&server, "alice", "123456").await;
        let token = login(&server, "/api/user/login", "alice", "123456").await;

        let response = server
            .get("/api/admin/user/list")
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "code": 500, "msg": "无管理员权限", "data": null }));

        let body = server
            .get("/api/user/profile")
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        assert_eq!(body["code"], 200);
        Ok(())
    }

    #[tokio::test]
    async fn admin_token_is_denied_user_paths() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        let token = login(&server, "/api/admin/login", "root", "toor").await;

        let body = server
            .get("/api/user/profile")
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        assert_eq!(body["msg"], "无普通用户权限");

        let body = server
            .get("/api/admin/profile")
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        assert_eq!(body["data"], json!({ "identity": "root", "role": "admin" }));
        Ok(())
    }

    #[tokio::test]
    async fn missing_and_invalid_tokens() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let body = server.get("/api/user/profile").await.json::<Value>();
        assert_eq!(
            body,
            json!({ "code": 500, "msg": "未登录或登录已过期", "data": null })
        );

        let body = server
            .get("/api/admin/user/list")
            .authorization_bearer("not-a-token")
            .await
            .json::<Value>();
        assert_eq!(body["msg"], "token无效或已过期");
        Ok(())
    }

    #[tokio::test]
    async fn public_login_needs_no_token() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        let token = login(&server, "/api/admin/login", "root", "toor").await;
        assert!(!token.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn options_bypasses_gate() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let body = server
            .method(Method::OPTIONS, "/api/admin/unknown")
            .await
            .json::<Value>();
        assert_eq!(body["msg"], "接口不存在");

        let body = server.get("/api/admin/unknown").await.json::<Value>();
        assert_eq!(body["msg"], "未登录或登录已过期");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_public_route() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let body = server.get("/api/resume/list").await.json::<Value>();
        assert_eq!(body, json!({ "code": 500, "msg": "接口不存在", "data": null }));
        Ok(())
    }

    #[tokio::test]
    async fn login_rejections() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        register(&server, "alice", "123456").await;

        let credentials = [
            ("/api/user/login", "alice", "wrong"),
            ("/api/user/login", "nobody", "123456"),
            ("/api/admin/login", "alice", "123456"),
            ("/api/admin/login", "root", "wrong"),
        ];

        for (path, username, password) in credentials {
            let body = post_json(
                &server,
                path,
                json!({ "username": username, "password": password }),
            )
            .await;
            assert_eq!(body["msg"], "用户名或密码错误", "{path} {username}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn user_login_issues_stored_role() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let body = post_json(
            &server,
            "/api/user/login",
            json!({ "username": "root", "password": "toor" }),
        )
        .await;
        assert_eq!(body["msg"], "登录成功");
        assert_eq!(body["data"]["role"], "admin");

        let token = body["data"]["token"].as_str().unwrap_or_default();
        let body = server
            .get("/api/admin/profile")
            .authorization_bearer(token)
            .await
            .json::<Value>();
        assert_eq!(body["data"], json!({ "identity": "root", "role": "admin" }));
        Ok(())
    }

    #[tokio::test]
    async fn register_rejections() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        register(&server, "alice", "123456").await;

        let body = register(&server, "alice", "other").await;
        assert_eq!(body["msg"], "用户名已存在");

        let body = register(&server, "", "123456").await;
        assert_eq!(body["code"], 500);
        assert!(body["msg"].as_str().unwrap_or_default().contains("username"));

        let body = server
            .post("/api/user/register")
            .text("not json")
            .await
            .json::<Value>();
        assert_eq!(body["code"], 500);
        Ok(())
    }

    #[tokio::test]
    async fn reset_password_flow() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        register(&server, "alice", "123456").await;

        let body = post_json(&server, "/api/user/reset-password", json!({ "username": "alice" })).await;
        assert_eq!(body["msg"], "用户名和新密码不能为空");

        let body = post_json(
            &server,
            "/api/user/reset-password",
            json!({ "username": "ghost", "password": "x" }),
        )
        .await;
        assert_eq!(body["msg"], "用户不存在");

        let body = post_json(
            &server,
            "/api/user/reset-password",
            json!({ "username": "alice", "password": "654321" }),
        )
        .await;
        assert_eq!(body["msg"], "密码重置成功");

        login(&server, "/api/user/login", "alice", "654321").await;
        Ok(())
    }

    #[tokio::test]
    async fn reset_password_reaches_admins() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let body = post_json(
            &server,
            "/api/user/reset-password",
            json!({ "username": "root", "password": "taken" }),
        )
        .await;
        assert_eq!(body["msg"], "密码重置成功");

        login(&server, "/api/admin/login", "root", "taken").await;
        Ok(())
    }

    #[tokio::test]
    async fn wrong_method_renders_not_found() -> anyhow::Result<()> {
        let server = create_test_server().await?;

        let response = server.get("/api/user/login").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "code": 500, "msg": "接口不存在", "data": null }));
        Ok(())
    }

    #[tokio::test]
    async fn admin_cannot_edit_or_delete_self() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        let token = login(&server, "/api/admin/login", "root", "toor").await;

        let body = server
            .put("/api/admin/user/root")
            .authorization_bearer(&token)
            .json(&json!({ "username": "superuser" }))
            .await
            .json::<Value>();
        assert_eq!(body["msg"], "不能修改自己，请用修改密码接口");

        let body = server
            .delete("/api/admin/user/root")
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        assert_eq!(body["msg"], "不能删除自己");

        login(&server, "/api/admin/login", "root", "toor").await;
        Ok(())
    }

    #[tokio::test]
    async fn admin_updates_account() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        register(&server, "alice", "123456").await;
        register(&server, "bob", "123456").await;
        let token = login(&server, "/api/admin/login", "root", "toor").await;

        let body = server
            .put("/api/admin/user/alice")
            .authorization_bearer(&token)
            .json(&json!({ "username": "bob", "password": "ignored" }))
            .await
            .json::<Value>();
        assert_eq!(body["msg"], "用户名已存在");
        login(&server, "/api/user/login", "alice", "123456").await;

        let body = server
            .put("/api/admin/user/ghost")
            .authorization_bearer(&token)
            .json(&json!({ "password": "x" }))
            .await
            .json::<Value>();
        assert_eq!(body["msg"], "用户不存在");

        let body = server
            .put("/api/admin/user/alice")
            .authorization_bearer(&token)
            .json(&json!({ "username": "alicia", "password": "n3w" }))
            .await
            .json::<Value>();
        assert_eq!(body, json!({ "code": 200, "msg": "用户信息修改成功", "data": null }));

        login(&server, "/api/user/login", "alicia", "n3w").await;
        let body = post_json(
            &server,
            "/api/user/login",
            json!({ "username": "alice", "password": "123456" }),
        )
        .await;
        assert_eq!(body["msg"], "用户名或密码错误");
        Ok(())
    }

    #[tokio::test]
    async fn admin_deletes_account() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        register(&server, "alice", "123456").await;
        let token = login(&server, "/api/admin/login", "root", "toor").await;

        let body = server
            .delete("/api/admin/user/alice")
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        assert_eq!(body["msg"], "用户删除成功");

        let body = server
            .delete("/api/admin/user/alice")
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        assert_eq!(body["msg"], "用户不存在");
        Ok(())
    }

    #[tokio::test]
    async fn admin_resets_account_password() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        register(&server, "alice", "123456").await;
        let token = login(&server, "/api/admin/login", "root", "toor").await;

        let body = server
            .post("/api/admin/user/alice/reset-password")
            .authorization_bearer(&token)
            .json(&json!({ "password": "" }))
            .await
            .json::<Value>();
        assert_eq!(body["msg"], "新密码不能为空");

        let body = server
            .post("/api/admin/user/ghost/reset-password")
            .authorization_bearer(&token)
            .json(&json!({ "password": "x" }))
            .await
            .json::<Value>();
        assert_eq!(body["msg"], "用户不存在");

        let body = server
            .post("/api/admin/user/alice/reset-password")
            .authorization_bearer(&token)
            .json(&json!({ "password": "654321" }))
            .await
            .json::<Value>();
        assert_eq!(body["msg"], "密码重置成功");

        login(&server, "/api/user/login", "alice", "654321").await;
        Ok(())
    }

    #[tokio::test]
    async fn user_token_cannot_manage_accounts() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        register(&server, "alice", "123456").await;
        register(&server, "bob", "123456").await;
        let token = login(&server, "/api/user/login", "alice", "123456").await;

        let body = server
            .delete("/api/admin/user/bob")
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        assert_eq!(body["msg"], "无管理员权限");
        Ok(())
    }

    #[tokio::test]
    async fn admin_lists_accounts_without_secrets() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        register(&server, "alice", "123456").await;
        let token = login(&server, "/api/admin/login", "root", "toor").await;

        let body = server
            .get("/api/admin/user/list")
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        assert_eq!(
            body["data"],
            json!([
                { "username": "alice", "role": "user" },
                { "username": "root", "role": "admin" },
            ])
        );
        assert!(!body.to_string().contains("123456"));
        Ok(())
    }

    #[tokio::test]
    async fn admin_changes_password() -> anyhow::Result<()> {
        let server = create_test_server().await?;
        let token = login(&server, "/api/admin/login", "root", "toor").await;

        let body = server
            .post("/api/admin/changePassword")
            .authorization_bearer(&token)
            .json(&json!({ "oldPassword": "wrong", "newPassword": "n3w" }))
            .await
            .json::<Value>();
        assert_eq!(body["msg"], "旧密码错误");

        let body = server
            .post("/api/admin/changePassword")
            .authorization_bearer(&token)
            .json(&json!({ "oldPassword": "toor", "newPassword": "n3w" }))
            .await
            .json::<Value>();
        assert_eq!(body["msg"], "密码修改成功");

        login(&server, "/api/admin/login", "root", "n3w").await;
        Ok(())
    }
}
