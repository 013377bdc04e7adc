use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Business code carried by every failure envelope.
pub const FAILURE_CODE: u16 = 500;

/// Failure envelope `{"code": 500, "msg": <message>, "data": null}`.
///
/// Always delivered with HTTP status 200; clients branch on `code`.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// Business status code.
    pub code: u16,
    /// Localized message safe for client display.
    pub msg: Cow<'a, str>,
    /// Always `null`.
    pub data: (),
}

impl<'a> ErrorResponse<'a> {
    pub const ADMIN_REQUIRED: Self = Self::new("无管理员权限");
    pub const BAD_REQUEST: Self = Self::new("请求参数错误");
    pub const CONFLICT: Self = Self::new("资源已存在");
    pub const INTERNAL_SERVER_ERROR: Self = Self::new("服务器内部错误");
    pub const MALFORMED_AUTH_TOKEN: Self = Self::new("token无效或已过期");
    pub const MISSING_AUTH_TOKEN: Self = Self::new("未登录或登录已过期");
    pub const NOT_FOUND: Self = Self::new("接口不存在");
    pub const UNAUTHORIZED: Self = Self::new("用户名或密码错误");
    pub const USER_REQUIRED: Self = Self::new("无普通用户权限");

    /// Creates a new failure envelope.
    #[inline]
    pub const fn new(msg: &'a str) -> Self {
        Self {
            code: FAILURE_CODE,
            msg: Cow::Borrowed(msg),
            data: (),
        }
    }

    /// Replaces the message.
    pub fn with_message(mut self, msg: impl Into<Cow<'a, str>>) -> Self {
        self.msg = msg.into();
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
