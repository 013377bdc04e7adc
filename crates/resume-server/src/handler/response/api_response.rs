use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Business code carried by every success envelope.
pub const SUCCESS_CODE: u16 = 200;

/// Default success message.
const SUCCESS_MESSAGE: &str = "成功";

/// Success envelope `{"code": 200, "msg": <message>, "data": <payload>}`.
#[must_use]
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Business status code.
    pub code: u16,
    /// Localized message.
    pub msg: Cow<'static, str>,
    /// Response payload.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wraps `data` with the default success message.
    pub fn success(data: T) -> Self {
        Self::with_message(SUCCESS_MESSAGE, data)
    }

    /// Wraps `data` with a custom success message.
    pub fn with_message(msg: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: msg.into(),
            data,
        }
    }
}

impl ApiResponse<()> {
    /// Success envelope with `null` data.
    pub fn message(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::with_message(msg, ())
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope() {
        let json = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": 200, "msg": "成功", "data": [1, 2] })
        );
    }

    #[test]
    fn message_only_envelope() {
        let json = serde_json::to_value(ApiResponse::message("注册成功")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "code": 200, "msg": "注册成功", "data": null })
        );
    }
}
