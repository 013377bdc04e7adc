//! Service and store error to HTTP error conversion.

use super::http_error::{Error as HttpError, ErrorKind};
use crate::service::StoreError;
use crate::utility::tracing_targets::TRACING_TARGET_RECOVERY_ERROR as TRACING_TARGET;

impl From<crate::Error> for HttpError<'static> {
    fn from(error: crate::Error) -> Self {
        tracing::error!(
            target: TRACING_TARGET,
            error = %error,
            error_kind = %error.kind(),
            "service operation failed"
        );

        ErrorKind::InternalServerError
            .with_context(error.to_string())
            .with_resource(error.kind().as_str())
    }
}

impl From<StoreError> for HttpError<'static> {
    fn from(error: StoreError) -> Self {
        tracing::warn!(
            target: TRACING_TARGET,
            error = %error,
            "credential store operation failed"
        );

        match error {
            StoreError::NotFound(identity) => ErrorKind::NotFound
                .with_message("用户不存在")
                .with_context(format!("no account for identity '{identity}'"))
                .with_resource("account"),
            StoreError::Conflict(identity) => ErrorKind::Conflict
                .with_message("用户名已存在")
                .with_context(format!("identity '{identity}' is taken"))
                .with_resource("account"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_kinds() {
        let error = HttpError::from(StoreError::Conflict("alice".to_owned()));
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.message(), Some("用户名已存在"));

        let error = HttpError::from(StoreError::NotFound("ghost".to_owned()));
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), Some("用户不存在"));
    }

    #[test]
    fn service_errors_are_internal() {
        let error = HttpError::from(crate::Error::auth("signing failed"));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.resource(), Some("auth"));
    }
}
