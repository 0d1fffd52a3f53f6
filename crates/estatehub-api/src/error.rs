//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use estatehub_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// An [`AppError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Status code for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::DuplicateActiveSubscription => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::Authorization
        | ErrorKind::SubscriptionInactive
        | ErrorKind::SubscriptionExpired
        | ErrorKind::QuotaExceeded => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::ImageUploadFailed
        | ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Cache
        | ErrorKind::Storage
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::ExternalService => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn code_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Validation => "VALIDATION_ERROR",
        ErrorKind::Authentication => "UNAUTHORIZED",
        ErrorKind::Authorization => "FORBIDDEN",
        ErrorKind::NotFound => "NOT_FOUND",
        ErrorKind::Conflict => "CONFLICT",
        ErrorKind::SubscriptionInactive => "SUBSCRIPTION_INACTIVE",
        ErrorKind::SubscriptionExpired => "SUBSCRIPTION_EXPIRED",
        ErrorKind::QuotaExceeded => "QUOTA_EXCEEDED",
        ErrorKind::DuplicateActiveSubscription => "DUPLICATE_ACTIVE_SUBSCRIPTION",
        ErrorKind::ImageUploadFailed => "IMAGE_UPLOAD_FAILED",
        _ => "INTERNAL_ERROR",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind);

        let message = if err.kind.is_internal() {
            tracing::error!(kind = %err.kind, error = %err.message, "Internal server error");
            "Internal server error".to_string()
        } else {
            if err.kind == ErrorKind::ImageUploadFailed {
                tracing::error!(error = %err.message, "Image upload failed");
            }
            err.message
        };

        let body = ApiErrorResponse {
            error: code_for(err.kind).to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_rules_are_forbidden() {
        assert_eq!(status_for(ErrorKind::QuotaExceeded), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::SubscriptionExpired), StatusCode::FORBIDDEN);
        assert_eq!(
            status_for(ErrorKind::DuplicateActiveSubscription),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(ErrorKind::ImageUploadFailed),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_message_is_hidden() {
        let response = ApiError(AppError::database("relation \"listings\" does not exist"))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.message, "Internal server error");
    }
}
