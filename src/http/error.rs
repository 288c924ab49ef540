//! HTTP error mapping
//!
//! Every failure leaves the service as `{"detail": "...", "code": <status>}`.

use crate::domain::NovaError;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// JSON error body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: u16,
}

/// Error returned by route handlers
#[derive(Debug)]
pub enum ApiError {
    /// A domain failure
    Nova(NovaError),
    /// The request could not be extracted
    Rejected { status: StatusCode, detail: String },
}

impl ApiError {
    /// Status code this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Nova(NovaError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Nova(e) if e.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Nova(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected { status, .. } => *status,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Nova(NovaError::Validation(message)) => message.clone(),
            ApiError::Nova(NovaError::Configuration(message)) => message.clone(),
            ApiError::Nova(e) => e.to_string(),
            ApiError::Rejected { detail, .. } => detail.clone(),
        }
    }
}

impl From<NovaError> for ApiError {
    fn from(err: NovaError) -> Self {
        ApiError::Nova(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Rejected {
            status: err.status(),
            detail: err.body_text(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::Rejected {
            status: err.status(),
            detail: err.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %detail, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %detail, "Request rejected");
        }

        let body = ErrorResponse {
            detail,
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoreError;

    #[test]
    fn test_status_mapping() {
        let validation = ApiError::from(NovaError::Validation("empty".to_string()));
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let unconfigured = ApiError::from(NovaError::Configuration("no db".to_string()));
        assert_eq!(unconfigured.status(), StatusCode::SERVICE_UNAVAILABLE);

        let unreachable =
            ApiError::from(NovaError::from(StoreError::ConnectionFailed("refused".to_string())));
        assert_eq!(unreachable.status(), StatusCode::SERVICE_UNAVAILABLE);

        let query = ApiError::from(NovaError::from(StoreError::QueryFailed("syntax".to_string())));
        assert_eq!(query.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_detail_is_bare_message() {
        let err = ApiError::from(NovaError::Configuration("Database not configured".to_string()));
        assert_eq!(err.detail(), "Database not configured");
    }
}
