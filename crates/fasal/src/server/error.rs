//! Mapping of diagnosis failures onto HTTP responses.
//!
//! Error bodies are `{"detail": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fasal_core::DiagnosisError;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// Error returned by HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Failure inside the diagnosis pipeline
    Diagnosis(DiagnosisError),
    /// Malformed or incomplete request
    Request { status: StatusCode, detail: String },
}

impl ApiError {
    pub fn unprocessable(detail: impl Into<String>) -> Self {
        ApiError::Request {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: detail.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Diagnosis(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Diagnosis(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Request { status, .. } => *status,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Diagnosis(e) => e.to_string(),
            ApiError::Request { detail, .. } => detail.clone(),
        }
    }
}

impl From<DiagnosisError> for ApiError {
    fn from(err: DiagnosisError) -> Self {
        ApiError::Diagnosis(err)
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ApiError::Request {
            status: err.status(),
            detail: format!("Multipart error: {}", err.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.detail();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{detail}");
        } else {
            tracing::warn!(status = status.as_u16(), "{detail}");
        }
        (status, Json(ErrorBody { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let invalid = ApiError::from(DiagnosisError::InvalidImage("bad".into()));
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let unconfigured = ApiError::from(DiagnosisError::NoProviderConfigured);
        assert_eq!(unconfigured.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let upstream = ApiError::from(DiagnosisError::Provider {
            provider: "OpenAI".into(),
            message: "HTTP 429".into(),
            status_code: Some(429),
        });
        // Upstream status is not forwarded
        assert_eq!(upstream.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let internal = ApiError::from(DiagnosisError::Internal("boom".into()));
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(
            ApiError::unprocessable("missing").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_detail_is_error_display() {
        let err = ApiError::from(DiagnosisError::Internal("boom".into()));
        assert_eq!(err.detail(), "Diagnosis failed: boom");
    }
}
