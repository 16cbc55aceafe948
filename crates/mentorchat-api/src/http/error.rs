//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use mentorchat_types::error::SessionError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Unknown session id.
    SessionNotFound(String),
    /// Bad input (empty prompt or message, malformed id).
    Validation(String),
    /// The model client could not be constructed for the session's prompt.
    ModelClient(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::EmptyPrompt | SessionError::EmptyMessage => {
                AppError::Validation(e.to_string())
            }
            SessionError::ClientConstruction(_) => AppError::ModelClient(e.to_string()),
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session '{id}' not found"),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::ModelClient(msg) => {
                (StatusCode::BAD_GATEWAY, "MODEL_CLIENT_ERROR", msg.clone())
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.parts().0
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::warn!(code, %message, "Request failed");
        }
        let body = ApiResponse::error(code, &message, String::new());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentorchat_types::error::ClientConstructionError;

    #[test]
    fn test_session_error_mapping() {
        assert_eq!(
            AppError::from(SessionError::EmptyMessage).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(SessionError::EmptyPrompt).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(SessionError::ClientConstruction(
                ClientConstructionError::EmptyModel
            ))
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_not_found_response_status() {
        let response = AppError::SessionNotFound("abc".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
