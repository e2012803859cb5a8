//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use storm_types::error::SessionError;

use crate::http::response::ApiResponse;

pub const NOT_REGISTERED: &str = "Client not registered.";
pub const UNKNOWN_TOKEN: &str = "Unrecognized token.";
pub const INVALID_REQUEST: &str = "Invalid request.";
pub const INTERNAL_ERROR: &str = "Internal error.";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat protocol errors.
    Session(SessionError),
    /// Malformed identification headers.
    Unauthorized(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, reason) = match &self {
            AppError::Session(SessionError::NotRegistered) => {
                (StatusCode::FORBIDDEN, NOT_REGISTERED.to_string())
            }
            AppError::Session(SessionError::UnknownToken) => {
                (StatusCode::FORBIDDEN, UNKNOWN_TOKEN.to_string())
            }
            AppError::Session(SessionError::InvalidRequest(detail)) => {
                tracing::debug!(%detail, "Rejected request");
                (StatusCode::BAD_REQUEST, INVALID_REQUEST.to_string())
            }
            AppError::Session(SessionError::NicknameRejected(e)) => {
                (StatusCode::BAD_REQUEST, format!("Nickname rejected: {e}."))
            }
            AppError::Session(SessionError::Internal(detail)) => {
                tracing::error!(%detail, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
            AppError::Unauthorized(msg) => (StatusCode::FORBIDDEN, msg.clone()),
        };

        ApiResponse::reason(status, reason).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storm_types::error::NicknameError;

    fn status_of(e: SessionError) -> StatusCode {
        AppError::from(e).into_response().status()
    }

    #[test]
    fn test_session_error_statuses() {
        assert_eq!(status_of(SessionError::NotRegistered), StatusCode::FORBIDDEN);
        assert_eq!(status_of(SessionError::UnknownToken), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(SessionError::InvalidRequest("no content".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(SessionError::NicknameRejected(NicknameError::Missing)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(SessionError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_nickname_reason_names_cause() {
        let resp = AppError::from(SessionError::NicknameRejected(NicknameError::Taken("bee".into())))
            .into_response();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], 400);
        assert_eq!(json["reason"], "Nickname rejected: nickname 'bee' is taken.");
    }

    #[tokio::test]
    async fn test_internal_detail_is_not_leaked() {
        let resp = AppError::from(SessionError::Internal("disk on fire".into())).into_response();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["reason"], INTERNAL_ERROR);
    }
}
