//! Envelope response format for all chat responses.
//!
//! Every response is a JSON object whose `status` mirrors the HTTP status,
//! carrying either a human-readable `reason` or a `data` payload:
//! ```json
//! { "status": 201, "reason": "Message created." }
//! { "status": 200, "data": [ ... ] }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// HTTP status code, repeated in the body.
    pub status: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// A response carrying a data payload.
    pub fn data(status: StatusCode, data: T) -> Self {
        Self {
            status: status.as_u16(),
            reason: None,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// A response carrying only a human-readable reason.
    pub fn reason(status: StatusCode, reason: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            reason: Some(reason.into()),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::to_string(&self).unwrap_or_else(|_| {
            r#"{"status":500,"reason":"Failed to serialize response."}"#.to_string()
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
