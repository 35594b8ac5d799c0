use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// JSON error envelope returned by every handler: `{"message": ...}` plus an
/// optional `error` field carrying raw detail for unexpected failures.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, detail: Option<String>) -> Self {
        Self { status, message: message.into(), detail }
    }

    pub fn internal(message: impl Into<String>, detail: Option<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, detail)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({ "message": self.message });
        if let Some(detail) = self.detail {
            body["error"] = serde_json::Value::String(detail);
        }
        (self.status, Json(body)).into_response()
    }
}
