// --- File: crates/slotbook_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

use crate::error::{HttpStatusCode, SlotbookError};

/// Message returned for 5xx errors when details are suppressed.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Extension trait for SlotbookError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response, hiding server-side details.
    fn into_http_response(self) -> Response;

    /// Converts the error into an Axum HTTP response. With `expose_details`
    /// set, 5xx responses carry the underlying message under `details`.
    fn into_http_response_with(self, expose_details: bool) -> Response;
}

impl IntoHttpResponse for SlotbookError {
    fn into_http_response(self) -> Response {
        self.into_http_response_with(false)
    }

    fn into_http_response_with(self, expose_details: bool) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = if status_code.is_server_error() {
            error!("Request failed: {}", self);
            if expose_details {
                json!({
                    "error": INTERNAL_ERROR_MESSAGE,
                    "kind": self.kind(),
                    "details": self.to_string(),
                })
            } else {
                json!({
                    "error": INTERNAL_ERROR_MESSAGE,
                    "kind": self.kind(),
                })
            }
        } else {
            debug!("Request rejected ({}): {}", status_code, self);
            json!({
                "error": self.message(),
                "kind": self.kind(),
            })
        };

        (status_code, Json(body)).into_response()
    }
}

/// Implement IntoResponse for SlotbookError to make it easier to use in Axum handlers.
impl IntoResponse for SlotbookError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// Converts a Result<T, SlotbookError> into a handler result, choosing whether
/// 5xx details are exposed.
pub fn handle_result<T>(result: Result<T, SlotbookError>, expose_details: bool) -> Result<T, Response>
where
    T: IntoResponse,
{
    result.map_err(|err| err.into_http_response_with(expose_details))
}
