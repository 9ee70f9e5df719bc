use crate::app::{CatalogError, CatalogView};
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value as JsonValue;

pub fn status_for(err: &CatalogError) -> StatusCode {
    match err {
        CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
        CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
        CatalogError::Store(_) => StatusCode::BAD_GATEWAY,
    }
}

pub fn ok_response(data: JsonValue) -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }),
    )
        .into_response()
}

pub fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }),
    )
        .into_response()
}

/// Error envelope. `data` carries the view that is still on display, when there is one.
pub fn error_response(err: &CatalogError, view: Option<&CatalogView>) -> Response {
    (
        status_for(err),
        Json(ApiResponse {
            success: false,
            data: view.and_then(|v| serde_json::to_value(v).ok()),
            error: Some(err.to_string()),
        }),
    )
        .into_response()
}

pub fn to_json<T: Serialize>(value: &T) -> JsonValue {
    serde_json::to_value(value).unwrap_or(JsonValue::Null)
}

/// Standard reply after a listing trigger: the current view on success, the error plus the
/// unchanged view on failure.
pub fn view_result(result: Result<(), CatalogError>, view: CatalogView) -> Response {
    match result {
        Ok(()) => ok_response(to_json(&view)),
        Err(err) => error_response(&err, Some(&view)),
    }
}
