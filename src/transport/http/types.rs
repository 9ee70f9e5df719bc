use crate::app::CatalogService;
use crate::domain::SortColumn;
use crate::storage::ShipmentStore;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::ToSchema;

/// Shared server state. The catalog session is behind a mutex. Listing triggers hold it only
/// to issue and to apply a read, never while the store answers; writes hold it until the
/// follow-up re-read is applied.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Mutex<CatalogService>>,
    pub store: Arc<dyn ShipmentStore>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct SortRequest {
    /// Column to sort by; the same column again flips the direction.
    pub column: SortColumn,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct DeleteRequest {
    /// Must be true; anything else aborts without touching the store.
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct QuoteRequest {
    pub weight_kg: f64,
    pub distance_km: f64,
    #[serde(default)]
    pub is_fragile: bool,
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(format!("Invalid JSON body: {} (expected: {})", err, expected)),
        }),
    )
}
