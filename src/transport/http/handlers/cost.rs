use crate::domain::cost_breakdown;
use crate::domain::shipment::validate_measure;
use crate::transport::http::handlers::common::{bad_request, ok_response, to_json};
use crate::transport::http::types::{json_422, ApiResponse, QuoteRequest};
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::Json;

/// Prices a shipment without writing anything, for live form previews.
#[utoipa::path(
    post,
    path = "/api/cost/quote",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Cost breakdown", body = ApiResponse),
        (status = 400, description = "Measure out of range", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    )
)]
pub async fn quote_handler(
    request: Result<Json<QuoteRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, "{\"weight_kg\", \"distance_km\", \"is_fragile\"?}").into_response()
        }
    };

    let measures = validate_measure("weight_kg", request.weight_kg)
        .and_then(|w| validate_measure("distance_km", request.distance_km).map(|d| (w, d)));
    match measures {
        Ok((weight_kg, distance_km)) => {
            ok_response(to_json(&cost_breakdown(weight_kg, distance_km, request.is_fragile)))
        }
        Err(err) => bad_request(err.to_string()),
    }
}
