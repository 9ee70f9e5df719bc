use crate::app::{
    Applied, CatalogError, CatalogView, DeleteOutcome, Preconfirmed, ReadTicket, WriteKind,
};
use crate::domain::{FilterChange, ShipmentId, ShipmentInput};
use crate::transport::http::handlers::common::{
    bad_request, error_response, ok_response, to_json, view_result,
};
use crate::transport::http::types::{json_422, ApiResponse, AppState, DeleteRequest, SortRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Resolves a listing read without holding the session lock, so other requests can see the
/// `loading` flag and issue newer reads meanwhile. The lock is taken again only to apply.
async fn settle_unlocked(
    state: &AppState,
    ticket: ReadTicket,
) -> (Result<(), CatalogError>, CatalogView) {
    let mut ticket = ticket;
    loop {
        let outcome = ticket.resolve().await;
        let mut catalog = state.catalog.lock().await;
        match catalog.controller_mut().apply(outcome) {
            Applied::Page | Applied::Stale => return (Ok(()), catalog.view()),
            Applied::Failed(err) => return (Err(err), catalog.view()),
            Applied::Reclamped(next) => ticket = next,
        }
    }
}

async fn reply_after(state: &AppState, ticket: ReadTicket) -> Response {
    let (result, view) = settle_unlocked(state, ticket).await;
    view_result(result, view)
}

#[utoipa::path(
    get,
    path = "/api/shipments",
    responses(
        (status = 200, description = "Current page, query state and loading flag", body = ApiResponse)
    )
)]
pub async fn view_handler(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.catalog.lock().await;
    ok_response(to_json(&catalog.view()))
}

#[utoipa::path(
    post,
    path = "/api/shipments/refresh",
    responses(
        (status = 200, description = "Page re-read", body = ApiResponse),
        (status = 502, description = "Store failed; previous page kept", body = ApiResponse)
    )
)]
pub async fn refresh_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ticket = state.catalog.lock().await.controller_mut().request_refresh();
    reply_after(&state, ticket).await
}

#[utoipa::path(
    post,
    path = "/api/shipments/query",
    request_body = FilterChange,
    responses(
        (status = 200, description = "Filter applied, back on the first page", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse),
        (status = 502, description = "Store failed; previous page kept", body = ApiResponse)
    )
)]
pub async fn set_filter_handler(
    State(state): State<AppState>,
    request: Result<Json<FilterChange>, JsonRejection>,
) -> impl IntoResponse {
    let Json(change) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(
                e,
                "{\"search_term\"?, \"filter_status\"?, \"sort_column\"?, \"sort_direction\"?}",
            )
            .into_response()
        }
    };

    let ticket = state.catalog.lock().await.controller_mut().set_filter(change);
    reply_after(&state, ticket).await
}

#[utoipa::path(
    post,
    path = "/api/shipments/sort",
    request_body = SortRequest,
    responses(
        (status = 200, description = "Sort toggled", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse),
        (status = 502, description = "Store failed; previous page kept", body = ApiResponse)
    )
)]
pub async fn toggle_sort_handler(
    State(state): State<AppState>,
    request: Result<Json<SortRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"column\": \"created_at\"}").into_response(),
    };

    let ticket = state.catalog.lock().await.controller_mut().toggle_sort(request.column);
    reply_after(&state, ticket).await
}

#[utoipa::path(
    post,
    path = "/api/shipments/page/next",
    responses(
        (status = 200, description = "Next page (unchanged when already on the last page)", body = ApiResponse),
        (status = 502, description = "Store failed; previous page kept", body = ApiResponse)
    )
)]
pub async fn next_page_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ticket = state.catalog.lock().await.controller_mut().next_page();
    match ticket {
        Some(ticket) => reply_after(&state, ticket).await,
        None => ok_response(to_json(&state.catalog.lock().await.view())),
    }
}

#[utoipa::path(
    post,
    path = "/api/shipments/page/prev",
    responses(
        (status = 200, description = "Previous page (unchanged when already on the first page)", body = ApiResponse),
        (status = 502, description = "Store failed; previous page kept", body = ApiResponse)
    )
)]
pub async fn prev_page_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ticket = state.catalog.lock().await.controller_mut().prev_page();
    match ticket {
        Some(ticket) => reply_after(&state, ticket).await,
        None => ok_response(to_json(&state.catalog.lock().await.view())),
    }
}

#[utoipa::path(
    post,
    path = "/api/shipments",
    request_body = ShipmentInput,
    responses(
        (status = 200, description = "Shipment created", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 422, description = "Invalid JSON body (shipping_cost is not accepted)", body = ApiResponse),
        (status = 502, description = "Store rejected the write", body = ApiResponse)
    )
)]
pub async fn create_handler(
    State(state): State<AppState>,
    request: Result<Json<ShipmentInput>, JsonRejection>,
) -> impl IntoResponse {
    let Json(input) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(
                e,
                "{\"title\", \"status\"?, \"is_fragile\"?, \"weight_kg\", \"distance_km\"}",
            )
            .into_response()
        }
    };

    let mut catalog = state.catalog.lock().await;
    match catalog.create(&input).await {
        Ok(id) => ok_response(serde_json::json!({
            "id": id,
            "notice": WriteKind::Created.notice(),
            "view": to_json(&catalog.view()),
        })),
        Err(err) => error_response(&err, None),
    }
}

#[utoipa::path(
    put,
    path = "/api/shipments/{id}",
    params(
        ("id" = i64, Path, description = "Shipment id")
    ),
    request_body = ShipmentInput,
    responses(
        (status = 200, description = "Shipment updated", body = ApiResponse),
        (status = 400, description = "Validation failed", body = ApiResponse),
        (status = 404, description = "Shipment no longer exists", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse),
        (status = 502, description = "Store rejected the write", body = ApiResponse)
    )
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<ShipmentInput>, JsonRejection>,
) -> impl IntoResponse {
    let Json(input) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(
                e,
                "{\"title\", \"status\"?, \"is_fragile\"?, \"weight_kg\", \"distance_km\"}",
            )
            .into_response()
        }
    };

    let id = ShipmentId(id);
    let mut catalog = state.catalog.lock().await;
    match catalog.update(id, &input).await {
        Ok(()) => ok_response(serde_json::json!({
            "id": id,
            "notice": WriteKind::Updated.notice(),
            "view": to_json(&catalog.view()),
        })),
        Err(err) => error_response(&err, None),
    }
}

#[utoipa::path(
    delete,
    path = "/api/shipments/{id}",
    params(
        ("id" = i64, Path, description = "Shipment id")
    ),
    request_body = DeleteRequest,
    responses(
        (status = 200, description = "Shipment deleted", body = ApiResponse),
        (status = 400, description = "Delete not confirmed; nothing was removed", body = ApiResponse),
        (status = 404, description = "Shipment no longer exists", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse),
        (status = 502, description = "Store failed; list unchanged", body = ApiResponse)
    )
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<DeleteRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"confirm\": true}").into_response(),
    };

    let id = ShipmentId(id);
    let mut catalog = state.catalog.lock().await;
    match catalog.delete(id, &Preconfirmed(request.confirm)).await {
        Ok(DeleteOutcome::Deleted) => ok_response(serde_json::json!({
            "id": id,
            "notice": WriteKind::Deleted.notice(),
            "view": to_json(&catalog.view()),
        })),
        Ok(DeleteOutcome::Declined) => {
            bad_request("confirm must be true to delete a shipment")
        }
        Err(err) => {
            let view = catalog.view();
            error_response(&err, Some(&view))
        }
    }
}
