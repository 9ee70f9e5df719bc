use crate::app::{CatalogView, Theme};
use crate::domain::{
    CostBreakdown, FilterChange, ListFilter, ListRequest, PageSummary, QueryState, ResultPage,
    ShipmentId, ShipmentInput, ShipmentRecord, ShipmentStatus, SortColumn, SortDirection,
    SortSpec, StatusOption,
};
use crate::transport::http::handlers::{cost, health, session, shipments};
use crate::transport::http::types::{ApiResponse, DeleteRequest, QuoteRequest, SortRequest};
use axum::routing::{get, post, put};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        shipments::view_handler,
        shipments::refresh_handler,
        shipments::set_filter_handler,
        shipments::toggle_sort_handler,
        shipments::next_page_handler,
        shipments::prev_page_handler,
        shipments::create_handler,
        shipments::update_handler,
        shipments::delete_handler,
        cost::quote_handler,
        session::toggle_theme_handler
    ),
    components(schemas(
        ApiResponse,
        SortRequest,
        DeleteRequest,
        QuoteRequest,
        CatalogView,
        Theme,
        FilterChange,
        QueryState,
        ResultPage,
        PageSummary,
        ListRequest,
        ListFilter,
        SortSpec,
        ShipmentId,
        ShipmentInput,
        ShipmentRecord,
        ShipmentStatus,
        StatusOption,
        SortColumn,
        SortDirection,
        CostBreakdown
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/shipments",
            get(shipments::view_handler).post(shipments::create_handler),
        )
        .route(
            "/api/shipments/:id",
            put(shipments::update_handler).delete(shipments::delete_handler),
        )
        .route("/api/shipments/refresh", post(shipments::refresh_handler))
        .route("/api/shipments/query", post(shipments::set_filter_handler))
        .route("/api/shipments/sort", post(shipments::toggle_sort_handler))
        .route("/api/shipments/page/next", post(shipments::next_page_handler))
        .route("/api/shipments/page/prev", post(shipments::prev_page_handler))
        .route("/api/cost/quote", post(cost::quote_handler))
        .route(
            "/api/session/theme/toggle",
            post(session::toggle_theme_handler),
        )
        .with_state(app_state)
}
