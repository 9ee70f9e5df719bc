use crate::transport::http::handlers::common::ok_response;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::response::IntoResponse;

#[utoipa::path(
    post,
    path = "/api/session/theme/toggle",
    responses(
        (status = 200, description = "Theme switched between light and dark", body = ApiResponse)
    )
)]
pub async fn toggle_theme_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut catalog = state.catalog.lock().await;
    let controller = catalog.controller_mut();
    let theme = controller.session().theme.toggled();
    controller.set_theme(theme);
    ok_response(serde_json::json!({
        "theme": theme,
        "authenticated": controller.session().is_authenticated(),
    }))
}
