// src/bin/api_server.rs

use shipment_catalog::infra::{config::CatalogConfig, logging};
use shipment_catalog::transport;
use shipment_catalog::CatalogService;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = CatalogConfig::from_env()?;
    tracing::info!(
        backend = ?config.backend,
        page_size = config.page_size,
        session = ?config.session,
        "starting shipment catalog"
    );

    let store = config.open_store().await?;
    let mut catalog =
        CatalogService::new(Arc::clone(&store), config.session.clone(), config.page_size)?;

    // A failed first read is not fatal: the list stays empty and the error is shown in the view.
    if let Err(err) = catalog.refresh().await {
        tracing::warn!(error = %err, "initial shipment read failed");
    } else {
        let controller = catalog.controller();
        tracing::info!(
            total = controller.page().total_count,
            pages = controller.summary().page_count,
            "initial page loaded"
        );
    }

    let app_state = transport::http::AppState {
        catalog: Arc::new(Mutex::new(catalog)),
        store,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let swagger = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", transport::http::ApiDoc::openapi());
    let app = transport::http::create_router(app_state)
        .merge(swagger)
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(addr = %config.http_addr, "API server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui", config.http_addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}
