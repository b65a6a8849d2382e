use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::pipeline::LocationPipeline;

use super::api::location as location_handlers;
use super::api::vehicles as vehicle_handlers;
use super::api_doc::ApiDoc;
use super::config::{Config, ConfigError};
use super::state::AppState;
use super::ui::handlers as ui_handlers;
use super::ws;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // UI
        .route("/", get(ui_handlers::dashboard))
        // Ingest; `/location` is kept for older simulators
        .route("/api/location", post(location_handlers::submit_location))
        .route("/location", post(location_handlers::submit_location))
        // Vehicles and route
        .route("/api/vehicles", get(vehicle_handlers::list_vehicles))
        .route("/buses", get(vehicle_handlers::list_vehicles))
        .route(
            "/api/vehicles/{id}/history",
            get(vehicle_handlers::vehicle_history),
        )
        .route("/api/route", get(vehicle_handlers::route_stops))
        .route("/api/status", get(vehicle_handlers::status))
        // Live updates
        .route("/ws", get(ws::subscribe))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let route = Arc::new(config.build_route()?);
    let bind_addr = config.web.bind.clone();
    log::info!(
        "route loaded: {}",
        route
            .stops()
            .iter()
            .map(|s| s.id.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    );

    let pipeline = LocationPipeline::new(route, config.tracker.clone(), config.hub.clone());
    let app = build_router(AppState::new(config, pipeline));

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
