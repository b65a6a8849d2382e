use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::route::Stop;
use crate::tracker::{LocationSample, StatusEvent};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatus {
    pub vehicles: usize,
    pub subscribers: usize,
}

#[utoipa::path(
    get,
    path = "/api/vehicles",
    tag = "vehicles",
    responses(
        (status = 200, description = "Latest status of every known vehicle", body = Vec<StatusEvent>)
    )
)]
pub async fn list_vehicles(State(state): State<AppState>) -> Json<Vec<StatusEvent>> {
    Json(state.pipeline.tracker().latest_events())
}

#[utoipa::path(
    get,
    path = "/api/vehicles/{id}/history",
    tag = "vehicles",
    params(("id" = String, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "Rolling history, oldest first", body = Vec<LocationSample>),
        (status = 404, description = "Vehicle not seen yet", body = ErrorResponse)
    )
)]
pub async fn vehicle_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<LocationSample>>> {
    state
        .pipeline
        .tracker()
        .history(&id)
        .map(Json)
        .ok_or(ApiError::NotFound("vehicle_not_found"))
}

#[utoipa::path(
    get,
    path = "/api/route",
    tag = "route",
    responses(
        (status = 200, description = "Stops in visiting order", body = Vec<Stop>)
    )
)]
pub async fn route_stops(State(state): State<AppState>) -> Json<Vec<Stop>> {
    Json(state.pipeline.tracker().route().stops().to_vec())
}

#[utoipa::path(
    get,
    path = "/api/status",
    tag = "status",
    responses(
        (status = 200, description = "Tracked vehicles and live subscribers", body = ServiceStatus)
    )
)]
pub async fn status(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        vehicles: state.pipeline.tracker().vehicle_count(),
        subscribers: state.pipeline.hub().subscriber_count(),
    })
}
