use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::location::{LocationReport, SubmitLocationResponse};
use super::api::vehicles::ServiceStatus;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::location::submit_location,
        super::api::vehicles::list_vehicles,
        super::api::vehicles::vehicle_history,
        super::api::vehicles::route_stops,
        super::api::vehicles::status,
    ),
    components(
        schemas(
            LocationReport,
            SubmitLocationResponse,
            ServiceStatus,
            ErrorResponse,
            crate::tracker::StatusEvent,
            crate::tracker::MovementStatus,
            crate::tracker::LocationSample,
            crate::route::Stop,
        )
    ),
    info(
        title = "Bus ETA API",
        description = "Location ingest and live arrival estimates for a loop route",
        version = "0.1.0"
    ),
    tags(
        (name = "location", description = "Vehicle location ingest"),
        (name = "vehicles", description = "Tracked vehicle state"),
        (name = "route", description = "Static route"),
        (name = "status", description = "Service status")
    )
)]
pub struct ApiDoc;
