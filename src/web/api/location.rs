use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::tracker::{LocationSample, StatusEvent};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

/// One GPS ping as posted by a vehicle or the simulator.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationReport {
    #[serde(alias = "bus_id")]
    pub vehicle_id: String,
    pub lat: f64,
    pub lon: f64,
    /// RFC 3339. Timestamps without an offset are read as UTC.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Reported speed in km/h.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl From<LocationReport> for LocationSample {
    fn from(report: LocationReport) -> Self {
        LocationSample {
            vehicle_id: report.vehicle_id,
            lat: report.lat,
            lon: report.lon,
            timestamp: report.timestamp,
            speed: report.speed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitLocationResponse {
    pub status: String,
    pub eta: Option<u32>,
    pub event: StatusEvent,
}

#[utoipa::path(
    post,
    path = "/api/location",
    tag = "location",
    request_body = LocationReport,
    responses(
        (status = 200, description = "Sample accepted and broadcast", body = SubmitLocationResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
    )
)]
pub async fn submit_location(
    State(state): State<AppState>,
    payload: Result<Json<LocationReport>, JsonRejection>,
) -> ApiResult<Json<SubmitLocationResponse>> {
    let Json(report) =
        payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let event = state.pipeline.submit(report.into())?;

    Ok(Json(SubmitLocationResponse {
        status: "received".to_string(),
        eta: event.eta_minutes,
        event,
    }))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
}
