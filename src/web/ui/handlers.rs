use axum::{extract::State, response::IntoResponse};

use crate::route::Stop;
use crate::web::state::AppState;

use super::templates::DashboardTemplate;

pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    dashboard_template(state.pipeline.tracker().route().stops())
}

fn dashboard_template(stops: &[Stop]) -> DashboardTemplate {
    let count = stops.len().max(1) as f64;
    let center_lat = stops.iter().map(|s| s.lat).sum::<f64>() / count;
    let center_lon = stops.iter().map(|s| s.lon).sum::<f64>() / count;

    DashboardTemplate {
        stops_json: script_json(stops),
        center_lat,
        center_lon,
    }
}

/// JSON safe to embed in a `<script>` block.
fn script_json(stops: &[Stop]) -> String {
    serde_json::to_string(stops)
        .map(|json| json.replace("</", "<\\/"))
        .unwrap_or_else(|_| "[]".to_string())
}
