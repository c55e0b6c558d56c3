use axum::{extract::State, response::Json};
use std::sync::Arc;
use crate::services::SimulatorService;

pub async fn get_metrics(
    State(service): State<Arc<SimulatorService>>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "base_currency": service.base_currency(),
        "quote_currency": service.quote_currency(),
        "counters": service.get_metrics()
    }))
}
