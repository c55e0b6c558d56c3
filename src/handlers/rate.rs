use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use tracing::{info, warn};

use crate::handlers::simulate::{error_response, ApiError};
use crate::services::SimulatorService;

pub async fn get_rate(
    State(service): State<Arc<SimulatorService>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!("Getting {}/{} rate", service.base_currency(), service.quote_currency());

    match service.current_rate().await {
        Ok(quote) => Ok(Json(serde_json::json!(quote))),
        Err(e) => {
            warn!("Rate lookup failed: {}", e);
            Err(error_response(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}
