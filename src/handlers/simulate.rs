use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::presentation::{currency_label, result_lines, BarChart};
use crate::services::{ServiceError, SimulatorService};

#[derive(Debug, Default, Deserialize)]
pub struct SimulateParams {
    cost_per_unit: Option<f64>,
    margin_percent: Option<f64>,
    actual_rate: Option<f64>,
    new_rate: Option<f64>,
}

pub type ApiError = (StatusCode, Json<Value>);

pub async fn simulate_query(
    State(service): State<Arc<SimulatorService>>,
    params: Result<Query<SimulateParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        error!("Invalid simulation query: {}", rejection.body_text());
        error_response(rejection.status(), rejection.body_text())
    })?;

    run_simulation(&service, params).await
}

pub async fn simulate_json(
    State(service): State<Arc<SimulatorService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        error!("Invalid simulation body: {}", rejection.body_text());
        error_response(rejection.status(), rejection.body_text())
    })?;

    let params: SimulateParams = match serde_json::from_value(payload) {
        Ok(params) => params,
        Err(e) => {
            error!("Invalid simulation request: {}", e);
            return Err(error_response(StatusCode::BAD_REQUEST, e.to_string()));
        }
    };

    run_simulation(&service, params).await
}

async fn run_simulation(service: &SimulatorService, params: SimulateParams) -> Result<Json<Value>, ApiError> {
    let request = service.build_request(
        params.cost_per_unit,
        params.margin_percent,
        params.actual_rate,
        params.new_rate,
    );
    info!("Received simulation request: {:?}", request);

    match service.simulate(&request).await {
        Ok(report) => {
            let chart = BarChart::from_report(&report, currency_label(&report.quote_currency));
            Ok(Json(serde_json::json!({
                "report": report,
                "lines": result_lines(&report),
                "chart": chart,
            })))
        }
        Err(ServiceError::Pricing(e)) => Err(error_response(StatusCode::BAD_REQUEST, e.to_string())),
        Err(e @ ServiceError::RateUnavailable(_)) => {
            error!("Simulation failed: {}", e);
            Err(error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string()))
        }
    }
}

pub fn error_response(status: StatusCode, message: String) -> ApiError {
    (status, Json(serde_json::json!({ "error": message })))
}
