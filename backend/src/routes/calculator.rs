//! Stateless BMR/TDEE calculator

use crate::error::ApiError;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use diet_tracker_shared::types::{CalculateRequest, CalculationResponse};

pub fn calculator_routes() -> Router<AppState> {
    Router::new().route("/calculate", post(calculate))
}

/// POST /api/calculate
async fn calculate(
    State(state): State<AppState>,
    Json(req): Json<CalculateRequest>,
) -> Result<Json<CalculationResponse>, ApiError> {
    let result = ProfileService::calculate(&state.config().nutrition, &req)?;
    Ok(Json(result))
}
