//! Step session API routes

use crate::error::ApiError;
use crate::services::StepService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use diet_tracker_shared::types::{
    CreateStepRequest, DeletedResponse, ListResponse, RecordsQuery, UpdateStepRequest,
};
use diet_tracker_shared::StepSession;
use uuid::Uuid;

pub fn step_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/:telegram_id/steps",
            get(list_steps).post(create_steps),
        )
        .route(
            "/users/:telegram_id/steps/:id",
            get(get_steps).put(update_steps).delete(delete_steps),
        )
}

async fn list_steps(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<ListResponse<StepSession>>, ApiError> {
    let sessions = StepService::list(state.store(), telegram_id, &query.normalize()?).await?;
    Ok(Json(sessions.into()))
}

/// POST /api/users/:telegram_id/steps - distance and calories are estimated when omitted
async fn create_steps(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
    Json(req): Json<CreateStepRequest>,
) -> Result<(StatusCode, Json<StepSession>), ApiError> {
    let session = StepService::create(state.store(), telegram_id, req).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn get_steps(
    State(state): State<AppState>,
    Path((telegram_id, id)): Path<(i64, Uuid)>,
) -> Result<Json<StepSession>, ApiError> {
    let session = StepService::get(state.store(), telegram_id, id).await?;
    Ok(Json(session))
}

async fn update_steps(
    State(state): State<AppState>,
    Path((telegram_id, id)): Path<(i64, Uuid)>,
    Json(req): Json<UpdateStepRequest>,
) -> Result<Json<StepSession>, ApiError> {
    let session = StepService::update(state.store(), telegram_id, id, req).await?;
    Ok(Json(session))
}

async fn delete_steps(
    State(state): State<AppState>,
    Path((telegram_id, id)): Path<(i64, Uuid)>,
) -> Result<Json<DeletedResponse>, ApiError> {
    StepService::delete(state.store(), telegram_id, id).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}
