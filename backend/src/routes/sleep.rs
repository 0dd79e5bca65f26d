//! Sleep session API routes

use crate::error::ApiError;
use crate::services::SleepService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use diet_tracker_shared::types::{
    CreateSleepRequest, DeletedResponse, ListResponse, RecordsQuery, UpdateSleepRequest,
};
use diet_tracker_shared::SleepSession;
use uuid::Uuid;

pub fn sleep_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/:telegram_id/sleep",
            get(list_sleep).post(create_sleep),
        )
        .route(
            "/users/:telegram_id/sleep/:id",
            get(get_sleep).put(update_sleep).delete(delete_sleep),
        )
}

/// GET /api/users/:telegram_id/sleep - newest first
async fn list_sleep(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<ListResponse<SleepSession>>, ApiError> {
    let sessions = SleepService::list(state.store(), telegram_id, &query.normalize()?).await?;
    Ok(Json(sessions.into()))
}

/// POST /api/users/:telegram_id/sleep
async fn create_sleep(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
    Json(req): Json<CreateSleepRequest>,
) -> Result<(StatusCode, Json<SleepSession>), ApiError> {
    let session = SleepService::create(state.store(), telegram_id, req).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn get_sleep(
    State(state): State<AppState>,
    Path((telegram_id, id)): Path<(i64, Uuid)>,
) -> Result<Json<SleepSession>, ApiError> {
    let session = SleepService::get(state.store(), telegram_id, id).await?;
    Ok(Json(session))
}

/// PUT /api/users/:telegram_id/sleep/:id - setting `end_time` completes a session
async fn update_sleep(
    State(state): State<AppState>,
    Path((telegram_id, id)): Path<(i64, Uuid)>,
    Json(req): Json<UpdateSleepRequest>,
) -> Result<Json<SleepSession>, ApiError> {
    let session = SleepService::update(state.store(), telegram_id, id, req).await?;
    Ok(Json(session))
}

async fn delete_sleep(
    State(state): State<AppState>,
    Path((telegram_id, id)): Path<(i64, Uuid)>,
) -> Result<Json<DeletedResponse>, ApiError> {
    SleepService::delete(state.store(), telegram_id, id).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}
