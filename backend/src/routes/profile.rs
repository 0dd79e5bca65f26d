//! User profile API routes

use crate::error::ApiError;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use diet_tracker_shared::types::{CreateProfileRequest, DeletedResponse, UpdateProfileRequest};
use diet_tracker_shared::UserProfile;

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", post(create_profile))
        .route(
            "/profile/:telegram_id",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
}

/// POST /api/profile - Create or replace a profile
async fn create_profile(
    State(state): State<AppState>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = ProfileService::create(state.store(), &state.config().nutrition, req).await?;
    Ok(Json(profile))
}

/// GET /api/profile/:telegram_id
async fn get_profile(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = ProfileService::get(state.store(), telegram_id).await?;
    Ok(Json(profile))
}

/// PUT /api/profile/:telegram_id - Partial update; targets are recomputed
async fn update_profile(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile =
        ProfileService::update(state.store(), &state.config().nutrition, telegram_id, req).await?;
    Ok(Json(profile))
}

/// DELETE /api/profile/:telegram_id
async fn delete_profile(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    ProfileService::delete(state.store(), telegram_id).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}
