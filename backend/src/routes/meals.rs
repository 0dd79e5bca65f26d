//! Meal diary API routes

use crate::error::ApiError;
use crate::services::MealService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use diet_tracker_shared::types::{
    CreateMealRequest, DeletedResponse, ListResponse, RecordsQuery, UpdateMealRequest,
};
use diet_tracker_shared::MealEntry;
use uuid::Uuid;

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:telegram_id/meals", get(list_meals).post(create_meal))
        .route(
            "/users/:telegram_id/meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

/// GET /api/users/:telegram_id/meals?date=YYYY-MM-DD
async fn list_meals(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<ListResponse<MealEntry>>, ApiError> {
    let meals = MealService::list(state.store(), telegram_id, &query.normalize()?).await?;
    Ok(Json(meals.into()))
}

async fn create_meal(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
    Json(req): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<MealEntry>), ApiError> {
    let meal = MealService::create(state.store(), telegram_id, req).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

async fn get_meal(
    State(state): State<AppState>,
    Path((telegram_id, id)): Path<(i64, Uuid)>,
) -> Result<Json<MealEntry>, ApiError> {
    let meal = MealService::get(state.store(), telegram_id, id).await?;
    Ok(Json(meal))
}

async fn update_meal(
    State(state): State<AppState>,
    Path((telegram_id, id)): Path<(i64, Uuid)>,
    Json(req): Json<UpdateMealRequest>,
) -> Result<Json<MealEntry>, ApiError> {
    let meal = MealService::update(state.store(), telegram_id, id, req).await?;
    Ok(Json(meal))
}

async fn delete_meal(
    State(state): State<AppState>,
    Path((telegram_id, id)): Path<(i64, Uuid)>,
) -> Result<Json<DeletedResponse>, ApiError> {
    MealService::delete(state.store(), telegram_id, id).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}
