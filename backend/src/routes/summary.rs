use crate::error::ApiError;
use crate::services::SummaryService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use diet_tracker_shared::types::{DailySummary, SummaryQuery};

pub fn summary_routes() -> Router<AppState> {
    Router::new().route("/users/:telegram_id/summary", get(daily_summary))
}

/// GET /api/users/:telegram_id/summary?date=YYYY-MM-DD (defaults to today, UTC)
async fn daily_summary(
    State(state): State<AppState>,
    Path(telegram_id): Path<i64>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<DailySummary>, ApiError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let summary = SummaryService::daily(
        state.store(),
        telegram_id,
        date,
        state.config().nutrition.daily_step_goal,
    )
    .await?;
    Ok(Json(summary))
}
