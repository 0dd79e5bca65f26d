use crate::error::ApiError;
use crate::services::NotificationService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use diet_tracker_shared::types::{NotificationResponse, SendNotificationRequest};

pub fn notification_routes() -> Router<AppState> {
    Router::new().route("/notifications", post(send_notification))
}

/// POST /api/notifications - render a template and send it through the bot
async fn send_notification(
    State(state): State<AppState>,
    Json(req): Json<SendNotificationRequest>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let client = state
        .telegram()
        .ok_or_else(|| ApiError::Unavailable("Telegram bot is not configured".to_string()))?;

    let response =
        NotificationService::send(state.store(), client, &state.config().nutrition, req).await?;
    Ok(Json(response))
}
