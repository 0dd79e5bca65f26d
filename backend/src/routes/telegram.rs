//! Telegram webhook endpoint

use crate::error::ApiError;
use crate::state::AppState;
use crate::telegram::{BotHandler, Update, SECRET_TOKEN_HEADER};
use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use subtle::ConstantTimeEq;
use tracing::warn;

pub fn telegram_routes() -> Router<AppState> {
    Router::new().route("/telegram/webhook", post(webhook))
}

/// POST /api/telegram/webhook
async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> Result<Json<Value>, ApiError> {
    let client = state
        .telegram()
        .ok_or_else(|| ApiError::Unavailable("Telegram bot is not configured".to_string()))?;

    let config = state.config();
    if let Some(expected) = config.telegram.webhook_secret.as_ref() {
        let provided = headers
            .get(SECRET_TOKEN_HEADER)
            .map(|v| v.as_bytes())
            .unwrap_or_default();
        if !secret_matches(provided, expected.expose_secret().as_bytes()) {
            warn!(update_id = update.update_id, "Rejected webhook with bad secret token");
            return Err(ApiError::Unauthorized("Invalid webhook secret".to_string()));
        }
    }

    BotHandler::new(
        state.store(),
        client,
        &config.nutrition,
        config.telegram.web_app_url.as_deref(),
    )
    .handle_update(&update)
    .await?;

    Ok(Json(json!({ "ok": true })))
}

/// Compare in constant time for equal-length inputs
fn secret_matches(provided: &[u8], expected: &[u8]) -> bool {
    provided.ct_eq(expected).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_matches() {
        assert!(secret_matches(b"hook-secret", b"hook-secret"));
        assert!(!secret_matches(b"hook-secreT", b"hook-secret"));
        assert!(!secret_matches(b"hook", b"hook-secret"));
        assert!(!secret_matches(b"", b"hook-secret"));
    }
}
