//! Templated bot notifications

use super::SummaryService;
use crate::config::NutritionConfig;
use crate::error::ApiError;
use crate::store::DataStore;
use crate::telegram::{templates, TelegramClient};
use chrono::Utc;
use diet_tracker_shared::types::{NotificationKind, NotificationResponse, SendNotificationRequest};
use tracing::info;
use validator::Validate;

pub struct NotificationService;

impl NotificationService {
    /// Render the notification and deliver it to the user's private chat
    pub async fn send(
        store: &dyn DataStore,
        client: &TelegramClient,
        nutrition: &NutritionConfig,
        req: SendNotificationRequest,
    ) -> Result<NotificationResponse, ApiError> {
        req.validate()?;

        let text = Self::render(store, nutrition, &req).await?;
        let message = client
            .send_message(req.telegram_id, &text, None)
            .await
            .map_err(ApiError::Internal)?;

        info!(
            telegram_id = req.telegram_id,
            kind = ?req.kind,
            message_id = message.message_id,
            "Notification sent"
        );
        Ok(NotificationResponse {
            sent: true,
            message_id: message.message_id,
        })
    }

    pub async fn render(
        store: &dyn DataStore,
        nutrition: &NutritionConfig,
        req: &SendNotificationRequest,
    ) -> Result<String, ApiError> {
        let text = match req.kind {
            NotificationKind::MealReminder => templates::meal_reminder(req.meal_type),
            NotificationKind::SleepReminder => templates::sleep_reminder(),
            NotificationKind::StepGoalReached | NotificationKind::DailySummary => {
                let date = req.date.unwrap_or_else(|| Utc::now().date_naive());
                let summary = SummaryService::daily(
                    store,
                    req.telegram_id,
                    date,
                    nutrition.daily_step_goal,
                )
                .await?;

                if req.kind == NotificationKind::DailySummary {
                    templates::daily_summary(&summary)
                } else if summary.steps < summary.step_goal {
                    return Err(ApiError::Conflict(format!(
                        "Step goal not reached: {} of {} steps",
                        summary.steps, summary.step_goal
                    )));
                } else {
                    templates::step_goal_reached(summary.steps, summary.step_goal)
                }
            }
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TelegramConfig;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;
    use diet_tracker_shared::MealType;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(kind: NotificationKind) -> SendNotificationRequest {
        SendNotificationRequest {
            telegram_id: 42,
            kind,
            meal_type: None,
            date: None,
        }
    }

    #[tokio::test]
    async fn test_render_meal_reminder() {
        let store = MemoryStore::new();
        let mut req = request(NotificationKind::MealReminder);
        req.meal_type = Some(MealType::Breakfast);

        let text = NotificationService::render(&store, &NutritionConfig::default(), &req)
            .await
            .unwrap();
        assert!(text.contains("breakfast"));
    }

    #[tokio::test]
    async fn test_render_daily_summary_for_date() {
        let store = MemoryStore::new();
        let mut req = request(NotificationKind::DailySummary);
        req.date = NaiveDate::from_ymd_opt(2024, 6, 3);

        let text = NotificationService::render(&store, &NutritionConfig::default(), &req)
            .await
            .unwrap();
        assert!(text.contains("03.06.2024"));
    }

    #[tokio::test]
    async fn test_step_goal_not_reached_is_conflict() {
        let store = MemoryStore::new();
        let req = request(NotificationKind::StepGoalReached);

        let err = NotificationService::render(&store, &NutritionConfig::default(), &req)
            .await
            .unwrap_err();
        match err {
            ApiError::Conflict(msg) => assert!(msg.contains("0 of 10000"), "{msg}"),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_delivers_to_user_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot9:x/sendMessage"))
            .and(body_partial_json(json!({"chat_id": 42})))
            .and(body_string_contains("wind down"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": {"message_id": 314, "chat": {"id": 42, "type": "private"}, "date": 0}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TelegramClient::new(&TelegramConfig {
            bot_token: SecretString::new("9:x".to_string()),
            api_base_url: server.uri(),
            ..Default::default()
        })
        .unwrap();

        let response = NotificationService::send(
            &MemoryStore::new(),
            &client,
            &NutritionConfig::default(),
            request(NotificationKind::SleepReminder),
        )
        .await
        .unwrap();

        assert!(response.sent);
        assert_eq!(response.message_id, 314);
    }

    #[tokio::test]
    async fn test_send_rejects_invalid_user() {
        let client = TelegramClient::new(&TelegramConfig {
            bot_token: SecretString::new("9:x".to_string()),
            ..Default::default()
        })
        .unwrap();
        let mut req = request(NotificationKind::SleepReminder);
        req.telegram_id = 0;

        let err = NotificationService::send(&MemoryStore::new(), &client, &NutritionConfig::default(), req)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }
}
