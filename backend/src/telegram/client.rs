use super::types::{
    AnswerCallbackQuery, BotResponse, InlineKeyboardMarkup, Message, SendMessage, SetWebhook,
};
use crate::config::TelegramConfig;
use anyhow::{bail, Context, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Telegram Bot API client
///
/// Messages are always sent with `parse_mode=HTML`; callers escape any
/// user-supplied text.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: Arc<SecretString>,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        if !config.is_enabled() {
            bail!("Telegram bot token is not configured");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to create Telegram HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: Arc::new(config.bot_token.clone()),
        })
    }

    // ========================================================================
    // Bot API methods
    // ========================================================================

    pub async fn send_message(
        &self,
        chat_id: i64,
        html: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message> {
        let body = SendMessage {
            chat_id,
            text: html,
            parse_mode: "HTML",
            reply_markup: keyboard,
        };
        let message: Message = self.call("sendMessage", &body).await?;
        debug!(chat_id, message_id = message.message_id, "Telegram message sent");
        Ok(message)
    }

    pub async fn answer_callback_query(&self, callback_query_id: &str, text: Option<&str>) -> Result<()> {
        let body = AnswerCallbackQuery {
            callback_query_id,
            text,
        };
        let _: bool = self.call("answerCallbackQuery", &body).await?;
        Ok(())
    }

    /// Register the webhook URL, optionally with a secret token Telegram
    /// echoes back in `X-Telegram-Bot-Api-Secret-Token`
    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<()> {
        let body = SetWebhook {
            url,
            secret_token,
            allowed_updates: &["message", "callback_query"],
        };
        let _: bool = self.call("setWebhook", &body).await?;
        info!(url, "Telegram webhook registered");
        Ok(())
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!(
            "{}/bot{}/{}",
            self.base_url,
            self.token.expose_secret(),
            method
        );

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("Failed to send Telegram {} request", method))?;

        let status = response.status();
        let parsed = response
            .json::<BotResponse<T>>()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("Failed to parse Telegram {} response", method))?;

        if !parsed.ok {
            let description = parsed.description.unwrap_or_default();
            error!("Telegram {} failed: {} - {}", method, status, description);
            bail!("Telegram {} failed: {}", method, description);
        }

        parsed
            .result
            .with_context(|| format!("Telegram {} returned no result", method))
    }
}
