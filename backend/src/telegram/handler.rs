//! Webhook update dispatch

use super::client::TelegramClient;
use super::templates;
use super::types::{CallbackQuery, Message, Update, User};
use crate::config::NutritionConfig;
use crate::services::{ProfileService, SummaryService};
use crate::store::DataStore;
use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

/// What the user asked for, from a command or a callback button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Start(Option<String>),
    Help,
    Today,
    Profile,
    Unknown,
}

impl BotCommand {
    /// Parse message text. `/cmd@botname` is treated as `/cmd`.
    pub fn parse(text: &str) -> Self {
        let mut parts = text.trim().splitn(2, char::is_whitespace);
        let head = parts.next().unwrap_or_default();
        let payload = parts
            .next()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        let Some(command) = head.strip_prefix('/') else {
            return BotCommand::Unknown;
        };
        let command = command.split('@').next().unwrap_or_default();

        match command.to_lowercase().as_str() {
            "start" => BotCommand::Start(payload),
            "help" => BotCommand::Help,
            "today" | "stats" => BotCommand::Today,
            "profile" => BotCommand::Profile,
            _ => BotCommand::Unknown,
        }
    }

    pub fn from_callback(data: &str) -> Self {
        match data {
            "today" => BotCommand::Today,
            "profile" => BotCommand::Profile,
            "help" => BotCommand::Help,
            _ => BotCommand::Unknown,
        }
    }
}

pub struct BotHandler<'a> {
    store: &'a dyn DataStore,
    client: &'a TelegramClient,
    nutrition: &'a NutritionConfig,
    web_app_url: Option<&'a str>,
}

impl<'a> BotHandler<'a> {
    pub fn new(
        store: &'a dyn DataStore,
        client: &'a TelegramClient,
        nutrition: &'a NutritionConfig,
        web_app_url: Option<&'a str>,
    ) -> Self {
        Self {
            store,
            client,
            nutrition,
            web_app_url,
        }
    }

    pub async fn handle_update(&self, update: &Update) -> Result<()> {
        if let Some(callback) = &update.callback_query {
            return self.handle_callback(callback).await;
        }
        if let Some(message) = &update.message {
            return self.handle_message(message).await;
        }
        debug!(update_id = update.update_id, "Ignoring update without message or callback");
        Ok(())
    }

    async fn handle_message(&self, message: &Message) -> Result<()> {
        let Some(text) = message.text.as_deref() else {
            debug!(chat_id = message.chat.id, "Ignoring non-text message");
            return Ok(());
        };
        let Some(user) = message.from.as_ref() else {
            return Ok(());
        };

        let command = BotCommand::parse(text);
        info!(user_id = user.id, ?command, "Bot command received");
        self.reply(message.chat.id, user, command).await
    }

    async fn handle_callback(&self, callback: &CallbackQuery) -> Result<()> {
        self.client.answer_callback_query(&callback.id, None).await?;

        let command = callback
            .data
            .as_deref()
            .map(BotCommand::from_callback)
            .unwrap_or(BotCommand::Unknown);
        let chat_id = callback
            .message
            .as_ref()
            .map(|m| m.chat.id)
            .unwrap_or(callback.from.id);

        info!(user_id = callback.from.id, ?command, "Bot callback received");
        self.reply(chat_id, &callback.from, command).await
    }

    async fn reply(&self, chat_id: i64, user: &User, command: BotCommand) -> Result<()> {
        let text = match command {
            BotCommand::Start(payload) => {
                if let Some(payload) = payload {
                    debug!(user_id = user.id, payload = %payload, "Start payload");
                }
                templates::welcome(&user.first_name)
            }
            BotCommand::Help => templates::help(),
            BotCommand::Profile => match ProfileService::find(self.store, user.id).await? {
                Some(profile) => templates::profile_card(&profile),
                None => templates::missing_profile(),
            },
            BotCommand::Today => {
                let summary = SummaryService::daily(
                    self.store,
                    user.id,
                    Utc::now().date_naive(),
                    self.nutrition.daily_step_goal,
                )
                .await?;
                templates::daily_summary(&summary)
            }
            BotCommand::Unknown => templates::unknown_command(),
        };

        let keyboard = templates::main_keyboard(self.web_app_url);
        self.client.send_message(chat_id, &text, Some(&keyboard)).await?;
        Ok(())
    }
}
