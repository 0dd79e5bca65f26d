//! Telegram bot integration
//!
//! The Bot API client, the HTML message templates and the webhook update
//! handler behind `/api/telegram/webhook`.

pub mod client;
pub mod handler;
pub mod templates;
pub mod types;

pub use client::TelegramClient;
pub use handler::{BotCommand, BotHandler};
pub use types::Update;

/// Header Telegram sends with the secret registered via `setWebhook`
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";
