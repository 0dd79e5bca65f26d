//! Diet Tracker Backend
//!
//! REST API and Telegram bot webhook for the diet tracker Mini App.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Services: Business logic over a `DataStore`
//! - Store: Postgres, Supabase REST or in-memory, with an optional fallback
//! - Telegram: Bot API client, templates and webhook handling

use anyhow::Result;
use diet_tracker_backend::{config, routes, state::AppState, store, telegram::TelegramClient};
use secrecy::ExposeSecret;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting Diet Tracker Backend"
    );

    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    let data_store = store::build(&config).await?;

    let telegram = if config.telegram.is_enabled() {
        let client = TelegramClient::new(&config.telegram)?;
        if let Some(url) = config.telegram.webhook_url.as_deref() {
            // The API stays up without the bot
            if let Err(e) = client
                .set_webhook(
                    url,
                    config
                        .telegram
                        .webhook_secret
                        .as_ref()
                        .map(|s| s.expose_secret().as_str()),
                )
                .await
            {
                warn!("Failed to register Telegram webhook: {:#}", e);
            }
        }
        Some(client)
    } else {
        warn!("Telegram bot token not set, bot features are disabled");
        None
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(data_store, config, telegram);

    let app = routes::create_router(state);

    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "diet_tracker_backend=info,tower_http=info".into()
        } else {
            "diet_tracker_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    if config.database.url.contains("localhost") || config.database.url.contains("127.0.0.1") {
        warn!("Database URL contains localhost - ensure this is intentional for production");
    }

    let problems = config.production_problems();
    if !problems.is_empty() {
        for problem in &problems {
            error!("Configuration error: {}", problem);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
