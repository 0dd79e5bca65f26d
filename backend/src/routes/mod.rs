//! Route definitions for the Diet Tracker API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    http::{header, HeaderName, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod calculator;
mod health;
mod meals;
mod notifications;
mod profile;
mod sleep;
mod steps;
mod summary;
mod telegram;


pub use calculator::calculator_routes;
pub use meals::meal_routes;
pub use notifications::notification_routes;
pub use profile::profile_routes;
pub use sleep::sleep_routes;
pub use steps::step_routes;
pub use summary::summary_routes;
pub use telegram::telegram_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api", api_routes())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    HeaderName::from_static(crate::telegram::SECRET_TOKEN_HEADER),
                ]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Diet Tracker API" }))
        .merge(calculator_routes())
        .merge(profile_routes())
        .merge(sleep_routes())
        .merge(step_routes())
        .merge(meal_routes())
        .merge(summary_routes())
        .merge(notification_routes())
        .merge(telegram_routes())
}
