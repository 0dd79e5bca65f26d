//! Unified data access
//!
//! Handlers and services talk to a [`DataStore`]. Concrete stores are the
//! direct Postgres connection, Supabase's REST API and an in-memory map;
//! [`FallbackStore`] chains two of them.

use crate::config::{AppConfig, StoreKind};
use crate::db::{self, DbConfig};
use anyhow::Result;
use async_trait::async_trait;
use diet_tracker_shared::{MealEntry, RecordFilter, SleepSession, StepSession, UserProfile};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub mod fallback;
pub mod memory;
pub mod postgres;
pub mod supabase;

pub use fallback::FallbackStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use supabase::SupabaseStore;

/// An insert hit a record that already exists
///
/// Stores return it inside `anyhow::Error`; callers find it with `downcast_ref`.
#[derive(Debug, thiserror::Error)]
#[error("{0} already exists")]
pub struct DuplicateRecord(pub String);

/// Storage backend for profiles and tracked records
///
/// Record operations are scoped by owner: a record whose `user_id` differs
/// from the one given is treated as absent. Lists are filtered on the start
/// time (`eaten_at` for meals) as `[from, to)` and ordered newest first.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn health_check(&self) -> Result<()>;

    // Profiles
    async fn get_profile(&self, telegram_id: i64) -> Result<Option<UserProfile>>;
    async fn upsert_profile(&self, profile: &UserProfile) -> Result<UserProfile>;
    async fn delete_profile(&self, telegram_id: i64) -> Result<bool>;

    // Sleep sessions
    async fn list_sleep(&self, user_id: i64, filter: &RecordFilter) -> Result<Vec<SleepSession>>;
    async fn get_sleep(&self, user_id: i64, id: Uuid) -> Result<Option<SleepSession>>;
    async fn insert_sleep(&self, session: &SleepSession) -> Result<SleepSession>;
    async fn update_sleep(&self, session: &SleepSession) -> Result<Option<SleepSession>>;
    async fn delete_sleep(&self, user_id: i64, id: Uuid) -> Result<bool>;

    // Step sessions
    async fn list_steps(&self, user_id: i64, filter: &RecordFilter) -> Result<Vec<StepSession>>;
    async fn get_steps(&self, user_id: i64, id: Uuid) -> Result<Option<StepSession>>;
    async fn insert_steps(&self, session: &StepSession) -> Result<StepSession>;
    async fn update_steps(&self, session: &StepSession) -> Result<Option<StepSession>>;
    async fn delete_steps(&self, user_id: i64, id: Uuid) -> Result<bool>;

    // Meals
    async fn list_meals(&self, user_id: i64, filter: &RecordFilter) -> Result<Vec<MealEntry>>;
    async fn get_meal(&self, user_id: i64, id: Uuid) -> Result<Option<MealEntry>>;
    async fn insert_meal(&self, meal: &MealEntry) -> Result<MealEntry>;
    async fn update_meal(&self, meal: &MealEntry) -> Result<Option<MealEntry>>;
    async fn delete_meal(&self, user_id: i64, id: Uuid) -> Result<bool>;
}

/// Build the configured store chain
pub async fn build(config: &AppConfig) -> Result<Arc<dyn DataStore>> {
    let storage = &config.storage;
    let has_fallback = storage.fallback.is_some();
    let primary = build_single(config, storage.primary, has_fallback).await?;

    match storage.fallback {
        Some(kind) if kind != storage.primary => {
            let fallback = build_single(config, kind, false).await?;
            info!(primary = primary.name(), fallback = fallback.name(), "Data store ready");
            Ok(Arc::new(FallbackStore::new(primary, fallback)))
        }
        Some(kind) => {
            warn!(store = %kind, "Fallback store equals primary store, ignoring fallback");
            Ok(primary)
        }
        None => {
            info!(primary = primary.name(), "Data store ready");
            Ok(primary)
        }
    }
}

async fn build_single(
    config: &AppConfig,
    kind: StoreKind,
    tolerate_unreachable: bool,
) -> Result<Arc<dyn DataStore>> {
    match kind {
        StoreKind::Postgres => {
            let pool = db::create_lazy_pool(&DbConfig {
                url: config.database.url.clone(),
                max_connections: config.database.max_connections,
                ..Default::default()
            })?;

            if config.database.run_migrations {
                if let Err(e) = db::run_migrations(&pool).await {
                    if !tolerate_unreachable {
                        return Err(e);
                    }
                    warn!(error = %e, "Postgres unavailable at startup, relying on fallback store");
                }
            }

            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreKind::Supabase => Ok(Arc::new(SupabaseStore::new(&config.supabase)?)),
        StoreKind::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use secrecy::SecretString;

    #[tokio::test]
    async fn test_build_memory_store() {
        let mut config = AppConfig::default();
        config.storage = StorageConfig {
            primary: StoreKind::Memory,
            fallback: None,
        };
        let store = build(&config).await.unwrap();
        assert_eq!(store.name(), "memory");
        assert!(store.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_build_with_fallback() {
        let mut config = AppConfig::default();
        config.supabase.url = "http://127.0.0.1:9".to_string();
        config.supabase.service_key = SecretString::new("key".to_string());
        config.storage = StorageConfig {
            primary: StoreKind::Supabase,
            fallback: Some(StoreKind::Memory),
        };
        let store = build(&config).await.unwrap();
        assert_eq!(store.name(), "fallback");
    }

    #[tokio::test]
    async fn test_build_ignores_identical_fallback() {
        let mut config = AppConfig::default();
        config.storage = StorageConfig {
            primary: StoreKind::Memory,
            fallback: Some(StoreKind::Memory),
        };
        let store = build(&config).await.unwrap();
        assert_eq!(store.name(), "memory");
    }
}
