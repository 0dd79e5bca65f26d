//! Primary/fallback store chaining
//!
//! Every call goes to the primary first. If it returns an error the same
//! call is made once against the fallback. Successful empty results
//! (`Ok(None)`, empty lists, `Ok(false)`) are answers, not failures.

use super::{DataStore, DuplicateRecord};
use anyhow::Result;
use async_trait::async_trait;
use diet_tracker_shared::{MealEntry, RecordFilter, SleepSession, StepSession, UserProfile};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Two stores tried in order
pub struct FallbackStore {
    primary: Arc<dyn DataStore>,
    fallback: Arc<dyn DataStore>,
}

impl FallbackStore {
    pub fn new(primary: Arc<dyn DataStore>, fallback: Arc<dyn DataStore>) -> Self {
        Self { primary, fallback }
    }

    async fn attempt<'a, T, F>(&'a self, operation: &'static str, call: F) -> Result<T>
    where
        F: Fn(&'a dyn DataStore) -> StoreFuture<'a, T>,
    {
        let primary_err = match call(self.primary.as_ref()).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is::<DuplicateRecord>() => return Err(e),
            Err(e) => e,
        };

        warn!(
            operation,
            primary = self.primary.name(),
            fallback = self.fallback.name(),
            error = %primary_err,
            "Primary store failed, trying fallback"
        );

        call(self.fallback.as_ref()).await.map_err(|fallback_err| {
            fallback_err.context(format!(
                "{} failed on both stores; {} error: {:#}",
                operation,
                self.primary.name(),
                primary_err
            ))
        })
    }
}

#[async_trait]
impl DataStore for FallbackStore {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn health_check(&self) -> Result<()> {
        self.attempt("health_check", |s| s.health_check()).await
    }

    async fn get_profile(&self, telegram_id: i64) -> Result<Option<UserProfile>> {
        self.attempt("get_profile", |s| s.get_profile(telegram_id))
            .await
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<UserProfile> {
        self.attempt("upsert_profile", |s| s.upsert_profile(profile))
            .await
    }

    async fn delete_profile(&self, telegram_id: i64) -> Result<bool> {
        self.attempt("delete_profile", |s| s.delete_profile(telegram_id))
            .await
    }

    async fn list_sleep(&self, user_id: i64, filter: &RecordFilter) -> Result<Vec<SleepSession>> {
        self.attempt("list_sleep", |s| s.list_sleep(user_id, filter))
            .await
    }

    async fn get_sleep(&self, user_id: i64, id: Uuid) -> Result<Option<SleepSession>> {
        self.attempt("get_sleep", |s| s.get_sleep(user_id, id)).await
    }

    async fn insert_sleep(&self, session: &SleepSession) -> Result<SleepSession> {
        self.attempt("insert_sleep", |s| s.insert_sleep(session))
            .await
    }

    async fn update_sleep(&self, session: &SleepSession) -> Result<Option<SleepSession>> {
        self.attempt("update_sleep", |s| s.update_sleep(session))
            .await
    }

    async fn delete_sleep(&self, user_id: i64, id: Uuid) -> Result<bool> {
        self.attempt("delete_sleep", |s| s.delete_sleep(user_id, id))
            .await
    }

    async fn list_steps(&self, user_id: i64, filter: &RecordFilter) -> Result<Vec<StepSession>> {
        self.attempt("list_steps", |s| s.list_steps(user_id, filter))
            .await
    }

    async fn get_steps(&self, user_id: i64, id: Uuid) -> Result<Option<StepSession>> {
        self.attempt("get_steps", |s| s.get_steps(user_id, id)).await
    }

    async fn insert_steps(&self, session: &StepSession) -> Result<StepSession> {
        self.attempt("insert_steps", |s| s.insert_steps(session))
            .await
    }

    async fn update_steps(&self, session: &StepSession) -> Result<Option<StepSession>> {
        self.attempt("update_steps", |s| s.update_steps(session))
            .await
    }

    async fn delete_steps(&self, user_id: i64, id: Uuid) -> Result<bool> {
        self.attempt("delete_steps", |s| s.delete_steps(user_id, id))
            .await
    }

    async fn list_meals(&self, user_id: i64, filter: &RecordFilter) -> Result<Vec<MealEntry>> {
        self.attempt("list_meals", |s| s.list_meals(user_id, filter))
            .await
    }

    async fn get_meal(&self, user_id: i64, id: Uuid) -> Result<Option<MealEntry>> {
        self.attempt("get_meal", |s| s.get_meal(user_id, id)).await
    }

    async fn insert_meal(&self, meal: &MealEntry) -> Result<MealEntry> {
        self.attempt("insert_meal", |s| s.insert_meal(meal)).await
    }

    async fn update_meal(&self, meal: &MealEntry) -> Result<Option<MealEntry>> {
        self.attempt("update_meal", |s| s.update_meal(meal)).await
    }

    async fn delete_meal(&self, user_id: i64, id: Uuid) -> Result<bool> {
        self.attempt("delete_meal", |s| s.delete_meal(user_id, id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use anyhow::bail;
    use chrono::Utc;
    use diet_tracker_shared::{ActivityLevel, Gender, Goal};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that fails every call and counts them
    #[derive(Default)]
    struct BrokenStore {
        calls: AtomicUsize,
    }

    impl BrokenStore {
        fn fail<T>(&self) -> Result<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            bail!("connection refused")
        }
    }

    #[async_trait]
    impl DataStore for BrokenStore {
        fn name(&self) -> &'static str {
            "broken"
        }
        async fn health_check(&self) -> Result<()> {
            self.fail()
        }
        async fn get_profile(&self, _: i64) -> Result<Option<UserProfile>> {
            self.fail()
        }
        async fn upsert_profile(&self, _: &UserProfile) -> Result<UserProfile> {
            self.fail()
        }
        async fn delete_profile(&self, _: i64) -> Result<bool> {
            self.fail()
        }
        async fn list_sleep(&self, _: i64, _: &RecordFilter) -> Result<Vec<SleepSession>> {
            self.fail()
        }
        async fn get_sleep(&self, _: i64, _: Uuid) -> Result<Option<SleepSession>> {
            self.fail()
        }
        async fn insert_sleep(&self, _: &SleepSession) -> Result<SleepSession> {
            self.fail()
        }
        async fn update_sleep(&self, _: &SleepSession) -> Result<Option<SleepSession>> {
            self.fail()
        }
        async fn delete_sleep(&self, _: i64, _: Uuid) -> Result<bool> {
            self.fail()
        }
        async fn list_steps(&self, _: i64, _: &RecordFilter) -> Result<Vec<StepSession>> {
            self.fail()
        }
        async fn get_steps(&self, _: i64, _: Uuid) -> Result<Option<StepSession>> {
            self.fail()
        }
        async fn insert_steps(&self, _: &StepSession) -> Result<StepSession> {
            self.fail()
        }
        async fn update_steps(&self, _: &StepSession) -> Result<Option<StepSession>> {
            self.fail()
        }
        async fn delete_steps(&self, _: i64, _: Uuid) -> Result<bool> {
            self.fail()
        }
        async fn list_meals(&self, _: i64, _: &RecordFilter) -> Result<Vec<MealEntry>> {
            self.fail()
        }
        async fn get_meal(&self, _: i64, _: Uuid) -> Result<Option<MealEntry>> {
            self.fail()
        }
        async fn insert_meal(&self, _: &MealEntry) -> Result<MealEntry> {
            self.fail()
        }
        async fn update_meal(&self, _: &MealEntry) -> Result<Option<MealEntry>> {
            self.fail()
        }
        async fn delete_meal(&self, _: i64, _: Uuid) -> Result<bool> {
            self.fail()
        }
    }

    fn profile(telegram_id: i64) -> UserProfile {
        let now = Utc::now();
        UserProfile {
            telegram_id,
            username: None,
            first_name: Some("Ann".to_string()),
            last_name: None,
            age: 30,
            gender: Gender::Female,
            weight_kg: 60.0,
            height_cm: 165.0,
            activity_level: ActivityLevel::Moderate,
            goal: Goal::Maintain,
            target_weight_kg: None,
            bmr: 1384,
            daily_calories: 2145,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_falls_back_on_primary_error() {
        let primary = Arc::new(BrokenStore::default());
        let fallback = Arc::new(MemoryStore::new());
        fallback.upsert_profile(&profile(5)).await.unwrap();

        let store = FallbackStore::new(primary.clone(), fallback);
        let found = store.get_profile(5).await.unwrap();

        assert_eq!(found.map(|p| p.telegram_id), Some(5));
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_absent_result_does_not_fall_back() {
        let primary = Arc::new(MemoryStore::new());
        let fallback = Arc::new(MemoryStore::new());
        fallback.upsert_profile(&profile(5)).await.unwrap();

        let store = FallbackStore::new(primary, fallback);
        assert!(store.get_profile(5).await.unwrap().is_none());
        assert!(store
            .list_meals(5, &RecordFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_both_failing_reports_both_errors() {
        let primary = Arc::new(BrokenStore::default());
        let fallback = Arc::new(BrokenStore::default());
        let store = FallbackStore::new(primary.clone(), fallback.clone());

        let err = store.delete_meal(1, Uuid::new_v4()).await.unwrap_err();
        let rendered = format!("{:#}", err);
        assert!(rendered.contains("delete_meal failed on both stores"));
        assert!(rendered.contains("broken error: connection refused"));
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicate_on_primary_is_final() {
        let primary = Arc::new(MemoryStore::new());
        let fallback = Arc::new(MemoryStore::new());
        let store = FallbackStore::new(primary, fallback.clone());

        let now = Utc::now();
        let session = SleepSession {
            id: Uuid::new_v4(),
            user_id: 3,
            start_time: now,
            end_time: None,
            duration_minutes: None,
            quality: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        store.insert_sleep(&session).await.unwrap();

        let err = store.insert_sleep(&session).await.unwrap_err();
        assert!(err.is::<DuplicateRecord>());
        assert!(fallback.get_sleep(3, session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_writes_go_to_primary_when_healthy() {
        let primary = Arc::new(MemoryStore::new());
        let fallback = Arc::new(MemoryStore::new());
        let store = FallbackStore::new(primary.clone(), fallback.clone());

        store.upsert_profile(&profile(9)).await.unwrap();
        assert!(primary.get_profile(9).await.unwrap().is_some());
        assert!(fallback.get_profile(9).await.unwrap().is_none());
        assert!(store.health_check().await.is_ok());
    }
}
