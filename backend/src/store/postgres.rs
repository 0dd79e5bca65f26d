//! Direct Postgres store over the sqlx repositories

use super::{DataStore, DuplicateRecord};
use crate::db;
use crate::repositories::{
    MealEntryRepository, SleepSessionRepository, StepSessionRepository, UserProfileRepository,
};
use anyhow::Result;
use async_trait::async_trait;
use diet_tracker_shared::{MealEntry, RecordFilter, SleepSession, StepSession, UserProfile};
use sqlx::PgPool;
use uuid::Uuid;

/// Store backed by a Postgres pool (Supabase's database or a local one)
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DataStore for PgStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<()> {
        db::health_check(&self.pool).await
    }

    async fn get_profile(&self, telegram_id: i64) -> Result<Option<UserProfile>> {
        UserProfileRepository::get(&self.pool, telegram_id)
            .await?
            .map(|r| r.into_model())
            .transpose()
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<UserProfile> {
        UserProfileRepository::upsert(&self.pool, profile)
            .await?
            .into_model()
    }

    async fn delete_profile(&self, telegram_id: i64) -> Result<bool> {
        UserProfileRepository::delete(&self.pool, telegram_id).await
    }

    async fn list_sleep(&self, user_id: i64, filter: &RecordFilter) -> Result<Vec<SleepSession>> {
        let records = SleepSessionRepository::list(&self.pool, user_id, filter).await?;
        Ok(records.into_iter().map(|r| r.into_model()).collect())
    }

    async fn get_sleep(&self, user_id: i64, id: Uuid) -> Result<Option<SleepSession>> {
        let record = SleepSessionRepository::get(&self.pool, user_id, id).await?;
        Ok(record.map(|r| r.into_model()))
    }

    async fn insert_sleep(&self, session: &SleepSession) -> Result<SleepSession> {
        let record = SleepSessionRepository::insert(&self.pool, session)
            .await
            .map_err(|e| duplicate_or(e, || format!("Sleep session {}", session.id)))?;
        Ok(record.into_model())
    }

    async fn update_sleep(&self, session: &SleepSession) -> Result<Option<SleepSession>> {
        let record = SleepSessionRepository::update(&self.pool, session).await?;
        Ok(record.map(|r| r.into_model()))
    }

    async fn delete_sleep(&self, user_id: i64, id: Uuid) -> Result<bool> {
        SleepSessionRepository::delete(&self.pool, user_id, id).await
    }

    async fn list_steps(&self, user_id: i64, filter: &RecordFilter) -> Result<Vec<StepSession>> {
        let records = StepSessionRepository::list(&self.pool, user_id, filter).await?;
        Ok(records.into_iter().map(|r| r.into_model()).collect())
    }

    async fn get_steps(&self, user_id: i64, id: Uuid) -> Result<Option<StepSession>> {
        let record = StepSessionRepository::get(&self.pool, user_id, id).await?;
        Ok(record.map(|r| r.into_model()))
    }

    async fn insert_steps(&self, session: &StepSession) -> Result<StepSession> {
        let record = StepSessionRepository::insert(&self.pool, session)
            .await
            .map_err(|e| duplicate_or(e, || format!("Step session {}", session.id)))?;
        Ok(record.into_model())
    }

    async fn update_steps(&self, session: &StepSession) -> Result<Option<StepSession>> {
        let record = StepSessionRepository::update(&self.pool, session).await?;
        Ok(record.map(|r| r.into_model()))
    }

    async fn delete_steps(&self, user_id: i64, id: Uuid) -> Result<bool> {
        StepSessionRepository::delete(&self.pool, user_id, id).await
    }

    async fn list_meals(&self, user_id: i64, filter: &RecordFilter) -> Result<Vec<MealEntry>> {
        MealEntryRepository::list(&self.pool, user_id, filter)
            .await?
            .into_iter()
            .map(|r| r.into_model())
            .collect()
    }

    async fn get_meal(&self, user_id: i64, id: Uuid) -> Result<Option<MealEntry>> {
        MealEntryRepository::get(&self.pool, user_id, id)
            .await?
            .map(|r| r.into_model())
            .transpose()
    }

    async fn insert_meal(&self, meal: &MealEntry) -> Result<MealEntry> {
        MealEntryRepository::insert(&self.pool, meal)
            .await
            .map_err(|e| duplicate_or(e, || format!("Meal entry {}", meal.id)))?
            .into_model()
    }

    async fn update_meal(&self, meal: &MealEntry) -> Result<Option<MealEntry>> {
        MealEntryRepository::update(&self.pool, meal)
            .await?
            .map(|r| r.into_model())
            .transpose()
    }

    async fn delete_meal(&self, user_id: i64, id: Uuid) -> Result<bool> {
        MealEntryRepository::delete(&self.pool, user_id, id).await
    }
}

/// Turn a primary key violation into [`DuplicateRecord`]
fn duplicate_or(err: anyhow::Error, record: impl FnOnce() -> String) -> anyhow::Error {
    let unique_violation = err
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation());
    if unique_violation {
        DuplicateRecord(record()).into()
    } else {
        err
    }
}
