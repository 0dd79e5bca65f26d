//! In-memory store for development, tests and as a last-resort fallback

use super::{DataStore, DuplicateRecord};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diet_tracker_shared::{MealEntry, RecordFilter, SleepSession, StepSession, UserProfile};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    profiles: HashMap<i64, UserProfile>,
    sleep: HashMap<Uuid, SleepSession>,
    steps: HashMap<Uuid, StepSession>,
    meals: HashMap<Uuid, MealEntry>,
}

/// Data held in process memory; lost on restart
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Owner's rows inside the window, newest first, capped at the filter limit
fn select<T: Clone>(
    rows: &HashMap<Uuid, T>,
    user_id: i64,
    filter: &RecordFilter,
    owner: impl Fn(&T) -> i64,
    at: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut selected: Vec<T> = rows
        .values()
        .filter(|row| owner(*row) == user_id && filter.contains(at(*row)))
        .cloned()
        .collect();
    selected.sort_by(|a, b| at(b).cmp(&at(a)));
    selected.truncate(filter.limit.max(0) as usize);
    selected
}

#[async_trait]
impl DataStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    async fn get_profile(&self, telegram_id: i64) -> Result<Option<UserProfile>> {
        Ok(self.tables.read().await.profiles.get(&telegram_id).cloned())
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<UserProfile> {
        let mut tables = self.tables.write().await;
        let mut stored = profile.clone();
        if let Some(existing) = tables.profiles.get(&profile.telegram_id) {
            stored.created_at = existing.created_at;
        }
        tables.profiles.insert(stored.telegram_id, stored.clone());
        Ok(stored)
    }

    async fn delete_profile(&self, telegram_id: i64) -> Result<bool> {
        Ok(self.tables.write().await.profiles.remove(&telegram_id).is_some())
    }

    async fn list_sleep(&self, user_id: i64, filter: &RecordFilter) -> Result<Vec<SleepSession>> {
        let tables = self.tables.read().await;
        Ok(select(&tables.sleep, user_id, filter, |s| s.user_id, |s| s.start_time))
    }

    async fn get_sleep(&self, user_id: i64, id: Uuid) -> Result<Option<SleepSession>> {
        let tables = self.tables.read().await;
        Ok(tables.sleep.get(&id).filter(|s| s.user_id == user_id).cloned())
    }

    async fn insert_sleep(&self, session: &SleepSession) -> Result<SleepSession> {
        let mut tables = self.tables.write().await;
        if tables.sleep.contains_key(&session.id) {
            return Err(DuplicateRecord(format!("Sleep session {}", session.id)).into());
        }
        tables.sleep.insert(session.id, session.clone());
        Ok(session.clone())
    }

    async fn update_sleep(&self, session: &SleepSession) -> Result<Option<SleepSession>> {
        let mut tables = self.tables.write().await;
        match tables.sleep.get_mut(&session.id) {
            Some(existing) if existing.user_id == session.user_id => {
                let created_at = existing.created_at;
                *existing = SleepSession {
                    created_at,
                    ..session.clone()
                };
                Ok(Some(existing.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_sleep(&self, user_id: i64, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.sleep.get(&id).map_or(false, |s| s.user_id == user_id) {
            tables.sleep.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn list_steps(&self, user_id: i64, filter: &RecordFilter) -> Result<Vec<StepSession>> {
        let tables = self.tables.read().await;
        Ok(select(&tables.steps, user_id, filter, |s| s.user_id, |s| s.start_time))
    }

    async fn get_steps(&self, user_id: i64, id: Uuid) -> Result<Option<StepSession>> {
        let tables = self.tables.read().await;
        Ok(tables.steps.get(&id).filter(|s| s.user_id == user_id).cloned())
    }

    async fn insert_steps(&self, session: &StepSession) -> Result<StepSession> {
        let mut tables = self.tables.write().await;
        if tables.steps.contains_key(&session.id) {
            return Err(DuplicateRecord(format!("Step session {}", session.id)).into());
        }
        tables.steps.insert(session.id, session.clone());
        Ok(session.clone())
    }

    async fn update_steps(&self, session: &StepSession) -> Result<Option<StepSession>> {
        let mut tables = self.tables.write().await;
        match tables.steps.get_mut(&session.id) {
            Some(existing) if existing.user_id == session.user_id => {
                let created_at = existing.created_at;
                *existing = StepSession {
                    created_at,
                    ..session.clone()
                };
                Ok(Some(existing.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_steps(&self, user_id: i64, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.steps.get(&id).map_or(false, |s| s.user_id == user_id) {
            tables.steps.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn list_meals(&self, user_id: i64, filter: &RecordFilter) -> Result<Vec<MealEntry>> {
        let tables = self.tables.read().await;
        Ok(select(&tables.meals, user_id, filter, |m| m.user_id, |m| m.eaten_at))
    }

    async fn get_meal(&self, user_id: i64, id: Uuid) -> Result<Option<MealEntry>> {
        let tables = self.tables.read().await;
        Ok(tables.meals.get(&id).filter(|m| m.user_id == user_id).cloned())
    }

    async fn insert_meal(&self, meal: &MealEntry) -> Result<MealEntry> {
        let mut tables = self.tables.write().await;
        if tables.meals.contains_key(&meal.id) {
            return Err(DuplicateRecord(format!("Meal entry {}", meal.id)).into());
        }
        tables.meals.insert(meal.id, meal.clone());
        Ok(meal.clone())
    }

    async fn update_meal(&self, meal: &MealEntry) -> Result<Option<MealEntry>> {
        let mut tables = self.tables.write().await;
        match tables.meals.get_mut(&meal.id) {
            Some(existing) if existing.user_id == meal.user_id => {
                let created_at = existing.created_at;
                *existing = MealEntry {
                    created_at,
                    ..meal.clone()
                };
                Ok(Some(existing.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_meal(&self, user_id: i64, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.meals.get(&id).map_or(false, |m| m.user_id == user_id) {
            tables.meals.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}
