//! Sleep tracking service
//!
//! Provides business logic for sleep sessions:
//! - Starting and logging sessions
//! - Completing an in-progress session by setting its end time
//! - Duration bookkeeping

use super::clean_text;
use crate::error::ApiError;
use crate::store::DataStore;
use chrono::{DateTime, Utc};
use diet_tracker_shared::types::{CreateSleepRequest, UpdateSleepRequest};
use diet_tracker_shared::validation::{duration_minutes, validate_not_future, validate_time_window};
use diet_tracker_shared::{RecordFilter, SleepSession};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Sleep service for business logic
pub struct SleepService;

impl SleepService {
    pub async fn list(
        store: &dyn DataStore,
        user_id: i64,
        filter: &RecordFilter,
    ) -> Result<Vec<SleepSession>, ApiError> {
        store
            .list_sleep(user_id, filter)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn get(store: &dyn DataStore, user_id: i64, id: Uuid) -> Result<SleepSession, ApiError> {
        store
            .get_sleep(user_id, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Sleep session not found".to_string()))
    }

    /// Log a sleep session; without `end_time` it stays in progress
    pub async fn create(
        store: &dyn DataStore,
        user_id: i64,
        req: CreateSleepRequest,
    ) -> Result<SleepSession, ApiError> {
        req.validate()?;

        let now = Utc::now();
        Self::check_window(req.start_time, req.end_time, now)?;

        let session = SleepSession {
            id: Uuid::new_v4(),
            user_id,
            start_time: req.start_time,
            end_time: req.end_time,
            duration_minutes: req.end_time.map(|end| duration_minutes(req.start_time, end)),
            quality: req.quality,
            notes: clean_text(req.notes),
            created_at: now,
            updated_at: now,
        };

        let saved = store
            .insert_sleep(&session)
            .await
            .map_err(ApiError::store)?;

        info!(
            user_id,
            session_id = %saved.id,
            duration_minutes = ?saved.duration_minutes,
            "Sleep session logged"
        );
        Ok(saved)
    }

    /// Update a session; setting `end_time` completes an in-progress one
    pub async fn update(
        store: &dyn DataStore,
        user_id: i64,
        id: Uuid,
        req: UpdateSleepRequest,
    ) -> Result<SleepSession, ApiError> {
        req.validate()?;

        let mut session = Self::get(store, user_id, id).await?;

        if let Some(start) = req.start_time {
            session.start_time = start;
        }
        if let Some(end) = req.end_time {
            session.end_time = Some(end);
        }
        if let Some(quality) = req.quality {
            session.quality = Some(quality);
        }
        if req.notes.is_some() {
            session.notes = clean_text(req.notes);
        }

        let now = Utc::now();
        Self::check_window(session.start_time, session.end_time, now)?;
        session.duration_minutes = session
            .end_time
            .map(|end| duration_minutes(session.start_time, end));
        session.updated_at = now;

        store
            .update_sleep(&session)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Sleep session not found".to_string()))
    }

    pub async fn delete(store: &dyn DataStore, user_id: i64, id: Uuid) -> Result<(), ApiError> {
        let deleted = store
            .delete_sleep(user_id, id)
            .await
            .map_err(ApiError::Internal)?;

        if deleted {
            Ok(())
        } else {
            Err(ApiError::NotFound("Sleep session not found".to_string()))
        }
    }

    fn check_window(
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        validate_not_future(start, now).map_err(|m| ApiError::field("start_time", m))?;
        if let Some(end) = end {
            validate_not_future(end, now).map_err(|m| ApiError::field("end_time", m))?;
        }
        validate_time_window(start, end).map_err(|m| ApiError::field("end_time", m))
    }
}
