//! Step session repository for database operations

use super::{to_decimal, to_f64};
use anyhow::Result;
use chrono::{DateTime, Utc};
use diet_tracker_shared::{RecordFilter, StepSession};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Step session row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StepSessionRecord {
    pub id: Uuid,
    pub user_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub steps: i32,
    pub distance_km: Decimal,
    pub calories_burned: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StepSessionRecord {
    pub fn into_model(self) -> StepSession {
        StepSession {
            id: self.id,
            user_id: self.user_id,
            start_time: self.start_time,
            end_time: self.end_time,
            steps: self.steps,
            distance_km: to_f64(self.distance_km),
            calories_burned: to_f64(self.calories_burned),
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Step session repository
pub struct StepSessionRepository;

impl StepSessionRepository {
    /// Sessions starting inside the filter window, newest first
    pub async fn list(
        pool: &PgPool,
        user_id: i64,
        filter: &RecordFilter,
    ) -> Result<Vec<StepSessionRecord>> {
        let records = sqlx::query_as::<_, StepSessionRecord>(
            r#"
            SELECT id, user_id, start_time, end_time, steps, distance_km, calories_burned,
                   notes, created_at, updated_at
            FROM step_sessions
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR start_time >= $2)
              AND ($3::timestamptz IS NULL OR start_time < $3)
            ORDER BY start_time DESC
            LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn get(pool: &PgPool, user_id: i64, id: Uuid) -> Result<Option<StepSessionRecord>> {
        let record = sqlx::query_as::<_, StepSessionRecord>(
            r#"
            SELECT id, user_id, start_time, end_time, steps, distance_km, calories_burned,
                   notes, created_at, updated_at
            FROM step_sessions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn insert(pool: &PgPool, session: &StepSession) -> Result<StepSessionRecord> {
        let record = sqlx::query_as::<_, StepSessionRecord>(
            r#"
            INSERT INTO step_sessions (
                id, user_id, start_time, end_time, steps, distance_km, calories_burned,
                notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, user_id, start_time, end_time, steps, distance_km, calories_burned,
                      notes, created_at, updated_at
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.start_time)
        .bind(session.end_time)
        .bind(session.steps)
        .bind(to_decimal(session.distance_km)?)
        .bind(to_decimal(session.calories_burned)?)
        .bind(&session.notes)
        .bind(session.created_at)
        .bind(session.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    pub async fn update(
        pool: &PgPool,
        session: &StepSession,
    ) -> Result<Option<StepSessionRecord>> {
        let record = sqlx::query_as::<_, StepSessionRecord>(
            r#"
            UPDATE step_sessions
            SET start_time = $3,
                end_time = $4,
                steps = $5,
                distance_km = $6,
                calories_burned = $7,
                notes = $8,
                updated_at = $9
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, start_time, end_time, steps, distance_km, calories_burned,
                      notes, created_at, updated_at
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.start_time)
        .bind(session.end_time)
        .bind(session.steps)
        .bind(to_decimal(session.distance_km)?)
        .bind(to_decimal(session.calories_burned)?)
        .bind(&session.notes)
        .bind(session.updated_at)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn delete(pool: &PgPool, user_id: i64, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM step_sessions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
