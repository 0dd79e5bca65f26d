//! Sleep session repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use diet_tracker_shared::{RecordFilter, SleepSession};
use sqlx::PgPool;
use uuid::Uuid;

/// Sleep session row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SleepSessionRecord {
    pub id: Uuid,
    pub user_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub quality: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SleepSessionRecord {
    pub fn into_model(self) -> SleepSession {
        SleepSession {
            id: self.id,
            user_id: self.user_id,
            start_time: self.start_time,
            end_time: self.end_time,
            duration_minutes: self.duration_minutes,
            quality: self.quality,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Sleep session repository
pub struct SleepSessionRepository;

impl SleepSessionRepository {
    /// Sessions starting inside the filter window, newest first
    pub async fn list(
        pool: &PgPool,
        user_id: i64,
        filter: &RecordFilter,
    ) -> Result<Vec<SleepSessionRecord>> {
        let records = sqlx::query_as::<_, SleepSessionRecord>(
            r#"
            SELECT id, user_id, start_time, end_time, duration_minutes, quality, notes,
                   created_at, updated_at
            FROM sleep_sessions
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

    pub async fn get(pool: &PgPool, user_id: i64, id: Uuid) -> Result<Option<SleepSessionRecord>> {
        let record = sqlx::query_as::<_, SleepSessionRecord>(
            r#"
            SELECT id, user_id, start_time, end_time, duration_minutes, quality, notes,
                   created_at, updated_at
            FROM sleep_sessions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn insert(pool: &PgPool, session: &SleepSession) -> Result<SleepSessionRecord> {
        let record = sqlx::query_as::<_, SleepSessionRecord>(
            r#"
            INSERT INTO sleep_sessions (
                id, user_id, start_time, end_time, duration_minutes, quality, notes,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, start_time, end_time, duration_minutes, quality, notes,
                      created_at, updated_at
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.start_time)
        .bind(session.end_time)
        .bind(session.duration_minutes)
        .bind(session.quality)
        .bind(&session.notes)
        .bind(session.created_at)
        .bind(session.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Overwrite the mutable columns; `None` when the session is not the user's
    pub async fn update(
        pool: &PgPool,
        session: &SleepSession,
    ) -> Result<Option<SleepSessionRecord>> {
        let record = sqlx::query_as::<_, SleepSessionRecord>(
            r#"
            UPDATE sleep_sessions
            SET start_time = $3,
                end_time = $4,
                duration_minutes = $5,
                quality = $6,
                notes = $7,
                updated_at = $8
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, start_time, end_time, duration_minutes, quality, notes,
                      created_at, updated_at
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.start_time)
        .bind(session.end_time)
        .bind(session.duration_minutes)
        .bind(session.quality)
        .bind(&session.notes)
        .bind(session.updated_at)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn delete(pool: &PgPool, user_id: i64, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sleep_sessions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
