//! User profile repository for database operations

use super::{to_decimal, to_decimal_opt, to_f64};
use anyhow::Result;
use chrono::{DateTime, Utc};
use diet_tracker_shared::UserProfile;
use rust_decimal::Decimal;
use sqlx::PgPool;

/// Profile row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: i32,
    pub gender: String,
    pub weight_kg: Decimal,
    pub height_cm: Decimal,
    pub activity_level: String,
    pub goal: String,
    pub target_weight_kg: Option<Decimal>,
    pub bmr: i32,
    pub daily_calories: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    pub fn into_model(self) -> Result<UserProfile> {
        Ok(UserProfile {
            telegram_id: self.telegram_id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            gender: self.gender.parse()?,
            weight_kg: to_f64(self.weight_kg),
            height_cm: to_f64(self.height_cm),
            activity_level: self.activity_level.parse()?,
            goal: self.goal.parse()?,
            target_weight_kg: self.target_weight_kg.map(to_f64),
            bmr: self.bmr,
            daily_calories: self.daily_calories,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const PROFILE_COLUMNS: &str = "telegram_id, username, first_name, last_name, age, gender, \
    weight_kg, height_cm, activity_level, goal, target_weight_kg, bmr, daily_calories, \
    created_at, updated_at";

/// Profile repository
pub struct UserProfileRepository;

impl UserProfileRepository {
    pub async fn get(pool: &PgPool, telegram_id: i64) -> Result<Option<ProfileRecord>> {
        let sql = format!(
            "SELECT {} FROM user_profiles WHERE telegram_id = $1",
            PROFILE_COLUMNS
        );
        let record = sqlx::query_as::<_, ProfileRecord>(&sql)
            .bind(telegram_id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// Insert or replace a profile; an existing row keeps its `created_at`
    pub async fn upsert(pool: &PgPool, profile: &UserProfile) -> Result<ProfileRecord> {
        let sql = format!(
            r#"
            INSERT INTO user_profiles (
                telegram_id, username, first_name, last_name, age, gender,
                weight_kg, height_cm, activity_level, goal, target_weight_kg,
                bmr, daily_calories, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (telegram_id) DO UPDATE SET
                username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                age = EXCLUDED.age,
                gender = EXCLUDED.gender,
                weight_kg = EXCLUDED.weight_kg,
                height_cm = EXCLUDED.height_cm,
                activity_level = EXCLUDED.activity_level,
                goal = EXCLUDED.goal,
                target_weight_kg = EXCLUDED.target_weight_kg,
                bmr = EXCLUDED.bmr,
                daily_calories = EXCLUDED.daily_calories,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        let record = sqlx::query_as::<_, ProfileRecord>(&sql)
            .bind(profile.telegram_id)
            .bind(&profile.username)
            .bind(&profile.first_name)
            .bind(&profile.last_name)
            .bind(profile.age)
            .bind(profile.gender.as_str())
            .bind(to_decimal(profile.weight_kg)?)
            .bind(to_decimal(profile.height_cm)?)
            .bind(profile.activity_level.as_str())
            .bind(profile.goal.as_str())
            .bind(to_decimal_opt(profile.target_weight_kg)?)
            .bind(profile.bmr)
            .bind(profile.daily_calories)
            .bind(profile.created_at)
            .bind(profile.updated_at)
            .fetch_one(pool)
            .await?;

        Ok(record)
    }

    pub async fn delete(pool: &PgPool, telegram_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_profiles WHERE telegram_id = $1")
            .bind(telegram_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
