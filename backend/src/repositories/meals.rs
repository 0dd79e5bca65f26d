//! Meal entry repository for database operations

use super::{to_decimal, to_decimal_opt, to_f64};
use anyhow::Result;
use chrono::{DateTime, Utc};
use diet_tracker_shared::{MealEntry, RecordFilter};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Meal entry row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealEntryRecord {
    pub id: Uuid,
    pub user_id: i64,
    pub meal_type: String,
    pub food_name: String,
    pub calories: Decimal,
    pub protein_g: Option<Decimal>,
    pub carbs_g: Option<Decimal>,
    pub fat_g: Option<Decimal>,
    pub portion_grams: Option<Decimal>,
    pub eaten_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MealEntryRecord {
    pub fn into_model(self) -> Result<MealEntry> {
        Ok(MealEntry {
            id: self.id,
            user_id: self.user_id,
            meal_type: self.meal_type.parse()?,
            food_name: self.food_name,
            calories: to_f64(self.calories),
            protein_g: self.protein_g.map(to_f64),
            carbs_g: self.carbs_g.map(to_f64),
            fat_g: self.fat_g.map(to_f64),
            portion_grams: self.portion_grams.map(to_f64),
            eaten_at: self.eaten_at,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Meal entry repository
pub struct MealEntryRepository;

impl MealEntryRepository {
    /// Meals eaten inside the filter window, newest first
    pub async fn list(
        pool: &PgPool,
        user_id: i64,
        filter: &RecordFilter,
    ) -> Result<Vec<MealEntryRecord>> {
        let records = sqlx::query_as::<_, MealEntryRecord>(
            r#"
            SELECT id, user_id, meal_type, food_name, calories, protein_g, carbs_g, fat_g,
                   portion_grams, eaten_at, notes, created_at, updated_at
            FROM meal_entries
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR eaten_at >= $2)
              AND ($3::timestamptz IS NULL OR eaten_at < $3)
            ORDER BY eaten_at DESC
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

    pub async fn get(pool: &PgPool, user_id: i64, id: Uuid) -> Result<Option<MealEntryRecord>> {
        let record = sqlx::query_as::<_, MealEntryRecord>(
            r#"
            SELECT id, user_id, meal_type, food_name, calories, protein_g, carbs_g, fat_g,
                   portion_grams, eaten_at, notes, created_at, updated_at
            FROM meal_entries
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn insert(pool: &PgPool, meal: &MealEntry) -> Result<MealEntryRecord> {
        let record = sqlx::query_as::<_, MealEntryRecord>(
            r#"
            INSERT INTO meal_entries (
                id, user_id, meal_type, food_name, calories, protein_g, carbs_g, fat_g,
                portion_grams, eaten_at, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, user_id, meal_type, food_name, calories, protein_g, carbs_g, fat_g,
                      portion_grams, eaten_at, notes, created_at, updated_at
            "#,
        )
        .bind(meal.id)
        .bind(meal.user_id)
        .bind(meal.meal_type.as_str())
        .bind(&meal.food_name)
        .bind(to_decimal(meal.calories)?)
        .bind(to_decimal_opt(meal.protein_g)?)
        .bind(to_decimal_opt(meal.carbs_g)?)
        .bind(to_decimal_opt(meal.fat_g)?)
        .bind(to_decimal_opt(meal.portion_grams)?)
        .bind(meal.eaten_at)
        .bind(&meal.notes)
        .bind(meal.created_at)
        .bind(meal.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    pub async fn update(pool: &PgPool, meal: &MealEntry) -> Result<Option<MealEntryRecord>> {
        let record = sqlx::query_as::<_, MealEntryRecord>(
            r#"
            UPDATE meal_entries
            SET meal_type = $3,
                food_name = $4,
                calories = $5,
                protein_g = $6,
                carbs_g = $7,
                fat_g = $8,
                portion_grams = $9,
                eaten_at = $10,
                notes = $11,
                updated_at = $12
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, meal_type, food_name, calories, protein_g, carbs_g, fat_g,
                      portion_grams, eaten_at, notes, created_at, updated_at
            "#,
        )
        .bind(meal.id)
        .bind(meal.user_id)
        .bind(meal.meal_type.as_str())
        .bind(&meal.food_name)
        .bind(to_decimal(meal.calories)?)
        .bind(to_decimal_opt(meal.protein_g)?)
        .bind(to_decimal_opt(meal.carbs_g)?)
        .bind(to_decimal_opt(meal.fat_g)?)
        .bind(to_decimal_opt(meal.portion_grams)?)
        .bind(meal.eaten_at)
        .bind(&meal.notes)
        .bind(meal.updated_at)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn delete(pool: &PgPool, user_id: i64, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meal_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
