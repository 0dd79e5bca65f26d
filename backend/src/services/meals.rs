//! Meal logging service

use super::clean_text;
use crate::error::ApiError;
use crate::store::DataStore;
use chrono::Utc;
use diet_tracker_shared::types::{CreateMealRequest, UpdateMealRequest};
use diet_tracker_shared::validation::{validate_not_blank, validate_not_future};
use diet_tracker_shared::{MealEntry, RecordFilter};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct MealService;

impl MealService {
    pub async fn list(
        store: &dyn DataStore,
        user_id: i64,
        filter: &RecordFilter,
    ) -> Result<Vec<MealEntry>, ApiError> {
        store
            .list_meals(user_id, filter)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn get(store: &dyn DataStore, user_id: i64, id: Uuid) -> Result<MealEntry, ApiError> {
        store
            .get_meal(user_id, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Meal not found".to_string()))
    }

    /// Log a meal; `eaten_at` defaults to now
    pub async fn create(
        store: &dyn DataStore,
        user_id: i64,
        req: CreateMealRequest,
    ) -> Result<MealEntry, ApiError> {
        req.validate()?;
        validate_not_blank(&req.food_name).map_err(|m| ApiError::field("food_name", m))?;

        let now = Utc::now();
        let eaten_at = req.eaten_at.unwrap_or(now);
        validate_not_future(eaten_at, now).map_err(|m| ApiError::field("eaten_at", m))?;

        let meal = MealEntry {
            id: Uuid::new_v4(),
            user_id,
            meal_type: req.meal_type,
            food_name: req.food_name.trim().to_string(),
            calories: req.calories,
            protein_g: req.protein_g,
            carbs_g: req.carbs_g,
            fat_g: req.fat_g,
            portion_grams: req.portion_grams,
            eaten_at,
            notes: clean_text(req.notes),
            created_at: now,
            updated_at: now,
        };

        let saved = store
            .insert_meal(&meal)
            .await
            .map_err(ApiError::store)?;

        info!(
            user_id,
            meal_id = %saved.id,
            meal_type = %saved.meal_type,
            calories = saved.calories,
            "Meal logged"
        );
        Ok(saved)
    }

    pub async fn update(
        store: &dyn DataStore,
        user_id: i64,
        id: Uuid,
        req: UpdateMealRequest,
    ) -> Result<MealEntry, ApiError> {
        req.validate()?;

        let mut meal = Self::get(store, user_id, id).await?;

        if let Some(meal_type) = req.meal_type {
            meal.meal_type = meal_type;
        }
        if let Some(name) = req.food_name {
            validate_not_blank(&name).map_err(|m| ApiError::field("food_name", m))?;
            meal.food_name = name.trim().to_string();
        }
        if let Some(calories) = req.calories {
            meal.calories = calories;
        }
        if req.protein_g.is_some() {
            meal.protein_g = req.protein_g;
        }
        if req.carbs_g.is_some() {
            meal.carbs_g = req.carbs_g;
        }
        if req.fat_g.is_some() {
            meal.fat_g = req.fat_g;
        }
        if req.portion_grams.is_some() {
            meal.portion_grams = req.portion_grams;
        }
        if req.notes.is_some() {
            meal.notes = clean_text(req.notes);
        }

        let now = Utc::now();
        if let Some(eaten_at) = req.eaten_at {
            validate_not_future(eaten_at, now).map_err(|m| ApiError::field("eaten_at", m))?;
            meal.eaten_at = eaten_at;
        }
        meal.updated_at = now;

        store
            .update_meal(&meal)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Meal not found".to_string()))
    }

    pub async fn delete(store: &dyn DataStore, user_id: i64, id: Uuid) -> Result<(), ApiError> {
        let deleted = store
            .delete_meal(user_id, id)
            .await
            .map_err(ApiError::Internal)?;

        if deleted {
            Ok(())
        } else {
            Err(ApiError::NotFound("Meal not found".to_string()))
        }
    }
}
