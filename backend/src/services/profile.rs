//! Profile service - business logic for user profiles
//!
//! Every write recomputes BMR and the daily calorie target from the
//! profile's body data, so stored targets never drift from the inputs.

use super::clean_text;
use crate::config::NutritionConfig;
use crate::error::ApiError;
use crate::store::DataStore;
use chrono::Utc;
use diet_tracker_shared::health_metrics::{
    calculate_bmi, calculate_energy_targets, classify_bmi, round1, EnergyInput, EnergyTargets,
};
use diet_tracker_shared::types::{
    CalculateRequest, CalculationResponse, CreateProfileRequest, UpdateProfileRequest,
};
use diet_tracker_shared::UserProfile;
use tracing::info;
use validator::Validate;

/// Profile service for user profile operations
pub struct ProfileService;

impl ProfileService {
    /// Get a profile by Telegram id
    pub async fn get(store: &dyn DataStore, telegram_id: i64) -> Result<UserProfile, ApiError> {
        Self::find(store, telegram_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
    }

    /// Get a profile if one exists
    pub async fn find(
        store: &dyn DataStore,
        telegram_id: i64,
    ) -> Result<Option<UserProfile>, ApiError> {
        store
            .get_profile(telegram_id)
            .await
            .map_err(ApiError::Internal)
    }

    /// Create or replace a profile
    pub async fn create(
        store: &dyn DataStore,
        nutrition: &NutritionConfig,
        req: CreateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        req.validate()?;

        let now = Utc::now();
        let created_at = Self::find(store, req.telegram_id)
            .await?
            .map(|existing| existing.created_at)
            .unwrap_or(now);

        let mut profile = UserProfile {
            telegram_id: req.telegram_id,
            username: clean_text(req.username),
            first_name: clean_text(req.first_name),
            last_name: clean_text(req.last_name),
            age: req.age,
            gender: req.gender,
            weight_kg: req.weight_kg,
            height_cm: req.height_cm,
            activity_level: req.activity_level,
            goal: req.goal,
            target_weight_kg: req.target_weight_kg,
            bmr: 0,
            daily_calories: 0,
            created_at,
            updated_at: now,
        };
        Self::apply_targets(&mut profile, nutrition)?;

        let saved = store
            .upsert_profile(&profile)
            .await
            .map_err(ApiError::Internal)?;

        info!(
            telegram_id = saved.telegram_id,
            bmr = saved.bmr,
            daily_calories = saved.daily_calories,
            "Profile saved"
        );
        Ok(saved)
    }

    /// Apply a partial update and recompute targets
    pub async fn update(
        store: &dyn DataStore,
        nutrition: &NutritionConfig,
        telegram_id: i64,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile, ApiError> {
        req.validate()?;

        let mut profile = Self::get(store, telegram_id).await?;

        if req.username.is_some() {
            profile.username = clean_text(req.username);
        }
        if req.first_name.is_some() {
            profile.first_name = clean_text(req.first_name);
        }
        if req.last_name.is_some() {
            profile.last_name = clean_text(req.last_name);
        }
        if let Some(age) = req.age {
            profile.age = age;
        }
        if let Some(gender) = req.gender {
            profile.gender = gender;
        }
        if let Some(weight) = req.weight_kg {
            profile.weight_kg = weight;
        }
        if let Some(height) = req.height_cm {
            profile.height_cm = height;
        }
        if let Some(level) = req.activity_level {
            profile.activity_level = level;
        }
        if let Some(goal) = req.goal {
            profile.goal = goal;
        }
        if req.target_weight_kg.is_some() {
            profile.target_weight_kg = req.target_weight_kg;
        }

        profile.updated_at = Utc::now();
        Self::apply_targets(&mut profile, nutrition)?;

        store
            .upsert_profile(&profile)
            .await
            .map_err(ApiError::Internal)
    }

    /// Delete a profile
    pub async fn delete(store: &dyn DataStore, telegram_id: i64) -> Result<(), ApiError> {
        let deleted = store
            .delete_profile(telegram_id)
            .await
            .map_err(ApiError::Internal)?;

        if deleted {
            info!(telegram_id, "Profile deleted");
            Ok(())
        } else {
            Err(ApiError::NotFound("Profile not found".to_string()))
        }
    }

    /// Stateless BMR/TDEE/BMI calculation
    pub fn calculate(
        nutrition: &NutritionConfig,
        req: &CalculateRequest,
    ) -> Result<CalculationResponse, ApiError> {
        req.validate()?;

        let formula = req.formula.unwrap_or(nutrition.bmr_formula);
        let targets = calculate_energy_targets(
            &EnergyInput {
                weight_kg: req.weight_kg,
                height_cm: req.height_cm,
                age_years: req.age,
                gender: req.gender,
                activity_level: req.activity_level,
                goal: req.goal,
            },
            formula,
            nutrition.min_daily_calories,
        )?;
        let bmi = calculate_bmi(req.weight_kg, req.height_cm);

        Ok(CalculationResponse {
            formula,
            bmr: targets.bmr.round(),
            tdee: targets.tdee.round(),
            activity_multiplier: targets.activity_multiplier,
            goal_adjustment: targets.goal_adjustment,
            daily_calories: targets.daily_calories.round(),
            bmi: round1(bmi),
            bmi_category: classify_bmi(bmi),
            unit: "kcal/day".to_string(),
        })
    }

    /// Energy targets for a profile's current body data
    pub fn targets_for(
        profile: &UserProfile,
        nutrition: &NutritionConfig,
    ) -> Result<EnergyTargets, ApiError> {
        let targets = calculate_energy_targets(
            &EnergyInput {
                weight_kg: profile.weight_kg,
                height_cm: profile.height_cm,
                age_years: profile.age,
                gender: profile.gender,
                activity_level: profile.activity_level,
                goal: profile.goal,
            },
            nutrition.bmr_formula,
            nutrition.min_daily_calories,
        )?;
        Ok(targets)
    }

    fn apply_targets(profile: &mut UserProfile, nutrition: &NutritionConfig) -> Result<(), ApiError> {
        let targets = Self::targets_for(profile, nutrition)?;
        profile.bmr = targets.bmr.round() as i32;
        profile.daily_calories = targets.daily_calories.round() as i32;
        Ok(())
    }
}
