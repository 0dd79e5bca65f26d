//! API request and response types

use crate::errors::DateOutOfRange;
use crate::health_metrics::{BmiCategory, BmrFormula};
use crate::models::{ActivityLevel, Gender, Goal, MealType};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default page size for record lists
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Largest page size a client may ask for
pub const MAX_LIST_LIMIT: i64 = 500;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// List wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub count: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

/// Delete acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

// ============================================================================
// Record Queries
// ============================================================================

/// Query string accepted by the list endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordsQuery {
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
    /// Whole UTC day; overrides `from`/`to`
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Normalized list filter handed to the stores: `[from, to)`, newest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: i64,
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl RecordFilter {
    /// Filter covering one UTC calendar day
    pub fn for_day(date: NaiveDate, limit: i64) -> Result<Self, DateOutOfRange> {
        let (from, to) = day_bounds(date)?;
        Ok(Self {
            from: Some(from),
            to: Some(to),
            limit,
        })
    }

    /// Whether a timestamp falls inside the window
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| ts >= from) && self.to.map_or(true, |to| ts < to)
    }
}

impl RecordsQuery {
    pub fn normalize(&self) -> Result<RecordFilter, DateOutOfRange> {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);

        match self.date {
            Some(date) => RecordFilter::for_day(date, limit),
            None => Ok(RecordFilter {
                from: self.from,
                to: self.to,
                limit,
            }),
        }
    }
}

/// Start (inclusive) and end (exclusive) of a UTC day
pub fn day_bounds(date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), DateOutOfRange> {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = start
        .checked_add_signed(Duration::days(1))
        .ok_or(DateOutOfRange(date))?;
    Ok((start, end))
}

// ============================================================================
// Profile Types
// ============================================================================

/// Create or replace a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(range(min = 1, message = "must be a positive Telegram user id"))]
    pub telegram_id: i64,
    #[serde(default)]
    #[validate(length(max = 64, message = "must be at most 64 characters"))]
    pub username: Option<String>,
    #[serde(default)]
    #[validate(length(max = 128, message = "must be at most 128 characters"))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 128, message = "must be at most 128 characters"))]
    pub last_name: Option<String>,
    #[validate(range(min = 10, max = 120, message = "must be between 10 and 120 years"))]
    pub age: i32,
    pub gender: Gender,
    #[validate(range(min = 20.0, max = 500.0, message = "must be between 20 and 500 kg"))]
    pub weight_kg: f64,
    #[validate(range(min = 50.0, max = 300.0, message = "must be between 50 and 300 cm"))]
    pub height_cm: f64,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    #[validate(range(min = 20.0, max = 500.0, message = "must be between 20 and 500 kg"))]
    pub target_weight_kg: Option<f64>,
}

/// Partial profile update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    #[validate(length(max = 64, message = "must be at most 64 characters"))]
    pub username: Option<String>,
    #[serde(default)]
    #[validate(length(max = 128, message = "must be at most 128 characters"))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 128, message = "must be at most 128 characters"))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(range(min = 10, max = 120, message = "must be between 10 and 120 years"))]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    #[validate(range(min = 20.0, max = 500.0, message = "must be between 20 and 500 kg"))]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 50.0, max = 300.0, message = "must be between 50 and 300 cm"))]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub activity_level: Option<ActivityLevel>,
    #[serde(default)]
    pub goal: Option<Goal>,
    #[serde(default)]
    #[validate(range(min = 20.0, max = 500.0, message = "must be between 20 and 500 kg"))]
    pub target_weight_kg: Option<f64>,
}

/// Stateless calculator input
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CalculateRequest {
    #[validate(range(min = 10, max = 120, message = "must be between 10 and 120 years"))]
    pub age: i32,
    pub gender: Gender,
    #[validate(range(min = 20.0, max = 500.0, message = "must be between 20 and 500 kg"))]
    pub weight_kg: f64,
    #[validate(range(min = 50.0, max = 300.0, message = "must be between 50 and 300 cm"))]
    pub height_cm: f64,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goal: Goal,
    /// Overrides the server's configured formula
    #[serde(default)]
    pub formula: Option<BmrFormula>,
}

/// Calculator output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub formula: BmrFormula,
    pub bmr: f64,
    pub tdee: f64,
    pub activity_multiplier: f64,
    pub goal_adjustment: f64,
    pub daily_calories: f64,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub unit: String,
}

// ============================================================================
// Sleep Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSleepRequest {
    pub start_time: DateTime<Utc>,
    /// Leave unset to start an in-progress session
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub quality: Option<i32>,
    #[serde(default)]
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSleepRequest {
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub quality: Option<i32>,
    #[serde(default)]
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub notes: Option<String>,
}

// ============================================================================
// Step Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateStepRequest {
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[validate(range(min = 0, max = 200000, message = "must be between 0 and 200000"))]
    pub steps: i32,
    /// Estimated from steps and height when absent
    #[serde(default)]
    #[validate(range(min = 0.0, max = 300.0, message = "must be between 0 and 300 km"))]
    pub distance_km: Option<f64>,
    /// Estimated from steps and weight when absent
    #[serde(default)]
    #[validate(range(min = 0.0, max = 20000.0, message = "must be between 0 and 20000 kcal"))]
    pub calories_burned: Option<f64>,
    #[serde(default)]
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateStepRequest {
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(range(min = 0, max = 200000, message = "must be between 0 and 200000"))]
    pub steps: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 300.0, message = "must be between 0 and 300 km"))]
    pub distance_km: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 20000.0, message = "must be between 0 and 20000 kcal"))]
    pub calories_burned: Option<f64>,
    #[serde(default)]
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub notes: Option<String>,
}

// ============================================================================
// Meal Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMealRequest {
    pub meal_type: MealType,
    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub food_name: String,
    #[validate(range(min = 0.0, max = 10000.0, message = "must be between 0 and 10000 kcal"))]
    pub calories: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0, message = "must be between 0 and 1000 g"))]
    pub protein_g: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0, message = "must be between 0 and 1000 g"))]
    pub carbs_g: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0, message = "must be between 0 and 1000 g"))]
    pub fat_g: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5000.0, message = "must be between 0 and 5000 g"))]
    pub portion_grams: Option<f64>,
    /// Defaults to now
    #[serde(default)]
    pub eaten_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateMealRequest {
    #[serde(default)]
    pub meal_type: Option<MealType>,
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub food_name: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 10000.0, message = "must be between 0 and 10000 kcal"))]
    pub calories: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0, message = "must be between 0 and 1000 g"))]
    pub protein_g: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0, message = "must be between 0 and 1000 g"))]
    pub carbs_g: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1000.0, message = "must be between 0 and 1000 g"))]
    pub fat_g: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5000.0, message = "must be between 0 and 5000 g"))]
    pub portion_grams: Option<f64>,
    #[serde(default)]
    pub eaten_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub notes: Option<String>,
}

// ============================================================================
// Daily Summary
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryQuery {
    /// UTC day, defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Macro and calorie totals for a day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// What the user ate, walked and slept on one UTC day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub telegram_id: i64,
    pub date: NaiveDate,
    pub meals_count: usize,
    pub consumed: NutritionTotals,
    /// Calorie target from the profile, if one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_target: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_remaining: Option<f64>,
    pub steps: i64,
    pub step_goal: i64,
    pub step_goal_percent: f64,
    pub steps_calories_burned: f64,
    pub sleep_minutes: i64,
    pub sleep_sessions: usize,
}

// ============================================================================
// Notifications
// ============================================================================

/// Templated bot notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    MealReminder,
    SleepReminder,
    StepGoalReached,
    DailySummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendNotificationRequest {
    #[validate(range(min = 1, message = "must be a positive Telegram user id"))]
    pub telegram_id: i64,
    pub kind: NotificationKind,
    /// Only used by `meal_reminder`
    #[serde(default)]
    pub meal_type: Option<MealType>,
    /// Day for `daily_summary`, defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub sent: bool,
    pub message_id: i64,
}
