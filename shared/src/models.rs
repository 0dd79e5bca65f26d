//! Data models for the diet tracker
//!
//! Records are mirrored 1:1 between the JSON API, Postgres rows and
//! Supabase REST rows. Ownership is a plain `user_id == telegram_id` match.

use crate::errors::ParseEnumError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Enums
// ============================================================================

/// Gender used by the BMR formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: &'static [&'static str] = &["male", "female"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(ParseEnumError::new("gender", s, Self::ALL)),
        }
    }
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    #[default]
    #[serde(alias = "lightly_active")]
    Light,
    /// Moderate exercise 3-5 days/week
    #[serde(alias = "moderately_active")]
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Very hard exercise or a physical job
    #[serde(alias = "extra_active")]
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: &'static [&'static str] =
        &["sedentary", "light", "moderate", "active", "very_active"];

    /// Multiplier applied to BMR to get TDEE
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::Light => "Light exercise 1-3 days/week",
            ActivityLevel::Moderate => "Moderate exercise 3-5 days/week",
            ActivityLevel::Active => "Hard exercise 6-7 days/week",
            ActivityLevel::VeryActive => "Very hard exercise or physical job",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" | "lightly_active" => Ok(ActivityLevel::Light),
            "moderate" | "moderately_active" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very_active" | "extra_active" => Ok(ActivityLevel::VeryActive),
            _ => Err(ParseEnumError::new("activity level", s, Self::ALL)),
        }
    }
}

/// Weight goal, drives the daily calorie adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[serde(alias = "lose")]
    LoseWeight,
    #[default]
    Maintain,
    #[serde(alias = "gain")]
    GainWeight,
}

impl Goal {
    pub const ALL: &'static [&'static str] = &["lose_weight", "maintain", "gain_weight"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "lose_weight",
            Goal::Maintain => "maintain",
            Goal::GainWeight => "gain_weight",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "Lose weight",
            Goal::Maintain => "Maintain weight",
            Goal::GainWeight => "Gain weight",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lose_weight" | "lose" => Ok(Goal::LoseWeight),
            "maintain" => Ok(Goal::Maintain),
            "gain_weight" | "gain" => Ok(Goal::GainWeight),
            _ => Err(ParseEnumError::new("goal", s, Self::ALL)),
        }
    }
}

/// Meal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: &'static [&'static str] = &["breakfast", "lunch", "dinner", "snack"];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            _ => Err(ParseEnumError::new("meal type", s, Self::ALL)),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// User profile keyed by Telegram user id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub telegram_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub age: i32,
    pub gender: Gender,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    #[serde(default)]
    pub target_weight_kg: Option<f64>,
    /// Basal metabolic rate, kcal/day
    pub bmr: i32,
    /// Calorie target after activity and goal adjustment, kcal/day
    pub daily_calories: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Name used when addressing the user in bot messages
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("there")
    }
}

/// A night (or nap) of sleep. `end_time` is unset while the session is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSession {
    pub id: Uuid,
    pub user_id: i64,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    /// Subjective quality, 1-5
    #[serde(default)]
    pub quality: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SleepSession {
    pub fn is_complete(&self) -> bool {
        self.end_time.is_some()
    }
}

/// A walking session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSession {
    pub id: Uuid,
    pub user_id: i64,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub steps: i32,
    pub distance_km: f64,
    pub calories_burned: f64,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A logged meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: Uuid,
    pub user_id: i64,
    pub meal_type: MealType,
    pub food_name: String,
    pub calories: f64,
    #[serde(default)]
    pub protein_g: Option<f64>,
    #[serde(default)]
    pub carbs_g: Option<f64>,
    #[serde(default)]
    pub fat_g: Option<f64>,
    #[serde(default)]
    pub portion_grams: Option<f64>,
    pub eaten_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_level_aliases() {
        let level: ActivityLevel = serde_json::from_str("\"lightly_active\"").unwrap();
        assert_eq!(level, ActivityLevel::Light);
        let level: ActivityLevel = serde_json::from_str("\"extra_active\"").unwrap();
        assert_eq!(level, ActivityLevel::VeryActive);
        assert_eq!(
            serde_json::to_string(&ActivityLevel::VeryActive).unwrap(),
            "\"very_active\""
        );
    }

    #[test]
    fn test_goal_aliases() {
        let goal: Goal = serde_json::from_str("\"lose\"").unwrap();
        assert_eq!(goal, Goal::LoseWeight);
        assert_eq!("gain".parse::<Goal>().unwrap(), Goal::GainWeight);
    }

    #[test]
    fn test_enum_text_roundtrip() {
        for s in ActivityLevel::ALL {
            assert_eq!(s.parse::<ActivityLevel>().unwrap().as_str(), *s);
        }
        for s in MealType::ALL {
            assert_eq!(s.parse::<MealType>().unwrap().to_string(), *s);
        }
        for s in Gender::ALL {
            assert_eq!(s.parse::<Gender>().unwrap().as_str(), *s);
        }
    }

    #[test]
    fn test_invalid_enum_text() {
        let err = "brunch".parse::<MealType>().unwrap_err();
        assert!(err.to_string().contains("breakfast, lunch, dinner, snack"));
        assert!("other".parse::<Gender>().is_err());
    }

    #[test]
    fn test_multipliers_span() {
        assert_eq!(ActivityLevel::Sedentary.multiplier(), 1.2);
        assert_eq!(ActivityLevel::VeryActive.multiplier(), 1.9);
    }
}
