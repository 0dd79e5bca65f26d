//! Diet Tracker WASM Module
//!
//! Exposes the shared BMR/TDEE/BMI calculations to the Mini App so the
//! profile form can preview calorie targets without a round trip.

use diet_tracker_shared::health_metrics::{
    self, calculate_energy_targets, classify_bmi, round1, BmrFormula, EnergyInput,
    DEFAULT_MIN_DAILY_CALORIES,
};
use diet_tracker_shared::{ActivityLevel, Gender, Goal};
use wasm_bindgen::prelude::*;

/// Calculate BMR in kcal/day. `formula` is `harris_benedict` or `mifflin_st_jeor`.
#[wasm_bindgen]
pub fn calculate_bmr(
    weight_kg: f64,
    height_cm: f64,
    age_years: i32,
    gender: &str,
    formula: &str,
) -> Result<f64, JsError> {
    bmr(weight_kg, height_cm, age_years, gender, formula).map_err(|e| JsError::new(&e))
}

/// Energy targets as JSON:
/// `{bmr, tdee, activity_multiplier, goal_adjustment, daily_calories}`
#[wasm_bindgen]
pub fn calculate_targets(
    weight_kg: f64,
    height_cm: f64,
    age_years: i32,
    gender: &str,
    activity_level: &str,
    goal: &str,
    formula: &str,
) -> Result<String, JsError> {
    targets_json(weight_kg, height_cm, age_years, gender, activity_level, goal, formula)
        .map_err(|e| JsError::new(&e))
}

/// BMI rounded to one decimal; 0 for a non-positive height
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if height_cm <= 0.0 {
        return 0.0;
    }
    round1(health_metrics::calculate_bmi(weight_kg, height_cm))
}

/// WHO category for a BMI value, e.g. `normal`
#[wasm_bindgen]
pub fn bmi_category(bmi: f64) -> String {
    serde_json::to_value(classify_bmi(bmi))
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Distance in km the Mini App shows before the session is saved
#[wasm_bindgen]
pub fn estimate_distance_km(steps: i32, height_cm: Option<f64>) -> f64 {
    health_metrics::estimate_distance_km(steps, height_cm)
}

#[wasm_bindgen]
pub fn estimate_step_calories(steps: i32, weight_kg: Option<f64>) -> f64 {
    round1(health_metrics::estimate_step_calories(steps, weight_kg))
}

fn bmr(
    weight_kg: f64,
    height_cm: f64,
    age_years: i32,
    gender: &str,
    formula: &str,
) -> Result<f64, String> {
    let gender = gender.parse::<Gender>().map_err(|e| e.to_string())?;
    let formula = parse_formula(formula)?;
    Ok(health_metrics::calculate_bmr(weight_kg, height_cm, age_years, gender, formula))
}

fn targets_json(
    weight_kg: f64,
    height_cm: f64,
    age_years: i32,
    gender: &str,
    activity_level: &str,
    goal: &str,
    formula: &str,
) -> Result<String, String> {
    let input = EnergyInput {
        weight_kg,
        height_cm,
        age_years,
        gender: gender.parse::<Gender>().map_err(|e| e.to_string())?,
        activity_level: activity_level
            .parse::<ActivityLevel>()
            .map_err(|e| e.to_string())?,
        goal: goal.parse::<Goal>().map_err(|e| e.to_string())?,
    };
    let targets = calculate_energy_targets(&input, parse_formula(formula)?, DEFAULT_MIN_DAILY_CALORIES)
        .map_err(|e| e.to_string())?;
    serde_json::to_string(&targets).map_err(|e| e.to_string())
}

/// Empty selects the default formula
fn parse_formula(formula: &str) -> Result<BmrFormula, String> {
    if formula.trim().is_empty() {
        return Ok(BmrFormula::default());
    }
    formula.parse::<BmrFormula>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmr_formulas() {
        let hb = bmr(80.0, 180.0, 30, "male", "harris_benedict").unwrap();
        assert!((hb - 1853.632).abs() < 0.001);

        let mifflin = bmr(60.0, 165.0, 30, "female", "mifflin_st_jeor").unwrap();
        assert!((mifflin - 1320.25).abs() < 0.001);
    }

    #[test]
    fn test_bad_gender_is_reported() {
        let err = bmr(80.0, 180.0, 30, "robot", "").unwrap_err();
        assert!(err.contains("robot"));
    }

    #[test]
    fn test_targets_json() {
        let json = targets_json(80.0, 180.0, 30, "male", "sedentary", "lose_weight", "").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let daily = value["daily_calories"].as_f64().unwrap();
        assert!((daily - (1853.632 * 1.2 - 500.0)).abs() < 0.001);
    }

    #[test]
    fn test_bmi() {
        assert_eq!(calculate_bmi(70.0, 175.0), 22.9);
        assert_eq!(calculate_bmi(70.0, 0.0), 0.0);
        assert_eq!(bmi_category(22.9), "normal");
    }

    #[test]
    fn test_step_estimates() {
        assert!((estimate_distance_km(10_000, None) - 7.62).abs() < 1e-9);
        assert_eq!(estimate_step_calories(10_000, None), 350.0);
    }
}
