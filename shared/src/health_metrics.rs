//! Energy and body metric calculations
//!
//! BMR, TDEE and calorie targets for the profile, BMI for the calculator,
//! and rough distance/energy estimates for step sessions. All functions are
//! pure and take SI units (kg, cm, years).

use crate::errors::{MetricsError, ParseEnumError};
use crate::models::{ActivityLevel, Gender, Goal};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Calorie change applied for a lose/gain goal, kcal/day
pub const GOAL_CALORIE_DELTA: f64 = 500.0;

/// Lower bound for the recommended daily intake, kcal/day
pub const DEFAULT_MIN_DAILY_CALORIES: f64 = 1200.0;

/// Stride used when the user's height is unknown, cm
pub const DEFAULT_STRIDE_CM: f64 = 76.2;

/// Body weight used for step energy when the user's weight is unknown, kg
pub const DEFAULT_BODY_WEIGHT_KG: f64 = 70.0;

// ============================================================================
// BMR and TDEE
// ============================================================================

/// BMR equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BmrFormula {
    /// Revised Harris-Benedict (Roza & Shizgal, 1984)
    #[default]
    HarrisBenedict,
    /// Mifflin-St Jeor (1990)
    MifflinStJeor,
}

impl FromStr for BmrFormula {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "harris_benedict" => Ok(BmrFormula::HarrisBenedict),
            "mifflin_st_jeor" | "mifflin" => Ok(BmrFormula::MifflinStJeor),
            _ => Err(ParseEnumError::new(
                "formula",
                s,
                &["harris_benedict", "mifflin_st_jeor"],
            )),
        }
    }
}

/// Calculate BMR using the revised Harris-Benedict equation
///
/// Men: BMR = 88.362 + 13.397 × weight(kg) + 4.799 × height(cm) - 5.677 × age(y)
/// Women: BMR = 447.593 + 9.247 × weight(kg) + 3.098 × height(cm) - 4.330 × age(y)
pub fn calculate_bmr_harris_benedict(weight_kg: f64, height_cm: f64, age_years: i32, gender: Gender) -> f64 {
    match gender {
        Gender::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age_years as f64,
        Gender::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age_years as f64,
    }
}

/// Calculate BMR using the Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn calculate_bmr_mifflin(weight_kg: f64, height_cm: f64, age_years: i32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Calculate BMR with the given formula
pub fn calculate_bmr(
    weight_kg: f64,
    height_cm: f64,
    age_years: i32,
    gender: Gender,
    formula: BmrFormula,
) -> f64 {
    match formula {
        BmrFormula::HarrisBenedict => calculate_bmr_harris_benedict(weight_kg, height_cm, age_years, gender),
        BmrFormula::MifflinStJeor => calculate_bmr_mifflin(weight_kg, height_cm, age_years, gender),
    }
}

/// TDEE = BMR × activity multiplier
pub fn calculate_tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}

/// Daily calorie change for a goal
pub fn goal_calorie_adjustment(goal: Goal) -> f64 {
    match goal {
        Goal::LoseWeight => -GOAL_CALORIE_DELTA,
        Goal::Maintain => 0.0,
        Goal::GainWeight => GOAL_CALORIE_DELTA,
    }
}

/// Inputs for the energy target calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyInput {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: i32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

/// Energy targets for a profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyTargets {
    pub bmr: f64,
    pub tdee: f64,
    pub activity_multiplier: f64,
    pub goal_adjustment: f64,
    /// Recommended intake, never below the configured floor
    pub daily_calories: f64,
}

/// Calculate BMR, TDEE and the goal-adjusted calorie target
pub fn calculate_energy_targets(
    input: &EnergyInput,
    formula: BmrFormula,
    min_daily_calories: f64,
) -> Result<EnergyTargets, MetricsError> {
    if !input.weight_kg.is_finite() || input.weight_kg <= 0.0 {
        return Err(MetricsError::InvalidWeight(input.weight_kg));
    }
    if !input.height_cm.is_finite() || input.height_cm <= 0.0 {
        return Err(MetricsError::InvalidHeight(input.height_cm));
    }
    if input.age_years <= 0 {
        return Err(MetricsError::InvalidAge(input.age_years));
    }

    let bmr = calculate_bmr(
        input.weight_kg,
        input.height_cm,
        input.age_years,
        input.gender,
        formula,
    );
    let tdee = calculate_tdee(bmr, input.activity_level);
    let goal_adjustment = goal_calorie_adjustment(input.goal);

    Ok(EnergyTargets {
        bmr,
        tdee,
        activity_multiplier: input.activity_level.multiplier(),
        goal_adjustment,
        daily_calories: (tdee + goal_adjustment).max(min_daily_calories),
    })
}

// ============================================================================
// BMI
// ============================================================================

/// BMI category (WHO)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

// ============================================================================
// Step estimates
// ============================================================================

/// Estimate walked distance. Stride is ~41.5% of height.
pub fn estimate_distance_km(steps: i32, height_cm: Option<f64>) -> f64 {
    let stride_cm = height_cm
        .filter(|h| h.is_finite() && *h > 0.0)
        .map(|h| h * 0.415)
        .unwrap_or(DEFAULT_STRIDE_CM);
    steps.max(0) as f64 * stride_cm / 100_000.0
}

/// Estimate energy spent walking, ~0.5 kcal per kg per 1000 steps
pub fn estimate_step_calories(steps: i32, weight_kg: Option<f64>) -> f64 {
    let weight = weight_kg
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(DEFAULT_BODY_WEIGHT_KG);
    steps.max(0) as f64 * weight * 0.0005
}

/// Round to one decimal place for display and storage
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_parse_formula() {
        assert_eq!("mifflin-st-jeor".parse::<BmrFormula>().unwrap(), BmrFormula::MifflinStJeor);
        assert_eq!(" Harris_Benedict ".parse::<BmrFormula>().unwrap(), BmrFormula::HarrisBenedict);
        assert!("katch".parse::<BmrFormula>().is_err());
    }

    // =========================================================================
    // BMR Tests
    // =========================================================================

    #[rstest]
    #[case(Gender::Male, 80.0, 180.0, 30, 88.362 + 13.397 * 80.0 + 4.799 * 180.0 - 5.677 * 30.0)]
    #[case(Gender::Female, 60.0, 165.0, 30, 447.593 + 9.247 * 60.0 + 3.098 * 165.0 - 4.33 * 30.0)]
    fn test_harris_benedict_formula(
        #[case] gender: Gender,
        #[case] weight: f64,
        #[case] height: f64,
        #[case] age: i32,
        #[case] expected: f64,
    ) {
        let bmr = calculate_bmr_harris_benedict(weight, height, age, gender);
        assert!((bmr - expected).abs() < 1e-9);
    }

    #[test]
    fn test_harris_benedict_known_values() {
        // 80kg, 180cm, 30yo male -> 1853.632
        let bmr = calculate_bmr_harris_benedict(80.0, 180.0, 30, Gender::Male);
        assert!((bmr - 1853.632).abs() < 0.001);

        // 60kg, 165cm, 30yo female -> 1383.683
        let bmr = calculate_bmr_harris_benedict(60.0, 165.0, 30, Gender::Female);
        assert!((bmr - 1383.683).abs() < 0.001);
    }

    #[test]
    fn test_bmr_mifflin() {
        // 80kg, 180cm, 30yo male -> 1780
        let bmr = calculate_bmr_mifflin(80.0, 180.0, 30, Gender::Male);
        assert!((bmr - 1780.0).abs() < 1e-9);

        // 60kg, 165cm, 30yo female -> 1320.25
        let bmr = calculate_bmr_mifflin(60.0, 165.0, 30, Gender::Female);
        assert!((bmr - 1320.25).abs() < 1e-9);
    }

    #[test]
    fn test_formula_dispatch() {
        let hb = calculate_bmr(70.0, 175.0, 25, Gender::Male, BmrFormula::HarrisBenedict);
        let ms = calculate_bmr(70.0, 175.0, 25, Gender::Male, BmrFormula::MifflinStJeor);
        assert_eq!(hb, calculate_bmr_harris_benedict(70.0, 175.0, 25, Gender::Male));
        assert_eq!(ms, calculate_bmr_mifflin(70.0, 175.0, 25, Gender::Male));
    }

    // =========================================================================
    // TDEE / Targets Tests
    // =========================================================================

    #[rstest]
    #[case(ActivityLevel::Sedentary, 1.2)]
    #[case(ActivityLevel::Light, 1.375)]
    #[case(ActivityLevel::Moderate, 1.55)]
    #[case(ActivityLevel::Active, 1.725)]
    #[case(ActivityLevel::VeryActive, 1.9)]
    fn test_tdee_multiplier(#[case] level: ActivityLevel, #[case] multiplier: f64) {
        assert!((calculate_tdee(1500.0, level) - 1500.0 * multiplier).abs() < 1e-9);
    }

    fn input(goal: Goal) -> EnergyInput {
        EnergyInput {
            weight_kg: 80.0,
            height_cm: 180.0,
            age_years: 30,
            gender: Gender::Male,
            activity_level: ActivityLevel::Moderate,
            goal,
        }
    }

    #[test]
    fn test_energy_targets_by_goal() {
        let maintain = calculate_energy_targets(&input(Goal::Maintain), BmrFormula::HarrisBenedict, 1200.0).unwrap();
        let lose = calculate_energy_targets(&input(Goal::LoseWeight), BmrFormula::HarrisBenedict, 1200.0).unwrap();
        let gain = calculate_energy_targets(&input(Goal::GainWeight), BmrFormula::HarrisBenedict, 1200.0).unwrap();

        assert!((maintain.tdee - 1853.632 * 1.55).abs() < 0.001);
        assert_eq!(maintain.daily_calories, maintain.tdee);
        assert_eq!(lose.daily_calories, maintain.tdee - 500.0);
        assert_eq!(gain.daily_calories, maintain.tdee + 500.0);
    }

    #[test]
    fn test_energy_targets_floor() {
        let small = EnergyInput {
            weight_kg: 40.0,
            height_cm: 145.0,
            age_years: 80,
            gender: Gender::Female,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::LoseWeight,
        };
        let targets = calculate_energy_targets(&small, BmrFormula::MifflinStJeor, 1200.0).unwrap();
        assert_eq!(targets.daily_calories, 1200.0);
    }

    #[test]
    fn test_energy_targets_reject_invalid() {
        let mut bad = input(Goal::Maintain);
        bad.weight_kg = 0.0;
        assert_eq!(
            calculate_energy_targets(&bad, BmrFormula::HarrisBenedict, 1200.0),
            Err(MetricsError::InvalidWeight(0.0))
        );

        let mut bad = input(Goal::Maintain);
        bad.height_cm = f64::NAN;
        assert!(calculate_energy_targets(&bad, BmrFormula::HarrisBenedict, 1200.0).is_err());

        let mut bad = input(Goal::Maintain);
        bad.age_years = 0;
        assert_eq!(
            calculate_energy_targets(&bad, BmrFormula::HarrisBenedict, 1200.0),
            Err(MetricsError::InvalidAge(0))
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: BMR is positive across adult ranges for both formulas
        #[test]
        fn prop_bmr_positive(
            weight in 40.0f64..150.0,
            height in 140.0f64..210.0,
            age in 18i32..80
        ) {
            for gender in [Gender::Male, Gender::Female] {
                prop_assert!(calculate_bmr_harris_benedict(weight, height, age, gender) > 0.0);
                prop_assert!(calculate_bmr_mifflin(weight, height, age, gender) > 0.0);
            }
        }

        /// Property: TDEE > BMR (every multiplier is > 1)
        #[test]
        fn prop_tdee_greater_than_bmr(
            weight in 40.0f64..150.0,
            height in 140.0f64..210.0,
            age in 18i32..80
        ) {
            let targets = calculate_energy_targets(
                &EnergyInput {
                    weight_kg: weight,
                    height_cm: height,
                    age_years: age,
                    gender: Gender::Female,
                    activity_level: ActivityLevel::Sedentary,
                    goal: Goal::Maintain,
                },
                BmrFormula::HarrisBenedict,
                0.0,
            ).unwrap();
            prop_assert!(targets.tdee > targets.bmr);
        }

        /// Property: the daily target never drops below the floor
        #[test]
        fn prop_daily_calories_respect_floor(
            weight in 20.0f64..500.0,
            height in 50.0f64..300.0,
            age in 10i32..120,
            floor in 800.0f64..2000.0
        ) {
            let targets = calculate_energy_targets(
                &EnergyInput {
                    weight_kg: weight,
                    height_cm: height,
                    age_years: age,
                    gender: Gender::Male,
                    activity_level: ActivityLevel::Sedentary,
                    goal: Goal::LoseWeight,
                },
                BmrFormula::MifflinStJeor,
                floor,
            ).unwrap();
            prop_assert!(targets.daily_calories >= floor);
        }
    }

    // =========================================================================
    // BMI Tests
    // =========================================================================

    #[test]
    fn test_bmi_calculation() {
        // 70kg, 175cm -> BMI ~22.86
        let bmi = calculate_bmi(70.0, 175.0);
        assert!((bmi - 22.86).abs() < 0.01);
        assert_eq!(classify_bmi(bmi), BmiCategory::Normal);
    }

    #[rstest]
    #[case(17.0, BmiCategory::Underweight)]
    #[case(18.5, BmiCategory::Normal)]
    #[case(27.0, BmiCategory::Overweight)]
    #[case(30.0, BmiCategory::Obese)]
    fn test_bmi_categories(#[case] bmi: f64, #[case] expected: BmiCategory) {
        assert_eq!(classify_bmi(bmi), expected);
    }

    // =========================================================================
    // Step Estimate Tests
    // =========================================================================

    #[test]
    fn test_distance_estimate() {
        // 10k steps at the default stride -> 7.62 km
        assert!((estimate_distance_km(10_000, None) - 7.62).abs() < 1e-9);
        // 180cm -> 74.7cm stride -> 7.47 km
        assert!((estimate_distance_km(10_000, Some(180.0)) - 7.47).abs() < 1e-9);
        assert_eq!(estimate_distance_km(-5, None), 0.0);
    }

    #[test]
    fn test_step_calories_estimate() {
        // 10k steps at 70kg -> 350 kcal
        assert!((estimate_step_calories(10_000, None) - 350.0).abs() < 1e-9);
        assert!((estimate_step_calories(10_000, Some(90.0)) - 450.0).abs() < 1e-9);
        assert!((estimate_step_calories(1_000, Some(f64::NAN)) - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(7.4712), 7.5);
        assert_eq!(round1(350.04), 350.0);
    }
}
