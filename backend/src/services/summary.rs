//! Daily summary aggregation

use crate::error::ApiError;
use crate::store::DataStore;
use chrono::{Duration, NaiveDate};
use diet_tracker_shared::health_metrics::round1;
use diet_tracker_shared::types::{day_bounds, DailySummary, NutritionTotals, MAX_LIST_LIMIT};
use diet_tracker_shared::{DateOutOfRange, MealEntry, RecordFilter, SleepSession, StepSession};

pub struct SummaryService;

impl SummaryService {
    /// Aggregate one UTC day of meals, steps and sleep for a user
    pub async fn daily(
        store: &dyn DataStore,
        user_id: i64,
        date: NaiveDate,
        step_goal: i64,
    ) -> Result<DailySummary, ApiError> {
        let day = RecordFilter::for_day(date, MAX_LIST_LIMIT)?;
        let (day_start, day_end) = day_bounds(date)?;
        let night_start = day_start
            .checked_sub_signed(Duration::hours(24))
            .ok_or(DateOutOfRange(date))?;

        let profile = store
            .get_profile(user_id)
            .await
            .map_err(ApiError::Internal)?;
        let meals = store
            .list_meals(user_id, &day)
            .await
            .map_err(ApiError::Internal)?;
        let steps = store
            .list_steps(user_id, &day)
            .await
            .map_err(ApiError::Internal)?;

        // Sessions are indexed by start time; a night that ends today started yesterday
        let sleep_window = RecordFilter {
            from: Some(night_start),
            to: Some(day_end),
            limit: MAX_LIST_LIMIT,
        };
        let sleep = store
            .list_sleep(user_id, &sleep_window)
            .await
            .map_err(ApiError::Internal)?;

        let consumed = Self::nutrition_totals(&meals);
        let calorie_target = profile.as_ref().map(|p| p.daily_calories);
        let (total_steps, steps_calories) = Self::step_totals(&steps);
        let (sleep_minutes, sleep_sessions) = Self::sleep_totals(&sleep, &day);

        Ok(DailySummary {
            telegram_id: user_id,
            date,
            meals_count: meals.len(),
            calories_remaining: calorie_target
                .map(|target| round1(f64::from(target) - consumed.calories)),
            consumed,
            calorie_target,
            steps: total_steps,
            step_goal,
            step_goal_percent: Self::goal_percent(total_steps, step_goal),
            steps_calories_burned: round1(steps_calories),
            sleep_minutes,
            sleep_sessions,
        })
    }

    pub fn nutrition_totals(meals: &[MealEntry]) -> NutritionTotals {
        let totals = meals.iter().fold(NutritionTotals::default(), |mut acc, meal| {
            acc.calories += meal.calories;
            acc.protein_g += meal.protein_g.unwrap_or(0.0);
            acc.carbs_g += meal.carbs_g.unwrap_or(0.0);
            acc.fat_g += meal.fat_g.unwrap_or(0.0);
            acc
        });

        NutritionTotals {
            calories: round1(totals.calories),
            protein_g: round1(totals.protein_g),
            carbs_g: round1(totals.carbs_g),
            fat_g: round1(totals.fat_g),
        }
    }

    fn step_totals(sessions: &[StepSession]) -> (i64, f64) {
        sessions.iter().fold((0, 0.0), |(steps, calories), s| {
            (steps + i64::from(s.steps), calories + s.calories_burned)
        })
    }

    /// Completed sessions whose end falls inside `day`
    fn sleep_totals(sessions: &[SleepSession], day: &RecordFilter) -> (i64, usize) {
        sessions
            .iter()
            .filter(|s| s.end_time.is_some_and(|end| day.contains(end)))
            .fold((0, 0), |(minutes, count), s| {
                (minutes + i64::from(s.duration_minutes.unwrap_or(0)), count + 1)
            })
    }

    fn goal_percent(steps: i64, goal: i64) -> f64 {
        if goal <= 0 {
            return 0.0;
        }
        round1(steps as f64 * 100.0 / goal as f64)
    }
}
