//! Step tracking service
//!
//! Distance and calories are optional on input. Missing values are
//! estimated from the step count and, when the user has a profile, their
//! height and weight.

use super::clean_text;
use crate::error::ApiError;
use crate::store::DataStore;
use chrono::{DateTime, Utc};
use diet_tracker_shared::health_metrics::{estimate_distance_km, estimate_step_calories, round1};
use diet_tracker_shared::types::{CreateStepRequest, UpdateStepRequest};
use diet_tracker_shared::validation::{validate_not_future, validate_time_window};
use diet_tracker_shared::{RecordFilter, StepSession, UserProfile};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Step service for business logic
pub struct StepService;

impl StepService {
    pub async fn list(
        store: &dyn DataStore,
        user_id: i64,
        filter: &RecordFilter,
    ) -> Result<Vec<StepSession>, ApiError> {
        store
            .list_steps(user_id, filter)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn get(store: &dyn DataStore, user_id: i64, id: Uuid) -> Result<StepSession, ApiError> {
        store
            .get_steps(user_id, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Step session not found".to_string()))
    }

    pub async fn create(
        store: &dyn DataStore,
        user_id: i64,
        req: CreateStepRequest,
    ) -> Result<StepSession, ApiError> {
        req.validate()?;

        let now = Utc::now();
        Self::check_window(req.start_time, req.end_time, now)?;

        let needs_profile = req.distance_km.is_none() || req.calories_burned.is_none();
        let profile = Self::owner_profile(store, user_id, needs_profile).await?;
        let (distance_km, calories_burned) =
            Self::fill_estimates(req.steps, req.distance_km, req.calories_burned, profile.as_ref());

        let session = StepSession {
            id: Uuid::new_v4(),
            user_id,
            start_time: req.start_time,
            end_time: req.end_time,
            steps: req.steps,
            distance_km,
            calories_burned,
            notes: clean_text(req.notes),
            created_at: now,
            updated_at: now,
        };

        let saved = store
            .insert_steps(&session)
            .await
            .map_err(ApiError::store)?;

        info!(user_id, session_id = %saved.id, steps = saved.steps, "Step session logged");
        Ok(saved)
    }

    /// Update a session. A new step count without new distance or calories
    /// re-estimates them.
    pub async fn update(
        store: &dyn DataStore,
        user_id: i64,
        id: Uuid,
        req: UpdateStepRequest,
    ) -> Result<StepSession, ApiError> {
        req.validate()?;

        let mut session = Self::get(store, user_id, id).await?;

        if let Some(start) = req.start_time {
            session.start_time = start;
        }
        if let Some(end) = req.end_time {
            session.end_time = Some(end);
        }
        if req.notes.is_some() {
            session.notes = clean_text(req.notes);
        }

        match req.steps {
            Some(steps) => {
                let needs_profile = req.distance_km.is_none() || req.calories_burned.is_none();
                let profile = Self::owner_profile(store, user_id, needs_profile).await?;
                let (distance, calories) = Self::fill_estimates(
                    steps,
                    req.distance_km,
                    req.calories_burned,
                    profile.as_ref(),
                );
                session.steps = steps;
                session.distance_km = distance;
                session.calories_burned = calories;
            }
            None => {
                if let Some(distance) = req.distance_km {
                    session.distance_km = distance;
                }
                if let Some(calories) = req.calories_burned {
                    session.calories_burned = calories;
                }
            }
        }

        let now = Utc::now();
        Self::check_window(session.start_time, session.end_time, now)?;
        session.updated_at = now;

        store
            .update_steps(&session)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Step session not found".to_string()))
    }

    pub async fn delete(store: &dyn DataStore, user_id: i64, id: Uuid) -> Result<(), ApiError> {
        let deleted = store
            .delete_steps(user_id, id)
            .await
            .map_err(ApiError::Internal)?;

        if deleted {
            Ok(())
        } else {
            Err(ApiError::NotFound("Step session not found".to_string()))
        }
    }

    /// Fill in distance and calories the client did not send
    pub fn fill_estimates(
        steps: i32,
        distance_km: Option<f64>,
        calories_burned: Option<f64>,
        profile: Option<&UserProfile>,
    ) -> (f64, f64) {
        let distance = distance_km.unwrap_or_else(|| {
            let km = estimate_distance_km(steps, profile.map(|p| p.height_cm));
            (km * 100.0).round() / 100.0
        });
        let calories = calories_burned.unwrap_or_else(|| {
            round1(estimate_step_calories(steps, profile.map(|p| p.weight_kg)))
        });
        (distance, calories)
    }

    async fn owner_profile(
        store: &dyn DataStore,
        user_id: i64,
        needed: bool,
    ) -> Result<Option<UserProfile>, ApiError> {
        if !needed {
            return Ok(None);
        }
        store
            .get_profile(user_id)
            .await
            .map_err(ApiError::Internal)
    }

    fn check_window(
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        validate_not_future(start, now).map_err(|m| ApiError::field("start_time", m))?;
        validate_time_window(start, end).map_err(|m| ApiError::field("end_time", m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NutritionConfig;
    use crate::services::ProfileService;
    use chrono::Duration;
    use diet_tracker_shared::types::CreateProfileRequest;
    use diet_tracker_shared::{ActivityLevel, Gender, Goal};
    use rstest::rstest;

    fn walk(steps: i32) -> CreateStepRequest {
        let start = Utc::now() - Duration::hours(2);
        CreateStepRequest {
            start_time: start,
            end_time: Some(start + Duration::minutes(45)),
            steps,
            distance_km: None,
            calories_burned: None,
            notes: None,
        }
    }

    #[rstest]
    #[case(10_000, None, 7.62, 350.0)]
    #[case(10_000, Some((200.0, 100.0)), 8.3, 500.0)]
    #[case(0, None, 0.0, 0.0)]
    fn test_fill_estimates(
        #[case] steps: i32,
        #[case] body: Option<(f64, f64)>,
        #[case] distance: f64,
        #[case] calories: f64,
    ) {
        let profile = body.map(|(height_cm, weight_kg)| UserProfile {
            telegram_id: 1,
            username: None,
            first_name: None,
            last_name: None,
            age: 30,
            gender: Gender::Male,
            weight_kg,
            height_cm,
            activity_level: ActivityLevel::Light,
            goal: Goal::Maintain,
            target_weight_kg: None,
            bmr: 0,
            daily_calories: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        let (d, c) = StepService::fill_estimates(steps, None, None, profile.as_ref());
        assert!((d - distance).abs() < 1e-9, "distance {} != {}", d, distance);
        assert!((c - calories).abs() < 1e-9, "calories {} != {}", c, calories);
    }

    #[test]
    fn test_supplied_values_win() {
        let (d, c) = StepService::fill_estimates(5000, Some(4.2), Some(180.0), None);
        assert_eq!((d, c), (4.2, 180.0));
    }

    #[tokio::test]
    async fn test_create_uses_profile_body_data() {
        let store = crate::store::MemoryStore::new();
        ProfileService::create(
            &store,
            &NutritionConfig::default(),
            CreateProfileRequest {
                telegram_id: 5,
                username: None,
                first_name: None,
                last_name: None,
                age: 40,
                gender: Gender::Female,
                weight_kg: 100.0,
                height_cm: 200.0,
                activity_level: ActivityLevel::Light,
                goal: Goal::Maintain,
                target_weight_kg: None,
            },
        )
        .await
        .unwrap();

        let session = StepService::create(&store, 5, walk(10_000)).await.unwrap();
        assert_eq!(session.distance_km, 8.3);
        assert_eq!(session.calories_burned, 500.0);

        let anonymous = StepService::create(&store, 6, walk(10_000)).await.unwrap();
        assert_eq!(anonymous.distance_km, 7.62);
        assert_eq!(anonymous.calories_burned, 350.0);
    }

    #[tokio::test]
    async fn test_update_steps_re_estimates() {
        let store = crate::store::MemoryStore::new();
        let session = StepService::create(&store, 1, walk(1000)).await.unwrap();

        let updated = StepService::update(
            &store,
            1,
            session.id,
            UpdateStepRequest {
                steps: Some(2000),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.steps, 2000);
        assert_eq!(updated.calories_burned, 70.0);
    }

    #[tokio::test]
    async fn test_rejects_too_many_steps() {
        let store = crate::store::MemoryStore::new();
        assert!(matches!(
            StepService::create(&store, 1, walk(250_000)).await,
            Err(ApiError::Validation { .. })
        ));
    }
}
