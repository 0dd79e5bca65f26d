//! Input validation
//!
//! Range and length rules live on the request types as `validator` derives.
//! This module holds the cross-field checks the derives cannot express and
//! turns `ValidationErrors` into user-facing field messages.

use chrono::{DateTime, Duration, Utc};
use validator::ValidationErrors;

/// Longest allowed sleep or step session
pub const MAX_SESSION_MINUTES: i64 = 24 * 60;

/// Clock skew tolerated for timestamps sent by the client
pub const MAX_FUTURE_SKEW_MINUTES: i64 = 5;

/// Validate a session window: end after start, at most 24 hours long
pub fn validate_time_window(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> Result<(), String> {
    let Some(end) = end else {
        return Ok(());
    };
    if end <= start {
        return Err("End time must be after start time".to_string());
    }
    if end - start > Duration::minutes(MAX_SESSION_MINUTES) {
        return Err("Session cannot exceed 24 hours".to_string());
    }
    Ok(())
}

/// Reject timestamps in the future (beyond a small clock skew)
pub fn validate_not_future(ts: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), String> {
    if ts > now + Duration::minutes(MAX_FUTURE_SKEW_MINUTES) {
        return Err("Time cannot be in the future".to_string());
    }
    Ok(())
}

/// Reject empty or whitespace-only text
pub fn validate_not_blank(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("Cannot be empty".to_string());
    }
    Ok(())
}

/// Minutes between two instants, rounded down
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i32 {
    (end - start).num_minutes() as i32
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "telegram_id" => "Telegram ID",
        "first_name" => "First Name",
        "last_name" => "Last Name",
        "username" => "Username",
        "age" => "Age",
        "weight_kg" => "Weight",
        "height_cm" => "Height",
        "target_weight_kg" => "Target Weight",
        "activity_level" => "Activity Level",
        "goal" => "Goal",
        "start_time" => "Start Time",
        "end_time" => "End Time",
        "quality" => "Sleep Quality",
        "steps" => "Steps",
        "distance_km" => "Distance",
        "calories_burned" => "Calories Burned",
        "food_name" => "Food",
        "calories" => "Calories",
        "protein_g" => "Protein",
        "carbs_g" => "Carbohydrates",
        "fat_g" => "Fat",
        "portion_grams" => "Portion",
        "eaten_at" => "Meal Time",
        "notes" => "Notes",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

/// Flatten derive errors into field messages, sorted by field name
pub fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut collected: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter()
                .map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' check", e.code));
                    FieldError::new(&field, &message)
                })
                .collect::<Vec<_>>()
        })
        .collect();
    collected.sort_by(|a, b| a.field.cmp(&b.field));
    collected
}
