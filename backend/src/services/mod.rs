//! Business logic services
//!
//! Services are stateless: every call takes the store (and the config
//! slice it needs) explicitly.

pub mod meals;
pub mod notifications;
pub mod profile;
pub mod sleep;
pub mod steps;
pub mod summary;

pub use meals::MealService;
pub use notifications::NotificationService;
pub use profile::ProfileService;
pub use sleep::SleepService;
pub use steps::StepService;
pub use summary::SummaryService;

/// Trim optional free text; blank becomes `None`
pub(crate) fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text(Some("  late dinner ".to_string())), Some("late dinner".to_string()));
        assert_eq!(clean_text(Some("   ".to_string())), None);
        assert_eq!(clean_text(None), None);
    }
}
