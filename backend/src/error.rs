//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use crate::store::DuplicateRecord;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diet_tracker_shared::types::ErrorResponse;
use diet_tracker_shared::validation::collect_field_errors;
use diet_tracker_shared::{DateOutOfRange, MetricsError};
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: None,
        }
    }

    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }
}

impl ApiError {
    /// Map a store failure, keeping duplicate inserts distinct from outages
    pub fn store(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DuplicateRecord>() {
            Some(duplicate) => ApiError::Conflict(duplicate.to_string()),
            None => ApiError::Internal(err),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = collect_field_errors(&errors);
        let message = fields
            .iter()
            .map(|f| f.user_message())
            .collect::<Vec<_>>()
            .join("; ");
        ApiError::Validation {
            message: if message.is_empty() {
                "Invalid input".to_string()
            } else {
                message
            },
            field: fields.first().map(|f| f.field.clone()),
        }
    }
}

impl From<MetricsError> for ApiError {
    fn from(err: MetricsError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<DateOutOfRange> for ApiError {
    fn from(err: DateOutOfRange) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match self {
            ApiError::Validation { message, field } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message, field)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", msg, None)
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
            field,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diet_tracker_shared::types::CreateMealRequest;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_error_status() {
        let response = ApiError::validation("Invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_status() {
        let error = ApiError::NotFound("Profile not found".to_string());
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unavailable_error_status() {
        let error = ApiError::Unavailable("Telegram bot is not configured".to_string());
        assert_eq!(error.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_date_out_of_range_is_bad_request() {
        let error: ApiError = DateOutOfRange(chrono::NaiveDate::MAX).into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    }

    #[test]
    fn test_store_duplicate_maps_to_conflict() {
        let err = ApiError::store(DuplicateRecord("Meal entry 1".to_string()).into());
        assert!(matches!(err, ApiError::Conflict(ref msg) if msg == "Meal entry 1 already exists"));

        let err = ApiError::store(anyhow::anyhow!("connection reset"));
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_conflict_error_status() {
        let error = ApiError::Conflict("Step goal not reached yet".to_string());
        assert_eq!(error.into_response().status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_internal_error_is_masked() {
        let error = ApiError::Internal(anyhow::anyhow!("connection refused to 10.0.0.5"));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "An internal error occurred");
        assert_eq!(body["code"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_validation_errors_carry_field() {
        let req = CreateMealRequest {
            meal_type: diet_tracker_shared::MealType::Lunch,
            food_name: "Soup".to_string(),
            calories: 20_000.0,
            protein_g: None,
            carbs_g: None,
            fat_g: None,
            portion_grams: None,
            eaten_at: None,
            notes: None,
        };
        let error: ApiError = req.validate().unwrap_err().into();
        let body = body_json(error.into_response()).await;
        assert_eq!(body["field"], "calories");
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["error"].as_str().unwrap().starts_with("Calories:"));
    }
}
