//! Database repositories
//!
//! sqlx data access for the Postgres store. Repositories return raw row
//! records; `into_model` converts them to the shared domain types.

pub mod meals;
pub mod profile;
pub mod sleep;
pub mod steps;

pub use meals::{MealEntryRecord, MealEntryRepository};
pub use profile::{ProfileRecord, UserProfileRepository};
pub use sleep::{SleepSessionRecord, SleepSessionRepository};
pub use steps::{StepSessionRecord, StepSessionRepository};

use anyhow::{anyhow, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Convert a float to a NUMERIC bind value
pub(crate) fn to_decimal(value: f64) -> Result<Decimal> {
    Decimal::try_from(value).map_err(|e| anyhow!("cannot store {} as NUMERIC: {}", value, e))
}

pub(crate) fn to_decimal_opt(value: Option<f64>) -> Result<Option<Decimal>> {
    value.map(to_decimal).transpose()
}

pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
