//! Nutrition error types

use thiserror::Error;

/// Errors raised by the nutrition calculations
///
/// Numeric input never produces an error: serving sizes are clamped and
/// missing macro values default to zero. These variants cover contract
/// violations from callers (bad shapes, bad unit strings, bad splits).
#[derive(Debug, Error)]
pub enum NutritionError {
    #[error("Unrecognized food record: {0}")]
    UnrecognizedFoodRecord(String),

    #[error("Invalid unit string: '{0}'")]
    InvalidUnit(String),

    #[error("Cannot convert '{from}' to '{to}'")]
    IncompatibleUnits { from: String, to: String },

    #[error("Macronutrients must add up to 100% (got {0}%)")]
    InvalidMacroSplit(i64),

    #[error("Food cannot be logged under '{0}'")]
    InvalidMealCategory(String),

    #[error("Malformed food record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result type for nutrition calculations
pub type NutritionResult<T> = Result<T, NutritionError>;
