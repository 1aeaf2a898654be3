//! Nutrition calculation module
//!
//! Serving normalization, macro aggregation and target calculation. Every
//! function here is pure; the tools layer feeds it rows from the database.

pub mod aggregator;
pub mod body;
pub mod error;
pub mod meal;
pub mod normalizer;
pub mod targets;
pub mod units;

pub use aggregator::{
    aggregate, aggregate_day, sum_field, DayAggregate, Macro, MacroTotals, Rounding,
};
pub use error::{NutritionError, NutritionResult};
pub use meal::MealCategory;
pub use normalizer::{
    clamp_serving, normalize, parse_serving_input, CustomFood, FoodNutrient, FoodRecord,
    LoggedFood, LookupFood, NormalizedMacros,
};
pub use targets::{
    progress_percent, EnergyBreakdown, MacroSplit, MacroTargets, ProfileTargets,
    RemainingCalories, TargetReport, TargetSummary,
};
pub use units::{parse_unit, ParsedUnit, ServingUnit};
