//! Data models
//!
//! Rust structs representing database entities. Every table is scoped by
//! `user_id`.

mod custom_food;
mod favorite_food;
mod food_log;
mod profile;
mod water_log;

pub use custom_food::{CustomFoodCreate, CustomFoodRow};
pub use favorite_food::FavoriteFood;
pub use food_log::{FoodLogCreate, FoodLogEntry, FoodLogUpdate};
pub use profile::{Profile, ProfileUpdate};
pub use water_log::{WaterEntry, WaterUnit};
