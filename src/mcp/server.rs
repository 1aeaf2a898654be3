//! Nutrilog MCP Server Implementation
//!
//! Exposes the diary tools over MCP for the configured user.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::CustomFoodCreate;
use crate::tools::status::StatusTracker;
use crate::tools::{diary, foods, profile};

/// Nutrilog MCP Service
#[derive(Clone)]
pub struct NutrilogService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    user_id: String,
    tool_router: ToolRouter<NutrilogService>,
}

impl NutrilogService {
    pub fn new(database_path: PathBuf, database: Database, user_id: String) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path, user_id.clone()))),
            database,
            user_id,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(what: &str, id: impl std::fmt::Display) -> Result<CallToolResult, McpError> {
    let json = format!(r#"{{"error": "{} not found", "id": {}}}"#, what, id);
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn deleted(deleted: bool) -> Result<CallToolResult, McpError> {
    json_result(&serde_json::json!({ "deleted": deleted }))
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    /// "male" or "female"
    pub gender: Option<String>,
    /// ISO date (YYYY-MM-DD)
    pub birthdate: Option<String>,
    /// Height in inches
    pub height: Option<f64>,
    /// Weight in lbs
    pub weight: Option<f64>,
    /// Fraction added above BMR (0.2 = 20% more than BMR)
    pub activity_level: Option<f64>,
    /// Explicit BMR in kcal/day; recomputed from body attributes when omitted
    pub bmr: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetEnergyTargetParams {
    pub calories_target: i64,
    /// Goal weight in lbs
    pub weight_goal: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetMacroTargetsParams {
    /// Percent of calories from protein
    pub protein: i64,
    /// Percent of calories from carbohydrates
    pub carbs: i64,
    /// Percent of calories from fat
    pub fat: i64,
}

// ============================================================================
// Diary Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PreviewFoodParams {
    /// Food record in lookup, custom or logged shape
    pub food: Option<serde_json::Value>,
    /// ID of a saved custom food, instead of `food`
    pub custom_food_id: Option<i64>,
    /// Number of units (0-1000); defaults to the food's own serving
    pub serving_size: Option<f64>,
    /// Unit string like "100g", "g", "oz" or "1 slice"
    pub serving_unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    /// ISO date (YYYY-MM-DD)
    pub date: String,
    /// breakfast, lunch, dinner, snack or uncategorized
    #[serde(default = "default_meal_type")]
    pub meal_type: String,
    /// Food record in lookup, custom or logged shape
    pub food: Option<serde_json::Value>,
    /// ID of a saved custom food, instead of `food`
    pub custom_food_id: Option<i64>,
    pub serving_size: Option<f64>,
    pub serving_unit: Option<String>,
}

fn default_meal_type() -> String {
    "uncategorized".to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EntryIdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateFoodEntryParams {
    pub id: i64,
    pub serving_size: Option<f64>,
    pub serving_unit: Option<String>,
    pub meal_type: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// ISO date (YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateRangeParams {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWaterParams {
    pub date: String,
    pub amount: f64,
    /// ml (default), oz or cup
    pub unit: Option<String>,
}

// ============================================================================
// Food Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddCustomFoodParams {
    pub food_name: String,
    pub food_brand: Option<String>,
    /// Macros below are for this many `serving_unit`
    pub serving_size: f64,
    pub serving_unit: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFavoriteFoodParams {
    pub food_id: String,
    pub food_name: String,
    pub food_brand: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodIdParams {
    pub food_id: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutrilogService {
    // --- Status ---

    #[tool(description = "Get the current status of the Nutrilog service including build info, database status, and process information")]
    async fn nutrilog_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status())
    }

    #[tool(description = "Get instructions for keeping the food diary: food record shapes, serving units, logging workflow and targets. Call this when starting a logging session.")]
    fn diary_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::DIARY_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(DIARY_INSTRUCTIONS)]))
    }

    // --- Profile ---

    #[tool(description = "Get the profile with BMI, age, energy expenditure breakdown and macro gram targets")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database, &self.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update body attributes (gender, birthdate, height in inches, weight in lbs, activity level, BMR). BMR is recomputed when omitted.")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let result = profile::update_profile(
            &self.database,
            &self.user_id,
            p.gender.as_deref(),
            p.birthdate.as_deref(),
            p.height,
            p.weight,
            p.activity_level,
            p.bmr,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set the daily calorie target and optional goal weight")]
    fn set_energy_target(&self, Parameters(p): Parameters<SetEnergyTargetParams>) -> Result<CallToolResult, McpError> {
        let result = profile::set_energy_target(&self.database, &self.user_id, p.calories_target, p.weight_goal)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set the macro split as percents of the calorie target. Protein, carbs and fat must add up to 100.")]
    fn set_macro_targets(&self, Parameters(p): Parameters<SetMacroTargetsParams>) -> Result<CallToolResult, McpError> {
        let result = profile::set_macro_targets(&self.database, &self.user_id, p.protein, p.carbs, p.fat)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Diary ---

    #[tool(description = "Compute the macros for a serving of a food without logging it. Returns unit options and the macro split.")]
    fn preview_food(&self, Parameters(p): Parameters<PreviewFoodParams>) -> Result<CallToolResult, McpError> {
        let result = diary::preview_food(
            &self.database,
            &self.user_id,
            p.food,
            p.custom_food_id,
            p.serving_size,
            p.serving_unit.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log a food to the diary for a date and meal. Pass a food record or a custom_food_id.")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let result = diary::log_food(
            &self.database,
            &self.user_id,
            &p.date,
            &p.meal_type,
            p.food,
            p.custom_food_id,
            p.serving_size,
            p.serving_unit.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a diary entry with its normalized macros")]
    fn get_food_entry(&self, Parameters(p): Parameters<EntryIdParams>) -> Result<CallToolResult, McpError> {
        let result = diary::get_food_entry(&self.database, &self.user_id, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(entry) => json_result(&entry),
            None => not_found("Food entry", p.id),
        }
    }

    #[tool(description = "Change a diary entry's serving size, serving unit or meal type")]
    fn update_food_entry(&self, Parameters(p): Parameters<UpdateFoodEntryParams>) -> Result<CallToolResult, McpError> {
        let result = diary::update_food_entry(
            &self.database,
            &self.user_id,
            p.id,
            p.serving_size,
            p.serving_unit,
            p.meal_type.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(entry) => json_result(&entry),
            None => not_found("Food entry", p.id),
        }
    }

    #[tool(description = "Delete a diary entry")]
    fn delete_food_entry(&self, Parameters(p): Parameters<EntryIdParams>) -> Result<CallToolResult, McpError> {
        let result = diary::delete_food_entry(&self.database, &self.user_id, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        deleted(result)
    }

    #[tool(description = "Get a day's entries grouped by meal, totals, water, and remaining calories and macro progress against targets")]
    fn get_day_summary(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = diary::get_day_summary(&self.database, &self.user_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List the dates in a range that have food or water logged")]
    fn list_log_dates(&self, Parameters(p): Parameters<DateRangeParams>) -> Result<CallToolResult, McpError> {
        let result = diary::list_log_dates(&self.database, &self.user_id, &p.start_date, &p.end_date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log water for a date in ml, oz or cup")]
    fn log_water(&self, Parameters(p): Parameters<LogWaterParams>) -> Result<CallToolResult, McpError> {
        let result = diary::log_water(&self.database, &self.user_id, &p.date, p.amount, p.unit.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a water entry")]
    fn delete_water_entry(&self, Parameters(p): Parameters<EntryIdParams>) -> Result<CallToolResult, McpError> {
        let result = diary::delete_water_entry(&self.database, &self.user_id, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        deleted(result)
    }

    // --- Custom Foods ---

    #[tool(description = "Create a custom food. Macros are for serving_size × serving_unit.")]
    fn add_custom_food(&self, Parameters(p): Parameters<AddCustomFoodParams>) -> Result<CallToolResult, McpError> {
        let data = CustomFoodCreate {
            food_name: p.food_name,
            food_brand: p.food_brand,
            serving_size: p.serving_size,
            serving_unit: p.serving_unit,
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fat: p.fat,
        };
        let result = foods::add_custom_food(&self.database, &self.user_id, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List custom foods with the macros for their own serving")]
    fn list_custom_foods(&self) -> Result<CallToolResult, McpError> {
        let result = foods::list_custom_foods(&self.database, &self.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a custom food. Diary entries logged from it are kept.")]
    fn delete_custom_food(&self, Parameters(p): Parameters<EntryIdParams>) -> Result<CallToolResult, McpError> {
        let result = foods::delete_custom_food(&self.database, &self.user_id, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        deleted(result)
    }

    // --- Favorites ---

    #[tool(description = "Bookmark a food as a favorite")]
    fn add_favorite_food(&self, Parameters(p): Parameters<AddFavoriteFoodParams>) -> Result<CallToolResult, McpError> {
        let result = foods::add_favorite_food(
            &self.database,
            &self.user_id,
            &p.food_id,
            &p.food_name,
            p.food_brand.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List favorite foods")]
    fn list_favorite_foods(&self) -> Result<CallToolResult, McpError> {
        let result = foods::list_favorite_foods(&self.database, &self.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Remove a food from favorites")]
    fn delete_favorite_food(&self, Parameters(p): Parameters<FoodIdParams>) -> Result<CallToolResult, McpError> {
        let result = foods::delete_favorite_food(&self.database, &self.user_id, &p.food_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        deleted(result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutrilogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrilog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutrilog Food Diary".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutrilog - food diary with serving normalization, macro totals and calorie targets. \
                 IMPORTANT: Call diary_instructions before logging food. \
                 Profile: get_profile, update_profile, set_energy_target, set_macro_targets. \
                 Diary: preview_food, log_food, get/update/delete_food_entry, get_day_summary, list_log_dates. \
                 Water: log_water, delete_water_entry. \
                 Custom foods: add/list/delete_custom_food. Favorites: add/list/delete_favorite_food."
                    .into(),
            ),
        }
    }
}
