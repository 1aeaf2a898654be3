//! Diary MCP Tools
//!
//! Previewing servings, logging food and water, and day summaries against
//! the profile's targets.

use serde::Serialize;
use serde_json::Value;

use crate::db::Database;
use crate::models::{
    CustomFoodRow, FoodLogCreate, FoodLogEntry, FoodLogUpdate, Profile, WaterEntry, WaterUnit,
};
use crate::nutrition::{
    aggregate_day, normalize, progress_percent, FoodRecord, MacroSplit, MacroTotals, MealCategory,
    NormalizedMacros, TargetReport,
};

use super::parse_date;

/// Response for preview_food
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub food_id: String,
    pub food_name: String,
    pub food_brand: String,
    pub serving_size: f64,
    pub serving_unit: String,
    pub unit_options: Vec<String>,
    pub macros: NormalizedMacros,
    /// True when protein, carbs and fat are all zero
    pub is_empty: bool,
    /// Share of grams per macro
    pub macro_split: MacroSplit,
}

/// A diary entry with its normalized macros
#[derive(Debug, Serialize)]
pub struct FoodEntryDetail {
    #[serde(flatten)]
    pub entry: FoodLogEntry,
    pub normalized: NormalizedMacros,
}

impl FoodEntryDetail {
    fn from_entry(entry: FoodLogEntry) -> Result<Self, String> {
        let normalized = entry
            .normalized()
            .map_err(|e| format!("Failed to normalize entry {}: {}", entry.id, e))?;
        Ok(Self { entry, normalized })
    }
}

/// One meal group of a day
#[derive(Debug, Serialize)]
pub struct MealGroup {
    pub meal_type: MealCategory,
    pub title: &'static str,
    pub entries: Vec<FoodEntryDetail>,
    pub totals: MacroTotals,
    /// Calories of this meal as a percent of the daily target
    pub percent_of_target: i64,
}

/// Response for get_day_summary
#[derive(Debug, Serialize)]
pub struct DaySummaryResponse {
    pub date: String,
    pub meals: Vec<MealGroup>,
    pub totals: MacroTotals,
    pub targets: TargetReport,
    pub water_ml: f64,
    pub water_entries: Vec<WaterEntry>,
}

/// Response for list_log_dates
#[derive(Debug, Serialize)]
pub struct ListLogDatesResponse {
    pub start_date: String,
    pub end_date: String,
    pub dates: Vec<String>,
}

/// Response for log_water
#[derive(Debug, Serialize)]
pub struct LogWaterResponse {
    pub entry: WaterEntry,
    pub amount_ml: f64,
    pub day_total_ml: f64,
}

// ============================================================================
// Food Tools
// ============================================================================

/// Resolve a food from either a raw record or a saved custom food
fn resolve_food(
    db: &Database,
    user_id: &str,
    food: Option<Value>,
    custom_food_id: Option<i64>,
) -> Result<FoodRecord, String> {
    match (food, custom_food_id) {
        (Some(_), Some(_)) => Err("Provide only one of food or custom_food_id, not both".to_string()),
        (None, None) => Err("Must provide either food or custom_food_id".to_string()),
        (Some(value), None) => FoodRecord::from_value(value).map_err(|e| e.to_string()),
        (None, Some(id)) => {
            let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
            CustomFoodRow::get_by_id(&conn, user_id, id)
                .map_err(|e| format!("Database error checking custom food: {}", e))?
                .map(|row| row.to_record())
                .ok_or_else(|| format!("Custom food not found with id: {}", id))
        }
    }
}

/// Macros for a serving of any food record; no database writes
pub fn preview_food(
    db: &Database,
    user_id: &str,
    food: Option<Value>,
    custom_food_id: Option<i64>,
    serving_size: Option<f64>,
    serving_unit: Option<&str>,
) -> Result<PreviewResponse, String> {
    let record = resolve_food(db, user_id, food, custom_food_id)?;

    let (default_size, default_unit) = record.default_serving();
    let serving_size = serving_size.unwrap_or(default_size);
    let serving_unit = serving_unit.map(str::to_string).unwrap_or(default_unit);

    let macros = normalize(serving_size, &serving_unit, &record).map_err(|e| e.to_string())?;

    Ok(PreviewResponse {
        food_id: record.food_id(),
        food_name: record.name().to_string(),
        food_brand: record.brand().to_string(),
        serving_size: crate::nutrition::clamp_serving(serving_size),
        serving_unit,
        unit_options: record.unit_options(),
        is_empty: macros.is_empty(),
        macro_split: macros.macro_split(),
        macros,
    })
}

/// Log a food to the diary
pub fn log_food(
    db: &Database,
    user_id: &str,
    date: &str,
    meal_type: &str,
    food: Option<Value>,
    custom_food_id: Option<i64>,
    serving_size: Option<f64>,
    serving_unit: Option<&str>,
) -> Result<FoodEntryDetail, String> {
    let date = parse_date(date)?;
    let meal_type = MealCategory::from_str(meal_type);
    let record = resolve_food(db, user_id, food, custom_food_id)?;

    let (default_size, default_unit) = record.default_serving();
    let serving_size = serving_size.unwrap_or(default_size);
    let serving_unit = serving_unit.map(str::to_string).unwrap_or(default_unit);

    let data = FoodLogCreate::from_record(&record, serving_size, &serving_unit, meal_type, &date)
        .map_err(|e| e.to_string())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entry = FoodLogEntry::create(&conn, user_id, &data)
        .map_err(|e| format!("Failed to log food: {}", e))?;

    tracing::info!(
        user = user_id,
        id = entry.id,
        food = %entry.food_name,
        meal = entry.meal_type.as_str(),
        "Food logged"
    );
    FoodEntryDetail::from_entry(entry)
}

/// Get a diary entry by ID
pub fn get_food_entry(db: &Database, user_id: &str, id: i64) -> Result<Option<FoodEntryDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    FoodLogEntry::get_by_id(&conn, user_id, id)
        .map_err(|e| format!("Failed to get food entry: {}", e))?
        .map(FoodEntryDetail::from_entry)
        .transpose()
}

/// Change an entry's serving size, unit or meal
pub fn update_food_entry(
    db: &Database,
    user_id: &str,
    id: i64,
    serving_size: Option<f64>,
    serving_unit: Option<String>,
    meal_type: Option<&str>,
) -> Result<Option<FoodEntryDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let data = FoodLogUpdate {
        serving_size,
        serving_unit,
        meal_type: meal_type.map(MealCategory::from_str),
    };

    FoodLogEntry::update(&conn, user_id, id, &data)
        .map_err(|e| format!("Failed to update food entry: {}", e))?
        .map(FoodEntryDetail::from_entry)
        .transpose()
}

/// Delete a diary entry
pub fn delete_food_entry(db: &Database, user_id: &str, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    FoodLogEntry::delete(&conn, user_id, id)
        .map_err(|e| format!("Failed to delete food entry: {}", e))
}

// ============================================================================
// Day Tools
// ============================================================================

/// Entries grouped by meal, totals and targets for one date
pub fn get_day_summary(db: &Database, user_id: &str, date: &str) -> Result<DaySummaryResponse, String> {
    let date = parse_date(date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = Profile::get_or_create(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?;
    let entries = FoodLogEntry::list_for_date(&conn, user_id, &date)
        .map_err(|e| format!("Failed to get food entries: {}", e))?;
    let water_entries = WaterEntry::list_for_date(&conn, user_id, &date)
        .map_err(|e| format!("Failed to get water entries: {}", e))?;

    let mut details = Vec::with_capacity(entries.len());
    for entry in entries {
        details.push(FoodEntryDetail::from_entry(entry)?);
    }

    let day = aggregate_day(details.iter().map(|d| (d.entry.meal_type, &d.normalized)));

    let mut meals = Vec::new();
    for category in MealCategory::FOOD {
        let group: Vec<FoodEntryDetail> = details
            .iter()
            .filter(|d| d.entry.meal_type == category)
            .map(|d| FoodEntryDetail {
                entry: d.entry.clone(),
                normalized: d.normalized.clone(),
            })
            .collect();
        if group.is_empty() && category == MealCategory::Uncategorized {
            continue;
        }

        let group_totals = day.category(category);
        meals.push(MealGroup {
            meal_type: category,
            title: category.title(),
            percent_of_target: progress_percent(
                group_totals.total_calories as f64,
                profile.calories_target as f64,
            ),
            entries: group,
            totals: group_totals,
        });
    }

    let targets = TargetReport::build(&profile.targets(), &day.total);
    let water_ml = water_entries.iter().map(|w| w.ml()).sum();

    Ok(DaySummaryResponse {
        date,
        meals,
        totals: day.total,
        targets,
        water_ml,
        water_entries,
    })
}

/// Dates in a range that have any food or water logged
pub fn list_log_dates(
    db: &Database,
    user_id: &str,
    start_date: &str,
    end_date: &str,
) -> Result<ListLogDatesResponse, String> {
    let start_date = parse_date(start_date)?;
    let end_date = parse_date(end_date)?;
    if start_date > end_date {
        return Err(format!("start_date {} is after end_date {}", start_date, end_date));
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let dates = FoodLogEntry::log_dates(&conn, user_id, &start_date, &end_date)
        .map_err(|e| format!("Failed to list log dates: {}", e))?;

    Ok(ListLogDatesResponse {
        start_date,
        end_date,
        dates,
    })
}

// ============================================================================
// Water Tools
// ============================================================================

/// Log water for a date
pub fn log_water(
    db: &Database,
    user_id: &str,
    date: &str,
    amount: f64,
    unit: Option<&str>,
) -> Result<LogWaterResponse, String> {
    let date = parse_date(date)?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err("amount must be greater than 0".to_string());
    }
    let unit = match unit {
        Some(u) => WaterUnit::from_str(u)
            .ok_or_else(|| format!("Invalid water unit '{}', expected ml, oz or cup", u))?,
        None => WaterUnit::default(),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entry = WaterEntry::create(&conn, user_id, amount, unit, &date)
        .map_err(|e| format!("Failed to log water: {}", e))?;
    let day_total_ml = WaterEntry::total_ml(&conn, user_id, &date)
        .map_err(|e| format!("Failed to total water: {}", e))?;

    Ok(LogWaterResponse {
        amount_ml: entry.ml(),
        entry,
        day_total_ml,
    })
}

/// Delete a water entry
pub fn delete_water_entry(db: &Database, user_id: &str, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    WaterEntry::delete(&conn, user_id, id)
        .map_err(|e| format!("Failed to delete water entry: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use serde_json::json;

    fn setup() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(run_migrations).unwrap();
        db
    }

    fn oats() -> Value {
        json!({
            "fdcId": 171705,
            "description": "Oats",
            "foodNutrients": [
                {"name": "Energy", "unitName": "KCAL", "value": 380.0},
                {"name": "Protein", "unitName": "G", "value": 13.0},
                {"name": "Carbohydrate, by difference", "unitName": "G", "value": 68.0},
                {"name": "Total lipid (fat)", "unitName": "G", "value": 6.5}
            ]
        })
    }

    #[test]
    fn test_preview_defaults_to_native_unit() {
        let db = setup();
        let preview = preview_food(&db, "alice", Some(oats()), None, None, None).unwrap();
        assert_eq!(preview.serving_unit, "100g");
        assert_eq!(preview.macros.calories, 380);
        assert_eq!(preview.food_brand, "unknown");
        assert!(!preview.is_empty);
    }

    #[test]
    fn test_food_source_is_required() {
        let db = setup();
        assert!(preview_food(&db, "alice", None, None, None, None).is_err());
        assert!(preview_food(&db, "alice", Some(oats()), Some(1), None, None).is_err());
        assert!(preview_food(&db, "alice", Some(json!({"x": 1})), None, None, None).is_err());
    }

    #[test]
    fn test_log_edit_and_summarize_day() {
        let db = setup();
        set_target(&db, 2000);

        let entry = log_food(&db, "alice", "2024-05-01", "breakfast", Some(oats()), None, Some(50.0), Some("g"))
            .unwrap();
        assert_eq!(entry.normalized.calories, 190);

        let updated = update_food_entry(&db, "alice", entry.entry.id, Some(100.0), None, Some("lunch"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.normalized.calories, 380);

        log_water(&db, "alice", "2024-05-01", 500.0, Some("ml")).unwrap();

        let summary = get_day_summary(&db, "alice", "2024-05-01").unwrap();
        assert_eq!(summary.totals.total_calories, 380);
        assert_eq!(summary.targets.summary.remaining_calories, 1620);
        assert_eq!(summary.targets.remaining_label, "Remaining");
        assert_eq!(summary.water_ml, 500.0);

        let lunch = summary
            .meals
            .iter()
            .find(|m| m.meal_type == MealCategory::Lunch)
            .unwrap();
        assert_eq!(lunch.entries.len(), 1);
        assert_eq!(lunch.percent_of_target, 19);

        let breakfast = summary
            .meals
            .iter()
            .find(|m| m.meal_type == MealCategory::Breakfast)
            .unwrap();
        assert!(breakfast.entries.is_empty());
        assert_eq!(breakfast.totals, MacroTotals::default());
    }

    #[test]
    fn test_over_target_label() {
        let db = setup();
        set_target(&db, 300);
        log_food(&db, "alice", "2024-05-01", "dinner", Some(oats()), None, None, None).unwrap();

        let summary = get_day_summary(&db, "alice", "2024-05-01").unwrap();
        assert_eq!(summary.targets.summary.remaining_calories, -80);
        assert!(summary.targets.summary.is_over);
        assert_eq!(summary.targets.remaining_label, "Over");
    }

    #[test]
    fn test_empty_day_is_zero() {
        let db = setup();
        let summary = get_day_summary(&db, "alice", "2024-05-01").unwrap();
        assert_eq!(summary.totals, MacroTotals::default());
        assert_eq!(summary.targets.protein.percent_of_calories, 0);
        assert_eq!(summary.water_ml, 0.0);
    }

    #[test]
    fn test_log_dates_and_validation() {
        let db = setup();
        log_food(&db, "alice", "2024-05-02", "snack", Some(oats()), None, None, None).unwrap();
        log_water(&db, "alice", "2024-05-04", 1.0, Some("cup")).unwrap();

        let dates = list_log_dates(&db, "alice", "2024-05-01", "2024-05-31").unwrap();
        assert_eq!(dates.dates, vec!["2024-05-02", "2024-05-04"]);

        assert!(list_log_dates(&db, "alice", "2024-06-01", "2024-05-01").is_err());
        assert!(log_food(&db, "alice", "tomorrow", "snack", Some(oats()), None, None, None).is_err());
        assert!(log_water(&db, "alice", "2024-05-01", 0.0, None).is_err());
        assert!(log_water(&db, "alice", "2024-05-01", 2.0, Some("liters")).is_err());
        assert_eq!(get_day_summary(&db, "alice", "2024-05-01").unwrap().water_ml, 0.0);
    }

    #[test]
    fn test_missing_entries() {
        let db = setup();
        assert!(get_food_entry(&db, "alice", 99).unwrap().is_none());
        assert!(update_food_entry(&db, "alice", 99, Some(1.0), None, None).unwrap().is_none());
        assert!(!delete_food_entry(&db, "alice", 99).unwrap());
        assert!(!delete_water_entry(&db, "alice", 99).unwrap());
    }

    fn set_target(db: &Database, calories: i64) {
        let conn = db.get_conn().unwrap();
        Profile::set_energy_target(&conn, "alice", calories, None).unwrap();
    }
}
