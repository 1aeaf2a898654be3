//! Custom and Favorite Food MCP Tools

use serde::Serialize;

use crate::db::Database;
use crate::models::{CustomFoodCreate, CustomFoodRow, FavoriteFood};
use crate::nutrition::normalizer::UNKNOWN_BRAND;
use crate::nutrition::{normalize, NormalizedMacros};

/// A custom food with the macros for its own serving
#[derive(Debug, Serialize)]
pub struct CustomFoodDetail {
    #[serde(flatten)]
    pub food: CustomFoodRow,
    pub native_unit: String,
    pub unit_options: Vec<String>,
    pub macros: NormalizedMacros,
}

impl CustomFoodDetail {
    fn from_row(food: CustomFoodRow) -> Result<Self, String> {
        let record = food.to_record();
        let (serving, unit) = record.default_serving();
        let macros = normalize(serving, &unit, &record).map_err(|e| e.to_string())?;
        Ok(Self {
            native_unit: unit,
            unit_options: record.unit_options(),
            macros,
            food,
        })
    }
}

/// Response for list_custom_foods
#[derive(Debug, Serialize)]
pub struct ListCustomFoodsResponse {
    pub foods: Vec<CustomFoodDetail>,
    pub total: usize,
}

/// Response for list_favorite_foods
#[derive(Debug, Serialize)]
pub struct ListFavoritesResponse {
    pub favorites: Vec<FavoriteFood>,
    pub total: usize,
}

// ============================================================================
// Custom Food Tools
// ============================================================================

/// Create a custom food
pub fn add_custom_food(
    db: &Database,
    user_id: &str,
    data: CustomFoodCreate,
) -> Result<CustomFoodDetail, String> {
    if data.food_name.trim().is_empty() {
        return Err("food_name must not be empty".to_string());
    }
    if !(data.serving_size.is_finite() && data.serving_size > 0.0) {
        return Err("serving_size must be greater than 0".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let food = CustomFoodRow::create(&conn, user_id, &data)
        .map_err(|e| format!("Failed to create custom food: {}", e))?;

    tracing::info!(user = user_id, id = food.id, name = %food.food_name, "Custom food created");
    CustomFoodDetail::from_row(food)
}

/// List the user's custom foods
pub fn list_custom_foods(db: &Database, user_id: &str) -> Result<ListCustomFoodsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let rows = CustomFoodRow::list(&conn, user_id)
        .map_err(|e| format!("Failed to list custom foods: {}", e))?;

    let foods = rows
        .into_iter()
        .map(CustomFoodDetail::from_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ListCustomFoodsResponse {
        total: foods.len(),
        foods,
    })
}

/// Delete a custom food; entries already logged from it are kept
pub fn delete_custom_food(db: &Database, user_id: &str, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    CustomFoodRow::delete(&conn, user_id, id)
        .map_err(|e| format!("Failed to delete custom food: {}", e))
}

// ============================================================================
// Favorite Tools
// ============================================================================

/// Bookmark a food
pub fn add_favorite_food(
    db: &Database,
    user_id: &str,
    food_id: &str,
    food_name: &str,
    food_brand: Option<&str>,
) -> Result<FavoriteFood, String> {
    if food_id.trim().is_empty() {
        return Err("food_id must not be empty".to_string());
    }
    let brand = food_brand
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or(UNKNOWN_BRAND);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    FavoriteFood::add(&conn, user_id, food_id.trim(), food_name.trim(), brand)
        .map_err(|e| format!("Failed to add favorite: {}", e))
}

pub fn list_favorite_foods(db: &Database, user_id: &str) -> Result<ListFavoritesResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let favorites = FavoriteFood::list(&conn, user_id)
        .map_err(|e| format!("Failed to list favorites: {}", e))?;

    Ok(ListFavoritesResponse {
        total: favorites.len(),
        favorites,
    })
}

pub fn delete_favorite_food(db: &Database, user_id: &str, food_id: &str) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    FavoriteFood::delete(&conn, user_id, food_id.trim())
        .map_err(|e| format!("Failed to delete favorite: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::tools::diary;

    fn setup() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(run_migrations).unwrap();
        db
    }

    fn bar() -> CustomFoodCreate {
        CustomFoodCreate {
            food_name: "Protein bar".to_string(),
            food_brand: None,
            serving_size: 1.0,
            serving_unit: "bar".to_string(),
            calories: 200.0,
            protein: 20.0,
            carbs: 22.0,
            fat: 6.0,
        }
    }

    #[test]
    fn test_custom_food_returns_stored_values() {
        let db = setup();
        let food = add_custom_food(&db, "alice", bar()).unwrap();
        assert_eq!(food.native_unit, "1 bar");
        assert_eq!(food.macros.calories, 200);
        assert_eq!(food.macros.protein, 20.0);
        assert_eq!(food.food.food_brand, "unknown");
    }

    #[test]
    fn test_custom_food_unit_with_quantity() {
        let db = setup();
        let mut data = bar();
        data.serving_unit = "100g".to_string();
        data.calories = 60.0;

        let food = add_custom_food(&db, "alice", data).unwrap();
        assert_eq!(food.native_unit, "100g");
        assert_eq!(food.macros.calories, 60);
        assert_eq!(food.macros.protein, 20.0);
    }

    #[test]
    fn test_log_custom_food_by_id() {
        let db = setup();
        let food = add_custom_food(&db, "alice", bar()).unwrap();

        let entry = diary::log_food(
            &db, "alice", "2024-05-01", "snack", None, Some(food.food.id), Some(2.0), Some("bar"),
        )
        .unwrap();
        assert_eq!(entry.normalized.calories, 400);

        // Deleting the custom food keeps the diary entry intact
        assert!(delete_custom_food(&db, "alice", food.food.id).unwrap());
        let kept = diary::get_food_entry(&db, "alice", entry.entry.id).unwrap().unwrap();
        assert_eq!(kept.normalized.calories, 400);
    }

    #[test]
    fn test_custom_food_validation() {
        let db = setup();
        let mut data = bar();
        data.serving_size = 0.0;
        assert!(add_custom_food(&db, "alice", data).is_err());

        let mut data = bar();
        data.food_name = " ".to_string();
        assert!(add_custom_food(&db, "alice", data).is_err());
    }

    #[test]
    fn test_favorites() {
        let db = setup();
        add_favorite_food(&db, "alice", "171705", "Oats", None).unwrap();
        add_favorite_food(&db, "alice", "171705", "Oats", None).unwrap();
        add_favorite_food(&db, "alice", "42", "Apple", Some("Orchard")).unwrap();

        let list = list_favorite_foods(&db, "alice").unwrap();
        assert_eq!(list.total, 2);
        assert_eq!(list.favorites[0].food_name, "Apple");

        assert!(delete_favorite_food(&db, "alice", "42").unwrap());
        assert!(!delete_favorite_food(&db, "alice", "42").unwrap());
        assert!(add_favorite_food(&db, "alice", "", "x", None).is_err());
    }
}
