//! Custom food model
//!
//! Foods a user enters by hand. Macros are for `serving_size serving_unit`.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::{parse_unit, CustomFood, FoodRecord};
use crate::nutrition::normalizer::UNKNOWN_BRAND;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFoodRow {
    pub id: i64,
    pub user_id: String,
    pub food_name: String,
    pub food_brand: String,
    pub serving_size: f64,
    pub serving_unit: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a custom food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFoodCreate {
    pub food_name: String,
    pub food_brand: Option<String>,
    pub serving_size: f64,
    pub serving_unit: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl CustomFoodRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            food_name: row.get("food_name")?,
            food_brand: row.get("food_brand")?,
            serving_size: row.get("serving_size")?,
            serving_unit: row.get("serving_unit")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fat: row.get("fat")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// The row as a custom-shape food record
    pub fn to_record(&self) -> FoodRecord {
        FoodRecord::Custom(CustomFood {
            custom_food_id: self.id,
            food_name: self.food_name.clone(),
            food_brand: self.food_brand.clone(),
            serving_size: self.serving_size,
            serving_unit: self.serving_unit.clone(),
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        })
    }

    /// Insert a custom food; the serving unit must parse
    pub fn create(conn: &Connection, user_id: &str, data: &CustomFoodCreate) -> DbResult<Self> {
        parse_unit(&data.serving_unit)?;

        let brand = data
            .food_brand
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(UNKNOWN_BRAND);

        conn.execute(
            r#"
            INSERT INTO custom_foods (
                user_id, food_name, food_brand, serving_size, serving_unit,
                calories, protein, carbs, fat
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                user_id,
                data.food_name.trim(),
                brand,
                data.serving_size.max(0.0),
                data.serving_unit.trim(),
                data.calories.max(0.0),
                data.protein.max(0.0),
                data.carbs.max(0.0),
                data.fat.max(0.0),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, user_id, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, user_id: &str, id: i64) -> DbResult<Option<Self>> {
        let result = conn.query_row(
            "SELECT * FROM custom_foods WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
            Self::from_row,
        );
        match result {
            Ok(food) => Ok(Some(food)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list(conn: &Connection, user_id: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM custom_foods WHERE user_id = ?1 ORDER BY food_name ASC",
        )?;

        let foods = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(foods)
    }

    pub fn delete(conn: &Connection, user_id: &str, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM custom_foods WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::nutrition::normalize;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn granola() -> CustomFoodCreate {
        CustomFoodCreate {
            food_name: "Granola".to_string(),
            food_brand: Some("  ".to_string()),
            serving_size: 45.0,
            serving_unit: "g".to_string(),
            calories: 210.0,
            protein: 5.0,
            carbs: 30.0,
            fat: 8.0,
        }
    }

    #[test]
    fn test_round_trip_through_normalizer() {
        let conn = setup();
        let food = CustomFoodRow::create(&conn, "alice", &granola()).unwrap();
        assert_eq!(food.food_brand, "unknown");

        let record = food.to_record();
        let (serving, unit) = record.default_serving();
        let macros = normalize(serving, &unit, &record).unwrap();
        assert_eq!(macros.calories, 210);
        assert_eq!(macros.carbs, 30.0);
    }

    #[test]
    fn test_bad_unit_rejected() {
        let conn = setup();
        let mut data = granola();
        data.serving_unit = "4g4".to_string();
        assert!(CustomFoodRow::create(&conn, "alice", &data).is_err());
    }

    #[test]
    fn test_list_and_delete_per_user() {
        let conn = setup();
        let food = CustomFoodRow::create(&conn, "alice", &granola()).unwrap();
        assert_eq!(CustomFoodRow::list(&conn, "alice").unwrap().len(), 1);
        assert!(CustomFoodRow::list(&conn, "bob").unwrap().is_empty());
        assert!(!CustomFoodRow::delete(&conn, "bob", food.id).unwrap());
        assert!(CustomFoodRow::delete(&conn, "alice", food.id).unwrap());
    }
}
