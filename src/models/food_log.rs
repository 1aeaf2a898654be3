//! Food log model
//!
//! Diary entries. Each row keeps the food's macros for its reference
//! quantity plus the serving the user chose; normalized values are
//! recomputed on every read.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::{
    clamp_serving, normalize, FoodRecord, LoggedFood, MealCategory, NormalizedMacros,
    NutritionError, NutritionResult,
};

/// A logged food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLogEntry {
    pub id: i64,
    pub user_id: String,
    pub food_id: String,
    pub food_name: String,
    pub food_brand: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub reference_quantity: f64,
    pub reference_unit: String,
    pub serving_size: f64,
    pub serving_unit: String,
    pub meal_type: MealCategory,
    pub logged_at: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for logging a food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLogCreate {
    pub food_id: String,
    pub food_name: String,
    pub food_brand: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub reference_quantity: f64,
    pub reference_unit: String,
    pub serving_size: f64,
    pub serving_unit: String,
    pub meal_type: MealCategory,
    pub logged_at: String,
}

impl FoodLogCreate {
    /// Build an entry from any food record shape
    ///
    /// The serving is clamped and checked against the record's reference
    /// unit so that a stored entry always normalizes.
    pub fn from_record(
        record: &FoodRecord,
        serving_size: f64,
        serving_unit: &str,
        meal_type: MealCategory,
        logged_at: &str,
    ) -> NutritionResult<Self> {
        if !meal_type.is_food() {
            return Err(NutritionError::InvalidMealCategory(meal_type.as_str().to_string()));
        }

        let serving_size = clamp_serving(serving_size);
        normalize(serving_size, serving_unit, record)?;

        let base = record.base_macros();
        let reference = record.reference()?;

        Ok(Self {
            food_id: record.food_id(),
            food_name: record.name().to_string(),
            food_brand: record.brand().to_string(),
            calories: base.calories,
            protein: base.protein,
            carbs: base.carbs,
            fat: base.fat,
            reference_quantity: reference.quantity,
            reference_unit: reference.unit.as_str().to_string(),
            serving_size,
            serving_unit: serving_unit.trim().to_string(),
            meal_type,
            logged_at: logged_at.to_string(),
        })
    }
}

/// Changes to an entry's serving or meal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodLogUpdate {
    pub serving_size: Option<f64>,
    pub serving_unit: Option<String>,
    pub meal_type: Option<MealCategory>,
}

impl FoodLogEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            food_id: row.get("food_id")?,
            food_name: row.get("food_name")?,
            food_brand: row.get("food_brand")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fat: row.get("fat")?,
            reference_quantity: row.get("reference_quantity")?,
            reference_unit: row.get("reference_unit")?,
            serving_size: row.get("serving_size")?,
            serving_unit: row.get("serving_unit")?,
            meal_type: MealCategory::from_str(row.get::<_, String>("meal_type")?.as_str()),
            logged_at: row.get("logged_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// The entry as a logged-shape food record
    pub fn to_record(&self) -> FoodRecord {
        FoodRecord::Logged(LoggedFood {
            id: Some(self.id),
            food_id: self.food_id.clone(),
            food_name: self.food_name.clone(),
            food_brand: self.food_brand.clone(),
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            serving_size: self.serving_size,
            serving_unit: self.serving_unit.clone(),
            meal_type: self.meal_type,
            logged_at: self.logged_at.clone(),
            reference_quantity: self.reference_quantity,
            reference_unit: self.reference_unit.clone(),
        })
    }

    /// Macros for the chosen serving
    pub fn normalized(&self) -> NutritionResult<NormalizedMacros> {
        normalize(self.serving_size, &self.serving_unit, &self.to_record())
    }

    /// Insert a new entry
    pub fn create(conn: &Connection, user_id: &str, data: &FoodLogCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO food_log (
                user_id, food_id, food_name, food_brand,
                calories, protein, carbs, fat, reference_quantity, reference_unit,
                serving_size, serving_unit, meal_type, logged_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                user_id,
                data.food_id,
                data.food_name,
                data.food_brand,
                data.calories,
                data.protein,
                data.carbs,
                data.fat,
                data.reference_quantity,
                data.reference_unit,
                data.serving_size,
                data.serving_unit,
                data.meal_type.as_str(),
                data.logged_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, user_id, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get one of the user's entries
    pub fn get_by_id(conn: &Connection, user_id: &str, id: i64) -> DbResult<Option<Self>> {
        let result = conn.query_row(
            "SELECT * FROM food_log WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
            Self::from_row,
        );
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All of the user's entries for a date, in the order they were logged
    pub fn list_for_date(conn: &Connection, user_id: &str, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM food_log
            WHERE user_id = ?1 AND logged_at = ?2
            ORDER BY id ASC
            "#,
        )?;

        let entries = stmt
            .query_map(params![user_id, date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Change the serving or meal of an entry
    ///
    /// The new serving must still convert to the entry's reference unit.
    pub fn update(
        conn: &Connection,
        user_id: &str,
        id: i64,
        data: &FoodLogUpdate,
    ) -> DbResult<Option<Self>> {
        let Some(existing) = Self::get_by_id(conn, user_id, id)? else {
            return Ok(None);
        };

        let mut candidate = existing.clone();
        if let Some(size) = data.serving_size {
            candidate.serving_size = clamp_serving(size);
        }
        if let Some(ref unit) = data.serving_unit {
            candidate.serving_unit = unit.trim().to_string();
        }
        if let Some(meal) = data.meal_type {
            if !meal.is_food() {
                return Err(NutritionError::InvalidMealCategory(meal.as_str().to_string()).into());
            }
            candidate.meal_type = meal;
        }
        candidate.normalized()?;

        conn.execute(
            r#"
            UPDATE food_log
            SET serving_size = ?1, serving_unit = ?2, meal_type = ?3, updated_at = datetime('now')
            WHERE id = ?4 AND user_id = ?5
            "#,
            params![
                candidate.serving_size,
                candidate.serving_unit,
                candidate.meal_type.as_str(),
                id,
                user_id,
            ],
        )?;

        Self::get_by_id(conn, user_id, id)
    }

    /// Delete an entry; returns false if it did not exist
    pub fn delete(conn: &Connection, user_id: &str, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM food_log WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    /// Dates in [start, end] with any food or water logged, ascending
    pub fn log_dates(conn: &Connection, user_id: &str, start: &str, end: &str) -> DbResult<Vec<String>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT logged_at FROM food_log
            WHERE user_id = ?1 AND logged_at BETWEEN ?2 AND ?3
            UNION
            SELECT logged_at FROM water_log
            WHERE user_id = ?1 AND logged_at BETWEEN ?2 AND ?3
            ORDER BY logged_at ASC
            "#,
        )?;

        let dates = stmt
            .query_map(params![user_id, start, end], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(dates)
    }
}
