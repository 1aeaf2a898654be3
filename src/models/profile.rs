//! Profile model
//!
//! Body attributes and daily targets for one user.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::body::{self, Gender};
use crate::nutrition::{MacroSplit, ProfileTargets};

/// A user's profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub gender: Option<Gender>,
    pub birthdate: Option<String>,
    /// Inches
    pub height: Option<f64>,
    /// Pounds
    pub weight: Option<f64>,
    pub weight_goal: Option<f64>,
    pub activity_level: f64,
    pub bmr: f64,
    pub calories_target: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Body attributes to change; absent fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub gender: Option<Gender>,
    pub birthdate: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub activity_level: Option<f64>,
    /// Explicit BMR; when absent it is recomputed from the body attributes
    pub bmr: Option<f64>,
}

impl ProfileUpdate {
    fn changes_body(&self) -> bool {
        self.gender.is_some()
            || self.birthdate.is_some()
            || self.height.is_some()
            || self.weight.is_some()
    }
}

impl Profile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let gender: Option<String> = row.get("gender")?;
        Ok(Self {
            user_id: row.get("user_id")?,
            gender: gender.as_deref().and_then(Gender::from_str),
            birthdate: row.get("birthdate")?,
            height: row.get("height")?,
            weight: row.get("weight")?,
            weight_goal: row.get("weight_goal")?,
            activity_level: row.get("activity_level")?,
            bmr: row.get("bmr")?,
            calories_target: row.get("calories_target")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fat: row.get("fat")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get a profile by user
    pub fn get(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let result = conn.query_row(
            "SELECT * FROM profiles WHERE user_id = ?1",
            [user_id],
            Self::from_row,
        );
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a profile, creating an empty one with the default split if missing
    pub fn get_or_create(conn: &Connection, user_id: &str) -> DbResult<Self> {
        conn.execute(
            "INSERT OR IGNORE INTO profiles (user_id) VALUES (?1)",
            [user_id],
        )?;
        Self::get(conn, user_id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Update body attributes
    ///
    /// Changing gender, birthdate, height or weight without an explicit BMR
    /// recomputes the stored BMR when every input for it is known.
    pub fn update(conn: &Connection, user_id: &str, data: &ProfileUpdate) -> DbResult<Self> {
        Self::get_or_create(conn, user_id)?;

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        macro_rules! add_update {
            ($field:ident, $col:expr) => {
                if let Some(ref val) = data.$field {
                    updates.push(format!("{} = ?{}", $col, params_vec.len() + 1));
                    params_vec.push(Box::new(val.clone()));
                }
            };
        }

        add_update!(birthdate, "birthdate");
        add_update!(height, "height");
        add_update!(weight, "weight");
        add_update!(activity_level, "activity_level");
        add_update!(bmr, "bmr");

        if let Some(gender) = data.gender {
            updates.push(format!("gender = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(gender.as_str().to_string()));
        }

        if !updates.is_empty() {
            updates.push("updated_at = datetime('now')".to_string());
            let sql = format!(
                "UPDATE profiles SET {} WHERE user_id = ?{}",
                updates.join(", "),
                params_vec.len() + 1
            );
            params_vec.push(Box::new(user_id.to_string()));

            let params_refs: Vec<&dyn rusqlite::ToSql> =
                params_vec.iter().map(|p| p.as_ref()).collect();
            conn.execute(&sql, params_refs.as_slice())?;
        }

        let profile = Self::get_or_create(conn, user_id)?;
        if data.bmr.is_none() && data.changes_body() {
            let today = chrono::Local::now().date_naive();
            if let Some(bmr) = profile.estimated_bmr(today) {
                conn.execute(
                    "UPDATE profiles SET bmr = ?1 WHERE user_id = ?2",
                    params![bmr, user_id],
                )?;
                return Self::get_or_create(conn, user_id);
            }
        }

        Ok(profile)
    }

    /// Set the daily calorie target and, optionally, a goal weight
    pub fn set_energy_target(
        conn: &Connection,
        user_id: &str,
        calories_target: i64,
        weight_goal: Option<f64>,
    ) -> DbResult<Self> {
        Self::get_or_create(conn, user_id)?;
        conn.execute(
            r#"
            UPDATE profiles
            SET calories_target = ?1,
                weight_goal = COALESCE(?2, weight_goal),
                updated_at = datetime('now')
            WHERE user_id = ?3
            "#,
            params![calories_target.max(0), weight_goal, user_id],
        )?;
        Self::get_or_create(conn, user_id)
    }

    /// Set the macro split; it must add up to 100
    pub fn set_macro_split(conn: &Connection, user_id: &str, split: &MacroSplit) -> DbResult<Self> {
        split.validate()?;
        Self::get_or_create(conn, user_id)?;
        conn.execute(
            r#"
            UPDATE profiles
            SET protein = ?1, carbs = ?2, fat = ?3, updated_at = datetime('now')
            WHERE user_id = ?4
            "#,
            params![split.protein, split.carbs, split.fat, user_id],
        )?;
        Self::get_or_create(conn, user_id)
    }

    pub fn split(&self) -> MacroSplit {
        MacroSplit::new(self.protein, self.carbs, self.fat)
    }

    /// The values the target calculations read; missing body values are 0
    pub fn targets(&self) -> ProfileTargets {
        ProfileTargets {
            bmr: self.bmr,
            activity_level: self.activity_level,
            calories_target: self.calories_target,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            weight: self.weight.unwrap_or(0.0),
            height: self.height.unwrap_or(0.0),
        }
    }

    pub fn age_on(&self, today: NaiveDate) -> Option<i64> {
        self.birthdate
            .as_deref()
            .and_then(body::parse_birthdate)
            .map(|birth| body::age_on(birth, today))
    }

    /// Mifflin-St Jeor estimate from the stored attributes
    pub fn estimated_bmr(&self, today: NaiveDate) -> Option<f64> {
        let gender = self.gender?;
        let age = self.age_on(today)?;
        let kg = body::weight_kg(self.weight?);
        let cm = body::height_cm(self.height?);
        body::mifflin_st_jeor_bmr(kg, cm, age, gender)
    }
}
