//! Water log model

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::units::{ML_PER_CUP, ML_PER_FL_OZ};

/// Unit a water amount is logged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WaterUnit {
    #[default]
    Ml,
    Oz,
    Cup,
}

impl WaterUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaterUnit::Ml => "ml",
            WaterUnit::Oz => "oz",
            WaterUnit::Cup => "cup",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Some(WaterUnit::Ml)
            }
            "oz" | "fl oz" | "ounce" | "ounces" => Some(WaterUnit::Oz),
            "cup" | "cups" => Some(WaterUnit::Cup),
            _ => None,
        }
    }

    pub fn to_ml(&self, amount: f64) -> f64 {
        match self {
            WaterUnit::Ml => amount,
            WaterUnit::Oz => amount * ML_PER_FL_OZ,
            WaterUnit::Cup => amount * ML_PER_CUP,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterEntry {
    pub id: i64,
    pub user_id: String,
    pub amount: f64,
    pub unit: WaterUnit,
    pub logged_at: String,
    pub created_at: String,
}

impl WaterEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            amount: row.get("amount")?,
            unit: WaterUnit::from_str(row.get::<_, String>("unit")?.as_str()).unwrap_or_default(),
            logged_at: row.get("logged_at")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn ml(&self) -> f64 {
        self.unit.to_ml(self.amount)
    }

    /// Log water; negative amounts are stored as 0
    pub fn create(
        conn: &Connection,
        user_id: &str,
        amount: f64,
        unit: WaterUnit,
        logged_at: &str,
    ) -> DbResult<Self> {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        conn.execute(
            "INSERT INTO water_log (user_id, amount, unit, logged_at) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, amount, unit.as_str(), logged_at],
        )?;

        let id = conn.last_insert_rowid();
        conn.query_row("SELECT * FROM water_log WHERE id = ?1", [id], Self::from_row)
            .map_err(DbError::from)
    }

    pub fn list_for_date(conn: &Connection, user_id: &str, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM water_log WHERE user_id = ?1 AND logged_at = ?2 ORDER BY id ASC",
        )?;

        let entries = stmt
            .query_map(params![user_id, date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Total water for a date in ml
    pub fn total_ml(conn: &Connection, user_id: &str, date: &str) -> DbResult<f64> {
        let entries = Self::list_for_date(conn, user_id, date)?;
        Ok(entries.iter().map(|e| e.ml()).sum())
    }

    pub fn delete(conn: &Connection, user_id: &str, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM water_log WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_totals_in_ml() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        WaterEntry::create(&conn, "alice", 250.0, WaterUnit::Ml, "2024-05-01").unwrap();
        WaterEntry::create(&conn, "alice", 1.0, WaterUnit::Cup, "2024-05-01").unwrap();
        WaterEntry::create(&conn, "alice", 8.0, WaterUnit::Oz, "2024-05-02").unwrap();

        let total = WaterEntry::total_ml(&conn, "alice", "2024-05-01").unwrap();
        assert!((total - (250.0 + ML_PER_CUP)).abs() < 1e-9);
        assert_eq!(WaterEntry::total_ml(&conn, "bob", "2024-05-01").unwrap(), 0.0);
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!(WaterUnit::from_str("ML"), Some(WaterUnit::Ml));
        assert_eq!(WaterUnit::from_str(" fl oz "), Some(WaterUnit::Oz));
        assert_eq!(WaterUnit::from_str("cups"), Some(WaterUnit::Cup));
        assert_eq!(WaterUnit::from_str("liters"), None);
        assert_eq!(WaterUnit::from_str(""), None);
    }

    #[test]
    fn test_delete_is_scoped() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let entry = WaterEntry::create(&conn, "alice", -5.0, WaterUnit::Ml, "2024-05-01").unwrap();
        assert_eq!(entry.amount, 0.0);
        assert!(!WaterEntry::delete(&conn, "bob", entry.id).unwrap());
        assert!(WaterEntry::delete(&conn, "alice", entry.id).unwrap());
    }
}
