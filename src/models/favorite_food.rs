//! Favorite food model

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A bookmarked food; one per (user, food_id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteFood {
    pub id: i64,
    pub user_id: String,
    pub food_id: String,
    pub food_name: String,
    pub food_brand: String,
    pub created_at: String,
}

impl FavoriteFood {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            food_id: row.get("food_id")?,
            food_name: row.get("food_name")?,
            food_brand: row.get("food_brand")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Add a favorite. Adding one that exists returns the existing row.
    pub fn add(
        conn: &Connection,
        user_id: &str,
        food_id: &str,
        food_name: &str,
        food_brand: &str,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT OR IGNORE INTO favorite_foods (user_id, food_id, food_name, food_brand)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![user_id, food_id, food_name, food_brand],
        )?;

        let favorite = conn.query_row(
            "SELECT * FROM favorite_foods WHERE user_id = ?1 AND food_id = ?2",
            params![user_id, food_id],
            Self::from_row,
        )?;
        Ok(favorite)
    }

    pub fn is_favorite(conn: &Connection, user_id: &str, food_id: &str) -> DbResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM favorite_foods WHERE user_id = ?1 AND food_id = ?2",
            params![user_id, food_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn list(conn: &Connection, user_id: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM favorite_foods WHERE user_id = ?1 ORDER BY food_name ASC",
        )?;

        let favorites = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(favorites)
    }

    pub fn delete(conn: &Connection, user_id: &str, food_id: &str) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM favorite_foods WHERE user_id = ?1 AND food_id = ?2",
            params![user_id, food_id],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_favorites_are_unique_per_user() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let first = FavoriteFood::add(&conn, "alice", "171705", "Oats", "unknown").unwrap();
        let again = FavoriteFood::add(&conn, "alice", "171705", "Oats", "unknown").unwrap();
        assert_eq!(first.id, again.id);

        FavoriteFood::add(&conn, "bob", "171705", "Oats", "unknown").unwrap();
        assert_eq!(FavoriteFood::list(&conn, "alice").unwrap().len(), 1);

        assert!(FavoriteFood::is_favorite(&conn, "alice", "171705").unwrap());
        assert!(FavoriteFood::delete(&conn, "alice", "171705").unwrap());
        assert!(!FavoriteFood::is_favorite(&conn, "alice", "171705").unwrap());
        assert!(FavoriteFood::is_favorite(&conn, "bob", "171705").unwrap());
    }
}
