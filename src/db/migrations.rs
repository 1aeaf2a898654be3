//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PROFILES
        -- One row per user; body attributes and targets
        -- ============================================
        CREATE TABLE profiles (
            user_id TEXT PRIMARY KEY,
            gender TEXT CHECK(gender IN ('male', 'female')),
            birthdate TEXT,                      -- ISO date: "1990-06-15"
            height REAL,                         -- inches
            weight REAL,                         -- lbs
            weight_goal REAL,                    -- lbs
            activity_level REAL NOT NULL DEFAULT 0,  -- fraction added above BMR
            bmr REAL NOT NULL DEFAULT 0,         -- kcal/day
            calories_target INTEGER NOT NULL DEFAULT 0,

            -- Macro split, percent of calorie target
            protein INTEGER NOT NULL DEFAULT 25,
            carbs INTEGER NOT NULL DEFAULT 45,
            fat INTEGER NOT NULL DEFAULT 30,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- FOOD LOG
        -- Macros are stored per reference quantity,
        -- never multiplied by the serving
        -- ============================================
        CREATE TABLE food_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            food_id TEXT NOT NULL,               -- lookup id or custom food id
            food_name TEXT NOT NULL,
            food_brand TEXT NOT NULL DEFAULT 'unknown',

            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,     -- grams
            carbs REAL NOT NULL DEFAULT 0,       -- grams
            fat REAL NOT NULL DEFAULT 0,         -- grams
            reference_quantity REAL NOT NULL DEFAULT 100,
            reference_unit TEXT NOT NULL DEFAULT 'g',

            serving_size REAL NOT NULL,
            serving_unit TEXT NOT NULL,
            meal_type TEXT NOT NULL CHECK(meal_type IN ('breakfast', 'lunch', 'dinner', 'snack', 'uncategorized')),
            logged_at TEXT NOT NULL,             -- ISO date

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_log_user_date ON food_log(user_id, logged_at);

        -- ============================================
        -- WATER LOG
        -- ============================================
        CREATE TABLE water_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            amount REAL NOT NULL,
            unit TEXT NOT NULL CHECK(unit IN ('ml', 'oz', 'cup')),
            logged_at TEXT NOT NULL,             -- ISO date
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_water_log_user_date ON water_log(user_id, logged_at);

        -- ============================================
        -- CUSTOM FOODS
        -- User-created foods; macros per serving_size serving_unit
        -- ============================================
        CREATE TABLE custom_foods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            food_name TEXT NOT NULL,
            food_brand TEXT NOT NULL DEFAULT 'unknown',
            serving_size REAL NOT NULL,
            serving_unit TEXT NOT NULL,
            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,
            carbs REAL NOT NULL DEFAULT 0,
            fat REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_custom_foods_user ON custom_foods(user_id);

        -- ============================================
        -- FAVORITE FOODS
        -- ============================================
        CREATE TABLE favorite_foods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            food_id TEXT NOT NULL,
            food_name TEXT NOT NULL,
            food_brand TEXT NOT NULL DEFAULT 'unknown',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),

            UNIQUE(user_id, food_id)
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
