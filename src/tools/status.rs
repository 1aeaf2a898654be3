//! Nutrilog Status Tool
//!
//! Runtime status of the service and the usage guide handed to assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Diary usage guide for AI assistants
pub const DIARY_INSTRUCTIONS: &str = r#"
# Nutrilog Diary Instructions

This guide explains how to keep a food diary with the Nutrilog tools.

## Overview

Every entry stores a food's macros for its **reference quantity** (100 g for
database lookups, the food's own serving for custom foods) together with the
serving the user chose. Normalized values are recomputed whenever an entry is
read, so changing a serving never drifts the numbers.

All tools act for the configured user.

---

## Food Records

Foods come in three shapes. Pass them as the `food` parameter exactly as you
received them:

| Shape | Recognized by | Reference quantity |
|-------|---------------|--------------------|
| Lookup | `fdcId` + `foodNutrients` | 100 × `servingSizeUnit` (default g) |
| Custom | `custom_food_id` | `serving_size` × `serving_unit` |
| Logged | `food_id` + `meal_type` | `reference_quantity` × `reference_unit` (default 100 g) |

Lookup nutrients are read by exact name: `Energy`, `Protein`,
`Carbohydrate, by difference` (or `Starch`), `Total lipid (fat)`. Energy in kJ
is converted to kcal. Missing energy is estimated as 4/4/9 kcal per gram.

---

## Servings and Units

- `serving_size` is clamped to 0-1000.
- `serving_unit` is a number followed by a unit: `100g`, `30 g`, `oz`, `1 slice`.
  A missing number means 1.
- Grams, ounces and milliliters convert to each other (1 ml = 1 g).
  Other unit words only match themselves.
- Call `preview_food` first to see the unit options and the macros for a serving.

---

## Logging Workflow

1. `preview_food(food, serving_size: 1, serving_unit: "100g")`
2. `log_food(date: "2026-01-13", meal_type: "breakfast", food, serving_size: 50, serving_unit: "g")`
3. `get_day_summary(date: "2026-01-13")`

Meal types: `breakfast`, `lunch`, `dinner`, `snack`, `uncategorized`.
Water goes through `log_water` (ml, oz or cup).

To log a saved custom food, pass `custom_food_id` instead of `food`.

---

## Targets

- Set body attributes with `update_profile`. BMR is recomputed
  (Mifflin-St Jeor) unless you pass one.
- `activity_level` is the fraction **added** above BMR: 0.2 means
  total = BMR + round(BMR × 0.2).
- `set_energy_target` sets the daily calorie target (and optional goal weight).
- `set_macro_targets` sets protein/carbs/fat percents; they must add up to 100.
- Gram targets are floor(target × percent / 100 / kcal per gram).

## Quick Reference

| Task | Tool |
|------|------|
| Service status | `nutrilog_status` |
| View profile and targets | `get_profile` |
| Preview a serving | `preview_food` |
| Log / view / edit / delete food | `log_food`, `get_food_entry`, `update_food_entry`, `delete_food_entry` |
| Day totals vs targets | `get_day_summary` |
| Days with entries | `list_log_dates` |
| Water | `log_water`, `delete_water_entry` |
| Custom foods | `add_custom_food`, `list_custom_foods`, `delete_custom_food` |
| Favorites | `add_favorite_food`, `list_favorite_foods`, `delete_favorite_food` |
"#;

/// Runtime status of the Nutrilog service
#[derive(Debug, Clone, Serialize)]
pub struct NutrilogStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub user_id: String,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Collects runtime information for the status tool
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    user_id: String,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, user_id: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            user_id: user_id.into(),
        }
    }

    pub fn get_status(&self) -> NutrilogStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutrilogStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            user_id: self.user_id.clone(),
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/nutrilog.db"), "alice");
        let status = tracker.get_status();
        assert_eq!(status.user_id, "alice");
        assert!(status.database_size_bytes.is_none());
        assert_eq!(status.process_id, std::process::id());
    }
}
