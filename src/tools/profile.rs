//! Profile MCP Tools
//!
//! Body attributes, energy target and macro split.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Profile, ProfileUpdate};
use crate::nutrition::body::{self, Gender};
use crate::nutrition::{EnergyBreakdown, MacroSplit, MacroTargets};

use super::parse_date;

/// Profile with everything derived from it
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Profile,
    pub age: Option<i64>,
    pub bmi: f64,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub height_feet: Option<i64>,
    pub height_inches: Option<f64>,
    pub energy: EnergyBreakdown,
    pub macro_targets: MacroTargets,
}

impl ProfileResponse {
    fn from_profile(profile: Profile) -> Self {
        let today = chrono::Local::now().date_naive();
        let feet_inches = profile.height.map(body::feet_and_inches);

        Self {
            age: profile.age_on(today),
            bmi: body::bmi(profile.weight.unwrap_or(0.0), profile.height.unwrap_or(0.0)),
            weight_kg: profile.weight.map(body::weight_kg),
            height_cm: profile.height.map(body::height_cm),
            height_feet: feet_inches.map(|(feet, _)| feet),
            height_inches: feet_inches.map(|(_, inches)| inches),
            energy: EnergyBreakdown::new(profile.bmr, profile.activity_level),
            macro_targets: MacroTargets::from_split(profile.calories_target, &profile.split()),
            profile,
        }
    }
}

/// Get the user's profile, creating an empty one on first use
pub fn get_profile(db: &Database, user_id: &str) -> Result<ProfileResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = Profile::get_or_create(&conn, user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?;

    Ok(ProfileResponse::from_profile(profile))
}

/// Update body attributes
pub fn update_profile(
    db: &Database,
    user_id: &str,
    gender: Option<&str>,
    birthdate: Option<&str>,
    height: Option<f64>,
    weight: Option<f64>,
    activity_level: Option<f64>,
    bmr: Option<f64>,
) -> Result<ProfileResponse, String> {
    let gender = match gender {
        Some(g) => Some(
            Gender::from_str(g).ok_or_else(|| format!("Invalid gender '{}', expected male or female", g))?,
        ),
        None => None,
    };
    let birthdate = birthdate.map(parse_date).transpose()?;

    for (name, value) in [("height", height), ("weight", weight), ("activity_level", activity_level), ("bmr", bmr)] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(format!("{} must be a non-negative number", name));
            }
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let data = ProfileUpdate {
        gender,
        birthdate,
        height,
        weight,
        activity_level,
        bmr,
    };

    let profile = Profile::update(&conn, user_id, &data)
        .map_err(|e| format!("Failed to update profile: {}", e))?;

    tracing::info!(user = user_id, bmr = profile.bmr, "Profile updated");
    Ok(ProfileResponse::from_profile(profile))
}

/// Set the daily calorie target and optional goal weight
pub fn set_energy_target(
    db: &Database,
    user_id: &str,
    calories_target: i64,
    weight_goal: Option<f64>,
) -> Result<ProfileResponse, String> {
    if calories_target < 0 {
        return Err("calories_target must not be negative".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = Profile::set_energy_target(&conn, user_id, calories_target, weight_goal)
        .map_err(|e| format!("Failed to set energy target: {}", e))?;

    Ok(ProfileResponse::from_profile(profile))
}

/// Set the macro split (percents of the calorie target, summing to 100)
pub fn set_macro_targets(
    db: &Database,
    user_id: &str,
    protein: i64,
    carbs: i64,
    fat: i64,
) -> Result<ProfileResponse, String> {
    let split = MacroSplit::new(protein, carbs, fat);
    split.validate().map_err(|e| e.to_string())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = Profile::set_macro_split(&conn, user_id, &split)
        .map_err(|e| format!("Failed to set macro targets: {}", e))?;

    Ok(ProfileResponse::from_profile(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(run_migrations).unwrap();
        db
    }

    #[test]
    fn test_profile_derivations() {
        let db = setup();
        update_profile(&db, "alice", Some("male"), Some("1990-01-01"), Some(70.0), Some(150.0), Some(0.2), Some(1500.0))
            .unwrap();
        let response = set_energy_target(&db, "alice", 2000, None).unwrap();

        assert_eq!(response.bmi, 21.5);
        assert_eq!(response.weight_kg, Some(69.0));
        assert_eq!(response.height_cm, Some(178.0));
        assert_eq!(response.height_feet, Some(5));
        assert_eq!(response.energy.total_expenditure, 1800);
        assert_eq!(response.energy.bmr_percent, 83);
        assert_eq!(response.macro_targets.protein, 125);
    }

    #[test]
    fn test_rejects_bad_input() {
        let db = setup();
        assert!(update_profile(&db, "alice", Some("x"), None, None, None, None, None).is_err());
        assert!(update_profile(&db, "alice", None, Some("01/01/1990"), None, None, None, None).is_err());
        assert!(update_profile(&db, "alice", None, None, Some(-1.0), None, None, None).is_err());
        assert!(set_energy_target(&db, "alice", -5, None).is_err());

        let err = set_macro_targets(&db, "alice", 40, 40, 30).unwrap_err();
        assert!(err.contains("110"));
    }

    #[test]
    fn test_empty_profile_is_zeroed() {
        let db = setup();
        let response = get_profile(&db, "new-user").unwrap();
        assert_eq!(response.bmi, 0.0);
        assert!(response.age.is_none());
        assert_eq!(response.energy.total_expenditure, 0);
        assert_eq!(response.profile.split(), MacroSplit::default());
    }
}
