//! Utility to seed a profile in the database
//!
//! Usage: set_profile <male|female> <birthdate> <height_in> <weight_lbs> <activity_level> [calories_target]

use nutrilog::config::Config;
use nutrilog::models::{Profile, ProfileUpdate};
use nutrilog::nutrition::body::Gender;

const USAGE: &str =
    "usage: set_profile <male|female> <YYYY-MM-DD> <height_in> <weight_lbs> <activity_level> [calories_target]";

fn parse_number(value: &str, name: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| format!("{} must be a non-negative number, got '{}'", name, value))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 5 {
        return Err(USAGE.into());
    }

    let gender = Gender::from_str(&args[0]).ok_or_else(|| format!("invalid gender '{}'", args[0]))?;
    let birthdate = nutrilog::tools::parse_date(&args[1])?;
    let update = ProfileUpdate {
        gender: Some(gender),
        birthdate: Some(birthdate),
        height: Some(parse_number(&args[2], "height")?),
        weight: Some(parse_number(&args[3], "weight")?),
        activity_level: Some(parse_number(&args[4], "activity_level")?),
        bmr: None,
    };
    let calories_target = args
        .get(5)
        .map(|v| v.parse::<i64>().map_err(|_| format!("invalid calories_target '{}'", v)))
        .transpose()?;

    let config = Config::from_env();
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    println!("Database path: {}", config.database_path.display());

    let database = nutrilog::db::Database::new(&config.database_path)?;
    database.with_conn(nutrilog::db::migrations::run_migrations)?;

    database.with_conn(|conn| {
        let mut profile = Profile::update(conn, &config.user_id, &update)?;
        if let Some(target) = calories_target {
            profile = Profile::set_energy_target(conn, &config.user_id, target, None)?;
        }
        println!("Profile set for '{}':", profile.user_id);
        println!("  Gender: {}", gender.as_str());
        println!("  Birthdate: {}", profile.birthdate.as_deref().unwrap_or("-"));
        println!("  BMR: {} kcal", profile.bmr);
        println!("  Calorie target: {} kcal", profile.calories_target);
        println!("  Updated: {}", profile.updated_at);
        Ok(())
    })?;

    Ok(())
}
