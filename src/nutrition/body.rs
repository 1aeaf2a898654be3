//! Body measurements: BMI, unit conversions, age and basal rate

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const LBS_PER_KG: f64 = 2.20462;
const CM_PER_INCH: f64 = 2.54;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Body mass index from pounds and inches, one decimal; 0 without a height
pub fn bmi(weight_lbs: f64, height_in: f64) -> f64 {
    if height_in <= 0.0 || !height_in.is_finite() || !weight_lbs.is_finite() {
        return 0.0;
    }
    (weight_lbs * 703.0 / (height_in * height_in) * 10.0).round() / 10.0
}

/// Whole kilograms, rounded up
pub fn weight_kg(weight_lbs: f64) -> f64 {
    (weight_lbs / LBS_PER_KG).ceil()
}

/// Whole centimeters, rounded up
pub fn height_cm(height_in: f64) -> f64 {
    (height_in * CM_PER_INCH).ceil()
}

/// Split inches into feet and the inches left over
pub fn feet_and_inches(height_in: f64) -> (i64, f64) {
    let feet = (height_in / 12.0).floor();
    (feet as i64, height_in - feet * 12.0)
}

pub fn parse_birthdate(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Full years between `birthdate` and `today`
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> i64 {
    let mut age = (today.year() - birthdate.year()) as i64;
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        age -= 1;
    }
    age.max(0)
}

/// Resting energy expenditure, Mifflin-St Jeor (1990):
/// `10 × kg + 6.25 × cm − 5 × age + (5 | −161)`
///
/// Returns None when an input is outside the range the equation was fit on.
pub fn mifflin_st_jeor_bmr(weight_kg: f64, height_cm: f64, age: i64, gender: Gender) -> Option<f64> {
    if !(weight_kg > 0.0 && weight_kg <= 300.0) || !(height_cm > 0.0 && height_cm <= 300.0) {
        return None;
    }
    if !(10..=120).contains(&age) {
        return None;
    }

    let offset = match gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };
    Some((10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64 + offset).round())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi() {
        assert_eq!(bmi(150.0, 70.0), 21.5);
        assert_eq!(bmi(150.0, 0.0), 0.0);
        assert_eq!(bmi(150.0, -3.0), 0.0);
    }

    #[test]
    fn test_metric_conversions_round_up() {
        assert_eq!(weight_kg(150.0), 69.0);
        assert_eq!(height_cm(70.0), 178.0);
    }

    #[test]
    fn test_feet_and_inches() {
        assert_eq!(feet_and_inches(70.0), (5, 10.0));
        assert_eq!(feet_and_inches(72.0), (6, 0.0));
    }

    #[test]
    fn test_age_counts_birthday() {
        let birth = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        let before = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        let on = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(age_on(birth, before), 33);
        assert_eq!(age_on(birth, on), 34);
    }

    #[test]
    fn test_mifflin_st_jeor() {
        // 10*69 + 6.25*178 - 5*34 + 5 = 1637.5
        assert_eq!(mifflin_st_jeor_bmr(69.0, 178.0, 34, Gender::Male), Some(1638.0));
        assert_eq!(mifflin_st_jeor_bmr(69.0, 178.0, 34, Gender::Female), Some(1472.0));
        assert_eq!(mifflin_st_jeor_bmr(0.0, 178.0, 34, Gender::Male), None);
        assert_eq!(mifflin_st_jeor_bmr(69.0, 178.0, 5, Gender::Male), None);
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!(Gender::from_str("Female"), Some(Gender::Female));
        assert_eq!(Gender::from_str("x"), None);
    }
}
