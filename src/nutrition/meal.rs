//! Meal categories

use serde::{Deserialize, Serialize};

/// Bucket a logged entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealCategory {
    Uncategorized,
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Water,
}

impl MealCategory {
    /// Categories a food entry can be logged under, in diary order
    pub const FOOD: [MealCategory; 5] = [
        MealCategory::Uncategorized,
        MealCategory::Breakfast,
        MealCategory::Lunch,
        MealCategory::Dinner,
        MealCategory::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealCategory::Uncategorized => "uncategorized",
            MealCategory::Breakfast => "breakfast",
            MealCategory::Lunch => "lunch",
            MealCategory::Dinner => "dinner",
            MealCategory::Snack => "snack",
            MealCategory::Water => "water",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => MealCategory::Breakfast,
            "lunch" => MealCategory::Lunch,
            "dinner" => MealCategory::Dinner,
            "snack" | "snacks" => MealCategory::Snack,
            "water" => MealCategory::Water,
            _ => MealCategory::Uncategorized,
        }
    }

    /// Heading shown in the diary
    pub fn title(&self) -> &'static str {
        match self {
            MealCategory::Uncategorized => "Uncategorized",
            MealCategory::Breakfast => "Breakfast",
            MealCategory::Lunch => "Lunch",
            MealCategory::Dinner => "Dinner",
            MealCategory::Snack => "Snacks",
            MealCategory::Water => "Water",
        }
    }

    pub fn is_food(&self) -> bool {
        *self != MealCategory::Water
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_titles() {
        assert_eq!(MealCategory::from_str("Snacks"), MealCategory::Snack);
        assert_eq!(MealCategory::from_str("BREAKFAST"), MealCategory::Breakfast);
        assert_eq!(MealCategory::from_str("brunch"), MealCategory::Uncategorized);
    }

    #[test]
    fn test_water_is_not_food() {
        assert!(!MealCategory::Water.is_food());
        assert!(MealCategory::FOOD.iter().all(|c| c.is_food()));
    }
}
