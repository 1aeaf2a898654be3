//! Macro aggregation across logged entries

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::meal::MealCategory;
use super::normalizer::NormalizedMacros;
use super::units::{KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN};

/// Rounding applied to a summed field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Nearest integer
    Whole,
    /// Two decimal places
    Hundredths,
}

impl Rounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::Whole => value.round(),
            Rounding::Hundredths => (value * 100.0).round() / 100.0,
        }
    }
}

/// Sum one field across entries, then round
pub fn sum_field<F>(entries: &[NormalizedMacros], field: F, rounding: Rounding) -> f64
where
    F: Fn(&NormalizedMacros) -> f64,
{
    rounding.apply(entries.iter().map(field).sum())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Macro {
    Protein,
    Carbs,
    Fat,
}

impl Macro {
    pub const ALL: [Macro; 3] = [Macro::Protein, Macro::Carbs, Macro::Fat];

    pub fn kcal_per_gram(self) -> f64 {
        match self {
            Macro::Protein => KCAL_PER_G_PROTEIN,
            Macro::Carbs => KCAL_PER_G_CARBS,
            Macro::Fat => KCAL_PER_G_FAT,
        }
    }
}

/// Summed macros for a group of entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroTotals {
    pub total_calories: i64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub calories_of_protein: i64,
    pub calories_of_carbs: i64,
    pub calories_of_fat: i64,
}

impl MacroTotals {
    pub fn grams(&self, m: Macro) -> f64 {
        match m {
            Macro::Protein => self.total_protein,
            Macro::Carbs => self.total_carbs,
            Macro::Fat => self.total_fat,
        }
    }

    pub fn calories_of(&self, m: Macro) -> i64 {
        match m {
            Macro::Protein => self.calories_of_protein,
            Macro::Carbs => self.calories_of_carbs,
            Macro::Fat => self.calories_of_fat,
        }
    }

    /// A macro's share of total consumed calories, rounded. 0 when nothing
    /// has been consumed.
    pub fn percent_of_calories(&self, m: Macro) -> i64 {
        if self.total_calories <= 0 {
            return 0;
        }
        (self.calories_of(m) as f64 / self.total_calories as f64 * 100.0).round() as i64
    }

    pub fn is_empty(&self) -> bool {
        self.total_protein == 0.0 && self.total_carbs == 0.0 && self.total_fat == 0.0
    }
}

/// Sum normalized entries. An empty slice gives all-zero totals.
pub fn aggregate(entries: &[NormalizedMacros]) -> MacroTotals {
    let calories = sum_field(entries, |e| e.calories as f64, Rounding::Whole);
    let protein: f64 = entries.iter().map(|e| e.protein).sum();
    let carbs: f64 = entries.iter().map(|e| e.carbs).sum();
    let fat: f64 = entries.iter().map(|e| e.fat).sum();

    MacroTotals {
        total_calories: calories as i64,
        total_protein: Rounding::Hundredths.apply(protein),
        total_carbs: Rounding::Hundredths.apply(carbs),
        total_fat: Rounding::Hundredths.apply(fat),
        calories_of_protein: (protein * Macro::Protein.kcal_per_gram()).round() as i64,
        calories_of_carbs: (carbs * Macro::Carbs.kcal_per_gram()).round() as i64,
        calories_of_fat: (fat * Macro::Fat.kcal_per_gram()).round() as i64,
    }
}

/// A day's totals, per meal category and overall
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DayAggregate {
    pub by_category: BTreeMap<MealCategory, MacroTotals>,
    pub total: MacroTotals,
}

impl DayAggregate {
    pub fn category(&self, category: MealCategory) -> MacroTotals {
        self.by_category.get(&category).cloned().unwrap_or_default()
    }
}

/// Partition entries by meal category and sum each group and the whole day
///
/// Every food category appears in the result, empty ones with zero totals.
pub fn aggregate_day<'a, I>(entries: I) -> DayAggregate
where
    I: IntoIterator<Item = (MealCategory, &'a NormalizedMacros)>,
{
    let mut groups: BTreeMap<MealCategory, Vec<NormalizedMacros>> =
        MealCategory::FOOD.iter().map(|c| (*c, Vec::new())).collect();
    let mut all = Vec::new();

    for (category, macros) in entries {
        groups.entry(category).or_default().push(macros.clone());
        all.push(macros.clone());
    }

    DayAggregate {
        by_category: groups.iter().map(|(c, group)| (*c, aggregate(group))).collect(),
        total: aggregate(&all),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(calories: i64, protein: f64, carbs: f64, fat: f64) -> NormalizedMacros {
        NormalizedMacros {
            calories,
            protein,
            carbs,
            fat,
            ..NormalizedMacros::default()
        }
    }

    #[test]
    fn test_empty_aggregate_is_zero() {
        let totals = aggregate(&[]);
        assert_eq!(totals, MacroTotals::default());
        for m in Macro::ALL {
            assert_eq!(totals.percent_of_calories(m), 0);
        }
        assert!(totals.is_empty());
    }

    #[test]
    fn test_sums_and_rounds() {
        let entries = vec![entry(190, 6.5, 34.0, 3.26), entry(250, 12.111, 20.0, 9.0)];
        let totals = aggregate(&entries);
        assert_eq!(totals.total_calories, 440);
        assert_eq!(totals.total_protein, 18.61);
        assert_eq!(totals.total_carbs, 54.0);
        assert_eq!(totals.total_fat, 12.26);
        assert_eq!(totals.calories_of_protein, 74);
        assert_eq!(totals.calories_of_carbs, 216);
        assert_eq!(totals.calories_of_fat, 110);
    }

    #[test]
    fn test_percent_of_calories() {
        let totals = aggregate(&[entry(400, 25.0, 50.0, 11.1)]);
        assert_eq!(totals.percent_of_calories(Macro::Protein), 25);
        assert_eq!(totals.percent_of_calories(Macro::Carbs), 50);
        assert_eq!(totals.percent_of_calories(Macro::Fat), 25);
    }

    #[test]
    fn test_sum_field_rounding_modes() {
        let entries = vec![entry(0, 1.234, 0.0, 0.0), entry(0, 1.0, 0.0, 0.0)];
        assert_eq!(sum_field(&entries, |e| e.protein, Rounding::Whole), 2.0);
        assert_eq!(sum_field(&entries, |e| e.protein, Rounding::Hundredths), 2.23);
    }

    #[test]
    fn test_aggregate_day_partitions() {
        let oats = entry(190, 6.5, 34.0, 3.25);
        let bar = entry(250, 12.0, 20.0, 9.0);
        let day = aggregate_day(vec![
            (MealCategory::Breakfast, &oats),
            (MealCategory::Snack, &bar),
            (MealCategory::Snack, &bar),
        ]);

        assert_eq!(day.category(MealCategory::Breakfast).total_calories, 190);
        assert_eq!(day.category(MealCategory::Snack).total_calories, 500);
        assert_eq!(day.category(MealCategory::Lunch), MacroTotals::default());
        assert_eq!(day.total.total_calories, 690);
        assert_eq!(day.by_category.len(), MealCategory::FOOD.len());
    }
}
