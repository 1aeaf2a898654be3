//! Energy and macro targets
//!
//! Derives energy expenditure, macro gram targets and remaining calories from
//! the profile's stored BMR, activity level, calorie target and macro split.

use serde::{Deserialize, Serialize};

use super::aggregator::{Macro, MacroTotals};
use super::body;
use super::error::{NutritionError, NutritionResult};

// ============================================================================
// Macro Split
// ============================================================================

/// Macro percentages of the calorie target (integers 0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

impl Default for MacroSplit {
    fn default() -> Self {
        Self { protein: 25, carbs: 45, fat: 30 }
    }
}

impl MacroSplit {
    pub fn new(protein: i64, carbs: i64, fat: i64) -> Self {
        Self { protein, carbs, fat }
    }

    pub fn total(&self) -> i64 {
        self.protein + self.carbs + self.fat
    }

    /// Each value must be 0-100 and the three must add up to 100
    pub fn validate(&self) -> NutritionResult<()> {
        let in_range = [self.protein, self.carbs, self.fat]
            .iter()
            .all(|p| (0..=100).contains(p));
        if !in_range || self.total() != 100 {
            return Err(NutritionError::InvalidMacroSplit(self.total()));
        }
        Ok(())
    }

    pub fn percent(&self, m: Macro) -> i64 {
        match m {
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        }
    }
}

// ============================================================================
// Energy Expenditure
// ============================================================================

/// Daily energy expenditure split into basal and activity parts
///
/// `activity_level` is the fraction added on top of BMR (0.2 means 20% more),
/// not a multiplier with a 1.x baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyBreakdown {
    pub bmr: i64,
    pub activity_calories: i64,
    pub total_expenditure: i64,
    pub bmr_percent: i64,
    pub activity_percent: i64,
}

impl EnergyBreakdown {
    /// Total is `bmr + round(bmr × activity_level)` on the unrounded BMR;
    /// only the reported figures are rounded to whole kcal.
    pub fn new(bmr: f64, activity_level: f64) -> Self {
        let bmr = non_negative(bmr);
        let activity_level = non_negative(activity_level);

        let activity_calories = (bmr * activity_level).round();
        let total = bmr + activity_calories;

        let (bmr_percent, activity_percent) = if total > 0.0 {
            (
                (bmr / total * 100.0).round() as i64,
                ((total - bmr) / total * 100.0).round() as i64,
            )
        } else {
            (0, 0)
        };

        Self {
            bmr: bmr.round() as i64,
            activity_calories: activity_calories as i64,
            total_expenditure: total.round() as i64,
            bmr_percent,
            activity_percent,
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

// ============================================================================
// Macro Targets
// ============================================================================

/// Gram targets per macro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

impl MacroTargets {
    /// `floor(target × percent / 100 / kcal per gram)` for each macro
    pub fn from_split(calories_target: i64, split: &MacroSplit) -> Self {
        let grams = |m: Macro| {
            let kcal = calories_target.max(0) as f64 * split.percent(m) as f64 / 100.0;
            (kcal / m.kcal_per_gram()).floor() as i64
        };
        Self {
            protein: grams(Macro::Protein),
            carbs: grams(Macro::Carbs),
            fat: grams(Macro::Fat),
        }
    }

    pub fn grams(&self, m: Macro) -> i64 {
        match m {
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        }
    }
}

// ============================================================================
// Remaining Calories
// ============================================================================

/// Signed calories left for the day; negative means over target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingCalories {
    pub remaining: i64,
    pub is_over: bool,
}

impl RemainingCalories {
    pub fn new(calories_target: i64, consumed: i64) -> Self {
        let remaining = calories_target - consumed;
        Self { remaining, is_over: remaining < 0 }
    }

    pub fn label(&self) -> &'static str {
        if self.is_over { "Over" } else { "Remaining" }
    }

    /// Unsigned amount to show next to the label
    pub fn magnitude(&self) -> i64 {
        self.remaining.abs()
    }
}

/// Consumed as a rounded percent of target; 0 when there is no target
pub fn progress_percent(consumed: f64, target: f64) -> i64 {
    if target <= 0.0 || !target.is_finite() {
        return 0;
    }
    (consumed / target * 100.0).round() as i64
}

// ============================================================================
// Reports
// ============================================================================

/// Target values handed to display code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSummary {
    pub total_expenditure: i64,
    pub bmr_percent: i64,
    pub activity_percent: i64,
    pub remaining_calories: i64,
    pub is_over: bool,
}

/// The profile values the calculations read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileTargets {
    #[serde(rename = "BMR")]
    pub bmr: f64,
    pub activity_level: f64,
    pub calories_target: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
    pub weight: f64,
    pub height: f64,
}

impl ProfileTargets {
    pub fn split(&self) -> MacroSplit {
        MacroSplit::new(self.protein, self.carbs, self.fat)
    }
}

/// Progress for one macro
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroProgress {
    pub consumed_grams: f64,
    pub target_grams: i64,
    pub percent_of_target: i64,
    pub percent_of_calories: i64,
}

/// Everything derived from a profile and a day's totals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetReport {
    pub energy: EnergyBreakdown,
    pub summary: TargetSummary,
    pub remaining_label: String,
    pub calorie_progress: i64,
    pub macro_targets: MacroTargets,
    pub protein: MacroProgress,
    pub carbs: MacroProgress,
    pub fat: MacroProgress,
    pub bmi: f64,
}

impl TargetReport {
    pub fn build(profile: &ProfileTargets, totals: &MacroTotals) -> Self {
        let energy = EnergyBreakdown::new(profile.bmr, profile.activity_level);
        let remaining = RemainingCalories::new(profile.calories_target, totals.total_calories);
        let macro_targets = MacroTargets::from_split(profile.calories_target, &profile.split());

        let progress = |m: Macro| MacroProgress {
            consumed_grams: totals.grams(m),
            target_grams: macro_targets.grams(m),
            percent_of_target: progress_percent(totals.grams(m), macro_targets.grams(m) as f64),
            percent_of_calories: totals.percent_of_calories(m),
        };

        Self {
            energy,
            summary: TargetSummary {
                total_expenditure: energy.total_expenditure,
                bmr_percent: energy.bmr_percent,
                activity_percent: energy.activity_percent,
                remaining_calories: remaining.remaining,
                is_over: remaining.is_over,
            },
            remaining_label: remaining.label().to_string(),
            calorie_progress: progress_percent(
                totals.total_calories as f64,
                profile.calories_target as f64,
            ),
            macro_targets,
            protein: progress(Macro::Protein),
            carbs: progress(Macro::Carbs),
            fat: progress(Macro::Fat),
            bmi: body::bmi(profile.weight, profile.height),
        }
    }
}
