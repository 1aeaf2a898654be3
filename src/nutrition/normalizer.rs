//! Serving normalization
//!
//! Turns a food record in any of its three shapes into the macros implied by
//! a chosen serving size and unit.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::error::{NutritionError, NutritionResult};
use super::meal::MealCategory;
use super::targets::MacroSplit;
use super::units::{
    format_quantity, parse_unit, ParsedUnit, ServingUnit, KCAL_PER_G_CARBS, KCAL_PER_G_FAT,
    KCAL_PER_G_PROTEIN, KJ_PER_KCAL,
};

/// Largest serving a user can choose
pub const MAX_SERVING: f64 = 1000.0;

/// Reference quantity for lookup records (nutrients are reported per 100 units)
pub const LOOKUP_REFERENCE_QUANTITY: f64 = 100.0;

/// Brand stored when a food has none
pub const UNKNOWN_BRAND: &str = "unknown";

const ENERGY: &str = "Energy";
const PROTEIN: &str = "Protein";
const CARBS: &str = "Carbohydrate, by difference";
const CARBS_FALLBACK: &str = "Starch";
const FAT: &str = "Total lipid (fat)";

// ============================================================================
// Food Record Shapes
// ============================================================================

/// One entry of a lookup record's nutrient list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodNutrient {
    pub name: String,
    #[serde(rename = "unitName", default)]
    pub unit_name: String,
    #[serde(default)]
    pub value: f64,
}

/// A food as returned by the external nutrition database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupFood {
    pub fdc_id: i64,
    pub description: String,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub serving_size_unit: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

/// A food the user created; macros are per `serving_size serving_unit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFood {
    pub custom_food_id: i64,
    pub food_name: String,
    #[serde(default = "default_brand")]
    pub food_brand: String,
    pub serving_size: f64,
    pub serving_unit: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

/// A diary entry; macros are per `reference_quantity reference_unit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedFood {
    #[serde(default)]
    pub id: Option<i64>,
    pub food_id: String,
    pub food_name: String,
    #[serde(default = "default_brand")]
    pub food_brand: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    pub serving_size: f64,
    pub serving_unit: String,
    pub meal_type: MealCategory,
    pub logged_at: String,
    #[serde(default = "default_reference_quantity")]
    pub reference_quantity: f64,
    #[serde(default = "default_reference_unit")]
    pub reference_unit: String,
}

fn default_brand() -> String {
    UNKNOWN_BRAND.to_string()
}

fn default_reference_quantity() -> f64 {
    LOOKUP_REFERENCE_QUANTITY
}

fn default_reference_unit() -> String {
    "g".to_string()
}

/// A food record in one of its three shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FoodRecord {
    Lookup(LookupFood),
    Custom(CustomFood),
    Logged(LoggedFood),
}

impl FoodRecord {
    /// Detect the shape of an untyped record and decode it
    ///
    /// - `fdcId` and `foodNutrients` -> lookup record
    /// - `custom_food_id` -> custom food
    /// - `food_id` and `meal_type` -> logged entry
    pub fn from_value(value: Value) -> NutritionResult<Self> {
        let obj = value.as_object().ok_or_else(|| {
            NutritionError::UnrecognizedFoodRecord("expected a JSON object".to_string())
        })?;

        if obj.contains_key("fdcId") && obj.contains_key("foodNutrients") {
            Ok(FoodRecord::Lookup(serde_json::from_value(value)?))
        } else if obj.contains_key("custom_food_id") {
            Ok(FoodRecord::Custom(serde_json::from_value(value)?))
        } else if obj.contains_key("food_id") && obj.contains_key("meal_type") {
            Ok(FoodRecord::Logged(serde_json::from_value(value)?))
        } else {
            let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
            Err(NutritionError::UnrecognizedFoodRecord(format!(
                "no known shape matches keys [{}]",
                keys.join(", ")
            )))
        }
    }

    /// Identifier of the underlying food
    pub fn food_id(&self) -> String {
        match self {
            FoodRecord::Lookup(food) => food.fdc_id.to_string(),
            FoodRecord::Custom(food) => food.custom_food_id.to_string(),
            FoodRecord::Logged(food) => food.food_id.clone(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FoodRecord::Lookup(food) => &food.description,
            FoodRecord::Custom(food) => &food.food_name,
            FoodRecord::Logged(food) => &food.food_name,
        }
    }

    pub fn brand(&self) -> &str {
        match self {
            FoodRecord::Lookup(food) => food
                .brand_name
                .as_deref()
                .filter(|b| !b.trim().is_empty())
                .unwrap_or(UNKNOWN_BRAND),
            FoodRecord::Custom(food) => &food.food_brand,
            FoodRecord::Logged(food) => &food.food_brand,
        }
    }

    /// The quantity the record's macros are reported against
    pub fn reference(&self) -> NutritionResult<ParsedUnit> {
        match self {
            FoodRecord::Lookup(food) => {
                let unit = match food.serving_size_unit.as_deref() {
                    Some(token) if !token.trim().is_empty() => ServingUnit::from_token(token)
                        .ok_or_else(|| NutritionError::InvalidUnit(token.to_string()))?,
                    _ => ServingUnit::Gram,
                };
                Ok(ParsedUnit::new(LOOKUP_REFERENCE_QUANTITY, unit))
            }
            FoodRecord::Custom(food) => {
                let parsed = parse_unit(&food.serving_unit)?;
                Ok(ParsedUnit::new(food.serving_size * parsed.quantity, parsed.unit))
            }
            FoodRecord::Logged(food) => {
                let parsed = parse_unit(&food.reference_unit)?;
                Ok(ParsedUnit::new(food.reference_quantity * parsed.quantity, parsed.unit))
            }
        }
    }

    /// Unit string a new serving starts from ("100g" for lookups, "30g" for a
    /// 30 g custom food, the chosen unit for logged entries)
    pub fn native_unit(&self) -> String {
        match self {
            FoodRecord::Logged(food) => food.serving_unit.clone(),
            FoodRecord::Custom(food) => match self.reference() {
                Ok(reference) => reference.to_unit_string(),
                Err(_) => {
                    format!("{}{}", format_quantity(food.serving_size), food.serving_unit.trim())
                }
            },
            FoodRecord::Lookup(food) => match food.serving_size_unit.as_deref() {
                Some(token) if !token.trim().is_empty() => {
                    format!("{}{}", format_quantity(LOOKUP_REFERENCE_QUANTITY), token.trim())
                }
                _ => "100g".to_string(),
            },
        }
    }

    /// Serving size and unit a new serving starts from
    pub fn default_serving(&self) -> (f64, String) {
        match self {
            FoodRecord::Logged(food) => (food.serving_size, food.serving_unit.clone()),
            _ => (1.0, self.native_unit()),
        }
    }

    /// Units offered when choosing a serving, native unit first, no duplicates
    pub fn unit_options(&self) -> Vec<String> {
        let mut options: Vec<String> = Vec::new();
        for option in [self.native_unit(), "100g".into(), "g".into(), "oz".into()] {
            if !option.is_empty() && !options.contains(&option) {
                options.push(option);
            }
        }
        options
    }

    /// Macros for the reference quantity
    pub fn base_macros(&self) -> BaseMacros {
        match self {
            FoodRecord::Lookup(food) => lookup_macros(&food.food_nutrients),
            FoodRecord::Custom(food) => {
                BaseMacros::grams(food.calories, food.protein, food.carbs, food.fat)
            }
            FoodRecord::Logged(food) => {
                BaseMacros::grams(food.calories, food.protein, food.carbs, food.fat)
            }
        }
    }
}

impl<'de> Deserialize<'de> for FoodRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FoodRecord::from_value(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Macro Extraction
// ============================================================================

/// Macros reported for a food's reference quantity
#[derive(Debug, Clone, PartialEq)]
pub struct BaseMacros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub protein_unit: String,
    pub carbs_unit: String,
    pub fat_unit: String,
}

impl BaseMacros {
    fn grams(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories: finite_or_zero(calories),
            protein: finite_or_zero(protein),
            carbs: finite_or_zero(carbs),
            fat: finite_or_zero(fat),
            protein_unit: "g".to_string(),
            carbs_unit: "g".to_string(),
            fat_unit: "g".to_string(),
        }
    }

    /// Scale to a serving; calories are rounded to whole kcal
    pub fn scale(&self, multiplier: f64) -> NormalizedMacros {
        NormalizedMacros {
            calories: (self.calories * multiplier).round() as i64,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
            protein_unit: self.protein_unit.clone(),
            carbs_unit: self.carbs_unit.clone(),
            fat_unit: self.fat_unit.clone(),
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Find the first nutrient matching any of the names, in order of preference
fn find_nutrient<'a>(nutrients: &'a [FoodNutrient], names: &[&str]) -> Option<&'a FoodNutrient> {
    names
        .iter()
        .find_map(|name| nutrients.iter().find(|n| n.name == *name))
}

/// Energy in kcal; a kcal entry wins over a kJ one
fn energy_kcal(nutrients: &[FoodNutrient]) -> Option<f64> {
    let entries: Vec<&FoodNutrient> = nutrients.iter().filter(|n| n.name == ENERGY).collect();

    if let Some(kcal) = entries.iter().find(|n| n.unit_name.eq_ignore_ascii_case("kcal")) {
        return Some(kcal.value);
    }
    entries.first().map(|n| {
        if n.unit_name.eq_ignore_ascii_case("kj") {
            n.value / KJ_PER_KCAL
        } else {
            n.value
        }
    })
}

fn unit_label(nutrient: Option<&FoodNutrient>) -> String {
    nutrient
        .map(|n| n.unit_name.trim().to_lowercase())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "g".to_string())
}

fn lookup_macros(nutrients: &[FoodNutrient]) -> BaseMacros {
    let protein = find_nutrient(nutrients, &[PROTEIN]);
    let carbs = find_nutrient(nutrients, &[CARBS, CARBS_FALLBACK]);
    let fat = find_nutrient(nutrients, &[FAT]);

    let protein_g = finite_or_zero(protein.map(|n| n.value).unwrap_or(0.0));
    let carbs_g = finite_or_zero(carbs.map(|n| n.value).unwrap_or(0.0));
    let fat_g = finite_or_zero(fat.map(|n| n.value).unwrap_or(0.0));

    let calories = energy_kcal(nutrients).map(finite_or_zero).unwrap_or_else(|| {
        (protein_g * KCAL_PER_G_PROTEIN + carbs_g * KCAL_PER_G_CARBS + fat_g * KCAL_PER_G_FAT)
            .round()
    });

    BaseMacros {
        calories,
        protein: protein_g,
        carbs: carbs_g,
        fat: fat_g,
        protein_unit: unit_label(protein),
        carbs_unit: unit_label(carbs),
        fat_unit: unit_label(fat),
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Macros for one serving, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMacros {
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub protein_unit: String,
    pub carbs_unit: String,
    pub fat_unit: String,
}

impl Default for NormalizedMacros {
    fn default() -> Self {
        Self {
            calories: 0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
            protein_unit: "g".to_string(),
            carbs_unit: "g".to_string(),
            fat_unit: "g".to_string(),
        }
    }
}

impl NormalizedMacros {
    /// True when protein, carbs and fat are all zero; display a placeholder
    /// instead of a chart in that case
    pub fn is_empty(&self) -> bool {
        self.protein == 0.0 && self.carbs == 0.0 && self.fat == 0.0
    }

    /// Each macro's share of the total grams, as rounded percents
    pub fn macro_split(&self) -> MacroSplit {
        let total = self.protein + self.carbs + self.fat;
        if total <= 0.0 {
            return MacroSplit { protein: 0, carbs: 0, fat: 0 };
        }
        let share = |grams: f64| (grams / total * 100.0).round() as i64;
        MacroSplit {
            protein: share(self.protein),
            carbs: share(self.carbs),
            fat: share(self.fat),
        }
    }
}

/// Clamp a serving to [0, 1000]; NaN becomes 0
pub fn clamp_serving(serving: f64) -> f64 {
    if serving.is_nan() {
        0.0
    } else {
        serving.clamp(0.0, MAX_SERVING)
    }
}

/// Parse a typed serving like an integer field: leading digits only,
/// anything unparseable is 0, then clamped
pub fn parse_serving_input(input: &str) -> f64 {
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());

    match digits[..end].parse::<f64>() {
        Ok(value) if negative => clamp_serving(-value),
        Ok(value) => clamp_serving(value),
        Err(_) => 0.0,
    }
}

/// Normalize a food's macros to `serving` × `unit`
///
/// The multiplier is the chosen amount divided by the record's reference
/// quantity, both expressed in the reference's unit.
pub fn normalize(serving: f64, unit: &str, food: &FoodRecord) -> NutritionResult<NormalizedMacros> {
    let serving = clamp_serving(serving);
    let target = parse_unit(unit)?;
    let reference = food.reference()?;

    let target_amount = serving * target.amount_in(&reference.unit)?;
    let multiplier = if reference.quantity > 0.0 {
        target_amount / reference.quantity
    } else {
        tracing::warn!(food = food.name(), "Reference quantity is zero; normalizing to zero");
        0.0
    };

    Ok(food.base_macros().scale(multiplier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lookup_json() -> Value {
        json!({
            "fdcId": 171705,
            "description": "Oats",
            "brandName": "Acme",
            "servingSizeUnit": "g",
            "foodNutrients": [
                {"name": "Energy", "unitName": "KCAL", "value": 380.0},
                {"name": "Protein", "unitName": "G", "value": 13.0},
                {"name": "Carbohydrate, by difference", "unitName": "G", "value": 68.0},
                {"name": "Total lipid (fat)", "unitName": "G", "value": 6.5}
            ]
        })
    }

    fn custom_food() -> FoodRecord {
        FoodRecord::Custom(CustomFood {
            custom_food_id: 7,
            food_name: "Protein bar".to_string(),
            food_brand: "Homemade".to_string(),
            serving_size: 30.0,
            serving_unit: "g".to_string(),
            calories: 250.0,
            protein: 12.5,
            carbs: 20.25,
            fat: 9.1,
        })
    }

    #[test]
    fn test_detects_each_shape() {
        let lookup = FoodRecord::from_value(lookup_json()).unwrap();
        assert!(matches!(lookup, FoodRecord::Lookup(_)));

        let custom = FoodRecord::from_value(json!({
            "custom_food_id": 3, "food_name": "Bar", "food_brand": "unknown",
            "serving_size": 30, "serving_unit": "g",
            "calories": 200, "protein": 10, "carbs": 20, "fat": 8
        }))
        .unwrap();
        assert!(matches!(custom, FoodRecord::Custom(_)));

        let logged = FoodRecord::from_value(json!({
            "food_id": "171705", "food_name": "Oats", "food_brand": "unknown",
            "calories": 380, "protein": 13, "carbs": 68, "fat": 6.5,
            "serving_size": 50, "serving_unit": "g",
            "meal_type": "breakfast", "logged_at": "2024-05-01"
        }))
        .unwrap();
        match logged {
            FoodRecord::Logged(food) => {
                assert_eq!(food.reference_quantity, 100.0);
                assert_eq!(food.reference_unit, "g");
            }
            other => panic!("expected logged record, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_shape_is_an_error() {
        let err = FoodRecord::from_value(json!({"name": "mystery", "kcal": 10})).unwrap_err();
        assert!(matches!(err, NutritionError::UnrecognizedFoodRecord(_)));

        let err = FoodRecord::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, NutritionError::UnrecognizedFoodRecord(_)));
    }

    #[test]
    fn test_lookup_at_default_serving() {
        let food = FoodRecord::from_value(lookup_json()).unwrap();
        let (serving, unit) = food.default_serving();
        assert_eq!(unit, "100g");

        let macros = normalize(serving, &unit, &food).unwrap();
        assert_eq!(macros.calories, 380);
        assert_eq!(macros.protein, 13.0);
        assert_eq!(macros.carbs, 68.0);
        assert_eq!(macros.fat, 6.5);
        assert_eq!(macros.protein_unit, "g");
    }

    #[test]
    fn test_scales_by_grams() {
        let food = FoodRecord::from_value(lookup_json()).unwrap();
        let macros = normalize(50.0, "g", &food).unwrap();
        assert_eq!(macros.calories, 190);
        assert!((macros.protein - 6.5).abs() < 1e-9);
        assert!((macros.fat - 3.25).abs() < 1e-9);
    }

    #[test]
    fn test_calories_scale_linearly() {
        let food = FoodRecord::from_value(lookup_json()).unwrap();
        for serving in [1.0, 7.0, 25.0, 150.0, 500.0] {
            let single = normalize(serving, "g", &food).unwrap();
            let double = normalize(serving * 2.0, "g", &food).unwrap();
            assert!((double.calories - 2 * single.calories).abs() <= 1);
        }
    }

    #[test]
    fn test_zero_serving_is_zero_calories() {
        let food = FoodRecord::from_value(lookup_json()).unwrap();
        assert_eq!(normalize(0.0, "g", &food).unwrap().calories, 0);
        assert_eq!(normalize(0.0, "100g", &custom_food()).unwrap().calories, 0);
    }

    #[test]
    fn test_kilojoules_convert_to_kcal() {
        let food = FoodRecord::from_value(json!({
            "fdcId": 1,
            "description": "Juice",
            "foodNutrients": [{"name": "Energy", "unitName": "kJ", "value": 418.4}]
        }))
        .unwrap();
        assert_eq!(normalize(1.0, "100g", &food).unwrap().calories, 100);
        assert_eq!(normalize(2.0, "100g", &food).unwrap().calories, 200);
    }

    #[test]
    fn test_missing_energy_is_derived_from_macros() {
        let food = FoodRecord::from_value(json!({
            "fdcId": 2,
            "description": "Mix",
            "foodNutrients": [
                {"name": "Protein", "unitName": "G", "value": 10.0},
                {"name": "Starch", "unitName": "G", "value": 20.0},
                {"name": "Total lipid (fat)", "unitName": "G", "value": 5.0}
            ]
        }))
        .unwrap();
        let macros = normalize(1.0, "100g", &food).unwrap();
        assert_eq!(macros.calories, 165);
        assert_eq!(macros.carbs, 20.0);
    }

    #[test]
    fn test_nutrient_names_are_case_sensitive() {
        let food = FoodRecord::from_value(json!({
            "fdcId": 3,
            "description": "Odd",
            "foodNutrients": [{"name": "protein", "unitName": "G", "value": 10.0}]
        }))
        .unwrap();
        let macros = normalize(1.0, "100g", &food).unwrap();
        assert!(macros.is_empty());
        assert_eq!(macros.calories, 0);
    }

    #[test]
    fn test_custom_food_round_trip() {
        let food = custom_food();
        let (serving, unit) = food.default_serving();
        assert_eq!(unit, "30g");

        let macros = normalize(serving, &unit, &food).unwrap();
        assert_eq!(macros.calories, 250);
        assert_eq!(macros.protein, 12.5);
        assert_eq!(macros.carbs, 20.25);
        assert_eq!(macros.fat, 9.1);
    }

    #[test]
    fn test_custom_food_with_quantity_in_unit_round_trips() {
        let cases = [(1.0, "100g", "100g"), (1.0, "2 slice", "2 slice"), (2.0, "50g", "100g")];
        for (serving_size, serving_unit, expected_unit) in cases {
            let food = FoodRecord::Custom(CustomFood {
                custom_food_id: 9,
                food_name: "Bread".to_string(),
                food_brand: UNKNOWN_BRAND.to_string(),
                serving_size,
                serving_unit: serving_unit.to_string(),
                calories: 60.0,
                protein: 2.0,
                carbs: 11.0,
                fat: 1.5,
            });

            let (serving, unit) = food.default_serving();
            assert_eq!(unit, expected_unit);
            assert_eq!(food.unit_options()[0], expected_unit);

            let macros = normalize(serving, &unit, &food).unwrap();
            assert_eq!(macros.calories, 60);
            assert_eq!(macros.protein, 2.0);
            assert_eq!(macros.carbs, 11.0);
            assert_eq!(macros.fat, 1.5);
        }
    }

    #[test]
    fn test_logged_entry_uses_stored_reference() {
        let food = FoodRecord::Logged(LoggedFood {
            id: Some(1),
            food_id: "7".to_string(),
            food_name: "Protein bar".to_string(),
            food_brand: UNKNOWN_BRAND.to_string(),
            calories: 250.0,
            protein: 12.0,
            carbs: 20.0,
            fat: 9.0,
            serving_size: 60.0,
            serving_unit: "g".to_string(),
            meal_type: MealCategory::Snack,
            logged_at: "2024-05-01".to_string(),
            reference_quantity: 30.0,
            reference_unit: "g".to_string(),
        });
        let (serving, unit) = food.default_serving();
        let macros = normalize(serving, &unit, &food).unwrap();
        assert_eq!(macros.calories, 500);
        assert_eq!(macros.protein, 24.0);
    }

    #[test]
    fn test_serving_is_clamped() {
        let food = FoodRecord::from_value(lookup_json()).unwrap();
        let capped = normalize(5000.0, "g", &food).unwrap();
        let max = normalize(MAX_SERVING, "g", &food).unwrap();
        assert_eq!(capped, max);

        let negative = normalize(-10.0, "g", &food).unwrap();
        assert_eq!(negative.calories, 0);

        let nan = normalize(f64::NAN, "g", &food).unwrap();
        assert_eq!(nan.calories, 0);
    }

    #[test]
    fn test_parse_serving_input() {
        assert_eq!(parse_serving_input("12"), 12.0);
        assert_eq!(parse_serving_input("12abc"), 12.0);
        assert_eq!(parse_serving_input("abc"), 0.0);
        assert_eq!(parse_serving_input("-4"), 0.0);
        assert_eq!(parse_serving_input("2500"), 1000.0);
        assert_eq!(parse_serving_input("1.9"), 1.0);
    }

    #[test]
    fn test_ounces_convert_against_gram_reference() {
        let food = FoodRecord::from_value(lookup_json()).unwrap();
        let macros = normalize(1.0, "oz", &food).unwrap();
        assert!((macros.protein - 13.0 * 0.283495).abs() < 1e-9);
    }

    #[test]
    fn test_bad_unit_is_an_error() {
        let food = FoodRecord::from_value(lookup_json()).unwrap();
        assert!(matches!(
            normalize(1.0, "10g5", &food),
            Err(NutritionError::InvalidUnit(_))
        ));
        assert!(matches!(
            normalize(1.0, "slice", &food),
            Err(NutritionError::IncompatibleUnits { .. })
        ));
    }

    #[test]
    fn test_macro_split_of_grams() {
        let macros = NormalizedMacros {
            protein: 25.0,
            carbs: 50.0,
            fat: 25.0,
            ..NormalizedMacros::default()
        };
        let split = macros.macro_split();
        assert_eq!((split.protein, split.carbs, split.fat), (25, 50, 25));

        let empty = NormalizedMacros::default().macro_split();
        assert_eq!((empty.protein, empty.carbs, empty.fat), (0, 0, 0));
    }

    #[test]
    fn test_unit_options_are_unique() {
        let food = FoodRecord::from_value(lookup_json()).unwrap();
        assert_eq!(food.unit_options(), vec!["100g", "g", "oz"]);
        assert_eq!(custom_food().unit_options(), vec!["30g", "100g", "g", "oz"]);
    }
}
