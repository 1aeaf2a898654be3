//! Serving units and conversion constants
//!
//! Parses serving unit strings like "100g", "30 g" or "oz" into an explicit
//! quantity and unit, and converts amounts between compatible units.

use serde::{Deserialize, Serialize};

use super::error::{NutritionError, NutritionResult};

// ============================================================================
// Energy Constants
// ============================================================================

/// Kilojoules per kilocalorie
pub const KJ_PER_KCAL: f64 = 4.184;
/// Kilocalories per gram of protein
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// Kilocalories per gram of carbohydrate
pub const KCAL_PER_G_CARBS: f64 = 4.0;
/// Kilocalories per gram of fat
pub const KCAL_PER_G_FAT: f64 = 9.0;

// ============================================================================
// Weight / Volume Constants
// ============================================================================

/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Milliliters per fluid ounce
pub const ML_PER_FL_OZ: f64 = 29.5735;
/// Milliliters per cup (US)
pub const ML_PER_CUP: f64 = 236.588;

/// Unit a serving is measured in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServingUnit {
    Gram,
    Ounce,
    /// Treated at water density (1 ml = 1 g)
    Milliliter,
    /// Any other unit word ("slice", "cup", "bar"); only converts to itself
    Named(String),
}

impl ServingUnit {
    /// Recognize a unit token. Returns None for empty or malformed tokens.
    pub fn from_token(token: &str) -> Option<Self> {
        let lower = token.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        if !lower.chars().all(|c| c.is_alphabetic() || c == ' ' || c == '_') {
            return None;
        }

        let unit = match lower.as_str() {
            "g" | "gram" | "grams" | "grm" => ServingUnit::Gram,
            "oz" | "ounce" | "ounces" | "onz" => ServingUnit::Ounce,
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" | "mlt" => {
                ServingUnit::Milliliter
            }
            _ => ServingUnit::Named(lower),
        };
        Some(unit)
    }

    /// Canonical token for this unit
    pub fn as_str(&self) -> &str {
        match self {
            ServingUnit::Gram => "g",
            ServingUnit::Ounce => "oz",
            ServingUnit::Milliliter => "ml",
            ServingUnit::Named(name) => name,
        }
    }

    /// Grams in one of this unit, if it has a known mass
    pub fn grams_per_unit(&self) -> Option<f64> {
        match self {
            ServingUnit::Gram => Some(1.0),
            ServingUnit::Ounce => Some(G_PER_OZ),
            ServingUnit::Milliliter => Some(1.0),
            ServingUnit::Named(_) => None,
        }
    }
}

/// A unit string split into its numeric prefix and unit
///
/// Examples:
/// - "100g" -> ParsedUnit { quantity: 100.0, unit: Gram }
/// - "g" -> ParsedUnit { quantity: 1.0, unit: Gram }
/// - "2 slice" -> ParsedUnit { quantity: 2.0, unit: Named("slice") }
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUnit {
    pub quantity: f64,
    pub unit: ServingUnit,
}

impl ParsedUnit {
    pub fn new(quantity: f64, unit: ServingUnit) -> Self {
        Self { quantity, unit }
    }

    /// Express this quantity in another unit
    pub fn amount_in(&self, target: &ServingUnit) -> NutritionResult<f64> {
        if &self.unit == target {
            return Ok(self.quantity);
        }

        match (self.unit.grams_per_unit(), target.grams_per_unit()) {
            (Some(from), Some(to)) => Ok(self.quantity * from / to),
            _ => Err(NutritionError::IncompatibleUnits {
                from: self.unit.as_str().to_string(),
                to: target.as_str().to_string(),
            }),
        }
    }

    /// Render back to a compact unit string ("100g", "2.5oz", "1 slice")
    pub fn to_unit_string(&self) -> String {
        let quantity = format_quantity(self.quantity);
        match self.unit {
            ServingUnit::Named(ref name) => format!("{} {}", quantity, name),
            ref unit => format!("{}{}", quantity, unit.as_str()),
        }
    }
}

/// Parse a unit string into quantity and unit
///
/// A missing numeric prefix means a quantity of 1. Prefixes that do not parse
/// as a positive number, and unit tokens that are empty or contain anything
/// other than letters, are rejected.
pub fn parse_unit(unit_str: &str) -> NutritionResult<ParsedUnit> {
    let trimmed = unit_str.trim();
    let invalid = || NutritionError::InvalidUnit(unit_str.to_string());

    let split_at = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, token) = trimmed.split_at(split_at);

    let quantity = if number.is_empty() {
        1.0
    } else {
        number.parse::<f64>().map_err(|_| invalid())?
    };
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(invalid());
    }

    let unit = ServingUnit::from_token(token).ok_or_else(invalid)?;
    Ok(ParsedUnit { quantity, unit })
}

/// Format a quantity without a trailing ".0" for whole numbers
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unit_with_prefix() {
        let parsed = parse_unit("100g").unwrap();
        assert_eq!(parsed.quantity, 100.0);
        assert_eq!(parsed.unit, ServingUnit::Gram);

        let parsed = parse_unit("30 g").unwrap();
        assert_eq!(parsed.quantity, 30.0);

        let parsed = parse_unit("2.5oz").unwrap();
        assert_eq!(parsed.quantity, 2.5);
        assert_eq!(parsed.unit, ServingUnit::Ounce);
    }

    #[test]
    fn test_parse_unit_defaults_quantity_to_one() {
        let parsed = parse_unit("g").unwrap();
        assert_eq!(parsed.quantity, 1.0);
        assert_eq!(parsed.unit, ServingUnit::Gram);

        let parsed = parse_unit("slice").unwrap();
        assert_eq!(parsed.quantity, 1.0);
        assert_eq!(parsed.unit, ServingUnit::Named("slice".to_string()));
    }

    #[test]
    fn test_parse_unit_fdc_tokens() {
        assert_eq!(parse_unit("100GRM").unwrap().unit, ServingUnit::Gram);
        assert_eq!(parse_unit("100MLT").unwrap().unit, ServingUnit::Milliliter);
    }

    #[test]
    fn test_parse_unit_rejects_malformed() {
        assert!(parse_unit("").is_err());
        assert!(parse_unit("100").is_err());
        assert!(parse_unit("-5g").is_err());
        assert!(parse_unit("0g").is_err());
        assert!(parse_unit("1.2.3g").is_err());
        assert!(parse_unit("10g5").is_err());
    }

    #[test]
    fn test_amount_in_converts_mass() {
        let ounce = parse_unit("1oz").unwrap();
        let grams = ounce.amount_in(&ServingUnit::Gram).unwrap();
        assert!((grams - G_PER_OZ).abs() < 1e-9);

        let ml = parse_unit("50ml").unwrap();
        assert_eq!(ml.amount_in(&ServingUnit::Gram).unwrap(), 50.0);
    }

    #[test]
    fn test_amount_in_named_units() {
        let slices = parse_unit("3 slice").unwrap();
        let same = ServingUnit::Named("slice".to_string());
        assert_eq!(slices.amount_in(&same).unwrap(), 3.0);
        assert!(slices.amount_in(&ServingUnit::Gram).is_err());
    }

    #[test]
    fn test_to_unit_string() {
        assert_eq!(parse_unit("100g").unwrap().to_unit_string(), "100g");
        assert_eq!(parse_unit("2.5 oz").unwrap().to_unit_string(), "2.5oz");
        assert_eq!(parse_unit("slice").unwrap().to_unit_string(), "1 slice");
    }
}
