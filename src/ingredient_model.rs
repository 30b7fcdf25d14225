//! # Ingredient Line Data Model
//!
//! This module defines the value produced for every line of a recipe's
//! `## Składniki` section, together with the canonical measurement units the
//! parser normalizes inflected unit words into.
//!
//! ## Core Concepts
//!
//! - **ParsedIngredientLine**: amount, canonical unit and cleaned ingredient name
//! - **Unit**: one canonical token per unit concept (`łyżki` and `łyżek` both become `łyżka`)
//!
//! ## Usage
//!
//! ```rust
//! use meal_import::ingredient_model::{ParsedIngredientLine, Unit};
//!
//! let flour = ParsedIngredientLine::new(100.0, Unit::Grams, "mąka");
//! assert_eq!(flour.unit.as_str(), "g");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single ingredient line extracted from a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedIngredientLine {
    /// Positive quantity (decimal, fraction or mixed fraction in the source text)
    pub amount: f64,

    /// Canonical unit, `Unit::Pieces` when the line carried none
    pub unit: Unit,

    /// Ingredient name with weight/volume annotations removed
    pub name: String,
}

/// Canonical measurement units
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Unit {
    // Weight and volume
    /// Grams (`g`)
    Grams,
    /// Kilograms (`kg`)
    Kilograms,
    /// Milliliters (`ml`)
    Milliliters,
    /// Liters (`l`)
    Liters,

    // Kitchen measures
    /// Tablespoon (`łyżka`)
    Tablespoons,
    /// Teaspoon (`łyżeczka`)
    Teaspoons,
    /// Glass (`szklanka`)
    Glasses,
    /// Pinch (`szczypta`)
    Pinches,
    /// Handful (`garść`)
    Handfuls,
    /// Portion (`porcja`)
    Portions,

    // Count units
    /// Generic piece (`szt`)
    Pieces,
    /// Clove (`ząbek`)
    Cloves,
    /// Slice of bread (`kromka`)
    Slices,
    /// Thin slice of cheese, ham and the like (`plaster`)
    ThinSlices,
    /// Cube (`kostka`)
    Cubes,
    /// Leaf (`listek`)
    Leaves,
    /// Sprig (`gałązka`)
    Sprigs,
    /// Stalk (`łodyga`)
    Stalks,
    /// Bundle (`pęczek`)
    Bundles,

    // Containers
    /// Package (`opakowanie`)
    Packages,
    /// Can (`puszka`)
    Cans,
    /// Jar (`słoik`)
    Jars,
    /// Bag (`woreczek`)
    Bags,

    /// Unrecognized unit token, stored lowercased
    Other(String),
}

impl ParsedIngredientLine {
    /// Create a new ingredient line
    pub fn new(amount: f64, unit: Unit, name: &str) -> Self {
        Self {
            amount,
            unit,
            name: name.to_string(),
        }
    }

    /// Line used when nothing but a name could be recognized: one piece
    pub fn fallback(name: &str) -> Self {
        Self::new(1.0, Unit::Pieces, name)
    }
}

impl Unit {
    /// Every canonical unit, in the order they are offered to users
    pub const CANONICAL: [Unit; 23] = [
        Unit::Grams,
        Unit::Kilograms,
        Unit::Milliliters,
        Unit::Liters,
        Unit::Pieces,
        Unit::Tablespoons,
        Unit::Teaspoons,
        Unit::Glasses,
        Unit::Packages,
        Unit::Bundles,
        Unit::Cloves,
        Unit::ThinSlices,
        Unit::Slices,
        Unit::Cubes,
        Unit::Handfuls,
        Unit::Pinches,
        Unit::Leaves,
        Unit::Sprigs,
        Unit::Stalks,
        Unit::Cans,
        Unit::Jars,
        Unit::Bags,
        Unit::Portions,
    ];

    /// The canonical token stored alongside amounts
    pub fn as_str(&self) -> &str {
        match self {
            Unit::Grams => "g",
            Unit::Kilograms => "kg",
            Unit::Milliliters => "ml",
            Unit::Liters => "l",
            Unit::Tablespoons => "łyżka",
            Unit::Teaspoons => "łyżeczka",
            Unit::Glasses => "szklanka",
            Unit::Pinches => "szczypta",
            Unit::Handfuls => "garść",
            Unit::Portions => "porcja",
            Unit::Pieces => "szt",
            Unit::Cloves => "ząbek",
            Unit::Slices => "kromka",
            Unit::ThinSlices => "plaster",
            Unit::Cubes => "kostka",
            Unit::Leaves => "listek",
            Unit::Sprigs => "gałązka",
            Unit::Stalks => "łodyga",
            Unit::Bundles => "pęczek",
            Unit::Packages => "opakowanie",
            Unit::Cans => "puszka",
            Unit::Jars => "słoik",
            Unit::Bags => "woreczek",
            Unit::Other(token) => token,
        }
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.as_str().to_string()
    }
}

impl From<String> for Unit {
    fn from(token: String) -> Self {
        Unit::CANONICAL
            .iter()
            .find(|unit| unit.as_str() == token)
            .cloned()
            .unwrap_or(Unit::Other(token))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ParsedIngredientLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.amount.fract() == 0.0 {
            write!(f, "{} {} {}", self.amount, self.unit, self.name)
        } else {
            write!(f, "{:.2} {} {}", self.amount, self.unit, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_line() {
        let line = ParsedIngredientLine::fallback("sól do smaku");
        assert_eq!(line.amount, 1.0);
        assert_eq!(line.unit, Unit::Pieces);
        assert_eq!(line.name, "sól do smaku");
    }

    #[test]
    fn test_canonical_tokens_are_unique() {
        let mut tokens: Vec<&str> = Unit::CANONICAL.iter().map(|u| u.as_str()).collect();
        tokens.sort();
        tokens.dedup();
        assert_eq!(tokens.len(), Unit::CANONICAL.len());
    }

    #[test]
    fn test_unit_string_conversion() {
        assert_eq!(Unit::from("kromka".to_string()), Unit::Slices);
        assert_eq!(
            Unit::from("garnek".to_string()),
            Unit::Other("garnek".to_string())
        );
        assert_eq!(String::from(Unit::Cloves), "ząbek");
    }

    #[test]
    fn test_display_format() {
        let line = ParsedIngredientLine::new(2.0, Unit::Pieces, "jajko");
        assert_eq!(line.to_string(), "2 szt jajko");

        let line = ParsedIngredientLine::new(2.5, Unit::Slices, "chleba");
        assert_eq!(line.to_string(), "2.50 kromka chleba");
    }

    #[test]
    fn test_serde_uses_canonical_token() {
        let line = ParsedIngredientLine::new(100.0, Unit::Grams, "mąka");
        let json = serde_json::to_string(&line).unwrap();
        assert!(json.contains("\"unit\":\"g\""));

        let back: ParsedIngredientLine = serde_json::from_str(&json).unwrap();
        assert_eq!(back, line);
    }
}
