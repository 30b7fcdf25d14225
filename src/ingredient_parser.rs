//! # Ingredient Parser
//!
//! This module turns single lines of a recipe's ingredient section into
//! structured [`ParsedIngredientLine`] values.
//!
//! ## Features
//!
//! - Three line shapes: `200g mąka`, `mąka - 200 g` and `mąka - (200g)`
//! - Mixed fractions (`2 i 1/2`, `1 1/2`), simple fractions and decimal commas
//! - Normalization of inflected Polish unit words (`łyżki`, `łyżek` -> `łyżka`)
//! - Removal of `(ok. 200g)` style annotations from ingredient names
//!
//! Parsing never fails: a line nothing else recognizes becomes one piece of an
//! ingredient named after the whole line.
//!
//! ## Usage
//!
//! ```rust
//! use meal_import::ingredient_parser::parse_ingredient_line;
//!
//! let line = parse_ingredient_line("- 2 i 1/2 kromki chleba").unwrap();
//! assert_eq!(line.amount, 2.5);
//! assert_eq!(line.unit.as_str(), "kromka");
//! assert_eq!(line.name, "chleba");
//! ```

use crate::ingredient_model::{ParsedIngredientLine, Unit};
use crate::measurement_patterns::{
    AMOUNT_PATTERN, BULLET_REGEX, DECIMAL_REGEX, FRACTION_REGEX, MIXED_SPACE_REGEX,
    MIXED_WORD_REGEX, PARENTHETICAL_REGEX, REVERSED_AMOUNT_REGEX, REVERSED_PARENTHETICAL_REGEX,
    WHITESPACE_REGEX,
};
use log::{debug, trace};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex patterns that depend on the unit table
static QUANTITY_PATTERNS: LazyLock<QuantityPatterns> = LazyLock::new(QuantityPatterns::new);

/// Inflected unit words and their canonical unit
static UNIT_MAPPINGS: LazyLock<HashMap<&'static str, Unit>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Weight and volume
    map.insert("g", Unit::Grams);
    map.insert("gr", Unit::Grams);
    map.insert("gram", Unit::Grams);
    map.insert("gramy", Unit::Grams);
    map.insert("gramów", Unit::Grams);
    map.insert("kg", Unit::Kilograms);
    map.insert("kilogram", Unit::Kilograms);
    map.insert("kilogramy", Unit::Kilograms);
    map.insert("kilogramów", Unit::Kilograms);
    map.insert("ml", Unit::Milliliters);
    map.insert("mililitr", Unit::Milliliters);
    map.insert("mililitry", Unit::Milliliters);
    map.insert("mililitrów", Unit::Milliliters);
    map.insert("l", Unit::Liters);
    map.insert("litr", Unit::Liters);
    map.insert("litry", Unit::Liters);
    map.insert("litrów", Unit::Liters);

    // Kitchen measures
    map.insert("łyżka", Unit::Tablespoons);
    map.insert("łyżki", Unit::Tablespoons);
    map.insert("łyżek", Unit::Tablespoons);
    map.insert("łyżkę", Unit::Tablespoons);
    map.insert("łyżeczka", Unit::Teaspoons);
    map.insert("łyżeczki", Unit::Teaspoons);
    map.insert("łyżeczek", Unit::Teaspoons);
    map.insert("łyżeczkę", Unit::Teaspoons);
    map.insert("szklanka", Unit::Glasses);
    map.insert("szklanki", Unit::Glasses);
    map.insert("szklanek", Unit::Glasses);
    map.insert("szklankę", Unit::Glasses);
    map.insert("szczypta", Unit::Pinches);
    map.insert("szczypty", Unit::Pinches);
    map.insert("szczypt", Unit::Pinches);
    map.insert("szczyptę", Unit::Pinches);
    map.insert("garść", Unit::Handfuls);
    map.insert("garści", Unit::Handfuls);
    map.insert("porcja", Unit::Portions);
    map.insert("porcje", Unit::Portions);
    map.insert("porcji", Unit::Portions);

    // Count units
    map.insert("szt", Unit::Pieces);
    map.insert("szt.", Unit::Pieces);
    map.insert("sztuka", Unit::Pieces);
    map.insert("sztuki", Unit::Pieces);
    map.insert("sztuk", Unit::Pieces);
    map.insert("ząbek", Unit::Cloves);
    map.insert("ząbki", Unit::Cloves);
    map.insert("ząbków", Unit::Cloves);
    map.insert("kromka", Unit::Slices);
    map.insert("kromki", Unit::Slices);
    map.insert("kromek", Unit::Slices);
    map.insert("kromkę", Unit::Slices);
    map.insert("plaster", Unit::ThinSlices);
    map.insert("plastry", Unit::ThinSlices);
    map.insert("plastrów", Unit::ThinSlices);
    map.insert("plasterek", Unit::ThinSlices);
    map.insert("plasterki", Unit::ThinSlices);
    map.insert("plasterków", Unit::ThinSlices);
    map.insert("kostka", Unit::Cubes);
    map.insert("kostki", Unit::Cubes);
    map.insert("kostek", Unit::Cubes);
    map.insert("kostkę", Unit::Cubes);
    map.insert("listek", Unit::Leaves);
    map.insert("listki", Unit::Leaves);
    map.insert("listków", Unit::Leaves);
    map.insert("gałązka", Unit::Sprigs);
    map.insert("gałązki", Unit::Sprigs);
    map.insert("gałązek", Unit::Sprigs);
    map.insert("gałązkę", Unit::Sprigs);
    map.insert("łodyga", Unit::Stalks);
    map.insert("łodygi", Unit::Stalks);
    map.insert("łodyg", Unit::Stalks);
    map.insert("łodygę", Unit::Stalks);
    map.insert("pęczek", Unit::Bundles);
    map.insert("pęczki", Unit::Bundles);
    map.insert("pęczków", Unit::Bundles);

    // Containers
    map.insert("opakowanie", Unit::Packages);
    map.insert("opakowania", Unit::Packages);
    map.insert("opakowań", Unit::Packages);
    map.insert("opak.", Unit::Packages);
    map.insert("op.", Unit::Packages);
    map.insert("puszka", Unit::Cans);
    map.insert("puszki", Unit::Cans);
    map.insert("puszek", Unit::Cans);
    map.insert("puszkę", Unit::Cans);
    map.insert("słoik", Unit::Jars);
    map.insert("słoiki", Unit::Jars);
    map.insert("słoików", Unit::Jars);
    map.insert("słoiczek", Unit::Jars);
    map.insert("woreczek", Unit::Bags);
    map.insert("woreczki", Unit::Bags);
    map.insert("woreczków", Unit::Bags);

    map
});

/// Compiled regex patterns for parsing
struct QuantityPatterns {
    /// Matches the forward shape: "<amount> [<unit>] <name>"
    forward: Regex,
}

impl QuantityPatterns {
    fn new() -> Self {
        // Longest variants first so "kg" wins over "g" and "szt." over "szt"
        let mut variants: Vec<&str> = UNIT_MAPPINGS.keys().copied().collect();
        variants.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        let units = variants
            .iter()
            .map(|v| regex::escape(v))
            .collect::<Vec<_>>()
            .join("|");

        Self {
            forward: Regex::new(&format!(
                r"(?i)^(?P<amount>{AMOUNT_PATTERN})(?:\s*(?P<unit>{units}))?\s+(?P<name>.+)$"
            ))
            .expect("Forward ingredient pattern should be valid"),
        }
    }
}

/// Parse a single ingredient line
///
/// Returns `None` only for lines that are empty once the list marker is removed.
pub fn parse_ingredient_line(line: &str) -> Option<ParsedIngredientLine> {
    let trimmed = strip_list_marker(line.trim());
    if trimmed.is_empty() {
        return None;
    }

    if let Some(parsed) = parse_reversed_with_amount(trimmed) {
        trace!("Reversed ingredient line '{}' -> {:?}", trimmed, parsed);
        return Some(parsed);
    }

    if let Some(parsed) = parse_reversed_parenthetical(trimmed) {
        trace!("Reversed parenthetical line '{}' -> {:?}", trimmed, parsed);
        return Some(parsed);
    }

    if let Some(parsed) = parse_forward(trimmed) {
        trace!("Forward ingredient line '{}' -> {:?}", trimmed, parsed);
        return Some(parsed);
    }

    debug!("No quantity recognized in '{}', using fallback", trimmed);
    let name = clean_ingredient_name(trimmed);
    if name.is_empty() {
        // Nothing but an annotation such as "(200g)"
        return Some(ParsedIngredientLine::fallback(trimmed));
    }
    Some(ParsedIngredientLine::fallback(&name))
}

/// Parse every non-empty line of an ingredient section
pub fn parse_ingredient_lines(text: &str) -> Vec<ParsedIngredientLine> {
    text.lines().filter_map(parse_ingredient_line).collect()
}

/// `<name> - <amount> [<unit>] [(<note>)]`
fn parse_reversed_with_amount(line: &str) -> Option<ParsedIngredientLine> {
    let captures = REVERSED_AMOUNT_REGEX.captures(line)?;
    let amount = parse_quantity(&captures["amount"])?;
    let unit = captures
        .name("unit")
        .map(|m| parse_unit(m.as_str()))
        .unwrap_or(Unit::Pieces);

    build_line(amount, unit, &captures["name"])
}

/// `<name> - (<number><g|kg|ml|l>)`
fn parse_reversed_parenthetical(line: &str) -> Option<ParsedIngredientLine> {
    let captures = REVERSED_PARENTHETICAL_REGEX.captures(line)?;
    let amount = parse_quantity(&captures["amount"])?;
    let unit = parse_unit(&captures["unit"]);

    build_line(amount, unit, &captures["name"])
}

/// `<amount> [<unit>] <name>`
fn parse_forward(line: &str) -> Option<ParsedIngredientLine> {
    let captures = QUANTITY_PATTERNS.forward.captures(line)?;
    let name = &captures["name"];
    // Leftover pieces of an amount ("1 1/2", "2 i 1/2") are not a name
    if name.starts_with(|c: char| c.is_ascii_digit()) || name.to_lowercase().starts_with("i ") {
        return None;
    }
    let amount = parse_quantity(&captures["amount"])?;
    let unit = captures
        .name("unit")
        .map(|m| parse_unit(m.as_str()))
        .unwrap_or(Unit::Pieces);

    build_line(amount, unit, name)
}

fn build_line(amount: f64, unit: Unit, raw_name: &str) -> Option<ParsedIngredientLine> {
    let name = clean_ingredient_name(raw_name);
    if name.is_empty() {
        return None;
    }
    Some(ParsedIngredientLine::new(amount, unit, &name))
}

/// Remove a leading "- " or "* " list marker
pub fn strip_list_marker(line: &str) -> &str {
    match BULLET_REGEX.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line,
    }
}

/// Strip weight/volume annotations and collapse whitespace
///
/// `"pierś z kurczaka (ok. 200g) filet"` becomes `"pierś z kurczaka filet"`.
pub fn clean_ingredient_name(raw_name: &str) -> String {
    let stripped = PARENTHETICAL_REGEX.replace_all(raw_name, " ");
    WHITESPACE_REGEX
        .replace_all(stripped.trim(), " ")
        .into_owned()
}

/// Parse a quantity string into a positive amount
///
/// Tried in order: `2 i 1/2`, `1 1/2`, `1/3`, then a decimal with `.` or `,`.
/// Anything else, a zero denominator, or a non-positive result gives `None`.
pub fn parse_quantity(qty_str: &str) -> Option<f64> {
    let qty_str = qty_str.trim();

    let value = if let Some(captures) = MIXED_WORD_REGEX
        .captures(qty_str)
        .or_else(|| MIXED_SPACE_REGEX.captures(qty_str))
    {
        let whole: f64 = captures[1].parse().ok()?;
        whole + fraction_value(&captures[2], &captures[3])?
    } else if let Some(captures) = FRACTION_REGEX.captures(qty_str) {
        fraction_value(&captures[1], &captures[2])?
    } else if DECIMAL_REGEX.is_match(qty_str) {
        qty_str.replace(',', ".").parse::<f64>().ok()?
    } else {
        return None;
    };

    (value.is_finite() && value > 0.0).then_some(value)
}

fn fraction_value(numerator: &str, denominator: &str) -> Option<f64> {
    let numerator: u32 = numerator.parse().ok()?;
    let denominator: u32 = denominator.parse().ok()?;
    if denominator == 0 {
        return None;
    }
    Some(f64::from(numerator) / f64::from(denominator))
}

/// Parse a unit token into its canonical unit
///
/// Matching is case-insensitive; unknown tokens are kept lowercased.
pub fn parse_unit(unit_str: &str) -> Unit {
    let unit_str = unit_str.trim().to_lowercase();

    if let Some(unit) = UNIT_MAPPINGS.get(unit_str.as_str()) {
        return unit.clone();
    }

    // "szt.", "łyżki," and similar trailing punctuation
    let bare = unit_str.trim_end_matches(['.', ',']);
    if let Some(unit) = UNIT_MAPPINGS.get(bare) {
        return unit.clone();
    }

    Unit::Other(unit_str)
}
