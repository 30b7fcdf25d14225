//! # Recipe Parser
//!
//! Splits a markdown document into recipes and extracts their fields.
//!
//! A document holds one or more recipes separated by horizontal rules (`---`).
//! Each recipe starts with a `# Title` heading followed by `## Section` blocks:
//!
//! ```text
//! # Spaghetti Bolognese
//!
//! ## Info
//! - Porcje: 4
//! - Przygotowanie: 15 min
//! - Typ: Obiad, Kolacja
//! - Tagi: Włoskie, Makaron
//!
//! ## Składniki
//! - 500g mielona wołowina
//! - 2 ząbki czosnku
//!
//! ## Instrukcje
//! 1. Podsmaż cebulę
//!
//! ## Cechy
//! - Dla dzieci
//! ```
//!
//! Parsing is pure: the same text always yields the same recipes, and nothing in
//! the text can make it fail. Segments without a title are skipped.

use crate::ingredient_parser::{parse_ingredient_lines, strip_list_marker};
use crate::measurement_patterns::{
    FIRST_INTEGER_REGEX, LEADING_INTEGER_REGEX, SECTION_HEADING_REGEX, SEPARATOR_REGEX,
    TITLE_REGEX,
};
use crate::recipe_model::{Feature, ParsedRecipe};
use log::{debug, info, trace};

/// Named `## ` sections of a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Info,
    Ingredients,
    Instructions,
    Features,
}

impl Section {
    fn from_heading(heading: &str) -> Option<Section> {
        match heading.trim().to_lowercase().as_str() {
            "info" => Some(Section::Info),
            "składniki" => Some(Section::Ingredients),
            "instrukcje" => Some(Section::Instructions),
            "cechy" => Some(Section::Features),
            _ => None,
        }
    }
}

/// Parse every recipe in a markdown document
///
/// # Examples
///
/// ```rust
/// use meal_import::recipe_parser::parse_markdown_recipes;
///
/// let text = "# Jajecznica\n\n## Składniki\n- 3 szt jajko\n\n---\n\n# Tosty";
/// let recipes = parse_markdown_recipes(text);
///
/// assert_eq!(recipes.len(), 2);
/// assert_eq!(recipes[0].ingredients.len(), 1);
/// assert_eq!(recipes[1].name, "Tosty");
/// ```
pub fn parse_markdown_recipes(markdown: &str) -> Vec<ParsedRecipe> {
    let normalized = markdown.replace("\r\n", "\n");

    let recipes: Vec<ParsedRecipe> = split_recipe_segments(&normalized)
        .into_iter()
        .filter_map(parse_single_recipe)
        .collect();

    info!("Parsed {} recipes from markdown document", recipes.len());
    recipes
}

/// Split a document on horizontal rules, dropping empty segments
pub fn split_recipe_segments(markdown: &str) -> Vec<&str> {
    SEPARATOR_REGEX
        .split(markdown)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Parse one recipe segment
///
/// Returns `None` when the segment has no `# Title` heading.
pub fn parse_single_recipe(segment: &str) -> Option<ParsedRecipe> {
    let name = match extract_title(segment) {
        Some(name) => name,
        None => {
            debug!("Skipping segment without a title ({} chars)", segment.len());
            return None;
        }
    };

    let mut recipe = ParsedRecipe::new(&name);

    for (section, body) in extract_sections(segment) {
        trace!("Recipe '{}': section {:?} with {} lines", name, section, body.lines().count());
        match section {
            Section::Info => apply_info_section(&mut recipe, &body),
            Section::Ingredients => recipe.ingredients.extend(parse_ingredient_lines(&body)),
            Section::Instructions => {
                let text = body.trim();
                if !text.is_empty() {
                    recipe.instructions = Some(text.to_string());
                }
            }
            Section::Features => apply_features_section(&mut recipe, &body),
        }
    }

    debug!(
        "Parsed recipe '{}' with {} ingredients",
        recipe.name,
        recipe.ingredients.len()
    );
    Some(recipe)
}

fn extract_title(segment: &str) -> Option<String> {
    TITLE_REGEX
        .captures_iter(segment)
        .map(|captures| captures[1].trim().to_string())
        .find(|title| !title.is_empty())
}

/// Collect the bodies of recognized sections, in document order
fn extract_sections(segment: &str) -> Vec<(Section, String)> {
    let mut sections = Vec::new();
    let mut current: Option<(Section, Vec<&str>)> = None;

    for line in segment.lines() {
        if let Some(captures) = SECTION_HEADING_REGEX.captures(line) {
            if let Some((section, lines)) = current.take() {
                sections.push((section, lines.join("\n")));
            }
            current = Section::from_heading(&captures[1]).map(|section| (section, Vec::new()));
            continue;
        }

        if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }

    if let Some((section, lines)) = current {
        sections.push((section, lines.join("\n")));
    }

    sections
}

/// Non-empty list items with their markers removed
fn list_items(body: &str) -> Vec<&str> {
    body.lines()
        .map(|line| strip_list_marker(line.trim()))
        .filter(|line| !line.is_empty())
        .collect()
}

fn apply_info_section(recipe: &mut ParsedRecipe, body: &str) {
    for item in list_items(body) {
        let Some((key, value)) = item.split_once(':') else {
            trace!("Ignoring info line without a key: '{}'", item);
            continue;
        };
        let value = value.trim();

        match key.trim().to_lowercase().as_str() {
            "porcje" => recipe.servings = parse_servings(value),
            "przygotowanie" => recipe.prep_time_minutes = parse_minutes(value),
            "gotowanie" => recipe.cook_time_minutes = parse_minutes(value),
            "typ" => recipe.meal_type_names = split_labels(value),
            "tagi" => recipe.tag_names = split_labels(value),
            "opis" => {
                recipe.description = (!value.is_empty()).then(|| value.to_string());
            }
            other => trace!("Ignoring unknown info key '{}'", other),
        }
    }
}

fn apply_features_section(recipe: &mut ParsedRecipe, body: &str) {
    for label in list_items(body) {
        match Feature::from_label(label) {
            Some(feature) => recipe.set_feature(feature),
            None => debug!("Ignoring unknown feature '{}'", label),
        }
    }
}

/// Servings from the leading integer of a value, 1 when absent or zero
fn parse_servings(value: &str) -> u32 {
    LEADING_INTEGER_REGEX
        .find(value)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|servings| *servings >= 1)
        .unwrap_or(1)
}

/// Minutes from the first integer anywhere in a value
fn parse_minutes(value: &str) -> Option<u32> {
    FIRST_INTEGER_REGEX
        .find(value)
        .and_then(|m| m.as_str().parse().ok())
}

/// Comma-separated labels, trimmed, empties dropped
fn split_labels(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}
