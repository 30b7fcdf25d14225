//! # Recipe Data Model
//!
//! Parsed recipes as they come out of a markdown document, and the account-owned
//! records the importer reads and writes.

use crate::ingredient_model::ParsedIngredientLine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recipe extracted from one markdown segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecipe {
    /// Recipe title, never empty
    pub name: String,
    pub description: Option<String>,
    /// Number of servings, at least 1
    pub servings: u32,
    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    /// Meal type labels in document order, duplicates kept
    pub meal_type_names: Vec<String>,
    /// Tag labels in document order, duplicates kept
    pub tag_names: Vec<String>,
    pub ingredients: Vec<ParsedIngredientLine>,
    /// Instruction block with its line breaks
    pub instructions: Option<String>,
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    pub is_lactose_free: bool,
    pub is_quick: bool,
    pub is_meal_prep: bool,
    pub is_child_friendly: bool,
}

/// Dietary and practical features listed under `## Cechy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Vegetarian,
    Vegan,
    GlutenFree,
    LactoseFree,
    Quick,
    MealPrep,
    ChildFriendly,
}

impl Feature {
    /// All features
    pub const ALL: [Feature; 7] = [
        Feature::Vegetarian,
        Feature::Vegan,
        Feature::GlutenFree,
        Feature::LactoseFree,
        Feature::Quick,
        Feature::MealPrep,
        Feature::ChildFriendly,
    ];

    /// The lowercase phrase used in documents
    pub fn label(self) -> &'static str {
        match self {
            Feature::Vegetarian => "wegetariańskie",
            Feature::Vegan => "wegańskie",
            Feature::GlutenFree => "bezglutenowe",
            Feature::LactoseFree => "bez laktozy",
            Feature::Quick => "szybkie",
            Feature::MealPrep => "meal prep",
            Feature::ChildFriendly => "dla dzieci",
        }
    }

    /// Match a label case-insensitively
    pub fn from_label(label: &str) -> Option<Feature> {
        let label = label.trim().to_lowercase();
        Feature::ALL.into_iter().find(|f| f.label() == label)
    }
}

impl ParsedRecipe {
    /// Create a recipe with default values for everything but the name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            servings: 1,
            prep_time_minutes: None,
            cook_time_minutes: None,
            meal_type_names: Vec::new(),
            tag_names: Vec::new(),
            ingredients: Vec::new(),
            instructions: None,
            is_vegetarian: false,
            is_vegan: false,
            is_gluten_free: false,
            is_lactose_free: false,
            is_quick: false,
            is_meal_prep: false,
            is_child_friendly: false,
        }
    }

    /// Set the flag belonging to a feature
    pub fn set_feature(&mut self, feature: Feature) {
        match feature {
            Feature::Vegetarian => self.is_vegetarian = true,
            Feature::Vegan => self.is_vegan = true,
            Feature::GlutenFree => self.is_gluten_free = true,
            Feature::LactoseFree => self.is_lactose_free = true,
            Feature::Quick => self.is_quick = true,
            Feature::MealPrep => self.is_meal_prep = true,
            Feature::ChildFriendly => self.is_child_friendly = true,
        }
    }

    /// Features whose flag is set
    pub fn features(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|feature| match feature {
                Feature::Vegetarian => self.is_vegetarian,
                Feature::Vegan => self.is_vegan,
                Feature::GlutenFree => self.is_gluten_free,
                Feature::LactoseFree => self.is_lactose_free,
                Feature::Quick => self.is_quick,
                Feature::MealPrep => self.is_meal_prep,
                Feature::ChildFriendly => self.is_child_friendly,
            })
            .collect()
    }
}

/// An ingredient stored for an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ingredient {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    pub category: String,
    pub default_unit: String,
    pub calories_per_100g: Option<f64>,
    pub protein_per_100g: Option<f64>,
    pub carbs_per_100g: Option<f64>,
    pub fat_per_100g: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Values for a new ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub category: String,
    pub default_unit: String,
}

/// A tag stored for an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    /// Hex color such as `#3b82f6`
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Values for a new tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub color: String,
}

/// A meal type (breakfast, dinner, ...) defined by an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MealType {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Values for a new meal type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMealType {
    pub name: String,
    pub sort_order: i32,
}

/// A persisted recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipe {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub servings: i32,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    pub is_lactose_free: bool,
    pub is_quick: bool,
    pub is_meal_prep: bool,
    pub is_child_friendly: bool,
    pub created_at: DateTime<Utc>,
}

/// Ingredient reference of a recipe with its own amount and unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredientInput {
    pub ingredient_id: i64,
    pub amount: f64,
    pub unit: String,
}

/// A recipe ready to be written, with every reference resolved to an ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub servings: i32,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    pub is_lactose_free: bool,
    pub is_quick: bool,
    pub is_meal_prep: bool,
    pub is_child_friendly: bool,
    pub ingredients: Vec<RecipeIngredientInput>,
    pub tag_ids: Vec<i64>,
    pub meal_type_ids: Vec<i64>,
}

impl NewRecipe {
    /// Copy the scalar fields and flags of a parsed recipe; references start empty
    pub fn from_parsed(parsed: &ParsedRecipe) -> Self {
        Self {
            name: parsed.name.clone(),
            description: parsed.description.clone(),
            instructions: parsed.instructions.clone(),
            servings: clamp_to_i32(parsed.servings),
            prep_time_minutes: parsed.prep_time_minutes.map(clamp_to_i32),
            cook_time_minutes: parsed.cook_time_minutes.map(clamp_to_i32),
            is_vegetarian: parsed.is_vegetarian,
            is_vegan: parsed.is_vegan,
            is_gluten_free: parsed.is_gluten_free,
            is_lactose_free: parsed.is_lactose_free,
            is_quick: parsed.is_quick,
            is_meal_prep: parsed.is_meal_prep,
            is_child_friendly: parsed.is_child_friendly,
            ingredients: Vec::new(),
            tag_ids: Vec::new(),
            meal_type_ids: Vec::new(),
        }
    }
}

fn clamp_to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_recipe_defaults() {
        let recipe = ParsedRecipe::new("Test");
        assert_eq!(recipe.servings, 1);
        assert!(recipe.features().is_empty());
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn test_feature_labels_case_insensitive() {
        assert_eq!(Feature::from_label("Wegetariańskie"), Some(Feature::Vegetarian));
        assert_eq!(Feature::from_label("BEZ LAKTOZY"), Some(Feature::LactoseFree));
        assert_eq!(Feature::from_label(" meal prep "), Some(Feature::MealPrep));
        assert_eq!(Feature::from_label("pikantne"), None);
    }

    #[test]
    fn test_set_feature() {
        let mut recipe = ParsedRecipe::new("Test");
        recipe.set_feature(Feature::Quick);
        recipe.set_feature(Feature::ChildFriendly);
        assert!(recipe.is_quick);
        assert!(recipe.is_child_friendly);
        assert_eq!(recipe.features(), vec![Feature::Quick, Feature::ChildFriendly]);
    }

    #[test]
    fn test_new_recipe_from_parsed() {
        let mut parsed = ParsedRecipe::new("Owsianka");
        parsed.servings = 2;
        parsed.prep_time_minutes = Some(5);
        parsed.is_vegan = true;

        let new_recipe = NewRecipe::from_parsed(&parsed);
        assert_eq!(new_recipe.name, "Owsianka");
        assert_eq!(new_recipe.servings, 2);
        assert_eq!(new_recipe.prep_time_minutes, Some(5));
        assert_eq!(new_recipe.cook_time_minutes, None);
        assert!(new_recipe.is_vegan);
        assert!(new_recipe.tag_ids.is_empty());
    }
}
