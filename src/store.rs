//! # Recipe Store
//!
//! The persistence operations the importer needs, and an in-memory
//! implementation used for dry runs and tests. The PostgreSQL implementation
//! lives in [`crate::db`].

use crate::recipe_model::{
    Ingredient, MealType, NewIngredient, NewMealType, NewRecipe, NewTag, Recipe,
    RecipeIngredientInput, Tag,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Account-scoped reference data and recipe persistence
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// All ingredients of an account
    async fn list_ingredients(&self, account_id: i64) -> Result<Vec<Ingredient>>;

    /// Create an ingredient
    async fn create_ingredient(&self, account_id: i64, ingredient: &NewIngredient) -> Result<Ingredient>;

    /// All tags of an account
    async fn list_tags(&self, account_id: i64) -> Result<Vec<Tag>>;

    /// Create a tag
    async fn create_tag(&self, account_id: i64, tag: &NewTag) -> Result<Tag>;

    /// All meal types of an account, ordered by `sort_order`
    async fn list_meal_types(&self, account_id: i64) -> Result<Vec<MealType>>;

    /// Create a meal type
    async fn create_meal_type(&self, account_id: i64, meal_type: &NewMealType) -> Result<MealType>;

    /// Create a recipe together with its ingredient, tag and meal type links
    async fn create_recipe(&self, account_id: i64, recipe: &NewRecipe) -> Result<Recipe>;
}

/// Recipe with its resolved associations, as kept by [`InMemoryStore`]
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecipe {
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredientInput>,
    pub tag_ids: Vec<i64>,
    pub meal_type_ids: Vec<i64>,
}

#[derive(Debug, Default)]
struct MemoryTables {
    next_id: i64,
    ingredients: Vec<Ingredient>,
    tags: Vec<Tag>,
    meal_types: Vec<MealType>,
    recipes: Vec<StoredRecipe>,
}

impl MemoryTables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Store that keeps everything in process memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<MemoryTables>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Recipes stored for an account, in creation order
    pub async fn recipes(&self, account_id: i64) -> Vec<StoredRecipe> {
        let tables = self.tables.lock().await;
        tables
            .recipes
            .iter()
            .filter(|stored| stored.recipe.account_id == account_id)
            .cloned()
            .collect()
    }

    /// Number of ingredients, tags and meal types stored across all accounts
    pub async fn reference_counts(&self) -> HashMap<&'static str, usize> {
        let tables = self.tables.lock().await;
        HashMap::from([
            ("ingredients", tables.ingredients.len()),
            ("tags", tables.tags.len()),
            ("meal_types", tables.meal_types.len()),
        ])
    }
}

#[async_trait]
impl RecipeStore for InMemoryStore {
    async fn list_ingredients(&self, account_id: i64) -> Result<Vec<Ingredient>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .ingredients
            .iter()
            .filter(|i| i.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn create_ingredient(&self, account_id: i64, ingredient: &NewIngredient) -> Result<Ingredient> {
        let mut tables = self.tables.lock().await;
        let created = Ingredient {
            id: tables.next_id(),
            account_id,
            name: ingredient.name.clone(),
            category: ingredient.category.clone(),
            default_unit: ingredient.default_unit.clone(),
            calories_per_100g: None,
            protein_per_100g: None,
            carbs_per_100g: None,
            fat_per_100g: None,
            created_at: Utc::now(),
        };
        debug!(id = created.id, name = %created.name, "Stored ingredient in memory");
        tables.ingredients.push(created.clone());
        Ok(created)
    }

    async fn list_tags(&self, account_id: i64) -> Result<Vec<Tag>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .tags
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn create_tag(&self, account_id: i64, tag: &NewTag) -> Result<Tag> {
        let mut tables = self.tables.lock().await;
        let created = Tag {
            id: tables.next_id(),
            account_id,
            name: tag.name.clone(),
            color: tag.color.clone(),
            created_at: Utc::now(),
        };
        tables.tags.push(created.clone());
        Ok(created)
    }

    async fn list_meal_types(&self, account_id: i64) -> Result<Vec<MealType>> {
        let tables = self.tables.lock().await;
        let mut meal_types: Vec<MealType> = tables
            .meal_types
            .iter()
            .filter(|m| m.account_id == account_id)
            .cloned()
            .collect();
        meal_types.sort_by_key(|m| m.sort_order);
        Ok(meal_types)
    }

    async fn create_meal_type(&self, account_id: i64, meal_type: &NewMealType) -> Result<MealType> {
        let mut tables = self.tables.lock().await;
        let created = MealType {
            id: tables.next_id(),
            account_id,
            name: meal_type.name.clone(),
            sort_order: meal_type.sort_order,
            created_at: Utc::now(),
        };
        tables.meal_types.push(created.clone());
        Ok(created)
    }

    async fn create_recipe(&self, account_id: i64, recipe: &NewRecipe) -> Result<Recipe> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let created = Recipe {
            id: tables.next_id(),
            account_id,
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            instructions: recipe.instructions.clone(),
            servings: recipe.servings,
            prep_time_minutes: recipe.prep_time_minutes,
            cook_time_minutes: recipe.cook_time_minutes,
            is_vegetarian: recipe.is_vegetarian,
            is_vegan: recipe.is_vegan,
            is_gluten_free: recipe.is_gluten_free,
            is_lactose_free: recipe.is_lactose_free,
            is_quick: recipe.is_quick,
            is_meal_prep: recipe.is_meal_prep,
            is_child_friendly: recipe.is_child_friendly,
            created_at: now,
        };
        tables.recipes.push(StoredRecipe {
            recipe: created.clone(),
            ingredients: recipe.ingredients.clone(),
            tag_ids: recipe.tag_ids.clone(),
            meal_type_ids: recipe.meal_type_ids.clone(),
        });
        debug!(id = created.id, name = %created.name, "Stored recipe in memory");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ingredients_are_account_scoped() -> Result<()> {
        let store = InMemoryStore::new();
        let new = NewIngredient {
            name: "mąka".to_string(),
            category: "Inne".to_string(),
            default_unit: "g".to_string(),
        };
        store.create_ingredient(1, &new).await?;
        store.create_ingredient(2, &new).await?;

        assert_eq!(store.list_ingredients(1).await?.len(), 1);
        assert_eq!(store.list_ingredients(3).await?.len(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_meal_types_sorted() -> Result<()> {
        let store = InMemoryStore::new();
        store
            .create_meal_type(1, &NewMealType { name: "Kolacja".to_string(), sort_order: 3 })
            .await?;
        store
            .create_meal_type(1, &NewMealType { name: "Śniadanie".to_string(), sort_order: 0 })
            .await?;

        let names: Vec<String> = store
            .list_meal_types(1)
            .await?
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Śniadanie", "Kolacja"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_recipe_keeps_associations() -> Result<()> {
        let store = InMemoryStore::new();
        let recipe = NewRecipe {
            name: "Owsianka".to_string(),
            description: None,
            instructions: None,
            servings: 1,
            prep_time_minutes: None,
            cook_time_minutes: None,
            is_vegetarian: true,
            is_vegan: false,
            is_gluten_free: false,
            is_lactose_free: false,
            is_quick: true,
            is_meal_prep: false,
            is_child_friendly: false,
            ingredients: vec![RecipeIngredientInput {
                ingredient_id: 7,
                amount: 50.0,
                unit: "g".to_string(),
            }],
            tag_ids: vec![3],
            meal_type_ids: vec![],
        };

        let created = store.create_recipe(1, &recipe).await?;
        let stored = store.recipes(1).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].recipe.id, created.id);
        assert_eq!(stored[0].ingredients[0].ingredient_id, 7);
        assert_eq!(stored[0].tag_ids, vec![3]);
        Ok(())
    }
}
