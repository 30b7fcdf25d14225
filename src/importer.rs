//! # Markdown Importer
//!
//! Reconciles parsed recipes with an account's reference data and persists
//! them through a [`RecipeStore`].
//!
//! ## Features
//!
//! - Case-insensitive matching of ingredient, tag and meal type names
//! - Creation of missing ingredients and tags, visible to later recipes of the same import
//! - Meal types are only matched, never created
//! - One failing recipe never stops the rest of the batch
//!
//! ## Usage
//!
//! ```rust,no_run
//! use meal_import::importer::MarkdownImporter;
//! use meal_import::store::InMemoryStore;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut importer = MarkdownImporter::new(InMemoryStore::new(), StdRng::seed_from_u64(7));
//! let summary = importer.import("# Owsianka\n## Składniki\n- 50g płatki owsiane", 1).await?;
//! println!("{}", summary.render("pl"));
//! # Ok(())
//! # }
//! ```

use crate::import_config::{ImportConfig, DEFAULT_MEAL_TYPES, SUPPORTED_EXTENSIONS, TAG_COLORS};
use crate::import_errors::ImportError;
use crate::localization::{t_count_lang, t_lang};
use crate::recipe_model::{
    Ingredient, MealType, NewIngredient, NewMealType, NewRecipe, NewTag, ParsedRecipe, Recipe,
    RecipeIngredientInput, Tag,
};
use crate::recipe_parser::parse_markdown_recipes;
use crate::store::RecipeStore;
use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Outcome of one import call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    /// Number of recipes written to the store
    pub imported_count: usize,
    /// One human-readable message per failed recipe, in input order
    pub errors: Vec<String>,
}

impl ImportSummary {
    /// Whether every parsed recipe was imported
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Summary line followed by every error message on its own line
    pub fn render(&self, locale: &str) -> String {
        let headline = if self.imported_count == 0 {
            t_lang("import-nothing-imported", Some(locale))
        } else {
            t_count_lang("import-success", self.imported_count, Some(locale))
        };
        let mut lines = vec![headline];
        lines.extend(self.errors.iter().cloned());
        lines.join("\n")
    }
}

/// Lowercased name to ID lookups for one import call
#[derive(Debug, Clone, Default)]
pub struct ReferenceCache {
    ingredients: HashMap<String, i64>,
    tags: HashMap<String, i64>,
    meal_types: HashMap<String, i64>,
}

impl ReferenceCache {
    /// Build the cache from freshly loaded account data; the first record wins on name clashes
    pub fn new(ingredients: &[Ingredient], tags: &[Tag], meal_types: &[MealType]) -> Self {
        let mut cache = Self::default();
        for ingredient in ingredients {
            cache
                .ingredients
                .entry(cache_key(&ingredient.name))
                .or_insert(ingredient.id);
        }
        for tag in tags {
            cache.tags.entry(cache_key(&tag.name)).or_insert(tag.id);
        }
        for meal_type in meal_types {
            cache
                .meal_types
                .entry(cache_key(&meal_type.name))
                .or_insert(meal_type.id);
        }
        cache
    }

    pub fn ingredient_id(&self, name: &str) -> Option<i64> {
        self.ingredients.get(&cache_key(name)).copied()
    }

    pub fn tag_id(&self, name: &str) -> Option<i64> {
        self.tags.get(&cache_key(name)).copied()
    }

    pub fn meal_type_id(&self, name: &str) -> Option<i64> {
        self.meal_types.get(&cache_key(name)).copied()
    }

    pub fn insert_ingredient(&mut self, name: &str, id: i64) {
        self.ingredients.insert(cache_key(name), id);
    }

    pub fn insert_tag(&mut self, name: &str, id: i64) {
        self.tags.insert(cache_key(name), id);
    }

    /// Number of cached ingredients, tags and meal types
    pub fn len(&self) -> usize {
        self.ingredients.len() + self.tags.len() + self.meal_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn cache_key(name: &str) -> String {
    name.to_lowercase()
}

fn push_unique(ids: &mut Vec<i64>, id: i64) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

/// Imports markdown recipe documents into one store
pub struct MarkdownImporter<S, R> {
    store: S,
    rng: R,
    config: ImportConfig,
}

impl<S: RecipeStore, R: Rng> MarkdownImporter<S, R> {
    /// Create an importer with the default configuration
    pub fn new(store: S, rng: R) -> Self {
        Self::with_config(store, rng, ImportConfig::default())
    }

    pub fn with_config(store: S, rng: R, config: ImportConfig) -> Self {
        Self { store, rng, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Parse a document without touching the store
    pub fn preview(&self, markdown: &str) -> Vec<ParsedRecipe> {
        parse_markdown_recipes(markdown)
    }

    /// Parse a document and persist every recipe in it for an account
    ///
    /// Only a failure to load the account's reference data is returned as an
    /// error. A document without recipes and failures of single recipes are
    /// reported through [`ImportSummary::errors`].
    pub async fn import(&mut self, markdown: &str, account_id: i64) -> Result<ImportSummary> {
        let recipes = parse_markdown_recipes(markdown);
        let locale = self.config.locale.clone();

        if recipes.is_empty() {
            warn!(account_id, "Import document contains no recipes");
            return Ok(ImportSummary {
                imported_count: 0,
                errors: vec![ImportError::NoRecipesFound.localized(&locale)],
            });
        }

        let mut cache = self.load_reference_data(account_id).await?;
        info!(
            account_id,
            recipes = recipes.len(),
            cached = cache.len(),
            "Starting recipe import"
        );

        let mut summary = ImportSummary::default();
        for parsed in &recipes {
            match self.import_recipe(&mut cache, account_id, parsed).await {
                Ok(recipe) => {
                    debug!(recipe_id = recipe.id, name = %recipe.name, "Imported recipe");
                    summary.imported_count += 1;
                }
                Err(err) => {
                    let reason = format!("{err:#}");
                    error!(name = %parsed.name, error = %reason, "Failed to import recipe");
                    let failure = ImportError::RecipeFailed {
                        recipe_name: parsed.name.clone(),
                        reason,
                    };
                    summary.errors.push(failure.localized(&locale));
                }
            }
        }

        info!(
            account_id,
            imported = summary.imported_count,
            failed = summary.errors.len(),
            "Recipe import finished"
        );
        Ok(summary)
    }

    async fn load_reference_data(&self, account_id: i64) -> Result<ReferenceCache> {
        let load = async {
            let ingredients = self.store.list_ingredients(account_id).await?;
            let meal_types = self.store.list_meal_types(account_id).await?;
            let tags = self.store.list_tags(account_id).await?;
            anyhow::Ok(ReferenceCache::new(&ingredients, &tags, &meal_types))
        };

        load.await.map_err(|err| {
            let err = ImportError::ReferenceDataLoad(format!("{err:#}"));
            error!(account_id, error = %err, "Failed to load reference data");
            anyhow::Error::new(err)
        })
    }

    async fn import_recipe(
        &mut self,
        cache: &mut ReferenceCache,
        account_id: i64,
        parsed: &ParsedRecipe,
    ) -> Result<Recipe> {
        let mut new_recipe = NewRecipe::from_parsed(parsed);

        for line in &parsed.ingredients {
            let ingredient_id = match cache.ingredient_id(&line.name) {
                Some(id) => id,
                None => {
                    let created = self
                        .store
                        .create_ingredient(
                            account_id,
                            &NewIngredient {
                                name: line.name.clone(),
                                category: self.config.default_category.clone(),
                                default_unit: line.unit.as_str().to_string(),
                            },
                        )
                        .await?;
                    debug!(id = created.id, name = %created.name, "Created ingredient");
                    cache.insert_ingredient(&created.name, created.id);
                    created.id
                }
            };
            new_recipe.ingredients.push(RecipeIngredientInput {
                ingredient_id,
                amount: line.amount,
                unit: line.unit.as_str().to_string(),
            });
        }

        for name in &parsed.meal_type_names {
            match cache.meal_type_id(name) {
                Some(id) => push_unique(&mut new_recipe.meal_type_ids, id),
                None => debug!(meal_type = %name, recipe = %parsed.name, "Skipping unknown meal type"),
            }
        }

        for name in &parsed.tag_names {
            let tag_id = match cache.tag_id(name) {
                Some(id) => id,
                None => {
                    let color = self.pick_tag_color();
                    let created = self
                        .store
                        .create_tag(
                            account_id,
                            &NewTag {
                                name: name.clone(),
                                color,
                            },
                        )
                        .await?;
                    debug!(id = created.id, name = %created.name, color = %created.color, "Created tag");
                    cache.insert_tag(&created.name, created.id);
                    created.id
                }
            };
            push_unique(&mut new_recipe.tag_ids, tag_id);
        }

        self.store.create_recipe(account_id, &new_recipe).await
    }

    fn pick_tag_color(&mut self) -> String {
        self.config
            .tag_palette
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| TAG_COLORS[0].to_string())
    }
}

/// Read a recipe document from disk after checking its extension and size
pub fn read_document(path: &Path, config: &ImportConfig) -> Result<String> {
    let file_name = path.display().to_string();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ImportError::UnsupportedFile(file_name).into());
    }

    let metadata = fs::metadata(path).with_context(|| format!("Failed to read {file_name}"))?;
    if metadata.len() > config.max_document_size {
        return Err(ImportError::DocumentTooLarge {
            file_name,
            max_bytes: config.max_document_size,
        }
        .into());
    }

    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {file_name}"))?;
    debug!(file = %file_name, bytes = content.len(), "Read recipe document");
    Ok(content)
}

/// Create the standard meal types an account lacks and return all of its meal types
///
/// Names are compared case-insensitively; new meal types are ordered after the
/// existing ones.
pub async fn add_missing_default_meal_types<S>(store: &S, account_id: i64) -> Result<Vec<MealType>>
where
    S: RecipeStore + ?Sized,
{
    let existing = store.list_meal_types(account_id).await?;
    let mut next_order = existing
        .iter()
        .map(|m| m.sort_order)
        .max()
        .map_or(0, |max| max + 1);

    let mut created = 0;
    for name in DEFAULT_MEAL_TYPES {
        let key = cache_key(name);
        if existing.iter().any(|m| cache_key(&m.name) == key) {
            continue;
        }
        store
            .create_meal_type(
                account_id,
                &NewMealType {
                    name: name.to_string(),
                    sort_order: next_order,
                },
            )
            .await?;
        next_order += 1;
        created += 1;
    }

    if created > 0 {
        info!(account_id, created, "Added default meal types");
    }
    store.list_meal_types(account_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ingredient(id: i64, name: &str) -> Ingredient {
        Ingredient {
            id,
            account_id: 1,
            name: name.to_string(),
            category: "Inne".to_string(),
            default_unit: "g".to_string(),
            calories_per_100g: None,
            protein_per_100g: None,
            carbs_per_100g: None,
            fat_per_100g: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_cache_lookup_ignores_case() {
        let mut cache = ReferenceCache::new(&[ingredient(4, "Mąka")], &[], &[]);
        assert_eq!(cache.ingredient_id("MĄKA"), Some(4));
        assert_eq!(cache.ingredient_id("mąka pszenna"), None);

        cache.insert_tag("Szybkie", 9);
        assert_eq!(cache.tag_id("szybkie"), Some(9));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_keeps_first_duplicate() {
        let cache = ReferenceCache::new(&[ingredient(1, "jajko"), ingredient(2, "Jajko")], &[], &[]);
        assert_eq!(cache.ingredient_id("jajko"), Some(1));
    }

    #[test]
    fn test_summary_render() {
        let summary = ImportSummary {
            imported_count: 2,
            errors: vec!["Błąd przy imporcie \"X\": boom".to_string()],
        };
        assert_eq!(
            summary.render("pl"),
            "Zaimportowano 2 przepisy\nBłąd przy imporcie \"X\": boom"
        );
        assert!(!summary.is_complete());
    }

    #[tokio::test]
    async fn test_repeated_tag_resolves_once() -> Result<()> {
        let mut importer = MarkdownImporter::new(InMemoryStore::new(), StdRng::seed_from_u64(1));
        let summary = importer
            .import("# Sałatka\n## Info\n- Tagi: Lato, lato, LATO", 1)
            .await?;

        assert_eq!(summary.imported_count, 1);
        let stored = importer.store().recipes(1).await;
        assert_eq!(stored[0].tag_ids.len(), 1);
        assert_eq!(importer.store().list_tags(1).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_default_meal_types_skips_existing() -> Result<()> {
        let store = InMemoryStore::new();
        store
            .create_meal_type(1, &NewMealType { name: "obiad".to_string(), sort_order: 4 })
            .await?;

        let meal_types = add_missing_default_meal_types(&store, 1).await?;
        let names: Vec<&str> = meal_types.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["obiad", "Śniadanie", "II śniadanie", "Kolacja", "Przekąska"]
        );
        assert_eq!(meal_types[1].sort_order, 5);

        let again = add_missing_default_meal_types(&store, 1).await?;
        assert_eq!(again.len(), 5);
        Ok(())
    }
}
