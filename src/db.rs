use crate::recipe_model::{
    Ingredient, MealType, NewIngredient, NewMealType, NewRecipe, NewTag, Recipe,
    RecipeIngredientInput, Tag,
};
use crate::store::RecipeStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::{debug, info};

const RECIPE_COLUMNS: &str = "id, account_id, name, description, instructions, servings, \
    prep_time_minutes, cook_time_minutes, is_vegetarian, is_vegan, is_gluten_free, \
    is_lactose_free, is_quick, is_meal_prep, is_child_friendly, created_at";

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS ingredients (
            id BIGSERIAL PRIMARY KEY,
            account_id BIGINT NOT NULL,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            default_unit TEXT NOT NULL DEFAULT 'g',
            calories_per_100g DOUBLE PRECISION,
            protein_per_100g DOUBLE PRECISION,
            carbs_per_100g DOUBLE PRECISION,
            fat_per_100g DOUBLE PRECISION,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create ingredients table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tags (
            id BIGSERIAL PRIMARY KEY,
            account_id BIGINT NOT NULL,
            name TEXT NOT NULL,
            color TEXT NOT NULL DEFAULT '#6b7280',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create tags table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS meal_types (
            id BIGSERIAL PRIMARY KEY,
            account_id BIGINT NOT NULL,
            name TEXT NOT NULL,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create meal_types table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipes (
            id BIGSERIAL PRIMARY KEY,
            account_id BIGINT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            instructions TEXT,
            servings INTEGER NOT NULL DEFAULT 1 CHECK (servings >= 1),
            prep_time_minutes INTEGER CHECK (prep_time_minutes >= 0),
            cook_time_minutes INTEGER CHECK (cook_time_minutes >= 0),
            is_vegetarian BOOLEAN NOT NULL DEFAULT FALSE,
            is_vegan BOOLEAN NOT NULL DEFAULT FALSE,
            is_gluten_free BOOLEAN NOT NULL DEFAULT FALSE,
            is_lactose_free BOOLEAN NOT NULL DEFAULT FALSE,
            is_quick BOOLEAN NOT NULL DEFAULT FALSE,
            is_meal_prep BOOLEAN NOT NULL DEFAULT FALSE,
            is_child_friendly BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create recipes table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipe_ingredients (
            id BIGSERIAL PRIMARY KEY,
            recipe_id BIGINT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            ingredient_id BIGINT NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
            amount DOUBLE PRECISION NOT NULL,
            unit TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create recipe_ingredients table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipe_tags (
            recipe_id BIGINT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            tag_id BIGINT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (recipe_id, tag_id)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create recipe_tags table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipe_meal_types (
            recipe_id BIGINT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            meal_type_id BIGINT NOT NULL REFERENCES meal_types(id) ON DELETE CASCADE,
            PRIMARY KEY (recipe_id, meal_type_id)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create recipe_meal_types table")?;

    for table in ["ingredients", "tags", "meal_types", "recipes"] {
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_account_id ON {table}(account_id)"
        ))
        .execute(pool)
        .await
        .with_context(|| format!("Failed to create account index on {table}"))?;
    }

    info!("Database schema initialized successfully");
    Ok(())
}

/// List the ingredients of an account ordered by name
pub async fn list_ingredients_by_account(pool: &PgPool, account_id: i64) -> Result<Vec<Ingredient>> {
    debug!(account_id, "Listing ingredients");

    sqlx::query_as::<_, Ingredient>(
        "SELECT id, account_id, name, category, default_unit, calories_per_100g, protein_per_100g,
                carbs_per_100g, fat_per_100g, created_at
         FROM ingredients WHERE account_id = $1 ORDER BY name, id",
    )
    .bind(account_id)
    .fetch_all(pool)
    .await
    .context("Failed to list ingredients")
}

/// Create a new ingredient
pub async fn create_ingredient(pool: &PgPool, account_id: i64, ingredient: &NewIngredient) -> Result<Ingredient> {
    info!(account_id, name = %ingredient.name, "Creating ingredient");

    let created = sqlx::query_as::<_, Ingredient>(
        "INSERT INTO ingredients (account_id, name, category, default_unit)
         VALUES ($1, $2, $3, $4)
         RETURNING id, account_id, name, category, default_unit, calories_per_100g,
                   protein_per_100g, carbs_per_100g, fat_per_100g, created_at",
    )
    .bind(account_id)
    .bind(&ingredient.name)
    .bind(&ingredient.category)
    .bind(&ingredient.default_unit)
    .fetch_one(pool)
    .await
    .context("Failed to insert new ingredient")?;

    debug!(id = created.id, "Ingredient created");
    Ok(created)
}

/// List the tags of an account ordered by name
pub async fn list_tags_by_account(pool: &PgPool, account_id: i64) -> Result<Vec<Tag>> {
    debug!(account_id, "Listing tags");

    sqlx::query_as::<_, Tag>(
        "SELECT id, account_id, name, color, created_at
         FROM tags WHERE account_id = $1 ORDER BY name, id",
    )
    .bind(account_id)
    .fetch_all(pool)
    .await
    .context("Failed to list tags")
}

/// Create a new tag
pub async fn create_tag(pool: &PgPool, account_id: i64, tag: &NewTag) -> Result<Tag> {
    info!(account_id, name = %tag.name, color = %tag.color, "Creating tag");

    sqlx::query_as::<_, Tag>(
        "INSERT INTO tags (account_id, name, color)
         VALUES ($1, $2, $3)
         RETURNING id, account_id, name, color, created_at",
    )
    .bind(account_id)
    .bind(&tag.name)
    .bind(&tag.color)
    .fetch_one(pool)
    .await
    .context("Failed to insert new tag")
}

/// List the meal types of an account in display order
pub async fn list_meal_types_by_account(pool: &PgPool, account_id: i64) -> Result<Vec<MealType>> {
    debug!(account_id, "Listing meal types");

    sqlx::query_as::<_, MealType>(
        "SELECT id, account_id, name, sort_order, created_at
         FROM meal_types WHERE account_id = $1 ORDER BY sort_order, id",
    )
    .bind(account_id)
    .fetch_all(pool)
    .await
    .context("Failed to list meal types")
}

/// Create a new meal type
pub async fn create_meal_type(pool: &PgPool, account_id: i64, meal_type: &NewMealType) -> Result<MealType> {
    info!(account_id, name = %meal_type.name, "Creating meal type");

    sqlx::query_as::<_, MealType>(
        "INSERT INTO meal_types (account_id, name, sort_order)
         VALUES ($1, $2, $3)
         RETURNING id, account_id, name, sort_order, created_at",
    )
    .bind(account_id)
    .bind(&meal_type.name)
    .bind(meal_type.sort_order)
    .fetch_one(pool)
    .await
    .context("Failed to insert new meal type")
}

/// Create a recipe and its associations in one transaction
pub async fn create_recipe(pool: &PgPool, account_id: i64, recipe: &NewRecipe) -> Result<Recipe> {
    info!(
        account_id,
        name = %recipe.name,
        ingredients = recipe.ingredients.len(),
        tags = recipe.tag_ids.len(),
        meal_types = recipe.meal_type_ids.len(),
        "Creating recipe"
    );

    let mut tx = pool.begin().await.context("Failed to start transaction")?;

    let created = sqlx::query_as::<_, Recipe>(&format!(
        "INSERT INTO recipes (account_id, name, description, instructions, servings,
                              prep_time_minutes, cook_time_minutes, is_vegetarian, is_vegan,
                              is_gluten_free, is_lactose_free, is_quick, is_meal_prep,
                              is_child_friendly)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
         RETURNING {RECIPE_COLUMNS}"
    ))
    .bind(account_id)
    .bind(&recipe.name)
    .bind(&recipe.description)
    .bind(&recipe.instructions)
    .bind(recipe.servings)
    .bind(recipe.prep_time_minutes)
    .bind(recipe.cook_time_minutes)
    .bind(recipe.is_vegetarian)
    .bind(recipe.is_vegan)
    .bind(recipe.is_gluten_free)
    .bind(recipe.is_lactose_free)
    .bind(recipe.is_quick)
    .bind(recipe.is_meal_prep)
    .bind(recipe.is_child_friendly)
    .fetch_one(&mut *tx)
    .await
    .context("Failed to insert new recipe")?;

    for ingredient in &recipe.ingredients {
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount, unit)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(created.id)
        .bind(ingredient.ingredient_id)
        .bind(ingredient.amount)
        .bind(&ingredient.unit)
        .execute(&mut *tx)
        .await
        .context("Failed to link recipe ingredient")?;
    }

    for tag_id in &recipe.tag_ids {
        sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
            .bind(created.id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .context("Failed to link recipe tag")?;
    }

    for meal_type_id in &recipe.meal_type_ids {
        sqlx::query("INSERT INTO recipe_meal_types (recipe_id, meal_type_id) VALUES ($1, $2)")
            .bind(created.id)
            .bind(meal_type_id)
            .execute(&mut *tx)
            .await
            .context("Failed to link recipe meal type")?;
    }

    tx.commit().await.context("Failed to commit recipe")?;

    info!(id = created.id, "Recipe created");
    Ok(created)
}

/// Read a recipe by ID
pub async fn read_recipe(pool: &PgPool, recipe_id: i64) -> Result<Option<Recipe>> {
    debug!(recipe_id, "Reading recipe");

    sqlx::query_as::<_, Recipe>(&format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"))
        .bind(recipe_id)
        .fetch_optional(pool)
        .await
        .context("Failed to read recipe")
}

/// List the recipes of an account in creation order
pub async fn list_recipes_by_account(pool: &PgPool, account_id: i64) -> Result<Vec<Recipe>> {
    sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE account_id = $1 ORDER BY id"
    ))
    .bind(account_id)
    .fetch_all(pool)
    .await
    .context("Failed to list recipes")
}

/// Ingredient links of a recipe
pub async fn list_recipe_ingredients(pool: &PgPool, recipe_id: i64) -> Result<Vec<RecipeIngredientInput>> {
    let rows: Vec<(i64, f64, String)> = sqlx::query_as(
        "SELECT ingredient_id, amount, unit FROM recipe_ingredients WHERE recipe_id = $1 ORDER BY id",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await
    .context("Failed to list recipe ingredients")?;

    Ok(rows
        .into_iter()
        .map(|(ingredient_id, amount, unit)| RecipeIngredientInput {
            ingredient_id,
            amount,
            unit,
        })
        .collect())
}

/// Tag IDs linked to a recipe
pub async fn list_recipe_tag_ids(pool: &PgPool, recipe_id: i64) -> Result<Vec<i64>> {
    sqlx::query_scalar("SELECT tag_id FROM recipe_tags WHERE recipe_id = $1 ORDER BY tag_id")
        .bind(recipe_id)
        .fetch_all(pool)
        .await
        .context("Failed to list recipe tags")
}

/// Meal type IDs linked to a recipe
pub async fn list_recipe_meal_type_ids(pool: &PgPool, recipe_id: i64) -> Result<Vec<i64>> {
    sqlx::query_scalar(
        "SELECT meal_type_id FROM recipe_meal_types WHERE recipe_id = $1 ORDER BY meal_type_id",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await
    .context("Failed to list recipe meal types")
}

/// [`RecipeStore`] backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgRecipeStore {
    pool: PgPool,
}

impl PgRecipeStore {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and make sure the schema exists
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        init_database_schema(&pool).await?;
        Ok(Self::new(pool))
    }

    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn list_ingredients(&self, account_id: i64) -> Result<Vec<Ingredient>> {
        list_ingredients_by_account(&self.pool, account_id).await
    }

    async fn create_ingredient(&self, account_id: i64, ingredient: &NewIngredient) -> Result<Ingredient> {
        create_ingredient(&self.pool, account_id, ingredient).await
    }

    async fn list_tags(&self, account_id: i64) -> Result<Vec<Tag>> {
        list_tags_by_account(&self.pool, account_id).await
    }

    async fn create_tag(&self, account_id: i64, tag: &NewTag) -> Result<Tag> {
        create_tag(&self.pool, account_id, tag).await
    }

    async fn list_meal_types(&self, account_id: i64) -> Result<Vec<MealType>> {
        list_meal_types_by_account(&self.pool, account_id).await
    }

    async fn create_meal_type(&self, account_id: i64, meal_type: &NewMealType) -> Result<MealType> {
        create_meal_type(&self.pool, account_id, meal_type).await
    }

    async fn create_recipe(&self, account_id: i64, recipe: &NewRecipe) -> Result<Recipe> {
        create_recipe(&self.pool, account_id, recipe).await
    }
}
