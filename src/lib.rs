//! # Meal Import
//!
//! Imports recipes written in a small markdown dialect (Polish section names)
//! into a family meal planning database. Documents are parsed into
//! [`recipe_model::ParsedRecipe`] values, their ingredient, tag and meal type
//! names are reconciled with the account's existing data, and every recipe is
//! stored through a [`store::RecipeStore`].

pub mod db;
pub mod import_config;
pub mod import_errors;
pub mod importer;
pub mod ingredient_model;
pub mod ingredient_parser;
pub mod localization;
pub mod measurement_patterns;
pub mod recipe_model;
pub mod recipe_parser;
pub mod store;
