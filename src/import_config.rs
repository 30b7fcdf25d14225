//! # Import Configuration Module
//!
//! Defaults used when the importer has to create reference data, plus the
//! limits applied to input files.

use crate::import_errors::ImportError;
use crate::localization::SUPPORTED_LOCALES;

// Constants for import configuration
pub const DEFAULT_CATEGORY: &str = "Inne";
pub const DEFAULT_LOCALE: &str = "pl";
pub const MAX_DOCUMENT_SIZE: u64 = 1024 * 1024; // 1MB is far more than any recipe collection
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

/// Colors assigned to newly created tags
pub const TAG_COLORS: [&str; 6] = [
    "#10b981", // green
    "#3b82f6", // blue
    "#8b5cf6", // violet
    "#ec4899", // pink
    "#f59e0b", // amber
    "#ef4444", // red
];

/// Meal types every account is expected to have, in display order
pub const DEFAULT_MEAL_TYPES: [&str; 5] = ["Śniadanie", "II śniadanie", "Obiad", "Kolacja", "Przekąska"];

/// Environment variable overriding the message locale
pub const LOCALE_ENV: &str = "MEAL_IMPORT_LOCALE";
/// Environment variable overriding the category of created ingredients
pub const DEFAULT_CATEGORY_ENV: &str = "MEAL_IMPORT_DEFAULT_CATEGORY";

/// Configuration structure for recipe imports
#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    /// Category given to ingredients created during an import
    pub default_category: String,
    /// Colors a new tag picks from
    pub tag_palette: Vec<String>,
    /// Locale of summary and error messages (`pl` or `en`)
    pub locale: String,
    /// Maximum accepted input file size in bytes
    pub max_document_size: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_category: DEFAULT_CATEGORY.to_string(),
            tag_palette: TAG_COLORS.iter().map(|c| c.to_string()).collect(),
            locale: DEFAULT_LOCALE.to_string(),
            max_document_size: MAX_DOCUMENT_SIZE,
        }
    }
}

impl ImportConfig {
    /// Defaults overridden by `MEAL_IMPORT_LOCALE` and `MEAL_IMPORT_DEFAULT_CATEGORY`
    pub fn from_env() -> Result<Self, ImportError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ImportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(locale) = lookup(LOCALE_ENV) {
            config.locale = locale.trim().to_lowercase();
        }
        if let Some(category) = lookup(DEFAULT_CATEGORY_ENV) {
            config.default_category = category.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Replace the message locale, rejecting unsupported ones
    pub fn with_locale(mut self, locale: &str) -> Result<Self, ImportError> {
        self.locale = locale.trim().to_lowercase();
        self.validate()?;
        Ok(self)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), ImportError> {
        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            return Err(ImportError::Configuration(format!(
                "unsupported locale '{}', expected one of: {}",
                self.locale,
                SUPPORTED_LOCALES.join(", ")
            )));
        }
        if self.default_category.is_empty() {
            return Err(ImportError::Configuration(
                "default ingredient category must not be empty".to_string(),
            ));
        }
        if self.tag_palette.is_empty() {
            return Err(ImportError::Configuration(
                "tag color palette must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
