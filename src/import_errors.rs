//! # Import Error Types Module
//!
//! Error types raised while importing recipe documents. Every variant can be
//! rendered for logs through [`std::fmt::Display`] and for people through
//! [`ImportError::localized`].

use crate::localization::t_args_lang;

/// Custom error types for recipe imports
#[derive(Debug, Clone, PartialEq)]
pub enum ImportError {
    /// The document holds no recipe with a title
    NoRecipesFound,
    /// Existing ingredients, tags or meal types could not be read
    ReferenceDataLoad(String),
    /// A single recipe could not be written
    RecipeFailed { recipe_name: String, reason: String },
    /// The input file has an extension the importer does not read
    UnsupportedFile(String),
    /// The input file exceeds the size limit
    DocumentTooLarge { file_name: String, max_bytes: u64 },
    /// Invalid configuration values
    Configuration(String),
}

impl ImportError {
    /// Render the error as a message in the given locale
    pub fn localized(&self, locale: &str) -> String {
        let lang = Some(locale);
        match self {
            ImportError::NoRecipesFound => t_args_lang("import-no-recipes", &[], lang),
            ImportError::ReferenceDataLoad(reason) => {
                t_args_lang("import-reference-data-failed", &[("reason", reason)], lang)
            }
            ImportError::RecipeFailed {
                recipe_name,
                reason,
            } => t_args_lang(
                "import-recipe-error",
                &[("recipe_name", recipe_name), ("reason", reason)],
                lang,
            ),
            ImportError::UnsupportedFile(file_name) => {
                t_args_lang("file-unsupported", &[("file_name", file_name)], lang)
            }
            ImportError::DocumentTooLarge {
                file_name,
                max_bytes,
            } => t_args_lang(
                "file-too-large",
                &[("file_name", file_name), ("max_bytes", &max_bytes.to_string())],
                lang,
            ),
            ImportError::Configuration(reason) => {
                t_args_lang("config-invalid", &[("reason", reason)], lang)
            }
        }
    }
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::NoRecipesFound => write!(f, "No recipes found in document"),
            ImportError::ReferenceDataLoad(msg) => write!(f, "Reference data load error: {msg}"),
            ImportError::RecipeFailed {
                recipe_name,
                reason,
            } => write!(f, "Recipe import error for \"{recipe_name}\": {reason}"),
            ImportError::UnsupportedFile(name) => write!(f, "Unsupported file: {name}"),
            ImportError::DocumentTooLarge {
                file_name,
                max_bytes,
            } => write!(f, "Document too large: {file_name} exceeds {max_bytes} bytes"),
            ImportError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for ImportError {}
