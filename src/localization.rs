//! # Localization
//!
//! Fluent bundles for the messages shown after an import. Polish is the
//! primary language; English is provided for the CLI and as a second locale.
//! Message files are embedded at compile time from `locales/<lang>/main.ftl`.

use crate::import_config::DEFAULT_LOCALE;
use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use unic_langid::LanguageIdentifier;

/// Locales with a message file
pub const SUPPORTED_LOCALES: [&str; 2] = ["pl", "en"];

const POLISH_MESSAGES: &str = include_str!("../locales/pl/main.ftl");
const ENGLISH_MESSAGES: &str = include_str!("../locales/en/main.ftl");

/// Localization manager holding one bundle per supported locale
pub struct LocalizationManager {
    bundles: HashMap<String, Arc<FluentBundle<FluentResource>>>,
}

impl LocalizationManager {
    /// Create a new localization manager
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for (lang, source) in [("pl", POLISH_MESSAGES), ("en", ENGLISH_MESSAGES)] {
            let locale: LanguageIdentifier = lang.parse()?;
            let bundle = Self::create_bundle(&locale, source)?;
            bundles.insert(lang.to_string(), Arc::new(bundle));
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(
        locale: &LanguageIdentifier,
        source: &str,
    ) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new_concurrent(vec![locale.clone()]);
        // Messages are printed to terminals and stored as plain strings
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid messages for {locale}: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Duplicate messages for {locale}: {errors:?}"))?;

        Ok(bundle)
    }

    /// Get a localized message in a language, falling back to Polish
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, FluentValue::from(*value));
            }
            fluent_args
        });
        self.format_with_fallback(key, language, fluent_args.as_ref())
    }

    /// Get a localized message whose `$count` argument selects a plural form
    pub fn get_count_message_in_language(&self, key: &str, language: &str, count: usize) -> String {
        let mut fluent_args = FluentArgs::new();
        fluent_args.set("count", FluentValue::from(count));
        self.format_with_fallback(key, language, Some(&fluent_args))
    }

    fn format_with_fallback(&self, key: &str, language: &str, args: Option<&FluentArgs>) -> String {
        self.format(key, language, args)
            .or_else(|| self.format(key, DEFAULT_LOCALE, args))
            .unwrap_or_else(|| format!("Missing translation: {key}"))
    }

    fn format(&self, key: &str, language: &str, args: Option<&FluentArgs>) -> Option<String> {
        let bundle = self.bundles.get(language)?;
        let pattern = bundle.get_message(key)?.value()?;

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            log::warn!("Formatting '{key}' in '{language}' reported: {errors:?}");
        }
        Some(value.into_owned())
    }
}

/// Global localization instance built from the embedded message files
static LOCALIZATION_MANAGER: LazyLock<LocalizationManager> = LazyLock::new(|| {
    LocalizationManager::new().expect("Embedded locale files must be valid Fluent")
});

/// Get the global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    &LOCALIZATION_MANAGER
}

/// Localized message without arguments
pub fn t_lang(key: &str, language: Option<&str>) -> String {
    t_args_lang(key, &[], language)
}

/// Localized message with string arguments
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language: Option<&str>) -> String {
    let language = language.unwrap_or(DEFAULT_LOCALE);
    let manager = get_localization_manager();
    if args.is_empty() {
        manager.get_message_in_language(key, language, None)
    } else {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        manager.get_message_in_language(key, language, Some(&args_map))
    }
}

/// Localized message with a plural-selecting `$count`
pub fn t_count_lang(key: &str, count: usize, language: Option<&str>) -> String {
    get_localization_manager().get_count_message_in_language(
        key,
        language.unwrap_or(DEFAULT_LOCALE),
        count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polish_plurals() {
        assert_eq!(t_count_lang("import-success", 1, Some("pl")), "Zaimportowano 1 przepis");
        assert_eq!(t_count_lang("import-success", 3, Some("pl")), "Zaimportowano 3 przepisy");
        assert_eq!(t_count_lang("import-success", 5, Some("pl")), "Zaimportowano 5 przepisów");
        assert_eq!(t_count_lang("import-success", 22, Some("pl")), "Zaimportowano 22 przepisy");
    }

    #[test]
    fn test_english_plurals() {
        assert_eq!(t_count_lang("import-success", 1, Some("en")), "Imported 1 recipe");
        assert_eq!(t_count_lang("import-success", 2, Some("en")), "Imported 2 recipes");
    }

    #[test]
    fn test_unknown_language_falls_back_to_polish() {
        assert_eq!(
            t_lang("import-nothing-imported", Some("fr")),
            "Nie zaimportowano żadnego przepisu"
        );
    }

    #[test]
    fn test_missing_key() {
        assert_eq!(t_lang("no-such-key", None), "Missing translation: no-such-key");
    }
}
