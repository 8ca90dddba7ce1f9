//! Language configuration.
//!
//! The language configuration is supplied to every generation, validation
//! and defaulting call and is immutable for the process lifetime. It can be
//! declared in a TOML file:
//!
//! ```toml
//! default_language = "de"
//!
//! [[languages]]
//! tag = "de"
//! description = "Deutsch"
//!
//! [[languages]]
//! tag = "en"
//! description = "English"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CmsError;
use crate::schema::types::SchemaError;

/// One configured language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    pub tag: String,
    #[serde(default)]
    pub description: String,
}

/// The ordered set of languages localized fields are maintained in, plus
/// the tag used as the fallback at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    pub default_language: String,
    pub languages: Vec<Language>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            languages: vec![Language {
                tag: "en".to_string(),
                description: "English".to_string(),
            }],
        }
    }
}

impl LanguageConfig {
    /// Build a config from plain tags; the description defaults to the tag.
    /// Mostly useful in tests and fixtures.
    pub fn with_tags(default_language: &str, tags: &[&str]) -> Self {
        Self {
            default_language: default_language.to_string(),
            languages: tags
                .iter()
                .map(|tag| Language {
                    tag: (*tag).to_string(),
                    description: (*tag).to_string(),
                })
                .collect(),
        }
    }

    /// Load and validate a configuration from a TOML file.
    ///
    /// # Errors
    /// Returns a `CmsError` when the file cannot be read, parsed, or fails
    /// validation.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, CmsError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&raw).map_err(|e| CmsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is internally consistent.
    ///
    /// # Errors
    /// Returns a `SchemaError` when no language is configured, a tag is
    /// duplicated, or the default language is not in the list.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.languages.is_empty() {
            return Err(SchemaError::InvalidLanguages(
                "at least one language must be configured".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for language in &self.languages {
            if language.tag.is_empty() {
                return Err(SchemaError::InvalidLanguages(
                    "language tag cannot be empty".to_string(),
                ));
            }
            if !seen.insert(language.tag.as_str()) {
                return Err(SchemaError::InvalidLanguages(format!(
                    "duplicate language tag '{}'",
                    language.tag
                )));
            }
        }
        if !self.contains(&self.default_language) {
            return Err(SchemaError::InvalidLanguages(format!(
                "default language '{}' is not in the configured languages",
                self.default_language
            )));
        }
        Ok(())
    }

    /// Iterate the configured language tags in declaration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(|l| l.tag.as_str())
    }

    /// Whether `tag` is a configured language.
    pub fn contains(&self, tag: &str) -> bool {
        self.languages.iter().any(|l| l.tag == tag)
    }

    /// The requested tag when configured, the default tag otherwise.
    pub fn resolve<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(tag) if self.contains(tag) => tag,
            _ => &self.default_language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validate_rejects_unknown_default() {
        let config = LanguageConfig::with_tags("fr", &["de", "en"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let config = LanguageConfig::with_tags("de", &["de", "de"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let config = LanguageConfig::with_tags("de", &["de", "en"]);
        assert_eq!(config.resolve(Some("en")), "en");
        assert_eq!(config.resolve(Some("fr")), "de");
        assert_eq!(config.resolve(None), "de");
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "default_language = \"de\"\n\n[[languages]]\ntag = \"de\"\ndescription = \"Deutsch\"\n\n[[languages]]\ntag = \"en\"\ndescription = \"English\"\n"
        )
        .unwrap();
        let config = LanguageConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.default_language, "de");
        assert_eq!(config.tags().collect::<Vec<_>>(), vec!["de", "en"]);
    }
}
