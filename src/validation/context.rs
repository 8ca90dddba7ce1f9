//! Per-write validation state.

use std::collections::HashMap;

use crate::config::LanguageConfig;
use crate::media::MediaStore;
use crate::storage::ReferenceResolver;

/// Everything one validation pass needs: the collaborators, the language
/// configuration, and the write-local search-term accumulators.
///
/// The accumulators live here rather than in shared state so concurrent
/// writes cannot race on them; a context is built per write.
pub struct ValidationContext<'a> {
    pub resolver: &'a dyn ReferenceResolver,
    pub media: &'a dyn MediaStore,
    pub languages: &'a LanguageConfig,
    search: String,
    search_i18n: HashMap<String, String>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(
        resolver: &'a dyn ReferenceResolver,
        media: &'a dyn MediaStore,
        languages: &'a LanguageConfig,
    ) -> Self {
        let mut ctx = Self {
            resolver,
            media,
            languages,
            search: String::new(),
            search_i18n: HashMap::new(),
        };
        ctx.reset_search();
        ctx
    }

    /// Empty all accumulators: the single one and one per configured
    /// language tag. Called at the top of every validation pass.
    pub fn reset_search(&mut self) {
        self.search.clear();
        self.search_i18n.clear();
        for tag in self.languages.tags() {
            self.search_i18n.insert(tag.to_string(), String::new());
        }
    }

    /// Append a term to the non-localized accumulator. Every term gets a
    /// single trailing space; the result is a token soup for full-text
    /// matching, not display text.
    pub fn push_search(&mut self, term: &str) {
        self.search.push_str(term);
        self.search.push(' ');
    }

    /// Append a term to the accumulator of one language tag.
    pub fn push_search_lang(&mut self, tag: &str, term: &str) {
        let entry = self.search_i18n.entry(tag.to_string()).or_default();
        entry.push_str(term);
        entry.push(' ');
    }

    /// The accumulated indexes, cloned for storing on the record.
    pub fn search_snapshot(&self) -> (String, HashMap<String, String>) {
        (self.search.clone(), self.search_i18n.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{MemoryStore, MockMediaStore};

    #[test]
    fn test_accumulators_reset_per_language() {
        let store = MemoryStore::new();
        let media = MockMediaStore::new();
        let languages = LanguageConfig::with_tags("de", &["de", "en"]);
        let mut ctx = ValidationContext::new(&store, &media, &languages);

        ctx.push_search("Hello");
        ctx.push_search_lang("de", "Hallo");
        let (search, by_lang) = ctx.search_snapshot();
        assert_eq!(search, "Hello ");
        assert_eq!(by_lang["de"], "Hallo ");
        assert_eq!(by_lang["en"], "");

        ctx.reset_search();
        let (search, by_lang) = ctx.search_snapshot();
        assert_eq!(search, "");
        assert_eq!(by_lang.len(), 2);
        assert!(by_lang.values().all(String::is_empty));
    }
}
