//! Content models and persisted content records.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::node::SchemaNode;

/// The two field trees of a content model: the editable `content` payload
/// and the optional `meta` payload (title, slug, and other record-level
/// fields the operator wants alongside the content).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSchema {
    #[serde(default)]
    pub content: IndexMap<String, SchemaNode>,
    #[serde(default)]
    pub meta: IndexMap<String, SchemaNode>,
}

/// The declared schema plus naming metadata for one content type.
///
/// Models are declared once (typically from a JSON file) and are immutable
/// for the process lifetime; hot-reload is not supported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModel {
    pub identifier: String,
    pub name_singular: String,
    pub name_plural: String,
    pub schema: ModelSchema,
}

impl ContentModel {
    /// Parse a model from its JSON declaration.
    ///
    /// # Errors
    /// Returns the underlying serde error when the declaration does not
    /// match the model shape.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// One persisted piece of content, validated against its model.
///
/// `id` is assigned once at creation and never changes; `modified_at` is
/// updated on every write; the publication dates are only touched by the
/// explicit publish/unpublish operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: String,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub de_publication_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub shared: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug_i18n: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_index_i18n: Option<HashMap<String, String>>,
    pub content: Value,
    #[serde(default)]
    pub meta: Value,
}

impl ContentRecord {
    /// Mark the record published as of now. Clears any earlier
    /// de-publication date.
    pub fn publish(&mut self) {
        self.publication_date = Some(Utc::now());
        self.de_publication_date = None;
    }

    /// Mark the record de-published as of now.
    pub fn unpublish(&mut self) {
        self.de_publication_date = Some(Utc::now());
    }

    /// A record counts as published when it has a publication date and no
    /// later de-publication date.
    pub fn is_published(&self) -> bool {
        match (self.publication_date, self.de_publication_date) {
            (Some(pub_at), Some(depub_at)) => pub_at > depub_at,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> ContentRecord {
        ContentRecord {
            id: "r1".into(),
            content_type: "article".into(),
            created_at: Utc::now(),
            modified_at: Utc::now(),
            publication_date: None,
            de_publication_date: None,
            shared: false,
            title: String::new(),
            slug_i18n: None,
            search_index: None,
            search_index_i18n: None,
            content: json!({}),
            meta: json!({}),
        }
    }

    #[test]
    fn test_publish_cycle() {
        let mut rec = record();
        assert!(!rec.is_published());
        rec.publish();
        assert!(rec.is_published());
        rec.unpublish();
        assert!(!rec.is_published());
        rec.publish();
        assert!(rec.is_published());
        assert!(rec.de_publication_date.is_none());
    }

    #[test]
    fn test_model_declaration_parses() {
        let model = ContentModel::from_json(
            r#"{
                "identifier": "article",
                "nameSingular": "Article",
                "namePlural": "Articles",
                "schema": {
                    "content": {
                        "title": { "type": "string", "i18n": true, "searchable": true }
                    },
                    "meta": {
                        "slug": { "type": "string", "i18n": true }
                    }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(model.identifier, "article");
        assert!(model.schema.content.contains_key("title"));
        assert!(model.schema.meta.contains_key("slug"));
    }
}
