//! Shared fixtures for the integration tests: a two-model set exercising
//! localized fields, rich text with embedded references, nested objects,
//! typed references, media and tagged unions, plus prefilled records.

#![allow(dead_code)]

use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use typecms::schema::types::ContentRecord;
use typecms::{ContentModel, LanguageConfig, ModelSet};

pub fn languages() -> LanguageConfig {
    LanguageConfig::with_tags("de", &["de", "en"])
}

pub fn author_model() -> ContentModel {
    serde_json::from_value(json!({
        "identifier": "author",
        "nameSingular": "Author",
        "namePlural": "Authors",
        "schema": {
            "content": {
                "name": { "type": "string", "searchable": true, "filterable": true },
                "bio": { "type": "richText", "optional": true }
            }
        }
    }))
    .unwrap()
}

pub fn article_model() -> ContentModel {
    serde_json::from_value(json!({
        "identifier": "article",
        "nameSingular": "Article",
        "namePlural": "Articles",
        "schema": {
            "content": {
                "title": { "type": "string", "i18n": true, "searchable": true, "filterable": true },
                "body": {
                    "type": "richText",
                    "searchable": true,
                    "options": { "referenceTypes": { "author": {} } }
                },
                "stats": {
                    "type": "object",
                    "fields": {
                        "views": { "type": "int", "filterable": true }
                    }
                },
                "author": { "type": "reference", "types": { "author": {} }, "optional": true },
                "cover": { "type": "media", "optional": true },
                "blocks": {
                    "type": "list",
                    "optional": true,
                    "of": {
                        "type": "union",
                        "cases": {
                            "hero": {
                                "fields": { "headline": { "type": "string" } }
                            },
                            "quote": {
                                "fields": {
                                    "text": { "type": "string" },
                                    "source": { "type": "string", "optional": true }
                                }
                            }
                        }
                    }
                }
            },
            "meta": {
                "title": { "type": "string" },
                "slug": { "type": "string", "i18n": true }
            }
        }
    }))
    .unwrap()
}

pub fn model_set() -> Arc<ModelSet> {
    typecms::logging::init();
    Arc::new(ModelSet::new(vec![author_model(), article_model()]).unwrap())
}

/// A minimal rich-text document with a single text node.
pub fn rich_text_doc(text: &str) -> Value {
    json!({
        "type": "doc",
        "content": [
            {
                "type": "paragraph",
                "content": [ { "type": "text", "text": text } ]
            }
        ]
    })
}

pub fn bare_record(id: &str, content_type: &str) -> ContentRecord {
    ContentRecord {
        id: id.to_string(),
        content_type: content_type.to_string(),
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

pub fn author_record(id: &str, name: &str) -> ContentRecord {
    let mut record = bare_record(id, "author");
    record.title = name.to_string();
    record.search_index = Some(format!("{name} "));
    record.content = json!({ "name": name });
    record
}

pub fn article_record(id: &str) -> ContentRecord {
    let mut record = bare_record(id, "article");
    record.title = "Hello".to_string();
    record.slug_i18n = Some(
        [("de", "hallo"), ("en", "hello")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    );
    record.search_index = Some("World ".to_string());
    record.search_index_i18n = Some(
        [("de", "Hallo "), ("en", "Hello ")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    );
    record.content = json!({
        "title": { "de": "Hallo", "en": "Hello" },
        "body": rich_text_doc("World"),
        "stats": { "views": 42 },
        "author": { "recordId": "auth1", "contentType": "author" },
        "blocks": [ { "hero": { "headline": "Big" } } ]
    });
    record.meta = json!({
        "title": "Hello",
        "slug": { "de": "hallo", "en": "hello" }
    });
    record
}
