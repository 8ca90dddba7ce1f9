//! Structurally valid default values for any schema node.
//!
//! Used by the editing UI to seed new records and by the language
//! flattening pass as the fallback when a language slot is missing.
//! Defaulting is deterministic: repeated calls produce structurally
//! identical output (only the literal `DateTime` timestamp varies with the
//! wall clock), and it never depends on any data.

use chrono::Utc;
use serde_json::{json, Map, Value};

use crate::config::LanguageConfig;

use super::types::SchemaNode;

/// Produce the default value for a node, or `None` when the node defaults
/// to "no value" (references, media, and objects without declared fields).
pub fn empty_value(node: &SchemaNode, languages: &LanguageConfig) -> Option<Value> {
    let plain = plain_value(node, languages)?;
    if node.i18n() {
        Some(wrap_i18n(plain, languages))
    } else {
        Some(plain)
    }
}

/// The default for a node ignoring its `i18n` flag: the value a single
/// language slot holds. The language flattening pass uses this to fill
/// missing slots.
pub fn plain_value(node: &SchemaNode, languages: &LanguageConfig) -> Option<Value> {
    let plain = match node {
        SchemaNode::Id(f) | SchemaNode::String(f) => {
            f.default_value.clone().unwrap_or_else(|| json!(""))
        }
        SchemaNode::Boolean(f) => f.default_value.clone().unwrap_or_else(|| json!(true)),
        SchemaNode::Int(f) => f.default_value.clone().unwrap_or_else(|| json!(0)),
        SchemaNode::Float(f) => f.default_value.clone().unwrap_or_else(|| json!(0.0)),
        SchemaNode::DateTime(f) => f
            .default_value
            .clone()
            .unwrap_or_else(|| json!(Utc::now().to_rfc3339())),
        SchemaNode::Enum(f) => match f.structural_default() {
            Some(value) => json!(value),
            None => Value::Null,
        },
        SchemaNode::RichText(_) => empty_rich_text(),
        SchemaNode::Media(_) | SchemaNode::Reference(_) => return None,
        SchemaNode::List(_) => json!([]),
        SchemaNode::Object(object) => {
            if object.fields.is_empty() {
                return None;
            }
            let mut map = Map::new();
            for (key, child) in &object.fields {
                if let Some(value) = empty_value(child, languages) {
                    map.insert(key.clone(), value);
                }
            }
            return Some(Value::Object(map));
        }
        SchemaNode::Union(union) => {
            let (case_name, case_schema) = union.cases.first()?;
            let mut map = Map::new();
            let inner = empty_value(&SchemaNode::Object(case_schema.clone()), languages)
                .unwrap_or_else(|| json!({}));
            map.insert(case_name.clone(), inner);
            return Some(Value::Object(map));
        }
    };

    Some(plain)
}

/// The default rich-text tree: a single empty paragraph node.
pub fn empty_rich_text() -> Value {
    json!({
        "type": "doc",
        "content": [ { "type": "paragraph", "content": [] } ]
    })
}

/// Repeat the same default once per configured language tag.
fn wrap_i18n(plain: Value, languages: &LanguageConfig) -> Value {
    let mut map = Map::new();
    for tag in languages.tags() {
        map.insert(tag.to_string(), plain.clone());
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{EnumField, EnumValue, ObjectSchema, ScalarField, UnionField};
    use indexmap::IndexMap;
    use serde_json::json;

    fn languages() -> LanguageConfig {
        LanguageConfig::with_tags("de", &["de", "en"])
    }

    #[test]
    fn test_scalar_defaults() {
        let langs = languages();
        assert_eq!(
            empty_value(&SchemaNode::String(ScalarField::default()), &langs),
            Some(json!(""))
        );
        assert_eq!(
            empty_value(&SchemaNode::Int(ScalarField::default()), &langs),
            Some(json!(0))
        );
        assert_eq!(
            empty_value(&SchemaNode::Boolean(ScalarField::default()), &langs),
            Some(json!(true))
        );
        assert_eq!(
            empty_value(&SchemaNode::Media(Default::default()), &langs),
            None
        );
    }

    #[test]
    fn test_i18n_wrapping() {
        let node = SchemaNode::String(ScalarField {
            i18n: true,
            ..Default::default()
        });
        assert_eq!(
            empty_value(&node, &languages()),
            Some(json!({ "de": "", "en": "" }))
        );
    }

    #[test]
    fn test_union_defaults_to_first_case() {
        let mut fields = IndexMap::new();
        fields.insert(
            "headline".to_string(),
            SchemaNode::String(ScalarField::default()),
        );
        let mut cases = IndexMap::new();
        cases.insert(
            "hero".to_string(),
            ObjectSchema {
                fields,
                ..Default::default()
            },
        );
        cases.insert("teaser".to_string(), ObjectSchema::default());
        let node = SchemaNode::Union(UnionField {
            cases,
            optional: false,
            name: None,
            name_input: None,
        });

        assert_eq!(
            empty_value(&node, &languages()),
            Some(json!({ "hero": { "headline": "" } }))
        );
    }

    #[test]
    fn test_empty_object_has_no_value() {
        let node = SchemaNode::Object(ObjectSchema::default());
        assert_eq!(empty_value(&node, &languages()), None);
    }

    #[test]
    fn test_defaulting_is_idempotent() {
        let node = SchemaNode::Enum(EnumField {
            values: vec![EnumValue {
                value: "draft".into(),
                description: None,
            }],
            optional: false,
            i18n: true,
            filterable: false,
            default_value: None,
            name: None,
        });
        let langs = languages();
        assert_eq!(empty_value(&node, &langs), empty_value(&node, &langs));
    }
}
