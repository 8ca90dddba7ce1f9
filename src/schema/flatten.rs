//! Read-time flattening of localized values to a single language.
//!
//! The public read surface serves one resolved language per request. This
//! pass collapses every `i18n` leaf's per-language map to the requested
//! language, falling back to the default language and finally to the
//! generated default when a slot is missing. It reuses the same node
//! visitor structure as the default generator and is a pure function of
//! (schema, value, language).

use serde_json::Value;

use crate::config::LanguageConfig;

use super::case::{resolve_case, UnionCase};
use super::defaults;
use super::types::{ContentModel, SchemaNode};

/// Collapse all localized leaves in `value` to `language`.
pub fn resolve_node_language(
    node: &SchemaNode,
    value: &Value,
    language: &str,
    languages: &LanguageConfig,
) -> Value {
    if node.i18n() {
        return pick_language(node, value, language, languages);
    }

    match node {
        SchemaNode::Object(object) => {
            resolve_fields(object.fields.iter(), value, language, languages)
        }
        SchemaNode::List(list) => match value {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| resolve_node_language(&list.of, item, language, languages))
                    .collect(),
            ),
            other => other.clone(),
        },
        SchemaNode::Union(union) => match resolve_case(value) {
            UnionCase::Case(case_name, inner) => match union.cases.get(case_name) {
                Some(case_schema) => {
                    let resolved =
                        resolve_fields(case_schema.fields.iter(), inner, language, languages);
                    let mut map = serde_json::Map::new();
                    map.insert(case_name.to_string(), resolved);
                    Value::Object(map)
                }
                None => value.clone(),
            },
            _ => value.clone(),
        },
        _ => value.clone(),
    }
}

/// Collapse a whole record's `content` and `meta` payloads in place, and
/// derive a single `slug` from `slugI18n` when present.
pub fn resolve_record_language(
    model: &ContentModel,
    record: &mut Value,
    language: &str,
    languages: &LanguageConfig,
) {
    if let Some(content) = record.get("content") {
        let resolved = resolve_fields(
            model.schema.content.iter(),
            content,
            language,
            languages,
        );
        record["content"] = resolved;
    }
    if let Some(meta) = record.get("meta") {
        let resolved = resolve_fields(model.schema.meta.iter(), meta, language, languages);
        record["meta"] = resolved;
    }
    let slug = record
        .get("slugI18n")
        .and_then(|slugs| {
            slugs
                .get(language)
                .or_else(|| slugs.get(&languages.default_language))
        })
        .cloned();
    if let Some(slug) = slug {
        record["slug"] = slug;
    }
}

fn resolve_fields<'a>(
    fields: impl Iterator<Item = (&'a String, &'a SchemaNode)>,
    value: &Value,
    language: &str,
    languages: &LanguageConfig,
) -> Value {
    let map = match value {
        Value::Object(map) => map,
        other => return other.clone(),
    };
    // Unknown keys pass through verbatim; schema-known keys are overwritten
    // with their resolved form. Keys the data is missing stay missing.
    let mut resolved = map.clone();
    for (key, node) in fields {
        if let Some(raw) = map.get(key) {
            resolved.insert(
                key.clone(),
                resolve_node_language(node, raw, language, languages),
            );
        }
    }
    Value::Object(resolved)
}

/// Pick one language slot from an i18n leaf value.
fn pick_language(
    node: &SchemaNode,
    value: &Value,
    language: &str,
    languages: &LanguageConfig,
) -> Value {
    let slot = value
        .get(language)
        .filter(|v| !v.is_null())
        .or_else(|| value.get(&languages.default_language).filter(|v| !v.is_null()));
    match slot {
        Some(v) => v.clone(),
        None => defaults::plain_value(node, languages).unwrap_or(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::ScalarField;
    use serde_json::json;

    fn languages() -> LanguageConfig {
        LanguageConfig::with_tags("de", &["de", "en"])
    }

    fn i18n_string() -> SchemaNode {
        SchemaNode::String(ScalarField {
            i18n: true,
            ..Default::default()
        })
    }

    #[test]
    fn test_requested_language_wins() {
        let value = json!({ "de": "Hallo", "en": "Hello" });
        assert_eq!(
            resolve_node_language(&i18n_string(), &value, "en", &languages()),
            json!("Hello")
        );
    }

    #[test]
    fn test_falls_back_to_default_language() {
        let value = json!({ "de": "Hallo" });
        assert_eq!(
            resolve_node_language(&i18n_string(), &value, "en", &languages()),
            json!("Hallo")
        );
    }

    #[test]
    fn test_falls_back_to_generated_default() {
        let value = json!({});
        assert_eq!(
            resolve_node_language(&i18n_string(), &value, "en", &languages()),
            json!("")
        );
    }
}
