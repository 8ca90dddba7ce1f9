//! Generic JSON-walking field resolvers.
//!
//! Generated output types all resolve the same way: the parent value is a
//! [`Node`] wrapping the record's JSON (already language-flattened on the
//! public surface), and each field extracts its key and converts according
//! to its [`ResolveKind`]. Union and multi-target reference fields attach
//! the concrete wrapper type name for runtime discrimination; reference
//! fields load the target record through the engine context.

use async_graphql::dynamic::{Field, FieldFuture, FieldValue, TypeRef};
use async_graphql::{Error, Name, Result as GqlResult, Value as GqlValue};
use futures::future::BoxFuture;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

use crate::schema::case::{resolve_case, UnionCase};
use crate::schema::flatten;

use super::schema::EngineContext;

/// The value generated object resolvers hand down to their fields: the
/// JSON subtree plus the language the surface was resolved to (`None` on
/// the admin surface, where localized leaves stay wrapped).
#[derive(Debug, Clone)]
pub struct Node {
    pub value: JsonValue,
    pub language: Option<String>,
}

impl Node {
    pub fn new(value: JsonValue, language: Option<String>) -> Self {
        Self { value, language }
    }
}

/// How a generated field turns its JSON slice into a GraphQL value.
#[derive(Debug, Clone)]
pub enum ResolveKind {
    /// Leaf passthrough: strings, numbers, booleans, ids, timestamps and
    /// rich-text trees (exposed as a scalar).
    Scalar,
    /// Leaf string exposed as a GraphQL enum value.
    EnumValue,
    /// Nested object; the subtree becomes the child resolvers' parent.
    Object,
    /// Tagged union; the single active case key picks the wrapper type.
    Union { wrappers: Arc<HashMap<String, String>> },
    /// Reference pointer, expanded by loading the target record. `single`
    /// is set when exactly one target type is declared; otherwise the
    /// wrapper map discriminates by the loaded record's content type.
    Reference {
        single: Option<String>,
        wrappers: Arc<HashMap<String, String>>,
    },
    /// Ordered sequence of one element kind.
    List(Box<ResolveKind>),
}

/// A generated field backed by JSON key extraction.
pub fn json_field(name: impl Into<String>, ty: TypeRef, kind: ResolveKind) -> Field {
    let key: String = name.into();
    let field_key = key.clone();
    Field::new(key, ty, move |ctx| {
        let key = field_key.clone();
        let kind = kind.clone();
        FieldFuture::new(async move {
            let parent = ctx.parent_value.try_downcast_ref::<Node>()?;
            let value = parent.value.get(&key).cloned().unwrap_or(JsonValue::Null);
            let language = parent.language.clone();
            let eng = ctx.data::<EngineContext>().ok();
            resolve_value(eng, value, &kind, language.as_deref()).await
        })
    })
}

/// Convert one JSON value according to its resolve kind. The returned
/// field value only holds owned data, so its lifetime is the caller's
/// choice.
pub fn resolve_value<'a, 'v>(
    eng: Option<&'a EngineContext>,
    value: JsonValue,
    kind: &'a ResolveKind,
    language: Option<&'a str>,
) -> BoxFuture<'a, GqlResult<Option<FieldValue<'v>>>>
where
    'v: 'a,
{
    Box::pin(async move {
        if value.is_null() {
            return Ok(None);
        }
        match kind {
            ResolveKind::Scalar => {
                let converted = GqlValue::from_json(value)
                    .map_err(|e| Error::new(format!("invalid leaf value: {e}")))?;
                Ok(Some(FieldValue::value(converted)))
            }

            ResolveKind::EnumValue => match value.as_str() {
                Some(text) => Ok(Some(FieldValue::value(GqlValue::Enum(Name::new(text))))),
                None => Ok(None),
            },

            ResolveKind::Object => Ok(Some(FieldValue::owned_any(Node::new(
                value,
                language.map(str::to_string),
            )))),

            ResolveKind::Union { wrappers } => match resolve_case(&value) {
                UnionCase::Case(case_name, _) => match wrappers.get(case_name) {
                    Some(wrapper) => {
                        let wrapper = wrapper.clone();
                        Ok(Some(
                            FieldValue::owned_any(Node::new(value, language.map(str::to_string)))
                                .with_type(wrapper),
                        ))
                    }
                    None => Ok(None),
                },
                // Zero or ambiguous keys cannot be rendered as any case.
                UnionCase::Empty | UnionCase::Ambiguous => Ok(None),
            },

            ResolveKind::Reference { single, wrappers } => {
                let eng =
                    eng.ok_or_else(|| Error::new("engine context is not attached to the schema"))?;
                let record_id = value
                    .get("recordId")
                    .and_then(JsonValue::as_str)
                    .unwrap_or_default();
                if record_id.is_empty() {
                    return Ok(None);
                }
                let record = eng
                    .resolver
                    .load_content_by_id(record_id)
                    .await
                    .map_err(|e| Error::new(e.to_string()))?;
                // A read-path lookup miss is an absent result, not an error.
                let record = match record {
                    Some(record) => record,
                    None => return Ok(None),
                };
                let content_type = record.content_type.clone();
                let mut json = serde_json::to_value(&record)
                    .map_err(|e| Error::new(e.to_string()))?;
                if let (Some(lang), Some(model)) = (language, eng.models.get(&content_type)) {
                    flatten::resolve_record_language(model, &mut json, lang, &eng.languages);
                }
                let node = Node::new(json, language.map(str::to_string));
                if single.is_some() {
                    Ok(Some(FieldValue::owned_any(node)))
                } else {
                    match wrappers.get(&content_type) {
                        Some(wrapper) => {
                            Ok(Some(FieldValue::owned_any(node).with_type(wrapper.clone())))
                        }
                        None => Ok(None),
                    }
                }
            }

            ResolveKind::List(element) => {
                let items = match value {
                    JsonValue::Array(items) => items,
                    _ => return Ok(None),
                };
                let mut resolved = Vec::with_capacity(items.len());
                for item in items {
                    let element_value: Option<FieldValue<'v>> =
                        resolve_value(eng, item, element, language).await?;
                    resolved.push(element_value.unwrap_or(FieldValue::value(GqlValue::Null)));
                }
                Ok(Some(FieldValue::list(resolved)))
            }
        }
    })
}
