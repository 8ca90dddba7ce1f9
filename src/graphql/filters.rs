//! Filter and sort derivation.
//!
//! Walks a content model's schema and produces a flattened map of filter
//! paths to operator descriptors plus the list of sortable paths. The path
//! convention lives in [`super::names`]; output is ordered and stable
//! across runs since the paths are part of the public query contract.
//!
//! The same walk feeds the generated per-model `…FilterInput` input object
//! and `…SortField` enum.

use async_graphql::dynamic::{Enum, EnumItem, InputObject, InputValue, TypeRef};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::types::{ContentModel, SchemaNode};

use super::names;
use super::registry::TypeRegistry;

/// The operator family a filter path supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FilterKind {
    /// Text equality/inequality and containment.
    Text,
    /// Numeric comparisons.
    Numeric,
    /// Boolean equality.
    Boolean,
    /// Date comparisons.
    Date,
    /// Equality against one of the declared enum values.
    Enum { values: Vec<String> },
    /// Inclusion/exclusion by a set of record ids.
    ReferenceId,
}

/// Derive the filter-path map for a model. Content and meta fields share
/// one namespace; a content path wins over an identically named meta path.
pub fn filter_map(model: &ContentModel) -> BTreeMap<String, FilterKind> {
    let mut out = BTreeMap::new();
    collect_filters(&model.schema.meta, "", &mut out);
    collect_filters(&model.schema.content, "", &mut out);
    out
}

/// Derive the sortable paths for a model: every filterable scalar leaf,
/// under the same path convention as the filters.
pub fn sortable_paths(model: &ContentModel) -> Vec<String> {
    filter_map(model)
        .into_iter()
        .filter(|(_, kind)| !matches!(kind, FilterKind::ReferenceId))
        .map(|(path, _)| path)
        .collect()
}

fn collect_filters(
    fields: &IndexMap<String, SchemaNode>,
    prefix: &str,
    out: &mut BTreeMap<String, FilterKind>,
) {
    for (key, node) in fields {
        collect_node(node, &names::join_filter_path(prefix, key), out);
    }
}

fn collect_node(node: &SchemaNode, path: &str, out: &mut BTreeMap<String, FilterKind>) {
    match node {
        SchemaNode::Object(object) => collect_filters(&object.fields, path, out),
        // Lists descend into the element type without changing the path.
        SchemaNode::List(list) => collect_node(&list.of, path, out),
        SchemaNode::Union(union) => {
            for (case_name, case_schema) in &union.cases {
                collect_filters(
                    &case_schema.fields,
                    &names::join_filter_path(path, case_name),
                    out,
                );
            }
        }
        // References always contribute a record-id filter, independent of
        // the filterable flag.
        SchemaNode::Reference(_) => {
            out.insert(
                names::reference_filter_path(&leaf_path(node, path)),
                FilterKind::ReferenceId,
            );
        }
        SchemaNode::Enum(field) if field.filterable => {
            out.insert(
                leaf_path(node, path),
                FilterKind::Enum {
                    values: field.values.iter().map(|v| v.value.clone()).collect(),
                },
            );
        }
        _ if node.filterable() => {
            let kind = match node {
                SchemaNode::Id(_) | SchemaNode::String(_) => FilterKind::Text,
                SchemaNode::Int(_) | SchemaNode::Float(_) => FilterKind::Numeric,
                SchemaNode::Boolean(_) => FilterKind::Boolean,
                SchemaNode::DateTime(_) => FilterKind::Date,
                _ => return,
            };
            out.insert(leaf_path(node, path), kind);
        }
        _ => {}
    }
}

/// Localized leaves carry the i18n marker in front of their whole path.
fn leaf_path(node: &SchemaNode, path: &str) -> String {
    if node.i18n() {
        names::i18n_filter_path(path)
    } else {
        path.to_string()
    }
}

/// Register the operator input objects shared by every model's filter
/// input. Called once per registry.
pub fn register_filter_operator_inputs(registry: &mut TypeRegistry) {
    registry.insert_if_absent("StringFilterInput", || {
        InputObject::new("StringFilterInput")
            .field(InputValue::new("eq", TypeRef::named(TypeRef::STRING)))
            .field(InputValue::new("ne", TypeRef::named(TypeRef::STRING)))
            .field(InputValue::new("contains", TypeRef::named(TypeRef::STRING)))
            .field(InputValue::new("in", TypeRef::named_nn_list(TypeRef::STRING)))
            .into()
    });
    registry.insert_if_absent("NumericFilterInput", || {
        InputObject::new("NumericFilterInput")
            .field(InputValue::new("eq", TypeRef::named(TypeRef::FLOAT)))
            .field(InputValue::new("ne", TypeRef::named(TypeRef::FLOAT)))
            .field(InputValue::new("gt", TypeRef::named(TypeRef::FLOAT)))
            .field(InputValue::new("gte", TypeRef::named(TypeRef::FLOAT)))
            .field(InputValue::new("lt", TypeRef::named(TypeRef::FLOAT)))
            .field(InputValue::new("lte", TypeRef::named(TypeRef::FLOAT)))
            .into()
    });
    registry.insert_if_absent("BooleanFilterInput", || {
        InputObject::new("BooleanFilterInput")
            .field(InputValue::new("eq", TypeRef::named(TypeRef::BOOLEAN)))
            .into()
    });
    registry.insert_if_absent("DateTimeFilterInput", || {
        InputObject::new("DateTimeFilterInput")
            .field(InputValue::new("eq", TypeRef::named("DateTime")))
            .field(InputValue::new("before", TypeRef::named("DateTime")))
            .field(InputValue::new("after", TypeRef::named("DateTime")))
            .into()
    });
    registry.insert_if_absent("ReferenceFilterInput", || {
        InputObject::new("ReferenceFilterInput")
            .field(InputValue::new("in", TypeRef::named_nn_list(TypeRef::ID)))
            .field(InputValue::new("notIn", TypeRef::named_nn_list(TypeRef::ID)))
            .into()
    });
}

/// Generate the `…FilterInput` input object for a model. Returns `None`
/// when the model has no filterable paths (a filter input without fields
/// would be invalid).
pub fn model_filter_input(model: &ContentModel, registry: &mut TypeRegistry) -> Option<String> {
    let filters = filter_map(model);
    if filters.is_empty() {
        return None;
    }
    register_filter_operator_inputs(registry);

    let name = format!("{}FilterInput", names::pascal_case(&model.identifier));
    let mut input = InputObject::new(&name)
        // Free-text matching against the aggregated search index.
        .field(InputValue::new("search", TypeRef::named(TypeRef::STRING)));
    for (path, kind) in &filters {
        let operator_input = match kind {
            FilterKind::Text | FilterKind::Enum { .. } => "StringFilterInput",
            FilterKind::Numeric => "NumericFilterInput",
            FilterKind::Boolean => "BooleanFilterInput",
            FilterKind::Date => "DateTimeFilterInput",
            FilterKind::ReferenceId => "ReferenceFilterInput",
        };
        input = input.field(InputValue::new(path, TypeRef::named(operator_input)));
    }
    registry.insert_if_absent(&name, || input.into());
    Some(name)
}

/// Generate the `…SortField` enum for a model: the system sort fields plus
/// every sortable schema path.
pub fn model_sort_enum(model: &ContentModel, registry: &mut TypeRegistry) -> String {
    let name = format!("{}SortField", names::pascal_case(&model.identifier));
    let mut items = vec![
        "createdAt".to_string(),
        "modifiedAt".to_string(),
        "publicationDate".to_string(),
        "title".to_string(),
    ];
    items.extend(sortable_paths(model));
    registry.insert_if_absent(&name, || {
        let mut sort_enum = Enum::new(&name);
        for item in &items {
            sort_enum = sort_enum.item(EnumItem::new(item.as_str()));
        }
        sort_enum.into()
    });
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{ContentModel, ModelSchema};
    use serde_json::json;

    fn model(content: serde_json::Value) -> ContentModel {
        ContentModel {
            identifier: "article".into(),
            name_singular: "Article".into(),
            name_plural: "Articles".into(),
            schema: ModelSchema {
                content: serde_json::from_value(content).unwrap(),
                meta: Default::default(),
            },
        }
    }

    #[test]
    fn test_nested_path_flattening() {
        let model = model(json!({
            "meta": {
                "type": "object",
                "fields": {
                    "views": { "type": "int", "filterable": true }
                }
            }
        }));
        let filters = filter_map(&model);
        assert_eq!(filters.len(), 1);
        assert_eq!(filters["meta__views"], FilterKind::Numeric);
    }

    #[test]
    fn test_i18n_marker_prefixes_whole_path() {
        let model = model(json!({
            "title": { "type": "string", "i18n": true, "filterable": true }
        }));
        let filters = filter_map(&model);
        assert!(filters.contains_key("i18n__title"));
        assert!(!filters.contains_key("title"));
    }

    #[test]
    fn test_reference_contributes_record_id_filter() {
        let model = model(json!({
            "author": { "type": "reference", "types": { "author": {} } }
        }));
        let filters = filter_map(&model);
        assert_eq!(filters["author__recordId"], FilterKind::ReferenceId);
    }

    #[test]
    fn test_union_cases_prefix_path() {
        let model = model(json!({
            "blocks": {
                "type": "list",
                "of": {
                    "type": "union",
                    "cases": {
                        "hero": {
                            "fields": {
                                "kicker": { "type": "string", "filterable": true }
                            }
                        }
                    }
                }
            }
        }));
        let filters = filter_map(&model);
        assert!(filters.contains_key("blocks__hero__kicker"));
    }

    #[test]
    fn test_unfilterable_leaves_do_not_contribute() {
        let model = model(json!({
            "body": { "type": "string" }
        }));
        assert!(filter_map(&model).is_empty());
    }

    #[test]
    fn test_paths_are_stable() {
        let m = model(json!({
            "b": { "type": "int", "filterable": true },
            "a": { "type": "int", "filterable": true }
        }));
        let first: Vec<String> = filter_map(&m).into_keys().collect();
        let second: Vec<String> = filter_map(&m).into_keys().collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["a".to_string(), "b".to_string()]);
    }
}
