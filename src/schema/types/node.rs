//! The declarative schema tree describing a content type's fields.
//!
//! A [`SchemaNode`] is one node of the recursive type tree: scalar leaves,
//! enums, rich text, media, typed references, lists, objects and tagged
//! unions. Every engine component (type generation, filter derivation,
//! validation, defaulting) dispatches over the same closed set of variants,
//! so adding a node kind is a compile-time-enforced update across all of
//! them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Options shared by the plain scalar leaves (`Id`, `String`, `Boolean`,
/// `Int`, `Float`, `DateTime`).
///
/// `searchable` is only honored for `String` leaves; the flag is ignored on
/// the other scalar kinds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScalarField {
    pub optional: bool,
    pub i18n: bool,
    pub filterable: bool,
    pub searchable: bool,
    pub default_value: Option<Value>,
}

/// One declared value of an [`EnumField`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumValue {
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// An enumeration leaf with an ordered set of values.
///
/// The first declared value is the structural default unless
/// `default_value` names another one. `name` overrides the path-derived
/// GraphQL type name so the same enum can be reused across schema positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumField {
    pub values: Vec<EnumValue>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub i18n: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl EnumField {
    /// The value a freshly created record gets for this leaf.
    pub fn structural_default(&self) -> Option<&str> {
        match &self.default_value {
            Some(v) => Some(v.as_str()),
            None => self.values.first().map(|v| v.value.as_str()),
        }
    }
}

/// Sub-configuration of a rich-text leaf: which marks and block kinds the
/// editor may produce, and which content types its embedded reference nodes
/// may point at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RichTextOptions {
    pub marks: Vec<String>,
    pub blocks: Vec<String>,
    pub reference_types: HashMap<String, ReferenceTarget>,
}

/// A rich-text leaf holding a tree of rich-text nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RichTextField {
    pub optional: bool,
    pub i18n: bool,
    pub searchable: bool,
    pub options: RichTextOptions,
}

/// A media leaf: a pending upload on input, persisted asset metadata once
/// written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaField {
    pub optional: bool,
    pub i18n: bool,
}

/// Where a reference target record may live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceScope {
    #[default]
    Local,
    Peers,
    All,
}

/// Per-target constraints of a [`ReferenceField`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceTarget {
    pub scope: ReferenceScope,
}

/// A typed pointer to another content record.
///
/// `types` maps permitted target content-type identifiers to their
/// constraints and must name at least one target; an empty map is rejected
/// at generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceField {
    pub types: HashMap<String, ReferenceTarget>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub i18n: bool,
}

/// An ordered sequence of one element type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListField {
    pub of: Box<SchemaNode>,
    #[serde(default)]
    pub optional: bool,
}

/// A composite of named child nodes. Key order is the declaration order and
/// only significant for rendering.
///
/// `name` / `name_input` override the path-derived GraphQL type names so an
/// intentionally shared sub-schema is generated once instead of colliding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSchema {
    #[serde(default)]
    pub fields: IndexMap<String, SchemaNode>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_input: Option<String>,
}

/// A tagged union: a value of this type is a single-key map whose one key
/// is the active case name and whose value matches that case's object
/// schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionField {
    pub cases: IndexMap<String, ObjectSchema>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_input: Option<String>,
}

/// Enumeration over all schema node kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SchemaNode {
    Id(ScalarField),
    String(ScalarField),
    Boolean(ScalarField),
    Int(ScalarField),
    Float(ScalarField),
    DateTime(ScalarField),
    Enum(EnumField),
    RichText(RichTextField),
    Media(MediaField),
    Reference(ReferenceField),
    List(ListField),
    Object(ObjectSchema),
    Union(UnionField),
}

impl SchemaNode {
    /// Whether a value for this node may be absent.
    pub fn optional(&self) -> bool {
        match self {
            Self::Id(f)
            | Self::String(f)
            | Self::Boolean(f)
            | Self::Int(f)
            | Self::Float(f)
            | Self::DateTime(f) => f.optional,
            Self::Enum(f) => f.optional,
            Self::RichText(f) => f.optional,
            Self::Media(f) => f.optional,
            Self::Reference(f) => f.optional,
            Self::List(f) => f.optional,
            Self::Object(f) => f.optional,
            Self::Union(f) => f.optional,
        }
    }

    /// Whether the persisted value is a per-language mapping. Composite
    /// nodes are never localized themselves; only their leaves are.
    pub fn i18n(&self) -> bool {
        match self {
            Self::Id(f)
            | Self::String(f)
            | Self::Boolean(f)
            | Self::Int(f)
            | Self::Float(f)
            | Self::DateTime(f) => f.i18n,
            Self::Enum(f) => f.i18n,
            Self::RichText(f) => f.i18n,
            Self::Media(f) => f.i18n,
            Self::Reference(f) => f.i18n,
            Self::List(_) | Self::Object(_) | Self::Union(_) => false,
        }
    }

    /// Whether the leaf contributes a filter entry. References always
    /// contribute a record-id filter regardless of this flag.
    pub fn filterable(&self) -> bool {
        match self {
            Self::Id(f)
            | Self::String(f)
            | Self::Boolean(f)
            | Self::Int(f)
            | Self::Float(f)
            | Self::DateTime(f) => f.filterable,
            Self::Enum(f) => f.filterable,
            Self::RichText(_)
            | Self::Media(_)
            | Self::Reference(_)
            | Self::List(_)
            | Self::Object(_)
            | Self::Union(_) => false,
        }
    }

    /// Whether the leaf's text feeds the search index. Only meaningful for
    /// `String` and `RichText`.
    pub fn searchable(&self) -> bool {
        match self {
            Self::String(f) => f.searchable,
            Self::RichText(f) => f.searchable,
            _ => false,
        }
    }

    /// Short kind label used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::DateTime(_) => "dateTime",
            Self::Enum(_) => "enum",
            Self::RichText(_) => "richText",
            Self::Media(_) => "media",
            Self::Reference(_) => "reference",
            Self::List(_) => "list",
            Self::Object(_) => "object",
            Self::Union(_) => "union",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_node_round_trip() {
        let node: SchemaNode = serde_json::from_value(json!({
            "type": "string",
            "i18n": true,
            "searchable": true
        }))
        .unwrap();
        assert!(node.i18n());
        assert!(node.searchable());
        assert!(!node.optional());

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["type"], "string");
        assert_eq!(back["i18n"], true);
    }

    #[test]
    fn test_union_node_preserves_case_order() {
        let node: SchemaNode = serde_json::from_value(json!({
            "type": "union",
            "cases": {
                "zebra": { "fields": { "label": { "type": "string" } } },
                "aardvark": { "fields": { "label": { "type": "string" } } }
            }
        }))
        .unwrap();
        match node {
            SchemaNode::Union(u) => {
                let names: Vec<&str> = u.cases.keys().map(String::as_str).collect();
                assert_eq!(names, vec!["zebra", "aardvark"]);
            }
            other => panic!("expected union, got {}", other.kind()),
        }
    }

    #[test]
    fn test_enum_structural_default() {
        let field = EnumField {
            values: vec![
                EnumValue {
                    value: "draft".into(),
                    description: None,
                },
                EnumValue {
                    value: "live".into(),
                    description: Some("publicly visible".into()),
                },
            ],
            optional: false,
            i18n: false,
            filterable: true,
            default_value: None,
            name: None,
        };
        assert_eq!(field.structural_default(), Some("draft"));

        let with_default = EnumField {
            default_value: Some("live".into()),
            ..field
        };
        assert_eq!(with_default.structural_default(), Some("live"));
    }

    #[test]
    fn test_reference_scope_wire_format() {
        let target: ReferenceTarget =
            serde_json::from_value(json!({ "scope": "peers" })).unwrap();
        assert_eq!(target.scope, ReferenceScope::Peers);
        let target: ReferenceTarget = serde_json::from_value(json!({})).unwrap();
        assert_eq!(target.scope, ReferenceScope::Local);
    }
}
