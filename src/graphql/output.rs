//! Output type generation.
//!
//! Recursively turns schema nodes into `async-graphql` dynamic output
//! types with generic JSON resolvers. Generated names join the schema path
//! (or honor an explicit shared-name override); localized leaves wrap into
//! per-language objects on the admin surface and unwrap to the resolved
//! language on the public surface; unions and multi-target references
//! expand into wrapper types discriminated at runtime.

use async_graphql::dynamic::{
    Field, FieldFuture, FieldValue, InputObject, InputValue, Object, Scalar, TypeRef, Union,
};
use async_graphql::Error;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::LanguageConfig;
use crate::media::{AssetMetadata, MediaTransform};
use crate::schema::types::{ContentModel, SchemaError, SchemaNode};

use super::names;
use super::registry::{wrapper_cache_key, TypeRegistry};
use super::resolvers::{json_field, Node, ResolveKind};
use super::schema::EngineContext;

/// Which surface is being generated. The two surfaces are separate schema
/// builds with their own registries; localized leaves and mutations differ
/// between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Editing surface: localized leaves stay wrapped per language.
    Admin,
    /// Delivery surface: one resolved language, localized leaves unwrap.
    Public,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }
}

/// Generation context threaded through the recursive generators.
#[derive(Clone, Copy)]
pub struct GenContext<'a> {
    pub visibility: Visibility,
    pub languages: &'a LanguageConfig,
}

/// Register the shared output types every surface carries: the custom
/// scalars, the media shape, and the pagination info object.
pub fn register_shared_types(ctx: GenContext<'_>, registry: &mut TypeRegistry) {
    registry.insert_if_absent("DateTime", || Scalar::new("DateTime").into());
    registry.insert_if_absent("RichText", || Scalar::new("RichText").into());

    registry.insert_if_absent("FocalPoint", || {
        Object::new("FocalPoint")
            .field(json_field(
                "x",
                TypeRef::named_nn(TypeRef::FLOAT),
                ResolveKind::Scalar,
            ))
            .field(json_field(
                "y",
                TypeRef::named_nn(TypeRef::FLOAT),
                ResolveKind::Scalar,
            ))
            .into()
    });

    registry.insert_if_absent("MediaImage", || {
        Object::new("MediaImage")
            .field(json_field(
                "width",
                TypeRef::named_nn(TypeRef::INT),
                ResolveKind::Scalar,
            ))
            .field(json_field(
                "height",
                TypeRef::named_nn(TypeRef::INT),
                ResolveKind::Scalar,
            ))
            .field(json_field(
                "format",
                TypeRef::named_nn(TypeRef::STRING),
                ResolveKind::Scalar,
            ))
            .into()
    });

    registry.insert_if_absent("MediaTransformInput", || {
        InputObject::new("MediaTransformInput")
            .field(InputValue::new("width", TypeRef::named(TypeRef::INT)))
            .field(InputValue::new("height", TypeRef::named(TypeRef::INT)))
            .field(InputValue::new("quality", TypeRef::named(TypeRef::INT)))
            .field(InputValue::new("format", TypeRef::named(TypeRef::STRING)))
            .into()
    });

    registry.insert_if_absent("Media", || {
        Object::new("Media")
            .field(json_field(
                "id",
                TypeRef::named_nn(TypeRef::ID),
                ResolveKind::Scalar,
            ))
            .field(json_field(
                "filename",
                TypeRef::named_nn(TypeRef::STRING),
                ResolveKind::Scalar,
            ))
            .field(json_field(
                "fileSize",
                TypeRef::named_nn(TypeRef::INT),
                ResolveKind::Scalar,
            ))
            .field(json_field(
                "extension",
                TypeRef::named_nn(TypeRef::STRING),
                ResolveKind::Scalar,
            ))
            .field(json_field(
                "mimeType",
                TypeRef::named_nn(TypeRef::STRING),
                ResolveKind::Scalar,
            ))
            .field(json_field(
                "image",
                TypeRef::named("MediaImage"),
                ResolveKind::Object,
            ))
            .field(json_field(
                "focalPoint",
                TypeRef::named("FocalPoint"),
                ResolveKind::Object,
            ))
            .field(asset_url_field("url", false))
            .field(
                asset_url_field("transformUrl", true).argument(InputValue::new(
                    "transform",
                    TypeRef::named("MediaTransformInput"),
                )),
            )
            .into()
    });

    registry.insert_if_absent("PageInfo", || {
        Object::new("PageInfo")
            .field(json_field(
                "hasNextPage",
                TypeRef::named_nn(TypeRef::BOOLEAN),
                ResolveKind::Scalar,
            ))
            .field(json_field(
                "endCursor",
                TypeRef::named(TypeRef::STRING),
                ResolveKind::Scalar,
            ))
            .into()
    });

    // The admin record shape exposes per-language slugs and search
    // indexes through the plain string wrapper.
    if !ctx.visibility.is_public() {
        ensure_i18n_wrapper(
            ctx,
            registry,
            TypeRef::STRING,
            &ResolveKind::Scalar,
        );
    }
}

fn asset_url_field(name: &str, with_transform: bool) -> Field {
    Field::new(name, TypeRef::named_nn(TypeRef::STRING), move |ctx| {
        FieldFuture::new(async move {
            let parent = ctx.parent_value.try_downcast_ref::<Node>()?;
            let asset: AssetMetadata = serde_json::from_value(parent.value.clone())
                .map_err(|e| Error::new(format!("invalid asset metadata: {e}")))?;
            let eng = ctx.data::<EngineContext>()?;
            let transform: Option<MediaTransform> = if with_transform {
                match ctx.args.get("transform") {
                    Some(value) => Some(value.deserialize()?),
                    None => None,
                }
            } else {
                None
            };
            let url = eng.media.asset_url(&asset, transform.as_ref());
            Ok(Some(FieldValue::value(url)))
        })
    })
}

/// A field whose value is the parent itself; used by reference wrapper
/// types, which expose the loaded record under its content-type key.
fn passthrough_field(name: &str, ty: TypeRef) -> Field {
    Field::new(name, ty, move |ctx| {
        FieldFuture::new(async move {
            let parent = ctx.parent_value.try_downcast_ref::<Node>()?;
            Ok(Some(FieldValue::owned_any(parent.clone())))
        })
    })
}

/// Generate the (nullable) type and resolve kind of one node, registering
/// any named types it needs. Returns `None` for nodes that generate no
/// type at all (objects and unions without any fields).
fn node_output(
    node: &SchemaNode,
    type_path: &str,
    ctx: GenContext<'_>,
    registry: &mut TypeRegistry,
) -> Result<Option<(TypeRef, ResolveKind)>, SchemaError> {
    let generated = match node {
        SchemaNode::Id(_) => leaf(TypeRef::ID, ResolveKind::Scalar),
        SchemaNode::String(_) => leaf(TypeRef::STRING, ResolveKind::Scalar),
        SchemaNode::Boolean(_) => leaf(TypeRef::BOOLEAN, ResolveKind::Scalar),
        SchemaNode::Int(_) => leaf(TypeRef::INT, ResolveKind::Scalar),
        SchemaNode::Float(_) => leaf(TypeRef::FLOAT, ResolveKind::Scalar),
        SchemaNode::DateTime(_) => leaf("DateTime", ResolveKind::Scalar),
        SchemaNode::RichText(_) => leaf("RichText", ResolveKind::Scalar),

        SchemaNode::Enum(field) => {
            let name = field.name.clone().unwrap_or_else(|| type_path.to_string());
            ensure_enum(registry, &name, field);
            leaf(name, ResolveKind::EnumValue)
        }

        SchemaNode::Media(_) => leaf("Media", ResolveKind::Object),

        SchemaNode::Reference(reference) => {
            let mut targets: Vec<String> = reference.types.keys().cloned().collect();
            if targets.is_empty() {
                return Err(SchemaError::NoReferenceTargets(type_path.to_string()));
            }
            targets.sort_unstable();
            if targets.len() == 1 {
                let record_type = names::pascal_case(&targets[0]);
                let kind = ResolveKind::Reference {
                    single: Some(record_type.clone()),
                    wrappers: Arc::new(HashMap::new()),
                };
                leaf(record_type, kind)
            } else {
                let (union_name, wrappers) =
                    reference_union(&targets, ctx, registry)?;
                let kind = ResolveKind::Reference {
                    single: None,
                    wrappers: Arc::new(wrappers),
                };
                leaf(union_name, kind)
            }
        }

        SchemaNode::List(list) => {
            let Some((element_ty, element_kind)) =
                node_output(&list.of, type_path, ctx, registry)?
            else {
                return Ok(None);
            };
            let element_required =
                !list.of.optional() && !(list.of.i18n() && ctx.visibility.is_public());
            let element_ty = if element_required {
                TypeRef::NonNull(Box::new(element_ty))
            } else {
                element_ty
            };
            return Ok(Some((
                TypeRef::List(Box::new(element_ty)),
                ResolveKind::List(Box::new(element_kind)),
            )));
        }

        SchemaNode::Object(object) => {
            let name = object.name.clone().unwrap_or_else(|| type_path.to_string());
            if !object_output(&name, &object.fields, object.name.is_some(), ctx, registry)? {
                return Ok(None);
            }
            return Ok(Some((TypeRef::named(name), ResolveKind::Object)));
        }

        SchemaNode::Union(union) => {
            let name = union.name.clone().unwrap_or_else(|| type_path.to_string());
            let shared = union.name.is_some();
            if shared && registry.contains(&name) {
                // Shared unions regenerate the wrapper map but reuse the
                // registered types; rebuilding it from the case names keeps
                // this cheap and deterministic.
                let wrappers = union_wrapper_names(&name, union.cases.keys());
                return Ok(Some((
                    TypeRef::named(name),
                    ResolveKind::Union {
                        wrappers: Arc::new(wrappers),
                    },
                )));
            }

            let mut union_type = Union::new(&name);
            let mut wrappers = HashMap::new();
            for (case_name, case_schema) in &union.cases {
                let case_type = names::join_type_name(&name, case_name);
                if !object_output(&case_type, &case_schema.fields, false, ctx, registry)? {
                    continue;
                }
                let wrapper_name = format!("{case_type}Case");
                let wrapper = Object::new(&wrapper_name).field(json_field(
                    case_name,
                    TypeRef::named_nn(&*case_type),
                    ResolveKind::Object,
                ));
                registry.insert(&wrapper_name, wrapper)?;
                union_type = union_type.possible_type(&wrapper_name);
                wrappers.insert(case_name.clone(), wrapper_name);
            }
            if wrappers.is_empty() {
                return Ok(None);
            }
            registry.insert(&name, union_type)?;
            return Ok(Some((
                TypeRef::named(name),
                ResolveKind::Union {
                    wrappers: Arc::new(wrappers),
                },
            )));
        }
    };

    let (leaf_name, kind) = generated;
    if node.i18n() && !ctx.visibility.is_public() {
        let wrapper = ensure_i18n_wrapper(ctx, registry, &leaf_name, &kind);
        return Ok(Some((TypeRef::named(wrapper), ResolveKind::Object)));
    }
    Ok(Some((TypeRef::named(leaf_name), kind)))
}

fn leaf(name: impl Into<String>, kind: ResolveKind) -> (String, ResolveKind) {
    (name.into(), kind)
}

fn union_wrapper_names<'a>(
    union_name: &str,
    cases: impl Iterator<Item = &'a String>,
) -> HashMap<String, String> {
    cases
        .map(|case| {
            (
                case.clone(),
                format!("{}Case", names::join_type_name(union_name, case)),
            )
        })
        .collect()
}

/// Register a named object type from a field map, recursing per field.
/// Returns `false` (and registers nothing) when no field generates a type.
/// Shared names (`shared = true`) register once; path-derived duplicates
/// are configuration errors.
fn object_output(
    name: &str,
    fields: &IndexMap<String, SchemaNode>,
    shared: bool,
    ctx: GenContext<'_>,
    registry: &mut TypeRegistry,
) -> Result<bool, SchemaError> {
    if fields.is_empty() {
        return Ok(false);
    }
    if shared && registry.contains(name) {
        return Ok(true);
    }

    let mut object = Object::new(name);
    let mut generated_any = false;
    for (key, child) in fields {
        let child_path = names::join_type_name(name, key);
        let Some(field) = field_output(key, child, &child_path, ctx, registry)? else {
            continue;
        };
        object = object.field(field);
        generated_any = true;
    }
    if !generated_any {
        return Ok(false);
    }
    registry.insert(name, object)?;
    Ok(true)
}

/// Generate one object field: the node's type with required/optional
/// wrapping applied. A generated field is required unless the node is
/// optional, or it is localized and the surface is public (a resolved
/// language may have no content).
fn field_output(
    key: &str,
    node: &SchemaNode,
    type_path: &str,
    ctx: GenContext<'_>,
    registry: &mut TypeRegistry,
) -> Result<Option<Field>, SchemaError> {
    let Some((ty, kind)) = node_output(node, type_path, ctx, registry)? else {
        return Ok(None);
    };
    let required = !node.optional() && !(node.i18n() && ctx.visibility.is_public());
    let ty = if required {
        TypeRef::NonNull(Box::new(ty))
    } else {
        ty
    };
    Ok(Some(json_field(key, ty, kind)))
}

/// Register (once) the per-language wrapper object of a localized leaf:
/// one nullable field per configured language tag, each resolving the
/// leaf's kind against that tag's slot.
fn ensure_i18n_wrapper(
    ctx: GenContext<'_>,
    registry: &mut TypeRegistry,
    leaf_name: &str,
    kind: &ResolveKind,
) -> String {
    let wrapper_name = format!("I18n{leaf_name}");
    if !registry.contains(&wrapper_name) {
        let mut wrapper = Object::new(&wrapper_name);
        for tag in ctx.languages.tags() {
            wrapper = wrapper.field(json_field(
                tag,
                TypeRef::named(leaf_name),
                kind.clone(),
            ));
        }
        registry.insert_if_absent(&wrapper_name, || wrapper.into());
    }
    wrapper_name
}

/// Register (once per cache key) the disjoint union over a multi-target
/// reference's record types, each target wrapped to expose the record
/// under its content-type key.
fn reference_union(
    targets: &[String],
    ctx: GenContext<'_>,
    registry: &mut TypeRegistry,
) -> Result<(String, HashMap<String, String>), SchemaError> {
    let cache_key = wrapper_cache_key(ctx.visibility, targets);
    let union_name = match registry.cached_wrapper(&cache_key) {
        Some(name) => name.to_string(),
        None => {
            let name = format!(
                "{}Reference",
                targets
                    .iter()
                    .map(|t| names::pascal_case(t))
                    .collect::<String>()
            );
            let mut union_type = Union::new(&name);
            for target in targets {
                let wrapper_name = names::join_type_name(&name, target);
                let record_type = names::pascal_case(target);
                let wrapper = Object::new(&wrapper_name).field(passthrough_field(
                    target,
                    TypeRef::named_nn(record_type),
                ));
                registry.insert(&wrapper_name, wrapper)?;
                union_type = union_type.possible_type(&wrapper_name);
            }
            registry.insert(&name, union_type)?;
            registry.cache_wrapper(cache_key, name.clone());
            name
        }
    };
    let wrappers = targets
        .iter()
        .map(|target| {
            (
                target.clone(),
                names::join_type_name(&union_name, target),
            )
        })
        .collect();
    Ok((union_name, wrappers))
}

/// Register a named enum exactly once; shared enum names reuse the first
/// registration. Enums are shared between the output and input passes.
pub(super) fn ensure_enum(
    registry: &mut TypeRegistry,
    name: &str,
    field: &crate::schema::types::EnumField,
) {
    use async_graphql::dynamic::{Enum, EnumItem};
    registry.insert_if_absent(name, || {
        let mut generated = Enum::new(name);
        for value in &field.values {
            let mut item = EnumItem::new(value.value.as_str());
            if let Some(description) = &value.description {
                item = item.description(description.as_str());
            }
            generated = generated.item(item);
        }
        generated.into()
    });
}

/// Generate a model's record type plus its content/meta object trees.
/// Returns the record type name.
pub fn model_output_type(
    model: &ContentModel,
    ctx: GenContext<'_>,
    registry: &mut TypeRegistry,
) -> Result<String, SchemaError> {
    let record_name = names::pascal_case(&model.identifier);
    let mut record = Object::new(&record_name)
        .field(json_field(
            "id",
            TypeRef::named_nn(TypeRef::ID),
            ResolveKind::Scalar,
        ))
        .field(json_field(
            "contentType",
            TypeRef::named_nn(TypeRef::STRING),
            ResolveKind::Scalar,
        ))
        .field(json_field(
            "createdAt",
            TypeRef::named_nn("DateTime"),
            ResolveKind::Scalar,
        ))
        .field(json_field(
            "modifiedAt",
            TypeRef::named_nn("DateTime"),
            ResolveKind::Scalar,
        ))
        .field(json_field(
            "publicationDate",
            TypeRef::named("DateTime"),
            ResolveKind::Scalar,
        ))
        .field(json_field(
            "dePublicationDate",
            TypeRef::named("DateTime"),
            ResolveKind::Scalar,
        ))
        .field(json_field(
            "shared",
            TypeRef::named_nn(TypeRef::BOOLEAN),
            ResolveKind::Scalar,
        ))
        .field(json_field(
            "title",
            TypeRef::named_nn(TypeRef::STRING),
            ResolveKind::Scalar,
        ));

    if ctx.visibility.is_public() {
        record = record.field(json_field(
            "slug",
            TypeRef::named(TypeRef::STRING),
            ResolveKind::Scalar,
        ));
    } else {
        record = record
            .field(json_field(
                "slugI18n",
                TypeRef::named("I18nString"),
                ResolveKind::Object,
            ))
            .field(json_field(
                "searchIndex",
                TypeRef::named(TypeRef::STRING),
                ResolveKind::Scalar,
            ))
            .field(json_field(
                "searchIndexI18n",
                TypeRef::named("I18nString"),
                ResolveKind::Object,
            ));
    }

    let content_name = format!("{record_name}Content");
    if object_output(&content_name, &model.schema.content, false, ctx, registry)? {
        record = record.field(json_field(
            "content",
            TypeRef::named_nn(&*content_name),
            ResolveKind::Object,
        ));
    }
    let meta_name = format!("{record_name}Meta");
    if object_output(&meta_name, &model.schema.meta, false, ctx, registry)? {
        record = record.field(json_field(
            "meta",
            TypeRef::named(&*meta_name),
            ResolveKind::Object,
        ));
    }

    registry.insert(&record_name, record)?;
    Ok(record_name)
}

/// Generate a model's paginated connection type. Returns its name.
pub fn model_connection_type(
    record_name: &str,
    registry: &mut TypeRegistry,
) -> Result<String, SchemaError> {
    let name = format!("{record_name}Connection");
    let connection = Object::new(&name)
        .field(json_field(
            "nodes",
            TypeRef::named_nn_list_nn(record_name),
            ResolveKind::List(Box::new(ResolveKind::Object)),
        ))
        .field(json_field(
            "totalCount",
            TypeRef::named_nn(TypeRef::INT),
            ResolveKind::Scalar,
        ))
        .field(json_field(
            "pageInfo",
            TypeRef::named_nn("PageInfo"),
            ResolveKind::Object,
        ));
    registry.insert(&name, connection)?;
    Ok(name)
}
