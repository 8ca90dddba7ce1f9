//! Input type generation.
//!
//! The write-side mirror of the output generator: the same recursive walk,
//! producing input objects instead. Unions become one input object whose
//! case fields are mutually optional (at most one should be populated);
//! references and media use the shared pointer/pending-upload inputs;
//! localized leaves wrap into per-language input objects on the admin
//! surface. Leaf type names are derived from the output-style path so
//! enums generate once and are shared by both passes.

use async_graphql::dynamic::{InputObject, InputValue, TypeRef};
use async_graphql::Value as GqlValue;
use indexmap::IndexMap;

use crate::schema::types::{ContentModel, SchemaError, SchemaNode};

use super::names;
use super::output::{ensure_enum, GenContext};
use super::registry::TypeRegistry;

/// Register the shared input types: the reference pointer and the
/// pending-upload shape. Called once per registry.
pub fn register_shared_input_types(registry: &mut TypeRegistry) {
    registry.insert_if_absent("FocalPointInput", || {
        InputObject::new("FocalPointInput")
            .field(InputValue::new("x", TypeRef::named_nn(TypeRef::FLOAT)))
            .field(InputValue::new("y", TypeRef::named_nn(TypeRef::FLOAT)))
            .into()
    });
    registry.insert_if_absent("MediaUploadInput", || {
        InputObject::new("MediaUploadInput")
            // An opaque token for a previously transferred file; absent on
            // update-without-replace writes.
            .field(InputValue::new("file", TypeRef::named(TypeRef::STRING)))
            .field(InputValue::new(
                "focalPoint",
                TypeRef::named("FocalPointInput"),
            ))
            // Opaque editor payload; dropped during normalization.
            .field(InputValue::new(
                "passthrough",
                TypeRef::named(TypeRef::STRING),
            ))
            .into()
    });
    registry.insert_if_absent("ReferenceInput", || {
        InputObject::new("ReferenceInput")
            .field(InputValue::new("recordId", TypeRef::named_nn(TypeRef::ID)))
            .field(InputValue::new(
                "contentType",
                TypeRef::named_nn(TypeRef::STRING),
            ))
            .field(InputValue::new("peerId", TypeRef::named(TypeRef::STRING)))
            .into()
    });
}

/// Generate the (nullable) input type of one node. `base_path` is the
/// output-style type path, used for leaf names shared with the output
/// pass; input object names append the `Input` suffix.
fn node_input(
    node: &SchemaNode,
    base_path: &str,
    ctx: GenContext<'_>,
    registry: &mut TypeRegistry,
) -> Result<Option<TypeRef>, SchemaError> {
    let leaf_name: String = match node {
        SchemaNode::Id(_) => TypeRef::ID.to_string(),
        SchemaNode::String(_) => TypeRef::STRING.to_string(),
        SchemaNode::Boolean(_) => TypeRef::BOOLEAN.to_string(),
        SchemaNode::Int(_) => TypeRef::INT.to_string(),
        SchemaNode::Float(_) => TypeRef::FLOAT.to_string(),
        SchemaNode::DateTime(_) => "DateTime".to_string(),
        SchemaNode::RichText(_) => "RichText".to_string(),
        SchemaNode::Media(_) => "MediaUploadInput".to_string(),

        SchemaNode::Enum(field) => {
            let name = field.name.clone().unwrap_or_else(|| base_path.to_string());
            ensure_enum(registry, &name, field);
            name
        }

        SchemaNode::Reference(reference) => {
            if reference.types.is_empty() {
                return Err(SchemaError::NoReferenceTargets(base_path.to_string()));
            }
            "ReferenceInput".to_string()
        }

        SchemaNode::List(list) => {
            let Some(element_ty) = node_input(&list.of, base_path, ctx, registry)? else {
                return Ok(None);
            };
            let element_ty = if list.of.optional() {
                element_ty
            } else {
                TypeRef::NonNull(Box::new(element_ty))
            };
            return Ok(Some(TypeRef::List(Box::new(element_ty))));
        }

        SchemaNode::Object(object) => {
            let output_name = object.name.clone().unwrap_or_else(|| base_path.to_string());
            let input_name = object
                .name_input
                .clone()
                .unwrap_or_else(|| names::input_name(&output_name));
            let shared = object.name.is_some() || object.name_input.is_some();
            if !object_input(&input_name, &output_name, &object.fields, shared, ctx, registry)? {
                return Ok(None);
            }
            return Ok(Some(TypeRef::named(input_name)));
        }

        SchemaNode::Union(union) => {
            let output_name = union.name.clone().unwrap_or_else(|| base_path.to_string());
            let input_name = union
                .name_input
                .clone()
                .unwrap_or_else(|| names::input_name(&output_name));
            let shared = union.name.is_some() || union.name_input.is_some();
            if shared && registry.contains(&input_name) {
                return Ok(Some(TypeRef::named(input_name)));
            }

            // Every case appears as a mutually-optional member; at most
            // one should be populated, matching the single-key value
            // convention.
            let mut input = InputObject::new(&input_name);
            let mut generated_any = false;
            for (case_name, case_schema) in &union.cases {
                let case_output = names::join_type_name(&output_name, case_name);
                let case_input = names::input_name(&case_output);
                if !object_input(&case_input, &case_output, &case_schema.fields, false, ctx, registry)?
                {
                    continue;
                }
                input = input.field(InputValue::new(case_name, TypeRef::named(case_input)));
                generated_any = true;
            }
            if !generated_any {
                return Ok(None);
            }
            registry.insert(&input_name, input)?;
            return Ok(Some(TypeRef::named(input_name)));
        }
    };

    if node.i18n() && !ctx.visibility.is_public() {
        let wrapper = ensure_i18n_input_wrapper(ctx, registry, &leaf_name);
        return Ok(Some(TypeRef::named(wrapper)));
    }
    Ok(Some(TypeRef::named(leaf_name)))
}

/// Register a named input object from a field map, recursing per field.
fn object_input(
    input_name: &str,
    base_path: &str,
    fields: &IndexMap<String, SchemaNode>,
    shared: bool,
    ctx: GenContext<'_>,
    registry: &mut TypeRegistry,
) -> Result<bool, SchemaError> {
    if fields.is_empty() {
        return Ok(false);
    }
    if shared && registry.contains(input_name) {
        return Ok(true);
    }

    let mut input = InputObject::new(input_name);
    let mut generated_any = false;
    for (key, child) in fields {
        let child_path = names::join_type_name(base_path, key);
        let Some(value) = field_input(key, child, &child_path, ctx, registry)? else {
            continue;
        };
        input = input.field(value);
        generated_any = true;
    }
    if !generated_any {
        return Ok(false);
    }
    registry.insert(input_name, input)?;
    Ok(true)
}

fn field_input(
    key: &str,
    node: &SchemaNode,
    base_path: &str,
    ctx: GenContext<'_>,
    registry: &mut TypeRegistry,
) -> Result<Option<InputValue>, SchemaError> {
    let Some(ty) = node_input(node, base_path, ctx, registry)? else {
        return Ok(None);
    };
    let required = !node.optional() && !(node.i18n() && ctx.visibility.is_public());
    let ty = if required {
        TypeRef::NonNull(Box::new(ty))
    } else {
        ty
    };
    let mut value = InputValue::new(key, ty);
    if let Some(default) = declared_default(node) {
        if let Ok(default) = GqlValue::from_json(default) {
            value = value.default_value(default);
        }
    }
    Ok(Some(value))
}

fn declared_default(node: &SchemaNode) -> Option<serde_json::Value> {
    match node {
        SchemaNode::Id(f)
        | SchemaNode::String(f)
        | SchemaNode::Boolean(f)
        | SchemaNode::Int(f)
        | SchemaNode::Float(f)
        | SchemaNode::DateTime(f) => f.default_value.clone(),
        SchemaNode::Enum(f) => f
            .default_value
            .as_ref()
            .map(|v| serde_json::Value::String(v.clone())),
        _ => None,
    }
}

/// Register (once) the per-language input wrapper of a localized leaf.
fn ensure_i18n_input_wrapper(
    ctx: GenContext<'_>,
    registry: &mut TypeRegistry,
    leaf_name: &str,
) -> String {
    let wrapper_name = if leaf_name.ends_with("Input") {
        format!("I18n{leaf_name}")
    } else {
        format!("I18n{leaf_name}Input")
    };
    if !registry.contains(&wrapper_name) {
        let mut wrapper = InputObject::new(&wrapper_name);
        for tag in ctx.languages.tags() {
            wrapper = wrapper.field(InputValue::new(tag, TypeRef::named(leaf_name)));
        }
        registry.insert_if_absent(&wrapper_name, || wrapper.into());
    }
    wrapper_name
}

/// Generate a model's `…DataInput` carrying its content and meta input
/// trees. Returns `None` when the model declares no input-bearing fields,
/// in which case its write mutations are not generated.
pub fn model_input_type(
    model: &ContentModel,
    ctx: GenContext<'_>,
    registry: &mut TypeRegistry,
) -> Result<Option<String>, SchemaError> {
    register_shared_input_types(registry);

    let record_name = names::pascal_case(&model.identifier);
    let content_input = format!("{record_name}ContentInput");
    let content_base = format!("{record_name}Content");
    let has_content = object_input(
        &content_input,
        &content_base,
        &model.schema.content,
        false,
        ctx,
        registry,
    )?;

    let meta_input = format!("{record_name}MetaInput");
    let meta_base = format!("{record_name}Meta");
    let has_meta = object_input(
        &meta_input,
        &meta_base,
        &model.schema.meta,
        false,
        ctx,
        registry,
    )?;

    if !has_content && !has_meta {
        return Ok(None);
    }

    let data_name = format!("{record_name}DataInput");
    let mut data = InputObject::new(&data_name);
    if has_content {
        data = data.field(InputValue::new(
            "content",
            TypeRef::named_nn(&*content_input),
        ));
    }
    if has_meta {
        data = data.field(InputValue::new("meta", TypeRef::named(&*meta_input)));
    }
    registry.insert(&data_name, data)?;
    Ok(Some(data_name))
}
