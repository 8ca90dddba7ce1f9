//! Assembly of the generated GraphQL surface.
//!
//! For every declared content model the schema carries a read operation
//! (by id or slug+language), a paginated list operation (filter, sort,
//! order, cursor, limit) and, on the admin surface, create / update /
//! delete / publish / unpublish mutations wired to the validation engine
//! and the persistence adapter.

use async_graphql::dynamic::{
    Enum, EnumItem, Field, FieldFuture, FieldValue, InputValue, Object, ResolverContext, Schema,
    TypeRef,
};
use async_graphql::{Error, Result as GqlResult, Value as GqlValue};
use log::info;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

use crate::config::LanguageConfig;
use crate::media::MediaStore;
use crate::schema::flatten;
use crate::schema::types::{ContentModel, ContentRecord, SchemaError};
use crate::schema::ModelSet;
use crate::storage::{PersistenceAdapter, RecordQuery, ReferenceResolver, SortOrder};
use crate::validation::{validate_create, validate_update, ValidationContext};

use super::filters;
use super::input;
use super::names;
use super::output::{self, GenContext, Visibility};
use super::registry::TypeRegistry;
use super::resolvers::Node;

/// Everything the generated resolvers need at execution time: the model
/// set, the language configuration and the collaborator handles. Attached
/// to the schema as context data.
pub struct EngineContext {
    pub models: Arc<ModelSet>,
    pub languages: LanguageConfig,
    pub resolver: Arc<dyn ReferenceResolver>,
    pub media: Arc<dyn MediaStore>,
    pub store: Arc<dyn PersistenceAdapter>,
}

/// Build the full dynamic schema for one surface.
///
/// # Errors
/// Returns a `SchemaError` on configuration problems: an empty model set,
/// a reference without targets, duplicate generated type names, or a
/// schema the GraphQL layer rejects.
pub fn build_schema(eng: EngineContext, visibility: Visibility) -> Result<Schema, SchemaError> {
    if eng.models.is_empty() {
        return Err(SchemaError::InvalidModel(
            "at least one content model is required".to_string(),
        ));
    }

    let languages = eng.languages.clone();
    let gen = GenContext {
        visibility,
        languages: &languages,
    };
    let mut registry = TypeRegistry::new();
    output::register_shared_types(gen, &mut registry);
    filters::register_filter_operator_inputs(&mut registry);
    registry.insert_if_absent("SortOrder", || {
        Enum::new("SortOrder")
            .item(EnumItem::new("ASC"))
            .item(EnumItem::new("DESC"))
            .into()
    });

    let mut query = Object::new("Query");
    let mut mutation = Object::new("Mutation");
    let mut has_mutations = false;

    for model in eng.models.iter() {
        let record_name = output::model_output_type(model, gen, &mut registry)?;
        let connection_name = output::model_connection_type(&record_name, &mut registry)?;
        let filter_input = filters::model_filter_input(model, &mut registry);
        let sort_enum = filters::model_sort_enum(model, &mut registry);

        query = query
            .field(single_query_field(model, &record_name, visibility))
            .field(list_query_field(
                model,
                &connection_name,
                filter_input.as_deref(),
                &sort_enum,
                visibility,
            ));

        if !visibility.is_public() {
            if let Some(data_input) = input::model_input_type(model, gen, &mut registry)? {
                mutation = mutation
                    .field(create_field(model, &record_name, &data_input))
                    .field(update_field(model, &record_name, &data_input));
            }
            mutation = mutation
                .field(delete_field(model))
                .field(publication_field(model, &record_name, true))
                .field(publication_field(model, &record_name, false));
            has_mutations = true;
        }
    }

    info!(
        "Built {} GraphQL surface for {} content models",
        match visibility {
            Visibility::Admin => "admin",
            Visibility::Public => "public",
        },
        eng.models.len()
    );

    let mutation_name = has_mutations.then(|| "Mutation".to_string());
    let mut builder = Schema::build("Query", mutation_name.as_deref(), None);
    builder = registry.register_into(builder);
    builder = builder.register(query);
    if has_mutations {
        builder = builder.register(mutation);
    }
    builder
        .data(eng)
        .finish()
        .map_err(|e| SchemaError::Build(e.to_string()))
}

fn gql_err(err: impl std::fmt::Display) -> Error {
    Error::new(err.to_string())
}

fn opt_string_arg(ctx: &ResolverContext<'_>, name: &str) -> Option<String> {
    ctx.args
        .get(name)
        .and_then(|value| value.string().ok().map(str::to_string))
}

/// Serialize a record for the generated resolvers, flattening localized
/// leaves when the surface is public.
fn record_field_value<'v>(
    eng: &EngineContext,
    model: &ContentModel,
    record: &ContentRecord,
    language_arg: Option<&str>,
    visibility: Visibility,
) -> GqlResult<FieldValue<'v>> {
    let mut json = serde_json::to_value(record).map_err(gql_err)?;
    let language = if visibility.is_public() {
        let tag = eng.languages.resolve(language_arg).to_string();
        flatten::resolve_record_language(model, &mut json, &tag, &eng.languages);
        Some(tag)
    } else {
        None
    };
    Ok(FieldValue::owned_any(Node::new(json, language)))
}

fn single_query_field(
    model: &ContentModel,
    record_name: &str,
    visibility: Visibility,
) -> Field {
    let model_id = model.identifier.clone();
    Field::new(
        names::camel_case(&model.identifier),
        TypeRef::named(record_name),
        move |ctx| {
            let model_id = model_id.clone();
            FieldFuture::new(async move {
                let eng = ctx.data::<EngineContext>()?;
                let model = eng.models.require(&model_id).map_err(gql_err)?;
                let id = opt_string_arg(&ctx, "id");
                let slug = opt_string_arg(&ctx, "slug");
                let language_arg = opt_string_arg(&ctx, "language");

                let record = match (&id, &slug) {
                    (Some(id), _) => eng.store.load_record(id).await.map_err(gql_err)?,
                    (None, Some(slug)) => {
                        let mut query = RecordQuery::new(&model_id);
                        query.limit = 1;
                        query.language =
                            Some(eng.languages.resolve(language_arg.as_deref()).to_string());
                        query
                            .filter
                            .insert("slug".to_string(), json!({ "eq": slug }));
                        eng.store
                            .query_records(query)
                            .await
                            .map_err(gql_err)?
                            .nodes
                            .into_iter()
                            .next()
                    }
                    (None, None) => None,
                };

                // A lookup miss, or a hit of another content type, is an
                // absent result on the read path.
                let record = match record {
                    Some(record) if record.content_type == model_id => record,
                    _ => return Ok(None),
                };
                Ok(Some(record_field_value(
                    eng,
                    model,
                    &record,
                    language_arg.as_deref(),
                    visibility,
                )?))
            })
        },
    )
    .argument(InputValue::new("id", TypeRef::named(TypeRef::ID)))
    .argument(InputValue::new("slug", TypeRef::named(TypeRef::STRING)))
    .argument(InputValue::new("language", TypeRef::named(TypeRef::STRING)))
}

fn list_query_field(
    model: &ContentModel,
    connection_name: &str,
    filter_input: Option<&str>,
    sort_enum: &str,
    visibility: Visibility,
) -> Field {
    let model_id = model.identifier.clone();
    let mut field = Field::new(
        names::camel_case(&model.name_plural),
        TypeRef::named_nn(connection_name),
        move |ctx| {
            let model_id = model_id.clone();
            FieldFuture::new(async move {
                let eng = ctx.data::<EngineContext>()?;
                let model = eng.models.require(&model_id).map_err(gql_err)?;
                let language_arg = opt_string_arg(&ctx, "language");
                let language_tag = eng.languages.resolve(language_arg.as_deref()).to_string();

                let mut query = RecordQuery::new(&model_id);
                if let Some(filter) = ctx.args.get("filter") {
                    query.filter = filter.deserialize()?;
                }
                query.sort = ctx
                    .args
                    .get("sort")
                    .and_then(|v| v.enum_name().ok().map(str::to_string));
                query.order = match ctx
                    .args
                    .get("order")
                    .and_then(|v| v.enum_name().ok().map(str::to_string))
                    .as_deref()
                {
                    Some("DESC") => SortOrder::Desc,
                    _ => SortOrder::Asc,
                };
                query.cursor = opt_string_arg(&ctx, "after");
                if let Some(limit) = ctx.args.get("limit").and_then(|v| v.u64().ok()) {
                    query.limit = limit;
                }
                query.language = Some(language_tag.clone());

                let page = eng.store.query_records(query).await.map_err(gql_err)?;
                let mut nodes = Vec::with_capacity(page.nodes.len());
                for record in &page.nodes {
                    let mut json = serde_json::to_value(record).map_err(gql_err)?;
                    if visibility.is_public() {
                        flatten::resolve_record_language(
                            model,
                            &mut json,
                            &language_tag,
                            &eng.languages,
                        );
                    }
                    nodes.push(json);
                }
                let connection = json!({
                    "nodes": nodes,
                    "totalCount": page.total_count,
                    "pageInfo": serde_json::to_value(&page.page_info).map_err(gql_err)?,
                });
                let language = visibility.is_public().then_some(language_tag);
                Ok(Some(FieldValue::owned_any(Node::new(connection, language))))
            })
        },
    )
    .argument(InputValue::new("sort", TypeRef::named(sort_enum)))
    .argument(InputValue::new("order", TypeRef::named("SortOrder")))
    .argument(InputValue::new("after", TypeRef::named(TypeRef::STRING)))
    .argument(InputValue::new("limit", TypeRef::named(TypeRef::INT)))
    .argument(InputValue::new("language", TypeRef::named(TypeRef::STRING)));
    if let Some(filter_name) = filter_input {
        field = field.argument(InputValue::new("filter", TypeRef::named(filter_name)));
    }
    field
}

/// Pull `content` and `meta` payloads out of the mutation's `data` arg.
fn data_payloads(ctx: &ResolverContext<'_>) -> GqlResult<(JsonValue, JsonValue)> {
    let data: JsonValue = ctx.args.try_get("data")?.deserialize()?;
    let content = data.get("content").cloned().unwrap_or_else(|| json!({}));
    let meta = data.get("meta").cloned().unwrap_or_else(|| json!({}));
    Ok((content, meta))
}

fn create_field(model: &ContentModel, record_name: &str, data_input: &str) -> Field {
    let model_id = model.identifier.clone();
    Field::new(
        format!("create{record_name}"),
        TypeRef::named_nn(record_name),
        move |ctx| {
            let model_id = model_id.clone();
            FieldFuture::new(async move {
                let eng = ctx.data::<EngineContext>()?;
                let model = eng.models.require(&model_id).map_err(gql_err)?;
                let (content, meta) = data_payloads(&ctx)?;
                let mut vctx = ValidationContext::new(
                    eng.resolver.as_ref(),
                    eng.media.as_ref(),
                    &eng.languages,
                );
                let record = validate_create(model, &mut vctx, content, meta)
                    .await
                    .map_err(gql_err)?;
                let stored = eng.store.create_record(record).await.map_err(gql_err)?;
                Ok(Some(record_field_value(
                    eng,
                    model,
                    &stored,
                    None,
                    Visibility::Admin,
                )?))
            })
        },
    )
    .argument(InputValue::new("data", TypeRef::named_nn(data_input)))
}

fn update_field(model: &ContentModel, record_name: &str, data_input: &str) -> Field {
    let model_id = model.identifier.clone();
    Field::new(
        format!("update{record_name}"),
        TypeRef::named_nn(record_name),
        move |ctx| {
            let model_id = model_id.clone();
            FieldFuture::new(async move {
                let eng = ctx.data::<EngineContext>()?;
                let model = eng.models.require(&model_id).map_err(gql_err)?;
                let id = ctx.args.try_get("id")?.string()?.to_string();
                let prior = eng
                    .store
                    .load_record(&id)
                    .await
                    .map_err(gql_err)?
                    .ok_or_else(|| Error::new(format!("record '{id}' not found")))?;
                let (content, meta) = data_payloads(&ctx)?;
                let mut vctx = ValidationContext::new(
                    eng.resolver.as_ref(),
                    eng.media.as_ref(),
                    &eng.languages,
                );
                let record = validate_update(model, &mut vctx, &prior, content, meta)
                    .await
                    .map_err(gql_err)?;
                let stored = eng
                    .store
                    .update_record(&id, record)
                    .await
                    .map_err(gql_err)?;
                Ok(Some(record_field_value(
                    eng,
                    model,
                    &stored,
                    None,
                    Visibility::Admin,
                )?))
            })
        },
    )
    .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::ID)))
    .argument(InputValue::new("data", TypeRef::named_nn(data_input)))
}

fn delete_field(model: &ContentModel) -> Field {
    let record_name = names::pascal_case(&model.identifier);
    Field::new(
        format!("delete{record_name}"),
        TypeRef::named_nn(TypeRef::BOOLEAN),
        move |ctx| {
            FieldFuture::new(async move {
                let eng = ctx.data::<EngineContext>()?;
                let id = ctx.args.try_get("id")?.string()?.to_string();
                let deleted = eng.store.delete_record(&id).await.map_err(gql_err)?;
                Ok(Some(FieldValue::value(GqlValue::from(deleted))))
            })
        },
    )
    .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::ID)))
}

fn publication_field(model: &ContentModel, record_name: &str, publish: bool) -> Field {
    let model_id = model.identifier.clone();
    let name = if publish {
        format!("publish{record_name}")
    } else {
        format!("unpublish{record_name}")
    };
    Field::new(name, TypeRef::named_nn(record_name), move |ctx| {
        let model_id = model_id.clone();
        FieldFuture::new(async move {
            let eng = ctx.data::<EngineContext>()?;
            let model = eng.models.require(&model_id).map_err(gql_err)?;
            let id = ctx.args.try_get("id")?.string()?.to_string();
            let mut record = eng
                .store
                .load_record(&id)
                .await
                .map_err(gql_err)?
                .ok_or_else(|| Error::new(format!("record '{id}' not found")))?;
            if publish {
                record.publish();
            } else {
                record.unpublish();
            }
            let stored = eng
                .store
                .update_record(&id, record)
                .await
                .map_err(gql_err)?;
            Ok(Some(record_field_value(
                eng,
                model,
                &stored,
                None,
                Visibility::Admin,
            )?))
        })
    })
    .argument(InputValue::new("id", TypeRef::named_nn(TypeRef::ID)))
}
