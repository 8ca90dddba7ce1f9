//! The recursive validation and normalization pass.
//!
//! Walks a schema tree together with submitted data (and, for updates, the
//! prior persisted data at the same path), validating structure, resolving
//! references, finalizing media uploads and accumulating search terms. The
//! data is normalized in place; the first unrecoverable failure aborts the
//! whole write.

use chrono::Utc;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use log::debug;
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::LanguageConfig;
use crate::error::Result;
use crate::media::FocalPoint;
use crate::schema::case::{resolve_case, UnionCase};
use crate::schema::types::{
    ContentModel, ContentRecord, ReferenceField, RichTextOptions, SchemaNode, ValidationError,
};

use super::context::ValidationContext;
use super::richtext;

/// Validate submitted data for a new record and shape the record.
///
/// # Errors
/// Returns a `ValidationError` wrapped in `CmsError` when a reference is
/// broken, a union value is ambiguous, or a media upload cannot be
/// finalized; collaborator infrastructure failures pass through unchanged.
pub async fn validate_create(
    model: &ContentModel,
    ctx: &mut ValidationContext<'_>,
    mut content: Value,
    mut meta: Value,
) -> Result<ContentRecord> {
    validate_payloads(model, ctx, &mut content, None, &mut meta, None).await?;
    let (search, search_i18n) = ctx.search_snapshot();
    let (title, slug_i18n) = extract_title_slug(model, &meta, ctx.languages);
    let now = Utc::now();
    debug!("Validated new '{}' record", model.identifier);
    Ok(ContentRecord {
        id: Uuid::new_v4().to_string(),
        content_type: model.identifier.clone(),
        created_at: now,
        modified_at: now,
        publication_date: None,
        de_publication_date: None,
        shared: false,
        title,
        slug_i18n,
        search_index: Some(search),
        search_index_i18n: Some(search_i18n),
        content,
        meta,
    })
}

/// Validate submitted data against an existing record and shape the
/// updated record. Identity and publication state carry over; only
/// `modified_at`, the payloads and the derived fields change.
///
/// # Errors
/// Same failure modes as [`validate_create`].
pub async fn validate_update(
    model: &ContentModel,
    ctx: &mut ValidationContext<'_>,
    prior: &ContentRecord,
    mut content: Value,
    mut meta: Value,
) -> Result<ContentRecord> {
    validate_payloads(
        model,
        ctx,
        &mut content,
        Some(&prior.content),
        &mut meta,
        Some(&prior.meta),
    )
    .await?;
    let (search, search_i18n) = ctx.search_snapshot();
    let (title, slug_i18n) = extract_title_slug(model, &meta, ctx.languages);
    debug!("Validated update of '{}' record {}", model.identifier, prior.id);
    Ok(ContentRecord {
        id: prior.id.clone(),
        content_type: prior.content_type.clone(),
        created_at: prior.created_at,
        modified_at: Utc::now(),
        publication_date: prior.publication_date,
        de_publication_date: prior.de_publication_date,
        shared: prior.shared,
        title,
        slug_i18n,
        search_index: Some(search),
        search_index_i18n: Some(search_i18n),
        content,
        meta,
    })
}

async fn validate_payloads(
    model: &ContentModel,
    ctx: &mut ValidationContext<'_>,
    content: &mut Value,
    prior_content: Option<&Value>,
    meta: &mut Value,
    prior_meta: Option<&Value>,
) -> Result<()> {
    ctx.reset_search();
    validate_fields(ctx, &model.schema.content, "content", content, prior_content).await?;
    validate_fields(ctx, &model.schema.meta, "meta", meta, prior_meta).await?;
    Ok(())
}

/// Walk an object-shaped value against a field map. Keys absent from the
/// schema are ignored, which keeps additive schema evolution cheap; keys
/// absent from the data are simply not visited.
fn validate_fields<'a, 'b: 'a>(
    ctx: &'a mut ValidationContext<'b>,
    fields: &'a IndexMap<String, SchemaNode>,
    path: &'a str,
    value: &'a mut Value,
    prior: Option<&'a Value>,
) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        for (key, child) in fields {
            let child_prior = prior.and_then(|p| p.get(key));
            if let Some(child_value) = value.get_mut(key) {
                let child_path = format!("{path}.{key}");
                validate_node(ctx, child, child_path, child_value, child_prior).await?;
            }
        }
        Ok(())
    })
}

fn validate_node<'a, 'b: 'a>(
    ctx: &'a mut ValidationContext<'b>,
    node: &'a SchemaNode,
    path: String,
    value: &'a mut Value,
    prior: Option<&'a Value>,
) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        match node {
            SchemaNode::Object(object) => {
                validate_fields(ctx, &object.fields, &path, value, prior).await
            }

            SchemaNode::List(list) => {
                if let Value::Array(items) = value {
                    for (idx, item) in items.iter_mut().enumerate() {
                        // Prior data pairs by index; appended elements have
                        // no prior slice and need none.
                        let item_prior = prior.and_then(|p| p.get(idx));
                        let item_path = format!("{path}[{idx}]");
                        validate_node(ctx, &list.of, item_path, item, item_prior).await?;
                    }
                }
                Ok(())
            }

            SchemaNode::Union(union) => {
                let active = match resolve_case(value) {
                    UnionCase::Ambiguous => {
                        return Err(ValidationError::AmbiguousUnionValue { path }.into());
                    }
                    UnionCase::Empty => None,
                    UnionCase::Case(name, _) => Some(name.to_string()),
                };
                // An unresolvable or schema-unknown case passes through;
                // whether that is acceptable is the caller's decision.
                if let Some(name) = active {
                    if let Some(case_schema) = union.cases.get(&name) {
                        let case_prior = prior.and_then(|p| p.get(&name));
                        if let Some(inner) = value.get_mut(&name) {
                            let case_path = format!("{path}.{name}");
                            validate_fields(ctx, &case_schema.fields, &case_path, inner, case_prior)
                                .await?;
                        }
                    }
                }
                Ok(())
            }

            SchemaNode::Reference(reference) => {
                if node.i18n() {
                    let tags: Vec<String> = ctx.languages.tags().map(str::to_string).collect();
                    for tag in tags {
                        if let Some(slot) = value.get_mut(&tag) {
                            let slot_path = format!("{path}.{tag}");
                            validate_reference(ctx, reference, &slot_path, slot).await?;
                        }
                    }
                    Ok(())
                } else {
                    validate_reference(ctx, reference, &path, value).await
                }
            }

            SchemaNode::Media(_) => {
                if node.i18n() {
                    let tags: Vec<String> = ctx.languages.tags().map(str::to_string).collect();
                    for tag in tags {
                        let slot_prior = prior.and_then(|p| p.get(&tag));
                        if let Some(slot) = value.get_mut(&tag) {
                            let slot_path = format!("{path}.{tag}");
                            validate_media(ctx, &slot_path, slot, slot_prior).await?;
                        }
                    }
                    Ok(())
                } else {
                    validate_media(ctx, &path, value, prior).await
                }
            }

            SchemaNode::String(field) => {
                if field.searchable {
                    if field.i18n {
                        let tags: Vec<String> = ctx.languages.tags().map(str::to_string).collect();
                        for tag in tags {
                            if let Some(text) = value.get(&tag).and_then(Value::as_str) {
                                let term = text.to_string();
                                ctx.push_search_lang(&tag, &term);
                            }
                        }
                    } else if let Some(text) = value.as_str() {
                        let term = text.to_string();
                        ctx.push_search(&term);
                    }
                }
                Ok(())
            }

            SchemaNode::RichText(field) => {
                if field.i18n {
                    let tags: Vec<String> = ctx.languages.tags().map(str::to_string).collect();
                    for tag in tags {
                        if let Some(tree) = value.get(&tag) {
                            let slot_path = format!("{path}.{tag}");
                            validate_rich_text(
                                ctx,
                                &field.options,
                                &slot_path,
                                tree,
                                field.searchable,
                                Some(&tag),
                            )
                            .await?;
                        }
                    }
                    Ok(())
                } else {
                    validate_rich_text(ctx, &field.options, &path, value, field.searchable, None)
                        .await
                }
            }

            // Remaining leaves carry no validation action beyond the
            // structural rules already enforced by the recursion and the
            // generated required/optional wrapping.
            SchemaNode::Id(_)
            | SchemaNode::Boolean(_)
            | SchemaNode::Int(_)
            | SchemaNode::Float(_)
            | SchemaNode::DateTime(_)
            | SchemaNode::Enum(_) => Ok(()),
        }
    })
}

/// Resolve a reference pointer and strip everything but the pointer before
/// persistence. The persisted `contentType` is synced with the resolved
/// record's actual type.
async fn validate_reference(
    ctx: &mut ValidationContext<'_>,
    reference: &ReferenceField,
    path: &str,
    value: &mut Value,
) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }
    let record_id = value
        .get("recordId")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if record_id.is_empty() {
        return Ok(());
    }
    let declared_type = value
        .get("contentType")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let record = ctx
        .resolver
        .load_content_by_id(&record_id)
        .await?
        .ok_or_else(|| ValidationError::BrokenReference {
            path: path.to_string(),
            content_type: declared_type,
            record_id: record_id.clone(),
        })?;

    if !reference.types.contains_key(&record.content_type) {
        return Err(ValidationError::DisallowedReferenceType {
            path: path.to_string(),
            content_type: record.content_type,
            record_id,
        }
        .into());
    }

    // Persisted references store only the pointer, never a denormalized
    // copy of the record or any peer payload.
    if let Value::Object(map) = value {
        map.retain(|key, _| key == "recordId" || key == "contentType" || key == "peerId");
        map.insert("contentType".to_string(), json!(record.content_type));
    }
    Ok(())
}

/// Finalize a pending upload, or carry prior metadata forward when the
/// write does not replace the asset.
async fn validate_media(
    ctx: &mut ValidationContext<'_>,
    path: &str,
    value: &mut Value,
    prior: Option<&Value>,
) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }
    let pending = value
        .get("file")
        .and_then(Value::as_str)
        .map(str::to_string);
    let focal_point: Option<FocalPoint> = value
        .get("focalPoint")
        .and_then(|f| serde_json::from_value(f.clone()).ok());

    if let Some(token) = pending {
        let uploaded = ctx.media.upload_asset(&token).await.map_err(|e| {
            ValidationError::MediaUploadFailed {
                path: path.to_string(),
                message: e.to_string(),
            }
        })?;
        // The raw file token and any transient preview payload are
        // discarded with the rest of the input shape.
        *value = serde_json::to_value(uploaded.into_metadata(focal_point))?;
    } else if let Some(prior_value) = prior.filter(|p| !p.is_null()) {
        *value = prior_value.clone();
        if let (Some(focal), Value::Object(map)) = (focal_point, &mut *value) {
            map.insert("focalPoint".to_string(), serde_json::to_value(focal)?);
        }
    }
    Ok(())
}

async fn validate_rich_text(
    ctx: &mut ValidationContext<'_>,
    options: &RichTextOptions,
    path: &str,
    tree: &Value,
    searchable: bool,
    language: Option<&str>,
) -> Result<()> {
    let mut pointers = Vec::new();
    richtext::reference_pointers(tree, &mut pointers);
    for pointer in pointers {
        let record = ctx
            .resolver
            .load_content_by_id(&pointer.record_id)
            .await?
            .ok_or_else(|| ValidationError::BrokenReference {
                path: path.to_string(),
                content_type: pointer.content_type.clone(),
                record_id: pointer.record_id.clone(),
            })?;
        if !options.reference_types.contains_key(&record.content_type) {
            return Err(ValidationError::DisallowedReferenceType {
                path: path.to_string(),
                content_type: record.content_type,
                record_id: pointer.record_id,
            }
            .into());
        }
    }

    if searchable {
        let mut segments = Vec::new();
        richtext::text_segments(tree, &mut segments);
        for segment in segments {
            match language {
                Some(tag) => ctx.push_search_lang(tag, &segment),
                None => ctx.push_search(&segment),
            }
        }
    }
    Ok(())
}

/// Derive the record title and localized slugs from the meta payload when
/// the model declares `title` / `slug` meta fields.
fn extract_title_slug(
    model: &ContentModel,
    meta: &Value,
    languages: &LanguageConfig,
) -> (String, Option<HashMap<String, String>>) {
    let title = match model.schema.meta.get("title") {
        Some(node @ SchemaNode::String(_)) if node.i18n() => meta
            .get("title")
            .and_then(|t| t.get(&languages.default_language))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Some(SchemaNode::String(_)) => meta
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    };

    let slug_i18n = match model.schema.meta.get("slug") {
        Some(node) if node.i18n() => meta
            .get("slug")
            .and_then(|s| serde_json::from_value::<HashMap<String, String>>(s.clone()).ok()),
        _ => None,
    };

    (title, slug_i18n)
}
