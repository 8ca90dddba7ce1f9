//! typecms: a schema-driven headless CMS engine.
//!
//! Operators declare content models as trees of typed field definitions;
//! the engine derives the whole editing and delivery surface from them:
//!
//! - GraphQL output and input types ([`graphql`])
//! - Flattened filter paths and sortable fields ([`graphql::filters`])
//! - A recursive validation/normalization pass with reference resolution,
//!   media finalization and search-index aggregation ([`validation`])
//! - Structurally valid default values and read-time language flattening
//!   ([`schema::defaults`], [`schema::flatten`])
//!
//! Transport, persistence and file storage are collaborators behind the
//! traits in [`storage`] and [`media`]; the engine shapes and validates
//! payloads but never owns a connection.

pub mod config;
pub mod error;
pub mod graphql;
pub mod logging;
pub mod media;
pub mod schema;
pub mod storage;
pub mod testing_utils;
pub mod validation;

pub use config::LanguageConfig;
pub use error::{CmsError, Result};
pub use graphql::{build_schema, EngineContext, Visibility};
pub use schema::{ContentModel, ContentRecord, ModelSet, SchemaError, SchemaNode, ValidationError};
