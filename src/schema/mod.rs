//! The schema model and its pure derivations.
//!
//! This module holds the declarative schema tree ([`types::SchemaNode`]),
//! the content model registry, the single-key union-case convention, the
//! default/empty-content generator and the read-time language flattening
//! pass. Everything here is synchronous and free of collaborator I/O; the
//! validation engine and the GraphQL generators build on top of it.

pub mod case;
pub mod defaults;
pub mod flatten;
pub mod registry;
pub mod types;

pub use registry::ModelSet;
pub use types::{
    ContentModel, ContentRecord, ModelSchema, SchemaError, SchemaNode, ValidationError,
};
