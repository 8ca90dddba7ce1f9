//! The generated GraphQL surface.
//!
//! All of the schema-driven generation lives here: the shared named-type
//! registry, deterministic naming, the recursive output/input type
//! generators, filter/sort derivation, the generic JSON resolvers, and the
//! final schema assembly with per-model operations.

pub mod filters;
pub mod names;
pub mod output;
pub mod registry;
pub mod resolvers;
pub mod schema;

mod input;

pub use filters::{filter_map, sortable_paths, FilterKind};
pub use output::Visibility;
pub use registry::TypeRegistry;
pub use schema::{build_schema, EngineContext};
