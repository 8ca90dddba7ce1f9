//! The shared registry of generated named types.
//!
//! The registry is threaded by reference through the whole generation call
//! tree (no process-wide globals), so independent schema sets generate in
//! isolation. It also carries the reference/union wrapper-type cache keyed
//! by `(visibility, sorted target type names)` so identical reference
//! configurations reused across fields resolve to one generated type
//! instead of colliding duplicates.

use async_graphql::dynamic::{SchemaBuilder, Type};
use std::collections::{HashMap, HashSet};

use crate::schema::types::SchemaError;

use super::output::Visibility;

#[derive(Default)]
pub struct TypeRegistry {
    names: HashSet<String>,
    types: Vec<Type>,
    wrapper_cache: HashMap<String, String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a named type was already generated.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Register a newly generated named type.
    ///
    /// # Errors
    /// Returns `SchemaError::DuplicateTypeName` when the name was already
    /// registered; path-derived names must be unique per registry.
    pub fn insert(&mut self, name: &str, ty: impl Into<Type>) -> Result<(), SchemaError> {
        if !self.names.insert(name.to_string()) {
            return Err(SchemaError::DuplicateTypeName(name.to_string()));
        }
        self.types.push(ty.into());
        Ok(())
    }

    /// Register a shared type exactly once; later calls with the same name
    /// are no-ops and the builder closure is not invoked.
    pub fn insert_if_absent(&mut self, name: &str, build: impl FnOnce() -> Type) {
        if self.names.insert(name.to_string()) {
            self.types.push(build());
        }
    }

    /// Look up a cached wrapper-union type name.
    pub fn cached_wrapper(&self, key: &str) -> Option<&str> {
        self.wrapper_cache.get(key).map(String::as_str)
    }

    /// Remember the generated wrapper-union type name for a cache key.
    pub fn cache_wrapper(&mut self, key: String, type_name: String) {
        self.wrapper_cache.insert(key, type_name);
    }

    /// Register every collected type into a schema builder.
    pub fn register_into(self, builder: SchemaBuilder) -> SchemaBuilder {
        self.types
            .into_iter()
            .fold(builder, |builder, ty| builder.register(ty))
    }
}

/// The wrapper cache key of a reference target set.
pub fn wrapper_cache_key(visibility: Visibility, targets: &[String]) -> String {
    let mut sorted: Vec<&str> = targets.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    format!(
        "{}:{}",
        match visibility {
            Visibility::Admin => "admin",
            Visibility::Public => "public",
        },
        sorted.join("+")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::dynamic::Object;

    #[test]
    fn test_duplicate_name_is_an_error() {
        let mut registry = TypeRegistry::new();
        registry.insert("Article", Object::new("Article")).unwrap();
        let err = registry
            .insert("Article", Object::new("Article"))
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateTypeName("Article".to_string()));
    }

    #[test]
    fn test_insert_if_absent_builds_once() {
        let mut registry = TypeRegistry::new();
        let mut calls = 0;
        registry.insert_if_absent("Media", || {
            calls += 1;
            Object::new("Media").into()
        });
        registry.insert_if_absent("Media", || {
            calls += 1;
            Object::new("Media").into()
        });
        assert_eq!(calls, 1);
        assert!(registry.contains("Media"));
    }

    #[test]
    fn test_wrapper_cache_key_sorts_targets() {
        let key = wrapper_cache_key(
            Visibility::Public,
            &["page".to_string(), "article".to_string()],
        );
        assert_eq!(key, "public:article+page");
    }
}
