//! The single-key union-case convention.
//!
//! A union value is a map carrying exactly one key: the active case name.
//! This module is the one implementation of that convention; every caller
//! (type generation, validation, defaulting, language flattening) goes
//! through it instead of re-deriving the edge-case policy. Zero keys
//! degrade to [`UnionCase::Empty`]; two or more keys are reported as
//! [`UnionCase::Ambiguous`] and callers decide whether that is an error;
//! the validation engine treats it as a hard one.

use serde_json::Value;

/// Resolution of a union value against the single-key convention.
#[derive(Debug, PartialEq)]
pub enum UnionCase<'a> {
    /// No key present, or the value is not a map at all.
    Empty,
    /// Exactly one key: the active case name and its payload.
    Case(&'a str, &'a Value),
    /// More than one key; which case is active cannot be determined.
    Ambiguous,
}

impl UnionCase<'_> {
    /// The active case name, when one is resolvable.
    pub fn name(&self) -> Option<&str> {
        match self {
            UnionCase::Case(name, _) => Some(name),
            _ => None,
        }
    }
}

/// Resolve a value against the single-key convention.
pub fn resolve_case(value: &Value) -> UnionCase<'_> {
    match value {
        Value::Object(map) => {
            let mut entries = map.iter();
            match (entries.next(), entries.next()) {
                (None, _) => UnionCase::Empty,
                (Some((key, inner)), None) => UnionCase::Case(key, inner),
                (Some(_), Some(_)) => UnionCase::Ambiguous,
            }
        }
        _ => UnionCase::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_key_resolves() {
        let value = json!({ "hero": { "headline": "hi" } });
        match resolve_case(&value) {
            UnionCase::Case(name, inner) => {
                assert_eq!(name, "hero");
                assert_eq!(inner["headline"], "hi");
            }
            other => panic!("expected case, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_keys_degrade_silently() {
        assert_eq!(resolve_case(&json!({})), UnionCase::Empty);
        assert_eq!(resolve_case(&Value::Null), UnionCase::Empty);
        assert_eq!(resolve_case(&json!("not a map")), UnionCase::Empty);
    }

    #[test]
    fn test_multiple_keys_are_ambiguous() {
        let value = json!({ "hero": {}, "teaser": {} });
        assert_eq!(resolve_case(&value), UnionCase::Ambiguous);
        assert_eq!(resolve_case(&value).name(), None);
    }
}
