//! Error types for schema configuration and write-time validation.
//!
//! `SchemaError` covers fatal configuration problems surfaced at
//! generation/startup time; `ValidationError` covers per-write failures
//! that abort the offending write and nothing else. Both are deterministic
//! functions of (schema, data, prior data); there is no transient-failure
//! classification inside the engine.

use thiserror::Error;

/// Fatal configuration error, raised while building the generated surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Duplicate type name: {0}")]
    DuplicateTypeName(String),

    #[error("Reference field '{0}' declares no target content types")]
    NoReferenceTargets(String),

    #[error("Unknown content model: {0}")]
    ModelNotFound(String),

    #[error("Duplicate content model: {0}")]
    DuplicateModel(String),

    #[error("Invalid model configuration: {0}")]
    InvalidModel(String),

    #[error("Invalid language configuration: {0}")]
    InvalidLanguages(String),

    #[error("Schema construction failed: {0}")]
    Build(String),
}

/// Per-write validation failure. Aborts the whole write; no partial
/// persistence ever happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Broken reference at {path}: no record '{record_id}' of type '{content_type}'")]
    BrokenReference {
        path: String,
        content_type: String,
        record_id: String,
    },

    #[error(
        "Reference at {path}: record '{record_id}' has type '{content_type}', which is not a permitted target"
    )]
    DisallowedReferenceType {
        path: String,
        content_type: String,
        record_id: String,
    },

    #[error("Ambiguous union value at {path}: more than one case key present")]
    AmbiguousUnionValue { path: String },

    #[error("Media upload failed at {path}: {message}")]
    MediaUploadFailed { path: String, message: String },

    #[error("Invalid value at {path}: {message}")]
    InvalidValue { path: String, message: String },
}
