//! Crate-level error handling.
//!
//! Module-specific errors (`SchemaError` for configuration problems,
//! `ValidationError` for rejected writes) live next to the schema types;
//! this module aggregates them with the collaborator-facing failure kinds
//! into the one error type crate consumers handle.

use thiserror::Error;

use crate::schema::types::{SchemaError, ValidationError};

/// Result type for engine-level operations.
pub type Result<T> = std::result::Result<T, CmsError>;

/// Top-level error for the content engine.
#[derive(Error, Debug)]
pub enum CmsError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Media store error: {0}")]
    Media(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
