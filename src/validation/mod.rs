//! Validation and normalization of submitted content.
//!
//! This module contains the write-path half of the engine:
//! - The per-write [`ValidationContext`] with collaborator handles and
//!   search accumulators
//! - The recursive validation/normalization pass over schema + data
//! - Rich-text tree walking (text extraction, embedded references)

mod context;
mod engine;
pub mod richtext;

pub use context::ValidationContext;
pub use engine::{validate_create, validate_update};
