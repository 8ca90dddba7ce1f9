//! Storage collaborator interfaces.
//!
//! The engine never issues storage queries itself; it shapes and validates
//! the payloads these calls carry. Cursor encoding, filtering and mutual
//! exclusion on records are owned by the adapter implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::schema::types::ContentRecord;

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Pagination state of a result page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One page of a list query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    pub nodes: Vec<ContentRecord>,
    pub total_count: u64,
    pub page_info: PageInfo,
}

/// A shaped list query, as produced by the generated GraphQL surface.
///
/// `filter` maps flattened filter paths (see `graphql::names`) to operator
/// objects; the adapter interprets the operators against its storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    pub content_type: String,
    #[serde(default)]
    pub filter: Map<String, Value>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub cursor: Option<String>,
    pub limit: u64,
    #[serde(default)]
    pub language: Option<String>,
}

impl RecordQuery {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            filter: Map::new(),
            sort: None,
            order: SortOrder::Asc,
            cursor: None,
            limit: 50,
            language: None,
        }
    }
}

/// Read access to records by id, used during validation and for reference
/// expansion at read time. Lookups are independent read requests and may be
/// batched by the implementation.
#[async_trait]
pub trait ReferenceResolver: Send + Sync {
    /// `Ok(None)` means not found; write-path callers turn that into a
    /// validation failure.
    async fn load_content_by_id(&self, id: &str) -> Result<Option<ContentRecord>>;
}

/// The persistence collaborator owning storage queries and record-level
/// mutual exclusion.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    async fn create_record(&self, record: ContentRecord) -> Result<ContentRecord>;

    async fn update_record(&self, id: &str, record: ContentRecord) -> Result<ContentRecord>;

    /// Returns whether a record with that id existed.
    async fn delete_record(&self, id: &str) -> Result<bool>;

    async fn load_record(&self, id: &str) -> Result<Option<ContentRecord>>;

    async fn query_records(&self, query: RecordQuery) -> Result<RecordPage>;
}
