//! In-memory collaborator implementations for tests and fixtures.
//!
//! `MemoryStore` implements both the reference resolver and the
//! persistence adapter over a mutex-guarded map; `MockMediaStore` serves
//! staged uploads by token. The list-query support covers what the engine
//! itself shapes (content type, slug lookup, free-text search, basic
//! sorting, offset cursors); real adapters own the full filter language.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{CmsError, Result};
use crate::media::{AssetMetadata, MediaStore, MediaTransform, UploadedAsset};
use crate::schema::types::ContentRecord;
use crate::storage::{
    PageInfo, PersistenceAdapter, RecordPage, RecordQuery, ReferenceResolver, SortOrder,
};

/// Shared in-memory record store.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ContentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ContentRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Insert or replace a record directly, bypassing validation. Test
    /// setup only.
    pub fn put(&self, record: ContentRecord) {
        let mut records = self.records.lock().unwrap();
        records.retain(|r| r.id != record.id);
        records.push(record);
    }

    fn slug_matches(record: &ContentRecord, slug: &str, language: Option<&str>) -> bool {
        let Some(slugs) = &record.slug_i18n else {
            return false;
        };
        match language {
            Some(tag) => slugs.get(tag).map(String::as_str) == Some(slug),
            None => slugs.values().any(|s| s == slug),
        }
    }

    fn search_matches(record: &ContentRecord, needle: &str, language: Option<&str>) -> bool {
        let single = record
            .search_index
            .as_deref()
            .map(|index| index.contains(needle))
            .unwrap_or(false);
        let localized = record
            .search_index_i18n
            .as_ref()
            .map(|indexes| match language {
                Some(tag) => indexes
                    .get(tag)
                    .map(|index| index.contains(needle))
                    .unwrap_or(false),
                None => indexes.values().any(|index| index.contains(needle)),
            })
            .unwrap_or(false);
        single || localized
    }
}

#[async_trait]
impl ReferenceResolver for MemoryStore {
    async fn load_content_by_id(&self, id: &str) -> Result<Option<ContentRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.id == id).cloned())
    }
}

#[async_trait]
impl PersistenceAdapter for MemoryStore {
    async fn create_record(&self, record: ContentRecord) -> Result<ContentRecord> {
        self.put(record.clone());
        Ok(record)
    }

    async fn update_record(&self, id: &str, record: ContentRecord) -> Result<ContentRecord> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id == id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(CmsError::Storage(format!("no record '{id}'"))),
        }
    }

    async fn delete_record(&self, id: &str) -> Result<bool> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }

    async fn load_record(&self, id: &str) -> Result<Option<ContentRecord>> {
        self.load_content_by_id(id).await
    }

    async fn query_records(&self, query: RecordQuery) -> Result<RecordPage> {
        let records = self.records.lock().unwrap();
        let language = query.language.as_deref();
        let mut matches: Vec<ContentRecord> = records
            .iter()
            .filter(|r| r.content_type == query.content_type)
            .filter(|r| {
                query.filter.iter().all(|(path, operator)| match path.as_str() {
                    "slug" => operator
                        .get("eq")
                        .and_then(|v| v.as_str())
                        .map(|slug| Self::slug_matches(r, slug, language))
                        .unwrap_or(true),
                    "search" => operator
                        .as_str()
                        .map(|needle| Self::search_matches(r, needle, language))
                        .unwrap_or(true),
                    // Anything else is a storage concern this fixture
                    // does not interpret.
                    _ => true,
                })
            })
            .cloned()
            .collect();

        match query.sort.as_deref() {
            Some("title") => matches.sort_by(|a, b| a.title.cmp(&b.title)),
            Some("createdAt") => matches.sort_by_key(|r| r.created_at),
            Some("modifiedAt") => matches.sort_by_key(|r| r.modified_at),
            _ => {}
        }
        if query.order == SortOrder::Desc {
            matches.reverse();
        }

        let total_count = matches.len() as u64;
        let offset: usize = query
            .cursor
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or(0);
        let nodes: Vec<ContentRecord> = matches
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .collect();
        let consumed = offset + nodes.len();
        let page_info = PageInfo {
            has_next_page: (consumed as u64) < total_count,
            end_cursor: (!nodes.is_empty()).then(|| consumed.to_string()),
        };
        Ok(RecordPage {
            nodes,
            total_count,
            page_info,
        })
    }
}

/// Media store serving uploads staged by token.
#[derive(Default)]
pub struct MockMediaStore {
    staged: Mutex<HashMap<String, UploadedAsset>>,
}

impl MockMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an upload result for a token the test will submit.
    pub fn stage(&self, token: &str, asset: UploadedAsset) {
        self.staged.lock().unwrap().insert(token.to_string(), asset);
    }
}

#[async_trait]
impl MediaStore for MockMediaStore {
    async fn upload_asset(&self, file: &str) -> Result<UploadedAsset> {
        self.staged
            .lock()
            .unwrap()
            .get(file)
            .cloned()
            .ok_or_else(|| CmsError::Media(format!("unknown upload token '{file}'")))
    }

    fn asset_url(&self, asset: &AssetMetadata, transform: Option<&MediaTransform>) -> String {
        match transform {
            Some(transform) => format!(
                "https://assets.invalid/{}/{}?w={}&h={}",
                asset.id,
                asset.filename,
                transform.width.unwrap_or(0),
                transform.height.unwrap_or(0)
            ),
            None => format!("https://assets.invalid/{}/{}", asset.id, asset.filename),
        }
    }
}
