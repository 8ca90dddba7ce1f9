//! Media asset values and the media store collaborator.
//!
//! A media leaf's input carries an opaque upload token plus an optional
//! focal point; after validation the persisted value holds the resolved
//! asset metadata. Upload transport and storage internals are the media
//! store's business, not the engine's.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Pixel data for raster assets; `None` on the metadata means the asset is
/// not an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    pub width: u32,
    pub height: u32,
    pub format: String,
}

/// Editor-chosen point of interest, both axes in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

/// Persisted metadata of an uploaded asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub filename: String,
    pub file_size: u64,
    pub extension: String,
    pub mime_type: String,
    #[serde(default)]
    pub image: Option<ImageDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_point: Option<FocalPoint>,
}

/// What the media store reports back for a finalized upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    pub id: String,
    pub filename: String,
    pub file_size: u64,
    pub extension: String,
    pub mime_type: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl UploadedAsset {
    /// Turn the upload result into persisted metadata, stamping creation
    /// and modification times now.
    pub fn into_metadata(self, focal_point: Option<FocalPoint>) -> AssetMetadata {
        let now = Utc::now();
        let image = match (self.width, self.height, self.format) {
            (Some(width), Some(height), Some(format)) => Some(ImageDescriptor {
                width,
                height,
                format,
            }),
            _ => None,
        };
        AssetMetadata {
            id: self.id,
            created_at: now,
            modified_at: now,
            filename: self.filename,
            file_size: self.file_size,
            extension: self.extension,
            mime_type: self.mime_type,
            image,
            focal_point,
        }
    }

    /// A fresh asset id for stores that do not assign their own.
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// Parameters of a derived asset rendition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaTransform {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u8>,
    pub format: Option<String>,
}

/// The upload/URL collaborator.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Finalize a pending upload identified by its opaque token.
    ///
    /// # Errors
    /// Returns a `CmsError` when the token is unknown or the upload cannot
    /// be finalized; the validation engine turns this into a rejected
    /// write.
    async fn upload_asset(&self, file: &str) -> Result<UploadedAsset>;

    /// A URL serving the asset, optionally as a derived rendition.
    fn asset_url(&self, asset: &AssetMetadata, transform: Option<&MediaTransform>) -> String;
}
