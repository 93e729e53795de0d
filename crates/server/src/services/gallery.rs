//! Gallery media uploads.
//!
//! Bytes go to the blob store under `gallery/{images|videos}/`; the metadata
//! document points back at the blob through its storage path.

use super::{fetch, list, required};
use crate::error::{Result, ServiceError};
use chrono::{DateTime, Utc};
use domain::{GalleryItem, MediaType};
use std::sync::Arc;
use store::{collections, to_fields, BlobStore, Direction, DocumentStore, Query};
use tracing::{info, instrument, warn};

/// A file picked for upload
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub title: String,
    pub category: String,
}

#[derive(Clone)]
pub struct GalleryService {
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl GalleryService {
    pub fn new(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    #[instrument(skip(self, upload), fields(file = %upload.file_name, size = upload.bytes.len()))]
    pub async fn upload(&self, upload: Upload, uploaded_by: &str, now: DateTime<Utc>) -> Result<GalleryItem> {
        let media_type = MediaType::from_mime(&upload.content_type).map_err(|_| {
            ServiceError::validation("Invalid file type. Only images and videos are allowed.")
        })?;
        if upload.bytes.len() as u64 > media_type.max_size() {
            let limit = match media_type {
                MediaType::Image => "50MB",
                MediaType::Video => "100MB",
            };
            return Err(ServiceError::validation(format!(
                "File too large. Maximum size is {}.",
                limit
            )));
        }
        let title = required(&upload.title, "Please give the upload a title")?;
        let category = required(&upload.category, "Please choose a category")?;

        let path = storage_path(media_type, &upload.file_name, now);
        let url = self.blobs.put(&path, upload.bytes, &upload.content_type).await?;

        let mut item = GalleryItem {
            id: String::new(),
            url,
            title,
            category,
            media_type,
            uploaded_by: uploaded_by.to_string(),
            uploaded_at: now,
            storage_path: Some(path),
        };
        item.id = self.store.insert(collections::GALLERY, to_fields(&item)?).await?;
        info!("Uploaded gallery item {} to {:?}", item.id, item.storage_path);
        Ok(item)
    }

    /// Every item, newest first
    pub async fn all_items(&self) -> Result<Vec<GalleryItem>> {
        let query = Query::new().order_by("uploaded_at", Direction::Descending);
        list(self.store.as_ref(), collections::GALLERY, &query).await
    }

    pub async fn items_by_category(&self, category: &str) -> Result<Vec<GalleryItem>> {
        let query = Query::new()
            .where_eq("category", category)
            .order_by("uploaded_at", Direction::Descending);
        list(self.store.as_ref(), collections::GALLERY, &query).await
    }

    /// Remove the metadata, then the blob. A blob that is already gone is
    /// only worth a warning.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, item_id: &str) -> Result<()> {
        let item: GalleryItem = fetch(self.store.as_ref(), collections::GALLERY, item_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Gallery item", item_id))?;

        self.store.delete(collections::GALLERY, item_id).await?;
        if let Some(path) = &item.storage_path {
            if let Err(e) = self.blobs.delete(path).await {
                warn!("Gallery item {} deleted but blob {} was not: {}", item_id, path, e);
            }
        }
        info!("Deleted gallery item {}", item_id);
        Ok(())
    }
}

/// `gallery/{folder}/{millis}_{name}` with anything but ASCII letters,
/// digits and dots in the name replaced by `_`
fn storage_path(media_type: MediaType, file_name: &str, now: DateTime<Utc>) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect();
    format!(
        "gallery/{}/{}_{}",
        media_type.folder(),
        now.timestamp_millis(),
        sanitized
    )
}
