//! In-memory document store with JSON file snapshots.

use crate::document::{require_object, Document, Query};
use crate::error::{Result, StoreError};
use crate::traits::DocumentStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Collections {
    next_sequence: u64,
    collections: HashMap<String, BTreeMap<String, Document>>,
}

impl Collections {
    fn next_sequence(&mut self) -> u64 {
        self.next_sequence += 1;
        self.next_sequence
    }

    fn collection(&mut self, name: &str) -> &mut BTreeMap<String, Document> {
        self.collections.entry(name.to_string()).or_default()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a snapshot file. A missing file yields an empty store.
    pub async fn load(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await? {
            info!("No snapshot at {:?}, starting empty", path);
            return Ok(Self::new());
        }

        let raw = tokio::fs::read(path).await?;
        let state: Collections = serde_json::from_slice(&raw)?;
        let documents: usize = state.collections.values().map(BTreeMap::len).sum();
        info!(
            "Loaded {} documents in {} collections from {:?}",
            documents,
            state.collections.len(),
            path
        );

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Write the whole store to `path`, replacing it atomically
    pub async fn save(&self, path: &Path) -> Result<()> {
        let bytes = {
            let state = self.state.read().await;
            serde_json::to_vec_pretty(&*state)?
        };

        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;

        debug!("Saved snapshot ({} bytes) to {:?}", bytes.len(), path);
        Ok(())
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: &str) -> usize {
        let state = self.state.read().await;
        state.collections.get(collection).map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    #[instrument(skip(self, data))]
    async fn insert(&self, collection: &str, data: Value) -> Result<String> {
        let data = require_object(data)?;
        let id = Uuid::new_v4().simple().to_string();

        let mut state = self.state.write().await;
        let sequence = state.next_sequence();
        state.collection(collection).insert(
            id.clone(),
            Document {
                id: id.clone(),
                revision: 1,
                sequence,
                data: Value::Object(data),
            },
        );

        debug!("Inserted {}/{}", collection, id);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<Document> {
        let data = require_object(data)?;

        let mut state = self.state.write().await;
        let fresh_sequence = state.next_sequence();
        let documents = state.collection(collection);
        let (revision, sequence) = documents
            .get(id)
            .map_or((1, fresh_sequence), |existing| {
                (existing.revision + 1, existing.sequence)
            });

        let document = Document {
            id: id.to_string(),
            revision,
            sequence,
            data: Value::Object(data),
        };
        documents.insert(id.to_string(), document.clone());
        Ok(document)
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> Result<Document> {
        let fields = require_object(fields)?;

        let mut state = self.state.write().await;
        let document = state
            .collection(collection)
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        if let Value::Object(existing) = &mut document.data {
            for (key, value) in fields {
                existing.insert(key, value);
            }
        }
        document.revision += 1;
        Ok(document.clone())
    }

    async fn replace_if_revision(
        &self,
        collection: &str,
        id: &str,
        expected: u64,
        data: Value,
    ) -> Result<Document> {
        let data = require_object(data)?;

        let mut state = self.state.write().await;
        let fresh_sequence = state.next_sequence();
        let documents = state.collection(collection);
        let (actual, sequence) = documents
            .get(id)
            .map_or((0, fresh_sequence), |existing| {
                (existing.revision, existing.sequence)
            });

        if actual != expected {
            return Err(StoreError::Conflict {
                collection: collection.to_string(),
                id: id.to_string(),
                expected,
                actual,
            });
        }

        let document = Document {
            id: id.to_string(),
            revision: actual + 1,
            sequence,
            data: Value::Object(data),
        };
        documents.insert(id.to_string(), document.clone());
        Ok(document)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .collection(collection)
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(collection, id))
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>> {
        let state = self.state.read().await;
        let documents = match state.collections.get(collection) {
            Some(documents) => documents.values().cloned().collect::<Vec<_>>(),
            None => return Ok(Vec::new()),
        };
        Ok(query.apply(documents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Direction;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryStore::new();
        let id = store
            .insert("newsletter", json!({"email": "a@b.co"}))
            .await
            .unwrap();

        let document = store.get("newsletter", &id).await.unwrap().unwrap();
        assert_eq!(document.revision, 1);
        assert_eq!(document.field("email"), Some(&json!("a@b.co")));
        assert!(store.get("newsletter", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new();
        let id = store
            .insert("orders", json!({"status": "pending", "total": 120}))
            .await
            .unwrap();

        let document = store
            .update("orders", &id, json!({"status": "ready"}))
            .await
            .unwrap();
        assert_eq!(document.revision, 2);
        assert_eq!(document.data, json!({"status": "ready", "total": 120}));

        let missing = store.update("orders", "nope", json!({"status": "ready"})).await;
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_replace_if_revision_detects_conflict() {
        let store = MemoryStore::new();
        let created = store
            .replace_if_revision("loyalty", "u1", 0, json!({"points": 0}))
            .await
            .unwrap();
        assert_eq!(created.revision, 1);

        // second creator loses
        let err = store
            .replace_if_revision("loyalty", "u1", 0, json!({"points": 5}))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        store
            .replace_if_revision("loyalty", "u1", 1, json!({"points": 10}))
            .await
            .unwrap();

        // stale revision loses and leaves the document alone
        let err = store
            .replace_if_revision("loyalty", "u1", 1, json!({"points": 99}))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let document = store.get("loyalty", "u1").await.unwrap().unwrap();
        assert_eq!(document.data, json!({"points": 10}));
        assert_eq!(document.revision, 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let id = store.insert("reviews", json!({"comment": "lekker"})).await.unwrap();

        store.delete("reviews", &id).await.unwrap();
        assert!(store.get("reviews", &id).await.unwrap().is_none());
        assert!(store.delete("reviews", &id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_rejects_non_objects() {
        let store = MemoryStore::new();
        let result = store.insert("orders", json!([1, 2, 3])).await;
        assert!(matches!(result, Err(StoreError::InvalidDocument(_))));
    }

    #[tokio::test]
    async fn test_query_with_order_and_limit() {
        let store = MemoryStore::new();
        for (user, at) in [
            ("u1", "2025-01-01T10:00:00Z"),
            ("u2", "2025-01-02T10:00:00Z"),
            ("u1", "2025-01-03T10:00:00Z"),
        ] {
            store
                .insert("orders", json!({"user_id": user, "created_at": at}))
                .await
                .unwrap();
        }

        let query = Query::new()
            .where_eq("user_id", "u1")
            .order_by("created_at", Direction::Descending)
            .limit(1);
        let results = store.query("orders", &query).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].field("created_at"), Some(&json!("2025-01-03T10:00:00Z")));
        assert!(store.all("bookings").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("smokeville.json");

        let store = MemoryStore::new();
        let id = store.insert("orders", json!({"total": 95})).await.unwrap();
        store.update("orders", &id, json!({"status": "ready"})).await.unwrap();
        store.save(&path).await.unwrap();

        let reloaded = MemoryStore::load(&path).await.unwrap();
        let document = reloaded.get("orders", &id).await.unwrap().unwrap();
        assert_eq!(document.revision, 2);
        assert_eq!(document.data, json!({"total": 95, "status": "ready"}));

        // sequence numbers keep counting after a reload
        let next = reloaded.insert("orders", json!({"total": 1})).await.unwrap();
        let ids: Vec<String> = reloaded
            .all("orders")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![id, next]);
    }

    #[tokio::test]
    async fn test_load_missing_snapshot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::load(&dir.path().join("absent.json")).await.unwrap();
        assert_eq!(store.count("orders").await, 0);
    }
}
