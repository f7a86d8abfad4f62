//! In-memory document store.
//!
//! Implements the storage contract the rest of the system is written
//! against: named collections of JSON documents with insert / find_one /
//! find_many / update_one / update_many / count, per-field equality and
//! comparison filters, and single-field sort. Every operation takes the
//! collection write/read lock for its full duration, so single-document
//! writes are atomic at the request level.

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Documents must be JSON objects")]
    InvalidDocument,
    #[error("Patches must be JSON objects")]
    InvalidPatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Sort / pagination options for `find_many`
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub sort: Option<(String, SortOrder)>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn sorted(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            sort: Some((field.into(), order)),
            ..Default::default()
        }
    }

    pub fn paginated(mut self, skip: usize, limit: usize) -> Self {
        self.skip = Some(skip);
        self.limit = Some(limit);
        self
    }
}

/// Named collections of JSON documents behind one async RwLock.
/// Collections are created lazily on first insert.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, collection: &str, doc: Value) -> Result<Value, StoreError> {
        if !doc.is_object() {
            return Err(StoreError::InvalidDocument);
        }
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    pub async fn find_one(
        &self,
        collection: &str,
        filter: &Value,
    ) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| super::filter::matches(doc, filter)))
            .cloned())
    }

    pub async fn find_many(
        &self,
        collection: &str,
        filter: &Value,
        options: FindOptions,
    ) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        let mut results: Vec<Value> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| super::filter::matches(doc, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some((field, order)) = &options.sort {
            results.sort_by(|a, b| {
                let left = a.get(field).unwrap_or(&Value::Null);
                let right = b.get(field).unwrap_or(&Value::Null);
                let ordering =
                    super::filter::compare(left, right).unwrap_or(std::cmp::Ordering::Equal);
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        let skip = options.skip.unwrap_or(0);
        let results: Vec<Value> = match options.limit {
            Some(limit) => results.into_iter().skip(skip).take(limit).collect(),
            None => results.into_iter().skip(skip).collect(),
        };

        Ok(results)
    }

    /// Merge `patch` into the first document matching `filter`; returns the
    /// updated document, or None when nothing matched.
    pub async fn update_one(
        &self,
        collection: &str,
        filter: &Value,
        patch: &Value,
    ) -> Result<Option<Value>, StoreError> {
        let fields = patch.as_object().ok_or(StoreError::InvalidPatch)?;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };

        for doc in docs.iter_mut() {
            if super::filter::matches(doc, filter) {
                if let Some(target) = doc.as_object_mut() {
                    for (key, value) in fields {
                        target.insert(key.clone(), value.clone());
                    }
                }
                return Ok(Some(doc.clone()));
            }
        }
        Ok(None)
    }

    /// Merge `patch` into every document matching `filter`; returns the
    /// number of documents updated.
    pub async fn update_many(
        &self,
        collection: &str,
        filter: &Value,
        patch: &Value,
    ) -> Result<u64, StoreError> {
        let fields = patch.as_object().ok_or(StoreError::InvalidPatch)?;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let mut updated = 0;
        for doc in docs.iter_mut() {
            if super::filter::matches(doc, filter) {
                if let Some(target) = doc.as_object_mut() {
                    for (key, value) in fields {
                        target.insert(key.clone(), value.clone());
                    }
                }
                updated += 1;
            }
        }
        Ok(updated)
    }

    pub async fn count(&self, collection: &str, filter: &Value) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| super::filter::matches(doc, filter)).count()
                as u64)
            .unwrap_or(0))
    }
}
