use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::database::store::{FindOptions, MemoryStore, StoreError};

/// Typed access to one collection: models go in as JSON documents and come
/// back out as `T`.
pub struct Repository<T> {
    collection: String,
    store: Arc<MemoryStore>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            store: Arc::clone(&self.store),
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(collection: impl Into<String>, store: Arc<MemoryStore>) -> Self {
        Self {
            collection: collection.into(),
            store,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn insert(&self, doc: &T) -> Result<T, StoreError> {
        let value = serde_json::to_value(doc)?;
        let stored = self.store.insert(&self.collection, value).await?;
        Ok(serde_json::from_value(stored)?)
    }

    pub async fn find_one(&self, filter: Value) -> Result<Option<T>, StoreError> {
        let found = self.store.find_one(&self.collection, &filter).await?;
        found.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    pub async fn find_many(&self, filter: Value, options: FindOptions) -> Result<Vec<T>, StoreError> {
        let docs = self.store.find_many(&self.collection, &filter, options).await?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    pub async fn update_one(&self, filter: Value, patch: Value) -> Result<Option<T>, StoreError> {
        let updated = self.store.update_one(&self.collection, &filter, &patch).await?;
        updated.map(serde_json::from_value).transpose().map_err(Into::into)
    }

    pub async fn update_many(&self, filter: Value, patch: Value) -> Result<u64, StoreError> {
        self.store.update_many(&self.collection, &filter, &patch).await
    }

    pub async fn count(&self, filter: Value) -> Result<u64, StoreError> {
        self.store.count(&self.collection, &filter).await
    }
}
