use super::client::ObjectStore;
use super::top_level_prefix;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

/// An [`ObjectStore`] holding every object in memory, keyed by full key.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    objects: BTreeMap<String, Bytes>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the object at `key`.
    pub fn insert(&mut self, key: impl Into<String>, body: impl Into<Bytes>) {
        self.objects.insert(key.into(), body.into());
    }

    /// Builder-style [`MemoryStore::insert`].
    pub fn with_object(mut self, key: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.insert(key, body);
        self
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_prefixes(&self, prefix: &str) -> Result<Vec<String>> {
        let prefixes: BTreeSet<String> = self
            .objects
            .keys()
            .filter_map(|key| top_level_prefix(key, prefix))
            .collect();
        Ok(prefixes.into_iter().collect())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .objects
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn get_object(&self, key: &str) -> Result<Bytes> {
        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow!("NoSuchKey: {key}"))
    }
}
