use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Read-only view of a bucket whose keys use `/` as the folder delimiter.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns the distinct common prefixes directly below `prefix`, each
    /// including its trailing `/`.
    async fn list_prefixes(&self, prefix: &str) -> Result<Vec<String>>;

    /// Returns every object key that starts with `prefix`.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Fetches the full body of the object at `key`.
    async fn get_object(&self, key: &str) -> Result<Bytes>;
}
