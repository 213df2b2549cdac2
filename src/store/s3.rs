use super::DELIMITER;
use super::client::ObjectStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use bytes::Bytes;
use tracing::debug;

/// Region used when neither the environment nor the profile names one.
const DEFAULT_REGION: &str = "us-east-1";

/// [`ObjectStore`] backed by a single S3 bucket.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Builds a client from the ambient AWS environment (`AWS_ACCESS_KEY_ID`,
    /// `AWS_SECRET_ACCESS_KEY`, `AWS_DEFAULT_REGION`, profiles, ...), falling
    /// back to `us-east-1` when no region is configured.
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let region = RegionProviderChain::default_provider().or_else(DEFAULT_REGION);
        let config = aws_config::from_env().region(region).load().await;
        Self::new(aws_sdk_s3::Client::new(&config), bucket)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_prefixes(&self, prefix: &str) -> Result<Vec<String>> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .delimiter(DELIMITER.to_string())
            .into_paginator()
            .send();

        let mut prefixes = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page
                .with_context(|| format!("ListObjectsV2 failed for s3://{}/{}", self.bucket, prefix))?;
            prefixes.extend(
                page.common_prefixes()
                    .iter()
                    .filter_map(|p| p.prefix())
                    .map(str::to_string),
            );
        }

        debug!(bucket = %self.bucket, prefix, count = prefixes.len(), "Listed prefixes");
        Ok(prefixes)
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page
                .with_context(|| format!("ListObjectsV2 failed for s3://{}/{}", self.bucket, prefix))?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|o| o.key())
                    .map(str::to_string),
            );
        }

        debug!(bucket = %self.bucket, prefix, count = keys.len(), "Listed keys");
        Ok(keys)
    }

    async fn get_object(&self, key: &str) -> Result<Bytes> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("GetObject failed for s3://{}/{}", self.bucket, key))?;

        let body = resp
            .body
            .collect()
            .await
            .with_context(|| format!("Failed to read body of s3://{}/{}", self.bucket, key))?;

        Ok(body.into_bytes())
    }
}
