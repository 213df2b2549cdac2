use super::client::ObjectStore;
use super::{DELIMITER, top_level_prefix};
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// [`ObjectStore`] over a local directory laid out like the bucket, e.g. a
/// copy made with `aws s3 sync s3://bucket ./mirror`.
///
/// Keys are file paths relative to `root`, joined with `/`.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn all_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        collect_keys(&self.root, "", &mut keys)
            .with_context(|| format!("Failed to walk {}", self.root.display()))?;
        keys.sort();
        Ok(keys)
    }
}

fn collect_keys(dir: &Path, relative: &str, keys: &mut Vec<String>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let key = if relative.is_empty() {
            name
        } else {
            format!("{relative}{DELIMITER}{name}")
        };

        if entry.file_type()?.is_dir() {
            collect_keys(&entry.path(), &key, keys)?;
        } else {
            keys.push(key);
        }
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn list_prefixes(&self, prefix: &str) -> Result<Vec<String>> {
        let prefixes: BTreeSet<String> = self
            .all_keys()?
            .iter()
            .filter_map(|key| top_level_prefix(key, prefix))
            .collect();
        Ok(prefixes.into_iter().collect())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .all_keys()?
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect())
    }

    async fn get_object(&self, key: &str) -> Result<Bytes> {
        let path = key
            .split(DELIMITER)
            .fold(self.root.clone(), |path, segment| path.join(segment));
        let body = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Bytes::from(body))
    }
}
