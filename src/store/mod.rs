//! Object storage access.
//!
//! [`ObjectStore`] is the seam the pipeline reads through. [`S3Store`] talks
//! to a real bucket, [`LocalStore`] reads a directory mirror of one and
//! [`MemoryStore`] keeps objects in a map for tests.

mod client;
mod local;
mod memory;
mod s3;

pub use client::ObjectStore;
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use s3::S3Store;

/// Delimiter separating folder segments in object keys.
pub const DELIMITER: char = '/';

/// Returns the top-level prefix of `key` (including its delimiter), if any.
pub(crate) fn top_level_prefix(key: &str, prefix: &str) -> Option<String> {
    let rest = key.strip_prefix(prefix)?;
    let idx = rest.find(DELIMITER)?;
    Some(format!("{}{}", prefix, &rest[..=idx]))
}
