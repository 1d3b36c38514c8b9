use crate::cache::RequestDescriptor;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// A response body read back from the cache
#[derive(Debug, Clone)]
pub struct CachedResponse {
    /// Cache path the body was read from, relative to the cache root
    pub cache_key: PathBuf,

    /// The stored body
    pub body: String,

    /// When the entry was written
    pub stored_at: DateTime<Utc>,
}

/// Disk-backed response cache rooted at a caller-supplied directory
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute path of the cache entry for a descriptor
    pub fn entry_path(&self, descriptor: &RequestDescriptor) -> PathBuf {
        self.root.join(descriptor.cache_path())
    }

    /// Looks up a previously stored response
    ///
    /// Returns `None` on a cache miss. Read errors other than "not found"
    /// propagate; a cache directory we cannot read is a real fault, not a
    /// miss.
    pub fn lookup(
        &self,
        descriptor: &RequestDescriptor,
    ) -> std::io::Result<Option<CachedResponse>> {
        let path = self.entry_path(descriptor);

        let metadata = match std::fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let body = std::fs::read_to_string(&path)?;
        let stored_at = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(Some(CachedResponse {
            cache_key: descriptor.cache_path(),
            body,
            stored_at,
        }))
    }

    /// Stores a response body for a descriptor
    ///
    /// Creates missing intermediate directories. A key that is already
    /// present is left untouched: the first writer wins and repeated stores
    /// are no-ops.
    pub fn store(&self, descriptor: &RequestDescriptor, body: &str) -> std::io::Result<()> {
        let path = self.entry_path(descriptor);

        if path.exists() {
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, body)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn descriptor(page: u32) -> RequestDescriptor {
        let mut query = BTreeMap::new();
        query.insert("product_no".to_string(), "WX-05".to_string());
        query.insert("card_page".to_string(), page.to_string());
        RequestDescriptor::get("https://example.com/card/list.php", query, "", "card")
    }

    #[test]
    fn test_lookup_miss_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path());
        assert!(cache.lookup(&descriptor(1)).unwrap().is_none());
    }

    #[test]
    fn test_store_then_lookup_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path());

        cache.store(&descriptor(1), "<html>page 1</html>").unwrap();
        let hit = cache.lookup(&descriptor(1)).unwrap().unwrap();

        assert_eq!(hit.body, "<html>page 1</html>");
        assert_eq!(hit.cache_key, descriptor(1).cache_path());
    }

    #[test]
    fn test_store_is_idempotent_first_writer_wins() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path());

        cache.store(&descriptor(1), "first").unwrap();
        cache.store(&descriptor(1), "second").unwrap();

        let hit = cache.lookup(&descriptor(1)).unwrap().unwrap();
        assert_eq!(hit.body, "first");
    }

    #[test]
    fn test_distinct_descriptors_stored_separately() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path());

        cache.store(&descriptor(1), "page 1").unwrap();
        cache.store(&descriptor(2), "page 2").unwrap();

        assert_eq!(cache.lookup(&descriptor(1)).unwrap().unwrap().body, "page 1");
        assert_eq!(cache.lookup(&descriptor(2)).unwrap().unwrap().body, "page 2");
    }

    #[test]
    fn test_store_creates_intermediate_directories() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(dir.path().join("deep").join("root"));

        cache.store(&descriptor(1), "body").unwrap();
        assert!(cache.entry_path(&descriptor(1)).exists());
    }
}
