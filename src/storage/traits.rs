use crate::card::CardRecord;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Duplicate slug: {0}")]
    DuplicateSlug(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for card store backends
///
/// The crawler only ever appends: records are inserted once and never
/// mutated by the pipeline. `insert_if_new` is the idempotence mechanism
/// that lets re-crawls skip already-known cards.
pub trait CardStore {
    /// Finds a record by its slug
    fn find_by_slug(&self, slug: &str) -> StoreResult<Option<CardRecord>>;

    /// Inserts a record; fails on a duplicate slug
    fn insert(&mut self, record: &CardRecord) -> StoreResult<()>;

    /// Cheap existence check used by the image proxy
    fn exists_by_slug(&self, slug: &str) -> StoreResult<bool>;

    /// Inserts the record unless one with the same slug already exists
    ///
    /// Returns true if an insert happened, false if the slug was known.
    fn insert_if_new(&mut self, record: &CardRecord) -> StoreResult<bool> {
        if self.find_by_slug(&record.slug)?.is_some() {
            return Ok(false);
        }
        self.insert(record)?;
        Ok(true)
    }

    /// Total number of stored cards
    fn count_cards(&self) -> StoreResult<u64>;

    /// Card counts grouped by product number, sorted by product
    fn count_by_product(&self) -> StoreResult<Vec<(String, u64)>>;
}
