//! Card persistence
//!
//! The crawler writes through the [`CardStore`] trait; [`SqliteCardStore`] is
//! the only backend. Identity is the card slug, enforced both by
//! `insert_if_new` and a UNIQUE column.

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteCardStore;
pub use traits::{CardStore, StoreError, StoreResult};
