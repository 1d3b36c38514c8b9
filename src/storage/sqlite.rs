//! SQLite card store

use crate::card::CardRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{CardStore, StoreError, StoreResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend for card records
pub struct SqliteCardStore {
    conn: Connection,
}

impl SqliteCardStore {
    /// Opens (or creates) the database at the given path
    pub fn new(path: &Path) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database, used by tests
    pub fn new_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

const CARD_COLUMNS: &str = "slug, name, pronounce, card_type, color, level, power, cost, \
     card_limit, rarity, format, lb_text, has_lb, product_no, skill_text, story, sort";

fn row_to_card(row: &Row) -> Result<CardRecord, rusqlite::Error> {
    Ok(CardRecord {
        slug: row.get(0)?,
        name: row.get(1)?,
        pronounce: row.get(2)?,
        card_type: row.get(3)?,
        color: row.get(4)?,
        level: row.get(5)?,
        power: row.get(6)?,
        cost: row.get(7)?,
        limit: row.get(8)?,
        rarity: row.get(9)?,
        format: row.get(10)?,
        lb_text: row.get(11)?,
        has_lb: row.get(12)?,
        product_no: row.get(13)?,
        skill_text: row.get(14)?,
        story: row.get(15)?,
        sort: row.get(16)?,
    })
}

impl CardStore for SqliteCardStore {
    fn find_by_slug(&self, slug: &str) -> StoreResult<Option<CardRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM cards WHERE slug = ?1",
            CARD_COLUMNS
        ))?;

        let card = stmt.query_row(params![slug], row_to_card).optional()?;
        Ok(card)
    }

    fn insert(&mut self, record: &CardRecord) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();
        let result = self.conn.execute(
            &format!(
                "INSERT INTO cards ({}, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
                CARD_COLUMNS
            ),
            params![
                record.slug,
                record.name,
                record.pronounce,
                record.card_type,
                record.color,
                record.level,
                record.power,
                record.cost,
                record.limit,
                record.rarity,
                record.format,
                record.lb_text,
                record.has_lb,
                record.product_no,
                record.skill_text,
                record.story,
                record.sort,
                now,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicateSlug(record.slug.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn exists_by_slug(&self, slug: &str) -> StoreResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM cards WHERE slug = ?1",
                params![slug],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn count_cards(&self) -> StoreResult<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
        Ok(count)
    }

    fn count_by_product(&self) -> StoreResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT product_no, COUNT(*) FROM cards GROUP BY product_no ORDER BY product_no",
        )?;

        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(slug: &str) -> CardRecord {
        CardRecord {
            slug: slug.to_string(),
            name: "テスト".to_string(),
            pronounce: String::new(),
            card_type: "シグニ".to_string(),
            color: "白".to_string(),
            level: "1".to_string(),
            power: "1000".to_string(),
            cost: "-".to_string(),
            limit: "-".to_string(),
            rarity: "C".to_string(),
            format: 3,
            lb_text: "-".to_string(),
            has_lb: false,
            product_no: slug.rsplit_once('-').map(|(p, _)| p.to_string()).unwrap_or_default(),
            skill_text: String::new(),
            story: String::new(),
            sort: 0,
        }
    }

    #[test]
    fn test_insert_and_find_round_trip() {
        let mut store = SqliteCardStore::new_in_memory().unwrap();
        let record = card("WXDi-P01-001");

        store.insert(&record).unwrap();
        let found = store.find_by_slug("WXDi-P01-001").unwrap().unwrap();

        assert_eq!(found, record);
    }

    #[test]
    fn test_find_missing_returns_none() {
        let store = SqliteCardStore::new_in_memory().unwrap();
        assert!(store.find_by_slug("WXDi-P01-999").unwrap().is_none());
    }

    #[test]
    fn test_insert_if_new_true_then_false() {
        let mut store = SqliteCardStore::new_in_memory().unwrap();
        let record = card("WXDi-P01-001");

        assert!(store.insert_if_new(&record).unwrap());
        assert!(!store.insert_if_new(&record).unwrap());
        assert_eq!(store.count_cards().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_insert_is_constraint_error() {
        let mut store = SqliteCardStore::new_in_memory().unwrap();
        let record = card("WXDi-P01-001");

        store.insert(&record).unwrap();
        assert!(matches!(
            store.insert(&record),
            Err(StoreError::DuplicateSlug(_))
        ));
    }

    #[test]
    fn test_exists_by_slug() {
        let mut store = SqliteCardStore::new_in_memory().unwrap();
        store.insert(&card("WXDi-P01-001")).unwrap();

        assert!(store.exists_by_slug("WXDi-P01-001").unwrap());
        assert!(!store.exists_by_slug("WXDi-P01-002").unwrap());
    }

    #[test]
    fn test_count_by_product() {
        let mut store = SqliteCardStore::new_in_memory().unwrap();
        store.insert(&card("WXDi-P01-001")).unwrap();
        store.insert(&card("WXDi-P01-002")).unwrap();
        store.insert(&card("WX-05-001")).unwrap();

        let counts = store.count_by_product().unwrap();
        assert_eq!(
            counts,
            vec![("WX-05".to_string(), 1), ("WXDi-P01".to_string(), 2)]
        );
    }
}
