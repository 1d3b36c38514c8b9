//! Database schema definitions

use rusqlite::Connection;

/// SQL schema for the card database
pub const SCHEMA_SQL: &str = r#"
-- One row per discovered card; the crawl pipeline never updates rows
CREATE TABLE IF NOT EXISTS cards (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    slug TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    pronounce TEXT NOT NULL DEFAULT '',
    card_type TEXT NOT NULL,
    color TEXT NOT NULL,
    level TEXT NOT NULL DEFAULT '-',
    power TEXT NOT NULL DEFAULT '-',
    cost TEXT NOT NULL DEFAULT '-',
    card_limit TEXT NOT NULL DEFAULT '-',
    rarity TEXT NOT NULL DEFAULT '',
    format INTEGER NOT NULL DEFAULT 1,
    lb_text TEXT NOT NULL DEFAULT '-',
    has_lb INTEGER NOT NULL DEFAULT 0,
    product_no TEXT NOT NULL,
    skill_text TEXT NOT NULL DEFAULT '',
    story TEXT NOT NULL DEFAULT '',
    sort INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_cards_product ON cards(product_no);
"#;

/// Creates all tables and indexes if they do not exist yet
pub fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}
