//! Database schema definitions for the SQLite backend
//!
//! Cells are stored one per row of a `WITHOUT ROWID` table whose primary key
//! is (row_key, family, qualifier). Keys are BLOBs, which SQLite compares
//! with memcmp, so the table is clustered in row key byte order.

use crate::families::{BloomFilter, Compression, FamilyDescriptor};
use rusqlite::types::Type;
use rusqlite::{params, Connection};

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Column family tuning, recorded as opaque configuration
CREATE TABLE IF NOT EXISTS column_families (
    name TEXT PRIMARY KEY,
    max_versions INTEGER NOT NULL,
    in_memory INTEGER NOT NULL,
    block_cache INTEGER NOT NULL,
    compression TEXT NOT NULL,
    block_size INTEGER NOT NULL,
    bloom_filter TEXT NOT NULL
);

-- One live value per (row, family, qualifier)
CREATE TABLE IF NOT EXISTS cells (
    row_key BLOB NOT NULL,
    family TEXT NOT NULL REFERENCES column_families(name),
    qualifier BLOB NOT NULL,
    value BLOB NOT NULL,
    PRIMARY KEY (row_key, family, qualifier)
) WITHOUT ROWID;
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Records the tuning of each family, replacing earlier descriptors
pub fn register_families(
    conn: &Connection,
    families: &[FamilyDescriptor],
) -> Result<(), rusqlite::Error> {
    let mut stmt = conn.prepare(
        "INSERT OR REPLACE INTO column_families
         (name, max_versions, in_memory, block_cache, compression, block_size, bloom_filter)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;

    for family in families {
        stmt.execute(params![
            family.name,
            family.max_versions,
            family.in_memory,
            family.block_cache,
            family.compression.to_db_string(),
            family.block_size,
            family.bloom_filter.to_db_string(),
        ])?;
    }

    Ok(())
}

/// Loads the recorded family descriptors, ordered by name
pub fn load_families(conn: &Connection) -> Result<Vec<FamilyDescriptor>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT name, max_versions, in_memory, block_cache, compression, block_size, bloom_filter
         FROM column_families ORDER BY name",
    )?;

    let families = stmt
        .query_map([], |row| {
            Ok(FamilyDescriptor {
                name: row.get(0)?,
                max_versions: row.get(1)?,
                in_memory: row.get(2)?,
                block_cache: row.get(3)?,
                compression: parse_column(row.get(4)?, 4, Compression::from_db_string)?,
                block_size: row.get(5)?,
                bloom_filter: parse_column(row.get(6)?, 6, BloomFilter::from_db_string)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(families)
}

/// Parses a text column with `parse`, failing on unknown values
fn parse_column<T>(
    value: String,
    idx: usize,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, rusqlite::Error> {
    parse(&value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown descriptor value '{}'", value).into(),
        )
    })
}
