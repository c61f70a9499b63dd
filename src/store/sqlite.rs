//! SQLite store implementation
//!
//! This module provides a SQLite-based implementation of the
//! `WideColumnStore` trait. Each row mutation runs in its own transaction,
//! which gives the single-row atomicity the web table relies on.

use crate::families::{webtable_families, FamilyDescriptor};
use crate::store::schema::{initialize_schema, load_families, register_families};
use crate::store::traits::{Row, RowMutation, StoreError, StoreResult, WideColumnStore};
use crate::store::{check_families, prefix_successor};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite store backend
pub struct SqliteStore {
    families: Vec<FamilyDescriptor>,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens or creates a store with the web table families
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StoreError)` - Failed to open database
    pub fn new(path: &Path) -> StoreResult<Self> {
        Self::open(path, webtable_families())
    }

    /// Opens or creates a store with the given families
    pub fn open(path: &Path, families: Vec<FamilyDescriptor>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        tracing::info!("Opened SQLite store at {}", path.display());
        Self::from_connection(conn, families)
    }

    /// Creates an in-memory database with the web table families
    pub fn new_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::from_connection(conn, webtable_families())
    }

    fn from_connection(conn: Connection, families: Vec<FamilyDescriptor>) -> StoreResult<Self> {
        initialize_schema(&conn)?;
        register_families(&conn, &families)?;
        tracing::info!("Registered {} column families", families.len());

        Ok(Self {
            families,
            conn: Mutex::new(conn),
        })
    }

    /// Family descriptors as recorded in the database
    pub fn stored_families(&self) -> StoreResult<Vec<FamilyDescriptor>> {
        let conn = self.lock()?;
        Ok(load_families(&conn)?)
    }

    /// Number of distinct rows in the table
    pub fn row_count(&self) -> StoreResult<u64> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(DISTINCT row_key) FROM cells", [], |row| {
                row.get(0)
            })?;
        Ok(count as u64)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn apply(conn: &mut Connection, mutation: &RowMutation) -> Result<(), rusqlite::Error> {
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO cells (row_key, family, qualifier, value) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(row_key, family, qualifier) DO UPDATE SET value = excluded.value",
            )?;
            for cell in &mutation.cells {
                stmt.execute(params![
                    mutation.row_key,
                    cell.family,
                    cell.qualifier,
                    cell.value
                ])?;
            }
        }
        tx.commit()
    }
}

impl WideColumnStore for SqliteStore {
    fn families(&self) -> &[FamilyDescriptor] {
        &self.families
    }

    fn put_row(&self, mutation: &RowMutation) -> StoreResult<()> {
        check_families(&self.families, mutation)?;
        if mutation.is_empty() {
            return Ok(());
        }

        let mut conn = self.lock()?;
        Self::apply(&mut conn, mutation).map_err(|e| {
            StoreError::write(&mutation.row_key, &mutation.families().join(","), e.to_string())
        })
    }

    fn get_row(&self, row_key: &[u8]) -> StoreResult<Option<Row>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(
            "SELECT family, qualifier, value FROM cells WHERE row_key = ?1
             ORDER BY family, qualifier",
        )?;

        let mut row = Row::new(row_key);
        let cells = stmt.query_map(params![row_key], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, Vec<u8>>(1)?,
                r.get::<_, Vec<u8>>(2)?,
            ))
        })?;
        for cell in cells {
            let (family, qualifier, value) = cell?;
            row.cells.insert((family, qualifier), value);
        }

        Ok(if row.cells.is_empty() { None } else { Some(row) })
    }

    fn get_cell(
        &self,
        row_key: &[u8],
        family: &str,
        qualifier: &[u8],
    ) -> StoreResult<Option<Vec<u8>>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM cells WHERE row_key = ?1 AND family = ?2 AND qualifier = ?3",
                params![row_key, family, qualifier],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<Row>> {
        let conn = self.lock()?;
        let upper = prefix_successor(prefix);

        let mut stmt = conn.prepare_cached(
            "SELECT row_key, family, qualifier, value FROM cells
             WHERE row_key >= ?1 AND (?2 IS NULL OR row_key < ?2)
             ORDER BY row_key, family, qualifier",
        )?;
        let cells = stmt.query_map(params![prefix, upper], |r| {
            Ok((
                r.get::<_, Vec<u8>>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, Vec<u8>>(2)?,
                r.get::<_, Vec<u8>>(3)?,
            ))
        })?;

        // Cells arrive sorted by row key; fold runs of equal keys into rows
        let mut rows: Vec<Row> = Vec::new();
        for cell in cells {
            let (key, family, qualifier, value) = cell?;
            match rows.last_mut() {
                Some(row) if row.key == key => {
                    row.cells.insert((family, qualifier), value);
                }
                _ => {
                    let mut row = Row::new(key);
                    row.cells.insert((family, qualifier), value);
                    rows.push(row);
                }
            }
        }

        Ok(rows)
    }
}
