//! Store traits and error types
//!
//! This module defines the contract a wide-column store must offer to the
//! web table, the row and mutation types that cross it, and the errors it
//! reports.

use crate::families::FamilyDescriptor;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during store operations
///
/// Write failures carry the row key and family so callers can retry or
/// report the exact cell group that was lost.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Write to {family} on row {row_key} failed: {message}")]
    Write {
        row_key: String,
        family: String,
        message: String,
    },

    #[error("Unknown column family {family} on row {row_key}")]
    UnknownFamily { row_key: String, family: String },

    #[error("Corrupt cell {family}:{qualifier} on row {row_key}: {message}")]
    Corrupt {
        row_key: String,
        family: String,
        qualifier: String,
        message: String,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Builds a write error for one row and family
    pub fn write(row_key: &[u8], family: &str, message: impl Into<String>) -> Self {
        Self::Write {
            row_key: String::from_utf8_lossy(row_key).into_owned(),
            family: family.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// One cell to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub family: String,
    pub qualifier: Vec<u8>,
    pub value: Vec<u8>,
}

/// A batch of cells for a single row
///
/// The store applies the whole batch atomically: readers see all of it or
/// none of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMutation {
    pub row_key: Vec<u8>,
    pub cells: Vec<Cell>,
}

impl RowMutation {
    pub fn new(row_key: impl Into<Vec<u8>>) -> Self {
        Self {
            row_key: row_key.into(),
            cells: Vec::new(),
        }
    }

    /// Adds one cell to the batch
    pub fn put(
        mut self,
        family: &str,
        qualifier: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        self.cells.push(Cell {
            family: family.to_string(),
            qualifier: qualifier.into(),
            value: value.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Families touched by this mutation, in first-seen order
    pub fn families(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for cell in &self.cells {
            if !seen.contains(&cell.family.as_str()) {
                seen.push(&cell.family);
            }
        }
        seen
    }
}

/// A row read back from the store
///
/// Cells are ordered by family, then qualifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub key: Vec<u8>,
    pub cells: BTreeMap<(String, Vec<u8>), Vec<u8>>,
}

impl Row {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Looks up a single cell
    pub fn get(&self, family: &str, qualifier: &[u8]) -> Option<&[u8]> {
        self.cells
            .get(&(family.to_string(), qualifier.to_vec()))
            .map(Vec::as_slice)
    }

    /// Iterates the (qualifier, value) pairs of one family
    pub fn family<'a>(&'a self, family: &'a str) -> impl Iterator<Item = (&'a [u8], &'a [u8])> {
        self.cells
            .iter()
            .filter(move |((f, _), _)| f == family)
            .map(|((_, q), v)| (q.as_slice(), v.as_slice()))
    }

    /// Row key as text, lossily decoded
    pub fn key_lossy(&self) -> String {
        String::from_utf8_lossy(&self.key).into_owned()
    }
}

/// Trait for wide-column store backends
///
/// Implementations must be safe to share across threads. Every method is a
/// single blocking call; retries and timeouts are the caller's business.
pub trait WideColumnStore: Send + Sync {
    /// Column families this store was opened with, and their tuning
    fn families(&self) -> &[FamilyDescriptor];

    /// Applies all cells of one row atomically
    ///
    /// Existing cells are overwritten unconditionally. A mutation naming an
    /// unknown family is rejected as a whole.
    fn put_row(&self, mutation: &RowMutation) -> StoreResult<()>;

    /// Reads every cell of one row
    fn get_row(&self, row_key: &[u8]) -> StoreResult<Option<Row>>;

    /// Reads a single cell
    fn get_cell(
        &self,
        row_key: &[u8],
        family: &str,
        qualifier: &[u8],
    ) -> StoreResult<Option<Vec<u8>>>;

    /// Returns all rows whose key starts with `prefix`, in ascending key order
    fn scan_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<Row>>;

    /// Returns true if the store knows the named family
    fn has_family(&self, name: &str) -> bool {
        self.families().iter().any(|f| f.name == name)
    }
}
