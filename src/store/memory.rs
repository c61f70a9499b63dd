//! In-memory store implementation
//!
//! Rows live in a `BTreeMap` keyed by raw key bytes, so prefix scans come
//! back in the same byte order a real wide-column store would use.

use crate::families::{webtable_families, FamilyDescriptor};
use crate::store::traits::{Row, RowMutation, StoreError, StoreResult, WideColumnStore};
use crate::store::{check_families, prefix_successor};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

type Cells = BTreeMap<(String, Vec<u8>), Vec<u8>>;

/// Ordered in-memory store backend
pub struct MemoryStore {
    families: Vec<FamilyDescriptor>,
    rows: RwLock<BTreeMap<Vec<u8>, Cells>>,
}

impl MemoryStore {
    /// Creates an empty store with the web table families
    pub fn new() -> Self {
        Self::with_families(webtable_families())
    }

    /// Creates an empty store with the given families
    pub fn with_families(families: Vec<FamilyDescriptor>) -> Self {
        Self {
            families,
            rows: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of rows holding at least one cell
    pub fn row_count(&self) -> StoreResult<usize> {
        Ok(self.rows.read().map_err(|_| StoreError::Poisoned)?.len())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WideColumnStore for MemoryStore {
    fn families(&self) -> &[FamilyDescriptor] {
        &self.families
    }

    fn put_row(&self, mutation: &RowMutation) -> StoreResult<()> {
        check_families(&self.families, mutation)?;
        if mutation.is_empty() {
            return Ok(());
        }

        // One write guard for the whole batch keeps the row atomic
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        let cells = rows.entry(mutation.row_key.clone()).or_default();
        for cell in &mutation.cells {
            cells.insert(
                (cell.family.clone(), cell.qualifier.clone()),
                cell.value.clone(),
            );
        }

        Ok(())
    }

    fn get_row(&self, row_key: &[u8]) -> StoreResult<Option<Row>> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.get(row_key).map(|cells| Row {
            key: row_key.to_vec(),
            cells: cells.clone(),
        }))
    }

    fn get_cell(
        &self,
        row_key: &[u8],
        family: &str,
        qualifier: &[u8],
    ) -> StoreResult<Option<Vec<u8>>> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows
            .get(row_key)
            .and_then(|cells| cells.get(&(family.to_string(), qualifier.to_vec())))
            .cloned())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<Row>> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        let upper = match prefix_successor(prefix) {
            Some(bound) => Bound::Excluded(bound),
            None => Bound::Unbounded,
        };

        Ok(rows
            .range((Bound::Included(prefix.to_vec()), upper))
            .map(|(key, cells)| Row {
                key: key.clone(),
                cells: cells.clone(),
            })
            .collect())
    }
}
