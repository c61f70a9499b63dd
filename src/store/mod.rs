//! Store module for the web table
//!
//! This module holds the wide-column store contract and two reference
//! backends:
//! - `MemoryStore`: an ordered in-process map, for tests and demos
//! - `SqliteStore`: an ordered SQLite table of cells with per-row transactions
//!
//! Both sort rows by the raw bytes of their keys, which is the ordering the
//! row key scheme is designed around.

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{Cell, Row, RowMutation, StoreError, StoreResult, WideColumnStore};

use crate::families::FamilyDescriptor;

/// Smallest key greater than every key starting with `prefix`
///
/// Returns `None` when no such bound exists (empty prefix or all `0xff`),
/// in which case a scan runs to the end of the table.
pub(crate) fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut bound = prefix.to_vec();
    while let Some(last) = bound.pop() {
        if last < u8::MAX {
            bound.push(last + 1);
            return Some(bound);
        }
    }
    None
}

/// Rejects a mutation that names a family the store was not opened with
pub(crate) fn check_families(
    families: &[FamilyDescriptor],
    mutation: &RowMutation,
) -> StoreResult<()> {
    for family in mutation.families() {
        if !families.iter().any(|f| f.name == family) {
            return Err(StoreError::UnknownFamily {
                row_key: String::from_utf8_lossy(&mutation.row_key).into_owned(),
                family: family.to_string(),
            });
        }
    }
    Ok(())
}
