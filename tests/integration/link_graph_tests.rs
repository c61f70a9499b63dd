//! Integration tests for the link graph
//!
//! These tests drive the public API against both store backends and inject
//! write failures with a wrapping store to observe half-edges end-to-end.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;
use webtable::families::{FamilyDescriptor, CF_INLINKS, CF_OUTLINKS};
use webtable::page::DomainScope;
use webtable::store::{Row, RowMutation, StoreResult};
use webtable::{
    EdgeState, LinkGraphWriter, MemoryStore, PageFieldSet, PageTable, RowKey, SqliteStore,
    StoreError, WideColumnStore,
};

/// Wraps a store and fails puts that match a configured family or row
struct FailingStore<S> {
    inner: Arc<S>,
    failing_families: Mutex<HashSet<String>>,
    failing_rows: Mutex<HashSet<Vec<u8>>>,
}

impl<S: WideColumnStore> FailingStore<S> {
    fn new(inner: Arc<S>) -> Self {
        Self {
            inner,
            failing_families: Mutex::new(HashSet::new()),
            failing_rows: Mutex::new(HashSet::new()),
        }
    }

    fn fail_family(&self, family: &str) {
        self.failing_families
            .lock()
            .unwrap()
            .insert(family.to_string());
    }

    fn fail_row(&self, key: &RowKey) {
        self.failing_rows
            .lock()
            .unwrap()
            .insert(key.as_bytes().to_vec());
    }

    fn heal(&self) {
        self.failing_families.lock().unwrap().clear();
        self.failing_rows.lock().unwrap().clear();
    }
}

impl<S: WideColumnStore> WideColumnStore for FailingStore<S> {
    fn families(&self) -> &[FamilyDescriptor] {
        self.inner.families()
    }

    fn put_row(&self, mutation: &RowMutation) -> StoreResult<()> {
        if self.failing_rows.lock().unwrap().contains(&mutation.row_key) {
            return Err(StoreError::write(&mutation.row_key, "*", "region unavailable"));
        }
        let families = self.failing_families.lock().unwrap();
        if let Some(family) = mutation.families().into_iter().find(|f| families.contains(*f)) {
            return Err(StoreError::write(&mutation.row_key, family, "region unavailable"));
        }
        drop(families);
        self.inner.put_row(mutation)
    }

    fn get_row(&self, row_key: &[u8]) -> StoreResult<Option<Row>> {
        self.inner.get_row(row_key)
    }

    fn get_cell(
        &self,
        row_key: &[u8],
        family: &str,
        qualifier: &[u8],
    ) -> StoreResult<Option<Vec<u8>>> {
        self.inner.get_cell(row_key, family, qualifier)
    }

    fn scan_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<Row>> {
        self.inner.scan_prefix(prefix)
    }
}

fn failing_memory() -> Arc<FailingStore<MemoryStore>> {
    Arc::new(FailingStore::new(Arc::new(MemoryStore::new())))
}

#[test]
fn test_link_layout_matches_both_rows() {
    let store = Arc::new(MemoryStore::new());
    let table = PageTable::new(store.clone());
    let writer = LinkGraphWriter::new(store.clone());

    let result = writer
        .add_link("https://a.com/", "https://b.com/", "see b")
        .unwrap();
    assert!(result.is_complete());

    let a = table.get_url("https://a.com/").unwrap().unwrap();
    let b = table.get_url("https://b.com/").unwrap().unwrap();
    assert_eq!(a.outlinks.len(), 1);
    assert_eq!(a.outlinks.get(&b.key).map(String::as_str), Some("see b"));
    assert!(a.inlinks.is_empty());
    assert_eq!(b.inlinks.get(&a.key).map(String::as_str), Some("see b"));
    assert!(b.outlinks.is_empty());

    assert!(a.key.as_str().ends_with("!com.a/"));
    assert!(b.key.as_str().ends_with("!com.b/"));
}

#[test]
fn test_failed_inlink_write_yields_forward_only() {
    let store = failing_memory();
    store.fail_family(CF_INLINKS);
    let writer = LinkGraphWriter::new(store.clone());

    let result = writer
        .add_link("https://a.com/", "https://b.com/", "see b")
        .unwrap();
    assert_eq!(result.state, EdgeState::ForwardOnly);
    assert!(result.forward_error.is_none());
    assert!(matches!(
        result.backward_error,
        Some(StoreError::Write { ref row_key, .. }) if row_key == result.target_key.as_str()
    ));

    // The source row is unchanged by the failure of the target row
    assert_eq!(
        writer.edge_state("https://a.com/", "https://b.com/").unwrap(),
        EdgeState::ForwardOnly
    );
}

#[test]
fn test_failed_source_row_yields_backward_only() {
    let store = failing_memory();
    let writer = LinkGraphWriter::new(store.clone());
    store.fail_row(&webtable::encode("https://a.com/x").unwrap());

    let result = writer
        .add_link("https://a.com/x", "https://b.com/y", "why")
        .unwrap();
    assert_eq!(result.state, EdgeState::BackwardOnly);
    assert!(result.forward_error.is_some());
    assert!(result.backward_error.is_none());
}

#[test]
fn test_both_writes_failing_yields_unwritten() {
    let store = failing_memory();
    store.fail_family(CF_OUTLINKS);
    store.fail_family(CF_INLINKS);
    let writer = LinkGraphWriter::new(store.clone());

    let result = writer
        .add_link("https://a.com/", "https://b.com/", "see b")
        .unwrap();
    assert_eq!(result.state, EdgeState::Unwritten);
    assert!(result.is_failure());
    assert!(result.forward_error.is_some() && result.backward_error.is_some());
}

#[test]
fn test_repair_after_outage() {
    let store = failing_memory();
    let writer = LinkGraphWriter::new(store.clone());

    store.fail_family(CF_OUTLINKS);
    let broken = writer
        .add_link("https://a.com/", "https://b.com/", "see b")
        .unwrap();
    assert_eq!(broken.state, EdgeState::BackwardOnly);

    // Repair while the outage lasts leaves the edge as it was
    let still_broken = writer
        .repair_link("https://a.com/", "https://b.com/", "see b")
        .unwrap();
    assert_eq!(still_broken.state, EdgeState::BackwardOnly);

    store.heal();
    let repaired = writer
        .repair_link("https://a.com/", "https://b.com/", "see b")
        .unwrap();
    assert_eq!(repaired.state, EdgeState::Complete);

    // A second repair is a no-op
    let again = writer
        .repair_link("https://a.com/", "https://b.com/", "see b")
        .unwrap();
    assert_eq!(again.state, EdgeState::Complete);
    assert!(again.forward_error.is_none() && again.backward_error.is_none());
}

#[test]
fn test_retry_uses_previous_result() {
    let store = failing_memory();
    let writer = LinkGraphWriter::new(store.clone());

    store.fail_family(CF_INLINKS);
    let first = writer
        .add_link("https://a.com/", "https://b.com/", "see b")
        .unwrap();
    assert_eq!(first.state, EdgeState::ForwardOnly);

    store.heal();
    let second = writer.retry(&first, "see b");
    assert_eq!(second.state, EdgeState::Complete);
}

#[test]
fn test_concurrent_links_from_many_threads() {
    let store = Arc::new(MemoryStore::new());
    let writer = LinkGraphWriter::new(store.clone());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let writer = writer.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    let source = format!("https://site{}.example.com/page-{}", t, i);
                    let result = writer
                        .add_link(&source, "https://hub.example.com/", "hub")
                        .unwrap();
                    assert!(result.is_complete());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let hub = PageTable::new(store)
        .get_url("https://hub.example.com/")
        .unwrap()
        .unwrap();
    assert_eq!(hub.inlinks.len(), 8 * 25);
}

#[test]
fn test_sqlite_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("webtable.db");

    {
        let store: Arc<dyn WideColumnStore> = Arc::new(SqliteStore::new(&path).unwrap());
        let table = PageTable::new(store.clone());
        let writer = LinkGraphWriter::new(store);

        table
            .put_url(
                "https://www.example.com/",
                &PageFieldSet::new()
                    .html("<html><h1>Welcome</h1></html>")
                    .status(200)
                    .content_type("text/html"),
            )
            .unwrap();
        writer
            .add_link("https://www.example.com/", "https://www.example.com/about", "About Us")
            .unwrap();
        writer
            .add_link("https://tech.blog.net/123", "https://www.example.com/", "Example Inc")
            .unwrap();
    }

    // Everything survives a reopen
    let store: Arc<dyn WideColumnStore> = Arc::new(SqliteStore::new(&path).unwrap());
    let table = PageTable::new(store.clone());
    let writer = LinkGraphWriter::new(store);

    let home = table.get_url("https://www.example.com/").unwrap().unwrap();
    assert_eq!(home.status, Some(200));
    assert_eq!(home.outlinks.len(), 1);
    assert_eq!(home.inlinks.len(), 1);
    assert_eq!(
        writer
            .edge_state("https://tech.blog.net/123", "https://www.example.com/")
            .unwrap(),
        EdgeState::Complete
    );

    let mut paths: Vec<String> = table
        .pages_in_domain("www.example.com", DomainScope::Exact)
        .unwrap()
        .into_iter()
        .map(|p| p.key.decode().unwrap().path)
        .collect();
    paths.sort();
    assert_eq!(paths, vec!["/", "/about"]);
}

#[test]
fn test_half_edge_visible_in_page_records() {
    let store = failing_memory();
    store.fail_family(CF_INLINKS);
    let table = PageTable::new(store.clone());
    let writer = LinkGraphWriter::new(store.clone());

    writer
        .add_link("https://a.com/", "https://b.com/", "see b")
        .unwrap();

    let a = table.get_url("https://a.com/").unwrap().unwrap();
    assert_eq!(a.outlinks.len(), 1);
    assert!(table.get_url("https://b.com/").unwrap().is_none());
}
