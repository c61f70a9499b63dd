//! Dual-write maintenance of link edges

use crate::families::{CF_INLINKS, CF_OUTLINKS};
use crate::links::EdgeState;
use crate::rowkey::{KeyEncoder, RowKey};
use crate::store::{RowMutation, StoreError, StoreResult, WideColumnStore};
use crate::{KeyError, WebTableError};
use std::sync::Arc;

/// Outcome of writing one link edge
///
/// A partial write is a normal result, not an error: `state` says which
/// halves are stored and the error fields say why a half is missing, so the
/// caller can retry just that half.
#[derive(Debug)]
pub struct LinkWriteResult {
    pub source_key: RowKey,
    pub target_key: RowKey,
    pub state: EdgeState,
    /// Why the outlink write on the source row failed, if it did
    pub forward_error: Option<StoreError>,
    /// Why the inlink write on the target row failed, if it did
    pub backward_error: Option<StoreError>,
}

impl LinkWriteResult {
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Returns true if both halves failed
    pub fn is_failure(&self) -> bool {
        self.state == EdgeState::Unwritten
    }
}

/// Writes hyperlinks as an outlink/inlink pair
///
/// The two halves of an edge usually live in different rows, often on
/// different shards, and the store only guarantees atomicity within a row.
/// The writer therefore issues two independent writes, never retries and
/// never rolls back; callers repair half-edges with [`LinkGraphWriter::retry`]
/// or [`LinkGraphWriter::repair_link`].
#[derive(Clone)]
pub struct LinkGraphWriter {
    store: Arc<dyn WideColumnStore>,
    encoder: KeyEncoder,
}

impl LinkGraphWriter {
    pub fn new(store: Arc<dyn WideColumnStore>) -> Self {
        Self::with_encoder(store, KeyEncoder::default())
    }

    pub fn with_encoder(store: Arc<dyn WideColumnStore>, encoder: KeyEncoder) -> Self {
        Self { store, encoder }
    }

    /// Records a hyperlink from `source_url` to `target_url`
    ///
    /// Steps:
    /// 1. Encode both URLs; a malformed URL fails before anything is written
    /// 2. Write `outlinks[target_key] = anchor` to the source row
    /// 3. Write `inlinks[source_key] = anchor` to the target row
    ///
    /// Step 3 runs whether or not step 2 succeeded.
    ///
    /// # Returns
    ///
    /// * `Ok(LinkWriteResult)` - Which halves were written
    /// * `Err(KeyError)` - One of the URLs could not be encoded
    pub fn add_link(
        &self,
        source_url: &str,
        target_url: &str,
        anchor: &str,
    ) -> Result<LinkWriteResult, KeyError> {
        let source_key = self.encoder.encode(source_url)?;
        let target_key = self.encoder.encode(target_url)?;
        Ok(self.add_link_keys(source_key, target_key, anchor))
    }

    /// Records a hyperlink between two already encoded rows
    pub fn add_link_keys(
        &self,
        source_key: RowKey,
        target_key: RowKey,
        anchor: &str,
    ) -> LinkWriteResult {
        let forward = self.write_forward(&source_key, &target_key, anchor);
        let backward = self.write_backward(&source_key, &target_key, anchor);
        let result = Self::outcome(
            source_key,
            target_key,
            EdgeState::Unwritten,
            forward,
            backward,
        );
        log_outcome(&result);
        result
    }

    /// Re-issues the halves a previous write reported as failed
    ///
    /// Halves that already succeeded are not written again.
    pub fn retry(&self, previous: &LinkWriteResult, anchor: &str) -> LinkWriteResult {
        let source_key = previous.source_key.clone();
        let target_key = previous.target_key.clone();

        let forward = (!previous.state.has_forward())
            .then(|| self.write_forward(&source_key, &target_key, anchor));
        let backward = (!previous.state.has_backward())
            .then(|| self.write_backward(&source_key, &target_key, anchor));

        let result =
            Self::outcome_partial(source_key, target_key, previous.state, forward, backward);
        log_outcome(&result);
        result
    }

    /// Reads both rows and reports which halves of an edge are stored
    pub fn edge_state(
        &self,
        source_url: &str,
        target_url: &str,
    ) -> Result<EdgeState, WebTableError> {
        let source_key = self.encoder.encode(source_url)?;
        let target_key = self.encoder.encode(target_url)?;
        Ok(self.edge_state_keys(&source_key, &target_key)?)
    }

    /// Reports which halves of the edge between two rows are stored
    pub fn edge_state_keys(
        &self,
        source_key: &RowKey,
        target_key: &RowKey,
    ) -> StoreResult<EdgeState> {
        let forward = self
            .store
            .get_cell(source_key.as_bytes(), CF_OUTLINKS, target_key.as_bytes())?
            .is_some();
        let backward = self
            .store
            .get_cell(target_key.as_bytes(), CF_INLINKS, source_key.as_bytes())?
            .is_some();
        Ok(EdgeState::from_halves(forward, backward))
    }

    /// Inspects an edge and writes only the halves that are missing
    ///
    /// Repairing a complete edge writes nothing, so the operation can be run
    /// repeatedly by an external reconciliation job. A half that is present
    /// keeps its stored anchor text.
    pub fn repair_link(
        &self,
        source_url: &str,
        target_url: &str,
        anchor: &str,
    ) -> Result<LinkWriteResult, WebTableError> {
        let source_key = self.encoder.encode(source_url)?;
        let target_key = self.encoder.encode(target_url)?;
        let observed = self.edge_state_keys(&source_key, &target_key)?;

        tracing::debug!(
            "Repairing edge {} -> {} (observed {})",
            source_key,
            target_key,
            observed
        );

        let forward = (!observed.has_forward())
            .then(|| self.write_forward(&source_key, &target_key, anchor));
        let backward = (!observed.has_backward())
            .then(|| self.write_backward(&source_key, &target_key, anchor));

        let result = Self::outcome_partial(source_key, target_key, observed, forward, backward);
        log_outcome(&result);
        Ok(result)
    }

    fn write_forward(
        &self,
        source_key: &RowKey,
        target_key: &RowKey,
        anchor: &str,
    ) -> StoreResult<()> {
        let mutation = RowMutation::new(source_key.as_bytes()).put(
            CF_OUTLINKS,
            target_key.as_bytes(),
            anchor,
        );
        self.store.put_row(&mutation)
    }

    fn write_backward(
        &self,
        source_key: &RowKey,
        target_key: &RowKey,
        anchor: &str,
    ) -> StoreResult<()> {
        let mutation = RowMutation::new(target_key.as_bytes()).put(
            CF_INLINKS,
            source_key.as_bytes(),
            anchor,
        );
        self.store.put_row(&mutation)
    }

    fn outcome(
        source_key: RowKey,
        target_key: RowKey,
        base: EdgeState,
        forward: StoreResult<()>,
        backward: StoreResult<()>,
    ) -> LinkWriteResult {
        Self::outcome_partial(source_key, target_key, base, Some(forward), Some(backward))
    }

    /// Combines the halves already present with the writes just attempted
    fn outcome_partial(
        source_key: RowKey,
        target_key: RowKey,
        base: EdgeState,
        forward: Option<StoreResult<()>>,
        backward: Option<StoreResult<()>>,
    ) -> LinkWriteResult {
        let (forward_written, forward_error) = split(forward);
        let (backward_written, backward_error) = split(backward);

        LinkWriteResult {
            source_key,
            target_key,
            state: base.merge(EdgeState::from_halves(forward_written, backward_written)),
            forward_error,
            backward_error,
        }
    }
}

/// Splits an optional write attempt into (succeeded, error)
fn split(attempt: Option<StoreResult<()>>) -> (bool, Option<StoreError>) {
    match attempt {
        Some(Ok(())) => (true, None),
        Some(Err(e)) => (false, Some(e)),
        None => (false, None),
    }
}

fn log_outcome(result: &LinkWriteResult) {
    match result.state {
        EdgeState::Complete => {
            tracing::debug!("Edge {} -> {} complete", result.source_key, result.target_key);
        }
        EdgeState::ForwardOnly | EdgeState::BackwardOnly => {
            let reason = result
                .forward_error
                .as_ref()
                .or(result.backward_error.as_ref())
                .map(ToString::to_string)
                .unwrap_or_default();
            tracing::warn!(
                "Half-edge {} -> {} left {}: {}",
                result.source_key,
                result.target_key,
                result.state,
                reason
            );
        }
        EdgeState::Unwritten => {
            tracing::warn!(
                "Edge {} -> {} not written: forward={:?} backward={:?}",
                result.source_key,
                result.target_key,
                result.forward_error.as_ref().map(ToString::to_string),
                result.backward_error.as_ref().map(ToString::to_string)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::FamilyDescriptor;
    use crate::store::{MemoryStore, Row};
    use crate::UrlError;

    /// Store wrapper that fails every put touching one family
    struct FailFamily {
        inner: Arc<MemoryStore>,
        family: &'static str,
    }

    impl WideColumnStore for FailFamily {
        fn families(&self) -> &[FamilyDescriptor] {
            self.inner.families()
        }

        fn put_row(&self, mutation: &RowMutation) -> StoreResult<()> {
            if mutation.families().contains(&self.family) {
                return Err(StoreError::write(&mutation.row_key, self.family, "injected"));
            }
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

    fn failing(family: &'static str) -> (Arc<MemoryStore>, LinkGraphWriter) {
        let inner = Arc::new(MemoryStore::new());
        let store = Arc::new(FailFamily {
            inner: inner.clone(),
            family,
        });
        (inner, LinkGraphWriter::new(store))
    }

    #[test]
    fn test_add_link_writes_both_halves() {
        let store = Arc::new(MemoryStore::new());
        let writer = LinkGraphWriter::new(store.clone());

        let result = writer
            .add_link("https://a.com/", "https://b.com/", "see b")
            .unwrap();
        assert_eq!(result.state, EdgeState::Complete);
        assert!(result.forward_error.is_none() && result.backward_error.is_none());

        let outlink = store
            .get_cell(result.source_key.as_bytes(), CF_OUTLINKS, result.target_key.as_bytes())
            .unwrap();
        let inlink = store
            .get_cell(result.target_key.as_bytes(), CF_INLINKS, result.source_key.as_bytes())
            .unwrap();
        assert_eq!(outlink, Some(b"see b".to_vec()));
        assert_eq!(inlink, Some(b"see b".to_vec()));
    }

    #[test]
    fn test_backward_failure_leaves_forward_only() {
        let (inner, writer) = failing(CF_INLINKS);

        let result = writer
            .add_link("https://a.com/", "https://b.com/", "see b")
            .unwrap();
        assert_eq!(result.state, EdgeState::ForwardOnly);
        assert!(result.forward_error.is_none());
        assert!(matches!(
            result.backward_error,
            Some(StoreError::Write { ref family, .. }) if family == CF_INLINKS
        ));

        assert!(inner
            .get_cell(result.source_key.as_bytes(), CF_OUTLINKS, result.target_key.as_bytes())
            .unwrap()
            .is_some());
        assert!(inner.get_row(result.target_key.as_bytes()).unwrap().is_none());
    }

    #[test]
    fn test_forward_failure_still_writes_backward() {
        let (inner, writer) = failing(CF_OUTLINKS);

        let result = writer
            .add_link("https://a.com/", "https://b.com/", "see b")
            .unwrap();
        assert_eq!(result.state, EdgeState::BackwardOnly);
        assert!(result.forward_error.is_some());
        assert!(inner
            .get_cell(result.target_key.as_bytes(), CF_INLINKS, result.source_key.as_bytes())
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_malformed_url_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let writer = LinkGraphWriter::new(store.clone());

        let result = writer.add_link("https://a.com/", "not-a-url", "x");
        assert!(matches!(result, Err(KeyError::Url(UrlError::MissingScheme(_)))));
        assert_eq!(store.row_count().unwrap(), 0);
    }

    #[test]
    fn test_retry_writes_only_missing_half() {
        let inner = Arc::new(MemoryStore::new());
        let broken = LinkGraphWriter::new(Arc::new(FailFamily {
            inner: inner.clone(),
            family: CF_INLINKS,
        }));
        let healthy = LinkGraphWriter::new(inner.clone());

        let first = broken
            .add_link("https://a.com/", "https://b.com/", "see b")
            .unwrap();
        assert_eq!(first.state, EdgeState::ForwardOnly);

        let retried = healthy.retry(&first, "see b");
        assert_eq!(retried.state, EdgeState::Complete);
        assert_eq!(
            healthy
                .edge_state("https://a.com/", "https://b.com/")
                .unwrap(),
            EdgeState::Complete
        );
    }

    #[test]
    fn test_edge_state_observes_stored_halves() {
        let store = Arc::new(MemoryStore::new());
        let writer = LinkGraphWriter::new(store.clone());
        assert_eq!(
            writer.edge_state("https://a.com/", "https://b.com/").unwrap(),
            EdgeState::Unwritten
        );

        writer
            .add_link("https://a.com/", "https://b.com/", "see b")
            .unwrap();
        assert_eq!(
            writer.edge_state("https://a.com/", "https://b.com/").unwrap(),
            EdgeState::Complete
        );
        // Direction matters
        assert_eq!(
            writer.edge_state("https://b.com/", "https://a.com/").unwrap(),
            EdgeState::Unwritten
        );
    }

    #[test]
    fn test_repair_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let writer = LinkGraphWriter::new(store.clone());
        writer
            .add_link("https://a.com/", "https://b.com/", "original")
            .unwrap();

        let repaired = writer
            .repair_link("https://a.com/", "https://b.com/", "changed")
            .unwrap();
        assert_eq!(repaired.state, EdgeState::Complete);

        // Nothing was rewritten
        let outlink = store
            .get_cell(repaired.source_key.as_bytes(), CF_OUTLINKS, repaired.target_key.as_bytes())
            .unwrap();
        assert_eq!(outlink, Some(b"original".to_vec()));
    }

    #[test]
    fn test_repair_completes_backward_only_edge() {
        let (inner, broken) = failing(CF_OUTLINKS);
        broken
            .add_link("https://a.com/x", "https://b.com/y", "why")
            .unwrap();

        let writer = LinkGraphWriter::new(inner);
        assert_eq!(
            writer.edge_state("https://a.com/x", "https://b.com/y").unwrap(),
            EdgeState::BackwardOnly
        );

        let repaired = writer
            .repair_link("https://a.com/x", "https://b.com/y", "why")
            .unwrap();
        assert_eq!(repaired.state, EdgeState::Complete);
        assert!(repaired.forward_error.is_none());
    }

    #[test]
    fn test_repair_failure_keeps_half_edge() {
        let (_inner, broken) = failing(CF_INLINKS);
        broken
            .add_link("https://a.com/", "https://b.com/", "see b")
            .unwrap();

        let repaired = broken
            .repair_link("https://a.com/", "https://b.com/", "see b")
            .unwrap();
        assert_eq!(repaired.state, EdgeState::ForwardOnly);
        assert!(repaired.backward_error.is_some());
    }
}
