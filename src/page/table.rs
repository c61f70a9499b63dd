//! Page writes and reads against a shared store handle

use crate::page::{PageFieldSet, PageRecord};
use crate::rowkey::{all_salts, domain_prefix, KeyEncoder, RowKey};
use crate::store::{Row, StoreResult, WideColumnStore};
use crate::url::reverse_domain;
use crate::{UrlError, WebTableError};
use std::sync::Arc;

/// Which rows a domain scan returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DomainScope {
    /// Only pages whose host is exactly the domain
    #[default]
    Exact,
    /// The domain and every subdomain below it
    IncludeSubdomains,
}

/// Page-level access to the web table
///
/// The table holds no state of its own besides the store handle and the key
/// encoder, so it can be cloned and shared freely between threads.
#[derive(Clone)]
pub struct PageTable {
    store: Arc<dyn WideColumnStore>,
    encoder: KeyEncoder,
}

impl PageTable {
    /// Creates a page table over `store` using the default key encoder
    pub fn new(store: Arc<dyn WideColumnStore>) -> Self {
        Self::with_encoder(store, KeyEncoder::default())
    }

    pub fn with_encoder(store: Arc<dyn WideColumnStore>, encoder: KeyEncoder) -> Self {
        Self { store, encoder }
    }

    pub fn store(&self) -> &Arc<dyn WideColumnStore> {
        &self.store
    }

    pub fn encoder(&self) -> KeyEncoder {
        self.encoder
    }

    /// Writes a sparse set of fields to one page row
    ///
    /// All fields go to the store as one row mutation, so a reader never
    /// observes part of a call. Existing values are overwritten without any
    /// version check. An empty field set writes nothing.
    ///
    /// # Arguments
    ///
    /// * `key` - The page's row key
    /// * `fields` - Fields to write
    ///
    /// # Returns
    ///
    /// * `Ok(())` - All fields were written
    /// * `Err(StoreError)` - None of the fields were written
    pub fn put_page(&self, key: &RowKey, fields: &PageFieldSet) -> StoreResult<()> {
        if fields.is_empty() {
            return Ok(());
        }

        tracing::debug!("Writing {} cells to {}", fields.len(), key);
        self.store.put_row(&fields.to_mutation(key))
    }

    /// Encodes `url` and writes `fields` to its row
    ///
    /// Returns the row key that was written.
    pub fn put_url(&self, url: &str, fields: &PageFieldSet) -> Result<RowKey, WebTableError> {
        let key = self.encoder.encode(url)?;
        self.put_page(&key, fields)?;
        Ok(key)
    }

    /// Reads one page
    pub fn get_page(&self, key: &RowKey) -> StoreResult<Option<PageRecord>> {
        self.store
            .get_row(key.as_bytes())?
            .map(|row| PageRecord::from_row(&row))
            .transpose()
    }

    /// Encodes `url` and reads its page
    pub fn get_url(&self, url: &str) -> Result<Option<PageRecord>, WebTableError> {
        let key = self.encoder.encode(url)?;
        Ok(self.get_page(&key)?)
    }

    /// Returns every page stored under a domain
    ///
    /// The salt hides the domain from a single prefix scan, so this fans out
    /// over all salt buckets and scans `<salt>!<reversed-domain>` in each.
    /// Results are ordered by row key.
    ///
    /// # Arguments
    ///
    /// * `domain` - Host in normal order (`www.example.com`)
    /// * `scope` - Whether subdomains are included
    pub fn pages_in_domain(
        &self,
        domain: &str,
        scope: DomainScope,
    ) -> Result<Vec<PageRecord>, WebTableError> {
        let rows = self.rows_in_domain(domain, scope)?;
        let pages = rows
            .iter()
            .map(PageRecord::from_row)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(pages)
    }

    /// Raw rows under a domain, see [`PageTable::pages_in_domain`]
    pub fn rows_in_domain(
        &self,
        domain: &str,
        scope: DomainScope,
    ) -> Result<Vec<Row>, WebTableError> {
        let domain = domain.to_lowercase();
        if domain.split('.').any(str::is_empty) {
            return Err(UrlError::EmptyDomainLabel(domain).into());
        }
        let reversed = reverse_domain(&domain);

        let mut rows = Vec::new();
        for salt in all_salts() {
            rows.extend(
                self.store
                    .scan_prefix(domain_prefix(&salt, &reversed, false).as_bytes())?,
            );
            if scope == DomainScope::IncludeSubdomains {
                rows.extend(
                    self.store
                        .scan_prefix(domain_prefix(&salt, &reversed, true).as_bytes())?,
                );
            }
        }

        // The two prefixes of one bucket interleave; restore key order
        if scope == DomainScope::IncludeSubdomains {
            rows.sort_by(|a, b| a.key.cmp(&b.key));
        }

        tracing::debug!("Domain scan of {} returned {} rows", domain, rows.len());
        Ok(rows)
    }
}
