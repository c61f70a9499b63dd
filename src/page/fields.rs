//! Sparse field sets for page writes

use crate::families::{
    CF_CONTENT, CF_INLINKS, CF_META, CF_OUTLINKS, COL_CONTENT_TYPE, COL_FETCH_TIME, COL_HTML,
    COL_STATUS, COL_TEXT,
};
use crate::rowkey::RowKey;
use crate::store::{Cell, RowMutation};
use chrono::{DateTime, Utc};

/// A sparse set of page fields to write in one batch
///
/// Only fields that were set become cells; nothing is written for the rest.
/// Setting the same field twice keeps the later value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFieldSet {
    cells: Vec<Cell>,
}

impl PageFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw HTML body (`content:html`)
    pub fn html(self, html: impl Into<Vec<u8>>) -> Self {
        self.set(CF_CONTENT, COL_HTML, html)
    }

    /// Extracted text (`content:text`)
    pub fn text(self, text: impl Into<Vec<u8>>) -> Self {
        self.set(CF_CONTENT, COL_TEXT, text)
    }

    /// Fetch time (`meta:fetch_time`), stored as epoch milliseconds
    pub fn fetch_time(self, fetched_at: DateTime<Utc>) -> Self {
        self.set(
            CF_META,
            COL_FETCH_TIME,
            fetched_at.timestamp_millis().to_string(),
        )
    }

    /// HTTP status (`meta:status`)
    pub fn status(self, status: u16) -> Self {
        self.set(CF_META, COL_STATUS, status.to_string())
    }

    /// Content type (`meta:content_type`)
    pub fn content_type(self, content_type: &str) -> Self {
        self.set(CF_META, COL_CONTENT_TYPE, content_type)
    }

    /// Forward edge to `target` (`outlinks:<target key>`)
    pub fn outlink(self, target: &RowKey, anchor: &str) -> Self {
        self.set(CF_OUTLINKS, target.as_str(), anchor)
    }

    /// Backward edge from `source` (`inlinks:<source key>`)
    pub fn inlink(self, source: &RowKey, anchor: &str) -> Self {
        self.set(CF_INLINKS, source.as_str(), anchor)
    }

    /// Sets an arbitrary (family, qualifier) cell
    pub fn set(
        mut self,
        family: &str,
        qualifier: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        let qualifier = qualifier.into();
        let value = value.into();

        match self
            .cells
            .iter_mut()
            .find(|c| c.family == family && c.qualifier == qualifier)
        {
            Some(cell) => cell.value = value,
            None => self.cells.push(Cell {
                family: family.to_string(),
                qualifier,
                value,
            }),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Turns the field set into a single-row mutation for `key`
    pub fn to_mutation(&self, key: &RowKey) -> RowMutation {
        RowMutation {
            row_key: key.as_bytes().to_vec(),
            cells: self.cells.clone(),
        }
    }
}
