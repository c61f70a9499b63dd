//! Typed view of a page row

use crate::families::{
    CF_CONTENT, CF_INLINKS, CF_META, CF_OUTLINKS, COL_CONTENT_TYPE, COL_FETCH_TIME, COL_HTML,
    COL_STATUS, COL_TEXT,
};
use crate::rowkey::RowKey;
use crate::store::{Row, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A page as read back from the web table
///
/// Every field is optional because writes are sparse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub key: RowKey,
    pub html: Option<Vec<u8>>,
    pub text: Option<Vec<u8>>,
    pub fetch_time: Option<DateTime<Utc>>,
    pub status: Option<u16>,
    pub content_type: Option<String>,
    /// Target row key -> anchor text
    pub outlinks: BTreeMap<RowKey, String>,
    /// Source row key -> anchor text
    pub inlinks: BTreeMap<RowKey, String>,
}

impl PageRecord {
    /// Decodes a store row into a page record
    ///
    /// Unknown qualifiers in the content and meta families are ignored.
    /// Cells that are present but cannot be decoded are reported as
    /// `StoreError::Corrupt`.
    pub fn from_row(row: &Row) -> StoreResult<Self> {
        let key = RowKey::from_bytes(&row.key).map_err(|e| StoreError::Corrupt {
            row_key: row.key_lossy(),
            family: String::new(),
            qualifier: String::new(),
            message: e.to_string(),
        })?;

        let html = row.get(CF_CONTENT, COL_HTML.as_bytes()).map(<[u8]>::to_vec);
        let text = row.get(CF_CONTENT, COL_TEXT.as_bytes()).map(<[u8]>::to_vec);

        let fetch_time = row
            .get(CF_META, COL_FETCH_TIME.as_bytes())
            .map(|raw| -> StoreResult<DateTime<Utc>> {
                let millis: i64 = parse_ascii(row, CF_META, COL_FETCH_TIME, raw)?;
                DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
                    corrupt(row, CF_META, COL_FETCH_TIME, "timestamp out of range")
                })
            })
            .transpose()?;

        let status = row
            .get(CF_META, COL_STATUS.as_bytes())
            .map(|raw| parse_ascii::<u16>(row, CF_META, COL_STATUS, raw))
            .transpose()?;

        let content_type = row
            .get(CF_META, COL_CONTENT_TYPE.as_bytes())
            .map(|raw| utf8(row, CF_META, COL_CONTENT_TYPE, raw))
            .transpose()?;

        Ok(Self {
            key,
            html,
            text,
            fetch_time,
            status,
            content_type,
            outlinks: decode_links(row, CF_OUTLINKS)?,
            inlinks: decode_links(row, CF_INLINKS)?,
        })
    }
}

fn decode_links(row: &Row, family: &str) -> StoreResult<BTreeMap<RowKey, String>> {
    let mut links = BTreeMap::new();
    for (qualifier, value) in row.family(family) {
        let qualifier_text = String::from_utf8_lossy(qualifier);
        let peer = RowKey::from_bytes(qualifier)
            .map_err(|e| corrupt(row, family, &qualifier_text, &e.to_string()))?;
        let anchor = utf8(row, family, &qualifier_text, value)?;
        links.insert(peer, anchor);
    }
    Ok(links)
}

fn utf8(row: &Row, family: &str, qualifier: &str, raw: &[u8]) -> StoreResult<String> {
    String::from_utf8(raw.to_vec()).map_err(|_| corrupt(row, family, qualifier, "invalid UTF-8"))
}

fn parse_ascii<T: std::str::FromStr>(
    row: &Row,
    family: &str,
    qualifier: &str,
    raw: &[u8],
) -> StoreResult<T> {
    utf8(row, family, qualifier, raw)?
        .trim()
        .parse()
        .map_err(|_| corrupt(row, family, qualifier, "not a decimal number"))
}

fn corrupt(row: &Row, family: &str, qualifier: &str, message: &str) -> StoreError {
    StoreError::Corrupt {
        row_key: row.key_lossy(),
        family: family.to_string(),
        qualifier: qualifier.to_string(),
        message: message.to_string(),
    }
}
