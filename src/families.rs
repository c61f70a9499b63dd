//! Column family definitions for the web table
//!
//! Each family is tuned for its own access pattern:
//! - content: large page bodies, hot serving path (in-memory, big blocks)
//! - meta: tiny fixed fields read by point lookup (small blocks)
//! - outlinks: target row key -> anchor text (row+column bloom filter)
//! - inlinks: source row key -> anchor text (row+column bloom filter)
//!
//! The tuning values are opaque to this crate; backends record them and a
//! real wide-column store would apply them.

use std::fmt;

/// Default table name
pub const TABLE_NAME: &str = "webTable";

/// Column family for page bodies
pub const CF_CONTENT: &str = "content";

/// Column family for fetch metadata
pub const CF_META: &str = "meta";

/// Column family for forward edges, keyed by target row key
pub const CF_OUTLINKS: &str = "outlinks";

/// Column family for backward edges, keyed by source row key
pub const CF_INLINKS: &str = "inlinks";

/// All column family names
pub const ALL_CF_NAMES: &[&str] = &[CF_CONTENT, CF_META, CF_OUTLINKS, CF_INLINKS];

// Qualifiers inside the content and meta families
pub const COL_HTML: &str = "html";
pub const COL_TEXT: &str = "text";
pub const COL_FETCH_TIME: &str = "fetch_time";
pub const COL_STATUS: &str = "status";
pub const COL_CONTENT_TYPE: &str = "content_type";

/// Existence filter granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BloomFilter {
    None,
    /// Answers "might row X exist"
    Row,
    /// Answers "might row X have column Y"
    RowCol,
}

impl BloomFilter {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Row => "row",
            Self::RowCol => "rowcol",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "row" => Some(Self::Row),
            "rowcol" => Some(Self::RowCol),
            _ => None,
        }
    }
}

/// Block compression algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Snappy,
    Zstd,
}

impl Compression {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Snappy => "snappy",
            Self::Zstd => "zstd",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "snappy" => Some(Self::Snappy),
            "zstd" => Some(Self::Zstd),
            _ => None,
        }
    }
}

/// Tuning knobs for one column family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyDescriptor {
    pub name: String,
    pub max_versions: u32,
    pub in_memory: bool,
    pub block_cache: bool,
    pub compression: Compression,
    pub block_size: u32,
    pub bloom_filter: BloomFilter,
}

impl FamilyDescriptor {
    /// Creates a descriptor with single-version, cached, uncompressed defaults
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            max_versions: 1,
            in_memory: false,
            block_cache: true,
            compression: Compression::None,
            block_size: 64 * 1024,
            bloom_filter: BloomFilter::Row,
        }
    }

    pub fn with_block_size(mut self, block_size: u32) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_bloom_filter(mut self, bloom_filter: BloomFilter) -> Self {
        self.bloom_filter = bloom_filter;
        self
    }

    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.in_memory = in_memory;
        self
    }
}

impl fmt::Display for FamilyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (versions={}, in_memory={}, block_cache={}, ",
            self.name, self.max_versions, self.in_memory, self.block_cache
        )?;
        write!(
            f,
            "compression={:?}, block_size={}, bloom={:?})",
            self.compression, self.block_size, self.bloom_filter
        )
    }
}

/// Descriptor for the content family: in-memory, 64 KiB blocks
fn content_family() -> FamilyDescriptor {
    FamilyDescriptor::new(CF_CONTENT)
        .in_memory(true)
        .with_block_size(64 * 1024)
}

/// Descriptor for the meta family: 16 KiB blocks for point lookups
fn meta_family() -> FamilyDescriptor {
    FamilyDescriptor::new(CF_META).with_block_size(16 * 1024)
}

/// Descriptor for a link family: 32 KiB blocks, row+column bloom
fn link_family(name: &str) -> FamilyDescriptor {
    FamilyDescriptor::new(name)
        .with_block_size(32 * 1024)
        .with_bloom_filter(BloomFilter::RowCol)
}

/// Build all column family descriptors of the web table
pub fn webtable_families() -> Vec<FamilyDescriptor> {
    vec![
        content_family(),
        meta_family(),
        link_family(CF_OUTLINKS),
        link_family(CF_INLINKS),
    ]
}
