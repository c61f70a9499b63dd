//! Page record model
//!
//! A page is one row in the web table. Its fields are spread over four
//! column families (content, meta, outlinks, inlinks). Writes are sparse and
//! each write call is a single atomic row mutation.

mod fields;
mod record;
mod table;

pub use fields::PageFieldSet;
pub use record::PageRecord;
pub use table::{DomainScope, PageTable};
