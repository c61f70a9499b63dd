//! Link graph maintenance
//!
//! A hyperlink `S -> T` with anchor text `A` is stored twice: as
//! `outlinks[key(T)] = A` on the row of `S`, and as `inlinks[key(S)] = A`
//! on the row of `T`.

mod edge;
mod writer;

pub use edge::EdgeState;
pub use writer::{LinkGraphWriter, LinkWriteResult};
