//! Identifiers and groups of ontology terms
//!
//! Terms are exposed to callers by their opaque [`TermId`]. Internally every
//! term is assigned a dense [`TermIndex`] which is used for all set operations
//! and as key for counts, information content and the similarity cache.

mod group;
pub(crate) mod internal;
mod termid;

pub use group::{Iter, TermGroup};
pub use termid::{TermId, TermIndex};
