//! The field mapping stored as a document's source.

mod document;

pub use document::*;
