//! X12 dictionaries for EDI Notepad
//!
//! Two read-only lookup tables back every tooltip:
//!
//! - **structural**: segment tag → 2-digit element index → description,
//!   plus a `default` entry;
//! - **code values**: segment tag → element index → coded value → meaning.
//!
//! Both are fetched once from a [`DictionaryStore`] by a [`DictionaryResolver`]
//! and never mutated afterwards. Until the load completes (or if it fails)
//! every lookup resolves to its fallback, so documents can always be shown.

pub mod catalog;
pub mod resolver;
pub mod store;
pub mod table;

pub use catalog::{segment_description, segment_title, DEFAULT_SEGMENT_DESCRIPTION};
pub use resolver::{DictionaryResolver, LoadOutcome};
pub use store::{BundledStore, DictionaryStore, FsStore, MemoryStore, CODE_VALUES_FILE, SEGMENTS_FILE};
pub use table::{CodeTable, StructuralTable, NO_DESCRIPTION};

use std::path::PathBuf;

/// Errors raised by dictionary stores and table decoding.
///
/// The resolver never propagates these; it logs them and keeps empty tables.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {table} dictionary JSON: {source}")]
    Json {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {table} dictionary: {reason}")]
    Shape { table: &'static str, reason: String },
    #[error("{0} dictionary not available from this store")]
    Missing(&'static str),
}

pub type Result<T> = std::result::Result<T, DictError>;
