//! Annotated document view for EDI Notepad
//!
//! ```text
//!   FileSource ──► DocumentView::open ──► Document ──► annotate(resolver)
//!        │               │                               │
//!        │               └─► summary state               └─► tooltips
//!        └─► ContextSelection (≤ 5 files for the assistant)
//! ```
//!
//! Nothing here talks to the network. Summaries are requested through a
//! [`edinote_summary::SummaryOrchestrator`] by the caller and handed back
//! to [`DocumentView::apply_summary`], which drops answers for documents
//! that are no longer on screen.

pub mod annotate;
pub mod context;
pub mod source;
pub mod tooltip;
pub mod view;

pub use annotate::{annotate, AnnotatedDocument, AnnotatedElement, AnnotatedSegment, Completeness};
pub use context::{ContextSelection, MAX_CONTEXT_FILES};
pub use source::{is_supported_file, FileSource, SourceFile, SUPPORTED_EXTENSIONS};
pub use tooltip::{element_tooltip, segment_tooltip, EMPTY_VALUE};
pub use view::{Applied, DocumentView, SummaryRequest, SummaryState, ViewState};

use std::path::PathBuf;

/// Errors from file intake and context selection.
///
/// Parsing and annotation never fail; these only cover what the user picks.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("unsupported file type: {name} (expected one of .edi, .out, .int, .in)")]
    UnsupportedFileType { name: String },
    #[error("a file named {0} is already loaded")]
    DuplicateFile(String),
    #[error("no loaded file named {0}")]
    UnknownFile(String),
    #[error("you can select a maximum of {max} files for AI context")]
    ContextLimit { max: usize },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ViewError>;
