//! X12 flat-file parsing for EDI Notepad
//!
//! Turns raw delimited EDI X12 text into an ordered, position-preserving
//! structure:
//!
//! ```text
//!   raw text ──► normalize ──► parse ──► Document
//!                    │                     │
//!                    └─► Format::render    └─► Envelope::scan
//!                        (expanded/compact)     (ISA/GS/ST..SE overview)
//! ```
//!
//! Only `~` (segment terminator) and `*` (element separator) are understood.
//! Alternate delimiters declared inside an ISA header are not interpreted.

pub mod envelope;
pub mod normalize;
pub mod parser;
pub mod segment;

pub use envelope::{transaction_set_name, Envelope, FunctionalGroup, Interchange, TransactionSet};
pub use normalize::{normalize, strip_bom, to_compact, Format};
pub use parser::parse;
pub use segment::{element_key, Document, Element, Segment, ELEMENT_SEPARATOR, SEGMENT_TERMINATOR};
