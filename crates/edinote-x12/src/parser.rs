//! Segment/element parser.
//!
//! Purely structural: no ST/SE count checks, no control-number matching.
//! Blank entries (e.g. after a trailing `~`) and segments with an empty tag
//! are dropped without error.

use crate::normalize::strip_bom;
use crate::segment::{Document, Element, Segment, ELEMENT_SEPARATOR, SEGMENT_TERMINATOR};

/// Parse EDI text (expanded or compact) into a [`Document`].
pub fn parse(text: &str) -> Document {
    let mut segments = Vec::new();

    for raw in strip_bom(text).split(SEGMENT_TERMINATOR) {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        // `split` keeps empty tokens, so omitted optional elements keep their slot.
        let mut tokens = raw.split(ELEMENT_SEPARATOR);
        let tag = tokens.next().unwrap_or_default().trim();
        if tag.is_empty() {
            tracing::trace!(segment = raw, "skipping segment without tag");
            continue;
        }

        let elements = tokens
            .enumerate()
            .map(|(i, value)| Element {
                segment_tag: tag.to_string(),
                index: i + 1,
                value: value.to_string(),
            })
            .collect();

        segments.push(Segment {
            tag: tag.to_string(),
            position: segments.len() + 1,
            elements,
        });
    }

    Document { segments }
}
