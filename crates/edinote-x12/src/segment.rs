//! Segment / element data model.

use serde::{Deserialize, Serialize};

/// Terminates a segment.
pub const SEGMENT_TERMINATOR: char = '~';

/// Separates elements within a segment.
pub const ELEMENT_SEPARATOR: char = '*';

/// Dictionary key for a 1-based element position (`1` → `"01"`).
pub fn element_key(index: usize) -> String {
    format!("{index:02}")
}

/// One `*`-delimited field of a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub segment_tag: String,
    /// 1-based position, stable even when the value is empty.
    pub index: usize,
    pub value: String,
}

impl Element {
    /// Zero-padded dictionary key for this element.
    pub fn key(&self) -> String {
        element_key(self.index)
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Reference name as shown in tooltips, e.g. `N101`.
    pub fn reference(&self) -> String {
        format!("{}{}", self.segment_tag, self.key())
    }
}

/// One structural unit of an EDI message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub tag: String,
    /// 1-based position within the document.
    pub position: usize,
    pub elements: Vec<Element>,
}

impl Segment {
    /// Element at a 1-based index.
    pub fn element(&self, index: usize) -> Option<&Element> {
        index.checked_sub(1).and_then(|i| self.elements.get(i))
    }

    /// Raw value at a 1-based index.
    pub fn value(&self, index: usize) -> Option<&str> {
        self.element(index).map(|e| e.value.as_str())
    }

    /// Value at a 1-based index with surrounding padding removed; `None` when blank.
    pub fn trimmed_value(&self, index: usize) -> Option<&str> {
        self.value(index).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn values(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.value.as_str()).collect()
    }

    /// Re-serialize without the terminator.
    pub fn to_raw(&self) -> String {
        let mut out = self.tag.clone();
        for element in &self.elements {
            out.push(ELEMENT_SEPARATOR);
            out.push_str(&element.value);
        }
        out
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }
}

/// Ordered segments produced from one raw text blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub segments: Vec<Segment>,
}

impl Document {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Segment at a 1-based position.
    pub fn segment(&self, position: usize) -> Option<&Segment> {
        position.checked_sub(1).and_then(|i| self.segments.get(i))
    }

    /// First segment carrying `tag` (case-insensitive).
    pub fn find(&self, tag: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.is(tag))
    }

    /// Expanded form: one terminated segment per line.
    pub fn to_expanded(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("{}{}", s.to_raw(), SEGMENT_TERMINATOR))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n1() -> Segment {
        let values = ["BY", "Buyer Company", "92", "12345"];
        Segment {
            tag: "N1".to_string(),
            position: 1,
            elements: values
                .iter()
                .enumerate()
                .map(|(i, v)| Element {
                    segment_tag: "N1".to_string(),
                    index: i + 1,
                    value: v.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_element_key_is_zero_padded() {
        assert_eq!(element_key(1), "01");
        assert_eq!(element_key(16), "16");
        assert_eq!(element_key(100), "100");
    }

    #[test]
    fn test_segment_element_access_is_one_based() {
        let seg = n1();
        assert_eq!(seg.value(1), Some("BY"));
        assert_eq!(seg.value(4), Some("12345"));
        assert_eq!(seg.value(0), None);
        assert_eq!(seg.value(5), None);
        assert_eq!(seg.element(2).unwrap().reference(), "N102");
    }

    #[test]
    fn test_segment_round_trips_to_raw() {
        assert_eq!(n1().to_raw(), "N1*BY*Buyer Company*92*12345");
    }
}
