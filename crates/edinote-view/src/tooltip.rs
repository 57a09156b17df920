//! Plain-text tooltip rendering.

use crate::annotate::{AnnotatedElement, AnnotatedSegment};
use std::fmt::Write;

/// Placeholder shown for empty element values.
pub const EMPTY_VALUE: &str = "<empty>";

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        EMPTY_VALUE
    } else {
        value
    }
}

/// Segment tooltip: heading, full description, then one line per element.
///
/// ```text
/// N1 - Name
/// Name - To identify a party by type of organization, name, and code.
///
/// Elements:
///   N101  BY             Entity Identifier Code
///   N102  Buyer Company  Name
/// ```
pub fn segment_tooltip(segment: &AnnotatedSegment<'_>) -> String {
    let tag = segment.tag().to_ascii_uppercase();
    let mut out = format!("{tag} - {}\n{}", segment.title(), segment.description);
    if segment.elements.is_empty() {
        return out;
    }

    let rows: Vec<(String, &str, &str)> = segment
        .elements
        .iter()
        .map(|e| (format!("{tag}{}", e.element.key()), display_value(e.value()), e.description))
        .collect();
    let ref_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|r| r.1.chars().count()).max().unwrap_or(0);

    out.push_str("\n\nElements:");
    for (reference, value, description) in rows {
        let _ = write!(
            out,
            "\n  {reference:<ref_width$}  {value:<value_width$}  {description}"
        );
    }
    out
}

/// Element tooltip. The `Meaning:` line appears only when a coded meaning resolves.
pub fn element_tooltip(element: &AnnotatedElement<'_>) -> String {
    let mut out = format!(
        "{} - {}\nValue: {}\nDescription: {}",
        element.reference(),
        element.description,
        display_value(element.value()),
        element.description
    );
    if let Some(meaning) = element.meaning() {
        let _ = write!(out, "\nMeaning: {meaning}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::annotate;
    use edinote_dict::{CodeTable, DictionaryResolver, StructuralTable};
    use serde_json::json;

    fn resolver() -> DictionaryResolver {
        DictionaryResolver::with_tables(
            StructuralTable::from_value(&json!({
                "N1": {"01": "Entity Identifier Code", "02": "Name", "03": "Identification Code Qualifier"}
            }))
            .unwrap(),
            CodeTable::from_value(&json!({"N1": {"01": {"BY": "Buying Party (Purchaser)"}}})).unwrap(),
        )
    }

    #[test]
    fn test_segment_tooltip_lists_elements() {
        let resolver = resolver();
        let doc = edinote_x12::parse("N1*BY**92~");
        let annotated = annotate(&doc, &resolver);
        let text = segment_tooltip(annotated.segment(1).unwrap());

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "N1 - Name");
        assert!(lines[1].starts_with("Name - To identify a party"));
        assert_eq!(lines[3], "Elements:");
        assert_eq!(lines[4], "  N101  BY       Entity Identifier Code");
        assert_eq!(lines[5], "  N102  <empty>  Name");
        assert_eq!(lines[6], "  N103  92       Identification Code Qualifier");
    }

    #[test]
    fn test_segment_tooltip_without_elements() {
        let resolver = DictionaryResolver::new();
        let doc = edinote_x12::parse("ZZZ~");
        let annotated = annotate(&doc, &resolver);
        assert_eq!(
            segment_tooltip(annotated.segment(1).unwrap()),
            "ZZZ - This is an EDI Segment Identifier.\nThis is an EDI Segment Identifier."
        );
    }

    #[test]
    fn test_element_tooltip_meaning_only_when_resolved() {
        let resolver = resolver();
        let doc = edinote_x12::parse("N1*BY*ACME~");
        let annotated = annotate(&doc, &resolver);
        let n1 = annotated.segment(1).unwrap();

        assert_eq!(
            element_tooltip(n1.element(1).unwrap()),
            "N101 - Entity Identifier Code\nValue: BY\nDescription: Entity Identifier Code\nMeaning: Buying Party (Purchaser)"
        );
        assert!(!element_tooltip(n1.element(2).unwrap()).contains("Meaning:"));
    }
}
