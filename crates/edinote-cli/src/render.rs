//! Terminal rendering of annotated documents and envelope overviews.

use colored::Colorize;
use edinote_view::AnnotatedDocument;
use edinote_x12::{Envelope, ELEMENT_SEPARATOR, SEGMENT_TERMINATOR};
use std::fmt::Write;

/// One segment per line, tag highlighted, segment title as a trailing comment.
pub fn annotated_lines(doc: &AnnotatedDocument<'_>) -> String {
    let mut out = String::new();
    for segment in &doc.segments {
        let mut line = segment.tag().purple().bold().to_string();
        for element in &segment.elements {
            line.push_str(&ELEMENT_SEPARATOR.to_string().dimmed().to_string());
            line.push_str(element.value());
        }
        line.push_str(&SEGMENT_TERMINATOR.to_string().dimmed().to_string());
        let _ = writeln!(
            out,
            "{:>4}  {}  {}",
            segment.segment.position.to_string().dimmed(),
            line,
            format!("# {}", segment.title()).dimmed()
        );
    }
    out
}

pub fn envelope_report(envelope: &Envelope) -> String {
    let mut out = String::new();
    if let Some(isa) = &envelope.interchange {
        let _ = writeln!(out, "{}", "Interchange".cyan().bold());
        let _ = writeln!(out, "  sender:    {} ({})", isa.sender_id, isa.sender_qualifier);
        let _ = writeln!(out, "  receiver:  {} ({})", isa.receiver_id, isa.receiver_qualifier);
        if let Some(date) = isa.date {
            let time = isa.time.map(|t| t.format(" %H:%M").to_string()).unwrap_or_default();
            let _ = writeln!(out, "  sent:      {}{}", date.format("%Y-%m-%d"), time);
        }
        let _ = writeln!(out, "  version:   {}", isa.version);
        let _ = writeln!(out, "  control:   {}", isa.control_number);
        let usage = if isa.is_production() { "production" } else { "test" };
        let _ = writeln!(out, "  usage:     {usage}");
    }

    for group in &envelope.groups {
        let _ = writeln!(
            out,
            "{} {} ({} → {}), control {}",
            "Group".cyan().bold(),
            group.functional_id,
            group.sender,
            group.receiver,
            group.control_number
        );
    }

    if envelope.transaction_sets.is_empty() {
        let _ = writeln!(out, "{}", "no transaction sets found".yellow());
    }
    for set in &envelope.transaction_sets {
        let actual = set.actual_segment_count(envelope.document_len);
        let count = match (set.declared_segment_count, set.count_matches(envelope.document_len)) {
            (Some(declared), Some(true)) => format!("{actual} segments (SE01 {declared})").green(),
            (Some(declared), _) => format!("{actual} segments (SE01 says {declared})").yellow(),
            (None, _) => format!("{actual} segments (no SE trailer)").yellow(),
        };
        let _ = writeln!(
            out,
            "{} {} control {}: {}",
            "Transaction".cyan().bold(),
            set.display_name(),
            set.control_number,
            count
        );
    }
    out
}
