//! Envelope overview: ISA / GS headers and ST..SE transaction sets.
//!
//! This is a report, not a validator. Counts and control numbers are read
//! as declared; mismatches are surfaced through accessors, never as errors.

use crate::segment::{Document, Segment};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// Human name for a transaction-set identifier code (ST01).
pub fn transaction_set_name(code: &str) -> Option<&'static str> {
    let name = match code.trim() {
        "810" => "Invoice",
        "812" => "Credit/Debit Adjustment",
        "820" => "Payment Order/Remittance Advice",
        "824" => "Application Advice",
        "830" => "Planning Schedule with Release Capability",
        "832" => "Price/Sales Catalog",
        "846" => "Inventory Inquiry/Advice",
        "850" => "Purchase Order",
        "852" => "Product Activity Data",
        "855" => "Purchase Order Acknowledgment",
        "856" => "Ship Notice/Manifest",
        "860" => "Purchase Order Change Request - Buyer Initiated",
        "865" => "Purchase Order Change Acknowledgment/Request - Seller Initiated",
        "940" => "Warehouse Shipping Order",
        "943" => "Warehouse Stock Transfer Shipment Advice",
        "944" => "Warehouse Stock Transfer Receipt Advice",
        "945" => "Warehouse Shipping Advice",
        "997" => "Functional Acknowledgment",
        "999" => "Implementation Acknowledgment",
        _ => return None,
    };
    Some(name)
}

/// Interchange header (ISA) fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interchange {
    pub sender_qualifier: String,
    pub sender_id: String,
    pub receiver_qualifier: String,
    pub receiver_id: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub version: String,
    pub control_number: String,
    pub test_indicator: Option<String>,
    /// IEA01, when the trailer is present.
    pub declared_group_count: Option<usize>,
}

impl Interchange {
    fn from_isa(isa: &Segment) -> Self {
        let text = |i: usize| isa.trimmed_value(i).unwrap_or_default().to_string();
        Self {
            sender_qualifier: text(5),
            sender_id: text(6),
            receiver_qualifier: text(7),
            receiver_id: text(8),
            date: isa
                .trimmed_value(9)
                .and_then(|v| NaiveDate::parse_from_str(v, "%y%m%d").ok()),
            time: isa.trimmed_value(10).and_then(parse_hhmm),
            version: text(12),
            control_number: text(13),
            test_indicator: isa.trimmed_value(15).map(str::to_string),
            declared_group_count: None,
        }
    }

    pub fn is_production(&self) -> bool {
        self.test_indicator.as_deref() == Some("P")
    }
}

/// Functional group header (GS) fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionalGroup {
    pub functional_id: String,
    pub sender: String,
    pub receiver: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub control_number: String,
    pub version: String,
    /// GE01, when the trailer is present.
    pub declared_set_count: Option<usize>,
    pub actual_set_count: usize,
}

impl FunctionalGroup {
    fn from_gs(gs: &Segment) -> Self {
        let text = |i: usize| gs.trimmed_value(i).unwrap_or_default().to_string();
        Self {
            functional_id: text(1),
            sender: text(2),
            receiver: text(3),
            date: gs
                .trimmed_value(4)
                .and_then(|v| NaiveDate::parse_from_str(v, "%Y%m%d").ok()),
            time: gs.trimmed_value(5).and_then(parse_hhmm),
            control_number: text(6),
            version: text(8),
            declared_set_count: None,
            actual_set_count: 0,
        }
    }
}

/// One ST..SE transaction set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionSet {
    pub code: String,
    pub name: Option<&'static str>,
    pub control_number: String,
    /// Document position of the ST segment.
    pub start_position: usize,
    /// Document position of the last segment in the set: the SE, or the
    /// segment before an ST that interrupted it. `None` runs to the end.
    pub end_position: Option<usize>,
    /// An SE trailer closed this set.
    pub closed: bool,
    /// SE01 as declared.
    pub declared_segment_count: Option<usize>,
    /// SE02 as declared.
    pub trailer_control_number: Option<String>,
}

impl TransactionSet {
    fn from_st(st: &Segment) -> Self {
        let code = st.trimmed_value(1).unwrap_or_default().to_string();
        Self {
            name: transaction_set_name(&code),
            code,
            control_number: st.trimmed_value(2).unwrap_or_default().to_string(),
            start_position: st.position,
            end_position: None,
            closed: false,
            declared_segment_count: None,
            trailer_control_number: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Segments from ST through SE inclusive (or through the last seen segment).
    pub fn actual_segment_count(&self, document_len: usize) -> usize {
        let end = self.end_position.unwrap_or(document_len);
        end + 1 - self.start_position
    }

    /// `Some(false)` when SE01 disagrees with the actual count.
    pub fn count_matches(&self, document_len: usize) -> Option<bool> {
        self.declared_segment_count
            .map(|declared| declared == self.actual_segment_count(document_len))
    }

    pub fn control_numbers_match(&self) -> Option<bool> {
        self.trailer_control_number
            .as_deref()
            .map(|trailer| trailer == self.control_number)
    }

    pub fn display_name(&self) -> String {
        match self.name {
            Some(name) => format!("{} {}", self.code, name),
            None => format!("Transaction Set {}", self.code),
        }
    }
}

/// Envelope structure found in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub interchange: Option<Interchange>,
    pub groups: Vec<FunctionalGroup>,
    pub transaction_sets: Vec<TransactionSet>,
    pub document_len: usize,
}

impl Envelope {
    pub fn scan(doc: &Document) -> Self {
        let mut envelope = Envelope {
            document_len: doc.len(),
            ..Default::default()
        };
        let mut open_set: Option<usize> = None;

        for seg in doc {
            match seg.tag.to_ascii_uppercase().as_str() {
                "ISA" if envelope.interchange.is_none() => {
                    envelope.interchange = Some(Interchange::from_isa(seg));
                }
                "IEA" => {
                    if let Some(isa) = envelope.interchange.as_mut() {
                        isa.declared_group_count = parse_count(seg.trimmed_value(1));
                    }
                }
                "GS" => envelope.groups.push(FunctionalGroup::from_gs(seg)),
                "GE" => {
                    if let Some(gs) = envelope.groups.last_mut() {
                        gs.declared_set_count = parse_count(seg.trimmed_value(1));
                    }
                }
                "ST" => {
                    if let Some(idx) = open_set.take() {
                        envelope.transaction_sets[idx].end_position = Some(seg.position - 1);
                    }
                    if let Some(gs) = envelope.groups.last_mut() {
                        gs.actual_set_count += 1;
                    }
                    envelope.transaction_sets.push(TransactionSet::from_st(seg));
                    open_set = Some(envelope.transaction_sets.len() - 1);
                }
                "SE" => {
                    if let Some(idx) = open_set.take() {
                        let set = &mut envelope.transaction_sets[idx];
                        set.end_position = Some(seg.position);
                        set.closed = true;
                        set.declared_segment_count = parse_count(seg.trimmed_value(1));
                        set.trailer_control_number = seg.trimmed_value(2).map(str::to_string);
                    }
                }
                _ => {}
            }
        }

        envelope
    }

    /// The first transaction set, which names the document for display.
    pub fn primary(&self) -> Option<&TransactionSet> {
        self.transaction_sets.first()
    }
}

fn parse_count(value: Option<&str>) -> Option<usize> {
    value.and_then(|v| v.parse().ok())
}

fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    let hhmm = value.get(..4)?;
    NaiveTime::parse_from_str(hhmm, "%H%M").ok()
}
