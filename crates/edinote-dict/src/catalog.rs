//! Built-in segment descriptions.
//!
//! Segment-level text is shipped in code so segment tooltips work before
//! (or without) any dictionary load.

/// Fallback description for unknown segment tags.
pub const DEFAULT_SEGMENT_DESCRIPTION: &str = "This is an EDI Segment Identifier.";

const SEGMENTS: &[(&str, &str)] = &[
    ("ISA", "Interchange Control Header - Marks the beginning of an EDI interchange."),
    ("GS", "Functional Group Header - Marks the beginning of a functional group and provides control information."),
    ("ST", "Transaction Set Header - Marks the beginning of a transaction set and assigns a control number."),
    ("BEG", "Beginning Segment for Purchase Order - Indicates the beginning of the purchase order and transmits identifying numbers and dates."),
    ("BIG", "Beginning Segment for Invoice - Indicates the beginning of an invoice and transmits identifying numbers and dates."),
    ("BSN", "Beginning Segment for Ship Notice - Used to transmit identifying numbers, dates, and other basic data relating to the transaction set."),
    ("HL", "Hierarchical Level - Used to define a hierarchical structure for the transaction set."),
    ("TD1", "Carrier Details (Quantity and Weight) - Specifies transportation details such as commodity, quantity, and weight."),
    ("TD5", "Carrier Details (Routing Sequence/Transit Time) - Specifies the carrier and routing sequence."),
    ("REF", "Reference Identification - Specifies identifying information."),
    ("PER", "Administrative Communications Contact - Identifies a person or office to whom communications should be directed."),
    ("DTM", "Date/Time Reference - Specifies pertinent dates and times."),
    ("FOB", "F.O.B. Related Instructions - Specifies transportation instructions relating to shipment."),
    ("ITD", "Terms of Sale/Deferred Terms of Sale - Specifies terms of sale."),
    ("N1", "Name - To identify a party by type of organization, name, and code."),
    ("N2", "Additional Name Information - To specify additional names."),
    ("N3", "Address Information - To specify the address of a party."),
    ("N4", "Geographic Location - To specify the geographic location of a party."),
    ("PO1", "Baseline Item Data - Specifies basic and most frequently used line item data."),
    ("IT1", "Baseline Item Data (Invoice) - Specifies the basic and most frequently used line item data for the invoice."),
    ("PRF", "Purchase Order Reference - Provides a reference to the original purchase order."),
    ("LIN", "Item Identification - Specifies basic item identification data."),
    ("SN1", "Item Detail (Shipment) - Specifies line-item detail for the shipment."),
    ("PID", "Product/Item Description - Describes a product or item in free-form format."),
    ("MAN", "Marks and Numbers - Indicates markings and numbers for a shipping container."),
    ("TDS", "Total Monetary Value Summary - Specifies the total invoice discounts and amounts."),
    ("CTT", "Transaction Totals - To transmit a hash total for a specific element in the transaction set."),
    ("SE", "Transaction Set Trailer - Marks the end of a transaction set and provides a count of the transmitted segments."),
    ("GE", "Functional Group Trailer - Marks the end of a functional group and provides control information."),
    ("IEA", "Interchange Control Trailer - Marks the end of an EDI interchange."),
];

/// Built-in description for an (already uppercased) segment tag.
pub fn segment_description(tag: &str) -> Option<&'static str> {
    SEGMENTS
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, description)| *description)
}

/// Short title: the text before the first `" - "`.
pub fn segment_title(description: &str) -> &str {
    description
        .split_once(" - ")
        .map(|(title, _)| title)
        .unwrap_or(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        assert!(segment_description("ST")
            .unwrap()
            .starts_with("Transaction Set Header"));
        assert_eq!(segment_description("st"), None);
        assert_eq!(segment_description("ZZZ"), None);
    }

    #[test]
    fn test_segment_title() {
        assert_eq!(
            segment_title(segment_description("N1").unwrap()),
            "Name"
        );
        assert_eq!(segment_title(DEFAULT_SEGMENT_DESCRIPTION), DEFAULT_SEGMENT_DESCRIPTION);
    }
}
