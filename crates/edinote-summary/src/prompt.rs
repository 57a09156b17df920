//! Prompt templates for summaries and the file-aware assistant.

use edinote_dict::DictionaryResolver;
use edinote_x12::Document;
use std::collections::BTreeSet;

const SUMMARY_TEMPLATE: &str = "\
You are a helpful business analyst. A colleague with no EDI background needs to \
understand the raw EDI X12 file below.

Write a short briefing that:
- Opens with one plain-English sentence saying what this document is and why it matters.
- Lists the key facts as simple bullets: who sent it, who receives the goods, when it was sent, \
what is being ordered or shipped, how many units, where it is going, important dates, and \
reference numbers such as PO, invoice, or tracking numbers.
- Uses no EDI jargon or segment codes (no \"ST\", \"BSN\", \"HL\").
- Prefers everyday words, for example \"tracking number\" instead of \"PRO number\".
- Stays concise, around 150 words.
";

const ASSISTANT_PREAMBLE: &str =
    "Based on the following file(s), please answer the user's question.";

const PURCHASE_ORDER_ADDENDUM: &str = "\
---

**IMPORTANT ANALYSIS TASK:**
One of the provided files is an EDI 850 Purchase Order. Write a detailed, story-style summary \
of this transaction for a business user, following the structure and markdown formatting below.

### Story Summary of Your EDI 850 Transaction

On [date from ISA], the company identified as [sender ID from ISA] sent a Purchase Order to \
its trading partner, [receiver ID from ISA].

**Purchase Order Details:**
- **PO Number:** [BEG03]
- **Order Type:** [meaning of the code in BEG02]
- **Order Date:** [BEG05]
- **Requested Delivery Date:** [DTM*002]

**Buyer Contact:**
- **Name:** [PER*BD]
- **Contact:** [PER*TE]

**Shipping Terms:**
- **FOB:** [meaning of the code in FOB01]

**Payment Terms:**
- **Details:** [terms from ITD, e.g. 'Payment due in 45 days']

**Ship-To Location:**
- **Name/Location:** [N1*ST]
- **Address:** [N3]
- **City, State, Zip:** [N4]

**Ordered Items:**
*For each PO1 loop:*
- **Item:** [PID description]
- **SKU/Vendor PN:** [PO107]
- **UPC:** [PO111]
- **Quantity:** [PO102] [PO103]
- **Unit Price:** $[PO104]

**Totals:**
- **Total Line Items:** [CTT01]

**Technical Flow:**
- The message is a valid 850 Purchase Order, opening with ISA/GS/ST headers and closing with \
SE/GE/IEA trailers.

**Please analyze the provided EDI 850 data and fill in the template above with the values from the file.**";

/// A named file supplied to the assistant as context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFile {
    pub name: String,
    pub content: String,
}

impl ContextFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn is_purchase_order(&self) -> bool {
        self.name.contains("850")
    }
}

/// Summary prompt for one document. `glossary` lines are appended as
/// resolved code meanings the model may rely on.
pub fn summary_prompt(content: &str, glossary: &[String]) -> String {
    let mut prompt = String::with_capacity(SUMMARY_TEMPLATE.len() + content.len() + 64);
    prompt.push_str(SUMMARY_TEMPLATE);
    if !glossary.is_empty() {
        prompt.push_str("\nCode meanings already resolved for this file:\n");
        for line in glossary {
            prompt.push_str("- ");
            prompt.push_str(line);
            prompt.push('\n');
        }
    }
    prompt.push_str("\nHere is the raw EDI text:\n");
    prompt.push_str(content);
    prompt.push('\n');
    prompt
}

/// Assistant prompt over up to a handful of context files.
pub fn assistant_prompt(question: &str, files: &[ContextFile]) -> String {
    let combined = files
        .iter()
        .map(|f| {
            format!(
                "--- START OF FILE: {name} ---\n{content}\n--- END OF FILE: {name} ---",
                name = f.name,
                content = f.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut prompt = format!("{ASSISTANT_PREAMBLE}\n\n{combined}\n\nUser Question: {question}");
    if files.iter().any(ContextFile::is_purchase_order) {
        prompt.push_str("\n\n");
        prompt.push_str(PURCHASE_ORDER_ADDENDUM);
    }
    prompt
}

/// Distinct `TAGnn value = meaning` lines for every coded value in `document`
/// the resolver knows.
pub fn code_glossary(document: &Document, resolver: &DictionaryResolver) -> Vec<String> {
    let mut seen = BTreeSet::new();
    for segment in document {
        for element in &segment.elements {
            let value = element.value.trim();
            if value.is_empty() {
                continue;
            }
            if let Some(meaning) = resolver.describe_code_at(&segment.tag, element.index, value) {
                seen.insert(format!("{} {} = {}", element.reference(), value, meaning));
            }
        }
    }
    seen.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use edinote_dict::{CodeTable, StructuralTable};
    use serde_json::json;

    #[test]
    fn test_summary_prompt_embeds_content_and_glossary() {
        let p = summary_prompt("ST*850*0001~", &[]);
        assert!(p.starts_with("You are a helpful business analyst."));
        assert!(p.ends_with("Here is the raw EDI text:\nST*850*0001~\n"));
        assert!(!p.contains("Code meanings"));

        let p = summary_prompt("N1*BY*ACME~", &["N101 BY = Buying Party (Purchaser)".into()]);
        assert!(p.contains("- N101 BY = Buying Party (Purchaser)\n"));
    }

    #[test]
    fn test_assistant_prompt_wraps_files() {
        let files = vec![
            ContextFile::new("a.edi", "ISA*00~"),
            ContextFile::new("b.edi", "GS*PO~"),
        ];
        let p = assistant_prompt("What is this?", &files);
        assert!(p.starts_with(ASSISTANT_PREAMBLE));
        assert!(p.contains(
            "--- START OF FILE: a.edi ---\nISA*00~\n--- END OF FILE: a.edi ---\n\n--- START OF FILE: b.edi ---"
        ));
        assert!(p.ends_with("User Question: What is this?"));
    }

    #[test]
    fn test_purchase_order_addendum_only_for_850_files() {
        let plain = assistant_prompt("q", &[ContextFile::new("ship_856.edi", "")]);
        assert!(!plain.contains("IMPORTANT ANALYSIS TASK"));
        let po = assistant_prompt("q", &[ContextFile::new("po_850.edi", "")]);
        assert!(po.contains("IMPORTANT ANALYSIS TASK"));
    }

    #[test]
    fn test_code_glossary_lists_known_codes_once() {
        let resolver = DictionaryResolver::with_tables(
            StructuralTable::default(),
            CodeTable::from_value(&json!({"N1": {"01": {"BY": "Buying Party (Purchaser)"}}}))
                .unwrap(),
        );
        let doc = edinote_x12::parse("N1*BY*ACME~N1*BY*OTHER~N1*ZZ*X~");
        assert_eq!(
            code_glossary(&doc, &resolver),
            vec!["N101 BY = Buying Party (Purchaser)".to_string()]
        );
    }
}
