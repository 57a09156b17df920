use edinote_dict::{BundledStore, DictionaryResolver, MemoryStore, NO_DESCRIPTION};
use edinote_view::{
    element_tooltip, segment_tooltip, Completeness, ContextSelection, DocumentView, FileSource,
    ViewState,
};
use std::sync::Arc;

const SAMPLE_850: &str = "ISA*00* *00* *ZZ*SENDERID *ZZ*RECEIVERID *250706*1400*U*00401*000000001*0*P*>~\
GS*PO*SENDERID*RECEIVERID*20250706*1400*1*X*004010~\
ST*850*0001~\
BEG*00*NE*123456789**20250706~\
N1*BY*Buyer Company*92*12345~\
N1*ST*Ship To Company*92*67890~\
SE*6*0001~\
GE*1*1~\
IEA*1*000000001";

#[tokio::test]
async fn test_file_to_tooltips() {
    let mut source = FileSource::new();
    source.add("order_850.edi", SAMPLE_850).unwrap();

    let resolver = Arc::new(DictionaryResolver::new());
    let mut view = DocumentView::new(resolver.clone());
    let file = source.get("order_850.edi").unwrap();
    view.open(&file.name, &file.content);
    assert_eq!(view.document().unwrap().len(), 9);

    resolver.load(&BundledStore).await;
    let annotated = view.annotate().unwrap();
    assert_eq!(annotated.completeness, Completeness::Complete);

    let n1 = annotated
        .segments
        .iter()
        .find(|s| s.tag() == "N1")
        .unwrap();
    let tooltip = segment_tooltip(n1);
    assert!(tooltip.starts_with("N1 - Name\n"));
    assert!(tooltip.contains("N101  BY"));

    let qualifier = element_tooltip(n1.element(1).unwrap());
    assert!(qualifier.contains("Meaning: Buying Party (Purchaser)"));
}

#[tokio::test]
async fn test_broken_dictionary_still_annotates() {
    let resolver = Arc::new(DictionaryResolver::new());
    resolver
        .load(&MemoryStore::new("not json", "[1,2,3]"))
        .await;

    let mut view = DocumentView::new(resolver);
    view.open("x.edi", SAMPLE_850);
    let annotated = view.annotate().unwrap();
    for segment in &annotated.segments {
        assert!(!segment.description.is_empty());
        for element in &segment.elements {
            assert_eq!(element.description, NO_DESCRIPTION);
            assert_eq!(element.meaning(), None);
        }
    }
    assert_eq!(view.state(), ViewState::Annotated(Completeness::Complete));
}

#[test]
fn test_context_selection_feeds_assistant_files() {
    let mut source = FileSource::new();
    source.add("order_850.edi", SAMPLE_850).unwrap();
    source.add("ship_856.edi", "ST*856*0001~").unwrap();

    let mut selection = ContextSelection::new();
    selection.select(&source, "order_850.edi").unwrap();

    let files = selection.files(&source);
    let prompt = edinote_summary::assistant_prompt("Who is buying?", &files);
    assert!(prompt.contains("--- START OF FILE: order_850.edi ---"));
    assert!(!prompt.contains("ship_856.edi"));
    assert!(prompt.contains("IMPORTANT ANALYSIS TASK"));
}

#[tokio::test]
async fn test_windows_export_with_byte_order_mark() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("windows_850.edi");
    std::fs::write(&path, format!("\u{feff}{SAMPLE_850}")).unwrap();

    let mut source = FileSource::new();
    let file = source.add_path(&path).unwrap().clone();

    let resolver = Arc::new(DictionaryResolver::new());
    resolver.load(&BundledStore).await;
    let mut view = DocumentView::new(resolver.clone());
    view.open(&file.name, &file.content);

    let envelope = edinote_x12::Envelope::scan(view.document().unwrap());
    assert_eq!(
        envelope.interchange.as_ref().map(|isa| isa.sender_id.as_str()),
        Some("SENDERID")
    );

    let annotated = view.annotate().unwrap();
    let isa = annotated.segment(1).unwrap();
    assert_eq!(isa.tag(), "ISA");
    assert_eq!(isa.description, resolver.describe_segment("ISA"));
    assert_ne!(isa.element(1).unwrap().description, NO_DESCRIPTION);
}
