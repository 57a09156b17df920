//! Resolver behaviour across stores: load-once guard, degradation, lookups.

use async_trait::async_trait;
use edinote_dict::*;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Store that counts fetches and takes a while to answer.
struct SlowStore {
    fetches: AtomicUsize,
}

#[async_trait]
impl DictionaryStore for SlowStore {
    async fn fetch_structural(&self) -> edinote_dict::Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(BundledStore::STRUCTURAL.to_vec())
    }

    async fn fetch_code_values(&self) -> edinote_dict::Result<Vec<u8>> {
        Ok(BundledStore::CODE_VALUES.to_vec())
    }

    fn describe(&self) -> String {
        "slow".to_string()
    }
}

#[tokio::test]
async fn test_concurrent_load_fetches_once() {
    let resolver = Arc::new(DictionaryResolver::new());
    let store = SlowStore {
        fetches: AtomicUsize::new(0),
    };

    let (first, second) = tokio::join!(resolver.load(&store), resolver.load(&store));

    assert!(matches!(first, LoadOutcome::Loaded { .. }));
    assert_eq!(second, LoadOutcome::InProgress);
    assert_eq!(store.fetches.load(Ordering::SeqCst), 1);
    assert!(resolver.is_loaded());
    assert!(!resolver.is_loading());
    assert_eq!(resolver.load(&store).await, LoadOutcome::AlreadyLoaded);
}

/// Store whose structural fetch never completes.
struct HangingStore;

#[async_trait]
impl DictionaryStore for HangingStore {
    async fn fetch_structural(&self) -> edinote_dict::Result<Vec<u8>> {
        std::future::pending().await
    }

    async fn fetch_code_values(&self) -> edinote_dict::Result<Vec<u8>> {
        Ok(BundledStore::CODE_VALUES.to_vec())
    }

    fn describe(&self) -> String {
        "hanging".to_string()
    }
}

#[tokio::test]
async fn test_abandoned_load_can_be_retried() {
    let resolver = DictionaryResolver::new();

    let abandoned =
        tokio::time::timeout(Duration::from_millis(20), resolver.load(&HangingStore)).await;
    assert!(abandoned.is_err());
    assert!(!resolver.is_loading());
    assert!(!resolver.is_loaded());

    let retry = resolver.load(&BundledStore).await;
    assert!(matches!(retry, LoadOutcome::Loaded { degraded: false, .. }));
    assert!(resolver.is_loaded());
    assert!(resolver.generation() > 0);
}

#[tokio::test]
async fn test_fs_store_with_nested_dictionary() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(SEGMENTS_FILE),
        r#"{
            "N1": { "elements": { "1": { "name": "Entity Identifier Code", "qualifiers": { "BY": "Buyer" } } } },
            "REF": { "1": "Reference Identification Qualifier" }
        }"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join(CODE_VALUES_FILE),
        r#"{ "N1": { "01": { "BY": "Buyer" } } }"#,
    )
    .unwrap();

    let resolver = DictionaryResolver::new();
    let outcome = resolver.load(&FsStore::new(dir.path())).await;
    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            segments: 2,
            code_segments: 1,
            degraded: false
        }
    );
    assert_eq!(
        resolver.describe_element("N1", 1),
        "Entity Identifier Code (BY=Buyer)"
    );
    assert_eq!(
        resolver.describe_element("REF", 1),
        "Reference Identification Qualifier"
    );
    assert_eq!(resolver.describe_code("N1", "01", "BY"), Some("Buyer"));
}

#[tokio::test]
async fn test_missing_directory_degrades() {
    let dir = tempfile::tempdir().unwrap();
    let resolver = DictionaryResolver::new();
    let outcome = resolver.load(&FsStore::new(dir.path().join("absent"))).await;
    assert!(matches!(outcome, LoadOutcome::Loaded { degraded: true, .. }));
    assert_eq!(resolver.describe_element("ST", 1), NO_DESCRIPTION);
    assert_ne!(resolver.describe_segment("ST"), DEFAULT_SEGMENT_DESCRIPTION);
}

#[tokio::test]
async fn test_n1_buyer_lookup() {
    let resolver = DictionaryResolver::new();
    resolver.load(&BundledStore).await;

    let description = resolver.describe_element("N1", 1);
    assert_ne!(description, NO_DESCRIPTION);
    assert!(description.contains("Entity Identifier"));
    // Either a defined meaning or absent; never a panic.
    let meaning = resolver.describe_code("N1", "01", "BY");
    assert!(meaning.map_or(true, |m| !m.is_empty()));
}

fn bundled() -> DictionaryResolver {
    DictionaryResolver::with_tables(
        StructuralTable::from_slice(BundledStore::STRUCTURAL).unwrap(),
        CodeTable::from_slice(BundledStore::CODE_VALUES).unwrap(),
    )
}

proptest! {
    #[test]
    fn prop_lookups_never_fail(tag in ".{0,6}", index in 0usize..200, value in ".{0,6}") {
        for resolver in [DictionaryResolver::new(), bundled()] {
            prop_assert!(!resolver.describe_segment(&tag).is_empty());
            prop_assert!(!resolver.describe_element(&tag, index).is_empty());
            let _ = resolver.describe_code(&tag, &index.to_string(), &value);
            let _ = resolver.describe_code(&tag, &value, &value);
        }
    }
}
