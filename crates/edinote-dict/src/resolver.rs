//! Dictionary resolver: load-once tables with layered fallbacks.
//!
//! Lookup tiers:
//!
//! | lookup              | tiers                                                        |
//! |---------------------|--------------------------------------------------------------|
//! | `describe_segment`  | loaded `"00"` entry → built-in catalogue → default text      |
//! | `describe_element`  | loaded `(tag, nn)` → loaded `default` entry → sentinel       |
//! | `describe_code`     | loaded `(tag, nn, value)` → absent                           |
//!
//! None of these fail. Before the load completes they answer from the
//! built-in tiers only.

use crate::catalog::{self, DEFAULT_SEGMENT_DESCRIPTION};
use crate::store::DictionaryStore;
use crate::table::{pad_index, CodeTable, StructuralTable, NO_DESCRIPTION};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct Tables {
    structural: StructuralTable,
    codes: CodeTable,
}

/// Clears the in-progress flag when a load finishes or its future is dropped.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Result of a [`DictionaryResolver::load`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Tables installed. `degraded` is set when either table failed and was left empty.
    Loaded {
        segments: usize,
        code_segments: usize,
        degraded: bool,
    },
    /// A previous call already installed the tables.
    AlreadyLoaded,
    /// Another call is fetching right now; this one did nothing.
    InProgress,
}

/// Shared, read-only dictionary access.
///
/// Construct one per process, wrap it in an `Arc`, and hand it to whoever
/// annotates or summarizes.
#[derive(Debug, Default)]
pub struct DictionaryResolver {
    tables: OnceLock<Tables>,
    loading: AtomicBool,
    generation: AtomicU64,
}

impl DictionaryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver with tables already decoded; mostly for tests and tools.
    pub fn with_tables(structural: StructuralTable, codes: CodeTable) -> Self {
        let resolver = Self::default();
        let _ = resolver.tables.set(Tables { structural, codes });
        resolver.generation.store(1, Ordering::Release);
        resolver
    }

    /// Fetch both tables from `store` and install them. Idempotent.
    ///
    /// Store or decode failures are logged and leave the affected table
    /// empty; the resolver still counts as loaded afterwards.
    pub async fn load<S>(&self, store: &S) -> LoadOutcome
    where
        S: DictionaryStore + ?Sized,
    {
        if self.tables.get().is_some() {
            return LoadOutcome::AlreadyLoaded;
        }
        if self.loading.swap(true, Ordering::AcqRel) {
            debug!(store = %store.describe(), "dictionary load already in progress");
            return LoadOutcome::InProgress;
        }
        let _loading = LoadingGuard(&self.loading);

        let mut degraded = false;

        let structural = match store.fetch_structural().await {
            Ok(bytes) => StructuralTable::from_slice(&bytes),
            Err(err) => Err(err),
        }
        .unwrap_or_else(|err| {
            warn!(store = %store.describe(), error = %err, "structural dictionary unavailable");
            degraded = true;
            StructuralTable::default()
        });

        let codes = match store.fetch_code_values().await {
            Ok(bytes) => CodeTable::from_slice(&bytes),
            Err(err) => Err(err),
        }
        .unwrap_or_else(|err| {
            warn!(store = %store.describe(), error = %err, "code-value dictionary unavailable");
            degraded = true;
            CodeTable::default()
        });

        let outcome = LoadOutcome::Loaded {
            segments: structural.segment_count(),
            code_segments: codes.segment_count(),
            degraded,
        };

        if self.tables.set(Tables { structural, codes }).is_err() {
            return LoadOutcome::AlreadyLoaded;
        }
        self.generation.fetch_add(1, Ordering::AcqRel);

        info!(store = %store.describe(), ?outcome, "dictionaries loaded");
        outcome
    }

    pub fn is_loaded(&self) -> bool {
        self.tables.get().is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Bumped when tables become available; views compare it to know when
    /// to re-resolve.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Description of a segment tag. Never fails.
    pub fn describe_segment(&self, tag: &str) -> &str {
        let tag = tag.trim().to_ascii_uppercase();
        self.structural()
            .and_then(|t| t.segment_description(&tag))
            .or_else(|| catalog::segment_description(&tag))
            .unwrap_or(DEFAULT_SEGMENT_DESCRIPTION)
    }

    /// Description of the element at 1-based `index` of segment `tag`. Never fails.
    pub fn describe_element(&self, tag: &str, index: usize) -> &str {
        let tag = tag.trim().to_ascii_uppercase();
        let Some(structural) = self.structural() else {
            return NO_DESCRIPTION;
        };
        if tag.is_empty() {
            return structural.default_description().unwrap_or(NO_DESCRIPTION);
        }
        structural
            .element(&tag, &pad_index(&index.to_string()))
            .or_else(|| structural.default_description())
            .unwrap_or(NO_DESCRIPTION)
    }

    /// Meaning of a coded value; `None` means "show the raw value only".
    pub fn describe_code(&self, tag: &str, index: &str, value: &str) -> Option<&str> {
        self.codes()?.lookup(tag, index, value)
    }

    /// [`describe_code`](Self::describe_code) with a numeric element index.
    pub fn describe_code_at(&self, tag: &str, index: usize, value: &str) -> Option<&str> {
        self.describe_code(tag, &index.to_string(), value)
    }

    /// Known coded values for `(tag, index)`.
    pub fn code_values(&self, tag: &str, index: usize) -> Vec<(&str, &str)> {
        self.codes()
            .map(|c| c.values_for(tag, &index.to_string()))
            .unwrap_or_default()
    }

    fn structural(&self) -> Option<&StructuralTable> {
        self.tables.get().map(|t| &t.structural)
    }

    fn codes(&self) -> Option<&CodeTable> {
        self.tables.get().map(|t| &t.codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BundledStore, MemoryStore};

    #[test]
    fn test_unloaded_resolver_uses_builtin_tiers() {
        let resolver = DictionaryResolver::new();
        assert!(!resolver.is_loaded());
        assert!(resolver.describe_segment("st").starts_with("Transaction Set Header"));
        assert_eq!(resolver.describe_segment("ZZ9"), DEFAULT_SEGMENT_DESCRIPTION);
        assert_eq!(resolver.describe_element("N1", 1), NO_DESCRIPTION);
        assert_eq!(resolver.describe_code("N1", "01", "BY"), None);
    }

    #[tokio::test]
    async fn test_bundled_load_resolves_all_tiers() {
        let resolver = DictionaryResolver::new();
        let outcome = resolver.load(&BundledStore).await;
        assert!(matches!(outcome, LoadOutcome::Loaded { degraded: false, .. }));
        assert_eq!(resolver.generation(), 1);

        assert_eq!(resolver.describe_element("N1", 1), "Entity Identifier Code");
        assert_eq!(resolver.describe_element(" n1 ", 2), "Name");
        assert_eq!(resolver.describe_element("N1", 99), NO_DESCRIPTION);
        assert_eq!(resolver.describe_element("", 1), NO_DESCRIPTION);
        assert_eq!(
            resolver.describe_code("N1", "01", "BY"),
            Some("Buying Party (Purchaser)")
        );
        assert_eq!(resolver.describe_code_at("N1", 1, "ST"), Some("Ship To"));
        assert_eq!(resolver.describe_code("N1", "01", "??"), None);
    }

    #[tokio::test]
    async fn test_second_load_is_noop() {
        let resolver = DictionaryResolver::new();
        resolver.load(&BundledStore).await;
        assert_eq!(resolver.load(&BundledStore).await, LoadOutcome::AlreadyLoaded);
        assert_eq!(resolver.generation(), 1);
    }

    #[tokio::test]
    async fn test_broken_store_degrades_to_empty_tables() {
        let resolver = DictionaryResolver::new();
        let store = MemoryStore::default().with_structural("{ definitely not json");
        let outcome = resolver.load(&store).await;
        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                segments: 0,
                code_segments: 0,
                degraded: true
            }
        );
        assert!(resolver.is_loaded());
        assert_eq!(resolver.describe_element("N1", 1), NO_DESCRIPTION);
        assert!(resolver.describe_segment("N1").starts_with("Name"));
        assert_eq!(resolver.describe_code("N1", "01", "BY"), None);
    }

    #[tokio::test]
    async fn test_loaded_segment_description_overrides_catalogue() {
        let store = MemoryStore::new(r#"{"N1": {"00": "Party Name", "01": "Who"}}"#, "{}");
        let resolver = DictionaryResolver::new();
        resolver.load(&store).await;
        assert_eq!(resolver.describe_segment("N1"), "Party Name");
        assert_eq!(resolver.describe_element("N1", 1), "Who");
        assert_eq!(resolver.describe_element("N1", 2), NO_DESCRIPTION);
    }
}
