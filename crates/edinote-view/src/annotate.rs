//! Annotation engine.
//!
//! Segment and element descriptions are resolved eagerly when a document is
//! annotated; coded meanings are resolved only when an element is inspected.
//! The annotated structure borrows from the document and the resolver and
//! is rebuilt whenever it is needed.

use edinote_dict::{segment_title, DictionaryResolver};
use edinote_x12::{Document, Element, Segment};

/// Whether dictionary data was available when the annotation was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    /// Dictionaries not loaded yet; element descriptions are placeholders.
    Partial,
    Complete,
}

#[derive(Debug, Clone)]
pub struct AnnotatedDocument<'a> {
    pub segments: Vec<AnnotatedSegment<'a>>,
    pub completeness: Completeness,
    /// Resolver generation the descriptions were taken from.
    pub generation: u64,
}

impl<'a> AnnotatedDocument<'a> {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment at a 1-based position.
    pub fn segment(&self, position: usize) -> Option<&AnnotatedSegment<'a>> {
        position.checked_sub(1).and_then(|i| self.segments.get(i))
    }

    /// `true` once the resolver has moved past the generation used here.
    pub fn is_stale(&self, resolver: &DictionaryResolver) -> bool {
        resolver.generation() != self.generation
    }
}

#[derive(Debug, Clone)]
pub struct AnnotatedSegment<'a> {
    pub segment: &'a Segment,
    pub description: &'a str,
    pub elements: Vec<AnnotatedElement<'a>>,
}

impl<'a> AnnotatedSegment<'a> {
    pub fn tag(&self) -> &'a str {
        &self.segment.tag
    }

    /// Short title, e.g. `Transaction Set Header`.
    pub fn title(&self) -> &'a str {
        segment_title(self.description)
    }

    /// Element at a 1-based index.
    pub fn element(&self, index: usize) -> Option<&AnnotatedElement<'a>> {
        index.checked_sub(1).and_then(|i| self.elements.get(i))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnnotatedElement<'a> {
    pub element: &'a Element,
    pub description: &'a str,
    resolver: &'a DictionaryResolver,
}

impl<'a> AnnotatedElement<'a> {
    pub fn value(&self) -> &'a str {
        &self.element.value
    }

    /// `TAGnn`, e.g. `N101`.
    pub fn reference(&self) -> String {
        self.element.reference()
    }

    /// Coded meaning of this element's value, looked up now.
    pub fn meaning(&self) -> Option<&'a str> {
        let value = self.element.value.trim();
        if value.is_empty() {
            return None;
        }
        self.resolver
            .describe_code_at(&self.element.segment_tag, self.element.index, value)
    }
}

/// Annotate `doc` with whatever `resolver` knows right now.
pub fn annotate<'a>(doc: &'a Document, resolver: &'a DictionaryResolver) -> AnnotatedDocument<'a> {
    let segments = doc
        .iter()
        .map(|segment| AnnotatedSegment {
            segment,
            description: resolver.describe_segment(&segment.tag),
            elements: segment
                .elements
                .iter()
                .map(|element| AnnotatedElement {
                    element,
                    description: resolver.describe_element(&segment.tag, element.index),
                    resolver,
                })
                .collect(),
        })
        .collect();

    AnnotatedDocument {
        segments,
        completeness: if resolver.is_loaded() {
            Completeness::Complete
        } else {
            Completeness::Partial
        },
        generation: resolver.generation(),
    }
}
