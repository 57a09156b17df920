//! Per-document view session.
//!
//! Document side: `Empty → Parsed → Annotated{Partial|Complete}`.
//! Summary side: `Idle → Pending → Ready | Failed`.
//!
//! Opening a file resets both sides. A summary result is applied only when
//! its ticket belongs to the open document and is the latest request made
//! for it; anything else is reported as [`Applied::Stale`] and ignored.

use crate::annotate::{annotate, AnnotatedDocument, Completeness};
use edinote_dict::DictionaryResolver;
use edinote_summary::{
    CompletionError, CompletionService, DocumentId, Summary, SummaryOrchestrator, SummaryTicket,
};
use edinote_x12::{normalize, parse, Document, Format};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Empty,
    Parsed,
    Annotated(Completeness),
}

#[derive(Debug, Clone)]
pub enum SummaryState {
    Idle,
    Pending(SummaryTicket),
    Ready(Summary),
    /// `message` is safe to show; `detail` is the extracted provider detail.
    Failed { message: String, detail: String },
}

impl SummaryState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SummaryState::Pending(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

/// What the caller needs to run a summary request.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub ticket: SummaryTicket,
    pub content: String,
}

#[derive(Debug)]
struct OpenDocument {
    id: DocumentId,
    name: String,
    normalized: String,
    document: Document,
    annotated_generation: Option<u64>,
}

#[derive(Debug)]
pub struct DocumentView {
    resolver: Arc<DictionaryResolver>,
    open: Option<OpenDocument>,
    format: Format,
    summary: SummaryState,
}

impl DocumentView {
    pub fn new(resolver: Arc<DictionaryResolver>) -> Self {
        Self {
            resolver,
            open: None,
            format: Format::default(),
            summary: SummaryState::Idle,
        }
    }

    pub fn resolver(&self) -> &Arc<DictionaryResolver> {
        &self.resolver
    }

    /// Show a new file. Any pending summary for the previous one is cancelled.
    pub fn open(&mut self, name: impl Into<String>, raw: &str) -> DocumentId {
        self.close();
        let normalized = normalize(raw);
        let document = parse(&normalized);
        let id = Uuid::new_v4();
        let name = name.into();
        debug!(document = %id, name = %name, segments = document.len(), "document opened");
        self.open = Some(OpenDocument {
            id,
            name,
            normalized,
            document,
            annotated_generation: None,
        });
        id
    }

    pub fn close(&mut self) {
        if let SummaryState::Pending(ticket) = &self.summary {
            ticket.token().cancel();
        }
        self.summary = SummaryState::Idle;
        self.open = None;
    }

    pub fn state(&self) -> ViewState {
        let Some(open) = &self.open else {
            return ViewState::Empty;
        };
        match open.annotated_generation {
            None => ViewState::Parsed,
            Some(generation) if self.resolver.is_loaded() && generation == self.resolver.generation() => {
                ViewState::Annotated(Completeness::Complete)
            }
            Some(_) => ViewState::Annotated(Completeness::Partial),
        }
    }

    pub fn document_id(&self) -> Option<DocumentId> {
        self.open.as_ref().map(|o| o.id)
    }

    pub fn name(&self) -> Option<&str> {
        self.open.as_ref().map(|o| o.name.as_str())
    }

    pub fn document(&self) -> Option<&Document> {
        self.open.as_ref().map(|o| &o.document)
    }

    /// Normalized (expanded) text.
    pub fn normalized(&self) -> Option<&str> {
        self.open.as_ref().map(|o| o.normalized.as_str())
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn set_format(&mut self, format: Format) {
        self.format = format;
    }

    pub fn toggle_format(&mut self) -> Format {
        self.format = self.format.toggle();
        self.format
    }

    /// Text in the current presentation format.
    pub fn rendered(&self) -> Option<Cow<'_, str>> {
        self.open
            .as_ref()
            .map(|o| self.format.render(&o.normalized))
    }

    /// Annotate the open document with the resolver's current tables.
    pub fn annotate(&mut self) -> Option<AnnotatedDocument<'_>> {
        let open = self.open.as_mut()?;
        open.annotated_generation = Some(self.resolver.generation());
        Some(annotate(&open.document, &self.resolver))
    }

    /// `true` when dictionaries arrived after the last annotation.
    pub fn needs_reannotation(&self) -> bool {
        self.open.as_ref().is_some_and(|o| {
            o.annotated_generation
                .is_some_and(|g| g != self.resolver.generation())
        })
    }

    pub fn summary(&self) -> &SummaryState {
        &self.summary
    }

    /// Enter `Pending` for the open document and hand back what the caller
    /// should pass to the orchestrator.
    pub fn request_summary<C>(&mut self, orchestrator: &SummaryOrchestrator<C>) -> Option<SummaryRequest>
    where
        C: CompletionService + ?Sized,
    {
        let open = self.open.as_ref()?;
        let ticket = orchestrator.begin(open.id);
        let request = SummaryRequest {
            ticket: ticket.clone(),
            content: open.normalized.clone(),
        };
        self.summary = SummaryState::Pending(ticket);
        Some(request)
    }

    /// Apply a finished request. Results for other documents or superseded
    /// requests leave the view untouched.
    pub fn apply_summary(
        &mut self,
        ticket: &SummaryTicket,
        result: Result<Summary, CompletionError>,
    ) -> Applied {
        let current = matches!(
            (&self.open, &self.summary),
            (Some(open), SummaryState::Pending(pending))
                if open.id == ticket.document && pending.matches(ticket)
        );
        if !current {
            debug!(
                document = %ticket.document,
                request = ticket.request,
                "dropping stale summary result"
            );
            return Applied::Stale;
        }

        self.summary = match result {
            Ok(summary) => SummaryState::Ready(summary),
            Err(err) => SummaryState::Failed {
                message: err.user_message(),
                detail: err.detail(),
            },
        };
        Applied::Applied
    }

    /// Clear a failed summary back to `Idle`.
    pub fn dismiss_summary_error(&mut self) {
        if matches!(self.summary, SummaryState::Failed { .. }) {
            self.summary = SummaryState::Idle;
        }
    }
}
