//! Summary orchestration: one in-flight request per viewer, stale answers dropped.
//!
//! Every call to [`SummaryOrchestrator::begin`] supersedes the previous
//! request: its token is cancelled and its ticket stops being current. A
//! result that arrives for a superseded ticket is still returned to the
//! caller, who checks [`SummaryOrchestrator::is_current`] (or the view's own
//! ticket check) before showing it.

use crate::cancel::CancellationToken;
use crate::client::CompletionService;
use crate::error::CompletionError;
use crate::prompt::{assistant_prompt, code_glossary, summary_prompt, ContextFile};
use crate::provider::{ApiKey, ProviderId};
use edinote_dict::DictionaryResolver;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Shown when the provider answered without text.
pub const NO_SUMMARY: &str = "No summary returned";

/// Identity of an opened document.
pub type DocumentId = Uuid;

/// Handle for one summary request.
#[derive(Debug, Clone)]
pub struct SummaryTicket {
    pub document: DocumentId,
    pub request: u64,
    token: CancellationToken,
}

impl SummaryTicket {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Same document and same request.
    pub fn matches(&self, other: &SummaryTicket) -> bool {
        self.document == other.document && self.request == other.request
    }
}

/// Outcome of a successful request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    Text(String),
    /// The provider answered but said nothing.
    Empty,
}

impl Summary {
    pub fn from_text(text: Option<String>) -> Self {
        match text {
            Some(t) if !t.trim().is_empty() => Summary::Text(t),
            _ => Summary::Empty,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Summary::Text(t) => t,
            Summary::Empty => NO_SUMMARY,
        }
    }
}

pub struct SummaryOrchestrator<C: CompletionService + ?Sized> {
    service: Arc<C>,
    resolver: Arc<DictionaryResolver>,
    next_request: AtomicU64,
    current: Mutex<Option<SummaryTicket>>,
}

impl<C: CompletionService + ?Sized> SummaryOrchestrator<C> {
    pub fn new(service: Arc<C>, resolver: Arc<DictionaryResolver>) -> Self {
        Self {
            service,
            resolver,
            next_request: AtomicU64::new(1),
            current: Mutex::new(None),
        }
    }

    pub fn resolver(&self) -> &Arc<DictionaryResolver> {
        &self.resolver
    }

    /// Start a request for `document`, cancelling whatever was in flight.
    pub fn begin(&self, document: DocumentId) -> SummaryTicket {
        let ticket = SummaryTicket {
            document,
            request: self.next_request.fetch_add(1, Ordering::AcqRel),
            token: CancellationToken::new(),
        };
        if let Some(previous) = self.current.lock().replace(ticket.clone()) {
            debug!(
                document = %previous.document,
                request = previous.request,
                "superseding in-flight summary request"
            );
            previous.token.cancel();
        }
        ticket
    }

    pub fn is_current(&self, ticket: &SummaryTicket) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|current| current.matches(ticket))
    }

    /// Cancel the in-flight request, if any. Used when the document is closed.
    pub fn cancel_current(&self) {
        if let Some(previous) = self.current.lock().take() {
            previous.token.cancel();
        }
    }

    /// Summarize `content` under `ticket`.
    ///
    /// Fails immediately with [`CompletionError::MissingCredential`] when no
    /// key is given, and with [`CompletionError::Cancelled`] when the ticket
    /// is superseded before the provider answers.
    pub async fn summarize(
        &self,
        ticket: &SummaryTicket,
        content: &str,
        provider: ProviderId,
        credential: Option<&ApiKey>,
    ) -> Result<Summary, CompletionError> {
        let credential = credential.ok_or(CompletionError::MissingCredential(provider))?;
        let document = edinote_x12::parse(content);
        let glossary = code_glossary(&document, &self.resolver);
        let prompt = summary_prompt(content, &glossary);
        self.run(ticket, &prompt, provider, credential).await
    }

    /// Answer `question` over the selected context files.
    pub async fn ask(
        &self,
        ticket: &SummaryTicket,
        question: &str,
        files: &[ContextFile],
        provider: ProviderId,
        credential: Option<&ApiKey>,
    ) -> Result<Summary, CompletionError> {
        let credential = credential.ok_or(CompletionError::MissingCredential(provider))?;
        let prompt = assistant_prompt(question, files);
        self.run(ticket, &prompt, provider, credential).await
    }

    async fn run(
        &self,
        ticket: &SummaryTicket,
        prompt: &str,
        provider: ProviderId,
        credential: &ApiKey,
    ) -> Result<Summary, CompletionError> {
        if ticket.is_cancelled() {
            return Err(CompletionError::Cancelled);
        }
        let result = tokio::select! {
            biased;
            _ = ticket.token.cancelled() => Err(CompletionError::Cancelled),
            res = self.service.generate_text(prompt, provider, credential) => res,
        };

        let summary = result.map(|completion| Summary::from_text(completion.text))?;
        if !self.is_current(ticket) {
            debug!(
                document = %ticket.document,
                request = ticket.request,
                "summary arrived for a superseded request"
            );
        }
        Ok(summary)
    }
}
