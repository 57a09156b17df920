//! AI summaries for EDI documents
//!
//! ```text
//!   content ──► prompt ──► CompletionService ──► ProviderResponse ──► Summary
//!                 ▲          (HTTP per vendor)    (one variant per     (Text | Empty)
//!                 │                                vendor, normalized)
//!          code glossary
//!       (DictionaryResolver)
//! ```
//!
//! The [`SummaryOrchestrator`] issues a [`SummaryTicket`] per request so a
//! response for a document the user has already left can be recognized and
//! dropped. Nothing here retries; a failed call is reported once.

pub mod cancel;
pub mod client;
pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod response;

pub use cancel::CancellationToken;
pub use client::{Completion, CompletionService, HttpCompletionService};
pub use error::CompletionError;
pub use orchestrator::{DocumentId, Summary, SummaryOrchestrator, SummaryTicket, NO_SUMMARY};
pub use prompt::{assistant_prompt, code_glossary, summary_prompt, ContextFile};
pub use provider::{ApiKey, CompletionSettings, Endpoint, ProviderId};
pub use response::ProviderResponse;
