//! Provider response bodies.
//!
//! Each vendor answers in its own JSON shape. Bodies are decoded into one
//! typed struct per vendor and wrapped in [`ProviderResponse`];
//! [`ProviderResponse::text`] is the only place the vendor fields are read.
//! Missing fields decode as empty rather than failing, so a well-formed but
//! empty answer becomes "no text" instead of an error.

use crate::error::CompletionError;
use crate::provider::ProviderId;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: Option<String>,
}

/// OpenAI-compatible chat completion body (OpenAI and DeepSeek).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaudeResponse {
    #[serde(default)]
    pub content: Vec<ClaudeBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaudeBlock {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A decoded provider body, one variant per vendor.
#[derive(Debug, Clone)]
pub enum ProviderResponse {
    Gemini(GeminiResponse),
    OpenAi(ChatCompletionResponse),
    Claude(ClaudeResponse),
    DeepSeek(ChatCompletionResponse),
}

impl ProviderResponse {
    /// Decode `body` with the shape `provider` answers in.
    pub fn parse(provider: ProviderId, body: &str) -> Result<Self, CompletionError> {
        let invalid =
            |e: serde_json::Error| CompletionError::InvalidResponse(format!("{provider}: {e}"));
        Ok(match provider {
            ProviderId::Gemini => Self::Gemini(serde_json::from_str(body).map_err(invalid)?),
            ProviderId::OpenAi => Self::OpenAi(serde_json::from_str(body).map_err(invalid)?),
            ProviderId::Claude => Self::Claude(serde_json::from_str(body).map_err(invalid)?),
            ProviderId::DeepSeek => Self::DeepSeek(serde_json::from_str(body).map_err(invalid)?),
        })
    }

    pub fn provider(&self) -> ProviderId {
        match self {
            Self::Gemini(_) => ProviderId::Gemini,
            Self::OpenAi(_) => ProviderId::OpenAi,
            Self::Claude(_) => ProviderId::Claude,
            Self::DeepSeek(_) => ProviderId::DeepSeek,
        }
    }

    /// The generated text, trimmed; `None` when the answer carries none.
    pub fn text(&self) -> Option<String> {
        let raw = match self {
            Self::Gemini(r) => r
                .candidates
                .first()
                .and_then(|c| c.content.as_ref())
                .and_then(|c| c.parts.first())
                .and_then(|p| p.text.clone()),
            Self::OpenAi(r) | Self::DeepSeek(r) => r
                .choices
                .first()
                .and_then(|c| c.message.as_ref())
                .and_then(|m| m.content.clone()),
            Self::Claude(r) => r
                .content
                .iter()
                .find(|b| b.kind.as_deref().map_or(true, |k| k == "text"))
                .and_then(|b| b.text.clone()),
        }?;
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}
