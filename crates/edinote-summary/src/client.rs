//! HTTP completion clients.
//!
//! | provider | request                                                   | auth                         |
//! |----------|-----------------------------------------------------------|------------------------------|
//! | Gemini   | `POST {base}/v1/models/{model}:generateContent?key=KEY`   | query parameter              |
//! | OpenAI   | `POST {base}/v1/chat/completions`                         | bearer                       |
//! | Claude   | `POST {base}/v1/messages`                                 | `x-api-key` + version header |
//! | DeepSeek | `POST {base}/v1/chat/completions`                         | bearer                       |

use crate::error::CompletionError;
use crate::provider::{ApiKey, CompletionSettings, Endpoint, ProviderId};
use crate::response::ProviderResponse;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

/// A provider answer, normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub provider: ProviderId,
    pub model: String,
    /// `None` when the provider answered without usable text.
    pub text: Option<String>,
}

/// Something that turns a prompt into text.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn generate_text(
        &self,
        prompt: &str,
        provider: ProviderId,
        credential: &ApiKey,
    ) -> Result<Completion, CompletionError>;
}

/// Calls the vendor HTTP APIs directly with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpCompletionService {
    client: reqwest::Client,
    settings: CompletionSettings,
}

impl HttpCompletionService {
    pub fn new(settings: CompletionSettings) -> Result<Self, CompletionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CompletionError::Config(format!("failed to build http client: {e}")))?;
        Ok(Self { client, settings })
    }

    pub fn from_env() -> Result<Self, CompletionError> {
        Self::new(CompletionSettings::from_env()?)
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    fn request(
        &self,
        provider: ProviderId,
        endpoint: &Endpoint,
        prompt: &str,
        credential: &ApiKey,
    ) -> Result<reqwest::RequestBuilder, CompletionError> {
        let body = request_body(&self.settings, provider, prompt);

        let builder = match provider {
            ProviderId::Gemini => {
                let mut url = parse_url(&format!(
                    "{}/v1/models/{}:generateContent",
                    endpoint.base_url, endpoint.model
                ))?;
                url.query_pairs_mut().append_pair("key", credential.expose());
                self.client.post(url).json(&body)
            }
            ProviderId::OpenAi | ProviderId::DeepSeek => {
                let url = parse_url(&format!("{}/v1/chat/completions", endpoint.base_url))?;
                self.client
                    .post(url)
                    .bearer_auth(credential.expose())
                    .json(&body)
            }
            ProviderId::Claude => {
                let url = parse_url(&format!("{}/v1/messages", endpoint.base_url))?;
                self.client
                    .post(url)
                    .header("x-api-key", credential.expose())
                    .header("anthropic-version", &self.settings.anthropic_version)
                    .json(&body)
            }
        };
        Ok(builder)
    }
}

#[async_trait]
impl CompletionService for HttpCompletionService {
    async fn generate_text(
        &self,
        prompt: &str,
        provider: ProviderId,
        credential: &ApiKey,
    ) -> Result<Completion, CompletionError> {
        let endpoint = self.settings.endpoint(provider);
        debug!(
            provider = %provider,
            model = %endpoint.model,
            prompt_chars = prompt.len(),
            "sending completion request"
        );

        let response = self
            .request(provider, &endpoint, prompt, credential)?
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = CompletionError::http(status.as_u16(), body);
            warn!(provider = %provider, status = status.as_u16(), detail = %err.detail(), "completion request failed");
            if let Some(raw) = err.raw_body() {
                debug!(provider = %provider, body = %raw, "provider error body");
            }
            return Err(err);
        }

        let text = ProviderResponse::parse(provider, &body)?.text();
        if text.is_none() {
            debug!(provider = %provider, "provider answered without text");
        }
        Ok(Completion {
            provider,
            model: endpoint.model,
            text,
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, CompletionError> {
    Url::parse(raw).map_err(|e| CompletionError::Config(format!("invalid provider URL `{raw}`: {e}")))
}

/// Request body sent for `provider`; exposed for diagnostics and tests.
pub fn request_body(settings: &CompletionSettings, provider: ProviderId, prompt: &str) -> Value {
    let endpoint = settings.endpoint(provider);
    match provider {
        ProviderId::Gemini => json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "maxOutputTokens": settings.max_tokens,
                "temperature": settings.temperature,
            },
        }),
        _ => json!({
            "model": endpoint.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": settings.max_tokens,
            "temperature": settings.temperature,
        }),
    }
}
