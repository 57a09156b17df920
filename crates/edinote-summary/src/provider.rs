//! Provider identity, credentials, and per-provider endpoint settings.

use crate::error::CompletionError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const EDINOTE_PROVIDER_ENV: &str = "EDINOTE_PROVIDER";
pub const EDINOTE_API_KEY_ENV: &str = "EDINOTE_API_KEY";
pub const EDINOTE_LLM_TIMEOUT_SECS_ENV: &str = "EDINOTE_LLM_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_TOKENS: u32 = 600;
const DEFAULT_TEMPERATURE: f32 = 0.2;
const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";

/// The AI vendors a summary can be requested from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    #[default]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    Claude,
    #[serde(rename = "deepseek")]
    DeepSeek,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::Gemini,
        ProviderId::OpenAi,
        ProviderId::Claude,
        ProviderId::DeepSeek,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "gemini",
            ProviderId::OpenAi => "openai",
            ProviderId::Claude => "claude",
            ProviderId::DeepSeek => "deepseek",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "Gemini",
            ProviderId::OpenAi => "OpenAI",
            ProviderId::Claude => "Claude",
            ProviderId::DeepSeek => "DeepSeek",
        }
    }

    /// Environment variables consulted for this provider's key, in order.
    pub fn api_key_envs(&self) -> &'static [&'static str] {
        match self {
            ProviderId::Gemini => &["GEMINI_API_KEY"],
            ProviderId::OpenAi => &["OPENAI_API_KEY"],
            ProviderId::Claude => &["CLAUDE_API_KEY", "ANTHROPIC_API_KEY"],
            ProviderId::DeepSeek => &["DEEPSEEK_API_KEY"],
        }
    }

    pub fn base_url_env(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "GEMINI_BASE_URL",
            ProviderId::OpenAi => "OPENAI_BASE_URL",
            ProviderId::Claude => "CLAUDE_BASE_URL",
            ProviderId::DeepSeek => "DEEPSEEK_BASE_URL",
        }
    }

    pub fn model_env(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "GEMINI_MODEL",
            ProviderId::OpenAi => "OPENAI_MODEL",
            ProviderId::Claude => "CLAUDE_MODEL",
            ProviderId::DeepSeek => "DEEPSEEK_MODEL",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "https://generativelanguage.googleapis.com",
            ProviderId::OpenAi => "https://api.openai.com",
            ProviderId::Claude => "https://api.anthropic.com",
            ProviderId::DeepSeek => "https://api.deepseek.com",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "gemini-2.5-flash",
            ProviderId::OpenAi => "gpt-4o-mini",
            ProviderId::Claude => "claude-3-opus-20240229",
            ProviderId::DeepSeek => "deepseek-chat",
        }
    }

    /// Provider named by `EDINOTE_PROVIDER`, defaulting to Gemini.
    pub fn from_env() -> Result<Self, CompletionError> {
        match std::env::var(EDINOTE_PROVIDER_ENV) {
            Ok(v) if !v.trim().is_empty() => v.parse(),
            _ => Ok(ProviderId::default()),
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = CompletionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderId::Gemini),
            "openai" | "gpt" => Ok(ProviderId::OpenAi),
            "claude" | "anthropic" => Ok(ProviderId::Claude),
            "deepseek" => Ok(ProviderId::DeepSeek),
            other => Err(CompletionError::Config(format!(
                "unknown provider `{other}` (expected gemini|openai|claude|deepseek)"
            ))),
        }
    }
}

/// A provider credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// `None` for blank input.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        (!key.is_empty()).then_some(Self(key))
    }

    /// Key for `provider` from its environment variables, then `EDINOTE_API_KEY`.
    pub fn from_env(provider: ProviderId) -> Option<Self> {
        provider
            .api_key_envs()
            .iter()
            .chain(std::iter::once(&EDINOTE_API_KEY_ENV))
            .find_map(|name| std::env::var(name).ok().and_then(ApiKey::new))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Where and with which model a provider is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub base_url: String,
    pub model: String,
}

impl Endpoint {
    pub fn default_for(provider: ProviderId) -> Self {
        Self {
            base_url: provider.default_base_url().to_string(),
            model: provider.default_model().to_string(),
        }
    }

    pub fn from_env(provider: ProviderId) -> Self {
        let base_url = std::env::var(provider.base_url_env())
            .map(|url| normalize_base_url(&url, provider.default_base_url()))
            .unwrap_or_else(|_| provider.default_base_url().to_string());
        let model = std::env::var(provider.model_env())
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| provider.default_model().to_string());
        Self { base_url, model }
    }
}

/// Request settings shared by every provider call.
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    /// `None` waits forever.
    pub timeout: Option<Duration>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub anthropic_version: String,
    endpoints: HashMap<ProviderId, Endpoint>,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            anthropic_version: DEFAULT_ANTHROPIC_VERSION.to_string(),
            endpoints: ProviderId::ALL
                .iter()
                .map(|p| (*p, Endpoint::default_for(*p)))
                .collect(),
        }
    }
}

impl CompletionSettings {
    /// Defaults overlaid with `*_BASE_URL`, `*_MODEL`, and `EDINOTE_LLM_TIMEOUT_SECS`.
    ///
    /// A timeout of `0` disables the timeout.
    pub fn from_env() -> Result<Self, CompletionError> {
        let timeout = match std::env::var(EDINOTE_LLM_TIMEOUT_SECS_ENV) {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    CompletionError::Config(format!(
                        "{EDINOTE_LLM_TIMEOUT_SECS_ENV} must be a whole number of seconds (got `{raw}`)"
                    ))
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            Err(_) => Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        };

        Ok(Self {
            timeout,
            endpoints: ProviderId::ALL
                .iter()
                .map(|p| (*p, Endpoint::from_env(*p)))
                .collect(),
            ..Self::default()
        })
    }

    pub fn endpoint(&self, provider: ProviderId) -> Endpoint {
        self.endpoints
            .get(&provider)
            .cloned()
            .unwrap_or_else(|| Endpoint::default_for(provider))
    }

    pub fn with_base_url(mut self, provider: ProviderId, base_url: &str) -> Self {
        let model = self.endpoint(provider).model;
        self.endpoints.insert(
            provider,
            Endpoint {
                base_url: normalize_base_url(base_url, provider.default_base_url()),
                model,
            },
        );
        self
    }

    pub fn with_model(mut self, provider: ProviderId, model: &str) -> Self {
        let base_url = self.endpoint(provider).base_url;
        self.endpoints.insert(
            provider,
            Endpoint {
                base_url,
                model: model.trim().to_string(),
            },
        );
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Trim, default, add a scheme when missing, drop trailing slashes.
pub fn normalize_base_url(base_url: &str, default: &str) -> String {
    let mut host = base_url.trim().to_string();
    if host.is_empty() {
        host = default.to_string();
    }
    if !host.starts_with("http://") && !host.starts_with("https://") {
        host = format!("https://{host}");
    }
    host.trim_end_matches('/').to_string()
}
