//! Environment and flag resolution for the CLI.

use anyhow::{Context, Result};
use edinote_dict::{BundledStore, DictionaryResolver, DictionaryStore, FsStore, LoadOutcome};
use edinote_summary::{ApiKey, CompletionSettings, HttpCompletionService, ProviderId};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub const EDINOTE_LOG_ENV: &str = "EDINOTE_LOG";
pub const EDINOTE_DICT_DIR_ENV: &str = "EDINOTE_DICT_DIR";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the stderr log subscriber, filtered by `EDINOTE_LOG`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(EDINOTE_LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// `--dict-dir`, then `EDINOTE_DICT_DIR`, then the bundled tables.
pub fn dictionary_store(flag: Option<PathBuf>) -> Box<dyn DictionaryStore> {
    let dir = flag.or_else(|| {
        std::env::var(EDINOTE_DICT_DIR_ENV)
            .ok()
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
    });
    match dir {
        Some(dir) => Box::new(FsStore::new(dir)),
        None => Box::new(BundledStore),
    }
}

pub async fn load_resolver(dict_dir: Option<PathBuf>) -> DictionaryResolver {
    let store = dictionary_store(dict_dir);
    let resolver = DictionaryResolver::new();
    if let LoadOutcome::Loaded { degraded: true, .. } = resolver.load(store.as_ref()).await {
        tracing::warn!(store = %store.describe(), "continuing with partial dictionaries");
    }
    resolver
}

/// Provider and credential options shared by `summarize` and `ask`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ProviderArgs {
    /// gemini | openai | claude | deepseek (default: $EDINOTE_PROVIDER or gemini)
    #[arg(long)]
    pub provider: Option<String>,

    /// API key (default: provider-specific env var, then $EDINOTE_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Override the provider model
    #[arg(long)]
    pub model: Option<String>,

    /// Override the provider base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds; 0 waits forever
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl ProviderArgs {
    pub fn provider(&self) -> Result<ProviderId> {
        let provider = match &self.provider {
            Some(p) => p.parse()?,
            None => ProviderId::from_env()?,
        };
        Ok(provider)
    }

    /// Flag first, then environment. `None` is reported by the orchestrator.
    pub fn credential(&self, provider: ProviderId) -> Option<ApiKey> {
        self.api_key
            .clone()
            .and_then(ApiKey::new)
            .or_else(|| ApiKey::from_env(provider))
    }

    pub fn service(&self, provider: ProviderId) -> Result<HttpCompletionService> {
        let mut settings =
            CompletionSettings::from_env().context("invalid completion settings in environment")?;
        if let Some(base_url) = &self.base_url {
            settings = settings.with_base_url(provider, base_url);
        }
        if let Some(model) = &self.model {
            settings = settings.with_model(provider, model);
        }
        if let Some(secs) = self.timeout_secs {
            settings =
                settings.with_timeout((secs > 0).then(|| std::time::Duration::from_secs(secs)));
        }
        Ok(HttpCompletionService::new(settings)?)
    }
}
