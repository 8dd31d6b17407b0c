//! Runtime selection of providers and backends from configuration

use crate::config::{LlmConfig, ProviderKind, StorageConfig, StorageKind};
use crate::error::{AppError, Result};
use ekmyth_domain::{Completion, KvBackend, LlmProvider};
use ekmyth_llm::{gemini, ollama, GeminiProvider, LlmError, MockProvider, OllamaProvider};
use ekmyth_store::{FileBackend, MemoryBackend, SqliteBackend, StoreError};
use std::env;
use tracing::info;

/// SQLite database file name inside the storage directory
pub const SQLITE_FILE: &str = "ekmyth.db";

/// Whichever LLM provider the configuration selected
pub enum AnyProvider {
    /// Canned responses
    Mock(MockProvider),
    /// Local Ollama
    Ollama(OllamaProvider),
    /// Google Gemini
    Gemini(GeminiProvider),
}

impl AnyProvider {
    /// Build the configured provider
    ///
    /// Gemini reads its key from the environment variable named by
    /// `api_key_env`; a missing or blank key is an error.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let provider = match config.provider {
            ProviderKind::Mock => AnyProvider::Mock(MockProvider::new(config.mock_response.clone())),
            ProviderKind::Ollama => {
                let endpoint = config.endpoint.as_deref().unwrap_or(ollama::DEFAULT_ENDPOINT);
                let model = config.model.as_deref().unwrap_or("llama3");
                AnyProvider::Ollama(
                    OllamaProvider::new(endpoint, model).with_max_retries(config.max_retries),
                )
            }
            ProviderKind::Gemini => {
                let api_key = env::var(&config.api_key_env)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
                    .ok_or_else(|| AppError::MissingApiKey(config.api_key_env.clone()))?;
                let model = config.model.as_deref().unwrap_or(gemini::DEFAULT_MODEL);
                let mut provider =
                    GeminiProvider::new(api_key, model).with_max_retries(config.max_retries);
                if let Some(endpoint) = &config.endpoint {
                    provider = provider.with_endpoint(endpoint.clone());
                }
                AnyProvider::Gemini(provider)
            }
        };

        info!("Using LLM provider '{}'", provider.model_name());
        Ok(provider)
    }
}

impl LlmProvider for AnyProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> std::result::Result<Completion, Self::Error> {
        match self {
            AnyProvider::Mock(provider) => provider.generate(prompt).await,
            AnyProvider::Ollama(provider) => provider.generate(prompt).await,
            AnyProvider::Gemini(provider) => provider.generate(prompt).await,
        }
    }

    fn model_name(&self) -> &str {
        match self {
            AnyProvider::Mock(provider) => provider.model_name(),
            AnyProvider::Ollama(provider) => provider.model_name(),
            AnyProvider::Gemini(provider) => provider.model_name(),
        }
    }
}

/// Whichever persistence backend the configuration selected
pub enum AnyBackend {
    /// Volatile
    Memory(MemoryBackend),
    /// JSON file per key
    File(FileBackend),
    /// SQLite table
    Sqlite(SqliteBackend),
}

impl AnyBackend {
    /// Build the configured backend, creating the storage directory if needed
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let backend = match config.backend {
            StorageKind::Memory => AnyBackend::Memory(MemoryBackend::new()),
            StorageKind::File => AnyBackend::File(FileBackend::new(config.resolved_path()?)),
            StorageKind::Sqlite => {
                let dir = config.resolved_path()?;
                std::fs::create_dir_all(&dir)?;
                AnyBackend::Sqlite(SqliteBackend::new(dir.join(SQLITE_FILE))?)
            }
        };
        Ok(backend)
    }
}

impl KvBackend for AnyBackend {
    type Error = StoreError;

    fn load(&self, key: &str) -> std::result::Result<Option<String>, Self::Error> {
        match self {
            AnyBackend::Memory(backend) => backend.load(key),
            AnyBackend::File(backend) => backend.load(key),
            AnyBackend::Sqlite(backend) => backend.load(key),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> std::result::Result<(), Self::Error> {
        match self {
            AnyBackend::Memory(backend) => backend.save(key, value),
            AnyBackend::File(backend) => backend.save(key, value),
            AnyBackend::Sqlite(backend) => backend.save(key, value),
        }
    }
}
