//! Application configuration.
//!
//! Loaded from `~/.ekmyth/config.toml` when present. Every section and field
//! is optional.
//!
//! ```toml
//! log_level = "info"
//!
//! [storage]
//! backend = "sqlite"
//! path = "/var/lib/ekmyth"
//!
//! [llm]
//! provider = "gemini"
//! model = "gemini-2.0-flash-exp"
//!
//! [verifier]
//! timeout_secs = 90
//!
//! [policy]
//! require_sources = true
//! ```

use crate::error::{AppError, Result};
use ekmyth_pipeline::SubmissionPolicy;
use ekmyth_verifier::VerifierConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the Gemini API key by default
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log filter used when `EKMYTH_LOG` is unset
    pub log_level: String,

    /// Where myth records are persisted
    pub storage: StorageConfig,

    /// Which model verifies submissions
    pub llm: LlmConfig,

    /// Verifier limits
    pub verifier: VerifierConfig,

    /// Submission rules
    pub policy: SubmissionPolicy,
}

/// Persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend kind
    pub backend: StorageKind,

    /// Directory for file/SQLite storage (defaults to `~/.ekmyth`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Start a fresh store with the example myths
    pub seed_examples: bool,
}

/// Persistence backend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Nothing survives the process
    Memory,
    /// `<path>/ekmyth_data.json`
    File,
    /// `<path>/ekmyth.db`
    Sqlite,
}

/// LLM provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider kind
    pub provider: ProviderKind,

    /// API endpoint override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Model override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Retry attempts for transient HTTP failures
    pub max_retries: u32,

    /// Canned answer returned by the mock provider
    pub mock_response: String,
}

/// LLM provider kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Deterministic canned responses
    Mock,
    /// Local Ollama server
    Ollama,
    /// Google Gemini with search grounding
    Gemini,
}

impl AppConfig {
    /// Default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default path, falling back to defaults if it is absent.
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            return Err(AppError::Config("log_level must not be blank".into()));
        }
        if self.llm.max_retries == 0 {
            return Err(AppError::Config("llm.max_retries must be greater than 0".into()));
        }
        self.verifier
            .validate()
            .map_err(|e| AppError::Config(format!("verifier: {}", e)))?;
        self.policy
            .validate()
            .map_err(|e| AppError::Config(format!("policy: {}", e)))?;
        Ok(())
    }
}

impl StorageConfig {
    /// Storage directory, defaulting to `~/.ekmyth`.
    pub fn resolved_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => data_dir(),
        }
    }
}

fn data_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AppError::Config("Could not find home directory".into()))?;
    Ok(home.join(".ekmyth"))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            storage: StorageConfig::default(),
            llm: LlmConfig::default(),
            verifier: VerifierConfig::default(),
            policy: SubmissionPolicy::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageKind::File,
            path: None,
            seed_examples: true,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            endpoint: None,
            model: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            max_retries: 2,
            mock_response: r#"{"verdict": "UNCERTAIN", "confidence": 0, "reasoning": "Mock verifier."}"#
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.backend, StorageKind::File);
        assert_eq!(config.llm.provider, ProviderKind::Gemini);
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert!(config.storage.seed_examples);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml(
            r#"
            [storage]
            backend = "memory"

            [llm]
            provider = "ollama"
            model = "llama3"

            [policy]
            require_sources = true
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, StorageKind::Memory);
        assert_eq!(config.llm.provider, ProviderKind::Ollama);
        assert_eq!(config.llm.model.as_deref(), Some("llama3"));
        assert!(config.policy.require_sources);
        assert_eq!(config.verifier, VerifierConfig::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = AppConfig::default();
        config.storage.path = Some(PathBuf::from("/tmp/ekmyth"));
        config.verifier = VerifierConfig::lenient();

        let parsed = AppConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            AppConfig::from_toml("[verifier]\ntimeout_secs = 0"),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_toml("[storage]\nbackend = \"redis\""),
            Err(AppError::Toml(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "log_level = \"debug\"").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_explicit_storage_path() {
        let storage = StorageConfig {
            path: Some(PathBuf::from("/data")),
            ..Default::default()
        };
        assert_eq!(storage.resolved_path().unwrap(), PathBuf::from("/data"));
    }
}
