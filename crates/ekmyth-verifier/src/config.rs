//! Configuration for the Verifier

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Verifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Maximum time for a single verification call (seconds)
    pub timeout_secs: u64,

    /// Maximum length of the claim or the reality (characters)
    pub max_input_length: usize,

    /// Maximum number of user sources forwarded to the model
    pub max_sources: usize,
}

impl VerifierConfig {
    /// Get the verification timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_input_length == 0 {
            return Err("max_input_length must be greater than 0".to_string());
        }
        if self.max_sources == 0 {
            return Err("max_sources must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Aggressive preset: short timeout, tight input limits
    pub fn aggressive() -> Self {
        Self {
            timeout_secs: 20,
            max_input_length: 2_000,
            max_sources: 5,
        }
    }

    /// Lenient preset: long timeout for slow search-grounded models
    pub fn lenient() -> Self {
        Self {
            timeout_secs: 180,
            max_input_length: 20_000,
            max_sources: 50,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for VerifierConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            max_input_length: 5_000,
            max_sources: 20,
        }
    }
}
