//! Ekmyth LLM Provider Layer
//!
//! Pluggable LLM provider implementations for myth verification.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from `ekmyth-domain`.
//! It supports multiple LLM backends with a common interface.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//! - `GeminiProvider`: Google Gemini with search grounding (returns citations)
//!
//! # Examples
//!
//! ```
//! use ekmyth_llm::MockProvider;
//! use ekmyth_domain::traits::LlmProvider;
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").await.unwrap();
//! assert_eq!(result.text, "Hello from LLM!");
//! # });
//! ```

#![warn(missing_docs)]

pub mod gemini;
pub mod ollama;

use ekmyth_domain::traits::{Citation, Completion, LlmProvider};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Map an unsuccessful HTTP status to an error
fn status_error(status: StatusCode, model: &str, body: &str) -> LlmError {
    match status {
        StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(model.to_string()),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        _ => LlmError::Communication(format!("HTTP {}: {}", status, body)),
    }
}

/// Delay before the next attempt after `attempts` failures: 1s, 2s, 4s, ...
fn backoff_delay(attempts: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempts.saturating_sub(1)))
}

/// Send a request built by `build`, retrying with exponential backoff
///
/// `build` runs once per attempt. A missing model fails immediately; every
/// other failure is retried until `max_retries` attempts have been made.
pub(crate) async fn send_with_retry<T, F>(
    provider: &str,
    model: &str,
    max_retries: u32,
    build: F,
) -> Result<T, LlmError>
where
    T: DeserializeOwned,
    F: Fn() -> RequestBuilder,
{
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_retries {
        match build().send().await {
            Ok(response) if response.status().is_success() => {
                return response.json::<T>().await.map_err(|e| {
                    LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                });
            }
            Ok(response) => {
                let status = response.status();
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                let error = status_error(status, model, &body);
                if matches!(error, LlmError::ModelNotAvailable(_)) {
                    return Err(error);
                }
                last_error = Some(error);
            }
            Err(e) => {
                last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
            }
        }

        attempts += 1;
        if attempts < max_retries {
            let delay = backoff_delay(attempts);
            warn!("{} request failed, retrying in {:?}", provider, delay);
            tokio::time::sleep(delay).await;
        }
    }

    Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

#[derive(Debug, Default)]
struct MockState {
    replies: HashMap<String, MockReply>,
    call_count: usize,
    last_prompt: Option<String>,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Clones share their state, so a test can keep a handle after moving the
/// provider into a verifier.
///
/// # Examples
///
/// ```
/// use ekmyth_llm::MockProvider;
/// use ekmyth_domain::traits::LlmProvider;
///
/// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # rt.block_on(async {
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// assert_eq!(provider.generate("prompt1").await.unwrap().text, "response1");
/// assert_eq!(provider.call_count(), 1);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    citations: Vec<Citation>,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_reply: MockReply::Text(response.into()),
            citations: Vec::new(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Create a MockProvider that fails on every prompt
    pub fn failing() -> Self {
        Self {
            default_reply: MockReply::Error,
            ..Self::default()
        }
    }

    /// Attach grounding citations to every successful completion
    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.state()
            .replies
            .insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.state().replies.insert(prompt.into(), MockReply::Error);
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.state().call_count
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.state().call_count = 0;
    }

    /// The most recent prompt received
    pub fn last_prompt(&self) -> Option<String> {
        self.state().last_prompt.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<Completion, Self::Error> {
        let reply = {
            let mut state = self.state();
            state.call_count += 1;
            state.last_prompt = Some(prompt.to_string());
            state
                .replies
                .get(prompt)
                .cloned()
                .unwrap_or_else(|| self.default_reply.clone())
        };

        match reply {
            MockReply::Text(text) => {
                Ok(Completion::text(text).with_citations(self.citations.clone()))
            }
            MockReply::Error => Err(LlmError::Other("Mock error".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
