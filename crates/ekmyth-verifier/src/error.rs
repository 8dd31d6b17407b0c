//! Error types for the Verifier

use thiserror::Error;

/// Errors that can occur while calling the verifier
///
/// None of these is fatal to a submission: the pipeline replaces any failed
/// verification with the fallback verdict.
#[derive(Error, Debug)]
pub enum VerifierError {
    /// LLM provider error (network, quota, unknown model)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Verification did not finish within the configured timeout
    #[error("Verification timeout")]
    Timeout,

    /// Claim or reality exceeds the configured maximum length
    #[error("Input too long: {0} chars (max: {1})")]
    InputTooLong(usize, usize),

    /// Response could not be read as a JSON payload
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for VerifierError {
    fn from(e: serde_json::Error) -> Self {
        VerifierError::InvalidFormat(format!("JSON parse error: {}", e))
    }
}
