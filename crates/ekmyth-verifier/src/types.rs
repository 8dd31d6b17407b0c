//! Request and response types for verification

use ekmyth_domain::Citation;
use serde_json::Value;

/// What gets sent to the verifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    /// The disputed statement
    pub claim: String,

    /// The proposed correct explanation
    pub reality: String,

    /// User-supplied source URLs, as entered
    pub sources: Vec<String>,
}

impl VerificationRequest {
    /// Create a request
    pub fn new(claim: impl Into<String>, reality: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            claim: claim.into(),
            reality: reality.into(),
            sources,
        }
    }
}

/// Untyped verifier output
///
/// `payload` should be an object with `verdict`, `confidence` and
/// `reasoning`, but nothing about it is guaranteed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawVerdict {
    /// Parsed JSON body of the model's answer
    pub payload: Value,

    /// Sources discovered by search grounding
    pub citations: Vec<Citation>,
}
