//! Ekmyth Verifier
//!
//! Sends a myth claim and its proposed reality to an LLM and turns whatever
//! comes back into a well-formed [`Verdict`](ekmyth_domain::Verdict).
//!
//! # Architecture
//!
//! ```text
//! VerificationRequest → PromptBuilder → LlmProvider → parser → RawVerdict → normalizer → Verdict
//! ```
//!
//! The [`Verifier`] trait is the adapter boundary: it returns an untyped
//! [`RawVerdict`] or fails. Only [`normalize`] turns that payload into the
//! typed verdict, so nothing downstream ever sees a malformed result.
//!
//! # Example Usage
//!
//! ```no_run
//! use ekmyth_verifier::{normalize_raw, LlmVerifier, VerificationRequest, Verifier, VerifierConfig};
//! use ekmyth_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"verdict": "BUSTED", "confidence": 95, "reasoning": "..."}"#);
//! let verifier = LlmVerifier::new(llm, VerifierConfig::default());
//!
//! let request = VerificationRequest::new(
//!     "The Great Wall is visible from space",
//!     "It is not visible to the naked eye from orbit",
//!     vec!["https://www.nasa.gov/wall".to_string()],
//! );
//!
//! let raw = verifier.verify(&request).await?;
//! let verdict = normalize_raw(&raw);
//! println!("{} ({})", verdict.kind, verdict.confidence);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod normalizer;
mod parser;
mod prompt;
mod types;
mod verifier;


pub use config::VerifierConfig;
pub use error::VerifierError;
pub use normalizer::{normalize, normalize_raw, normalize_response};
pub use parser::{extract_json, parse_payload};
pub use prompt::PromptBuilder;
pub use types::{RawVerdict, VerificationRequest};
pub use verifier::{LlmVerifier, Verifier};
