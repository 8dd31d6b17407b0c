//! Ekmyth Submission Pipeline
//!
//! Moves a user's draft through verification to a published myth record.
//!
//! The pipeline provides:
//! - Draft validation under a configurable [`SubmissionPolicy`]
//! - A guarded state machine so a draft is verified at most once at a time
//! - Fail-open verification: verifier errors become the fallback verdict
//! - Publication with domain-level source deduplication
//!
//! # Examples
//!
//! ```no_run
//! use ekmyth_domain::Draft;
//! use ekmyth_llm::MockProvider;
//! use ekmyth_pipeline::{Submission, SubmissionPolicy};
//! use ekmyth_store::{MemoryBackend, MythStore};
//! use ekmyth_verifier::{LlmVerifier, VerifierConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let verifier = LlmVerifier::new(MockProvider::new("{}"), VerifierConfig::default());
//! let mut store = MythStore::open(MemoryBackend::new());
//!
//! let draft = Draft::new("Bulls hate red", "Red enrages bulls", "Bulls are red-green colorblind");
//! let mut submission = Submission::new(draft, SubmissionPolicy::default());
//! submission.submit_for_verification(&verifier).await?;
//! let id = submission.publish(&mut store)?.into_value();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod submission;
mod validator;

pub use config::{SubmissionPolicy, DEFAULT_AUTHOR};
pub use error::PipelineError;
pub use submission::{Submission, SubmissionState};
pub use validator::{check_draft, validate_draft, DraftField, FieldError};
