//! Ekmyth Application Context
//!
//! Wires configuration, logging, storage and verification into one explicit
//! context object that a presentation layer holds and passes around.
//!
//! # Example Usage
//!
//! ```no_run
//! use ekmyth_app::{init_tracing, AppConfig};
//! use ekmyth_domain::Draft;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! init_tracing(&config.log_level);
//!
//! let mut app = ekmyth_app::open(&config)?;
//! let mut submission = app.begin_submission(Draft::new(
//!     "Lightning never strikes twice",
//!     "Lightning never hits the same place twice.",
//!     "Tall structures are struck many times a year.",
//! ));
//! app.verify(&mut submission).await?;
//! let id = app.publish(&mut submission)?.into_value();
//! app.increment_vote(id)?.into_value();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
mod seed;
pub mod wiring;

pub use config::{AppConfig, LlmConfig, ProviderKind, StorageConfig, StorageKind};
pub use error::{AppError, Result};
pub use logging::init_tracing;
pub use seed::example_myths;
pub use wiring::{AnyBackend, AnyProvider};

use ekmyth_domain::{Comment, Draft, KvBackend, MythId, MythQuery, MythRecord, Verdict};
use ekmyth_pipeline::{PipelineError, Submission, SubmissionPolicy};
use ekmyth_store::{Committed, MythStore, StoreError};
use ekmyth_verifier::{LlmVerifier, Verifier};
use std::future::Future;
use tracing::info;

/// The context built from an [`AppConfig`]
pub type ConfiguredEkmyth = Ekmyth<AnyBackend, LlmVerifier<AnyProvider>>;

/// Everything a session needs: the record store, the verifier and the policy
pub struct Ekmyth<B: KvBackend, V> {
    store: MythStore<B>,
    verifier: V,
    policy: SubmissionPolicy,
}

/// Build the context described by `config`
pub fn open(config: &AppConfig) -> Result<ConfiguredEkmyth> {
    config.validate()?;

    let backend = AnyBackend::from_config(&config.storage)?;
    let seed = if config.storage.seed_examples {
        example_myths()
    } else {
        Vec::new()
    };
    let store = MythStore::open_with_seed(backend, seed);

    let provider = AnyProvider::from_config(&config.llm)?;
    let verifier = LlmVerifier::new(provider, config.verifier.clone());

    info!(
        "Ekmyth ready: {:?} storage, {} records",
        config.storage.backend,
        store.len()
    );
    Ok(Ekmyth::new(store, verifier, config.policy.clone()))
}

impl<B, V> Ekmyth<B, V>
where
    B: KvBackend,
    B::Error: Into<StoreError>,
    V: Verifier,
{
    /// Assemble a context from parts
    pub fn new(store: MythStore<B>, verifier: V, policy: SubmissionPolicy) -> Self {
        Self {
            store,
            verifier,
            policy,
        }
    }

    /// Start a submission under this context's policy
    pub fn begin_submission(&self, draft: Draft) -> Submission {
        Submission::new(draft, self.policy.clone())
    }

    /// Verify a submission with this context's verifier
    pub fn verify<'a>(
        &'a self,
        submission: &'a mut Submission,
    ) -> impl Future<Output = std::result::Result<Verdict, PipelineError>> + 'a {
        submission.submit_for_verification(&self.verifier)
    }

    /// Publish a reviewed submission into the store
    pub fn publish(
        &mut self,
        submission: &mut Submission,
    ) -> std::result::Result<Committed<MythId>, PipelineError> {
        submission.publish(&mut self.store)
    }

    /// Validate, verify and publish a draft in one go
    pub async fn submit(&mut self, draft: Draft) -> std::result::Result<Committed<MythId>, PipelineError> {
        let mut submission = self.begin_submission(draft);
        submission.submit_for_verification(&self.verifier).await?;
        submission.publish(&mut self.store)
    }

    /// Append a comment to a myth
    pub fn add_comment(
        &mut self,
        id: MythId,
        author: &str,
        text: &str,
    ) -> std::result::Result<Committed<Comment>, StoreError> {
        self.store.add_comment(id, author, text)
    }

    /// Upvote a myth
    pub fn increment_vote(&mut self, id: MythId) -> std::result::Result<Committed<u64>, StoreError> {
        self.store.increment_vote(id)
    }

    /// Flip a myth's bookmark
    pub fn toggle_bookmark(&mut self, id: MythId) -> std::result::Result<Committed<bool>, StoreError> {
        self.store.toggle_bookmark(id)
    }

    /// Look up one myth
    pub fn get(&self, id: MythId) -> Option<&MythRecord> {
        self.store.get(id)
    }

    /// Every myth, most recent first
    pub fn list(&self) -> &[MythRecord] {
        self.store.list()
    }

    /// Filtered myths
    pub fn query(&self, query: &MythQuery) -> Vec<&MythRecord> {
        self.store.query(query)
    }

    /// Categories in use
    pub fn categories(&self) -> Vec<&str> {
        self.store.categories()
    }

    /// Saved myths
    pub fn bookmarked(&self) -> Vec<&MythRecord> {
        self.store.bookmarked()
    }

    /// The record store
    pub fn store(&self) -> &MythStore<B> {
        &self.store
    }

    /// The verifier
    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// The submission policy
    pub fn policy(&self) -> &SubmissionPolicy {
        &self.policy
    }
}
