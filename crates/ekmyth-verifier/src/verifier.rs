//! The verifier adapter

use crate::config::VerifierConfig;
use crate::error::VerifierError;
use crate::parser::parse_payload;
use crate::prompt::PromptBuilder;
use crate::types::{RawVerdict, VerificationRequest};
use ekmyth_domain::traits::LlmProvider;
use std::fmt::Display;
use std::future::Future;
use tokio::time::timeout;
use tracing::{debug, info};

/// External verification of a claim/reality pair
///
/// Returns an untyped payload or fails; callers normalize the payload
/// before trusting any of it.
pub trait Verifier {
    /// Verify one submission
    fn verify(
        &self,
        request: &VerificationRequest,
    ) -> impl Future<Output = Result<RawVerdict, VerifierError>> + Send;
}

/// Verifier backed by an LLM provider
pub struct LlmVerifier<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    config: VerifierConfig,
}

impl<L> LlmVerifier<L>
where
    L: LlmProvider + Send + Sync,
    L::Error: Display + Send,
{
    /// Create a new verifier
    pub fn new(llm_provider: L, config: VerifierConfig) -> Self {
        Self {
            llm_provider,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Underlying provider
    pub fn provider(&self) -> &L {
        &self.llm_provider
    }

    fn check_length(&self, text: &str) -> Result<(), VerifierError> {
        let len = text.chars().count();
        if len > self.config.max_input_length {
            return Err(VerifierError::InputTooLong(len, self.config.max_input_length));
        }
        Ok(())
    }
}

impl<L> Verifier for LlmVerifier<L>
where
    L: LlmProvider + Send + Sync,
    L::Error: Display + Send,
{
    async fn verify(&self, request: &VerificationRequest) -> Result<RawVerdict, VerifierError> {
        self.check_length(&request.claim)?;
        self.check_length(&request.reality)?;

        info!(
            "Verifying claim ({} chars, {} sources) with model '{}'",
            request.claim.len(),
            request.sources.len(),
            self.llm_provider.model_name()
        );

        let prompt = PromptBuilder::new(request.claim.as_str(), request.reality.as_str())
            .with_sources(request.sources.clone())
            .with_max_sources(self.config.max_sources)
            .build();

        debug!("Prompt length: {} chars", prompt.len());

        // Call LLM with timeout
        let completion = timeout(self.config.timeout(), self.llm_provider.generate(&prompt))
            .await
            .map_err(|_| VerifierError::Timeout)?
            .map_err(|e| VerifierError::Llm(e.to_string()))?;

        debug!(
            "LLM response length: {} chars, {} citations",
            completion.text.len(),
            completion.citations.len()
        );

        let payload = parse_payload(&completion.text)?;

        Ok(RawVerdict {
            payload,
            citations: completion.citations,
        })
    }
}
