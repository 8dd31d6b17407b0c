//! The submission state machine
//!
//! ```text
//! Drafting ──submit──▶ Verifying ──▶ Reviewed ──publish──▶ Published
//!    ▲                     │             │
//!    └──── dropped ────────┘             │
//!    └──────────── edit ─────────────────┘
//! ```

use crate::validator::validate_draft;
use crate::{PipelineError, SubmissionPolicy};
use ekmyth_domain::{
    dedupe_sources, merge_sources, now_millis, Draft, KvBackend, MythId, MythRecord, Verdict,
};
use ekmyth_store::{Committed, MythStore, StoreError};
use ekmyth_verifier::{normalize_raw, VerificationRequest, Verifier};
use tracing::{debug, info, warn};

/// Where a submission is in its lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    /// Editable, not yet sent for verification
    Drafting,

    /// Waiting on the verifier
    Verifying,

    /// Verified; the user can publish or go back to editing
    Reviewed(Verdict),

    /// Stored under the given id
    Published(MythId),
}

impl SubmissionState {
    /// Short state name for messages
    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Drafting => "drafting",
            SubmissionState::Verifying => "verifying",
            SubmissionState::Reviewed(_) => "reviewed",
            SubmissionState::Published(_) => "published",
        }
    }
}

/// One user's draft on its way to becoming a myth record
#[derive(Debug, Clone)]
pub struct Submission {
    draft: Draft,
    state: SubmissionState,
    policy: SubmissionPolicy,
    author: Option<String>,
}

/// Puts the state back to `Drafting` if verification never finishes
struct VerifyingGuard<'a> {
    state: &'a mut SubmissionState,
}

impl Drop for VerifyingGuard<'_> {
    fn drop(&mut self) {
        if *self.state == SubmissionState::Verifying {
            debug!("Verification abandoned, submission back to drafting");
            *self.state = SubmissionState::Drafting;
        }
    }
}

impl Submission {
    /// Start a submission in the `Drafting` state
    pub fn new(draft: Draft, policy: SubmissionPolicy) -> Self {
        Self {
            draft,
            state: SubmissionState::Drafting,
            policy,
            author: None,
        }
    }

    /// Record a specific author instead of the policy default
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Current draft
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Current state
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Policy in force
    pub fn policy(&self) -> &SubmissionPolicy {
        &self.policy
    }

    /// Verdict awaiting review, if any
    pub fn verdict(&self) -> Option<&Verdict> {
        match &self.state {
            SubmissionState::Reviewed(verdict) => Some(verdict),
            _ => None,
        }
    }

    /// Id of the published record, if any
    pub fn published_id(&self) -> Option<MythId> {
        match self.state {
            SubmissionState::Published(id) => Some(id),
            _ => None,
        }
    }

    /// Check the draft against the policy
    pub fn validate(&self) -> Result<(), PipelineError> {
        validate_draft(&self.draft, &self.policy)
    }

    /// Send the draft to the verifier and hold the resulting verdict
    ///
    /// Verifier failures never surface: they are logged and replaced by
    /// [`Verdict::fallback`]. Only an invalid draft or a submission that is
    /// not `Drafting` is rejected.
    pub async fn submit_for_verification<V: Verifier>(
        &mut self,
        verifier: &V,
    ) -> Result<Verdict, PipelineError> {
        self.require_state("submit for verification", |s| {
            matches!(s, SubmissionState::Drafting)
        })?;
        self.validate()?;

        let request = VerificationRequest::new(
            self.draft.myth_claim.trim(),
            self.draft.fact_reality.trim(),
            self.draft.non_blank_sources(),
        );

        self.state = SubmissionState::Verifying;
        let mut guard = VerifyingGuard {
            state: &mut self.state,
        };

        let verdict = match verifier.verify(&request).await {
            Ok(raw) => normalize_raw(&raw),
            Err(e) => {
                warn!("Verification failed, using fallback verdict: {}", e);
                Verdict::fallback()
            }
        };

        info!(
            "Submission '{}' reviewed: {} at {}",
            self.draft.title.trim(),
            verdict.kind,
            verdict.confidence
        );

        *guard.state = SubmissionState::Reviewed(verdict.clone());
        Ok(verdict)
    }

    /// Change the draft, discarding any reviewed verdict
    pub fn edit<F>(&mut self, change: F) -> Result<(), PipelineError>
    where
        F: FnOnce(&mut Draft),
    {
        self.require_state("edit", |s| {
            matches!(s, SubmissionState::Drafting | SubmissionState::Reviewed(_))
        })?;

        change(&mut self.draft);
        self.state = SubmissionState::Drafting;
        Ok(())
    }

    /// Turn the reviewed draft into a myth record and store it
    ///
    /// User sources and suggested sources are deduplicated together by
    /// domain; user sources win, so the record never lists a domain twice.
    pub fn publish<B>(&mut self, store: &mut MythStore<B>) -> Result<Committed<MythId>, PipelineError>
    where
        B: KvBackend,
        B::Error: Into<StoreError>,
    {
        let verdict = match &self.state {
            SubmissionState::Reviewed(verdict) => verdict.clone(),
            other => {
                return Err(PipelineError::InvalidState {
                    action: "publish",
                    state: other.name(),
                })
            }
        };

        let record = self.build_record(verdict);
        let committed = store.create(record)?;

        info!("Published myth {}", committed.value);
        self.state = SubmissionState::Published(committed.value);
        Ok(committed)
    }

    fn build_record(&self, verdict: Verdict) -> MythRecord {
        let user_sources = dedupe_sources(&self.draft.raw_sources);
        let user_count = user_sources.len();
        let mut combined = merge_sources(user_sources.into_iter().chain(verdict.suggested_sources));
        let suggested_sources = combined.split_off(user_count);

        let category = match self.draft.category.trim() {
            "" => self.policy.default_category.clone(),
            category => category.to_string(),
        };

        let author = self
            .author
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.policy.default_author.trim())
            .to_string();

        MythRecord {
            id: MythId::new(),
            title: self.draft.title.trim().to_string(),
            category,
            myth_claim: self.draft.myth_claim.trim().to_string(),
            fact_reality: self.draft.fact_reality.trim().to_string(),
            user_sources: combined,
            submitted_at: now_millis(),
            author,
            verdict: verdict.kind,
            confidence: verdict.confidence,
            reasoning: verdict.reasoning,
            suggested_sources,
            comments: Vec::new(),
            votes: 0,
            bookmarked: false,
        }
    }

    fn require_state(
        &self,
        action: &'static str,
        allowed: impl Fn(&SubmissionState) -> bool,
    ) -> Result<(), PipelineError> {
        if allowed(&self.state) {
            Ok(())
        } else {
            Err(PipelineError::InvalidState {
                action,
                state: self.state.name(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ekmyth_domain::{Confidence, Source, VerdictKind};
    use ekmyth_llm::MockProvider;
    use ekmyth_store::MemoryBackend;
    use ekmyth_verifier::{LlmVerifier, VerifierConfig};

    fn draft() -> Draft {
        Draft::new(
            "Goldfish have a 3-second memory",
            "Goldfish forget everything after three seconds.",
            "Goldfish can remember things for months.",
        )
    }

    fn verifier(response: &str) -> LlmVerifier<MockProvider> {
        LlmVerifier::new(MockProvider::new(response), VerifierConfig::default())
    }

    fn reviewed(verdict: Verdict) -> Submission {
        let mut submission = Submission::new(draft(), SubmissionPolicy::default());
        submission.state = SubmissionState::Reviewed(verdict);
        submission
    }

    #[tokio::test]
    async fn test_submit_moves_to_reviewed() {
        let mut submission = Submission::new(draft(), SubmissionPolicy::default());
        let verdict = submission
            .submit_for_verification(&verifier(
                r#"{"verdict": "VERIFIED", "confidence": 90, "reasoning": "Studies."}"#,
            ))
            .await
            .unwrap();

        assert_eq!(verdict.kind, VerdictKind::Verified);
        assert_eq!(submission.verdict(), Some(&verdict));
    }

    #[tokio::test]
    async fn test_submit_invalid_draft_stays_drafting() {
        let mut submission =
            Submission::new(Draft::new("", "claim", "reality"), SubmissionPolicy::default());
        let provider = MockProvider::new("{}");
        let verifier = LlmVerifier::new(provider.clone(), VerifierConfig::default());

        let result = submission.submit_for_verification(&verifier).await;
        assert!(matches!(result, Err(PipelineError::Validation(_))));
        assert_eq!(submission.state(), &SubmissionState::Drafting);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_twice_rejected() {
        let mut submission = reviewed(Verdict::fallback());
        let result = submission.submit_for_verification(&verifier("{}")).await;
        assert!(matches!(
            result,
            Err(PipelineError::InvalidState { state: "reviewed", .. })
        ));
    }

    #[test]
    fn test_edit_discards_verdict() {
        let mut submission = reviewed(Verdict::fallback());
        submission.edit(|d| d.title = "New title".to_string()).unwrap();

        assert_eq!(submission.state(), &SubmissionState::Drafting);
        assert_eq!(submission.draft().title, "New title");
        assert!(submission.verdict().is_none());
    }

    #[test]
    fn test_publish_requires_review() {
        let mut store = MythStore::open(MemoryBackend::new());
        let mut submission = Submission::new(draft(), SubmissionPolicy::default());

        let result = submission.publish(&mut store);
        assert!(matches!(
            result,
            Err(PipelineError::InvalidState { action: "publish", state: "drafting" })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_publish_builds_record() {
        let mut store = MythStore::open(MemoryBackend::new());
        let verdict = Verdict::new(VerdictKind::Busted, Confidence::clamped(80), "Nope.")
            .with_suggested_sources(vec![Source::from_raw("https://bbc.com/goldfish")]);
        let mut submission = reviewed(verdict);
        submission.draft.category = "  ".to_string();

        let id = submission.publish(&mut store).unwrap().into_value();
        let record = store.get(id).unwrap();

        assert_eq!(submission.published_id(), Some(id));
        assert_eq!(record.author, "Anonymous User");
        assert_eq!(record.category, "General");
        assert_eq!(record.verdict, VerdictKind::Busted);
        assert_eq!(record.votes, 0);
        assert!(record.comments.is_empty());
        assert!(!record.bookmarked);
        assert_eq!(record.suggested_sources.len(), 1);
    }

    #[test]
    fn test_publish_with_author() {
        let mut store = MythStore::open(MemoryBackend::new());
        let mut submission = reviewed(Verdict::fallback()).with_author(" FishFan ");

        let id = submission.publish(&mut store).unwrap().into_value();
        assert_eq!(store.get(id).unwrap().author, "FishFan");
    }

    #[test]
    fn test_publish_twice_rejected() {
        let mut store = MythStore::open(MemoryBackend::new());
        let mut submission = reviewed(Verdict::fallback());
        submission.publish(&mut store).unwrap().into_value();

        assert!(matches!(
            submission.publish(&mut store),
            Err(PipelineError::InvalidState { state: "published", .. })
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_abandoned_verification_returns_to_drafting() {
        let mut state = SubmissionState::Verifying;
        drop(VerifyingGuard { state: &mut state });
        assert_eq!(state, SubmissionState::Drafting);
    }
}
