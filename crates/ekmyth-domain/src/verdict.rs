//! Verification verdicts

use crate::{Confidence, Source};
use std::fmt;

/// Reasoning used whenever the verifier produced nothing usable
pub const FALLBACK_REASONING: &str =
    "AI analysis failed to process the request. Please review manually.";

/// Title given to suggested sources that arrive without one
pub const DEFAULT_SOURCE_TITLE: &str = "External Reference";

/// Categorical outcome of a verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerdictKind {
    /// The proposed reality is accurate and busts the myth
    Verified,
    /// The proposed reality is itself false
    Busted,
    /// Nuanced: parts of the submission hold
    PartiallyTrue,
    /// Not enough information
    Uncertain,
}

impl VerdictKind {
    /// All verdicts in declaration order
    pub const ALL: [VerdictKind; 4] = [
        VerdictKind::Verified,
        VerdictKind::Busted,
        VerdictKind::PartiallyTrue,
        VerdictKind::Uncertain,
    ];

    /// Wire name (`VERIFIED`, `BUSTED`, `PARTIALLY_TRUE`, `UNCERTAIN`)
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictKind::Verified => "VERIFIED",
            VerdictKind::Busted => "BUSTED",
            VerdictKind::PartiallyTrue => "PARTIALLY_TRUE",
            VerdictKind::Uncertain => "UNCERTAIN",
        }
    }

    /// Parse a wire name, tolerating case, surrounding space and `-`/` ` separators
    ///
    /// # Examples
    ///
    /// ```
    /// use ekmyth_domain::VerdictKind;
    ///
    /// assert_eq!(VerdictKind::parse("partially true"), Some(VerdictKind::PartiallyTrue));
    /// assert_eq!(VerdictKind::parse("BOGUS"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();

        Self::ALL.into_iter().find(|kind| kind.as_str() == normalized)
    }

    /// Badge label shown next to a published myth
    pub fn label(&self) -> &'static str {
        match self {
            VerdictKind::Verified => "VERIFIED FACT",
            VerdictKind::Busted => "BUSTED MYTH",
            VerdictKind::PartiallyTrue => "COMPLEX",
            VerdictKind::Uncertain => "UNCERTAIN",
        }
    }
}

impl fmt::Display for VerdictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully validated verification result
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Categorical outcome
    pub kind: VerdictKind,

    /// Certainty in the outcome
    pub confidence: Confidence,

    /// Explanation from the verifier
    pub reasoning: String,

    /// References discovered by the verifier
    pub suggested_sources: Vec<Source>,
}

impl Verdict {
    /// Create a verdict without suggested sources
    pub fn new(kind: VerdictKind, confidence: Confidence, reasoning: impl Into<String>) -> Self {
        Self {
            kind,
            confidence,
            reasoning: reasoning.into(),
            suggested_sources: Vec::new(),
        }
    }

    /// Attach suggested sources
    pub fn with_suggested_sources(mut self, sources: Vec<Source>) -> Self {
        self.suggested_sources = sources;
        self
    }

    /// The verdict used whenever verification fails or returns garbage
    pub fn fallback() -> Self {
        Self::new(VerdictKind::Uncertain, Confidence::MIN, FALLBACK_REASONING)
    }

    /// Whether this is exactly the fallback verdict
    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}
