//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::MythRecord;
use std::future::Future;

/// A URL reported by a provider's search grounding, before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Citation {
    /// Referenced URL, if the provider supplied one
    pub uri: Option<String>,

    /// Page title, if known
    pub title: Option<String>,
}

impl Citation {
    /// Create a citation with a URL and optional title
    pub fn new(uri: impl Into<String>, title: Option<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            title,
        }
    }
}

/// Text produced by an LLM together with any grounding citations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Generated text
    pub text: String,

    /// Grounding citations (empty when the provider has no search tool)
    pub citations: Vec<Citation>,
}

impl Completion {
    /// Completion with text only
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            citations: Vec::new(),
        }
    }

    /// Attach citations
    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (ekmyth-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for the prompt
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<Completion, Self::Error>> + Send;

    /// Model identifier, for logging
    fn model_name(&self) -> &str;
}

/// Durable key/value blob storage
///
/// Implemented by the infrastructure layer (ekmyth-store)
pub trait KvBackend {
    /// Error type for backend operations
    type Error;

    /// Read the value stored under `key`, if any
    fn load(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Overwrite the value stored under `key`
    fn save(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// Query criteria for reading myth records
#[derive(Debug, Clone, Default)]
pub struct MythQuery {
    /// Exact category; `None` or `"All"` disables the filter
    pub category: Option<String>,

    /// Case-insensitive text matched against title or claim
    pub text: Option<String>,

    /// Only bookmarked records
    pub bookmarked_only: bool,

    /// Maximum results to return
    pub limit: Option<usize>,
}

impl MythQuery {
    /// Whether a record satisfies every filter (the limit is not considered)
    pub fn matches(&self, record: &MythRecord) -> bool {
        let category_ok = match self.category.as_deref() {
            None | Some("All") => true,
            Some(category) => record.category == category,
        };
        let text_ok = self
            .text
            .as_deref()
            .map_or(true, |text| record.matches_text(text));

        category_ok && text_ok && (!self.bookmarked_only || record.bookmarked)
    }
}
