//! Ekmyth Domain Layer
//!
//! This crate contains the core data model for Ekmyth, a community platform
//! where users submit a myth claim together with a proposed reality, have it
//! checked by an AI verifier, and publish the result as a myth record.
//!
//! It deliberately stays small: value objects, identifiers and the trait
//! interfaces that the infrastructure crates implement. The only external
//! dependencies are `uuid` (identifiers) and `url` (source domain derivation).
//!
//! ## Key Concepts
//!
//! - **Draft**: transient user input before verification
//! - **Verdict**: categorical outcome plus a 0-100 confidence
//! - **Source**: a reference URL with a derived domain used for deduplication
//! - **MythRecord**: the published unit that accrues comments, votes and bookmarks
//!
//! ## Architecture
//!
//! - Pure data and rules only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod comment;
pub mod confidence;
pub mod draft;
pub mod id;
pub mod myth;
pub mod source;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use comment::{Comment, CommentId};
pub use confidence::{Confidence, ConfidenceBand};
pub use draft::Draft;
pub use myth::{MythId, MythRecord};
pub use source::{dedupe_sources, merge_sources, Source};
pub use traits::{Citation, Completion, KvBackend, LlmProvider, MythQuery};
pub use verdict::{Verdict, VerdictKind};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
