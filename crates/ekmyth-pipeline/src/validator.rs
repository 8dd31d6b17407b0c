//! Draft validation

use crate::{PipelineError, SubmissionPolicy};
use ekmyth_domain::Draft;
use std::fmt;
use thiserror::Error;

/// A required draft field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    /// Headline
    Title,
    /// The disputed statement
    MythClaim,
    /// The proposed reality
    FactReality,
}

impl DraftField {
    /// Field name as shown to users
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::MythClaim => "mythClaim",
            DraftField::FactReality => "factReality",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem with a draft
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Field is empty after trimming
    #[error("{0} is required")]
    Empty(DraftField),

    /// Field exceeds the policy limit
    #[error("{field} is {length} characters, limit is {max}")]
    TooLong {
        /// Offending field
        field: DraftField,
        /// Trimmed length in characters
        length: usize,
        /// Policy limit
        max: usize,
    },

    /// Policy requires a source and none was given
    #[error("at least one source is required")]
    MissingSources,
}

/// Every problem with the draft under the policy, in field order
pub fn check_draft(draft: &Draft, policy: &SubmissionPolicy) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for (field, value) in [
        (DraftField::Title, &draft.title),
        (DraftField::MythClaim, &draft.myth_claim),
        (DraftField::FactReality, &draft.fact_reality),
    ] {
        let value = value.trim();
        if value.is_empty() {
            errors.push(FieldError::Empty(field));
            continue;
        }

        let length = value.chars().count();
        if policy.max_field_length > 0 && length > policy.max_field_length {
            errors.push(FieldError::TooLong {
                field,
                length,
                max: policy.max_field_length,
            });
        }
    }

    if policy.require_sources && draft.non_blank_sources().is_empty() {
        errors.push(FieldError::MissingSources);
    }

    errors
}

/// Reject a draft that cannot be submitted
///
/// # Examples
///
/// ```
/// use ekmyth_domain::Draft;
/// use ekmyth_pipeline::{validate_draft, SubmissionPolicy};
///
/// let draft = Draft::new("Goldfish memory", "Goldfish forget in 3 seconds", "They remember for months");
/// assert!(validate_draft(&draft, &SubmissionPolicy::default()).is_ok());
/// assert!(validate_draft(&draft, &SubmissionPolicy::strict()).is_err());
/// ```
pub fn validate_draft(draft: &Draft, policy: &SubmissionPolicy) -> Result<(), PipelineError> {
    let errors = check_draft(draft, policy);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::Validation(errors))
    }
}
