//! Submission policy

use ekmyth_domain::draft::DEFAULT_CATEGORY;
use serde::{Deserialize, Serialize};

/// Author recorded on published myths unless a submission names one
pub const DEFAULT_AUTHOR: &str = "Anonymous User";

/// Rules applied to drafts before verification and publication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionPolicy {
    /// Reject drafts without at least one non-blank source
    pub require_sources: bool,

    /// Author recorded when the submission does not name one
    pub default_author: String,

    /// Category recorded when the draft leaves it blank
    pub default_category: String,

    /// Maximum characters for title, claim and reality (0 = unlimited)
    pub max_field_length: usize,
}

impl SubmissionPolicy {
    /// Validate the policy
    pub fn validate(&self) -> Result<(), String> {
        if self.default_author.trim().is_empty() {
            return Err("default_author must not be blank".to_string());
        }
        if self.default_category.trim().is_empty() {
            return Err("default_category must not be blank".to_string());
        }
        Ok(())
    }

    /// Strict preset: sources required, fields capped
    pub fn strict() -> Self {
        Self {
            require_sources: true,
            max_field_length: 2_000,
            ..Self::default()
        }
    }

    /// Permissive preset: sources optional, no length limits
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Load policy from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize policy to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for SubmissionPolicy {
    /// Sources optional; the verifier cross-references on its own
    fn default() -> Self {
        Self {
            require_sources: false,
            default_author: DEFAULT_AUTHOR.to_string(),
            default_category: DEFAULT_CATEGORY.to_string(),
            max_field_length: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = SubmissionPolicy::default();
        assert!(!policy.require_sources);
        assert_eq!(policy.default_author, "Anonymous User");
        assert_eq!(policy.default_category, "General");
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_strict_policy() {
        let policy = SubmissionPolicy::strict();
        assert!(policy.require_sources);
        assert_eq!(policy.max_field_length, 2_000);
        assert_eq!(SubmissionPolicy::permissive(), SubmissionPolicy::default());
    }

    #[test]
    fn test_validate_blank_author() {
        let policy = SubmissionPolicy {
            default_author: "  ".to_string(),
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_toml_partial() {
        let policy = SubmissionPolicy::from_toml("require_sources = true").unwrap();
        assert!(policy.require_sources);
        assert_eq!(policy.default_author, DEFAULT_AUTHOR);

        let roundtrip = SubmissionPolicy::from_toml(&policy.to_toml().unwrap()).unwrap();
        assert_eq!(roundtrip, policy);
    }
}
