//! Myth records - the published unit of Ekmyth

use crate::id::uuid_id;
use crate::{Comment, Confidence, Source, VerdictKind};

uuid_id! {
    /// Unique identifier for a myth record based on UUIDv7
    ///
    /// Ids generated in quick succession stay unique and sort by creation time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ekmyth_domain::MythId;
    ///
    /// let id = MythId::new();
    /// let parsed = MythId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    MythId
}

/// A published myth: the submission, its verdict and community interaction
///
/// Created exactly once by the submission pipeline. Afterwards only the
/// store mutates it, and only its `comments`, `votes` and `bookmarked` fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MythRecord {
    /// Unique identifier
    pub id: MythId,

    /// Headline
    pub title: String,

    /// Category (e.g. "Science", "Health")
    pub category: String,

    /// The disputed statement
    pub myth_claim: String,

    /// The submitter's explanation of what is actually true
    pub fact_reality: String,

    /// Sources supplied by the submitter
    pub user_sources: Vec<Source>,

    /// Submission time (epoch millis)
    pub submitted_at: u64,

    /// Display name of the submitter
    pub author: String,

    /// Verification outcome
    pub verdict: VerdictKind,

    /// Verifier certainty
    pub confidence: Confidence,

    /// Verifier explanation
    pub reasoning: String,

    /// Sources discovered by the verifier
    pub suggested_sources: Vec<Source>,

    /// Discussion, oldest first
    pub comments: Vec<Comment>,

    /// Upvote count
    pub votes: u64,

    /// Saved by the local user
    pub bookmarked: bool,
}

impl MythRecord {
    /// User sources followed by suggested sources
    pub fn all_sources(&self) -> impl Iterator<Item = &Source> {
        self.user_sources.iter().chain(self.suggested_sources.iter())
    }

    /// Case-insensitive match against title or claim
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.title.to_lowercase().contains(&needle)
            || self.myth_claim.to_lowercase().contains(&needle)
    }

    /// Most recent comment, if any
    pub fn latest_comment(&self) -> Option<&Comment> {
        self.comments.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MythRecord {
        MythRecord {
            id: MythId::new(),
            title: "Do Carrots Improve Night Vision?".to_string(),
            category: "Health".to_string(),
            myth_claim: "Eating carrots lets you see in the dark.".to_string(),
            fact_reality: "Vitamin A prevents night blindness but grants nothing extra.".to_string(),
            user_sources: vec![Source::from_raw("https://www.smithsonianmag.com/a")],
            submitted_at: 1_678_886_400_000,
            author: "HistoryBuff".to_string(),
            verdict: VerdictKind::Busted,
            confidence: Confidence::clamped(98),
            reasoning: "WWII propaganda masked radar.".to_string(),
            suggested_sources: vec![Source::from_raw("https://bbc.com/carrots")],
            comments: Vec::new(),
            votes: 124,
            bookmarked: false,
        }
    }

    #[test]
    fn test_all_sources_order() {
        let record = sample();
        let domains: Vec<_> = record.all_sources().map(|s| s.domain()).collect();
        assert_eq!(domains, vec!["smithsonianmag.com", "bbc.com"]);
    }

    #[test]
    fn test_matches_text() {
        let record = sample();
        assert!(record.matches_text("CARROTS"));
        assert!(record.matches_text("see in the dark"));
        assert!(record.matches_text(""));
        assert!(!record.matches_text("great wall"));
    }

    #[test]
    fn test_myth_id_chronological() {
        let id1 = MythId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = MythId::new();

        assert!(id1 < id2, "Earlier UUIDv7 should be less than later UUIDv7");
        assert!(id1.timestamp() <= id2.timestamp());
    }

    #[test]
    fn test_rapid_ids_are_unique() {
        let ids: std::collections::HashSet<_> = (0..1000).map(|_| MythId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
