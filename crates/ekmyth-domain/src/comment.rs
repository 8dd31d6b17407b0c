//! Discussion comments on published myths

use crate::id::uuid_id;
use crate::now_millis;

/// Author recorded when a comment is posted without a name
pub const DEFAULT_COMMENT_AUTHOR: &str = "You";

uuid_id! {
    /// Unique, creation-ordered identifier for a comment
    CommentId
}

/// A comment appended to a myth record
///
/// Comments are never edited or removed once appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Unique identifier
    pub id: CommentId,

    /// Display name of the poster
    pub author: String,

    /// Trimmed, non-empty body
    pub text: String,

    /// Creation time (epoch millis)
    pub timestamp: u64,
}

impl Comment {
    /// Compose a new comment stamped with the current time
    ///
    /// Fails when `text` is empty after trimming. A blank author becomes
    /// [`DEFAULT_COMMENT_AUTHOR`].
    ///
    /// # Examples
    ///
    /// ```
    /// use ekmyth_domain::Comment;
    ///
    /// let comment = Comment::compose("DrVision", "  Optometrist here. Can confirm!  ").unwrap();
    /// assert_eq!(comment.text, "Optometrist here. Can confirm!");
    /// assert!(Comment::compose("DrVision", "   ").is_err());
    /// ```
    pub fn compose(author: &str, text: &str) -> Result<Self, String> {
        let text = text.trim();
        if text.is_empty() {
            return Err("comment text must not be empty".to_string());
        }

        let author = match author.trim() {
            "" => DEFAULT_COMMENT_AUTHOR,
            name => name,
        };

        Ok(Self {
            id: CommentId::new(),
            author: author.to_string(),
            text: text.to_string(),
            timestamp: now_millis(),
        })
    }
}
