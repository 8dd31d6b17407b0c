//! Snapshot encoding
//!
//! The whole collection is persisted as one JSON array. Field names follow
//! the layout the web client has always written, so older snapshots keep
//! loading: `userSources` may be plain URL strings, `bookmarked` may be
//! missing, and the retired `isVerified` flag is ignored.
//!
//! Decoding never trusts stored values. Verdicts and confidences go through
//! the same rules as fresh verifier output and domains are derived again
//! from each URL. Older clients wrote model output unchecked, so a field may
//! be `null` or of the wrong type; such a field falls back to its default
//! instead of failing the record, and one bad record never fails the rest.

use crate::error::StoreError;
use ekmyth_domain::comment::DEFAULT_COMMENT_AUTHOR;
use ekmyth_domain::draft::DEFAULT_CATEGORY;
use ekmyth_domain::verdict::FALLBACK_REASONING;
use ekmyth_domain::{
    Comment, CommentId, Confidence, MythId, MythRecord, Source, VerdictKind,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

/// Author written for records that predate the author field
const LEGACY_AUTHOR: &str = "Anonymous User";

/// Legacy numeric ids are epoch millis; they fit the 48-bit UUIDv7 timestamp
const LEGACY_TIMESTAMP_LIMIT: u64 = 1 << 48;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMyth {
    #[serde(default, deserialize_with = "lenient_text")]
    id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    category: String,
    #[serde(default, deserialize_with = "lenient_text")]
    myth_claim: String,
    #[serde(default, deserialize_with = "lenient_text")]
    fact_reality: String,
    #[serde(default, deserialize_with = "lenient_list")]
    user_sources: Vec<StoredSource>,
    #[serde(default, deserialize_with = "lenient_u64")]
    submitted_at: u64,
    #[serde(default, deserialize_with = "lenient_text")]
    author: String,
    #[serde(default, deserialize_with = "lenient_text")]
    ai_verdict: String,
    #[serde(default)]
    ai_confidence_score: Value,
    #[serde(default, deserialize_with = "lenient_text")]
    ai_reasoning: String,
    #[serde(default, deserialize_with = "lenient_list")]
    ai_suggested_sources: Vec<StoredSource>,
    #[serde(default, deserialize_with = "lenient_list")]
    comments: Vec<StoredComment>,
    #[serde(default, deserialize_with = "lenient_u64")]
    upvotes: u64,
    #[serde(default, deserialize_with = "lenient_bool")]
    bookmarked: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredSource {
    Bare(String),
    Full {
        url: String,
        #[serde(
            default,
            deserialize_with = "lenient_title",
            skip_serializing_if = "Option::is_none"
        )]
        title: Option<String>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredComment {
    #[serde(default, deserialize_with = "lenient_text")]
    id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    author: String,
    #[serde(default, deserialize_with = "lenient_text")]
    text: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    timestamp: u64,
}

/// Strings pass through, numbers are spelled out, anything else is empty
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}

fn lenient_title<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(title) => Some(title),
        _ => None,
    })
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|value| value.is_finite() && *value >= 0.0)
                    .map(|value| value as u64)
            })
            .unwrap_or(0),
        Value::String(text) => text.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// Keeps the readable entries of a list; a non-list is an empty list
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable snapshot entry: {}", e);
                None
            }
        })
        .collect())
}

/// Encode the collection, most recent first
pub fn encode(records: &[MythRecord]) -> Result<String, StoreError> {
    let stored: Vec<StoredMyth> = records.iter().map(StoredMyth::from_record).collect();
    Ok(serde_json::to_string(&stored)?)
}

/// Decode a snapshot into normalized records
///
/// Only a snapshot that is not a JSON array fails. Entries that are not
/// objects are skipped, records whose id repeats an earlier one are dropped,
/// and comments with blank text are dropped.
pub fn decode(snapshot: &str) -> Result<Vec<MythRecord>, StoreError> {
    let entries: Vec<Value> = serde_json::from_str(snapshot)?;

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            warn!("Skipping snapshot entry {}: not a myth record", position);
            continue;
        }

        let stored: StoredMyth = match serde_json::from_value(entry) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Skipping snapshot entry {}: {}", position, e);
                continue;
            }
        };

        let record = stored.into_record();
        if seen.insert(record.id) {
            records.push(record);
        } else {
            warn!("Dropping duplicate myth {} from snapshot", record.id);
        }
    }

    Ok(records)
}

impl StoredMyth {
    fn from_record(record: &MythRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title.clone(),
            category: record.category.clone(),
            myth_claim: record.myth_claim.clone(),
            fact_reality: record.fact_reality.clone(),
            user_sources: record.user_sources.iter().map(StoredSource::from_source).collect(),
            submitted_at: record.submitted_at,
            author: record.author.clone(),
            ai_verdict: record.verdict.as_str().to_string(),
            ai_confidence_score: Value::from(record.confidence.value()),
            ai_reasoning: record.reasoning.clone(),
            ai_suggested_sources: record
                .suggested_sources
                .iter()
                .map(StoredSource::from_source)
                .collect(),
            comments: record.comments.iter().map(StoredComment::from_comment).collect(),
            upvotes: record.votes,
            bookmarked: record.bookmarked,
        }
    }

    fn into_record(self) -> MythRecord {
        let id = decode_id(&self.id)
            .map(MythId::from_value)
            .unwrap_or_else(|| {
                warn!("Snapshot myth id '{}' is not usable, assigning a new one", self.id);
                MythId::new()
            });

        let verdict = VerdictKind::parse(&self.ai_verdict).unwrap_or(VerdictKind::Uncertain);

        let reasoning = match self.ai_reasoning.trim() {
            "" => FALLBACK_REASONING.to_string(),
            text => text.to_string(),
        };
        let category = if self.category.trim().is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            self.category
        };
        let author = if self.author.trim().is_empty() {
            LEGACY_AUTHOR.to_string()
        } else {
            self.author
        };

        MythRecord {
            id,
            title: self.title,
            category,
            myth_claim: self.myth_claim,
            fact_reality: self.fact_reality,
            user_sources: into_sources(self.user_sources),
            submitted_at: self.submitted_at,
            author,
            verdict,
            confidence: decode_confidence(&self.ai_confidence_score),
            reasoning,
            suggested_sources: into_sources(self.ai_suggested_sources),
            comments: self
                .comments
                .into_iter()
                .enumerate()
                .filter_map(|(position, comment)| comment.into_comment(position))
                .collect(),
            votes: self.upvotes,
            bookmarked: self.bookmarked,
        }
    }
}

impl StoredSource {
    fn from_source(source: &Source) -> Self {
        Self::Full {
            url: source.url().to_string(),
            title: source.title().map(str::to_string),
        }
    }

    fn into_source(self) -> Option<Source> {
        let (url, title) = match self {
            StoredSource::Bare(url) => (url, None),
            StoredSource::Full { url, title } => (url, title),
        };
        if url.trim().is_empty() {
            return None;
        }
        Some(Source::with_title(url, title))
    }
}

fn into_sources(stored: Vec<StoredSource>) -> Vec<Source> {
    stored.into_iter().filter_map(StoredSource::into_source).collect()
}

impl StoredComment {
    fn from_comment(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            author: comment.author.clone(),
            text: comment.text.clone(),
            timestamp: comment.timestamp,
        }
    }

    fn into_comment(self, position: usize) -> Option<Comment> {
        let text = self.text.trim();
        if text.is_empty() {
            return None;
        }

        let author = match self.author.trim() {
            "" => DEFAULT_COMMENT_AUTHOR,
            name => name,
        };

        Some(Comment {
            id: CommentId::from_value(
                decode_id(&self.id)
                    .unwrap_or_else(|| legacy_comment_id(self.timestamp, position)),
            ),
            author: author.to_string(),
            text: text.to_string(),
            timestamp: self.timestamp,
        })
    }
}

/// Resolve a stored id to its 128-bit value
///
/// UUIDs are taken as-is. Legacy numeric ids (epoch millis) are placed in the
/// timestamp bits so they keep their relative order and stay stable across
/// loads.
fn decode_id(raw: &str) -> Option<u128> {
    let raw = raw.trim();
    if let Ok(id) = MythId::from_string(raw) {
        return Some(id.value());
    }

    raw.parse::<u64>()
        .ok()
        .filter(|millis| *millis < LEGACY_TIMESTAMP_LIMIT)
        .map(|millis| u128::from(millis) << 80)
}

/// Id for a comment whose stored id is not usable
///
/// Built from the comment's own timestamp plus its position, so it is the
/// same on every load and sorts with the comment's creation time.
fn legacy_comment_id(timestamp: u64, position: usize) -> u128 {
    let millis = timestamp.min(LEGACY_TIMESTAMP_LIMIT - 1);
    (u128::from(millis) << 80) | (position as u128 + 1)
}

fn decode_confidence(value: &Value) -> Confidence {
    match value {
        Value::Number(number) => number
            .as_f64()
            .map(Confidence::from_f64)
            .unwrap_or(Confidence::MIN),
        Value::String(text) => Confidence::parse_lenient(text),
        _ => Confidence::MIN,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::*;
    use proptest::sample::{select, Index};

    fn text() -> impl Strategy<Value = String> {
        "[A-Za-z0-9]{1,10}( [A-Za-z0-9]{1,10}){0,3}"
    }

    fn source() -> impl Strategy<Value = Source> {
        ("[a-z]{1,8}", "[a-z0-9/]{0,12}", proptest::option::of(text())).prop_map(
            |(host, path, title)| Source::with_title(format!("https://{}.org/{}", host, path), title),
        )
    }

    fn comment() -> impl Strategy<Value = Comment> {
        (any::<u128>(), text(), text(), 0..LEGACY_TIMESTAMP_LIMIT).prop_map(
            |(id, author, text, timestamp)| Comment {
                id: CommentId::from_value(id),
                author,
                text,
                timestamp,
            },
        )
    }

    fn myth() -> impl Strategy<Value = MythRecord> {
        (
            (any::<u128>(), text(), text(), text(), text(), text()),
            (vec(source(), 0..4), vec(source(), 0..4), vec(comment(), 0..4)),
            (
                select(VerdictKind::ALL.to_vec()),
                0i64..=100,
                text(),
                any::<u64>(),
                any::<u64>(),
                any::<bool>(),
            ),
        )
            .prop_map(
                |(
                    (id, title, category, myth_claim, fact_reality, author),
                    (user_sources, suggested_sources, comments),
                    (verdict, confidence, reasoning, submitted_at, votes, bookmarked),
                )| MythRecord {
                    id: MythId::from_value(id),
                    title,
                    category,
                    myth_claim,
                    fact_reality,
                    user_sources,
                    submitted_at,
                    author,
                    verdict,
                    confidence: Confidence::clamped(confidence),
                    reasoning,
                    suggested_sources,
                    comments,
                    votes,
                    bookmarked,
                },
            )
    }

    proptest! {
        /// Property: encoding then decoding preserves ids and every field
        #[test]
        fn test_roundtrip_any_collection(records in vec(myth(), 0..5)) {
            let decoded = decode(&encode(&records).unwrap()).unwrap();
            prop_assert_eq!(decoded, records);
        }

        /// Property: a null field never costs the collection a record
        #[test]
        fn test_null_field_keeps_every_record(
            records in vec(myth(), 1..4),
            field in select(vec![
                "title", "category", "author", "aiVerdict", "aiConfidenceScore",
                "aiReasoning", "userSources", "comments", "upvotes", "bookmarked",
                "submittedAt",
            ]),
            target in any::<Index>(),
        ) {
            let mut json: Value = serde_json::from_str(&encode(&records).unwrap()).unwrap();
            let target = target.index(records.len());
            json[target][field] = Value::Null;

            let decoded = decode(&json.to_string()).unwrap();
            prop_assert_eq!(decoded.len(), records.len());
            prop_assert_eq!(decoded[target].id, records[target].id);
        }
    }
}
