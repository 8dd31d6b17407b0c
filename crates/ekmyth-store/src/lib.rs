//! Ekmyth Storage Layer
//!
//! Holds the canonical collection of published myth records and persists it
//! through a [`KvBackend`].
//!
//! # Architecture
//!
//! - The store owns every record in memory, most recent first
//! - Each successful mutation writes the whole collection as one JSON
//!   snapshot under [`SNAPSHOT_KEY`]
//! - A failed write is logged and reported alongside the result but never
//!   undoes the in-memory change
//!
//! # Examples
//!
//! ```
//! use ekmyth_store::{MemoryBackend, MythStore};
//!
//! let store = MythStore::open(MemoryBackend::new());
//! assert!(store.is_empty());
//! ```

#![warn(missing_docs)]

mod backend;
mod error;
pub mod snapshot;
mod sqlite;

pub use backend::{FileBackend, MemoryBackend};
pub use error::StoreError;
pub use sqlite::SqliteBackend;

use ekmyth_domain::{Comment, KvBackend, MythId, MythQuery, MythRecord};
use tracing::{debug, info, warn};

/// Key under which the collection snapshot is stored
pub const SNAPSHOT_KEY: &str = "ekmyth_data";

/// Outcome of a mutation that succeeded in memory
///
/// `persist_error` is set when the snapshot could not be written; the
/// in-memory change stands regardless.
#[derive(Debug)]
#[must_use]
pub struct Committed<T> {
    /// Result of the mutation
    pub value: T,

    /// Why the snapshot write failed, if it did
    pub persist_error: Option<StoreError>,
}

impl<T> Committed<T> {
    /// Whether the change reached the backend
    pub fn is_durable(&self) -> bool {
        self.persist_error.is_none()
    }

    /// Drop any persistence failure and keep the value
    pub fn into_value(self) -> T {
        self.value
    }

    /// Treat a persistence failure as an error
    pub fn into_result(self) -> Result<T, StoreError> {
        match self.persist_error {
            Some(e) => Err(e),
            None => Ok(self.value),
        }
    }
}

/// The canonical myth collection
pub struct MythStore<B: KvBackend> {
    backend: B,
    myths: Vec<MythRecord>,
}

impl<B> MythStore<B>
where
    B: KvBackend,
    B::Error: Into<StoreError>,
{
    /// Load the snapshot once and build the store
    ///
    /// A missing, unreadable or malformed snapshot gives an empty store.
    /// Unusable records inside an otherwise readable snapshot are skipped
    /// on their own.
    pub fn open(backend: B) -> Self {
        Self::open_with_seed(backend, Vec::new())
    }

    /// Like [`open`](Self::open), but start from `seed` when the backend has
    /// never stored a snapshot
    ///
    /// The seed is not written until the first mutation.
    pub fn open_with_seed(backend: B, seed: Vec<MythRecord>) -> Self {
        let myths = match backend.load(SNAPSHOT_KEY) {
            Ok(Some(text)) => match snapshot::decode(&text) {
                Ok(myths) => myths,
                Err(e) => {
                    warn!("Ignoring malformed snapshot: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => {
                if !seed.is_empty() {
                    info!("No snapshot found, seeding {} records", seed.len());
                }
                seed
            }
            Err(e) => {
                let e: StoreError = e.into();
                warn!("Could not read snapshot, starting empty: {}", e);
                Vec::new()
            }
        };

        info!("Opened myth store with {} records", myths.len());
        Self { backend, myths }
    }

    /// Insert a newly published record at the front
    pub fn create(&mut self, record: MythRecord) -> Result<Committed<MythId>, StoreError> {
        if self.myths.iter().any(|m| m.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }

        let id = record.id;
        info!("Creating myth {} ({})", id, record.title);
        self.myths.insert(0, record);

        Ok(self.commit(id))
    }

    /// Append a comment; a blank author is recorded as "You"
    pub fn add_comment(
        &mut self,
        id: MythId,
        author: &str,
        text: &str,
    ) -> Result<Committed<Comment>, StoreError> {
        let myth = self.find_mut(id)?;
        let comment = Comment::compose(author, text).map_err(StoreError::Validation)?;
        myth.comments.push(comment.clone());

        debug!("Added comment {} to myth {}", comment.id, id);
        Ok(self.commit(comment))
    }

    /// Add one vote and return the new count
    pub fn increment_vote(&mut self, id: MythId) -> Result<Committed<u64>, StoreError> {
        let myth = self.find_mut(id)?;
        myth.votes = myth.votes.saturating_add(1);
        let votes = myth.votes;

        debug!("Myth {} now has {} votes", id, votes);
        Ok(self.commit(votes))
    }

    /// Flip the bookmark flag and return the new state
    pub fn toggle_bookmark(&mut self, id: MythId) -> Result<Committed<bool>, StoreError> {
        let myth = self.find_mut(id)?;
        myth.bookmarked = !myth.bookmarked;
        let bookmarked = myth.bookmarked;

        debug!("Myth {} bookmarked: {}", id, bookmarked);
        Ok(self.commit(bookmarked))
    }

    /// Look up one record
    pub fn get(&self, id: MythId) -> Option<&MythRecord> {
        self.myths.iter().find(|m| m.id == id)
    }

    /// Every record, most recent first
    pub fn list(&self) -> &[MythRecord] {
        &self.myths
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.myths.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.myths.is_empty()
    }

    /// Records matching the query, most recent first
    pub fn query(&self, query: &MythQuery) -> Vec<&MythRecord> {
        let matching = self.myths.iter().filter(|m| query.matches(m));
        match query.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for myth in &self.myths {
            if !categories.contains(&myth.category.as_str()) {
                categories.push(&myth.category);
            }
        }
        categories
    }

    /// Bookmarked records, most recent first
    pub fn bookmarked(&self) -> Vec<&MythRecord> {
        self.myths.iter().filter(|m| m.bookmarked).collect()
    }

    /// Write the current snapshot now
    pub fn flush(&mut self) -> Result<(), StoreError> {
        let encoded = snapshot::encode(&self.myths)?;
        self.backend.save(SNAPSHOT_KEY, &encoded).map_err(Into::into)
    }

    /// Underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn find_mut(&mut self, id: MythId) -> Result<&mut MythRecord, StoreError> {
        self.myths
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn commit<T>(&mut self, value: T) -> Committed<T> {
        let persist_error = self.flush().err();
        if let Some(e) = &persist_error {
            warn!("Snapshot write failed, change kept in memory only: {}", e);
        }
        Committed {
            value,
            persist_error,
        }
    }
}
