//! Example myths for a brand new store

use ekmyth_domain::MythRecord;
use ekmyth_store::snapshot;
use tracing::warn;

const SEED_SNAPSHOT: &str = include_str!("seed.json");

/// The two example myths shown before anyone has published, most recent first
pub fn example_myths() -> Vec<MythRecord> {
    match snapshot::decode(SEED_SNAPSHOT) {
        Ok(mut myths) => {
            myths.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
            myths
        }
        Err(e) => {
            warn!("Bundled example myths could not be decoded: {}", e);
            Vec::new()
        }
    }
}
