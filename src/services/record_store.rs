//! Trait for the document store holding scouting records.

use anyhow::Result;

use crate::records::{MatchRecord, PitRecord};

/// Abstraction over the remote document database (e.g., Cloud Firestore).
///
/// Queries are equality-filtered on the team number; the returned
/// collections carry no ordering guarantee.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every match-scouting record for `team`.
    async fn fetch_match_records(&self, team: &str) -> Result<Vec<MatchRecord>>;

    /// Returns every pit-scouting record for `team`.
    async fn fetch_pit_records(&self, team: &str) -> Result<Vec<PitRecord>>;

    /// Merge-writes a pit record under document id `id`.
    async fn save_pit_record(&self, id: &str, record: &PitRecord) -> Result<()>;
}
