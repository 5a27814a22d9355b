use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::sync::Mutex;

use crate::records::{MatchRecord, PitRecord, ScoutRecord, parse_records};
use crate::services::record_store::RecordStore;

/// A [`RecordStore`] backed by in-memory record lists.
///
/// Used for offline lookups from exported JSON files and in tests.
#[derive(Default)]
pub struct MemoryStore {
    matches: Vec<MatchRecord>,
    pits: Mutex<Vec<PitRecord>>,
}

impl MemoryStore {
    pub fn new(matches: Vec<MatchRecord>, pits: Vec<PitRecord>) -> Self {
        Self {
            matches,
            pits: Mutex::new(pits),
        }
    }

    /// Loads match and pit records from JSON array files; a missing path
    /// means an empty collection.
    pub fn from_files(matches_path: Option<&str>, pits_path: Option<&str>) -> Result<Self> {
        let load = |path: Option<&str>| -> Result<Vec<ScoutRecord>> {
            match path {
                Some(p) => {
                    let content = std::fs::read_to_string(p)
                        .with_context(|| format!("failed to read records file '{p}'"))?;
                    parse_records(&content)
                        .with_context(|| format!("invalid records file '{p}'"))
                }
                None => Ok(Vec::new()),
            }
        };
        Ok(Self::new(load(matches_path)?, load(pits_path)?))
    }

    /// Snapshot of the stored pit records.
    pub fn pit_records(&self) -> Vec<PitRecord> {
        self.pits.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

fn for_team(records: &[ScoutRecord], team: &str) -> Vec<ScoutRecord> {
    records
        .iter()
        .filter(|r| r.team_number().as_deref() == Some(team))
        .cloned()
        .collect()
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_match_records(&self, team: &str) -> Result<Vec<MatchRecord>> {
        Ok(for_team(&self.matches, team))
    }

    async fn fetch_pit_records(&self, team: &str) -> Result<Vec<PitRecord>> {
        let pits = self.pits.lock().map_err(|_| anyhow!("pit record lock poisoned"))?;
        Ok(for_team(&pits, team))
    }

    async fn save_pit_record(&self, id: &str, record: &PitRecord) -> Result<()> {
        let mut pits = self.pits.lock().map_err(|_| anyhow!("pit record lock poisoned"))?;

        match pits.iter_mut().find(|r| r.id.as_deref() == Some(id)) {
            Some(existing) => {
                for (key, value) in &record.fields {
                    existing.fields.insert(key.clone(), value.clone());
                }
            }
            None => pits.push(record.clone().with_id(id)),
        }

        Ok(())
    }
}
