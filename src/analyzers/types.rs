//! Data types produced by the lookup pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::records::{FieldValue, MatchRecord};

/// Summary metrics for one team, computed from its match records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamAggregate {
    pub generated_at: DateTime<Utc>,
    pub match_count: usize,
    /// Catalog average label to per-match average.
    pub averages: BTreeMap<String, f64>,
    pub total_score: f64,
    /// Catalog flag label to rate in `[0, 1]`.
    pub rates: BTreeMap<String, f64>,
}

impl TeamAggregate {
    pub fn average(&self, label: &str) -> f64 {
        self.averages.get(label).copied().unwrap_or(0.0)
    }

    pub fn rate(&self, label: &str) -> f64 {
        self.rates.get(label).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn flip(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

/// Which column a table is sorted by, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub column: Option<String>,
    pub direction: Option<Direction>,
}

/// Everything shown for a team lookup.
#[derive(Debug, Clone, Serialize)]
pub struct TeamReport {
    pub team: String,
    pub aggregate: TeamAggregate,
    /// Pit-scouting fields merged across all of the team's pit records.
    pub pit: BTreeMap<String, FieldValue>,
    pub matches: Vec<MatchRecord>,
    pub sort: SortState,
}
