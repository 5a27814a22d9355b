//! The set of metrics a team lookup reports on, with their score weights.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A numeric per-match count that gets averaged and weighted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    /// Field name on the match record, e.g. `autoHighCubeCount`.
    pub key: String,
    /// Name of the derived average, e.g. `Avg_Cubes_Auto_H`.
    pub label: String,
    #[serde(default = "default_weight")]
    pub weight: i64,
}

/// A boolean per-match event whose rate gets reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagSpec {
    pub key: String,
    pub label: String,
}

fn default_weight() -> i64 {
    1
}

/// Metrics and flags known to the aggregator.
///
/// Stored on disk as JSON:
/// ```json
/// {
///   "metrics": [
///     { "key": "autoHighCubeCount", "label": "Avg_Cubes_Auto_H", "weight": 6 }
///   ],
///   "flags": [
///     { "key": "docked", "label": "docked_rate" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCatalog {
    pub metrics: Vec<MetricSpec>,
    #[serde(default)]
    pub flags: Vec<FlagSpec>,
}

/// Scoring-grid counts tracked by the match form, as `(key, label)`.
static DEFAULT_METRICS: &[(&str, &str)] = &[
    ("autoHighCubeCount", "Avg_Cubes_Auto_H"),
    ("autoMidCubeCount", "Avg_Cubes_Auto_M"),
    ("autoLowCubeCount", "Avg_Cubes_Auto_L"),
    ("autoHighConeCount", "Avg_Cones_Auto_H"),
    ("autoMidConeCount", "Avg_Cones_Auto_M"),
    ("autoLowConeCount", "Avg_Cones_Auto_L"),
    ("teleHighCubeCount", "Avg_Cubes_Tele_H"),
    ("teleMidCubeCount", "Avg_Cubes_Tele_M"),
    ("teleLowCubeCount", "Avg_Cubes_Tele_L"),
    ("teleHighConeCount", "Avg_Cones_Tele_H"),
    ("teleMidConeCount", "Avg_Cones_Tele_M"),
    ("teleLowConeCount", "Avg_Cones_Tele_L"),
];

static DEFAULT_FLAGS: &[(&str, &str)] = &[("docked", "docked_rate"), ("engage", "engaged_rate")];

impl Default for MetricCatalog {
    /// Every scoring-grid count weighted `1`.
    fn default() -> Self {
        Self {
            metrics: DEFAULT_METRICS
                .iter()
                .map(|(key, label)| MetricSpec {
                    key: key.to_string(),
                    label: label.to_string(),
                    weight: default_weight(),
                })
                .collect(),
            flags: DEFAULT_FLAGS
                .iter()
                .map(|(key, label)| FlagSpec {
                    key: key.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        }
    }
}

impl MetricCatalog {
    /// Loads a catalog from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read metric catalog '{path}'"))?;
        let catalog: MetricCatalog = serde_json::from_str(&content)
            .with_context(|| format!("invalid metric catalog '{path}'"))?;
        catalog
            .validate()
            .with_context(|| format!("invalid metric catalog '{path}'"))?;
        Ok(catalog)
    }

    /// Rejects catalogs where a metric or flag key, or a label, appears twice.
    pub fn validate(&self) -> Result<()> {
        ensure_unique("metric key", self.metrics.iter().map(|m| m.key.as_str()))?;
        ensure_unique("metric label", self.metrics.iter().map(|m| m.label.as_str()))?;
        ensure_unique("flag key", self.flags.iter().map(|f| f.key.as_str()))?;
        ensure_unique("flag label", self.flags.iter().map(|f| f.label.as_str()))?;
        Ok(())
    }

    /// Weight for a record key, if it is a known metric.
    pub fn weight(&self, key: &str) -> Option<i64> {
        self.metrics.iter().find(|m| m.key == key).map(|m| m.weight)
    }
}

fn ensure_unique<'a>(what: &str, values: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            bail!("duplicate {what} '{value}'");
        }
    }
    Ok(())
}
