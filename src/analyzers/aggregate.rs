use crate::analyzers::types::TeamAggregate;
use crate::analyzers::utility::{round2, safe_div};
use crate::catalog::MetricCatalog;
use crate::records::{FieldValue, MatchRecord, PitRecord};
use chrono::Utc;
use std::collections::BTreeMap;

/// Average of `metric` across all records.
///
/// Records missing the metric, or holding a non-numeric value, count as
/// zero. The divisor is always the full record count; empty input gives 0.
pub fn average_metric(records: &[MatchRecord], metric: &str) -> f64 {
    let sum: f64 = records.iter().filter_map(|r| r.number(metric)).sum();
    safe_div(sum, records.len())
}

/// Weighted sum of every catalog metric across every record.
///
/// Each record key is counted once, weighted by its catalog entry; keys the
/// catalog doesn't know are ignored. This is a grand total, not a per-match
/// average.
pub fn total_score(records: &[MatchRecord], catalog: &MetricCatalog) -> f64 {
    records
        .iter()
        .flat_map(|record| &record.fields)
        .filter_map(|(key, value)| {
            let weight = catalog.weight(key)?;
            value.as_number().map(|v| v * weight as f64)
        })
        .sum()
}

/// Fraction of records where `flag` is truthy, rounded to two decimals.
pub fn boolean_rate(records: &[MatchRecord], flag: &str) -> f64 {
    let hits = records.iter().filter(|r| r.is_set(flag)).count();
    round2(safe_div(hits as f64, records.len()))
}

/// Computes every catalog statistic for a set of match records in one pass
/// over the catalog.
pub fn aggregate_team(records: &[MatchRecord], catalog: &MetricCatalog) -> TeamAggregate {
    let averages = catalog
        .metrics
        .iter()
        .map(|m| (m.label.clone(), average_metric(records, &m.key)))
        .collect();

    let rates = catalog
        .flags
        .iter()
        .map(|f| (f.label.clone(), boolean_rate(records, &f.key)))
        .collect();

    TeamAggregate {
        generated_at: Utc::now(),
        match_count: records.len(),
        averages,
        total_score: total_score(records, catalog),
        rates,
    }
}

/// Merges a team's pit records into a single field map.
///
/// Records are applied in ascending document-id order (records without an
/// id first), so on conflicting keys the greatest id wins regardless of the
/// order the store returned them in.
pub fn merge_pit_records(records: &[PitRecord]) -> BTreeMap<String, FieldValue> {
    let mut ordered: Vec<&PitRecord> = records.iter().collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));

    let mut merged = BTreeMap::new();
    for record in ordered {
        for (key, value) in &record.fields {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}
