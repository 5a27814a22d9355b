use frc_scout::analyzers::lookup::lookup_team;
use frc_scout::analyzers::sort::sort_table;
use frc_scout::analyzers::types::Direction;
use frc_scout::catalog::MetricCatalog;
use frc_scout::error::LookupError;
use frc_scout::records::{FieldValue, parse_records};
use frc_scout::services::memory::MemoryStore;

fn fixture_store() -> MemoryStore {
    let matches = parse_records(include_str!("fixtures/matches.json")).expect("Failed to parse matches");
    let pits = parse_records(include_str!("fixtures/pits.json")).expect("Failed to parse pits");
    MemoryStore::new(matches, pits)
}

#[tokio::test]
async fn test_full_lookup_pipeline() {
    let store = fixture_store();
    let report = lookup_team(&store, "972", &MetricCatalog::default())
        .await
        .expect("lookup failed");

    let agg = &report.aggregate;
    assert_eq!(agg.match_count, 4);
    assert_eq!(agg.average("Avg_Cubes_Auto_H"), 1.0);
    assert_eq!(agg.average("Avg_Cones_Auto_M"), 0.25);
    assert_eq!(agg.average("Avg_Cones_Tele_H"), 2.0);
    assert_eq!(agg.average("Avg_Cubes_Tele_L"), 0.5);
    // groundIntakes and matchNumber are not catalog metrics
    assert_eq!(agg.total_score, 20.0);
    assert_eq!(agg.rate("docked_rate"), 0.5);
    assert_eq!(agg.rate("engaged_rate"), 0.25);

    assert_eq!(report.pit.get("driveTrain"), Some(&FieldValue::from("swerve")));
    assert_eq!(report.pit.get("weight"), Some(&FieldValue::from("118")));
}

#[tokio::test]
async fn test_sorting_report_matches() {
    let store = fixture_store();
    let report = lookup_team(&store, "972", &MetricCatalog::default())
        .await
        .expect("lookup failed");

    let (rows, state) = sort_table(report.matches, "teleHighConeCount", &report.sort);
    let ids: Vec<_> = rows.iter().filter_map(|r| r.id.clone()).collect();
    assert_eq!(ids, vec!["5d1e9b40", "0b9c1f2e", "8e22c7d1", "3f7aa012"]);
    assert_eq!(state.direction, Some(Direction::Ascending));

    let (rows, state) = sort_table(rows, "teleHighConeCount", &state);
    assert_eq!(rows[0].id.as_deref(), Some("3f7aa012"));
    assert_eq!(state.direction, Some(Direction::Descending));
}

#[tokio::test]
async fn test_unknown_team_not_found() {
    let store = fixture_store();
    let result = lookup_team(&store, "118", &MetricCatalog::default()).await;

    assert!(matches!(result, Err(LookupError::TeamNotFound(_))));
}
