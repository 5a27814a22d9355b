use crate::analyzers::aggregate::{aggregate_team, merge_pit_records};
use crate::analyzers::types::{SortState, TeamReport};
use crate::catalog::MetricCatalog;
use crate::error::LookupError;
use crate::services::record_store::RecordStore;
use tracing::{debug, info};

/// Fetches a team's match and pit records and builds its report.
///
/// Both fetches run concurrently and must both succeed before anything is
/// aggregated. A store failure is reported as [`LookupError::Store`]; a
/// team with neither match nor pit records as [`LookupError::TeamNotFound`].
#[tracing::instrument(skip(store, catalog))]
pub async fn lookup_team<S: RecordStore + ?Sized>(
    store: &S,
    team: &str,
    catalog: &MetricCatalog,
) -> Result<TeamReport, LookupError> {
    let team = team.trim();
    if team.is_empty() {
        return Err(LookupError::EmptyTeam);
    }

    let (matches, pits) = tokio::try_join!(
        store.fetch_match_records(team),
        store.fetch_pit_records(team)
    )
    .map_err(LookupError::Store)?;

    debug!(matches = matches.len(), pits = pits.len(), "Records fetched");

    if matches.is_empty() && pits.is_empty() {
        return Err(LookupError::TeamNotFound(team.to_string()));
    }

    let aggregate = aggregate_team(&matches, catalog);
    let pit = merge_pit_records(&pits);

    info!(
        matches = aggregate.match_count,
        total_score = aggregate.total_score,
        "Team aggregated"
    );

    Ok(TeamReport {
        team: team.to_string(),
        aggregate,
        pit,
        matches,
        sort: SortState::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{FieldValue, MatchRecord, PitRecord, ScoutRecord, TEAM_NUMBER_FIELD};
    use crate::services::memory::MemoryStore;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::time::Duration;

    fn store() -> MemoryStore {
        MemoryStore::new(
            vec![
                ScoutRecord::new()
                    .with(TEAM_NUMBER_FIELD, "972")
                    .with("autoHighCubeCount", 2i64)
                    .with("docked", true),
                ScoutRecord::new()
                    .with(TEAM_NUMBER_FIELD, "972")
                    .with("autoHighCubeCount", 4i64)
                    .with("teleLowConeCount", 3i64),
                ScoutRecord::new()
                    .with(TEAM_NUMBER_FIELD, "254")
                    .with("autoHighCubeCount", 9i64),
            ],
            vec![
                ScoutRecord::new()
                    .with_id("p1")
                    .with(TEAM_NUMBER_FIELD, "972")
                    .with("driveTrain", "swerve"),
                ScoutRecord::new().with_id("p2").with(TEAM_NUMBER_FIELD, "1678"),
            ],
        )
    }

    /// Match fetch resolves late, pit fetch early, or either fails.
    struct SlowStore {
        fail_pits: bool,
    }

    #[async_trait]
    impl RecordStore for SlowStore {
        async fn fetch_match_records(&self, team: &str) -> Result<Vec<MatchRecord>> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(vec![
                ScoutRecord::new()
                    .with(TEAM_NUMBER_FIELD, team)
                    .with("engage", true),
            ])
        }

        async fn fetch_pit_records(&self, team: &str) -> Result<Vec<PitRecord>> {
            if self.fail_pits {
                return Err(anyhow!("connection refused"));
            }
            Ok(vec![ScoutRecord::new().with(TEAM_NUMBER_FIELD, team).with("worlds", "yes")])
        }

        async fn save_pit_record(&self, _id: &str, _record: &PitRecord) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_lookup_aggregates_team_records() {
        let report = lookup_team(&store(), " 972 ", &MetricCatalog::default())
            .await
            .unwrap();

        assert_eq!(report.team, "972");
        assert_eq!(report.matches.len(), 2);
        assert_eq!(report.aggregate.match_count, 2);
        assert_eq!(report.aggregate.average("Avg_Cubes_Auto_H"), 3.0);
        assert_eq!(report.aggregate.average("Avg_Cones_Tele_L"), 1.5);
        assert_eq!(report.aggregate.total_score, 9.0);
        assert_eq!(report.aggregate.rate("docked_rate"), 0.5);
        assert_eq!(report.aggregate.rate("engaged_rate"), 0.0);
        assert_eq!(report.pit.get("driveTrain"), Some(&FieldValue::from("swerve")));
        assert_eq!(report.sort, SortState::default());
    }

    #[tokio::test]
    async fn test_lookup_pit_only_team() {
        let report = lookup_team(&store(), "1678", &MetricCatalog::default())
            .await
            .unwrap();

        assert_eq!(report.aggregate.match_count, 0);
        assert_eq!(report.aggregate.total_score, 0.0);
        assert!(report.matches.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_unknown_team_is_not_found() {
        let err = lookup_team(&store(), "9999", &MetricCatalog::default())
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::TeamNotFound(ref t) if t == "9999"));
    }

    #[tokio::test]
    async fn test_lookup_empty_team() {
        let err = lookup_team(&store(), "   ", &MetricCatalog::default())
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::EmptyTeam));
    }

    #[tokio::test]
    async fn test_lookup_waits_for_both_fetches() {
        let store = SlowStore { fail_pits: false };
        let report = lookup_team(&store, "972", &MetricCatalog::default())
            .await
            .unwrap();

        assert_eq!(report.aggregate.rate("engaged_rate"), 1.0);
        assert_eq!(report.pit.get("worlds"), Some(&FieldValue::from("yes")));
    }

    #[tokio::test]
    async fn test_lookup_store_failure_is_not_not_found() {
        let store = SlowStore { fail_pits: true };
        let err = lookup_team(&store, "972", &MetricCatalog::default())
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::Store(_)));
        assert!(err.to_string().contains("connection refused"));
    }
}
