//! Output formatting and persistence for team reports.
//!
//! Supports debug logging, a plain-text summary and CSV append.

use anyhow::Result;
use tracing::debug;

use crate::analyzers::types::{TeamAggregate, TeamReport};
use crate::catalog::MetricCatalog;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &TeamReport) {
    debug!("{:#?}", report);
}

/// Renders the stats, pit fields and match table as plain text.
///
/// Match rows appear in the report's current order, one column per catalog
/// metric and flag.
pub fn format_report(report: &TeamReport, catalog: &MetricCatalog) -> String {
    let agg = &report.aggregate;
    let mut lines = vec![format!("Team {} ({} matches)", report.team, agg.match_count)];

    lines.extend(
        catalog
            .metrics
            .iter()
            .map(|m| format!("  {:<20} {:.2}", m.label, agg.average(&m.label))),
    );
    lines.extend(
        catalog
            .flags
            .iter()
            .map(|f| format!("  {:<20} {:.2}", f.label, agg.rate(&f.label))),
    );
    lines.push(format!("  {:<20} {}", "total_score", agg.total_score));

    if !report.pit.is_empty() {
        lines.push("Pit".to_string());
        lines.extend(report.pit.iter().map(|(key, value)| format!("  {key:<20} {value}")));
    }

    if !report.matches.is_empty() {
        let columns: Vec<&str> = catalog
            .metrics
            .iter()
            .map(|m| m.key.as_str())
            .chain(catalog.flags.iter().map(|f| f.key.as_str()))
            .collect();

        lines.push(match (&report.sort.column, report.sort.direction) {
            (Some(column), Some(direction)) => format!("Matches (by {column}, {direction:?})"),
            _ => "Matches".to_string(),
        });
        lines.push(format!("  {}", columns.join("\t")));
        for row in &report.matches {
            let cells: Vec<String> = columns
                .iter()
                .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default())
                .collect();
            lines.push(format!("  {}", cells.join("\t")));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Appends one summary row for `team` to a CSV file.
///
/// Creates the file with a header row if it does not already exist. Columns
/// follow the catalog order, so a file should only ever be appended to with
/// the same catalog.
pub fn append_summary(
    path: &str,
    team: &str,
    aggregate: &TeamAggregate,
    catalog: &MetricCatalog,
) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV summary");

    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    if !file_exists {
        let mut header = vec![
            "timestamp".to_string(),
            "team".to_string(),
            "matches".to_string(),
            "total_score".to_string(),
        ];
        header.extend(catalog.metrics.iter().map(|m| m.label.clone()));
        header.extend(catalog.flags.iter().map(|f| f.label.clone()));
        writer.write_record(&header)?;
    }

    let mut row = vec![
        aggregate.generated_at.to_rfc3339(),
        team.to_string(),
        aggregate.match_count.to_string(),
        aggregate.total_score.to_string(),
    ];
    row.extend(catalog.metrics.iter().map(|m| aggregate.average(&m.label).to_string()));
    row.extend(catalog.flags.iter().map(|f| aggregate.rate(&f.label).to_string()));
    writer.write_record(&row)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::aggregate::aggregate_team;
    use crate::analyzers::types::SortState;
    use crate::records::ScoutRecord;
    use std::collections::BTreeMap;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn report() -> TeamReport {
        let matches = vec![
            ScoutRecord::new()
                .with("teamNumber", "972")
                .with("autoHighCubeCount", 2i64)
                .with("docked", true),
        ];
        let aggregate = aggregate_team(&matches, &MetricCatalog::default());
        let mut pit = BTreeMap::new();
        pit.insert("driveTrain".to_string(), "swerve".into());

        TeamReport {
            team: "972".to_string(),
            aggregate,
            pit,
            matches,
            sort: SortState::default(),
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&report());
    }

    #[test]
    fn test_format_report_lists_stats_and_rows() {
        let text = format_report(&report(), &MetricCatalog::default());

        assert!(text.starts_with("Team 972 (1 matches)"));
        assert!(text.contains("Avg_Cubes_Auto_H     2.00"));
        assert!(text.contains("docked_rate          1.00"));
        assert!(text.contains("driveTrain           swerve"));
        assert!(text.contains("  2\t"));
        assert!(text.ends_with('\n'));
        assert!(!text.contains("(by "));
    }

    #[test]
    fn test_format_report_shows_sort_state() {
        let mut report = report();
        report.sort = SortState {
            column: Some("autoHighCubeCount".to_string()),
            direction: Some(crate::analyzers::types::Direction::Descending),
        };

        let text = format_report(&report, &MetricCatalog::default());

        assert!(text.contains("Matches (by autoHighCubeCount, Descending)\n"));
    }

    #[test]
    fn test_append_summary_writes_header_once() {
        let path = temp_path("frc_scout_test_header.csv");
        let _ = fs::remove_file(&path);
        let catalog = MetricCatalog::default();
        let report = report();

        append_summary(&path, "972", &report.aggregate, &catalog).unwrap();
        append_summary(&path, "972", &report.aggregate, &catalog).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.iter().filter(|l| l.starts_with("timestamp")).count(), 1);
        assert!(lines[0].ends_with("docked_rate,engaged_rate"));
        assert!(lines[1].contains(",972,1,2,"));

        fs::remove_file(&path).unwrap();
    }
}
