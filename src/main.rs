//! CLI entry point for the FRC scouting lookup tool.
//!
//! Provides subcommands for looking up a team's aggregated match statistics,
//! submitting pit-scouting records, and printing the active metric catalog.

use anyhow::Result;
use clap::{Parser, Subcommand};
use frc_scout::analyzers::lookup::lookup_team;
use frc_scout::analyzers::sort::sort_table;
use frc_scout::catalog::MetricCatalog;
use frc_scout::config::StoreConfig;
use frc_scout::error::LookupError;
use frc_scout::infra::firestore::FirestoreClient;
use frc_scout::output::{append_summary, format_report, print_pretty};
use frc_scout::services::memory::MemoryStore;
use frc_scout::services::record_store::RecordStore;
use frc_scout::submit::PitSubmission;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "frc_scout")]
#[command(about = "Look up and record FRC scouting data", long_about = None)]
struct Cli {
    /// JSON metric catalog to use instead of the built-in one
    /// (falls back to METRIC_CATALOG_PATH)
    #[arg(long, global = true)]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show aggregated statistics, pit data and matches for a team
    Lookup {
        /// Team number to look up
        #[arg(value_name = "TEAM")]
        team: String,

        /// Sort the match table by this field; repeat a field to toggle direction
        #[arg(short, long)]
        sort: Vec<String>,

        /// Print the full report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append a summary row to
        #[arg(long)]
        csv: Option<String>,

        /// Read match records from a local JSON file instead of Firestore
        #[arg(long)]
        matches_file: Option<String>,

        /// Read pit records from a local JSON file instead of Firestore
        #[arg(long)]
        pits_file: Option<String>,
    },
    /// Save a pit-scouting record under a new document id
    SubmitPit {
        /// Form field as key=value (teamNumber is required)
        #[arg(short, long = "field", value_name = "KEY=VALUE")]
        fields: Vec<String>,
    },
    /// Print the metric catalog as JSON
    Catalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/frc_scout.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("frc_scout.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog)?;

    match cli.command {
        Commands::Lookup {
            team,
            sort,
            json,
            csv,
            matches_file,
            pits_file,
        } => {
            let store: Box<dyn RecordStore> = if matches_file.is_some() || pits_file.is_some() {
                Box::new(MemoryStore::from_files(
                    matches_file.as_deref(),
                    pits_file.as_deref(),
                )?)
            } else {
                Box::new(FirestoreClient::from_config(&StoreConfig::from_env()?)?)
            };

            let mut report = match lookup_team(store.as_ref(), &team, &catalog).await {
                Ok(report) => report,
                Err(e) => {
                    match &e {
                        LookupError::TeamNotFound(team) => warn!(team = %team, "Team not found"),
                        _ => error!(error = %e, "Lookup failed"),
                    }
                    anyhow::bail!(e.user_message());
                }
            };

            for column in &sort {
                let rows = std::mem::take(&mut report.matches);
                let (rows, state) = sort_table(rows, column, &report.sort);
                report.matches = rows;
                report.sort = state;
            }

            print_pretty(&report);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", format_report(&report, &catalog));
            }

            if let Some(path) = csv {
                append_summary(&path, &report.team, &report.aggregate, &catalog)?;
                info!(path = %path, "Summary appended");
            }
        }
        Commands::SubmitPit { fields } => {
            let submission =
                PitSubmission::from_pairs(fields.iter().map(String::as_str)).map_err(anyhow::Error::msg)?;
            let store = FirestoreClient::from_config(&StoreConfig::from_env()?)?;

            let id = submission.submit(&store).await?;
            println!("{id}");
        }
        Commands::Catalog => {
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
    }

    Ok(())
}

/// Loads the catalog from `path` or `METRIC_CATALOG_PATH`, else the built-in one.
fn load_catalog(path: Option<String>) -> Result<MetricCatalog> {
    match path.or_else(|| std::env::var("METRIC_CATALOG_PATH").ok()) {
        Some(path) => {
            let catalog = MetricCatalog::load(&path)?;
            info!(path = %path, metrics = catalog.metrics.len(), "Metric catalog loaded");
            Ok(catalog)
        }
        None => Ok(MetricCatalog::default()),
    }
}
