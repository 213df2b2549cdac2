//! CLI entry point for the submission tracker.
//!
//! Provides subcommands for listing submission folders, rendering the
//! leaderboard once or on a refresh loop, and exporting it as CSV.

use anyhow::Result;
use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use submission_tracker::analyzers::analyzer::{build_leaderboard, list_submissions};
use submission_tracker::analyzers::leaderboard::SortKey;
use submission_tracker::config::{BUCKET_NAME, REFRESH_INTERVAL_SECS};
use submission_tracker::dashboard::render;
use submission_tracker::output::{ExportOptions, export_leaderboard, print_pretty, to_json};
use submission_tracker::refresh::{RefreshOutcome, RefreshState};
use submission_tracker::store::{LocalStore, ObjectStore, S3Store};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "submission_tracker")]
#[command(about = "Live leaderboard of student assignment submissions", long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Where submissions are read from.
#[derive(Args)]
struct SourceArgs {
    /// S3 bucket holding one folder per submission
    #[arg(long, global = true, default_value = BUCKET_NAME)]
    bucket: String,

    /// Read a local directory mirror of the bucket instead of S3
    #[arg(long, global = true, value_name = "DIR")]
    local_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List submission folders in the bucket
    List,
    /// Build the leaderboard once and print it
    Report {
        /// Table ordering
        #[arg(short, long, value_enum, default_value_t = SortKey::Score)]
        sort: SortKey,

        /// Print the leaderboard as JSON instead of the text dashboard
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Keep the dashboard up to date, refreshing periodically or on Enter
    Watch {
        /// Seconds between automatic refreshes
        #[arg(short, long, default_value_t = REFRESH_INTERVAL_SECS)]
        interval: u64,

        /// Table ordering
        #[arg(short, long, value_enum, default_value_t = SortKey::Score)]
        sort: SortKey,
    },
    /// Write per-date and full CSV reports
    Export {
        /// Directory to write CSV files to
        #[arg(short, long, default_value = "exports")]
        output_dir: PathBuf,

        /// Add per-question Passed/Failed/Status columns
        #[arg(long, default_value_t = false)]
        pivot: bool,

        /// Gzip compress the CSV files
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/submission_tracker.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("submission_tracker.log"));

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
    let store = open_store(&cli.source).await;

    match cli.command {
        Commands::List => {
            for folder in list_submissions(store.as_ref()).await? {
                println!("{folder}");
            }
        }
        Commands::Report { sort, json } => {
            let leaderboard = build_leaderboard(store.as_ref()).await?;
            print_pretty(&leaderboard);
            if json {
                println!("{}", to_json(&leaderboard)?);
            } else {
                print!("{}", render(&leaderboard, Local::now(), sort));
            }
        }
        Commands::Watch { interval, sort } => {
            watch(store.as_ref(), Duration::from_secs(interval), sort).await?;
        }
        Commands::Export {
            output_dir,
            pivot,
            gzip,
        } => {
            let leaderboard = build_leaderboard(store.as_ref()).await?;
            let written =
                export_leaderboard(&output_dir, &leaderboard, ExportOptions { pivot, gzip })?;
            for path in written {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

/// Opens the local mirror when one is given, otherwise the S3 bucket.
async fn open_store(source: &SourceArgs) -> Box<dyn ObjectStore> {
    match &source.local_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Reading submissions from local directory");
            Box::new(LocalStore::new(dir))
        }
        None => {
            info!(bucket = %source.bucket, "Reading submissions from S3");
            Box::new(S3Store::from_env(source.bucket.clone()).await)
        }
    }
}

/// Redraws the dashboard whenever a refresh is due: every `interval`, or
/// immediately when Enter is pressed. Runs until Ctrl+C.
#[tracing::instrument(skip(store), fields(interval_secs = interval.as_secs()))]
async fn watch(store: &dyn ObjectStore, interval: Duration, sort: SortKey) -> Result<()> {
    let mut state = RefreshState::new();
    let mut last_drawn = None;
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    info!("Watching submissions. Press Enter to refresh, Ctrl+C to stop.");

    loop {
        let manual = tokio::select! {
            _ = ticker.tick() => false,
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(_)) => true,
                Ok(None) => {
                    debug!("stdin closed, manual refresh disabled");
                    stdin_open = false;
                    false
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin, manual refresh disabled");
                    stdin_open = false;
                    false
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        };

        let outcome = state
            .refresh_if_due(store, Utc::now(), interval, manual)
            .await;

        if outcome == RefreshOutcome::Skipped {
            continue;
        }

        if let Some(leaderboard) = state.cached() {
            if last_drawn != Some(leaderboard.generated_at()) {
                // Clear screen and move the cursor home before redrawing.
                print!("\x1B[2J\x1B[H");
                print!("{}", render(leaderboard, leaderboard.generated_at().with_timezone(&Local), sort));
                last_drawn = Some(leaderboard.generated_at());
            }
        } else {
            println!("Waiting for refresh or no data loaded yet.");
        }
    }

    info!("Stopped watching");
    Ok(())
}
