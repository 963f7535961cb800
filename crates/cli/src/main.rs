//! ironlog CLI - personal records and progressive overload tracking.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ironlog_core::{ExerciseId, HistoryWindow, ValidationError};
use ironlog_progress::{
    compute_milestones, emit, estimate_one_rep_max, intensity_table, BasicPrTracker, LogSink,
    PrTracker, TrackerConfig,
};
use ironlog_storage::JsonStorage;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ironlog")]
#[command(about = "Personal record and progressive overload tracker", long_about = None)]
struct Cli {
    /// Directory holding the record book
    #[arg(long, global = true, default_value = ".ironlog")]
    data_dir: PathBuf,

    /// Days counted as "recent" in stats
    #[arg(long, global = true, default_value = "30")]
    recent_days: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a completed set and report any new record
    Log {
        /// Exercise id
        exercise_id: String,
        /// Exercise display name
        name: String,
        /// Weight in kg
        weight: f64,
        /// Repetitions
        reps: u32,
        /// When the set was done (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Show logged sets for an exercise
    History {
        /// Exercise id
        exercise_id: String,
        /// `all` or a number of days
        #[arg(long, default_value = "all")]
        window: String,
    },
    /// List all personal records
    Records,
    /// List records set recently
    Recent {
        /// Number of days
        #[arg(long, default_value = "30")]
        days: u32,
    },
    /// Show milestones for a best weight
    Milestones {
        /// Weight in kg
        weight: f64,
    },
    /// Show achievement progress
    Achievements,
    /// Show record statistics
    Stats,
    /// Estimate a one-rep max and print an intensity table
    OneRm {
        /// Weight in kg
        weight: f64,
        /// Repetitions
        reps: u32,
    },
    /// Show how close a weight is to the record
    Near {
        /// Exercise id
        exercise_id: String,
        /// Planned weight in kg
        weight: f64,
    },
    /// Delete every record and all history
    Reset {
        /// Confirm the irreversible reset
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let storage = JsonStorage::new(&cli.data_dir).await?;
    let tracker = BasicPrTracker::new(storage).with_config(TrackerConfig {
        recent_days: cli.recent_days,
        ..TrackerConfig::default()
    });

    match cli.command {
        Commands::Log { exercise_id, name, weight, reps, at } => {
            let timestamp = at.as_deref().map(ValidationError::parse_timestamp).transpose()?;
            let evaluation = tracker
                .evaluate(ExerciseId::new(exercise_id), &name, weight, reps, timestamp)
                .await?;

            if let Some(e) = &evaluation.persist_error {
                warn!("Set recorded in memory only: {}", e);
            }
            match emit(&LogSink, &evaluation).await {
                Some(event) => println!("{} ({:+.1}%)", event.headline, event.improvement_percent),
                None => println!("Logged {} kg x {} for {}", weight, reps, name),
            }
        }
        Commands::History { exercise_id, window } => {
            let window: HistoryWindow = window.parse()?;
            let id = ExerciseId::new(exercise_id);
            let samples = tracker.query_history(&id, window).await;

            println!("Sets ({})", samples.len());
            for s in samples {
                println!("  {} | {} kg x {} | volume {}",
                    s.timestamp.format("%Y-%m-%d %H:%M"),
                    s.weight,
                    s.reps,
                    s.volume(),
                );
            }
            if let Some(peak) = tracker.max_estimated_one_rep_max(&id).await {
                println!("Best estimated 1RM: {} kg", peak);
            }
        }
        Commands::Records => {
            let records = tracker.query_all_records().await;
            println!("Records ({})", records.len());
            for r in records {
                println!("  {} | {} | {} kg x {} | best volume {}",
                    r.exercise_id,
                    r.exercise_name,
                    r.best_weight,
                    r.best_reps_at_best_weight,
                    r.best_volume,
                );
            }
        }
        Commands::Recent { days } => {
            let records = tracker.query_recent_records(days).await;
            println!("Records in the last {} days ({})", days, records.len());
            for r in records {
                println!("  {} | {} kg | {}", r.exercise_name, r.best_weight, r.last_updated_at.format("%Y-%m-%d"));
            }
        }
        Commands::Milestones { weight } => {
            ValidationError::check_weight(weight)?;
            for m in compute_milestones(weight) {
                println!("  {}", m);
            }
        }
        Commands::Achievements => {
            for a in tracker.achievements().await {
                println!("  [{}] {} - {} ({}/{})",
                    if a.unlocked { "x" } else { " " },
                    a.title,
                    a.description,
                    a.current,
                    a.requirement,
                );
            }
        }
        Commands::Stats => {
            let stats = tracker.pr_stats().await;
            println!("ironlog Stats");
            println!("  Records: {}", stats.total_records);
            println!("  Recent ({} days): {}", tracker.config().recent_days, stats.recent_records);
            println!("  This week: {}", stats.this_week_records);
            if let Some(top) = stats.strongest_lift {
                println!("  Strongest lift: {} (est. 1RM {} kg)", top.exercise_name, top.estimated_one_rep_max);
            }
        }
        Commands::OneRm { weight, reps } => {
            let one_rm = estimate_one_rep_max(weight, reps)?;
            println!("Estimated 1RM: {} kg", one_rm);
            for row in intensity_table(one_rm) {
                println!("  {:>3}% | {:>6} kg | {} reps", row.percent, row.weight, row.reps);
            }
        }
        Commands::Near { exercise_id, weight } => {
            match tracker.proximity(&ExerciseId::new(exercise_id), weight).await {
                Some(p) => println!("{:?}: {:.0}% of record, {} kg to go", p.level, p.percent, p.remaining_kg),
                None => println!("Not close to a record"),
            }
        }
        Commands::Reset { yes } => {
            if !yes {
                anyhow::bail!("Refusing to reset without --yes");
            }
            tracker.reset_all().await?;
            println!("All records cleared");
        }
    }

    Ok(())
}
