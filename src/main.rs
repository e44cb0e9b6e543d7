//! shiptrack - batch shipment tracking pipeline CLI
//!
//! Thin consumer of the library: single lookups, bulk submission from CSV,
//! stored-batch listing, normalized results with CSV export, and summary
//! analytics.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shiptrack::utils::data;
use shiptrack::{Config, Tracker};

const DEFAULT_CONFIG_PATH: &str = "config/shiptrack.yaml";

#[derive(Parser)]
#[command(name = "shiptrack", version, about = "Batch shipment tracking pipeline")]
struct Cli {
    /// Path to a YAML config file; falls back to environment variables
    #[arg(long, global = true, env = "SHIPTRACK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a single tracking number
    Track {
        /// The tracking number to look up
        tracking_number: String,
    },
    /// Submit a CSV of tracking numbers as a new batch
    Submit {
        /// CSV file with a TrackingNumber column
        file: PathBuf,
    },
    /// List stored batches, newest first
    Batches,
    /// Show normalized results for a batch
    Results {
        /// Batch reference id
        reference_id: String,
        /// Also write the results to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Summarize one batch, or everything when no reference is given
    Summary {
        /// Batch reference id; omit to summarize all stored records
        reference_id: Option<String>,
    },
    /// Delete a batch and its records
    Delete {
        /// Batch reference id
        reference_id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref()).await?;
    let tracker = Tracker::new(config).await?;

    match cli.command {
        Command::Track { tracking_number } => {
            let lookup = tracker.track_single(&tracking_number).await?;
            println!("Tracking Number:    {}", lookup.record.tracking_number);
            println!("Current Status:     {}", lookup.record.status);
            println!("Estimated Delivery: {}", lookup.record.estimated_delivery);
            println!("Proof of Delivery:  {}", lookup.record.proof_of_delivery);
            if lookup.history.is_empty() {
                println!("No shipment history available.");
            } else {
                println!("\nShipment history:");
                for event in &lookup.history {
                    println!("  {}  {}  [{}]", event.time, event.description, event.location);
                }
            }
        }
        Command::Submit { file } => {
            let numbers = data::read_tracking_numbers_from_path(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let submission = tracker.submit_batch(&numbers).await?;
            println!("Reference ID: {}", submission.reference_id);
            println!(
                "Saved {} of {} shipments.",
                submission.success_count,
                submission.attempted()
            );
            for failure in &submission.failures {
                println!("  failed {}: {}", failure.tracking_number, failure.reason);
            }
        }
        Command::Batches => {
            let batches = tracker.batches().await?;
            if batches.is_empty() {
                println!("No batches stored yet.");
            }
            for batch in batches {
                println!("{}  {}", batch.reference_id, batch.created_at.to_rfc3339());
            }
        }
        Command::Results {
            reference_id,
            export,
        } => {
            let results = tracker.batch_results(&reference_id).await?;
            for record in &results {
                println!(
                    "{}  {}  {}  {}",
                    record.tracking_number,
                    record.status,
                    record.latest_event_time,
                    record.latest_event
                );
            }
            if let Some(path) = export {
                data::write_results_csv_to_path(&results, &path)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Exported {} rows to {}", results.len(), path.display());
            }
        }
        Command::Summary { reference_id } => {
            let summary = tracker.summary(reference_id.as_deref()).await?;
            println!("Total shipments:      {}", summary.total);
            println!("Delivered:            {}", summary.delivered);
            println!("In transit:           {}", summary.in_transit);
            println!("With exceptions:      {}", summary.exceptions);
            if !summary.by_shipper_city.is_empty() {
                println!("\nBy shipper city:");
                for (city, count) in &summary.by_shipper_city {
                    println!("  {:<24} {}", city, count);
                }
            }
            if !summary.by_recipient_city.is_empty() {
                println!("\nBy recipient city:");
                for (city, count) in &summary.by_recipient_city {
                    println!("  {:<24} {}", city, count);
                }
            }
            if !summary.weight_histogram.is_empty() {
                println!("\nWeight distribution:");
                for bucket in &summary.weight_histogram {
                    println!("  {:>8.2} - {:<8.2} {}", bucket.lower, bucket.upper, bucket.count);
                }
            }
        }
        Command::Delete { reference_id } => {
            if tracker.delete_batch(&reference_id).await? {
                println!("Deleted batch {}", reference_id);
            } else {
                println!("No batch named {}", reference_id);
            }
        }
    }

    tracker.close().await;
    Ok(())
}

async fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Ok(Config::from_file(path).await?),
        None if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Ok(Config::from_file(DEFAULT_CONFIG_PATH).await?)
        }
        None => Ok(Config::from_env()?),
    }
}
