//! Shelf CLI: maintenance jobs for review image storage.
//!
//! Reads the same environment as the API server (`DATABASE_URL`, `ENVIRONMENT`,
//! `GCS_BUCKET`, `LOCAL_UPLOAD_PATH`, ...).

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use shelf_cli::{format_report, init_tracing};
use shelf_core::Config;
use shelf_db::{connect_pool, ReviewImageRepository};
use shelf_services::ReconcileService;
use shelf_storage::create_storage;

#[derive(Parser)]
#[command(name = "shelf", about = "Review image storage maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare stored objects with review image records
    Reconcile {
        /// Delete stored objects no record points to
        #[arg(long)]
        delete: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize report")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Reconcile { delete, json } => {
            let pool = connect_pool(&config).await?;
            let storage = create_storage(&config)
                .await
                .context("Failed to initialize storage backend")?;
            let images = Arc::new(ReviewImageRepository::new(pool));

            let report = ReconcileService::new(storage, images)
                .run(delete)
                .await
                .context("Reconciliation failed")?;

            if json {
                print_json(&report)?;
            } else {
                print!("{}", format_report(&report, delete));
            }
        }
    }

    Ok(())
}
