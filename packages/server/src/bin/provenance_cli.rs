//! Operator CLI for the provenance records store
//!
//! Runs schema migrations and prints record counts as JSON on stdout.
//! Diagnostics go to stderr through tracing.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use provenance_core::config::Config;
use provenance_core::kernel::{postgres, ServerDeps, ServerKernel};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "provenance_cli")]
#[command(about = "Provenance records CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,

    /// Print the number of stored records per entity
    Summary,
}

// ============================================================================
// JSON Response Types
// ============================================================================

#[derive(Serialize)]
struct MigrateResponse {
    success: bool,
}

#[derive(Serialize)]
struct SummaryResponse {
    sources: usize,
    repositories: usize,
    contributors: usize,
    contribution_types: usize,
    contributions: usize,
    configurations: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,provenance_core=debug,sqlx=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = postgres::connect(&config)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Migrate => {
            postgres::migrate(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations applied");
            print_json(&MigrateResponse { success: true })
        }
        Commands::Summary => {
            let kernel = ServerKernel::new(&ServerDeps::postgres(pool));
            let summary = summarize(&kernel).await?;
            print_json(&summary)
        }
    }
}

async fn summarize(kernel: &ServerKernel) -> Result<SummaryResponse> {
    Ok(SummaryResponse {
        sources: kernel.sources.retrieve_all().await?.len(),
        repositories: kernel.repositories.retrieve_all().await?.len(),
        contributors: kernel.contributors.retrieve_all().await?.len(),
        contribution_types: kernel.contribution_types.retrieve_all().await?.len(),
        contributions: kernel.contributions.retrieve_all().await?.len(),
        configurations: kernel.configurations.retrieve_all().await?.len(),
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
