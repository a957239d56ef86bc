mod store;
mod track;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::track::TrackCommands;

#[derive(Debug, Parser)]
#[command(name = "brandrank-cli")]
#[command(about = "Track where brands rank in search results and generated answers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a tracking pass for one engine
    Track {
        #[command(subcommand)]
        command: TrackCommands,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Show recent tracking runs
    Runs {
        /// Maximum number of runs to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = brandrank_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = brandrank_db::PoolConfig::from_app_config(&config);
    let pool = brandrank_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("failed to connect to the database")?;

    match cli.command {
        Commands::Track { command } => track::run_track(&pool, &config, &command).await?,
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            brandrank_db::ping(&pool).await?;
            println!("database connection ok");
        }
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = brandrank_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Runs { limit } => print_runs(&pool, limit).await?,
    }

    Ok(())
}

async fn print_runs(pool: &sqlx::PgPool, limit: i64) -> anyhow::Result<()> {
    let runs = brandrank_db::list_tracking_runs(pool, limit.max(1)).await?;
    if runs.is_empty() {
        println!("no tracking runs recorded");
        return Ok(());
    }

    println!(
        "{:<6} {:<7} {:<10} {:>8}  {:<19}  error",
        "id", "engine", "status", "records", "created"
    );
    for run in runs {
        println!(
            "{:<6} {:<7} {:<10} {:>8}  {:<19}  {}",
            run.id,
            run.engine,
            run.status,
            run.records_processed,
            run.created_at.format("%Y-%m-%d %H:%M:%S"),
            run.error_message.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests;
