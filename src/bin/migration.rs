//! Migration runner: apply, roll back, or inspect schema migrations.

use clap::{Parser, Subcommand};
use migrations::{Migrator, MigratorTrait};
use tracing::info;

#[derive(Parser)]
#[command(name = "migration", about = "AssetTrack database migration runner")]
struct Cli {
    /// Database URL (falls back to APP__DATABASE_URL, then sqlite default)
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply all pending migrations
    Up,
    /// Roll back the most recent migration
    Down {
        /// Number of migrations to roll back
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// Drop everything and re-apply from scratch
    Fresh,
    /// Show applied and pending migrations
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,sea_orm_migration=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let database_url = cli
        .database_url
        .or_else(|| std::env::var("APP__DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite://assettrack.db?mode=rwc".to_string());

    let db = sea_orm::Database::connect(&database_url).await?;

    match cli.command {
        Command::Up => {
            info!("Applying pending migrations");
            Migrator::up(&db, None).await?;
        }
        Command::Down { steps } => {
            info!("Rolling back {} migration(s)", steps);
            Migrator::down(&db, Some(steps)).await?;
        }
        Command::Fresh => {
            info!("Dropping all tables and re-applying migrations");
            Migrator::fresh(&db).await?;
        }
        Command::Status => {
            Migrator::status(&db).await?;
        }
    }

    Ok(())
}
