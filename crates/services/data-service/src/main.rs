//! `data-service` binary: schema management for the user, image and
//! transaction tables.
//!
//! The data layer itself runs inside the gateway process; this tool only
//! moves the database schema between versions.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use data_service_lib::MigrateAction;

#[derive(Parser)]
#[command(name = "data-service")]
#[command(about = "Schema migrations for the users, images and transactions store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply, revert or inspect migrations (reads DATABASE_URL and DATABASE_SCHEMA)
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Command::Migrate { action } = Cli::parse().command;
    data_service_lib::run_migrations(action).await?;

    Ok(())
}
