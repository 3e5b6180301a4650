//! Data Service Library
//!
//! Data access for user accounts, credit balances, transformed images and
//! payment transactions. The library is used in-process by the gateway; the
//! binary only manages database migrations.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use tracing::info;

use common::{AppResult, DatabaseConfig};

use crate::config::DataServiceConfig;
use crate::infra::ConnectionCache;

pub use service::{ServiceContainer, Services};

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> AppResult<()> {
    let config = DataServiceConfig::from_env();
    let cache = ConnectionCache::from_config(&DatabaseConfig {
        run_migrations: false,
        ..config.database
    });

    match action {
        MigrateAction::Up => {
            cache.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            cache.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = cache.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            cache.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Schema change to perform against `DATABASE_URL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::Subcommand)]
pub enum MigrateAction {
    /// Apply every pending migration
    Up,
    /// Revert the most recently applied migration
    Down,
    /// List migrations and whether each one is applied
    Status,
    /// Drop all tables, then apply every migration from scratch
    Fresh,
}
