//! Database connection and initialization.
//!
//! [`ConnectionCache`] opens the database lazily, at most once per process:
//! concurrent callers share one in-flight attempt, and a failed attempt is
//! not remembered, so the next caller tries again.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, EntityTrait,
    QueryOrder, Statement,
};
use sea_orm_migration::{seaql_migrations, MigratorTrait};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use common::{AppError, AppResult, DatabaseConfig};

use super::migrations::Migrator;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Opens new database connections.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Connector: Send + Sync {
    /// Establish a fresh connection handle
    async fn connect(&self) -> AppResult<DatabaseConnection>;
}

/// SeaORM-backed connector driven by [`DatabaseConfig`].
pub struct SeaOrmConnector {
    config: DatabaseConfig,
}

impl SeaOrmConnector {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    fn options(&self, url: &str) -> ConnectOptions {
        let mut options = ConnectOptions::new(url.to_owned());
        options
            .connect_timeout(self.config.connect_timeout())
            .sqlx_logging(false);

        // Leave the pool size to the driver unless configured; in-memory
        // SQLite relies on its single-connection default.
        if let Some(max) = self.config.max_connections {
            options.max_connections(max);
        }
        if let Some(schema) = &self.config.schema {
            options.set_schema_search_path(schema.clone());
        }
        options
    }
}

#[async_trait]
impl Connector for SeaOrmConnector {
    async fn connect(&self) -> AppResult<DatabaseConnection> {
        let url = self
            .config
            .url
            .as_deref()
            .ok_or_else(|| AppError::configuration("DATABASE_URL is not set"))?;

        let connection = SeaDatabase::connect(self.options(url)).await?;

        if self.config.run_migrations {
            Migrator::up(&connection, None).await?;
            info!("Database connected and migrations applied");
        } else {
            info!("Database connected");
        }

        Ok(connection)
    }
}

/// Process-wide, lazily established database handle.
pub struct ConnectionCache {
    connection: OnceCell<DatabaseConnection>,
    connector: Arc<dyn Connector>,
    connect_timeout: Duration,
}

impl ConnectionCache {
    /// Create an empty cache; nothing is opened until first use.
    pub fn new(connector: Arc<dyn Connector>, connect_timeout: Duration) -> Self {
        Self {
            connection: OnceCell::new(),
            connector,
            connect_timeout,
        }
    }

    /// Create a cache backed by [`SeaOrmConnector`].
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(
            Arc::new(SeaOrmConnector::new(config.clone())),
            config.connect_timeout(),
        )
    }

    /// Return the shared connection, opening it on first use.
    pub async fn ensure_connection(&self) -> AppResult<&DatabaseConnection> {
        if let Some(connection) = self.connection.get() {
            return Ok(connection);
        }

        self.connection
            .get_or_try_init(|| async {
                debug!("Opening database connection");
                match tokio::time::timeout(self.connect_timeout, self.connector.connect()).await {
                    Ok(result) => result,
                    Err(_) => Err(AppError::timeout(format!(
                        "database connection not established within {} ms",
                        self.connect_timeout.as_millis()
                    ))),
                }
            })
            .await
            .map_err(|e| {
                warn!(error = %e, "Database connection attempt failed");
                e
            })
    }

    /// Whether a connection has been established.
    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> AppResult<()> {
        let db = self.ensure_connection().await?;
        db.execute(Statement::from_string(
            db.get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await?;
        Ok(())
    }

    /// Run pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        let db = self.ensure_connection().await?;
        Migrator::up(db, None).await?;
        Ok(())
    }

    /// Rollback the last migration.
    pub async fn rollback_migration(&self) -> AppResult<()> {
        let db = self.ensure_connection().await?;
        Migrator::down(db, Some(1)).await?;
        Ok(())
    }

    /// Reset database and run all migrations fresh.
    pub async fn fresh_migrations(&self) -> AppResult<()> {
        let db = self.ensure_connection().await?;
        Migrator::fresh(db).await?;
        Ok(())
    }

    /// Get migration status (list all migrations with applied status).
    pub async fn migration_status(&self) -> AppResult<Vec<(String, bool)>> {
        let db = self.ensure_connection().await?;

        let applied: HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(db)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect())
    }
}
