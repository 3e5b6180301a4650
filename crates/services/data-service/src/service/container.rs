//! Service container - wires repositories, services and the shared connection.

use std::sync::Arc;

use tracing::info;

use common::AppResult;

use super::{
    ImageManager, ImageService, TransactionManager, TransactionService, UserManager, UserService,
};
use crate::config::DataServiceConfig;
use crate::infra::{ConnectionCache, NoopRevalidator, RedisRevalidator, Revalidator};
use crate::repository::{ImageStore, TransactionStore, UserStore};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get image service
    fn images(&self) -> Arc<dyn ImageService>;

    /// Get transaction service
    fn transactions(&self) -> Arc<dyn TransactionService>;

    /// Whether the shared database connection has been established
    fn database_connected(&self) -> bool;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    connection: Arc<ConnectionCache>,
    user_service: Arc<dyn UserService>,
    image_service: Arc<dyn ImageService>,
    transaction_service: Arc<dyn TransactionService>,
}

impl Services {
    /// Build all services on top of one connection cache.
    ///
    /// Nothing is opened here; the first operation establishes the connection.
    pub fn new(connection: Arc<ConnectionCache>, revalidator: Arc<dyn Revalidator>) -> Self {
        let users = Arc::new(UserStore::new(connection.clone()));
        let images = Arc::new(ImageStore::new(connection.clone()));
        let transactions = Arc::new(TransactionStore::new(connection.clone()));

        Self {
            user_service: Arc::new(UserManager::new(users, revalidator)),
            image_service: Arc::new(ImageManager::new(images)),
            transaction_service: Arc::new(TransactionManager::new(transactions)),
            connection,
        }
    }

    /// Build services from configuration, connecting the page cache if one is set.
    pub async fn from_config(config: &DataServiceConfig) -> AppResult<Self> {
        let connection = Arc::new(ConnectionCache::from_config(&config.database));

        let revalidator: Arc<dyn Revalidator> = match &config.cache.url {
            Some(url) => Arc::new(RedisRevalidator::connect(url).await?),
            None => {
                info!("REDIS_URL not set, page revalidation disabled");
                Arc::new(NoopRevalidator)
            }
        };

        Ok(Self::new(connection, revalidator))
    }

    /// Shared connection cache
    pub fn connection(&self) -> Arc<ConnectionCache> {
        self.connection.clone()
    }
}

impl ServiceContainer for Services {
    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn images(&self) -> Arc<dyn ImageService> {
        self.image_service.clone()
    }

    fn transactions(&self) -> Arc<dyn TransactionService> {
        self.transaction_service.clone()
    }

    fn database_connected(&self) -> bool {
        self.connection.is_connected()
    }
}
