//! Invalidation of cached page renderings held by the web layer.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, RedisError};
use tracing::{debug, info};

use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Cache key prefix for rendered pages
const CACHE_PREFIX_PAGE: &str = "page:";

/// Cache key prefix for the last revalidation time of a path
const CACHE_PREFIX_REVALIDATED: &str = "revalidated:";

/// Marks rendered routes as stale so the web layer regenerates them.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Revalidator: Send + Sync {
    /// Mark the rendering of `path` as stale
    async fn revalidate_path(&self, path: &str) -> AppResult<()>;
}

/// Revalidator used when no page cache is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRevalidator;

#[async_trait]
impl Revalidator for NoopRevalidator {
    async fn revalidate_path(&self, path: &str) -> AppResult<()> {
        debug!(path, "No page cache configured, skipping revalidation");
        Ok(())
    }
}

/// Redis-backed revalidator shared with the web layer's page cache.
#[derive(Clone)]
pub struct RedisRevalidator {
    conn: ConnectionManager,
}

impl RedisRevalidator {
    /// Connect to Redis.
    pub async fn connect(url: &str) -> Result<Self, RedisError> {
        debug!("Connecting to Redis at {}", url);
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("Page cache connected");
        Ok(Self { conn })
    }
}

#[async_trait]
impl Revalidator for RedisRevalidator {
    async fn revalidate_path(&self, path: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let page_key = format!("{}{}", CACHE_PREFIX_PAGE, path);
        let marker_key = format!("{}{}", CACHE_PREFIX_REVALIDATED, path);

        let _: () = redis::pipe()
            .atomic()
            .del(&page_key)
            .ignore()
            .set(&marker_key, chrono::Utc::now().timestamp_millis())
            .ignore()
            .query_async(&mut conn)
            .await?;

        debug!(path, "Page marked stale");
        Ok(())
    }
}
