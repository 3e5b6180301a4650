//! Infrastructure layer - database connection and web-layer hooks.

mod connection;
pub mod migrations;
mod revalidate;

pub use connection::{ConnectionCache, Connector, SeaOrmConnector};
pub use migrations::Migrator;
pub use revalidate::{NoopRevalidator, RedisRevalidator, Revalidator};

#[cfg(any(test, feature = "test-utils"))]
pub use connection::MockConnector;
#[cfg(any(test, feature = "test-utils"))]
pub use revalidate::MockRevalidator;
