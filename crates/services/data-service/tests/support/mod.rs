//! Shared helpers for data service integration tests.
//!
//! Every helper call creates a fresh in-memory SQLite database.

#![allow(dead_code)]

use std::sync::Arc;

use common::DatabaseConfig;
use data_service_lib::infra::{ConnectionCache, NoopRevalidator};
use data_service_lib::Services;
use domain::CreateUser;

/// Connection cache pointing at a private in-memory database.
pub fn sqlite_cache() -> Arc<ConnectionCache> {
    Arc::new(ConnectionCache::from_config(&DatabaseConfig::with_url(
        "sqlite::memory:",
    )))
}

/// All services over a fresh database, with revalidation disabled.
pub fn setup_services() -> Services {
    Services::new(sqlite_cache(), Arc::new(NoopRevalidator))
}

/// User input with values derived from the identity key.
pub fn new_user(clerk_id: &str) -> CreateUser {
    CreateUser {
        clerk_id: clerk_id.to_string(),
        email: format!("{}@example.com", clerk_id),
        username: format!("{}_name", clerk_id),
        photo: format!("https://img.example.com/{}.png", clerk_id),
        first_name: Some("Grace".to_string()),
        last_name: Some("Hopper".to_string()),
    }
}
