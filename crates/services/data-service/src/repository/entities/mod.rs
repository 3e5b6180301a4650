//! SeaORM entities for the persisted records.

pub mod image;
pub mod transaction;
pub mod user;
