//! Domain layer - Core records and value objects.
//!
//! This crate contains the record shapes persisted by the data service
//! (users, images, payment transactions) and the inputs used to create or
//! modify them. It has no infrastructure dependencies.

pub mod constants;
pub mod error;
pub mod image;
pub mod transaction;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use image::{CreateImage, Image, TransformationConfig, TransformationType};
pub use transaction::{CreateTransaction, Transaction};
pub use user::{CreateUser, UpdateUser, User};
