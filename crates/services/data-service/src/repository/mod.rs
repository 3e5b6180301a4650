//! Repository layer for data access.
//!
//! Every repository method obtains the shared connection from
//! [`ConnectionCache`](crate::infra::ConnectionCache) before touching the store.

pub mod entities;
mod image_repository;
mod transaction_repository;
mod user_repository;

pub use image_repository::{ImageRepository, ImageStore};
pub use transaction_repository::{RecordedPurchase, TransactionRepository, TransactionStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use image_repository::MockImageRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use transaction_repository::MockTransactionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
