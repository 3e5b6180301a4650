//! Application services layer - use cases over the repositories.
//!
//! Services validate input, call repositories, and log every failure at
//! the operation boundary before returning it.

pub mod container;
mod image_service;
mod transaction_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use image_service::{ImageManager, ImageService};
pub use transaction_service::{TransactionManager, TransactionService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use image_service::MockImageService;
#[cfg(any(test, feature = "test-utils"))]
pub use transaction_service::MockTransactionService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
