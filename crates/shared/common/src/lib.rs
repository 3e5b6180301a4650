//! Common utilities shared by the data service and the gateway.
//!
//! This crate provides:
//! - Unified error handling with an explicit error kind
//! - Configuration structures loaded from the environment

pub mod config;
pub mod error;

pub use config::*;
pub use error::{handle_error, AppError, AppResult, ErrorKind, OptionExt};
