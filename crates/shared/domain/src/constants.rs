//! Domain-level constants.
//!
//! These constants define record defaults and web-layer paths.

// =============================================================================
// Users
// =============================================================================

/// Plan assigned to newly created users
pub const DEFAULT_PLAN_ID: i32 = 1;

/// Credits granted to newly created users
pub const DEFAULT_CREDIT_BALANCE: i64 = 10;

// =============================================================================
// Web layer
// =============================================================================

/// Route whose cached rendering depends on user records
pub const HOME_PATH: &str = "/";
