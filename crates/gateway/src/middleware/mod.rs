//! Request authentication.

mod auth;

pub use auth::{auth_middleware, verify_token, Access, Claims, CurrentUser, RouteGate};
