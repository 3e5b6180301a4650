//! HTTP handlers.

mod health_handler;
mod image_handler;
mod user_handler;
mod webhook_handler;

pub use health_handler::{health_check, health_routes, HealthResponse};
pub use image_handler::image_routes;
pub use user_handler::user_routes;
pub use webhook_handler::{webhook_routes, WebhookResponse};
