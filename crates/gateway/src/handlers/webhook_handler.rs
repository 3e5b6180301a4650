//! Webhook handlers for the identity provider and the payment processor.
//!
//! Both endpoints are public routes; authenticity comes from the body
//! signature instead of a bearer token. When no secret is configured the
//! check is skipped with a warning, which is only meant for local setups.
//! Payment events carry a timestamped signature, see [`crate::crypto`].

use std::collections::HashMap;

use axum::{
    extract::State,
    http::HeaderMap,
    response::Json,
    routing::post,
    Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{CreateTransaction, CreateUser, Transaction, UpdateUser, User};

use crate::crypto::{
    verify_signature, verify_timestamped_signature, PAYMENT_SIGNATURE_HEADER, SIGNATURE_HEADER,
};
use crate::state::AppState;

/// Webhook response.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WebhookResponse {
    /// Whether the event was accepted
    pub received: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Transaction>,
}

impl WebhookResponse {
    fn received() -> Self {
        Self {
            received: true,
            ..Default::default()
        }
    }

    fn with_user(user: Option<User>) -> Self {
        Self {
            received: true,
            user,
            ..Default::default()
        }
    }
}

/// Create webhook routes
pub fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/identity", post(identity_webhook))
        .route("/payments", post(payment_webhook))
}

/// Identity-provider event envelope.
#[derive(Debug, Deserialize)]
pub struct IdentityEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: serde_json::Value,
}

/// User object sent with `user.created` and `user.updated`.
#[derive(Debug, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    pub image_url: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

/// Object sent with `user.deleted`.
#[derive(Debug, Deserialize)]
pub struct DeletedObject {
    pub id: Option<String>,
}

impl IdentityUser {
    fn into_create(self) -> AppResult<CreateUser> {
        let email = self
            .email_addresses
            .into_iter()
            .next()
            .map(|e| e.email_address)
            .ok_or_else(|| AppError::validation("user has no email address"))?;

        Ok(CreateUser {
            clerk_id: self.id,
            email,
            username: self.username.unwrap_or_default(),
            photo: self.image_url.unwrap_or_default(),
            first_name: self.first_name,
            last_name: self.last_name,
        })
    }

    fn into_update(self) -> (String, UpdateUser) {
        let update = UpdateUser {
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
            photo: self.image_url,
        };
        (self.id, update)
    }
}

/// Handle identity-provider user lifecycle events.
pub async fn identity_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<WebhookResponse>> {
    check_signature(
        state.config.identity_webhook_secret.as_deref(),
        &headers,
        SIGNATURE_HEADER,
        "identity",
        |secret, signature| verify_signature(secret, &body, signature),
    )?;

    let event: IdentityEvent = parse_json(&body)?;
    info!(event_type = %event.event_type, "Received identity webhook");

    let users = state.services.users();
    let response = match event.event_type.as_str() {
        "user.created" => {
            let data: IdentityUser = parse_value(event.data)?;
            let user = users.create_user(data.into_create()?).await?;
            WebhookResponse::with_user(Some(user))
        }
        "user.updated" => {
            let data: IdentityUser = parse_value(event.data)?;
            let (clerk_id, update) = data.into_update();
            let user = users.update_user(&clerk_id, update).await?;
            WebhookResponse::with_user(Some(user))
        }
        "user.deleted" => {
            let data: DeletedObject = parse_value(event.data)?;
            let clerk_id = data
                .id
                .ok_or_else(|| AppError::validation("deleted event carries no user id"))?;
            WebhookResponse::with_user(users.delete_user(&clerk_id).await?)
        }
        other => {
            debug!(event_type = other, "Unhandled identity event");
            WebhookResponse::received()
        }
    };

    Ok(Json(response))
}

/// Payment-processor event envelope.
#[derive(Debug, Deserialize)]
pub struct PaymentEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: PaymentEventData,
}

#[derive(Debug, Deserialize)]
pub struct PaymentEventData {
    pub object: serde_json::Value,
}

/// Completed checkout session.
///
/// Purchase details travel in `metadata` as strings: `plan`, `credits`
/// and `buyerId`.
#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Total in minor currency units
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    fn into_transaction(self) -> AppResult<CreateTransaction> {
        let credits = self
            .metadata
            .get("credits")
            .map(|c| c.parse::<i64>())
            .transpose()
            .map_err(|_| AppError::validation("credits metadata is not a number"))?;
        let buyer_id = self
            .metadata
            .get("buyerId")
            .map(|b| Uuid::parse_str(b))
            .transpose()
            .map_err(|_| AppError::validation("buyerId metadata is not a UUID"))?;

        Ok(CreateTransaction {
            stripe_id: self.id,
            amount: self.amount_total.unwrap_or(0),
            plan: self.metadata.get("plan").cloned(),
            credits,
            buyer_id,
        })
    }
}

/// Handle payment-processor events.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<WebhookResponse>> {
    check_signature(
        state.config.payment_webhook_secret.as_deref(),
        &headers,
        PAYMENT_SIGNATURE_HEADER,
        "payments",
        |secret, signature| {
            verify_timestamped_signature(secret, &body, signature, Utc::now().timestamp())
        },
    )?;

    let event: PaymentEvent = parse_json(&body)?;
    info!(event_type = %event.event_type, event_id = %event.id, "Received payment webhook");

    if event.event_type != "checkout.session.completed" {
        debug!(event_type = %event.event_type, "Unhandled payment event");
        return Ok(Json(WebhookResponse::received()));
    }

    let session: CheckoutSession = parse_value(event.data.object)?;
    let input = session.into_transaction()?;
    let stripe_id = input.stripe_id.clone();

    match state.services.transactions().record_purchase(input).await {
        Ok(transaction) => Ok(Json(WebhookResponse {
            received: true,
            transaction: Some(transaction),
            ..Default::default()
        })),
        // Redelivery of an event that was already stored
        Err(AppError::Conflict(_)) => {
            info!(stripe_id = %stripe_id, "Checkout session already recorded");
            Ok(Json(WebhookResponse::received()))
        }
        Err(e) => Err(e),
    }
}

fn check_signature<F>(
    secret: Option<&str>,
    headers: &HeaderMap,
    header: &'static str,
    source: &'static str,
    verify: F,
) -> AppResult<()>
where
    F: FnOnce(&str, &str) -> AppResult<()>,
{
    let Some(secret) = secret else {
        warn!(source, "Webhook secret not configured, skipping signature verification");
        return Ok(());
    };

    let signature = headers
        .get(header)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            warn!(source, header, "Webhook signature missing");
            AppError::Unauthorized
        })?;

    verify(secret, signature).map_err(|e| {
        warn!(source, "Invalid webhook signature");
        e
    })
}

fn parse_json<T: DeserializeOwned>(body: &str) -> AppResult<T> {
    serde_json::from_str(body).map_err(|e| AppError::validation(format!("invalid payload: {}", e)))
}

fn parse_value<T: DeserializeOwned>(value: serde_json::Value) -> AppResult<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::validation(format!("invalid payload: {}", e)))
}
