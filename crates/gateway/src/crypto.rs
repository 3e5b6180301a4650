//! Webhook signature checks.
//!
//! The identity provider signs the raw request body with HMAC-SHA256 over a
//! shared secret and puts the hex digest in [`SIGNATURE_HEADER`], optionally
//! prefixed with `sha256=`.
//!
//! The payment processor sends [`PAYMENT_SIGNATURE_HEADER`] as
//! `t=<unix seconds>,v1=<hex>[,v1=<hex>...]`, where each `v1` digest covers
//! `"{t}.{body}"`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use common::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Header carrying the payment processor's timestamped signature
pub const PAYMENT_SIGNATURE_HEADER: &str = "stripe-signature";

/// Maximum age of a timestamped signature, in seconds
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

const SIGNATURE_PREFIX: &str = "sha256=";

/// Hex-encoded HMAC-SHA256 of `body` under `secret`.
pub fn sign(secret: &str, body: &str) -> AppResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| AppError::configuration("webhook secret cannot be used as an HMAC key"))?;
    mac.update(body.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a signature header value against the body.
pub fn verify_signature(secret: &str, body: &str, signature: &str) -> AppResult<()> {
    let provided = signature
        .trim()
        .strip_prefix(SIGNATURE_PREFIX)
        .unwrap_or_else(|| signature.trim());
    let expected = sign(secret, body)?;

    if constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

/// Check a `t=...,v1=...` header against the body at time `now`.
pub fn verify_timestamped_signature(
    secret: &str,
    body: &str,
    header: &str,
    now: i64,
) -> AppResult<()> {
    let mut timestamp: Option<&str> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", ts)) => timestamp = Some(ts),
            Some(("v1", sig)) => signatures.push(sig),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(AppError::Unauthorized)?;
    let issued_at: i64 = timestamp.parse().map_err(|_| AppError::Unauthorized)?;
    if (now - issued_at).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(AppError::Unauthorized);
    }

    let expected = sign(secret, &format!("{}.{}", timestamp, body))?;
    if signatures
        .iter()
        .any(|sig| constant_time_eq(sig.as_bytes(), expected.as_bytes()))
    {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
