//! Authentication middleware.
//!
//! Every request passes through [`auth_middleware`]. Static assets and
//! framework internals are skipped, routes matching a public pattern go
//! through untouched, and everything else needs a valid bearer token.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use common::{AppError, AppResult, JwtConfig};

use crate::state::AppState;

/// How the gate treats a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Not handled by the gate at all
    Skip,
    /// Allowed without a token
    Public,
    /// Requires a verified token
    Protected,
}

/// Decides which paths require authentication.
#[derive(Debug, Clone)]
pub struct RouteGate {
    public: RegexSet,
    skipped: Regex,
    always_checked: Regex,
}

impl RouteGate {
    /// Build a gate from public route patterns.
    pub fn new<I, S>(public_routes: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            public: RegexSet::new(public_routes)?,
            skipped: Regex::new(r"^/(?:_next|.+\.\w+$)")?,
            always_checked: Regex::new(r"^/(?:api|trpc)(?:/|$)")?,
        })
    }

    /// Classify a request path.
    pub fn access(&self, path: &str) -> Access {
        if !self.always_checked.is_match(path) && self.skipped.is_match(path) {
            return Access::Skip;
        }
        if self.public.is_match(path) {
            Access::Public
        } else {
            Access::Protected
        }
    }
}

/// Claims carried by identity tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Identity-provider user ID
    pub sub: String,
    /// Expiry as a unix timestamp
    pub exp: u64,
    /// Session ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}

/// Current authenticated user extracted from the token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub clerk_id: String,
    pub session_id: Option<String>,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            clerk_id: claims.sub,
            session_id: claims.sid,
        }
    }
}

/// Verify an HS256 token and return its claims.
pub fn verify_token(config: &JwtConfig, token: &str) -> AppResult<Claims> {
    if config.secret.is_empty() {
        return Err(AppError::configuration("JWT_SECRET is not set"));
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = config.leeway_seconds;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    if data.claims.sub.is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(data.claims)
}

/// Authentication middleware that validates bearer tokens on protected routes.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let access = state.gate.access(request.uri().path());
    if access != Access::Protected {
        debug!(path = request.uri().path(), ?access, "Auth check bypassed");
        return Ok(next.run(request).await);
    }

    let token = extract_token(&request)?;
    let claims = verify_token(&state.config.jwt, token)?;

    request.extensions_mut().insert(CurrentUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract bearer token from Authorization header.
fn extract_token(request: &Request<Body>) -> AppResult<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    use crate::config::DEFAULT_PUBLIC_ROUTES;

    fn gate() -> RouteGate {
        RouteGate::new(DEFAULT_PUBLIC_ROUTES).unwrap()
    }

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            leeway_seconds: 0,
        }
    }

    fn token(secret: &str, sub: &str, exp_offset: i64) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp: (chrono::Utc::now().timestamp() + exp_offset) as u64,
            sid: Some("sess_1".to_string()),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn webhooks_are_public() {
        let gate = gate();
        assert_eq!(gate.access("/api/webhooks"), Access::Public);
        assert_eq!(gate.access("/api/webhooks/identity"), Access::Public);
        assert_eq!(gate.access("/api/webhooks/payments"), Access::Public);
    }

    #[test]
    fn other_routes_are_protected() {
        let gate = gate();
        assert_eq!(gate.access("/"), Access::Protected);
        assert_eq!(gate.access("/profile"), Access::Protected);
        assert_eq!(gate.access("/api/users/me"), Access::Protected);
        assert_eq!(gate.access("/trpc/users"), Access::Protected);
    }

    #[test]
    fn assets_and_framework_paths_are_skipped() {
        let gate = gate();
        assert_eq!(gate.access("/favicon.ico"), Access::Skip);
        assert_eq!(gate.access("/assets/logo.svg"), Access::Skip);
        assert_eq!(gate.access("/_next/static/chunk.js"), Access::Skip);
    }

    #[test]
    fn api_paths_with_extensions_are_still_checked() {
        assert_eq!(gate().access("/api/export.json"), Access::Protected);
    }

    #[test]
    fn verify_token_returns_subject() {
        let claims = verify_token(&jwt_config(), &token("test-secret", "user_1", 300)).unwrap();

        assert_eq!(claims.sub, "user_1");
        assert_eq!(CurrentUser::from(claims).session_id.as_deref(), Some("sess_1"));
    }

    #[test]
    fn verify_token_rejects_wrong_secret_and_expired() {
        let config = jwt_config();

        let err = verify_token(&config, &token("other", "user_1", 300)).unwrap_err();
        assert_eq!(err.kind(), common::ErrorKind::Auth);

        let err = verify_token(&config, &token("test-secret", "user_1", -300)).unwrap_err();
        assert_eq!(err.kind(), common::ErrorKind::Auth);
    }

    #[test]
    fn verify_token_without_secret_is_misconfiguration() {
        let err = verify_token(&JwtConfig::default(), "anything").unwrap_err();
        assert_eq!(err.kind(), common::ErrorKind::Configuration);
    }
}
