use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{
    config::{AppConfig, Env},
    error::AppError,
    models::User,
    policy::Identity,
    repository::UserStoreState,
};

/// Header accepted in `Env::Local` in place of a bearer token.
pub const DEV_USER_HEADER: &str = "x-user-id";

/// Claims
///
/// The payload expected inside a bearer token issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the numeric id of the user in the `users` table.
    pub sub: i64,
    /// Expiration time (seconds since the epoch). Always validated.
    pub exp: usize,
    /// Issued at.
    pub iat: usize,
}

impl Claims {
    pub fn new(sub: i64, ttl: Duration) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let now = usize::try_from(now).unwrap_or(usize::MAX);
        let ttl = usize::try_from(ttl.as_secs()).unwrap_or(usize::MAX);
        Self {
            sub,
            exp: now.saturating_add(ttl),
            iat: now,
        }
    }
}

/// Signs `claims` with the shared HS256 secret.
pub fn issue_token(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn identity_of(user: User) -> Identity {
    Identity::new(user.id, user.username, user.roles)
}

/// Identity Extractor Implementation
///
/// Resolves the caller of an authenticated request. Handlers take `Identity` as an
/// argument; a missing or invalid credential rejects the request with 401 before the
/// handler body runs.
///
/// 1. In `Env::Local`, an `x-user-id` header naming an existing user is accepted.
/// 2. Otherwise a `Bearer` JWT is decoded with the configured secret (expiry enforced).
/// 3. The subject is looked up in the user store, so deleted accounts are rejected and
///    the role set is always current.
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    UserStoreState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let users = UserStoreState::from_ref(state);
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            let dev_user = parts
                .headers
                .get(DEV_USER_HEADER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<i64>().ok());
            if let Some(user_id) = dev_user {
                if let Some(user) = users.find_by_id(user_id).await? {
                    tracing::debug!(user_id, "resolved identity from development header");
                    return Ok(identity_of(user));
                }
            }
        }

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(AppError::unauthorized)?;

        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => tracing::debug!("rejected expired token"),
                other => tracing::debug!(reason = ?other, "rejected invalid token"),
            }
            AppError::unauthorized()
        })?;

        let user_id = token_data.claims.sub;
        let user = users.find_by_id(user_id).await?.ok_or_else(|| {
            tracing::debug!(user_id, "token subject no longer exists");
            AppError::unauthorized()
        })?;

        Ok(identity_of(user))
    }
}
