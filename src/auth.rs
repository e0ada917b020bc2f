use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    config::Config,
    entities::user,
    error::{ApiError, ApiResult},
};

const MIN_PASSWORD_LEN: usize = 8;

/// Credential-strength policy applied at registration.
pub fn validate_password(password: &str) -> Result<(), Vec<String>> {
    let mut violations = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        violations.push(format!(
            "This password is too short. It must contain at least {MIN_PASSWORD_LEN} characters."
        ));
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        violations.push("This password is entirely numeric.".to_string());
    }
    if violations.is_empty() { Ok(()) } else { Err(violations) }
}

pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow::anyhow!("password hashing failed: {err}"))?;
    Ok(hash.to_string())
}

pub fn verify_password(hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: i32,
    pub exp: i64,
    pub iat: i64,
    pub token_type: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

pub fn issue_token_pair(config: &Config, user_id: i32) -> ApiResult<TokenPair> {
    Ok(TokenPair {
        refresh: issue_token(config, user_id, "refresh", config.refresh_ttl_secs)?,
        access: issue_access_token(config, user_id)?,
    })
}

pub fn issue_access_token(config: &Config, user_id: i32) -> ApiResult<String> {
    issue_token(config, user_id, "access", config.access_ttl_secs)
}

fn issue_token(config: &Config, user_id: i32, token_type: &str, ttl_secs: i64) -> ApiResult<String> {
    let now = jiff::Timestamp::now().as_second();
    let claims = Claims {
        sub: user_id,
        exp: now + ttl_secs,
        iat: now,
        token_type: token_type.to_string(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|err| anyhow::anyhow!("token signing failed: {err}").into())
}

pub fn decode_token(config: &Config, token: &str, expected_type: &str) -> ApiResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| ApiError::Unauthorized("Given token not valid for any token type".to_string()))?;

    if data.claims.token_type != expected_type {
        return Err(ApiError::Unauthorized(format!("Token has wrong type, expected '{expected_type}'")));
    }
    Ok(data.claims)
}

/// The authenticated actor of a request. Rejects with 401 when the bearer
/// token is missing or invalid.
pub struct CurrentUser(pub user::Model);

/// Actor identity for endpoints open to anonymous callers. A missing header
/// yields `None`; a present but invalid token is still rejected.
pub struct MaybeUser(pub Option<user::Model>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts.headers.get(AUTHORIZATION)?.to_str().ok()?.strip_prefix("Bearer ")
}

async fn resolve_user(state: &AppState, token: &str) -> ApiResult<user::Model> {
    let claims = decode_token(&state.config, token, "access")?;
    user::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Err(ApiError::Unauthorized(
                "Authentication credentials were not provided.".to_string(),
            ));
        };
        Ok(Self(resolve_user(state, token).await?))
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts) {
            Some(token) => Ok(Self(Some(resolve_user(state, token).await?))),
            None => Ok(Self(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_rejected() {
        let violations = validate_password("abc12").unwrap_err();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("too short"));
    }

    #[test]
    fn numeric_password_rejected() {
        let violations = validate_password("1234").unwrap_err();
        assert_eq!(violations.len(), 2);
        assert!(violations[1].contains("entirely numeric"));
    }

    #[test]
    fn strong_password_accepted() {
        assert!(validate_password("correct horse battery").is_ok());
    }

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("open sesame").unwrap();
        assert!(verify_password(&hash, "open sesame"));
        assert!(!verify_password(&hash, "open says me"));
    }
}
