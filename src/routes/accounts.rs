use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, auth,
    db::now_sec,
    entities::user,
    error::{ApiError, ApiResult},
};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<auth::TokenPair>)> {
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_string();
    let password = req.password.trim().to_string();

    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest("All fields are required".to_string()));
    }

    auth::validate_password(&password).map_err(ApiError::PasswordPolicy)?;

    let taken = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await?
        .is_some();
    if taken {
        return Err(ApiError::BadRequest("Username already exists".to_string()));
    }

    let model = user::ActiveModel {
        username: Set(username),
        email: Set(email),
        password_hash: Set(auth::hash_password(&password)?),
        date_joined: Set(now_sec()),
        ..Default::default()
    };

    // The username column is unique, so a concurrent signup loses here even
    // though the pre-check passed.
    let created = match model.insert(&state.db).await {
        Ok(created) => created,
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(ApiError::BadRequest("Username already exists".to_string()));
        },
        Err(err) => return Err(err.into()),
    };

    tracing::debug!(user_id = created.id, username = %created.username, "user registered");

    let pair = auth::issue_token_pair(&state.config, created.id)?;
    Ok((StatusCode::CREATED, Json(pair)))
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub async fn token(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TokenRequest>,
) -> ApiResult<Json<auth::TokenPair>> {
    let user = user::Entity::find()
        .filter(user::Column::Username.eq(req.username.trim()))
        .one(&state.db)
        .await?;

    let Some(user) = user.filter(|u| auth::verify_password(&u.password_hash, &req.password)) else {
        return Err(ApiError::Unauthorized(
            "No active account found with the given credentials".to_string(),
        ));
    };

    let pair = auth::issue_token_pair(&state.config, user.id)?;
    Ok(Json(pair))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    refresh: String,
}

pub async fn token_refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<Value>> {
    let claims = auth::decode_token(&state.config, &req.refresh, "refresh")?;
    let access = auth::issue_access_token(&state.config, claims.sub)?;
    Ok(Json(json!({ "access": access })))
}
