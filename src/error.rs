use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Request-terminal error taxonomy. The `error`/`detail` body key split
/// mirrors the public contract and is intentional.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    BadRequestDetail(String),
    #[error("password does not satisfy the strength policy")]
    PasswordPolicy(Vec<String>),
    #[error("invalid input")]
    Fields(Vec<(&'static str, &'static str)>),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    ForbiddenDetail(String),
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    NotFoundMessage(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            Self::BadRequestDetail(msg) => (StatusCode::BAD_REQUEST, json!({ "detail": msg })),
            Self::PasswordPolicy(violations) => {
                (StatusCode::BAD_REQUEST, json!({ "error": violations }))
            },
            Self::Fields(fields) => {
                let map: serde_json::Map<String, serde_json::Value> = fields
                    .into_iter()
                    .map(|(field, msg)| (field.to_string(), json!([msg])))
                    .collect();
                (StatusCode::BAD_REQUEST, serde_json::Value::Object(map))
            },
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "detail": msg })),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            Self::ForbiddenDetail(msg) => (StatusCode::FORBIDDEN, json!({ "detail": msg })),
            Self::NotFound => (StatusCode::NOT_FOUND, json!({ "detail": "Not found." })),
            Self::NotFoundMessage(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            Self::Internal(err) => {
                tracing::error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "detail": "Internal server error." }))
            },
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
