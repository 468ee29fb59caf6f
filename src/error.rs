use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::AuthError;
use crate::users::store::StoreError;

/// Per-request error outcomes of the core operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A submitted field broke one of the creation rules.
    #[error("{field}: {rule}")]
    Validation {
        field: &'static str,
        rule: &'static str,
    },
    #[error("email already registered")]
    EmailTaken,
    /// Unknown email and wrong password collapse into this on purpose.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Auth-gate rejection; the inner reason stays server-side.
    #[error("forbidden")]
    Forbidden(#[from] AuthError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmailTaken => ApiError::EmailTaken,
            StoreError::Other(e) => ApiError::Internal(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation { field, rule } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "validation failed", "field": field, "rule": rule }),
            ),
            ApiError::EmailTaken => (
                StatusCode::CONFLICT,
                json!({ "error": "email already registered" }),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "invalid credentials" }),
            ),
            ApiError::Forbidden(reason) => {
                warn!(%reason, "request rejected by auth gate");
                (StatusCode::FORBIDDEN, json!({ "error": "forbidden" }))
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
