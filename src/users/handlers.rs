use axum::{
    extract::{FromRef, State},
    http::{header, HeaderName, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use tracing::{debug, instrument};

use super::dto::{CreateUserRequest, LoginRequest, UserRest};
use super::service;
use crate::auth::extractors::AuthUser;
use crate::auth::jwt::JwtKeys;
use crate::auth::USER_ID_HEADER;
use crate::error::ApiError;
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route("/users/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<UserRest>, ApiError> {
    let user = service::create_user(state.store.as_ref(), payload).await?;
    Ok(Json(UserRest::from(user)))
}

/// On success the body is empty; the token travels in the Authorization
/// response header and the user id in the UserID header.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let (token, user_id) =
        service::login(state.store.as_ref(), &keys, &payload.email, &payload.password).await?;

    let headers = [
        (header::AUTHORIZATION, format!("Bearer {token}")),
        (HeaderName::from_static(USER_ID_HEADER), user_id.to_string()),
    ];
    Ok((StatusCode::OK, headers))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<UserRest>>, ApiError> {
    let users = service::list_users(state.store.as_ref()).await?;
    debug!(requested_by = %user_id, count = users.len(), "users listed");
    Ok(Json(users.into_iter().map(UserRest::from).collect()))
}
