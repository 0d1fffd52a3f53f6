//! User account handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use estatehub_entity::user::User;
use estatehub_service::AuthSession;

use crate::dto::request::{LoginRequest, RegisterRequest, UpdateUserBody};
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::{AdminUser, ApiJson, AuthUser, parse_uuid};
use crate::state::AppState;

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthSession>), ApiError> {
    let session = state.users.register(req.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthSession>, ApiError> {
    let (email, password) = req.credentials()?;
    Ok(Json(state.users.login(&email, &password).await?))
}

/// GET /api/users/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.me(&auth).await?))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list(&admin).await?))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_uuid(&id)?;
    Ok(Json(state.users.get(&auth, id).await?))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateUserBody>,
) -> Result<Json<User>, ApiError> {
    let id = parse_uuid(&id)?;
    let user = state.users.update(&auth, id, body.into_input()?).await?;
    Ok(Json(user))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_uuid(&id)?;
    state.users.delete(&admin, id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
