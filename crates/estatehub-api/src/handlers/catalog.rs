//! Plan catalog handlers. Reads are public.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use estatehub_entity::catalog::{CreateSubscriptionPlan, SubscriptionPlan, UpdateSubscriptionPlan};

use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::{AdminUser, ApiJson, parse_uuid};
use crate::state::AppState;

/// GET /api/subscriptions
pub async fn list_plans(
    State(state): State<AppState>,
) -> Result<Json<Vec<SubscriptionPlan>>, ApiError> {
    Ok(Json(state.catalog.list().await?))
}

/// GET /api/subscriptions/{id}
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SubscriptionPlan>, ApiError> {
    let id = parse_uuid(&id)?;
    Ok(Json(state.catalog.get(id).await?))
}

/// POST /api/subscriptions
pub async fn create_plan(
    State(state): State<AppState>,
    admin: AdminUser,
    ApiJson(input): ApiJson<CreateSubscriptionPlan>,
) -> Result<(StatusCode, Json<SubscriptionPlan>), ApiError> {
    let plan = state.catalog.create(&admin, input).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// PUT /api/subscriptions/{id}
pub async fn update_plan(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<UpdateSubscriptionPlan>,
) -> Result<Json<SubscriptionPlan>, ApiError> {
    let id = parse_uuid(&id)?;
    Ok(Json(state.catalog.update(&admin, id, update).await?))
}

/// DELETE /api/subscriptions/{id}
pub async fn delete_plan(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_uuid(&id)?;
    state.catalog.delete(&admin, id).await?;
    Ok(Json(MessageResponse::new("Plan deleted")))
}
