//! Subscription ledger handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use estatehub_core::AppError;
use estatehub_entity::subscription::{PlanQuote, Subscription};
use estatehub_service::subscription::SubscriptionWithUser;

use crate::dto::request::SubscriptionRequest;
use crate::dto::response::{CancelResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AdminUser, ApiJson, AuthUser, parse_uuid};
use crate::state::AppState;

/// GET /api/user-subscriptions/current
pub async fn current(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Subscription>, ApiError> {
    let sub = state
        .ledger
        .get_any(auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("No subscription found"))?;
    Ok(Json(sub))
}

/// POST /api/user-subscriptions
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<SubscriptionRequest>,
) -> Result<(StatusCode, Json<Subscription>), ApiError> {
    let (plan, cycle) = req.selection()?;
    let sub = state.ledger.create(auth.user_id, plan, cycle).await?;
    Ok((StatusCode::CREATED, Json(sub)))
}

/// PUT /api/user-subscriptions
pub async fn change_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<SubscriptionRequest>,
) -> Result<Json<Subscription>, ApiError> {
    let (plan, cycle) = req.selection()?;
    Ok(Json(state.ledger.change_plan(auth.user_id, plan, cycle).await?))
}

/// DELETE /api/user-subscriptions
pub async fn cancel(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CancelResponse>, ApiError> {
    let subscription = state.ledger.cancel(auth.user_id).await?;
    Ok(Json(CancelResponse {
        message: "Subscription cancelled successfully",
        subscription,
    }))
}

/// POST /api/user-subscriptions/ensure
pub async fn ensure(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Subscription>, ApiError> {
    Ok(Json(state.ledger.ensure_subscription(auth.user_id).await?))
}

/// GET /api/user-subscriptions/plans
pub async fn plans(State(state): State<AppState>) -> Json<Vec<PlanQuote>> {
    Json(state.ledger.plans())
}

/// GET /api/user-subscriptions/all
pub async fn list_all(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<SubscriptionWithUser>>, ApiError> {
    Ok(Json(state.ledger.list_all_with_users().await?))
}

/// GET /api/user-subscriptions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Subscription>, ApiError> {
    let id = parse_uuid(&id)?;
    Ok(Json(state.ledger.get_by_id(id).await?))
}

/// DELETE /api/user-subscriptions/{id}
pub async fn delete_by_id(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_uuid(&id)?;
    state.ledger.delete_by_id(id).await?;
    Ok(Json(MessageResponse::new("Subscription deleted")))
}
