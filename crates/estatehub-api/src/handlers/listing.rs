//! Listing handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use estatehub_entity::listing::Listing;
use estatehub_storage::staging::discard_all;

use crate::dto::form::ListingForm;
use crate::dto::listing::{listing_patch, new_listing};
use crate::dto::query::ListingQueryParams;
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_uuid};
use crate::state::AppState;

/// POST /api/listings
pub async fn create_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    form: ListingForm,
) -> Result<(StatusCode, Json<Listing>), ApiError> {
    let input = match new_listing(&form.fields) {
        Ok(input) => input,
        Err(e) => {
            discard_all(&form.files).await;
            return Err(e.into());
        }
    };
    let listing = state.listings.create(&auth, input, form.files).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// GET /api/listings
pub async fn list_listings(
    State(state): State<AppState>,
    Query(params): Query<ListingQueryParams>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    let query = params.into_query()?;
    Ok(Json(state.listings.list(&query).await?))
}

/// GET /api/listings/{id}
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Listing>, ApiError> {
    let id = parse_uuid(&id)?;
    Ok(Json(state.listings.get(id).await?))
}

/// PUT /api/listings/{id}
pub async fn update_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    form: ListingForm,
) -> Result<Json<Listing>, ApiError> {
    let parsed = parse_uuid(&id).and_then(|id| Ok((id, listing_patch(&form.fields)?)));
    let (id, patch) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => {
            discard_all(&form.files).await;
            return Err(e.into());
        }
    };
    let listing = state.listings.update(&auth, id, patch, form.files).await?;
    Ok(Json(listing))
}

/// DELETE /api/listings/{id}
pub async fn delete_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_uuid(&id)?;
    state.listings.delete(&auth, id).await?;
    Ok(Json(MessageResponse::new("Listing deleted")))
}
