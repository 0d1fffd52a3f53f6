//! Route definitions for the EstateHub HTTP API.
//!
//! All routes are organized by resource and mounted under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware::logging::request_logging;
use crate::state::AppState;

/// Build the router with every route, the body limit and request logging.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    let api_routes = Router::new()
        .merge(user_routes())
        .merge(listing_routes())
        .merge(subscription_routes())
        .merge(catalog_routes())
        .merge(admin_routes())
        .route("/health", get(handlers::health::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

/// Registration, login and user administration
fn user_routes() -> Router<AppState> {
    use handlers::user;
    Router::new()
        .route("/users/register", post(user::register))
        .route("/users/login", post(user::login))
        .route("/users/me", get(user::me))
        .route("/users", get(user::list_users))
        .route(
            "/users/{id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
}

/// Listing CRUD and search
fn listing_routes() -> Router<AppState> {
    use handlers::listing;
    Router::new()
        .route(
            "/listings",
            get(listing::list_listings).post(listing::create_listing),
        )
        .route(
            "/listings/{id}",
            get(listing::get_listing)
                .put(listing::update_listing)
                .delete(listing::delete_listing),
        )
}

/// The caller's subscription and its administration
fn subscription_routes() -> Router<AppState> {
    use handlers::subscription;
    Router::new()
        .route(
            "/user-subscriptions",
            post(subscription::create)
                .put(subscription::change_plan)
                .delete(subscription::cancel),
        )
        .route("/user-subscriptions/current", get(subscription::current))
        .route("/user-subscriptions/ensure", post(subscription::ensure))
        .route("/user-subscriptions/plans", get(subscription::plans))
        .route("/user-subscriptions/all", get(subscription::list_all))
        .route(
            "/user-subscriptions/{id}",
            get(subscription::get_by_id).delete(subscription::delete_by_id),
        )
}

/// Marketing plan catalog
fn catalog_routes() -> Router<AppState> {
    use handlers::catalog;
    Router::new()
        .route(
            "/subscriptions",
            get(catalog::list_plans).post(catalog::create_plan),
        )
        .route(
            "/subscriptions/{id}",
            get(catalog::get_plan)
                .put(catalog::update_plan)
                .delete(catalog::delete_plan),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new().route(
        "/admin/notifications",
        get(handlers::admin::notification_reports),
    )
}
