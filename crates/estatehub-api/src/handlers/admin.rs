//! Administrative views.

use axum::Json;
use axum::extract::State;

use estatehub_notify::FanoutReport;

use crate::extractors::AdminUser;
use crate::state::AppState;

/// GET /api/admin/notifications
///
/// Recent new-listing fan-out outcomes, newest first.
pub async fn notification_reports(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Json<Vec<FanoutReport>> {
    Json(state.reports.recent().await)
}
