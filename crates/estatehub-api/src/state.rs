//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use estatehub_auth::Authenticator;
use estatehub_core::config::AppConfig;
use estatehub_core::traits::CacheProvider;
use estatehub_database::Stores;
use estatehub_notify::ReportLog;
use estatehub_service::{ListingService, PlanCatalogService, SubscriptionLedger, UserService};
use estatehub_storage::UploadStaging;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Persistence backends
    pub stores: Stores,
    /// Cache provider (Redis or in-memory)
    pub cache: Arc<dyn CacheProvider>,
    /// Where multipart uploads are spooled
    pub staging: UploadStaging,
    /// Fan-out outcome history
    pub reports: Arc<ReportLog>,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token resolution
    pub authenticator: Authenticator,

    // ── Services ─────────────────────────────────────────────
    pub users: UserService,
    pub ledger: SubscriptionLedger,
    pub listings: ListingService,
    pub catalog: PlanCatalogService,
}
