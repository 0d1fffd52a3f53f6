//! Application builder: wires state, router and middleware into an Axum app.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use estatehub_auth::{
    Authenticator, IdentityCache, JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator,
};
use estatehub_cache::CacheManager;
use estatehub_core::config::AppConfig;
use estatehub_core::traits::{CacheProvider, ImageHost, Mailer};
use estatehub_core::{AppError, AppResult, ErrorKind};
use estatehub_database::Stores;
use estatehub_notify::{FanoutWorker, build_mailer, fanout};
use estatehub_service::{
    ImageIngestor, ListingService, PlanCatalogService, QuotaGate, SubscriptionLedger, UserService,
};
use estatehub_storage::{UploadStaging, build_image_host};

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(build_compression_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Assemble services over the given infrastructure.
///
/// The returned worker delivers new-listing emails and must be spawned by
/// the caller.
pub async fn build_state(
    config: AppConfig,
    stores: Stores,
    cache: Arc<dyn CacheProvider>,
    image_host: Arc<dyn ImageHost>,
    mailer: Arc<dyn Mailer>,
) -> AppResult<(AppState, FanoutWorker)> {
    let staging = UploadStaging::new(&config.media.upload_dir).await?;

    // ── Auth ─────────────────────────────────────────────────────
    let identities = IdentityCache::new(Arc::clone(&cache), &config.auth);
    let authenticator = Authenticator::new(
        JwtDecoder::new(&config.auth),
        identities.clone(),
        Arc::clone(&stores.users),
    );

    // ── Notifications ────────────────────────────────────────────
    let (queue, worker, reports) =
        fanout::channel(&config.notifications, Arc::clone(&stores.users), mailer);

    // ── Services ─────────────────────────────────────────────────
    let users = UserService::new(
        Arc::clone(&stores.users),
        Arc::new(PasswordHasher::new()),
        Arc::new(PasswordValidator::new(&config.auth)),
        Arc::new(JwtEncoder::new(&config.auth)),
        identities,
    );
    let ledger = SubscriptionLedger::new(
        Arc::clone(&stores.subscriptions),
        Arc::clone(&stores.users),
    );
    let gate = QuotaGate::new(ledger.clone(), Arc::clone(&stores.listings));
    let ingestor = ImageIngestor::new(image_host, config.media.inline_threshold);
    let listings = ListingService::new(Arc::clone(&stores.listings), gate, ingestor, queue);
    let catalog = PlanCatalogService::new(Arc::clone(&stores.plans));

    let state = AppState {
        config: Arc::new(config),
        stores,
        cache,
        staging,
        reports,
        authenticator,
        users,
        ledger,
        listings,
        catalog,
    };
    Ok((state, worker))
}

/// Runs the EstateHub server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!("Starting EstateHub server...");

    info!(provider = %config.database.provider, "Initializing stores");
    let stores = Stores::from_config(&config.database).await?;

    info!(provider = %config.cache.provider, "Initializing cache");
    let cache: Arc<dyn CacheProvider> = Arc::new(CacheManager::new(&config.cache).await?);

    let image_host = build_image_host(&config.media)?;
    let mailer = build_mailer(&config.mail)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let (state, worker) = build_state(config, stores.clone(), cache, image_host, mailer).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker_handle = tokio::spawn(worker.run(shutdown_rx));

    let app = build_app(state);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e))?;

    info!(%addr, "EstateHub server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("HTTP server stopped, draining notification worker");
    let _ = shutdown_tx.send(true);
    if tokio::time::timeout(grace, worker_handle).await.is_err() {
        warn!(grace_seconds = grace.as_secs(), "Notification worker did not stop in time");
    }

    if let Some(pool) = &stores.pool {
        pool.close().await;
    }
    info!("EstateHub server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
