//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tokio::sync::{Mutex, watch};
use tower::ServiceExt;

use estatehub_api::{AppState, build_app, build_state};
use estatehub_cache::memory::MemoryCacheProvider;
use estatehub_core::config::AppConfig;
use estatehub_core::config::cache::MemoryCacheConfig;
use estatehub_core::traits::{EmailMessage, ImageHost, Mailer};
use estatehub_core::{AppError, AppResult};
use estatehub_database::Stores;
use estatehub_entity::user::UserRole;
use estatehub_notify::FanoutReport;

/// Image host that numbers its uploads; names containing "broken" fail.
#[derive(Debug, Default)]
pub struct FakeImageHost {
    pub uploads: AtomicUsize,
}

#[async_trait]
impl ImageHost for FakeImageHost {
    fn provider_name(&self) -> &str {
        "fake"
    }

    async fn upload_base64(&self, _encoded: &str, name: Option<&str>) -> AppResult<String> {
        if name.is_some_and(|n| n.contains("broken")) {
            return Err(AppError::image_upload("Image host rejected the upload"));
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://img.test/{n}.jpg"))
    }
}

/// Mailer that keeps every message it was asked to send.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    fn provider_name(&self) -> &str {
        "recording"
    }

    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

/// A decoded response.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// A registered account and its bearer token.
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

/// Test application context
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub host: Arc<FakeImageHost>,
    pub mailer: Arc<RecordingMailer>,
    _uploads: tempfile::TempDir,
    _shutdown: watch::Sender<bool>,
}

impl TestApp {
    /// A fresh application over in-memory stores.
    pub async fn new() -> Self {
        let uploads = tempfile::tempdir().expect("temp dir");

        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.media.upload_dir = uploads.path().to_string_lossy().into_owned();

        let cache = Arc::new(MemoryCacheProvider::new(
            &MemoryCacheConfig { max_capacity: 1_000 },
            300,
        ));
        let host = Arc::new(FakeImageHost::default());
        let mailer = Arc::new(RecordingMailer::default());

        let (state, worker) = build_state(
            config,
            Stores::in_memory(),
            cache,
            host.clone(),
            mailer.clone(),
        )
        .await
        .expect("state");

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(worker.run(shutdown_rx));

        Self {
            router: build_app(state.clone()),
            state,
            host,
            mailer,
            _uploads: uploads,
            _shutdown: shutdown_tx,
        }
    }

    /// Send a JSON request.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send(request).await
    }

    /// Send a multipart request built from text fields and `(name, bytes)` files.
    pub async fn multipart(
        &self,
        method: &str,
        path: &str,
        fields: &[(&str, &str)],
        files: &[(&str, &[u8])],
        token: &str,
    ) -> TestResponse {
        const BOUNDARY: &str = "estatehub-test-boundary";
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for (file_name, data) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(method)
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }

    /// Register an owner account.
    pub async fn register(&self, name: &str, email: &str) -> TestUser {
        let response = self
            .request(
                "POST",
                "/api/users/register",
                Some(serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": "secret123",
                    "type": "owner",
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        TestUser {
            id: response.body["id"].as_str().expect("id").to_string(),
            email: email.to_string(),
            token: response.body["token"].as_str().expect("token").to_string(),
        }
    }

    /// Register an account and grant it the admin role directly in the store.
    pub async fn register_admin(&self, email: &str) -> TestUser {
        let user = self.register("Site Admin", email).await;
        let mut record = self
            .state
            .stores
            .users
            .find_by_email(email)
            .await
            .expect("lookup")
            .expect("registered");
        record.role = UserRole::Admin;
        self.state.stores.users.update(&record).await.expect("promote");
        self.state.authenticator.identities().evict(record.id).await;
        user
    }

    /// Wait until the fan-out worker has recorded `count` reports.
    pub async fn wait_for_reports(&self, count: usize) -> Vec<FanoutReport> {
        for _ in 0..100 {
            let reports = self.state.reports.recent().await;
            if reports.len() >= count {
                return reports;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("fan-out worker did not report in time");
    }
}
