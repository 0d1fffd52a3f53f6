//! Integration tests for accounts and authentication.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_and_login() {
    let app = helpers::TestApp::new().await;
    let user = app.register("Ana Lima", "Ana@Example.com").await;
    assert_eq!(user.email, "Ana@Example.com");

    let response = app
        .request(
            "POST",
            "/api/users/login",
            Some(json!({"email": "ana@example.com", "password": "secret123"})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], "ana@example.com");
    assert_eq!(response.body["role"], "owner");
    assert!(response.body["token"].as_str().is_some());
    assert!(response.body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_bad_input() {
    let app = helpers::TestApp::new().await;
    app.register("Ana Lima", "ana@example.com").await;

    let duplicate = app
        .request(
            "POST",
            "/api/users/register",
            Some(json!({
                "name": "Another Ana",
                "email": "ana@example.com",
                "password": "secret123",
                "type": "realtor",
            })),
            None,
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.body["message"], "User already exists");

    let short_name = app
        .request(
            "POST",
            "/api/users/register",
            Some(json!({
                "name": "A",
                "email": "a@example.com",
                "password": "secret123",
                "type": "owner",
            })),
            None,
        )
        .await;
    assert_eq!(short_name.status, StatusCode::BAD_REQUEST);
    assert_eq!(short_name.body["message"], "Name must be at least 2 characters long");

    let admin_type = app
        .request(
            "POST",
            "/api/users/register",
            Some(json!({
                "name": "Mallory",
                "email": "m@example.com",
                "password": "secret123",
                "type": "admin",
            })),
            None,
        )
        .await;
    assert_eq!(admin_type.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_password_is_invalid_credentials() {
    let app = helpers::TestApp::new().await;
    app.register("Ana Lima", "ana@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/users/login",
            Some(json!({"email": "ana@example.com", "password": "nope-nope"})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_token_required() {
    let app = helpers::TestApp::new().await;

    let missing = app.request("GET", "/api/users/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["message"], "Not authorized, no token");

    let garbage = app
        .request("GET", "/api/users/me", None, Some("not-a-jwt"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.body["message"], "Not authorized, token failed");
}

#[tokio::test]
async fn test_admin_routes() {
    let app = helpers::TestApp::new().await;
    let owner = app.register("Ana Lima", "ana@example.com").await;
    let admin = app.register_admin("admin@example.com").await;

    let forbidden = app.request("GET", "/api/users", None, Some(&owner.token)).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(forbidden.body["message"], "Not authorized as admin");

    let listed = app.request("GET", "/api/users", None, Some(&admin.token)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().map(Vec::len), Some(2));

    let deleted = app
        .request(
            "DELETE",
            &format!("/api/users/{}", owner.id),
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "User deleted successfully");

    // The identity was evicted, so the old token no longer resolves.
    let after = app.request("GET", "/api/users/me", None, Some(&owner.token)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_only_admin_changes_roles() {
    let app = helpers::TestApp::new().await;
    let owner = app.register("Ana Lima", "ana@example.com").await;
    let path = format!("/api/users/{}", owner.id);

    let escalate = app
        .request("PUT", &path, Some(json!({"role": "admin"})), Some(&owner.token))
        .await;
    assert_eq!(escalate.status, StatusCode::FORBIDDEN);

    let rename = app
        .request("PUT", &path, Some(json!({"name": "Ana Maria"})), Some(&owner.token))
        .await;
    assert_eq!(rename.status, StatusCode::OK);
    assert_eq!(rename.body["name"], "Ana Maria");
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
