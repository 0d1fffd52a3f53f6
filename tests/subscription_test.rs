//! Integration tests for the subscription ledger, the pricing table and
//! the plan catalog.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_current_is_404_until_provisioned() {
    let app = helpers::TestApp::new().await;
    let user = app.register("Ana Lima", "ana@example.com").await;

    let missing = app
        .request("GET", "/api/user-subscriptions/current", None, Some(&user.token))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["message"], "No subscription found");

    let ensured = app
        .request("POST", "/api/user-subscriptions/ensure", None, Some(&user.token))
        .await;
    assert_eq!(ensured.status, StatusCode::OK);
    assert_eq!(ensured.body["plan"], "free");
    assert_eq!(ensured.body["price"], 0);

    // Ensuring again hands back the same record.
    let again = app
        .request("POST", "/api/user-subscriptions/ensure", None, Some(&user.token))
        .await;
    assert_eq!(again.body["id"], ensured.body["id"]);
}

#[tokio::test]
async fn test_duplicate_active_subscription_is_rejected() {
    let app = helpers::TestApp::new().await;
    let user = app.register("Ana Lima", "ana@example.com").await;

    let first = app
        .request("POST", "/api/user-subscriptions", Some(json!({})), Some(&user.token))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["plan"], "free");
    assert_eq!(first.body["billing_cycle"], "monthly");

    let second = app
        .request(
            "POST",
            "/api/user-subscriptions",
            Some(json!({"plan": "premium"})),
            Some(&user.token),
        )
        .await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        second.body["message"],
        "Active subscription already exists. Use PUT to update."
    );

    let changed = app
        .request(
            "PUT",
            "/api/user-subscriptions",
            Some(json!({"plan": "premium", "billingCycle": "yearly"})),
            Some(&user.token),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);
    assert_eq!(changed.body["plan"], "premium");
    assert_eq!(changed.body["price"], 499);
    assert_eq!(changed.body["id"], first.body["id"]);
}

#[tokio::test]
async fn test_cancel_then_resubscribe_restarts_record() {
    let app = helpers::TestApp::new().await;
    let user = app.register("Ana Lima", "ana@example.com").await;

    let first = app
        .request(
            "POST",
            "/api/user-subscriptions",
            Some(json!({"plan": "basic"})),
            Some(&user.token),
        )
        .await;
    let cancelled = app
        .request("DELETE", "/api/user-subscriptions", None, Some(&user.token))
        .await;
    assert_eq!(cancelled.body["message"], "Subscription cancelled successfully");

    let twice = app
        .request("DELETE", "/api/user-subscriptions", None, Some(&user.token))
        .await;
    assert_eq!(twice.status, StatusCode::OK);
    assert_eq!(twice.body["subscription"]["status"], "cancelled");

    let restarted = app
        .request(
            "POST",
            "/api/user-subscriptions",
            Some(json!({"plan": "premium"})),
            Some(&user.token),
        )
        .await;
    assert_eq!(restarted.status, StatusCode::CREATED);
    assert_eq!(restarted.body["status"], "active");
    assert_eq!(restarted.body["id"], first.body["id"]);
}

#[tokio::test]
async fn test_unknown_plan_is_a_validation_error() {
    let app = helpers::TestApp::new().await;
    let user = app.register("Ana Lima", "ana@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/user-subscriptions",
            Some(json!({"plan": "platinum"})),
            Some(&user.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pricing_table_is_public() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/api/user-subscriptions/plans", None, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let plans = response.body.as_array().expect("array");
    assert_eq!(plans.len(), 4);
    assert_eq!(plans[0]["plan"], "free");
    assert_eq!(plans[0]["listing_cap"], 1);
    assert_eq!(plans[3]["listing_cap"], -1);
}

#[tokio::test]
async fn test_admin_subscription_views() {
    let app = helpers::TestApp::new().await;
    let user = app.register("Ana Lima", "ana@example.com").await;
    let admin = app.register_admin("admin@example.com").await;

    let sub = app
        .request("POST", "/api/user-subscriptions/ensure", None, Some(&user.token))
        .await;
    let path = format!("/api/user-subscriptions/{}", sub.body["id"].as_str().unwrap());

    let denied = app
        .request("GET", "/api/user-subscriptions/all", None, Some(&user.token))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let all = app
        .request("GET", "/api/user-subscriptions/all", None, Some(&admin.token))
        .await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body[0]["user"]["email"], "ana@example.com");

    let one = app.request("GET", &path, None, Some(&admin.token)).await;
    assert_eq!(one.status, StatusCode::OK);

    let deleted = app.request("DELETE", &path, None, Some(&admin.token)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Subscription deleted");

    let gone = app.request("GET", &path, None, Some(&admin.token)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["message"], "Subscription not found");
}

#[tokio::test]
async fn test_plan_catalog_crud() {
    let app = helpers::TestApp::new().await;
    let user = app.register("Ana Lima", "ana@example.com").await;
    let admin = app.register_admin("admin@example.com").await;

    let body = json!({
        "name": "Agency Pro",
        "description": "For busy agencies",
        "monthly_price": 79.0,
        "yearly_price": 790.0,
        "user_type": "realtor",
        "features": ["Featured placement"],
    });

    let denied = app
        .request("POST", "/api/subscriptions", Some(body.clone()), Some(&user.token))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let created = app
        .request("POST", "/api/subscriptions", Some(body), Some(&admin.token))
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    let path = format!("/api/subscriptions/{}", created.body["id"].as_str().unwrap());

    let listed = app.request("GET", "/api/subscriptions", None, None).await;
    assert_eq!(listed.body.as_array().map(Vec::len), Some(1));

    let updated = app
        .request(
            "PUT",
            &path,
            Some(json!({"highlighted": true})),
            Some(&admin.token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["highlighted"], true);

    let deleted = app.request("DELETE", &path, None, Some(&admin.token)).await;
    assert_eq!(deleted.body["message"], "Plan deleted");

    let gone = app.request("GET", &path, None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.body["message"], "Plan not found");
}

#[tokio::test]
async fn test_notification_reports_are_admin_only() {
    let app = helpers::TestApp::new().await;
    let user = app.register("Ana Lima", "ana@example.com").await;
    let admin = app.register_admin("admin@example.com").await;

    app.request(
        "POST",
        "/api/listings",
        Some(json!({"title": "Quiet cottage"})),
        Some(&user.token),
    )
    .await;
    app.wait_for_reports(1).await;

    let denied = app
        .request("GET", "/api/admin/notifications", None, Some(&user.token))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let reports = app
        .request("GET", "/api/admin/notifications", None, Some(&admin.token))
        .await;
    assert_eq!(reports.status, StatusCode::OK);
    assert_eq!(reports.body[0]["title"], "Quiet cottage");
    assert_eq!(reports.body[0]["total"], 2);
}
