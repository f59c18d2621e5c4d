//! End-to-end tests for the authorization middleware chain: session
//! bootstrap, the remote access check, role elevation, and permission
//! augmentation.

mod helpers;

use axum::http::StatusCode;
use helpers::{spawn_app, spawn_app_with, TEST_BYPASS_TOKEN};
use serde_json::{json, Value};

#[tokio::test]
async fn fresh_session_is_bootstrapped_exactly_once() {
    let app = spawn_app().await;

    // First request: no affiliate scope yet, allowed without a remote check
    let response = app.get("/api/affiliates", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.authz.access_calls().is_empty());

    // The bootstrap stamped the default scope and user onto the session
    app.authz.set_permissions(json!([]));
    let me = app
        .get("/api/users/me", &[("x-email", "jane@example.org")])
        .await;
    let body: Value = me.json().await.unwrap();
    assert_eq!(body["affiliate"], json!("ALL"));
    assert_eq!(body["user_id"], json!(1));

    // Second request on the same session goes through the normal path
    let response = app.get("/api/affiliates", &[]).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.authz.access_calls().is_empty());
}

#[tokio::test]
async fn bootstrap_can_be_disabled() {
    let app = spawn_app_with(|config| config.core.auth.auto_bootstrap = false).await;

    let response = app.get("/api/affiliates", &[("x-jwt", "token-1")]).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.authz.access_calls().is_empty());
}

#[tokio::test]
async fn access_check_sends_token_resource_and_level() {
    let app = spawn_app().await;

    // Consume the bootstrap, then hit the remote check
    app.get("/api/affiliates", &[]).await;
    let response = app.get("/api/affiliates", &[("x-jwt", "token-1")]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let calls = app.authz.access_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["token"], json!("token-1"));
    assert_eq!(calls[0]["resource"], json!("GET: /affiliates"));
    assert_eq!(calls[0]["level"], json!(1));
}

#[tokio::test]
async fn repeated_identical_checks_ask_the_remote_every_time() {
    let app = spawn_app().await;

    app.get("/api/affiliates", &[]).await; // bootstrap

    // Nothing is cached locally: the same request goes back to the remote
    let first = app.get("/api/affiliates", &[("x-jwt", "token-1")]).await;
    let second = app.get("/api/affiliates", &[("x-jwt", "token-1")]).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);

    let calls = app.authz.access_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);

    // Same once the remote flips to denying
    app.authz.set_allow(false);
    let third = app.get("/api/affiliates", &[("x-jwt", "token-1")]).await;
    let fourth = app.get("/api/affiliates", &[("x-jwt", "token-1")]).await;
    assert_eq!(third.status(), StatusCode::FORBIDDEN);
    assert_eq!(fourth.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.authz.access_calls().len(), 4);
}

#[tokio::test]
async fn remote_denial_is_a_403_with_json_error() {
    let app = spawn_app().await;

    app.get("/api/affiliates", &[]).await;
    app.authz.set_allow(false);

    let response = app.get("/api/affiliates", &[("x-jwt", "token-1")]).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("GET: /affiliates"));
}

#[tokio::test]
async fn missing_identity_token_is_denied_without_a_remote_call() {
    let app = spawn_app().await;

    app.get("/api/affiliates", &[]).await;
    let response = app.get("/api/affiliates", &[]).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.authz.access_calls().is_empty());
}

#[tokio::test]
async fn remote_failure_on_the_access_path_is_a_500() {
    let app = spawn_app().await;

    app.get("/api/affiliates", &[]).await;
    app.authz.set_fail(true);

    let response = app.get("/api/affiliates", &[("x-jwt", "token-1")]).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn resource_override_substitutes_the_session_affiliate() {
    let app = spawn_app().await;

    app.get("/api/affiliates", &[]).await; // bootstrap: affiliate = ALL
    let response = app.get("/api/workshops", &[("x-jwt", "token-1")]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let calls = app.authz.access_calls();
    assert_eq!(calls[0]["resource"], json!("GET: /workshops/ALL"));
}

#[tokio::test]
async fn elevation_bypass_grants_the_manager_role_in_development() {
    let app = spawn_app().await;

    let response = app.elevate("ACME").await;
    assert_eq!(response.status(), StatusCode::OK);

    // The elevated session carries the role and the affiliate from the header
    app.authz.set_permissions(json!([]));
    let me = app
        .get("/api/users/me", &[("x-email", "jane@example.org")])
        .await;
    let body: Value = me.json().await.unwrap();
    assert_eq!(body["affiliate"], json!("ACME"));
    assert!(body["roles"]
        .as_array()
        .unwrap()
        .contains(&json!("Affiliate Manager")));
}

#[tokio::test]
async fn elevation_bypass_is_ignored_in_production() {
    let app = spawn_app_with(|config| {
        config.core.auth.mode = "production".parse().unwrap();
    })
    .await;

    let response = app
        .post_json(
            "/api/affiliates",
            &json!({"name": "Acme"}),
            &[
                ("x-bypass-token", TEST_BYPASS_TOKEN),
                ("x-jwt", "token-1"),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.authz.access_calls().is_empty());
    assert!(app.salesforce.created().is_empty());
}

#[tokio::test]
async fn wrong_bypass_token_is_denied() {
    let app = spawn_app().await;

    let response = app
        .post_json(
            "/api/affiliates",
            &json!({"name": "Acme"}),
            &[("x-bypass-token", "wrong"), ("x-jwt", "token-1")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn permission_fetch_stores_the_sequence_on_the_session() {
    let app = spawn_app().await;

    app.authz
        .set_permissions(json!([{"resource": "/workshops/1"}]));

    let response = app
        .get("/api/users/me", &[("x-email", "jane@example.org")])
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["permissions"], json!(["/workshops/1"]));

    let calls = app.authz.permission_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["email"], json!("jane@example.org"));
}

#[tokio::test]
async fn non_sequence_permission_reply_is_a_403() {
    let app = spawn_app().await;

    app.authz.set_permissions(json!({"status": "nope"}));

    let response = app
        .get("/api/users/me", &[("x-email", "jane@example.org")])
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn failed_permission_fetch_is_a_403() {
    let app = spawn_app().await;

    app.authz.set_fail(true);

    let response = app
        .get("/api/users/me", &[("x-email", "jane@example.org")])
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_email_header_is_a_403() {
    let app = spawn_app().await;

    let response = app.get("/api/users/me", &[]).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.authz.permission_calls().is_empty());
}

#[tokio::test]
async fn sessions_are_tracked_per_client() {
    let app = spawn_app().await;

    // This client consumes its bootstrap
    let response = app.get("/api/affiliates", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);

    // A client without the cookie gets a fresh session and a fresh bootstrap
    let other = reqwest::Client::new();
    let response = other
        .get(app.url("/api/affiliates"))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status(), StatusCode::OK);

    assert!(app.authz.access_calls().is_empty());
}

#[tokio::test]
async fn session_cookie_is_set_on_first_response() {
    let app = spawn_app().await;

    let response = app.get("/api/health", &[]).await;

    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("missing Set-Cookie")
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("atrium_sid="));
    assert!(cookie.contains("HttpOnly"));
}
