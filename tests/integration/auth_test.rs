//! Integration tests for sign-up, login, sessions and password changes.

mod helpers;

use axum::http::{StatusCode, header};
use serde_json::json;

use helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_signup_returns_created_user() {
    let app = TestApp::new().await;
    let response = app.sign_up("ada").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["name"], "ada");
    assert_eq!(response.body["data"]["birthdate"], "1990-04-12");
    assert!(response.body["data"]["profilePictureId"].is_null());
    assert!(response.body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_signup_duplicate_name_conflicts() {
    let app = TestApp::new().await;
    app.sign_up("ada").await;
    let response = app.sign_up("ada").await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "user_name_already_exists");
}

#[tokio::test]
async fn test_signup_weak_password() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/users/signup",
            Some(json!({ "name": "ada", "password": "password", "birthdate": "1990-04-12" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "password_not_valid");
}

#[tokio::test]
async fn test_signup_missing_birthdate() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/users/signup",
            Some(json!({ "name": "ada", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "validation_failed");
}

#[tokio::test]
async fn test_signup_empty_name() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/users/signup",
            Some(json!({ "name": "", "password": PASSWORD, "birthdate": "1990-04-12" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "validation_failed");
}

#[tokio::test]
async fn test_login_sets_http_only_cookie() {
    let app = TestApp::new().await;
    let user_id = app.sign_up("ada").await.body["data"]["id"].clone();

    let response = app
        .request(
            "POST",
            "/api/users/login",
            Some(json!({ "name": "ada", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["id"], user_id);
    let set_cookie = response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie");
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=3600"));
}

#[tokio::test]
async fn test_login_failures_look_alike() {
    let app = TestApp::new().await;
    app.sign_up("ada").await;

    let wrong_password = app
        .request(
            "POST",
            "/api/users/login",
            Some(json!({ "name": "ada", "password": "not-it" })),
            None,
        )
        .await;
    let unknown_user = app
        .request(
            "POST",
            "/api/users/login",
            Some(json!({ "name": "nobody", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.error_code(), "login_fail");
    assert_eq!(wrong_password.body, unknown_user.body);
    assert!(wrong_password.session_cookie().is_none());
}

#[tokio::test]
async fn test_status_follows_session() {
    let app = TestApp::new().await;

    let anonymous = app.request("GET", "/api/users/status", None, None).await;
    assert_eq!(anonymous.body["data"]["isActive"], false);
    assert!(anonymous.session_cookie().is_none());

    let cookie = app.logged_in("ada").await;
    let active = app
        .request("GET", "/api/users/status", None, Some(&cookie))
        .await;
    assert_eq!(active.body["data"]["isActive"], true);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::new().await;
    let cookie = app.logged_in("ada").await;

    let logout = app
        .request("POST", "/api/users/logout", None, Some(&cookie))
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    let expired = logout
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie");
    assert!(expired.contains("Max-Age=0"));

    let me = app.request("GET", "/api/users/me", None, Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_login() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/users/me", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "auth_required");
}

#[tokio::test]
async fn test_unknown_cookie_is_anonymous() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "GET",
            "/api/users/me",
            None,
            Some("parlor_session=forged"),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new().await;
    let cookie = app.logged_in("ada").await;
    let new_password = "Another-tangerine-77-lighthouse";

    let mismatch = app
        .request(
            "PUT",
            "/api/users/me/password",
            Some(json!({ "currentPassword": "wrong", "newPassword": new_password })),
            Some(&cookie),
        )
        .await;
    assert_eq!(mismatch.status, StatusCode::BAD_REQUEST);
    assert_eq!(mismatch.error_code(), "passwords_mismatch");

    let changed = app
        .request(
            "PUT",
            "/api/users/me/password",
            Some(json!({ "currentPassword": PASSWORD, "newPassword": new_password })),
            Some(&cookie),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);

    let old = app
        .request(
            "POST",
            "/api/users/login",
            Some(json!({ "name": "ada", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);

    let new = app
        .request(
            "POST",
            "/api/users/login",
            Some(json!({ "name": "ada", "password": new_password })),
            None,
        )
        .await;
    assert_eq!(new.status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_only_touches_own_row() {
    let app = TestApp::new().await;
    let cookie = app.logged_in("ada").await;
    app.sign_up("grace").await;

    app.request(
        "PUT",
        "/api/users/me/password",
        Some(json!({
            "currentPassword": PASSWORD,
            "newPassword": "Another-tangerine-77-lighthouse",
        })),
        Some(&cookie),
    )
    .await;

    let grace = app
        .request(
            "POST",
            "/api/users/login",
            Some(json!({ "name": "grace", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(grace.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
