//! Signup, login, session and user-update tests

#[path = "../common/mod.rs"]
mod common;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Method, Request, StatusCode};
use household_api::storage::users;
use std::net::SocketAddr;
use common::*;
use serde_json::{json, Value};

#[tokio::test]
async fn test_signup_then_login_with_same_credentials() {
    let app = spawn_app().await;

    let signup = app.signup("alice@example.com", "s3cret", "Alice").await;
    assert_eq!(signup.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(signup.location(), Some("/user/login"));

    let login = app.login("alice@example.com", "s3cret").await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.json::<String>(), "groupJoin");

    let cookie = login.cookie().unwrap();
    assert!(cookie.starts_with("sid="));
    let set_cookie = login.headers["set-cookie"].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_login_rejects_wrong_password_and_unknown_email() {
    let app = spawn_app().await;
    app.signup("alice@example.com", "s3cret", "Alice").await;

    let wrong = app.login("alice@example.com", "guess").await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.error_code(), "invalid_credentials");
    assert!(wrong.cookie().is_none());

    let unknown = app.login("nobody@example.com", "s3cret").await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_email_is_case_insensitive() {
    let app = spawn_app().await;
    app.signup(" Alice@Example.com ", "s3cret", "Alice").await;

    let login = app.login("alice@example.com", "s3cret").await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_signup_validation_and_duplicates() {
    let app = spawn_app().await;

    let bad_email = app.signup("not-an-email", "pw", "Alice").await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.error_code(), "invalid_request");

    let no_name = app.signup("alice@example.com", "pw", "  ").await;
    assert_eq!(no_name.status, StatusCode::BAD_REQUEST);

    let no_password = app.signup("alice@example.com", "", "Alice").await;
    assert_eq!(no_password.status, StatusCode::BAD_REQUEST);

    app.signup("alice@example.com", "pw", "Alice").await;
    let duplicate = app.signup("alice@example.com", "other", "Alicia").await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let app = spawn_app().await;

    let response = app
        .send(
            Method::POST,
            "/user/login",
            None,
            Some(json!({ "email": "alice@example.com" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "invalid_request");
}

#[tokio::test]
async fn test_password_never_serialized() {
    let app = spawn_app().await;
    let session = app.register("alice@example.com", "Alice").await;

    let me = app.get("/user", &session).await;
    assert_eq!(me.status, StatusCode::OK);
    let body: Value = me.json();
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["GroupId"], Value::Null);
    assert!(body.get("password").is_none());
    assert!(!me.text().contains("argon2"));
}

#[tokio::test]
async fn test_session_routes_require_a_session() {
    let app = spawn_app().await;

    for (method, uri) in [
        (Method::GET, "/user"),
        (Method::GET, "/messages"),
        (Method::GET, "/groups/"),
        (Method::GET, "/bills"),
        (Method::DELETE, "/chore/delete/1"),
    ] {
        let response = app.send(method.clone(), uri, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(response.error_code(), "unauthenticated");
    }

    let forged = Session {
        cookie: "sid=00000000-0000-0000-0000-000000000000".to_string(),
        user_id: 1,
    };
    assert_eq!(app.get("/user", &forged).await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_user_refreshes_session_without_relogin() {
    let app = spawn_app().await;
    let session = app.register("alice@example.com", "Alice").await;

    let group = app
        .post("/groups/create", &session, json!({ "groupName": "Flat 4" }))
        .await;
    let group_id = group.json::<Value>()["id"].as_i64().unwrap();

    let update = app
        .put("/user", &session, json!({ "GroupId": group_id, "name": "Alice B" }))
        .await;
    assert_eq!(update.status, StatusCode::OK);
    assert_eq!(
        update.json::<Value>(),
        json!({ "result": "redirect", "url": "/home" })
    );

    let me: Value = app.get("/user", &session).await.json();
    assert_eq!(me["GroupId"], group_id);
    assert_eq!(me["name"], "Alice B");

    let login = app.login("alice@example.com", "correct horse").await;
    assert_eq!(login.json::<String>(), "home");
}

#[tokio::test]
async fn test_update_user_missing_group_is_not_found() {
    let app = spawn_app().await;
    let session = app.register("alice@example.com", "Alice").await;

    let update = app.put("/user", &session, json!({ "GroupId": 404 })).await;
    assert_eq!(update.status, StatusCode::NOT_FOUND);

    let me: Value = app.get("/user", &session).await.json();
    assert_eq!(me["GroupId"], Value::Null);
}

#[tokio::test]
async fn test_update_user_null_group_leaves_it() {
    let app = spawn_app().await;
    let (session, _) = app.member("alice@example.com", "Alice", "Flat 4").await;

    let update = app.put("/user", &session, json!({ "GroupId": null })).await;
    assert_eq!(update.status, StatusCode::OK);

    let me: Value = app.get("/user", &session).await.json();
    assert_eq!(me["GroupId"], Value::Null);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = spawn_app().await;
    let session = app.register("alice@example.com", "Alice").await;

    let logout = app.get("/logout", &session).await;
    assert!(logout.status.is_redirection());
    assert_eq!(logout.location(), Some("/"));
    let set_cookie = logout.headers["set-cookie"].to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=0"));

    assert_eq!(app.get("/user", &session).await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_session_still_redirects() {
    let app = spawn_app().await;

    let logout = app.send(Method::GET, "/logout", None, None).await;
    assert!(logout.status.is_redirection());
    assert_eq!(logout.location(), Some("/"));
}

#[tokio::test]
async fn test_credential_routes_are_rate_limited() {
    let mut settings = test_settings();
    settings.rate_limit.enabled = true;
    settings.rate_limit.requests_per_second = 1;
    settings.rate_limit.burst_size = 2;
    let app = spawn_app_with(settings).await;

    assert_eq!(app.login("a@example.com", "pw").await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.login("a@example.com", "pw").await.status, StatusCode::UNAUTHORIZED);

    let limited = app.login("a@example.com", "pw").await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(limited.error_code(), "rate_limited");
}

fn login_from(peer: &str) -> Request<Body> {
    let peer: SocketAddr = peer.parse().unwrap();
    let mut request = Request::builder()
        .method(Method::POST)
        .uri("/user/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "a@example.com", "password": "pw" }).to_string(),
        ))
        .unwrap();
    request.extensions_mut().insert(ConnectInfo(peer));
    request
}

#[tokio::test]
async fn test_rate_limit_is_tracked_per_peer() {
    let mut settings = test_settings();
    settings.rate_limit.enabled = true;
    settings.rate_limit.requests_per_second = 1;
    settings.rate_limit.burst_size = 1;
    let app = spawn_app_with(settings).await;

    let first = app.request(login_from("10.0.0.1:5000")).await;
    assert_eq!(first.status, StatusCode::UNAUTHORIZED);
    let flooded = app.request(login_from("10.0.0.1:5001")).await;
    assert_eq!(flooded.status, StatusCode::TOO_MANY_REQUESTS);

    let other_peer = app.request(login_from("10.0.0.2:5000")).await;
    assert_eq!(other_peer.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_insert_is_recognised_as_taken_email() {
    let app = spawn_app().await;
    let new_user = || users::NewUser {
        email: "race@example.com".to_string(),
        password_hash: "hash".to_string(),
        name: "Racer".to_string(),
    };

    users::create(&app.state.db, new_user(), chrono::Utc::now())
        .await
        .unwrap();
    let err = users::create(&app.state.db, new_user(), chrono::Utc::now())
        .await
        .unwrap_err();

    assert!(users::is_duplicate_email(&err));
    let other = sea_orm::DbErr::Custom("boom".to_string());
    assert!(!users::is_duplicate_email(&other));
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = spawn_app().await;

    let health = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    let body: Value = health.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);

    let doc = app
        .send(Method::GET, "/api-docs/openapi.json", None, None)
        .await;
    assert_eq!(doc.status, StatusCode::OK);
    let doc: Value = doc.json();
    assert!(doc["paths"]["/bill/add"].is_object());
    assert!(doc["paths"]["/request/join/accept"].is_object());
}

#[tokio::test]
async fn test_unknown_path_falls_through_to_static_files() {
    let app = spawn_app().await;

    let response = app
        .send(Method::GET, "/definitely/not/here.html", None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
