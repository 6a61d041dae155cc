mod common;

use axum::http::{Method, StatusCode};
use bf_auth::jwt::TokenService;
use chrono::{TimeDelta, Utc};
use common::{STRONG_PASSWORD, TestApp, bearer};
use serde_json::json;

#[tokio::test]
async fn root_reports_running() {
    let app = TestApp::new();
    let (status, _) = app.send(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_issues_a_token_for_the_subject() {
    let app = TestApp::new();
    let (status, body) = app.register("alice", STRONG_PASSWORD).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["firstName"], "Test");
    assert!(body["user"].get("hash").is_none());

    let token = body["access_token"].as_str().unwrap();
    assert_eq!(app.state.tokens.verify(token).unwrap().sub, "alice");
}

#[tokio::test]
async fn owner_can_update_but_others_are_forbidden() {
    let app = TestApp::new();
    let alice = app.token_for("alice").await;
    let patch = json!({ "firstName": "Alicia" });

    let (status, body) = app
        .send(
            Method::PATCH,
            "/v1/users/alice",
            Some(&bearer(&alice)),
            Some(patch.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstName"], "Alicia");

    let (status, body) = app
        .send(
            Method::PATCH,
            "/v1/users/bob",
            Some(&bearer(&alice)),
            Some(patch),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["status"], 403);
}

#[tokio::test]
async fn missing_credential_is_unauthorized_not_forbidden() {
    let app = TestApp::new();
    app.token_for("alice").await;

    let (status, _) = app.send(Method::GET, "/v1/users/alice", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::PATCH,
            "/v1/users/alice",
            None,
            Some(json!({ "firstName": "Mallory" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_routes_accept_requests_without_credentials() {
    let app = TestApp::new();
    app.token_for("alice").await;

    let (status, body) = app.send(Method::GET, "/v1/users", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "username": "alice" }]));
}

#[tokio::test]
async fn invalid_credential_is_rejected_even_on_public_routes() {
    let app = TestApp::new();
    let foreign = TokenService::new(b"some-other-secret", None)
        .unwrap()
        .issue("alice")
        .unwrap();

    for authorization in [
        bearer(&foreign),
        bearer("not-a-jwt"),
        String::from("Basic YWxpY2U6cGFzcw=="),
        String::from("Bearer"),
    ] {
        let (status, body) = app
            .send(Method::GET, "/v1/users", Some(&authorization), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{authorization}");
        assert_eq!(body["error"]["status"], 401);
    }
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = TestApp::new();
    app.token_for("alice").await;
    let stale = app
        .state
        .tokens
        .issue_at("alice", Utc::now() - TimeDelta::hours(2))
        .unwrap();

    let (status, _) = app
        .send(Method::GET, "/v1/users/alice", Some(&bearer(&stale)), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn any_signed_in_user_can_read_profiles() {
    let app = TestApp::new();
    app.token_for("alice").await;
    let bob = app.token_for("bob").await;

    let (status, body) = app
        .send(Method::GET, "/v1/users/alice", Some(&bearer(&bob)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    let (status, _) = app
        .send(Method::GET, "/v1/users/carol", Some(&bearer(&bob)), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_returns_a_fresh_token() {
    let app = TestApp::new();
    app.token_for("alice").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/v1/auth/token",
            None,
            Some(json!({ "username": "alice", "password": STRONG_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap();
    assert_eq!(app.state.tokens.verify(token).unwrap().sub, "alice");

    let (status, _) = app
        .send(
            Method::POST,
            "/v1/auth/token",
            None,
            Some(json!({ "username": "alice", "password": "Wr0ng!Pass" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn incomplete_login_body_gets_a_json_error() {
    let app = TestApp::new();
    app.token_for("alice").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/v1/auth/token",
            None,
            Some(json!({ "username": "alice" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["status"], 400);
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn lowercase_bearer_scheme_is_accepted() {
    let app = TestApp::new();
    let alice = app.token_for("alice").await;

    let (status, body) = app
        .send(
            Method::GET,
            "/v1/users/alice",
            Some(&format!("bearer {alice}")),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/v1/books", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["status"], 404);
}
