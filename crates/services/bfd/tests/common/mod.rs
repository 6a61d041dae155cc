#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use bf_auth::{
    jwt::TokenService,
    password_policy::PasswordPolicy,
    secret_hash::{HashCost, SecretHasher},
};
use bf_models::user::store::MemoryStore;
use bf_web::state::AppState;
use chrono::TimeDelta;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const SECRET: &[u8] = b"integration-test-secret";
pub const STRONG_PASSWORD: &str = "Str0ng!Pass";

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(
            TokenService::new(SECRET, Some(TimeDelta::hours(1))).unwrap(),
            SecretHasher::new(HashCost::MINIMAL).unwrap(),
            PasswordPolicy::default(),
            Arc::new(MemoryStore::default()),
        );
        let router = bfd::api::router(state.clone());
        Self { state, router }
    }

    /// Sends a request, returning the status and the body parsed as JSON
    /// (`Value::Null` for an empty or non-JSON body).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(authorization) = authorization {
            request = request.header(header::AUTHORIZATION, authorization);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    /// Registers `username` with `password` and returns the issued token.
    pub async fn register(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/v1/auth/register",
            None,
            Some(json!({
                "username": username,
                "password": password,
                "firstName": "Test",
                "lastName": "User",
                "email": format!("{username}@example.com"),
            })),
        )
        .await
    }

    pub async fn token_for(&self, username: &str) -> String {
        let (status, body) = self.register(username, STRONG_PASSWORD).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["access_token"].as_str().unwrap().to_string()
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
