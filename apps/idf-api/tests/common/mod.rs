#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use bytes::Bytes;
use domain::{Role, User};
use http_body_util::BodyExt;
use idf_api::{AppState, build_app};
use idf_auth::{ResetNotifier, hash_password};
use idf_config::AppConfig;
use idf_storage::{InMemoryContactStore, InMemoryUserStore, UserRecord};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "boss@example.com";

pub fn config(admin_email: Option<&str>) -> AppConfig {
    AppConfig {
        http_addr: "127.0.0.1:0".to_string(),
        database_url: None,
        jwt_secret: "test-secret".to_string(),
        jwt_access_ttl_seconds: 3600,
        jwt_refresh_ttl_seconds: 7200,
        admin_email: admin_email.map(str::to_string),
        reset_token_ttl_seconds: 600,
    }
}

/// 记录所有投递的重置凭据。
#[derive(Default)]
pub struct CapturingNotifier {
    tokens: Mutex<Vec<String>>,
}

impl ResetNotifier for CapturingNotifier {
    fn deliver(&self, _user: &User, token: &str) {
        self.tokens.lock().unwrap().push(token.to_string());
    }
}

impl CapturingNotifier {
    pub fn last(&self) -> Option<String> {
        self.tokens.lock().unwrap().last().cloned()
    }
}

pub struct TestApp {
    pub router: Router,
    pub notifier: Arc<CapturingNotifier>,
}

/// 预置一个 admin 账号（admin@example.com / admin-pw）。
pub fn test_app(admin_email: Option<&str>) -> TestApp {
    let admin = UserRecord {
        user_id: "admin-1".to_string(),
        email: Some("admin@example.com".to_string()),
        username: Some("admin".to_string()),
        name: "Admin".to_string(),
        password_hash: hash_password("admin-pw").expect("hash"),
        role: Role::Admin,
        reset_token: None,
        created_at_ms: 0,
    };
    let notifier = Arc::new(CapturingNotifier::default());
    let state = AppState::new(
        &config(admin_email),
        Arc::new(InMemoryUserStore::with_users([admin])),
        Arc::new(InMemoryContactStore::new()),
        notifier.clone(),
    );
    TestApp {
        router: build_app(state),
        notifier,
    }
}

pub struct Reply {
    pub status: StatusCode,
    pub request_id: Option<String>,
    pub body: Value,
}

pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes: Bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    Reply {
        status,
        request_id,
        body,
    }
}

/// 注册并返回 (accessToken, refreshToken)。
pub async fn register(app: &Router, email: &str, password: &str) -> (String, String) {
    let reply = call(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(serde_json::json!({ "name": "Tester", "email": email, "password": password })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    tokens(&reply.body)
}

pub async fn login(app: &Router, email: &str, password: &str) -> Reply {
    call(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await
}

pub fn tokens(body: &Value) -> (String, String) {
    (
        body["accessToken"].as_str().expect("accessToken").to_string(),
        body["refreshToken"].as_str().expect("refreshToken").to_string(),
    )
}
