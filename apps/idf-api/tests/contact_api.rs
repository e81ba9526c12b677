mod common;

use axum::http::{Method, StatusCode};
use common::{ADMIN_EMAIL, call, login, register, test_app, tokens};
use serde_json::json;

fn submission(name: &str) -> serde_json::Value {
    json!({ "name": name, "email": "visitor@example.com", "message": "Hello", "sendCopy": true })
}

#[tokio::test]
async fn public_submission_is_validated() {
    let app = test_app(None).router;

    let accepted = call(&app, Method::POST, "/contact", None, Some(submission("Visitor"))).await;
    assert_eq!(accepted.status, StatusCode::CREATED);
    assert_eq!(accepted.body, json!({ "success": true }));

    let spam = call(
        &app,
        Method::POST,
        "/contact",
        None,
        Some(json!({ "name": "Bot", "email": "b@x.com", "message": "buy", "honeypot": "filled" })),
    )
    .await;
    assert_eq!(spam.status, StatusCode::BAD_REQUEST);
    assert_eq!(spam.body["error"], "Spam detected");

    let missing = call(
        &app,
        Method::POST,
        "/contact",
        None,
        Some(json!({ "name": "Visitor", "email": "v@example.com", "message": "  " })),
    )
    .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["error"], "All fields are required");

    let bad_email = call(
        &app,
        Method::POST,
        "/contact",
        None,
        Some(json!({ "name": "Visitor", "email": "nope", "message": "hi" })),
    )
    .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_requires_admin_with_distinct_outcomes() {
    let app = test_app(None).router;
    call(&app, Method::POST, "/contact", None, Some(submission("First"))).await;
    call(&app, Method::POST, "/contact", None, Some(submission("Second"))).await;

    let anonymous = call(&app, Method::GET, "/contact", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["code"], "AUTH.UNAUTHENTICATED");

    let (user_token, _) = register(&app, "plain@example.com", "pw").await;
    let forbidden = call(&app, Method::GET, "/contact", Some(&user_token), None).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(forbidden.body["code"], "AUTH.FORBIDDEN");

    let admin = login(&app, "admin@example.com", "admin-pw").await;
    let (admin_token, _) = tokens(&admin.body);
    let listed = call(&app, Method::GET, "/api/contact", Some(&admin_token), None).await;
    assert_eq!(listed.status, StatusCode::OK);
    let items = listed.body.as_array().expect("array");
    assert_eq!(items.len(), 2);
    assert!(items[0]["submittedAt"].as_u64() >= items[1]["submittedAt"].as_u64());
    assert_eq!(items[0]["email"], "visitor@example.com");
}

#[tokio::test]
async fn admin_email_override_only_when_configured() {
    let with_override = test_app(Some(ADMIN_EMAIL)).router;
    let (token, _) = register(&with_override, "Boss@Example.com", "pw").await;
    let listed = call(&with_override, Method::GET, "/contact", Some(&token), None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body, json!([]));

    let me = call(&with_override, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(me.body["user"]["role"], "user");

    let without_override = test_app(None).router;
    let (token, _) = register(&without_override, "boss@example.com", "pw").await;
    let denied = call(&without_override, Method::GET, "/contact", Some(&token), None).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
}
