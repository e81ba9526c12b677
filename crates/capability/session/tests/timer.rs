mod support;

use idf_session::{InMemoryTokenStore, SessionController, SessionState};
use std::sync::Arc;
use std::time::Duration;
use support::{FakeApi, REFRESH_TOKEN, config, now, token_expiring_at, user};

#[tokio::test(start_paused = true)]
async fn proactive_renewal_fires_before_expiry() {
    let api = FakeApi::new();
    let store = Arc::new(InMemoryTokenStore::new());
    let session = SessionController::init(store, api.clone(), &config());
    let token = token_expiring_at(now() + 65);
    session
        .login(user(), token.clone(), REFRESH_TOKEN.to_string())
        .expect("login");

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(api.refresh_calls(), 0);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(api.refresh_calls(), 1);
    let renewed = session.current_access_token().expect("token");
    assert_ne!(renewed, token);
    assert_eq!(session.state(), SessionState::Authenticated);
}

#[tokio::test(start_paused = true)]
async fn expired_token_renews_immediately() {
    let api = FakeApi::new();
    let store = Arc::new(InMemoryTokenStore::new());
    let session = SessionController::init(store, api.clone(), &config());
    let expired = token_expiring_at(now() - 600);
    session
        .login(user(), expired.clone(), REFRESH_TOKEN.to_string())
        .expect("login");

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(api.refresh_calls(), 1);
    assert_ne!(session.current_access_token(), Some(expired));
}

#[tokio::test(start_paused = true)]
async fn malformed_token_gets_no_timer() {
    let api = FakeApi::new();
    let store = Arc::new(InMemoryTokenStore::new());
    let session = SessionController::init(store, api.clone(), &config());
    session
        .login(user(), "opaque-token".to_string(), REFRESH_TOKEN.to_string())
        .expect("login");

    tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
    assert_eq!(api.refresh_calls(), 0);
    assert_eq!(session.current_access_token().as_deref(), Some("opaque-token"));
}

#[tokio::test(start_paused = true)]
async fn logout_and_teardown_cancel_timer() {
    let api = FakeApi::new();
    let store = Arc::new(InMemoryTokenStore::new());
    let session = SessionController::init(store.clone(), api.clone(), &config());
    session
        .login(user(), token_expiring_at(now() + 65), REFRESH_TOKEN.to_string())
        .expect("login");
    session.logout();
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(api.refresh_calls(), 0);

    session
        .login(user(), token_expiring_at(now() + 65), REFRESH_TOKEN.to_string())
        .expect("login");
    session.teardown();
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(api.refresh_calls(), 0);
    assert_eq!(session.state(), SessionState::Authenticated);
}

#[tokio::test(start_paused = true)]
async fn restored_session_schedules_renewal() {
    let api = FakeApi::new();
    let store = Arc::new(InMemoryTokenStore::new());
    {
        let first = SessionController::init(store.clone(), api.clone(), &config());
        first
            .login(user(), token_expiring_at(now() - 1), REFRESH_TOKEN.to_string())
            .expect("login");
        first.teardown();
    }
    assert_eq!(api.refresh_calls(), 0);

    let restored = SessionController::init(store, api.clone(), &config());
    assert_eq!(restored.current_user(), Some(user()));
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(api.refresh_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn short_lived_token_renews_at_half_remaining_life() {
    let api = FakeApi::new();
    let store = Arc::new(InMemoryTokenStore::new());
    let session = SessionController::init(store, api.clone(), &config());
    // 剩余 30 秒，短于 60 秒提前量
    session
        .login(user(), token_expiring_at(now() + 30), REFRESH_TOKEN.to_string())
        .expect("login");

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(api.refresh_calls(), 0);

    tokio::time::sleep(Duration::from_secs(12)).await;
    assert_eq!(api.refresh_calls(), 1);
}
