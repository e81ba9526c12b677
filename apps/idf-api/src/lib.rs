//! IDF API 服务：账号认证接口、角色门禁与联系表单。
//!
//! 路由同时挂载在 `/` 与 `/api` 前缀下。

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;

use axum::Router;
use idf_auth::{AuthService, AuthorizationGate, JwtManager, LoggingResetNotifier, ResetNotifier};
use idf_config::AppConfig;
use idf_storage::{ContactStore, InMemoryContactStore, InMemoryUserStore, UserStore};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 应用共享状态（每个请求克隆一份，内部均为 `Arc`）。
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub gate: AuthorizationGate,
    pub contact_store: Arc<dyn ContactStore>,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        user_store: Arc<dyn UserStore>,
        contact_store: Arc<dyn ContactStore>,
        notifier: Arc<dyn ResetNotifier>,
    ) -> Self {
        let jwt = Arc::new(JwtManager::new(
            config.jwt_secret.clone(),
            config.jwt_access_ttl_seconds,
            config.jwt_refresh_ttl_seconds,
        ));
        let auth = Arc::new(AuthService::new(
            user_store,
            jwt.clone(),
            notifier,
            config.reset_token_ttl_seconds,
        ));
        let gate = AuthorizationGate::new(jwt, config.admin_email.clone());
        Self {
            auth,
            gate,
            contact_store,
        }
    }

    /// 使用内存存储（未配置数据库时）。
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryContactStore::new()),
            Arc::new(LoggingResetNotifier),
        )
    }
}

/// 组装完整应用：路由 + 请求上下文 + HTTP trace。
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_api_router(state.clone()))
        .nest("/api", routes::create_api_router(state.clone()))
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_context))
        .layer(TraceLayer::new_for_http())
}
