//! 路由定义
//!
//! - 健康检查：/health
//! - 认证接口：/auth/register, /auth/login, /auth/refresh-token, /auth/me,
//!   /auth/forgot-password, /auth/reset-password
//! - 联系表单：/contact（POST 公开，GET 需要 admin）
//! - 认证计数：/metrics（需要 admin）

use crate::AppState;
use crate::handlers::*;
use crate::middleware::require_role;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use domain::Role;

/// 创建 API 路由。门禁中间件需要状态，因此在这里传入。
pub fn create_api_router(state: AppState) -> Router<AppState> {
    let user_gate = middleware::from_fn_with_state((state.clone(), Role::User), require_role);
    let admin_gate = middleware::from_fn_with_state((state, Role::Admin), require_role);
    let metrics_gate = admin_gate.clone();

    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh-token", post(refresh_token))
        .route("/auth/me", get(me).route_layer(user_gate))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route(
            "/contact",
            get(list_contact_submissions)
                .route_layer(admin_gate)
                .post(create_contact_submission),
        )
        .route("/metrics", get(get_metrics).route_layer(metrics_gate))
}
