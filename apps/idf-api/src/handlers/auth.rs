//! 认证相关 handlers
//!
//! ## 公开端点
//! - `GET /health` - 健康检查，返回 `{"ok": true}`
//! - `POST /auth/register` - 注册，返回 201 与 token 对
//! - `POST /auth/login` - 邮箱或用户名 + 口令登录
//! - `POST /auth/refresh-token` - Bearer refresh token 换取新的 access token
//! - `POST /auth/forgot-password` - 发起密码重置，始终返回 `{}`
//! - `POST /auth/reset-password` - 使用重置凭据设置新口令
//!
//! ## 需认证端点
//! - `GET /auth/me` - 当前账号的规范记录（`require_role(User)` 之后执行）

use crate::AppState;
use crate::middleware::bearer_token;
use crate::utils::{auth_error, bad_request_error, unauthenticated_error};
use api_contract::{
    AuthResponse, EmptyResponse, ForgotPasswordRequest, LoginRequest, MeResponse,
    RefreshTokenResponse, RegisterRequest, ResetPasswordRequest,
};
use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::Identity;
use idf_auth::RegisterInput;

/// 健康检查端点（无需认证）
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// 注册新账号
///
/// # Errors
///
/// - `400 BAD REQUEST`: 缺少口令，或邮箱与用户名都未提供
/// - `409 CONFLICT`: 邮箱或用户名已被占用
pub async fn register(State(state): State<AppState>, Json(req): Json<RegisterRequest>) -> Response {
    let input = RegisterInput {
        name: req.name,
        email: req.email,
        username: req.username,
        password: req.password,
    };
    match state.auth.register(input).await {
        Ok((user, tokens)) => {
            idf_telemetry::record_sign_in();
            let response = AuthResponse {
                user,
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => auth_error(err),
    }
}

/// 登录接口
///
/// # Errors
///
/// - `400 BAD REQUEST`: 缺少标识或口令
/// - `401 UNAUTHORIZED`: 账号不存在或口令错误（不区分两者）
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    let (Some(identifier), Some(password)) = (
        req.identifier(),
        req.password.as_deref().filter(|value| !value.is_empty()),
    ) else {
        return bad_request_error("Email/username and password are required.");
    };
    match state.auth.login(identifier, password).await {
        Ok((user, tokens)) => {
            idf_telemetry::record_sign_in();
            tracing::info!(user_id = %user.id, "login succeeded");
            let response = AuthResponse {
                user,
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => auth_error(err),
    }
}

/// 刷新 access token
///
/// refresh token 通过 `Authorization: Bearer` 传递。只返回新的 access token，
/// refresh token 本身不轮换。
pub async fn refresh_token(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return unauthenticated_error();
    };
    match state.auth.refresh(token).await {
        Ok(access_token) => {
            (StatusCode::OK, Json(RefreshTokenResponse { access_token })).into_response()
        }
        Err(err) => auth_error(err),
    }
}

/// 当前账号
pub async fn me(State(state): State<AppState>, Extension(identity): Extension<Identity>) -> Response {
    match state.auth.me(&identity.user_id).await {
        Ok(user) => (StatusCode::OK, Json(MeResponse { user })).into_response(),
        Err(err) => auth_error(err),
    }
}

/// 发起密码重置
///
/// 无论账号是否存在都返回 `{}`，内部错误只记录日志。
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Response {
    let email = req.email.unwrap_or_default();
    if let Err(err) = state.auth.forgot_password(&email).await {
        tracing::error!(error = %err, "forgot password failed");
    }
    (StatusCode::OK, Json(EmptyResponse::default())).into_response()
}

/// 使用重置凭据设置新口令
///
/// # Errors
///
/// - `400 BAD REQUEST`: 缺少字段，或凭据无效、已过期、已使用
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Response {
    let (Some(token), Some(password)) = (req.token.as_deref(), req.password.as_deref()) else {
        return bad_request_error("Token and password are required.");
    };
    match state.auth.reset_password(token, password).await {
        Ok(()) => (StatusCode::OK, Json(EmptyResponse::default())).into_response(),
        Err(err) => auth_error(err),
    }
}
