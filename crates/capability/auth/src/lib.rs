//! 认证能力：JWT 签发与校验、角色门禁、账号流程（注册/登录/刷新/重置密码）。

mod gate;
mod jwt;
mod password;
mod reset;
mod service;

pub use gate::{AuthorizationGate, GateError};
pub use jwt::{JwtManager, TokenVerifier};
pub use password::{hash_password, verify_password};
pub use reset::{LoggingResetNotifier, ResetNotifier};
pub use service::{AuthService, RegisterInput};

use std::time::{SystemTime, UNIX_EPOCH};

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token invalid")]
    InvalidToken,
    #[error("token expired")]
    ExpiredToken,
    #[error("account already exists")]
    Conflict,
    #[error("{0}")]
    Validation(String),
    #[error("invalid or expired reset token")]
    InvalidResetToken,
    #[error("internal error: {0}")]
    Internal(String),
}

/// 登录/注册签发的 token 对。
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// access token 过期时间（Unix 秒）。
    pub expires_at: u64,
}

/// 当前时间戳（秒）。
pub(crate) fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// 邮箱规范化：去空白并转小写。
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
