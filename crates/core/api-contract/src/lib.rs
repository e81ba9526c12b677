//! 稳定的 DTO 与 API 错误契约（客户端与服务端共用）。

use domain::User;
use serde::{Deserialize, Serialize};

/// 失败响应的错误体：`{"error": "...", "code": "..."}`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
        }
    }
}

/// 错误码常量。
pub mod codes {
    pub const UNAUTHENTICATED: &str = "AUTH.UNAUTHENTICATED";
    pub const FORBIDDEN: &str = "AUTH.FORBIDDEN";
    pub const INVALID_CREDENTIALS: &str = "AUTH.INVALID_CREDENTIALS";
    pub const INVALID_RESET_TOKEN: &str = "AUTH.INVALID_RESET_TOKEN";
    pub const CONFLICT: &str = "ACCOUNT.CONFLICT";
    pub const INVALID_REQUEST: &str = "INVALID.REQUEST";
    pub const INTERNAL: &str = "INTERNAL.ERROR";
}

/// 注册请求体。缺失字段在 handler 中校验并返回 400。
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// 登录请求体（`email` 或 `username` 二选一）。
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// 登录标识：优先 email，其次 username。
    pub fn identifier(&self) -> Option<&str> {
        self.email
            .as_deref()
            .or(self.username.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// 登录/注册响应体。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// 刷新 token 响应体（只返回新的 access token）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
}

/// `/auth/me` 响应体。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

/// 忘记密码请求体。
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// 重置密码请求体。
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// 空响应体 `{}`。
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EmptyResponse {}

/// 联系表单提交请求体。
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub send_copy: bool,
    /// 反垃圾隐藏字段，正常用户不会填写。
    #[serde(default)]
    pub honeypot: Option<String>,
}

/// 联系表单提交结果。
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactAccepted {
    pub success: bool,
}

/// 联系表单记录（管理后台列表）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmissionDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    /// 提交时间（Unix 毫秒时间戳）。
    pub submitted_at: u64,
}

/// 认证计数快照（`GET /metrics`，仅 admin）。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthMetricsDto {
    pub sign_ins: u64,
    pub logins: u64,
    pub logouts: u64,
    pub renewals_started: u64,
    pub renewals_succeeded: u64,
    pub renewals_failed: u64,
    pub gate_rejections: u64,
}

/// 当前 token claims 结构版本。
pub const CLAIMS_VERSION: u8 = 1;

/// access token 类型标识。
pub const ACCESS_TOKEN_TYPE: &str = "access";
/// refresh token 类型标识。
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// JWT claims（显式、带版本号的结构）。
///
/// 服务端校验签名后使用；客户端仅在未校验状态下读取 `exp` 用于续期调度。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub ver: u8,
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    /// 缺失时门禁只能依赖管理员邮箱覆盖规则。
    #[serde(default)]
    pub role: Option<domain::Role>,
    /// 过期时间（Unix 秒）。
    pub exp: u64,
    pub token_type: String,
}
