//! HTTP 响应辅助函数和 DTO 转换
//!
//! 所有失败响应统一为 `{"error": "...", "code": "..."}`，状态码与错误码一一对应。

use api_contract::{ContactSubmissionDto, ErrorResponse, codes};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use idf_auth::AuthError;
use idf_storage::{ContactSubmissionRecord, StorageError};

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(code, message))).into_response()
}

/// 未认证（无 token、token 无效或过期）
pub fn unauthenticated_error() -> Response {
    error_response(
        StatusCode::UNAUTHORIZED,
        codes::UNAUTHENTICATED,
        "Authentication required",
    )
}

/// 已认证但角色不足
pub fn forbidden_error() -> Response {
    error_response(
        StatusCode::FORBIDDEN,
        codes::FORBIDDEN,
        "Administrator access required",
    )
}

pub fn bad_request_error(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, codes::INVALID_REQUEST, message)
}

/// 认证错误统一映射
pub fn auth_error(err: AuthError) -> Response {
    match err {
        AuthError::InvalidCredentials => error_response(
            StatusCode::UNAUTHORIZED,
            codes::INVALID_CREDENTIALS,
            "Invalid credentials.",
        ),
        AuthError::InvalidToken | AuthError::ExpiredToken => error_response(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHENTICATED,
            "Invalid or expired token",
        ),
        AuthError::Conflict => error_response(
            StatusCode::CONFLICT,
            codes::CONFLICT,
            "An account with this email or username already exists.",
        ),
        AuthError::Validation(message) => bad_request_error(message),
        AuthError::InvalidResetToken => error_response(
            StatusCode::BAD_REQUEST,
            codes::INVALID_RESET_TOKEN,
            "Invalid or expired reset token.",
        ),
        AuthError::Internal(message) => {
            tracing::error!(error = %message, "auth internal error");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::INTERNAL,
                "An unexpected error occurred.",
            )
        }
    }
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    tracing::error!(error = %err, "storage error");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        codes::INTERNAL,
        "An unexpected error occurred.",
    )
}

/// ContactSubmissionRecord 转 ContactSubmissionDto
pub fn contact_to_dto(record: ContactSubmissionRecord) -> ContactSubmissionDto {
    ContactSubmissionDto {
        id: record.id,
        name: record.name,
        email: record.email,
        message: record.message,
        submitted_at: record.submitted_at_ms,
    }
}
