//! 输入验证辅助函数
//!
//! - normalize_required：必填字段，去除首尾空格并检查非空
//! - is_plausible_email：最基本的邮箱形态检查

use crate::utils::response::bad_request_error;
use axum::response::Response;

/// 验证必填字段，去除空格并检查非空
pub fn normalize_required(value: Option<String>, message: &str) -> Result<String, Response> {
    let trimmed = value.as_deref().map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(bad_request_error(message));
    }
    Ok(trimmed.to_string())
}

/// `local@domain` 形态，两侧非空且不含空白
pub fn is_plausible_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
