//! 密码重置凭据的生成、投递与解析。
//!
//! 对外 token 形如 `<user_id>.<secret>`，存储层只保存 secret 与过期时间。

use domain::User;

/// 重置凭据投递接口（邮件等外部通道由实现方负责）。
pub trait ResetNotifier: Send + Sync {
    fn deliver(&self, user: &User, token: &str);
}

/// 默认实现：只写日志。
pub struct LoggingResetNotifier;

impl ResetNotifier for LoggingResetNotifier {
    fn deliver(&self, user: &User, token: &str) {
        tracing::info!(user_id = %user.id, "password reset token issued");
        tracing::debug!(user_id = %user.id, token = %token, "password reset token");
    }
}

pub(crate) fn new_secret() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub(crate) fn compose(user_id: &str, secret: &str) -> String {
    format!("{}.{}", user_id, secret)
}

pub(crate) fn split(token: &str) -> Option<(&str, &str)> {
    let (user_id, secret) = token.trim().rsplit_once('.')?;
    if user_id.is_empty() || secret.is_empty() {
        return None;
    }
    Some((user_id, secret))
}
