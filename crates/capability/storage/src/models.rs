//! 存储数据模型

use domain::{Role, User};

/// 用户记录（含口令哈希，不直接返回给客户端）。
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: String,
    /// 规范化后的邮箱（trim + 小写）。
    pub email: Option<String>,
    pub username: Option<String>,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub reset_token: Option<ResetTokenRecord>,
    pub created_at_ms: u64,
}

impl UserRecord {
    /// 转换为对外的用户结构。
    pub fn to_user(&self) -> User {
        let display_name = if self.name.is_empty() {
            self.username.clone().unwrap_or_default()
        } else {
            self.name.clone()
        };
        User::new(
            self.user_id.clone(),
            self.email.clone(),
            display_name,
            self.role,
        )
    }
}

/// 密码重置凭据。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetTokenRecord {
    pub secret: String,
    /// 过期时间（Unix 秒）。
    pub expires_at: u64,
}

/// 联系表单记录。
#[derive(Debug, Clone)]
pub struct ContactSubmissionRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at_ms: u64,
}
