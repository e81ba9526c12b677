//! 存储接口定义
//!
//! 包含以下存储接口：
//! - UserStore：账号存储（登录、注册、资料、密码重置）
//! - ContactStore：联系表单存储
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{ContactSubmissionRecord, ResetTokenRecord, UserRecord};
use async_trait::async_trait;

/// 账号存储接口
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 按规范化邮箱精确查找
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 创建账号，邮箱或用户名重复时返回 `StorageError::Conflict`
    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError>;

    /// 更新口令哈希，返回是否命中
    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError>;

    /// 设置或清除密码重置凭据，返回是否命中
    async fn set_reset_token(
        &self,
        user_id: &str,
        token: Option<ResetTokenRecord>,
    ) -> Result<bool, StorageError>;
}

/// 联系表单存储接口
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert_submission(
        &self,
        record: ContactSubmissionRecord,
    ) -> Result<ContactSubmissionRecord, StorageError>;

    /// 按提交时间倒序列出全部记录
    async fn list_submissions(&self) -> Result<Vec<ContactSubmissionRecord>, StorageError>;
}
