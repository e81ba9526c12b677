//! 存储层错误类型
//!
//! 定义统一的存储错误类型，用于封装底层错误：
//! - 唯一约束冲突（邮箱/用户名重复）
//! - SQL 执行与连接错误

#[derive(Debug)]
pub enum StorageError {
    /// 唯一约束冲突。
    Conflict(String),
    /// 后端错误（SQL、连接、锁中毒、数据不一致）。
    Backend(String),
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict(message) => write!(f, "conflict: {}", message),
            Self::Backend(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for StorageError {}

// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return Self::Conflict(db_err.message().to_string());
            }
        }
        Self::new(err.to_string())
    }
}
