//! 内存存储实现模块
//!
//! 未配置 `IDF_DATABASE_URL` 时使用，也用于测试。
//!
//! 包含以下实现：
//! - UserStore: InMemoryUserStore
//! - ContactStore: InMemoryContactStore

pub mod contact;
pub mod user;

pub use contact::*;
pub use user::*;

use crate::error::StorageError;

pub(crate) fn poisoned<T>(_: T) -> StorageError {
    StorageError::new("in-memory store lock poisoned")
}
