//! # IDF Storage 模块
//!
//! 账号与联系表单的存储抽象层，支持多种存储后端实现。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：`UserStore`、`ContactStore` 异步 Trait
//! 2. **数据模型层** (`models.rs`)：`UserRecord`、`ResetTokenRecord`、`ContactSubmissionRecord`
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型（区分唯一约束冲突）
//! 4. **连接管理层** (`connection.rs`)：数据库连接池管理
//! 5. **实现层**：
//!    - `in_memory/`：内存存储实现（未配置数据库时使用，以及测试）
//!    - `postgres/`：PostgreSQL 存储实现（表结构见 `migrations/`）
//!
//! ## 设计约束
//!
//! - **禁止直接 SQL**：Handler 层禁止直接写 SQL，统一通过 storage 层
//! - **整体写入**：用户记录按字段更新，不暴露部分结构的可变引用
//! - **邮箱规范化**：存储层只做精确匹配，规范化（trim + 小写）由认证层负责

pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod traits;

pub use connection::*;
pub use error::*;
pub use models::*;
pub use traits::*;

pub use in_memory::{InMemoryContactStore, InMemoryUserStore};
pub use postgres::{PgContactStore, PgUserStore};
