//! # PostgreSQL 存储实现模块
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 查询使用参数绑定，防止 SQL 注入攻击
//! 2. **唯一约束**：邮箱/用户名重复由数据库唯一索引保证，映射为 `StorageError::Conflict`
//! 3. **连接池管理**：使用连接池复用数据库连接
//!
//! ## 包含的实现
//!
//! - **UserStore** (`user.rs`)：账号存储
//! - **ContactStore** (`contact.rs`)：联系表单存储
//!
//! ## 数据库模式要求
//!
//! - `users`：user_id, email, username, name, password_hash, role, reset_secret, reset_expires_at, created_at_ms
//! - `contact_submissions`：id, name, email, message, submitted_at_ms
//!
//! 建表语句见仓库根目录 `migrations/0001_init.sql`。

pub mod contact;
pub mod user;

pub use contact::*;
pub use user::*;
