//! 领域模型：用户、角色与已校验身份。

pub mod role;

pub use role::Role;

use serde::{Deserialize, Serialize};

/// 用户记录（客户端缓存与 `/auth/me` 返回的规范形态）。
///
/// 整体替换，不做字段级合并。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "name")]
    pub display_name: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        email: Option<String>,
        display_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            email,
            display_name: display_name.into(),
            role,
        }
    }
}

/// 通过门禁校验后的调用方身份，挂载到请求扩展中。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
    /// 生效角色（管理员邮箱覆盖时为 `Role::Admin`）。
    pub role: Role,
    /// 是否由管理员邮箱覆盖规则放行。
    pub via_override: bool,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, email: Option<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            email,
            role,
            via_override: false,
        }
    }
}
