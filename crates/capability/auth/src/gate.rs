//! 角色门禁：校验 bearer token 并判定调用方是否具备所需角色。
//!
//! 判定顺序：
//! 1. 无 token 或 token 校验失败 → `Unauthenticated`
//! 2. token 中的角色满足要求 → 放行（以 token 角色为准）
//! 3. 仅当要求 `Admin`、配置了管理员邮箱且 token 邮箱与之匹配（忽略大小写）→ 放行，
//!    `Identity::via_override = true`
//! 4. 其余 → `Forbidden`
//!
//! 覆盖规则只在第 2 步未放行时生效，不会改写已满足要求的 token 角色。

use crate::jwt::TokenVerifier;
use crate::normalize_email;
use domain::{Identity, Role};
use std::sync::Arc;

/// 门禁拒绝原因。两者语义不同，调用方不得合并处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("insufficient role")]
    Forbidden,
}

#[derive(Clone)]
pub struct AuthorizationGate {
    verifier: Arc<dyn TokenVerifier>,
    admin_email: Option<String>,
}

impl AuthorizationGate {
    pub fn new(verifier: Arc<dyn TokenVerifier>, admin_email: Option<String>) -> Self {
        let admin_email = admin_email
            .map(|email| normalize_email(&email))
            .filter(|email| !email.is_empty());
        Self {
            verifier,
            admin_email,
        }
    }

    /// 对请求携带的 bearer token 执行门禁判定。
    pub fn authorize(&self, bearer: Option<&str>, required: Role) -> Result<Identity, GateError> {
        let token = bearer
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(GateError::Unauthenticated)?;
        let claims = self.verifier.verify(token).map_err(|err| {
            tracing::debug!(error = %err, "bearer token rejected");
            GateError::Unauthenticated
        })?;

        let email = claims.email.as_deref().map(normalize_email);
        if let Some(role) = claims.role {
            if role.satisfies(required) {
                return Ok(Identity::new(claims.sub, email, role));
            }
        }

        if required == Role::Admin && self.matches_admin_email(email.as_deref()) {
            tracing::info!(user_id = %claims.sub, "admin access granted by email override");
            let mut identity = Identity::new(claims.sub, email, Role::Admin);
            identity.via_override = true;
            return Ok(identity);
        }

        Err(GateError::Forbidden)
    }

    fn matches_admin_email(&self, email: Option<&str>) -> bool {
        match (self.admin_email.as_deref(), email) {
            (Some(admin), Some(email)) => admin == email,
            _ => false,
        }
    }
}
