use crate::reset::{self, ResetNotifier};
use crate::{
    AuthError, AuthTokens, JwtManager, hash_password, normalize_email, now_epoch_seconds,
    verify_password,
};
use domain::{Role, User};
use idf_storage::{ResetTokenRecord, StorageError, UserRecord, UserStore};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// 注册输入。
#[derive(Debug, Default, Clone)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// 认证服务实现（基于 UserStore + JWT）。
pub struct AuthService {
    user_store: Arc<dyn UserStore>,
    jwt: Arc<JwtManager>,
    notifier: Arc<dyn ResetNotifier>,
    reset_ttl_seconds: u64,
}

impl AuthService {
    /// 创建认证服务实例。
    pub fn new(
        user_store: Arc<dyn UserStore>,
        jwt: Arc<JwtManager>,
        notifier: Arc<dyn ResetNotifier>,
        reset_ttl_seconds: u64,
    ) -> Self {
        Self {
            user_store,
            jwt,
            notifier,
            reset_ttl_seconds,
        }
    }

    /// 注册新账号（角色固定为 `user`）并签发 token。
    pub async fn register(&self, input: RegisterInput) -> Result<(User, AuthTokens), AuthError> {
        let password = input
            .password
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AuthError::Validation("Password is required.".to_string()))?;
        let email = input
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|value| !value.is_empty());
        let username = input
            .username
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        if email.is_none() && username.is_none() {
            return Err(AuthError::Validation(
                "An email or username is required.".to_string(),
            ));
        }

        let record = UserRecord {
            user_id: uuid::Uuid::new_v4().to_string(),
            email,
            username,
            name: input.name.unwrap_or_default().trim().to_string(),
            password_hash: hash_password(&password)?,
            role: Role::User,
            reset_token: None,
            created_at_ms: now_epoch_seconds().saturating_mul(1000),
        };
        let created = self
            .user_store
            .create_user(record)
            .await
            .map_err(map_storage_error)?;
        let user = created.to_user();
        let tokens = self.jwt.issue_tokens(&user)?;
        tracing::info!(user_id = %user.id, "account registered");
        Ok((user, tokens))
    }

    /// 登录校验并签发 token。标识含 `@` 时按邮箱查找，否则按用户名。
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<(User, AuthTokens), AuthError> {
        let identifier = identifier.trim();
        let record = if identifier.contains('@') {
            self.user_store
                .find_by_email(&normalize_email(identifier))
                .await
        } else {
            self.user_store.find_by_username(identifier).await
        }
        .map_err(map_storage_error)?
        .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&record.password_hash, password)? {
            return Err(AuthError::InvalidCredentials);
        }
        let user = record.to_user();
        let tokens = self.jwt.issue_tokens(&user)?;
        Ok((user, tokens))
    }

    /// 使用 refresh token 换取新的 access token（携带账号当前的邮箱与角色）。
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.jwt.verify_refresh(refresh_token)?;
        let user = self.me(&claims.sub).await?;
        self.jwt.issue_access(&user)
    }

    /// 账号当前的规范记录。账号已不存在时视为 token 无效。
    pub async fn me(&self, user_id: &str) -> Result<User, AuthError> {
        self.user_store
            .find_by_id(user_id)
            .await
            .map_err(map_storage_error)?
            .map(|record| record.to_user())
            .ok_or(AuthError::InvalidToken)
    }

    /// 发起密码重置。账号不存在时静默成功，避免账号枚举。
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Ok(());
        }
        let Some(record) = self
            .user_store
            .find_by_email(&email)
            .await
            .map_err(map_storage_error)?
        else {
            return Ok(());
        };

        let secret = reset::new_secret();
        let token = ResetTokenRecord {
            secret: secret.clone(),
            expires_at: now_epoch_seconds() + self.reset_ttl_seconds,
        };
        self.user_store
            .set_reset_token(&record.user_id, Some(token))
            .await
            .map_err(map_storage_error)?;
        self.notifier
            .deliver(&record.to_user(), &reset::compose(&record.user_id, &secret));
        Ok(())
    }

    /// 使用重置凭据设置新口令。凭据单次有效，空口令与无效凭据同样处理。
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), AuthError> {
        if password.is_empty() {
            return Err(AuthError::InvalidResetToken);
        }
        let (user_id, secret) = reset::split(token).ok_or(AuthError::InvalidResetToken)?;
        let record = self
            .user_store
            .find_by_id(user_id)
            .await
            .map_err(map_storage_error)?
            .ok_or(AuthError::InvalidResetToken)?;
        let stored = record.reset_token.ok_or(AuthError::InvalidResetToken)?;

        let matches: bool = stored.secret.as_bytes().ct_eq(secret.as_bytes()).into();
        if !matches {
            return Err(AuthError::InvalidResetToken);
        }
        if stored.expires_at <= now_epoch_seconds() {
            self.user_store
                .set_reset_token(user_id, None)
                .await
                .map_err(map_storage_error)?;
            return Err(AuthError::InvalidResetToken);
        }

        let password_hash = hash_password(password)?;
        let updated = self
            .user_store
            .update_password_hash(user_id, &password_hash)
            .await
            .map_err(map_storage_error)?;
        if !updated {
            return Err(AuthError::InvalidResetToken);
        }
        self.user_store
            .set_reset_token(user_id, None)
            .await
            .map_err(map_storage_error)?;
        tracing::info!(user_id = %user_id, "password reset completed");
        Ok(())
    }
}

fn map_storage_error(err: StorageError) -> AuthError {
    if err.is_conflict() {
        AuthError::Conflict
    } else {
        AuthError::Internal(err.to_string())
    }
}
