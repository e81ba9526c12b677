//! 账号内存存储实现

use super::poisoned;
use crate::error::StorageError;
use crate::models::{ResetTokenRecord, UserRecord};
use crate::traits::UserStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// 账号内存存储
///
/// 使用 RwLock + HashMap（以 user_id 为键）提供线程安全的内存存储。
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置账号（口令须为已哈希值）。
    pub fn with_users(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let users = records
            .into_iter()
            .map(|record| (record.user_id.clone(), record))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    fn find_where(
        &self,
        predicate: impl Fn(&UserRecord) -> bool,
    ) -> Result<Option<UserRecord>, StorageError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.values().find(|user| predicate(user)).cloned())
    }

    fn update_where(
        &self,
        user_id: &str,
        apply: impl FnOnce(&mut UserRecord),
    ) -> Result<bool, StorageError> {
        let mut users = self.users.write().map_err(poisoned)?;
        match users.get_mut(user_id) {
            Some(user) => {
                apply(user);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        self.find_where(|user| user.email.as_deref() == Some(email))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        self.find_where(|user| user.username.as_deref() == Some(username))
    }

    async fn create_user(&self, record: UserRecord) -> Result<UserRecord, StorageError> {
        let mut users = self.users.write().map_err(poisoned)?;
        let duplicate = users.values().any(|existing| {
            (record.email.is_some() && existing.email == record.email)
                || (record.username.is_some() && existing.username == record.username)
        });
        if duplicate || users.contains_key(&record.user_id) {
            return Err(StorageError::conflict("account already exists"));
        }
        users.insert(record.user_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        self.update_where(user_id, |user| {
            user.password_hash = password_hash.to_string();
        })
    }

    async fn set_reset_token(
        &self,
        user_id: &str,
        token: Option<ResetTokenRecord>,
    ) -> Result<bool, StorageError> {
        self.update_where(user_id, |user| {
            user.reset_token = token;
        })
    }
}
