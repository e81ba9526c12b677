//! 会话持久化。三个固定键：`user`（序列化后的用户 JSON）、`accessToken`、`refreshToken`。
//!
//! 只负责存取，不校验 token 内容。任一键缺失或内容损坏时按匿名会话处理。

use crate::session::Session;
use domain::User;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

pub const USER_KEY: &str = "user";
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 会话存储接口。
pub trait TokenStore: Send + Sync {
    /// 读取会话（尽力而为，失败时返回匿名会话）。
    fn load(&self) -> Session;
    /// 原子地整体覆盖三个条目。匿名会话等同于 `clear`。
    fn save(&self, session: &Session) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// 本地 JSON 文件存储（写临时文件后 rename）。
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Session {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Session::anonymous(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "session file unreadable");
                return Session::anonymous();
            }
        };
        match serde_json::from_str::<HashMap<String, String>>(&raw) {
            Ok(entries) => session_from_entries(&entries),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "session file corrupt");
                Session::anonymous()
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let Some(entries) = session_to_entries(session)? else {
            return self.clear();
        };
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, serde_json::to_vec(&entries)?)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// 内存存储，供测试与无需落盘的场景使用。
#[derive(Default)]
pub struct InMemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接写入原始条目（用于构造损坏或缺失的存储状态）。
    pub fn with_entries(entries: HashMap<String, String>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// 原始条目快照。
    pub fn entries(&self) -> HashMap<String, String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Session {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        session_from_entries(&entries)
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let next = session_to_entries(session)?.unwrap_or_default();
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = next;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

fn session_from_entries(entries: &HashMap<String, String>) -> Session {
    let (Some(user), Some(access_token), Some(refresh_token)) = (
        entries.get(USER_KEY),
        entries.get(ACCESS_TOKEN_KEY),
        entries.get(REFRESH_TOKEN_KEY),
    ) else {
        return Session::anonymous();
    };
    match serde_json::from_str::<User>(user) {
        Ok(user) => Session::authenticated(user, access_token.clone(), refresh_token.clone()),
        Err(err) => {
            tracing::warn!(error = %err, "stored user record corrupt");
            Session::anonymous()
        }
    }
}

fn session_to_entries(session: &Session) -> Result<Option<HashMap<String, String>>, StoreError> {
    let (Some(user), Some(access_token), Some(refresh_token)) = (
        session.user.as_ref(),
        session.access_token.as_ref(),
        session.refresh_token.as_ref(),
    ) else {
        return Ok(None);
    };
    let mut entries = HashMap::with_capacity(3);
    entries.insert(USER_KEY.to_string(), serde_json::to_string(user)?);
    entries.insert(ACCESS_TOKEN_KEY.to_string(), access_token.clone());
    entries.insert(REFRESH_TOKEN_KEY.to_string(), refresh_token.clone());
    Ok(Some(entries))
}
