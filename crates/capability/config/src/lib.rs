//! 应用运行配置加载（服务端 `AppConfig` 与客户端 `ClientConfig`）。

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 服务端运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    /// 未配置时使用内存存储。
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_access_ttl_seconds: u64,
    pub jwt_refresh_ttl_seconds: u64,
    /// 管理员邮箱覆盖规则（小写）。
    pub admin_email: Option<String>,
    pub reset_token_ttl_seconds: u64,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = read_optional("IDF_JWT_SECRET")
            .ok_or_else(|| ConfigError::Missing("IDF_JWT_SECRET".to_string()))?;
        let jwt_access_ttl_seconds = read_u64_with_default("IDF_JWT_ACCESS_TTL_SECONDS", 3600)?;
        let jwt_refresh_ttl_seconds =
            read_u64_with_default("IDF_JWT_REFRESH_TTL_SECONDS", 30 * 24 * 3600)?;
        if jwt_access_ttl_seconds == 0 {
            return Err(ConfigError::Invalid(
                "IDF_JWT_ACCESS_TTL_SECONDS".to_string(),
                "0".to_string(),
            ));
        }
        let http_addr = env::var("IDF_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let database_url = read_optional("IDF_DATABASE_URL");
        let admin_email = read_optional("IDF_ADMIN_EMAIL")
            .map(|value| value.trim().to_ascii_lowercase())
            .filter(|value| !value.is_empty());
        let reset_token_ttl_seconds = read_u64_with_default("IDF_RESET_TOKEN_TTL_SECONDS", 3600)?;

        Ok(Self {
            http_addr,
            database_url,
            jwt_secret,
            jwt_access_ttl_seconds,
            jwt_refresh_ttl_seconds,
            admin_email,
            reset_token_ttl_seconds,
        })
    }
}

/// 客户端会话配置。
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API 根地址（不含末尾 `/`）。
    pub api_base_url: String,
    /// 所有请求（含续期）共用的网络超时。
    pub request_timeout: Duration,
    /// 在 access token 过期前多久主动续期。
    pub renewal_lead: Duration,
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080/api".to_string(),
            request_timeout: Duration::from_millis(10_000),
            renewal_lead: Duration::from_secs(60),
            session_file: PathBuf::from(".idf-session.json"),
        }
    }
}

impl ClientConfig {
    /// 从环境变量读取配置，缺省项使用默认值。
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let api_base_url = read_optional("IDF_API_BASE_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        let request_timeout = Duration::from_millis(read_u64_with_default(
            "IDF_REQUEST_TIMEOUT_MS",
            defaults.request_timeout.as_millis() as u64,
        )?);
        let renewal_lead = Duration::from_secs(read_u64_with_default(
            "IDF_RENEWAL_LEAD_SECONDS",
            defaults.renewal_lead.as_secs(),
        )?);
        let session_file = read_optional("IDF_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_file);

        Ok(Self {
            api_base_url,
            request_timeout,
            renewal_lead,
            session_file,
        })
    }

    /// 拼接接口地址。
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base_url, path)
        } else {
            format!("{}/{}", self.api_base_url, path)
        }
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => return Ok(default),
    };
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
