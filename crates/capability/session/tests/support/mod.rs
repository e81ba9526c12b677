#![allow(dead_code)]

use async_trait::async_trait;
use domain::{Role, User};
use idf_config::ClientConfig;
use idf_session::{ApiReply, ApiRequest, HttpTransport, TransportError};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const REFRESH_TOKEN: &str = "refresh-1";

static NONCE: AtomicU64 = AtomicU64::new(1);

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_secs()
}

/// 签发测试 token。`n` 保证同一秒内签发的 token 互不相同。
pub fn token_expiring_at(exp: u64) -> String {
    let claims = json!({
        "ver": 1,
        "sub": "user-1",
        "email": "a@b.com",
        "role": "user",
        "exp": exp,
        "token_type": "access",
        "n": NONCE.fetch_add(1, Ordering::Relaxed),
    });
    jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test"))
        .expect("encode")
}

pub fn user() -> User {
    User::new("user-1", Some("a@b.com".to_string()), "Alice", Role::User)
}

pub fn config() -> ClientConfig {
    ClientConfig::default()
}

/// 续期接口的脚本化行为。
#[derive(Debug, Clone)]
pub enum RefreshBehavior {
    /// 签发新的 access token（并加入服务端接受列表）。
    Issue,
    Status(u16),
    MissingToken,
    NetworkDown,
}

/// 脚本化的 API：只接受 `accepted` 中的 access token。
pub struct FakeApi {
    pub refresh_calls: AtomicUsize,
    pub me_calls: AtomicUsize,
    pub data_calls: AtomicUsize,
    accepted: Mutex<HashSet<String>>,
    refresh: Mutex<RefreshBehavior>,
    refresh_delay: Mutex<Duration>,
    profile: Mutex<User>,
    me_always_unauthorized: Mutex<bool>,
    last_refresh_bearer: Mutex<Option<String>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            refresh_calls: AtomicUsize::new(0),
            me_calls: AtomicUsize::new(0),
            data_calls: AtomicUsize::new(0),
            accepted: Mutex::new(HashSet::new()),
            refresh: Mutex::new(RefreshBehavior::Issue),
            refresh_delay: Mutex::new(Duration::ZERO),
            profile: Mutex::new(user()),
            me_always_unauthorized: Mutex::new(false),
            last_refresh_bearer: Mutex::new(None),
        })
    }

    pub fn accept(&self, token: &str) {
        self.accepted.lock().unwrap().insert(token.to_string());
    }

    pub fn set_refresh(&self, behavior: RefreshBehavior) {
        *self.refresh.lock().unwrap() = behavior;
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        *self.refresh_delay.lock().unwrap() = delay;
    }

    pub fn set_profile(&self, user: User) {
        *self.profile.lock().unwrap() = user;
    }

    pub fn reject_me(&self) {
        *self.me_always_unauthorized.lock().unwrap() = true;
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn last_refresh_bearer(&self) -> Option<String> {
        self.last_refresh_bearer.lock().unwrap().clone()
    }

    fn is_accepted(&self, bearer: Option<&str>) -> bool {
        bearer.is_some_and(|token| self.accepted.lock().unwrap().contains(token))
    }

    async fn refresh(&self, bearer: Option<&str>) -> Result<ApiReply, TransportError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_refresh_bearer.lock().unwrap() = bearer.map(str::to_string);
        let delay = *self.refresh_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let behavior = self.refresh.lock().unwrap().clone();
        match behavior {
            RefreshBehavior::Issue => {
                let token = token_expiring_at(now() + 3600);
                self.accept(&token);
                Ok(ApiReply::new(200, json!({ "accessToken": token }).to_string()))
            }
            RefreshBehavior::Status(status) => Ok(ApiReply::new(
                status,
                json!({ "error": "refresh rejected", "code": "AUTH.UNAUTHENTICATED" }).to_string(),
            )),
            RefreshBehavior::MissingToken => Ok(ApiReply::new(200, "{}")),
            RefreshBehavior::NetworkDown => Err(TransportError::Network("connection refused".into())),
        }
    }
}

#[async_trait]
impl HttpTransport for FakeApi {
    async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<ApiReply, TransportError> {
        let unauthorized = || {
            ApiReply::new(
                401,
                json!({ "error": "Unauthorized", "code": "AUTH.UNAUTHENTICATED" }).to_string(),
            )
        };
        match request.path.as_str() {
            "/auth/refresh-token" => self.refresh(bearer).await,
            "/auth/me" => {
                self.me_calls.fetch_add(1, Ordering::SeqCst);
                if *self.me_always_unauthorized.lock().unwrap() || !self.is_accepted(bearer) {
                    return Ok(unauthorized());
                }
                let user = self.profile.lock().unwrap().clone();
                Ok(ApiReply::new(200, json!({ "user": user }).to_string()))
            }
            "/data" => {
                self.data_calls.fetch_add(1, Ordering::SeqCst);
                if !self.is_accepted(bearer) {
                    return Ok(unauthorized());
                }
                Ok(ApiReply::new(200, json!({ "ok": true }).to_string()))
            }
            "/auth/login" => {
                let body = request.body.clone().unwrap_or_default();
                if body["email"] == "a@b.com" && body["password"] == "pw" {
                    let access = token_expiring_at(now() + 3600);
                    self.accept(&access);
                    let reply = json!({
                        "user": user(),
                        "accessToken": access,
                        "refreshToken": REFRESH_TOKEN,
                    });
                    Ok(ApiReply::new(200, reply.to_string()))
                } else {
                    Ok(ApiReply::new(
                        401,
                        json!({ "error": "Invalid credentials", "code": "AUTH.INVALID_CREDENTIALS" })
                            .to_string(),
                    ))
                }
            }
            "/auth/register" => Ok(ApiReply::new(
                409,
                json!({ "error": "Account already exists", "code": "ACCOUNT.CONFLICT" }).to_string(),
            )),
            "/auth/forgot-password" => Ok(ApiReply::new(200, "{}")),
            _ => Ok(ApiReply::new(404, "not found")),
        }
    }
}
