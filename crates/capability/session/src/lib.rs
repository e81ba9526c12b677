//! 客户端会话能力：token 持久化、会话状态机、续期单飞协调、带认证请求与资料同步。
//!
//! 组件关系：
//! - `SessionController` 持有会话状态，是 `TokenStore` 的唯一写入方
//! - `RefreshCoordinator` 保证同一时刻最多一个续期调用，所有等待者共享结果
//! - `AuthenticatedRequestClient` 在 401 时触发一次协调续期并重试一次
//! - `ProfileSynchronizer` 通过带认证请求拉取 `/auth/me` 并整体替换缓存用户

mod account;
mod claims;
mod client;
mod controller;
mod coordinator;
mod error;
mod profile;
mod session;
mod store;
mod transport;

pub use account::AccountClient;
pub use claims::decode_unverified;
pub use client::AuthenticatedRequestClient;
pub use controller::{SessionController, SessionState};
pub use coordinator::RefreshCoordinator;
pub use error::SessionError;
pub use profile::ProfileSynchronizer;
pub use session::Session;
pub use store::{
    ACCESS_TOKEN_KEY, FileTokenStore, InMemoryTokenStore, REFRESH_TOKEN_KEY, StoreError,
    TokenStore, USER_KEY,
};
pub use transport::{ApiReply, ApiRequest, HttpTransport, ReqwestTransport, TransportError};
