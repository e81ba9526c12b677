use crate::store::StoreError;
use crate::transport::TransportError;

/// 客户端会话错误。
///
/// 实现 `Clone`：一次续期的结果需要分发给所有等待者。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("authentication required")]
    Unauthenticated,
    #[error("insufficient role")]
    Forbidden,
    /// refresh token 缺失或被服务端拒绝，会话已清除。
    #[error("session expired")]
    SessionExpired,
    /// 续期暂时失败（网络、超时、5xx 等），会话保留。
    #[error("renewal unavailable: {0}")]
    RenewalUnavailable(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("request encoding failed: {0}")]
    Encoding(String),
    #[error("session storage error: {0}")]
    Storage(String),
}

impl From<TransportError> for SessionError {
    fn from(err: TransportError) -> Self {
        SessionError::Network(err.to_string())
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        SessionError::Storage(err.to_string())
    }
}
