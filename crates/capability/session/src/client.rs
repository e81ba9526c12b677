use crate::controller::SessionController;
use crate::error::SessionError;
use crate::transport::{ApiReply, ApiRequest};

/// 带认证的请求客户端。
///
/// 401 时通过 `RefreshCoordinator` 触发一次协调续期并用新 token 重试一次；
/// 第二次 401 原样返回，不再重试。
#[derive(Clone)]
pub struct AuthenticatedRequestClient {
    session: SessionController,
}

impl AuthenticatedRequestClient {
    pub fn new(session: SessionController) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub async fn authenticated_fetch(&self, request: &ApiRequest) -> Result<ApiReply, SessionError> {
        let transport = self.session.transport();
        let sent = self.session.current_access_token();
        let reply = transport.send(request, sent.as_deref()).await?;
        if reply.status != 401 {
            return Ok(reply);
        }
        // 匿名请求被拒绝时没有可续期的会话
        if sent.is_none() && self.session.current_access_token().is_none() {
            return Ok(reply);
        }

        tracing::debug!(path = %request.path, "request unauthorized, renewing access token");
        let fresh = self
            .session
            .coordinator()
            .renew_after(sent.as_deref())
            .await?;
        let retried = transport.send(request, Some(&fresh)).await?;
        if retried.status == 401 {
            tracing::warn!(path = %request.path, "request still unauthorized after renewal");
        }
        Ok(retried)
    }
}
