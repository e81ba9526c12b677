//! 续期单飞协调：同一时刻最多一个续期调用在进行，所有需要新 token 的调用方
//! 等待同一个结果。
//!
//! 续期在独立任务中执行，票据是该任务结果的 `Shared` future。调用方被取消
//! 不会取消续期本身。

use crate::controller::{SessionController, lock};
use crate::error::SessionError;
use crate::transport::{ApiRequest, HttpTransport};
use api_contract::RefreshTokenResponse;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use std::sync::Mutex;

pub(crate) type RenewalTicket = Shared<BoxFuture<'static, Result<String, SessionError>>>;

pub(crate) const REFRESH_PATH: &str = "/auth/refresh-token";

/// 进行中的续期票据槽位。
#[derive(Default)]
pub(crate) struct RenewalSlot {
    in_flight: Mutex<Option<RenewalTicket>>,
}

impl RenewalSlot {
    pub(crate) fn current(&self) -> Option<RenewalTicket> {
        lock(&self.in_flight).clone()
    }

    pub(crate) fn is_in_flight(&self) -> bool {
        lock(&self.in_flight).is_some()
    }

    fn finish(&self) {
        lock(&self.in_flight).take();
    }
}

enum Join {
    Ready(String),
    Ticket(RenewalTicket),
}

#[derive(Clone)]
pub struct RefreshCoordinator {
    session: SessionController,
}

impl RefreshCoordinator {
    pub fn new(session: SessionController) -> Self {
        Self { session }
    }

    /// 强制续期：加入进行中的票据，否则发起新的续期。
    pub async fn request_renewal(&self) -> Result<String, SessionError> {
        match self.join(None, true) {
            Join::Ready(token) => Ok(token),
            Join::Ticket(ticket) => ticket.await,
        }
    }

    /// 被动续期入口。`stale` 是调用方被拒绝时使用的 token：
    /// 会话中已有不同的 token 时直接返回它，不再发起网络调用。
    pub async fn renew_after(&self, stale: Option<&str>) -> Result<String, SessionError> {
        match self.join(stale, false) {
            Join::Ready(token) => Ok(token),
            Join::Ticket(ticket) => ticket.await,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.session.inner.renewal.is_in_flight()
    }

    fn join(&self, stale: Option<&str>, forced: bool) -> Join {
        let mut slot = lock(&self.session.inner.renewal.in_flight);
        if let Some(ticket) = slot.as_ref() {
            return Join::Ticket(ticket.clone());
        }
        if !forced {
            if let Some(current) = self.session.current_access_token() {
                if stale != Some(current.as_str()) {
                    return Join::Ready(current);
                }
            }
        }

        let (generation, refresh_token) = self.session.renewal_snapshot();
        let handle = tokio::spawn(run_renewal(
            self.session.clone(),
            generation,
            refresh_token,
        ));
        let ticket = async move {
            handle.await.unwrap_or_else(|err| {
                Err(SessionError::RenewalUnavailable(format!(
                    "renewal task aborted: {err}"
                )))
            })
        }
        .boxed()
        .shared();
        *slot = Some(ticket.clone());
        Join::Ticket(ticket)
    }
}

async fn run_renewal(
    session: SessionController,
    generation: u64,
    refresh_token: Option<String>,
) -> Result<String, SessionError> {
    let outcome = match refresh_token.as_deref() {
        Some(token) => {
            idf_telemetry::record_renewal_started();
            tracing::info!("access token renewal started");
            call_refresh_endpoint(session.transport().as_ref(), token).await
        }
        None => Err(SessionError::SessionExpired),
    };
    let result = session.apply_renewal(generation, outcome);
    session.inner.renewal.finish();

    match &result {
        Ok(_) => {
            idf_telemetry::record_renewal_succeeded();
            tracing::info!("access token renewed");
        }
        Err(err) => {
            idf_telemetry::record_renewal_failed();
            tracing::warn!(error = %err, "access token renewal failed");
        }
    }
    result
}

/// 调用续期接口并对结果分类。
///
/// - 2xx 且带 `accessToken`：成功
/// - 2xx 缺少 `accessToken`：`MalformedResponse`
/// - 408 / 429 / 5xx / 网络错误 / 超时：`RenewalUnavailable`
/// - 其余 4xx：refresh token 被拒绝，`SessionExpired`
async fn call_refresh_endpoint(
    transport: &dyn HttpTransport,
    refresh_token: &str,
) -> Result<String, SessionError> {
    let reply = transport
        .send(&ApiRequest::post(REFRESH_PATH), Some(refresh_token))
        .await
        .map_err(|err| SessionError::RenewalUnavailable(err.to_string()))?;

    match reply.status {
        200..=299 => {
            let body: RefreshTokenResponse = serde_json::from_str(&reply.body)
                .map_err(|err| SessionError::MalformedResponse(err.to_string()))?;
            if body.access_token.is_empty() {
                return Err(SessionError::MalformedResponse(
                    "empty accessToken".to_string(),
                ));
            }
            Ok(body.access_token)
        }
        408 | 429 => Err(SessionError::RenewalUnavailable(format!(
            "status {}",
            reply.status
        ))),
        400..=499 => Err(SessionError::SessionExpired),
        status => Err(SessionError::RenewalUnavailable(format!("status {status}"))),
    }
}
