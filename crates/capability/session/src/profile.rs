use crate::client::AuthenticatedRequestClient;
use crate::error::SessionError;
use crate::transport::ApiRequest;
use api_contract::MeResponse;
use domain::User;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub(crate) const ME_PATH: &str = "/auth/me";

/// 将缓存的用户记录与服务端的规范记录对齐。
#[derive(Clone)]
pub struct ProfileSynchronizer {
    client: AuthenticatedRequestClient,
}

impl ProfileSynchronizer {
    pub fn new(client: AuthenticatedRequestClient) -> Self {
        Self { client }
    }

    /// 拉取 `/auth/me` 并整体替换缓存用户。
    ///
    /// 匿名会话直接返回 `Ok(None)`，不发请求。重试后仍为 401 时登出并返回
    /// `Unauthenticated`；临时失败不改动缓存用户，也不在内部重试。
    pub async fn sync(&self) -> Result<Option<User>, SessionError> {
        let session = self.client.session();
        if session.current_access_token().is_none() {
            return Ok(None);
        }
        let generation = session.generation();

        let reply = self
            .client
            .authenticated_fetch(&ApiRequest::get(ME_PATH))
            .await?;
        match reply.json::<MeResponse>() {
            Ok(body) => {
                session.replace_user_if_current(generation, body.user.clone())?;
                tracing::debug!(user_id = %body.user.id, "profile synchronized");
                Ok(Some(body.user))
            }
            Err(SessionError::Unauthenticated) => {
                tracing::info!("profile sync rejected after renewal, logging out");
                session.logout();
                Err(SessionError::Unauthenticated)
            }
            Err(err) => {
                tracing::warn!(error = %err, "profile sync failed");
                Err(err)
            }
        }
    }

    /// 按固定间隔执行 `sync`，直到返回的任务被 abort。首次同步立即执行。
    pub fn spawn_periodic(&self, interval: Duration) -> JoinHandle<()> {
        let synchronizer = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = synchronizer.sync().await {
                    tracing::debug!(error = %err, "periodic profile sync skipped");
                }
            }
        })
    }
}
