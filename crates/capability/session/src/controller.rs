//! 会话状态机：`Anonymous` → `Authenticated` ⇄ `Refreshing` → `Anonymous`。
//!
//! `SessionController` 是 `TokenStore` 的唯一写入方，状态与存储在同一把锁内更新，
//! 两次写入不会交错。每次登录或清除会话都会递增 generation，续期结果只在
//! generation 未变时生效，避免迟到的续期结果复活已登出的会话。

use crate::claims;
use crate::coordinator::{RefreshCoordinator, RenewalSlot};
use crate::error::SessionError;
use crate::session::Session;
use crate::store::TokenStore;
use crate::transport::HttpTransport;
use domain::User;
use idf_config::ClientConfig;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::AbortHandle;

/// 会话状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
    /// 已认证且有续期调用在进行中。
    Refreshing,
}

struct SessionCell {
    session: Session,
    generation: u64,
}

pub(crate) struct Inner {
    store: Arc<dyn TokenStore>,
    transport: Arc<dyn HttpTransport>,
    cell: Mutex<SessionCell>,
    pub(crate) renewal: RenewalSlot,
    timer: Mutex<Option<AbortHandle>>,
    renewal_lead: Duration,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.timer).take() {
            handle.abort();
        }
    }
}

/// 会话控制器句柄（内部为 `Arc`，克隆开销低）。
#[derive(Clone)]
pub struct SessionController {
    pub(crate) inner: Arc<Inner>,
}

impl SessionController {
    /// 从存储恢复会话并安排主动续期。需在 tokio 运行时内调用。
    pub fn init(
        store: Arc<dyn TokenStore>,
        transport: Arc<dyn HttpTransport>,
        config: &ClientConfig,
    ) -> Self {
        let session = store.load();
        let access_token = session.access_token.clone();
        let controller = Self {
            inner: Arc::new(Inner {
                store,
                transport,
                cell: Mutex::new(SessionCell {
                    session,
                    generation: 0,
                }),
                renewal: RenewalSlot::default(),
                timer: Mutex::new(None),
                renewal_lead: config.renewal_lead,
            }),
        };
        if let Some(token) = access_token {
            tracing::info!("session restored from storage");
            controller.schedule_renewal(&token, 0);
        }
        controller
    }

    /// 取消主动续期定时器。进行中的续期不受影响。
    pub fn teardown(&self) {
        self.cancel_timer();
    }

    /// 建立会话（登录或注册成功后调用）。
    pub fn login(
        &self,
        user: User,
        access_token: String,
        refresh_token: String,
    ) -> Result<(), SessionError> {
        let user_id = user.id.clone();
        let session = Session::authenticated(user, access_token.clone(), refresh_token);
        let generation = {
            let mut cell = lock(&self.inner.cell);
            self.inner.store.save(&session)?;
            cell.session = session;
            cell.generation += 1;
            cell.generation
        };
        self.schedule_renewal(&access_token, generation);
        idf_telemetry::record_login();
        tracing::info!(user_id = %user_id, "session established");
        Ok(())
    }

    /// 清除会话并取消定时器。可重复调用。
    pub fn logout(&self) {
        if self.clear_session() {
            idf_telemetry::record_logout();
            tracing::info!("session cleared by logout");
        }
    }

    pub fn current_access_token(&self) -> Option<String> {
        lock(&self.inner.cell).session.access_token.clone()
    }

    pub fn current_user(&self) -> Option<User> {
        lock(&self.inner.cell).session.user.clone()
    }

    /// 当前会话快照。
    pub fn session(&self) -> Session {
        lock(&self.inner.cell).session.clone()
    }

    pub fn state(&self) -> SessionState {
        let authenticated = lock(&self.inner.cell).session.is_authenticated();
        if !authenticated {
            SessionState::Anonymous
        } else if self.inner.renewal.is_in_flight() {
            SessionState::Refreshing
        } else {
            SessionState::Authenticated
        }
    }

    /// 返回可用的 access token：有续期在进行时等待其结果；缓存 token 的 `exp`
    /// 已过时触发续期；无法解析 `exp` 的 token 原样返回，由服务端裁决。
    pub async fn valid_access_token(&self) -> Result<String, SessionError> {
        if let Some(ticket) = self.inner.renewal.current() {
            return ticket.await;
        }
        let token = self
            .current_access_token()
            .ok_or(SessionError::Unauthenticated)?;
        match claims::is_expired(&token) {
            Some(true) => self.coordinator().renew_after(Some(&token)).await,
            _ => Ok(token),
        }
    }

    /// 整体替换缓存的用户记录。匿名会话返回 `Unauthenticated`。
    pub fn replace_user(&self, user: User) -> Result<(), SessionError> {
        let generation = self.generation();
        self.replace_user_if_current(generation, user)
    }

    /// 强制续期（加入进行中的续期或发起新续期）。
    pub async fn request_renewal(&self) -> Result<String, SessionError> {
        self.coordinator().request_renewal().await
    }

    pub fn coordinator(&self) -> RefreshCoordinator {
        RefreshCoordinator::new(self.clone())
    }

    pub(crate) fn transport(&self) -> Arc<dyn HttpTransport> {
        self.inner.transport.clone()
    }

    pub(crate) fn generation(&self) -> u64 {
        lock(&self.inner.cell).generation
    }

    /// 仅当 generation 未变时替换用户（资料同步期间发生登出或重新登录则放弃）。
    pub(crate) fn replace_user_if_current(
        &self,
        generation: u64,
        user: User,
    ) -> Result<(), SessionError> {
        let mut cell = lock(&self.inner.cell);
        if cell.generation != generation || !cell.session.is_authenticated() {
            return Err(SessionError::Unauthenticated);
        }
        let mut next = cell.session.clone();
        next.user = Some(user);
        self.inner.store.save(&next)?;
        cell.session = next;
        Ok(())
    }

    /// 续期开始前的快照：当前 generation 与 refresh token。
    pub(crate) fn renewal_snapshot(&self) -> (u64, Option<String>) {
        let cell = lock(&self.inner.cell);
        (cell.generation, cell.session.refresh_token.clone())
    }

    /// 应用续期结果。
    ///
    /// - 成功：只替换 access token 并按新 `exp` 重排定时器
    /// - `SessionExpired`：清除会话
    /// - 其他失败：会话保持不变
    pub(crate) fn apply_renewal(
        &self,
        generation: u64,
        outcome: Result<String, SessionError>,
    ) -> Result<String, SessionError> {
        let mut cell = lock(&self.inner.cell);
        if cell.generation != generation {
            tracing::info!("renewal result discarded, session changed while renewing");
            return cell
                .session
                .access_token
                .clone()
                .ok_or(SessionError::SessionExpired);
        }
        match outcome {
            Ok(token) => {
                cell.session.access_token = Some(token.clone());
                if let Err(err) = self.inner.store.save(&cell.session) {
                    tracing::warn!(error = %err, "failed to persist renewed token");
                }
                drop(cell);
                self.schedule_renewal(&token, generation);
                Ok(token)
            }
            Err(SessionError::SessionExpired) => {
                let was_authenticated = cell.session.is_authenticated();
                Self::clear_cell(&self.inner, &mut cell);
                drop(cell);
                self.cancel_timer();
                if was_authenticated {
                    idf_telemetry::record_logout();
                    tracing::info!("session cleared, refresh token rejected");
                }
                Err(SessionError::SessionExpired)
            }
            Err(err) => Err(err),
        }
    }

    /// 返回清除前是否处于已认证状态。
    fn clear_session(&self) -> bool {
        let was_authenticated = {
            let mut cell = lock(&self.inner.cell);
            let was_authenticated = cell.session.is_authenticated();
            Self::clear_cell(&self.inner, &mut cell);
            was_authenticated
        };
        self.cancel_timer();
        was_authenticated
    }

    fn clear_cell(inner: &Inner, cell: &mut SessionCell) {
        cell.session = Session::anonymous();
        cell.generation += 1;
        if let Err(err) = inner.store.clear() {
            tracing::warn!(error = %err, "failed to clear stored session");
        }
    }

    /// 按 token 的 `exp` 安排主动续期，替换已有定时器。
    ///
    /// 定时器锁内核对 `generation`：释放会话锁后若已登出或重新登录，
    /// 新定时器直接作废。锁顺序为 timer → cell。
    pub(crate) fn schedule_renewal(&self, token: &str, generation: u64) {
        let Some(delay) = claims::renewal_delay(token, self.inner.renewal_lead) else {
            tracing::debug!("access token has no readable expiry, proactive renewal disabled");
            let mut timer = lock(&self.inner.timer);
            if lock(&self.inner.cell).generation == generation {
                if let Some(previous) = timer.take() {
                    previous.abort();
                }
            }
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime, proactive renewal disabled");
            return;
        };
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let scheduled = token.to_string();
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let controller = SessionController { inner };
            tracing::debug!("proactive renewal timer fired");
            if let Err(err) = controller.coordinator().renew_after(Some(&scheduled)).await {
                tracing::warn!(error = %err, "proactive renewal failed");
            }
        });
        let mut timer = lock(&self.inner.timer);
        if lock(&self.inner.cell).generation != generation {
            task.abort();
            tracing::debug!("session changed before timer was armed, proactive renewal dropped");
            return;
        }
        if let Some(previous) = timer.replace(task.abort_handle()) {
            previous.abort();
        }
        tracing::debug!(delay_ms = delay.as_millis() as u64, "proactive renewal scheduled");
    }

    #[cfg(test)]
    fn timer_armed(&self) -> bool {
        lock(&self.inner.timer).is_some()
    }

    fn cancel_timer(&self) {
        if let Some(handle) = lock(&self.inner.timer).take() {
            handle.abort();
        }
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
