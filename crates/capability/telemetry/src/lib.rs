//! 追踪、请求 ID 生成与认证计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 认证计数快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthMetricsSnapshot {
    pub logins: u64,
    pub sign_ins: u64,
    pub logouts: u64,
    pub renewals_started: u64,
    pub renewals_succeeded: u64,
    pub renewals_failed: u64,
    pub gate_rejections: u64,
}

/// 认证计数（进程级）。
pub struct AuthMetrics {
    logins: AtomicU64,
    sign_ins: AtomicU64,
    logouts: AtomicU64,
    renewals_started: AtomicU64,
    renewals_succeeded: AtomicU64,
    renewals_failed: AtomicU64,
    gate_rejections: AtomicU64,
}

impl AuthMetrics {
    pub fn new() -> Self {
        Self {
            logins: AtomicU64::new(0),
            sign_ins: AtomicU64::new(0),
            logouts: AtomicU64::new(0),
            renewals_started: AtomicU64::new(0),
            renewals_succeeded: AtomicU64::new(0),
            renewals_failed: AtomicU64::new(0),
            gate_rejections: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> AuthMetricsSnapshot {
        AuthMetricsSnapshot {
            logins: self.logins.load(Ordering::Relaxed),
            sign_ins: self.sign_ins.load(Ordering::Relaxed),
            logouts: self.logouts.load(Ordering::Relaxed),
            renewals_started: self.renewals_started.load(Ordering::Relaxed),
            renewals_succeeded: self.renewals_succeeded.load(Ordering::Relaxed),
            renewals_failed: self.renewals_failed.load(Ordering::Relaxed),
            gate_rejections: self.gate_rejections.load(Ordering::Relaxed),
        }
    }
}

impl Default for AuthMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<AuthMetrics> = OnceLock::new();

/// 获取全局认证计数实例。
pub fn metrics() -> &'static AuthMetrics {
    METRICS.get_or_init(AuthMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录客户端会话建立（登录或注册）。
pub fn record_login() {
    metrics().logins.fetch_add(1, Ordering::Relaxed);
}

/// 记录服务端签发 token 对（登录或注册成功）。
pub fn record_sign_in() {
    metrics().sign_ins.fetch_add(1, Ordering::Relaxed);
}

/// 记录会话清除。
pub fn record_logout() {
    metrics().logouts.fetch_add(1, Ordering::Relaxed);
}

/// 记录一次真正发往服务端的续期调用。
pub fn record_renewal_started() {
    metrics().renewals_started.fetch_add(1, Ordering::Relaxed);
}

pub fn record_renewal_succeeded() {
    metrics().renewals_succeeded.fetch_add(1, Ordering::Relaxed);
}

pub fn record_renewal_failed() {
    metrics().renewals_failed.fetch_add(1, Ordering::Relaxed);
}

/// 记录门禁拒绝（401/403）。
pub fn record_gate_rejection() {
    metrics().gate_rejections.fetch_add(1, Ordering::Relaxed);
}
