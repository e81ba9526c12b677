//! 认证和授权中间件
//!
//! - request_context：请求上下文中间件，注入 request_id/trace_id
//! - bearer_token：从 Authorization 头提取 Bearer token
//! - require_role：执行角色门禁，通过后把 `Identity` 放入请求扩展
//!
//! 门禁结果：
//! - 无 token 或 token 无效 → 401 `AUTH.UNAUTHENTICATED`
//! - 角色不足 → 403 `AUTH.FORBIDDEN`

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use domain::Role;
use idf_auth::GateError;
use idf_telemetry::new_request_ids;
use tracing::{Instrument, info_span};

use crate::AppState;
use crate::utils::response::{forbidden_error, unauthenticated_error};

/// 请求上下文中间件：注入 request_id/trace_id
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response: Response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}

/// 从请求头中提取 Bearer token
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header_value = headers.get(header::AUTHORIZATION)?;
    let auth_str = header_value.to_str().ok()?;
    auth_str.strip_prefix("Bearer ")
}

/// 角色门禁中间件（`from_fn_with_state((state, role), require_role)`）
pub async fn require_role(
    State((state, required)): State<(AppState, Role)>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match state.gate.authorize(bearer_token(req.headers()), required) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(err) => {
            idf_telemetry::record_gate_rejection();
            tracing::info!(required = %required, reason = %err, "request rejected by gate");
            match err {
                GateError::Unauthenticated => unauthenticated_error(),
                GateError::Forbidden => forbidden_error(),
            }
        }
    }
}
