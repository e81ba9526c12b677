//! 认证计数快照
//!
//! - GET /metrics（`require_role(Admin)` 之后执行）

use api_contract::AuthMetricsDto;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use idf_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(AuthMetricsDto {
            sign_ins: snapshot.sign_ins,
            logins: snapshot.logins,
            logouts: snapshot.logouts,
            renewals_started: snapshot.renewals_started,
            renewals_succeeded: snapshot.renewals_succeeded,
            renewals_failed: snapshot.renewals_failed,
            gate_rejections: snapshot.gate_rejections,
        }),
    )
        .into_response()
}
