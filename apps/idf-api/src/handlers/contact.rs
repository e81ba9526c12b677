//! 联系表单 handlers
//!
//! - POST /contact - 公开提交（字段校验 + honeypot 反垃圾）
//! - GET /contact - 管理员查看全部提交，按时间倒序（`require_role(Admin)` 之后执行）

use crate::AppState;
use crate::utils::{bad_request_error, contact_to_dto, is_plausible_email, normalize_required, storage_error};
use api_contract::{ContactAccepted, ContactSubmissionDto, CreateContactRequest};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::Identity;
use idf_storage::ContactSubmissionRecord;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const ALL_FIELDS_REQUIRED: &str = "All fields are required";

pub async fn create_contact_submission(
    State(state): State<AppState>,
    Json(req): Json<CreateContactRequest>,
) -> Response {
    if req
        .honeypot
        .as_deref()
        .is_some_and(|value| !value.trim().is_empty())
    {
        tracing::info!("contact submission rejected by honeypot");
        return bad_request_error("Spam detected");
    }
    let name = match normalize_required(req.name, ALL_FIELDS_REQUIRED) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let email = match normalize_required(req.email, ALL_FIELDS_REQUIRED) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let message = match normalize_required(req.message, ALL_FIELDS_REQUIRED) {
        Ok(value) => value,
        Err(response) => return response,
    };
    if !is_plausible_email(&email) {
        return bad_request_error("A valid email is required");
    }

    let record = ContactSubmissionRecord {
        id: Uuid::new_v4().to_string(),
        name,
        email,
        message,
        submitted_at_ms: now_epoch_millis(),
    };
    match state.contact_store.insert_submission(record).await {
        Ok(saved) => {
            tracing::info!(submission_id = %saved.id, send_copy = req.send_copy, "contact submission stored");
            (StatusCode::CREATED, Json(ContactAccepted { success: true })).into_response()
        }
        Err(err) => storage_error(err),
    }
}

pub async fn list_contact_submissions(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Response {
    match state.contact_store.list_submissions().await {
        Ok(records) => {
            tracing::debug!(user_id = %identity.user_id, count = records.len(), "contact submissions listed");
            let data: Vec<ContactSubmissionDto> = records.into_iter().map(contact_to_dto).collect();
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(err) => storage_error(err),
    }
}

fn now_epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
