use api_contract::TokenClaims;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// 不校验签名地解析 claims。客户端只用 `exp` 安排续期，签名由服务端负责。
pub fn decode_unverified(token: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    jsonwebtoken::decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
}

pub(crate) fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// token 的 `exp` 是否已过。无法解析时返回 `None`。
pub(crate) fn is_expired(token: &str) -> Option<bool> {
    decode_unverified(token)
        .ok()
        .map(|claims| claims.exp <= now_epoch_seconds())
}

/// 距离主动续期的等待时长。
///
/// - 无法解析：`None`（只依赖被动续期）
/// - 已过期：立即
/// - 剩余有效期不足 `lead`：剩余时间的一半
/// - 其余：`exp - lead`
pub(crate) fn renewal_delay(token: &str, lead: Duration) -> Option<Duration> {
    let claims = decode_unverified(token).ok()?;
    let remaining = claims.exp.saturating_sub(now_epoch_seconds());
    let remaining = Duration::from_secs(remaining);
    if remaining.is_zero() {
        return Some(Duration::ZERO);
    }
    if remaining <= lead {
        return Some(remaining / 2);
    }
    Some(remaining - lead)
}
