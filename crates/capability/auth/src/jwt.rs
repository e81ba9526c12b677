use crate::{AuthError, AuthTokens, now_epoch_seconds};
use api_contract::{ACCESS_TOKEN_TYPE, CLAIMS_VERSION, REFRESH_TOKEN_TYPE, TokenClaims};
use domain::User;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// token 校验接口（门禁依赖此 trait，便于替换实现与测试）。
pub trait TokenVerifier: Send + Sync {
    /// 校验 access token 的签名与过期时间并返回 claims。
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// JWT 生成与校验（HS256，单一对称密钥）。
pub struct JwtManager {
    secret: Vec<u8>,
    access_ttl_seconds: u64,
    refresh_ttl_seconds: u64,
}

impl JwtManager {
    /// 创建 JWT 管理器。
    pub fn new(secret: String, access_ttl_seconds: u64, refresh_ttl_seconds: u64) -> Self {
        Self {
            secret: secret.into_bytes(),
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    /// 签发 access/refresh token 对。
    pub fn issue_tokens(&self, user: &User) -> Result<AuthTokens, AuthError> {
        let access_token = self.issue_access(user)?;
        let refresh_token = self.issue_refresh(user)?;
        Ok(AuthTokens {
            access_token,
            refresh_token,
            expires_at: now_epoch_seconds() + self.access_ttl_seconds,
        })
    }

    /// 签发 access token（携带邮箱与角色）。
    pub fn issue_access(&self, user: &User) -> Result<String, AuthError> {
        self.encode(user, self.access_ttl_seconds, ACCESS_TOKEN_TYPE)
    }

    /// 签发 refresh token（仅用于换取新的 access token）。
    pub fn issue_refresh(&self, user: &User) -> Result<String, AuthError> {
        self.encode(user, self.refresh_ttl_seconds, REFRESH_TOKEN_TYPE)
    }

    /// 校验 refresh token。
    pub fn verify_refresh(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.decode(token, REFRESH_TOKEN_TYPE)
    }

    fn encode(&self, user: &User, ttl_seconds: u64, token_type: &str) -> Result<String, AuthError> {
        let claims = TokenClaims {
            ver: CLAIMS_VERSION,
            sub: user.id.clone(),
            email: user.email.clone(),
            role: Some(user.role),
            exp: now_epoch_seconds() + ttl_seconds,
            token_type: token_type.to_string(),
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|err| AuthError::Internal(err.to_string()))
    }

    /// 解码并校验 token 类型与 claims 版本。
    fn decode(&self, token: &str, expected_type: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        let decoded = jsonwebtoken::decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(map_jwt_error)?;
        let claims = decoded.claims;
        if claims.ver != CLAIMS_VERSION || claims.token_type != expected_type {
            return Err(AuthError::InvalidToken);
        }
        // jsonwebtoken 只在 exp < now 时报错，这里把 exp == now 也视为过期
        if claims.exp <= now_epoch_seconds() {
            return Err(AuthError::ExpiredToken);
        }
        Ok(claims)
    }
}

impl TokenVerifier for JwtManager {
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.decode(token, ACCESS_TOKEN_TYPE)
    }
}

/// 将 jwt 库错误映射为业务错误。
fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    }
}
