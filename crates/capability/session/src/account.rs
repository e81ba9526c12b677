//! 账号流程客户端：登录、注册、找回与重置密码。登录/注册成功后写入会话。

use crate::controller::SessionController;
use crate::error::SessionError;
use crate::transport::{ApiReply, ApiRequest};
use api_contract::{
    AuthResponse, EmptyResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest,
};
use domain::User;

#[derive(Clone)]
pub struct AccountClient {
    session: SessionController,
}

impl AccountClient {
    pub fn new(session: SessionController) -> Self {
        Self { session }
    }

    /// 登录。标识含 `@` 时作为邮箱提交，否则作为用户名。
    pub async fn sign_in(&self, identifier: &str, password: &str) -> Result<User, SessionError> {
        let identifier = identifier.trim();
        let body = if identifier.contains('@') {
            LoginRequest {
                email: Some(identifier.to_string()),
                username: None,
                password: Some(password.to_string()),
            }
        } else {
            LoginRequest {
                email: None,
                username: Some(identifier.to_string()),
                password: Some(password.to_string()),
            }
        };
        let reply = self
            .send(ApiRequest::post("/auth/login").with_json(&body)?)
            .await?;
        if reply.status == 401 {
            return Err(SessionError::InvalidCredentials);
        }
        self.establish(reply)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User, SessionError> {
        let reply = self
            .send(ApiRequest::post("/auth/register").with_json(request)?)
            .await?;
        self.establish(reply)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), SessionError> {
        let body = ForgotPasswordRequest {
            email: Some(email.to_string()),
        };
        let reply = self
            .send(ApiRequest::post("/auth/forgot-password").with_json(&body)?)
            .await?;
        reply.json::<EmptyResponse>().map(|_| ())
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), SessionError> {
        let body = ResetPasswordRequest {
            token: Some(token.to_string()),
            password: Some(password.to_string()),
        };
        let reply = self
            .send(ApiRequest::post("/auth/reset-password").with_json(&body)?)
            .await?;
        reply.json::<EmptyResponse>().map(|_| ())
    }

    pub fn sign_out(&self) {
        self.session.logout();
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiReply, SessionError> {
        Ok(self.session.transport().send(&request, None).await?)
    }

    fn establish(&self, reply: ApiReply) -> Result<User, SessionError> {
        let body = reply.json::<AuthResponse>()?;
        self.session
            .login(body.user.clone(), body.access_token, body.refresh_token)?;
        Ok(body.user)
    }
}
