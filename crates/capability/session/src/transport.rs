//! HTTP 传输抽象。会话层只依赖 `HttpTransport`，测试中可替换为脚本化实现。

use crate::error::SessionError;
use api_contract::ErrorResponse;
use async_trait::async_trait;
use idf_config::ClientConfig;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// 一次 API 调用的描述（路径相对于 API 根地址）。
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: None,
        }
    }

    /// 附带 JSON 请求体。
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self, SessionError> {
        let value =
            serde_json::to_value(body).map_err(|err| SessionError::Encoding(err.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// 服务端响应（状态码 + 原始响应体）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 按状态码分类并解析响应体。
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, SessionError> {
        match self.status {
            401 => return Err(SessionError::Unauthenticated),
            403 => return Err(SessionError::Forbidden),
            _ if !self.is_success() => {
                return Err(SessionError::Rejected {
                    status: self.status,
                    message: self.error_message(),
                });
            }
            _ => {}
        }
        serde_json::from_str(&self.body)
            .map_err(|err| SessionError::MalformedResponse(err.to_string()))
    }

    /// 错误体中的 `error` 字段，无法解析时返回原始响应体。
    pub fn error_message(&self) -> String {
        serde_json::from_str::<ErrorResponse>(&self.body)
            .map(|body| body.error)
            .unwrap_or_else(|_| self.body.clone())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Network(String),
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// 发送请求。`bearer` 存在时附加 `Authorization: Bearer <token>`。
    async fn send(&self, request: &ApiRequest, bearer: Option<&str>)
    -> Result<ApiReply, TransportError>;
}

/// 基于 reqwest 的传输实现。所有请求共用 `ClientConfig::request_timeout`。
pub struct ReqwestTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    pub fn new(config: ClientConfig) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| SessionError::Network(err.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<ApiReply, TransportError> {
        let url = self.config.endpoint(&request.path);
        let mut builder = self.client.request(request.method.clone(), &url);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        tracing::debug!(method = %request.method, path = %request.path, status, "api call");
        Ok(ApiReply { status, body })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_contract::MeResponse;

    #[test]
    fn status_codes_map_to_session_errors() {
        let unauthenticated = ApiReply::new(401, "{}");
        assert_eq!(
            unauthenticated.json::<serde_json::Value>(),
            Err(SessionError::Unauthenticated)
        );
        let forbidden = ApiReply::new(403, "{}");
        assert_eq!(forbidden.json::<serde_json::Value>(), Err(SessionError::Forbidden));

        let rejected = ApiReply::new(409, r#"{"error":"taken","code":"ACCOUNT.CONFLICT"}"#);
        assert_eq!(
            rejected.json::<serde_json::Value>(),
            Err(SessionError::Rejected {
                status: 409,
                message: "taken".to_string()
            })
        );
    }

    #[test]
    fn undecodable_success_body_is_malformed() {
        let reply = ApiReply::new(200, r#"{"nope":true}"#);
        assert!(matches!(
            reply.json::<MeResponse>(),
            Err(SessionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn plain_text_error_keeps_body() {
        let reply = ApiReply::new(502, "bad gateway");
        assert_eq!(reply.error_message(), "bad gateway");
    }
}
