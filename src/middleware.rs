//! 认证中间件
//!
//! 在构造客户端时显式套上 `BearerAuth`，为每个请求附加
//! `Authorization: Bearer <token>`，调用方不必自行读取存储。

use crate::error::ApiResult;
use crate::request::{HttpClient, HttpRequest, HttpResponse};
use grievance_shared::HEADER_AUTHORIZATION;

/// 令牌来源
///
/// 每次发送请求时读取，登录/注销后立即生效。
pub trait TokenSource {
    fn bearer_token(&self) -> Option<String>;
}

impl<T: TokenSource + ?Sized> TokenSource for &T {
    fn bearer_token(&self) -> Option<String> {
        (**self).bearer_token()
    }
}

/// 固定令牌（测试与脚本使用）
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Bearer 令牌装饰器
#[derive(Debug, Clone)]
pub struct BearerAuth<C, T> {
    inner: C,
    tokens: T,
}

impl<C, T> BearerAuth<C, T> {
    pub fn new(inner: C, tokens: T) -> Self {
        Self { inner, tokens }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn tokens(&self) -> &T {
        &self.tokens
    }
}

#[async_trait::async_trait(?Send)]
impl<C, T> HttpClient for BearerAuth<C, T>
where
    C: HttpClient,
    T: TokenSource,
{
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        // 调用方显式设置的 Authorization 优先
        if req.header(HEADER_AUTHORIZATION).is_some() {
            return self.inner.send(req).await;
        }

        let token = self
            .tokens
            .bearer_token()
            .filter(|t| !t.trim().is_empty());

        let req = match token {
            Some(token) => req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token)),
            None => {
                log::debug!("no bearer token for {:?} {}", req.method, req.url);
                req
            }
        };

        self.inner.send(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpMethod, MockHttpClient};
    use serde_json::json;

    const URL: &str = "http://api.test/api/v1/grievances/";

    #[tokio::test]
    async fn attaches_token_from_source() {
        let mock = MockHttpClient::new();
        mock.mock_response(HttpMethod::Get, URL, 200, json!([]));
        let client = BearerAuth::new(&mock, StaticToken::new("abc.def.ghi"));

        client.send(HttpRequest::new(URL, HttpMethod::Get)).await.unwrap();

        let reqs = mock.requests.borrow();
        assert_eq!(reqs[0].header("authorization"), Some("Bearer abc.def.ghi"));
    }

    #[tokio::test]
    async fn no_header_without_token() {
        let mock = MockHttpClient::new();
        let client = BearerAuth::new(&mock, StaticToken::none());
        client.send(HttpRequest::new(URL, HttpMethod::Get)).await.unwrap();

        let client = BearerAuth::new(&mock, StaticToken(Some("  ".to_string())));
        client.send(HttpRequest::new(URL, HttpMethod::Get)).await.unwrap();

        let reqs = mock.requests.borrow();
        assert!(reqs.iter().all(|r| r.header("Authorization").is_none()));
    }

    #[tokio::test]
    async fn explicit_header_is_kept() {
        let mock = MockHttpClient::new();
        let client = BearerAuth::new(&mock, StaticToken::new("stored"));
        let req = HttpRequest::new(URL, HttpMethod::Get).with_header("authorization", "Bearer explicit");
        client.send(req).await.unwrap();

        let reqs = mock.requests.borrow();
        assert_eq!(reqs[0].header("Authorization"), Some("Bearer explicit"));
        assert_eq!(reqs[0].headers.len(), 1);
    }
}
