use crate::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

pub use grievance_shared::protocol::HttpMethod;

#[cfg(test)]
use std::cell::RefCell;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 待上传的文件内容
#[derive(Debug, Clone, PartialEq)]
pub struct FilePayload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// 小写扩展名（不含点）
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.filename.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// multipart 表单字段
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, file: FilePayload },
}

/// 请求体
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(String),
    Multipart(Vec<FormPart>),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// 设置 JSON 请求体，同时设置 Content-Type
    pub fn with_json(mut self, body: String) -> Self {
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// 设置 multipart 请求体（Content-Type 与 boundary 由底层客户端生成）
    pub fn with_multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = Some(RequestBody::Multipart(parts));
        self
    }

    /// 按名称查找请求头（忽略大小写）
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    /// 2xx
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// 解析 JSON 响应体，空响应体按 `null` 处理（对应 204）
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let body: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &self.body
        };
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// 非 2xx 时转换为服务端错误
    pub fn error_for_status(self) -> ApiResult<Self> {
        if self.ok() {
            Ok(self)
        } else {
            Err(ApiError::from_response(self.status, &self.body))
        }
    }
}

/// HTTP 客户端特性 (Trait)
///
/// (?Send) 是因为浏览器环境下 fetch 的 Future 不是 Send 的。
/// 非 2xx 响应不是错误，只有未收到响应时才返回 `ApiError::Transport`。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

#[async_trait::async_trait(?Send)]
impl<C: HttpClient + ?Sized> HttpClient for &C {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        (**self).send(req).await
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

/// 发出的请求记录
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
}

#[cfg(test)]
impl RecordedRequest {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn json_body(&self) -> Option<serde_json::Value> {
        match &self.body {
            Some(RequestBody::Json(s)) => serde_json::from_str(s).ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
pub struct MockHttpClient {
    // ((Method, URL), 按顺序消费的 (Status, Body) 队列；最后一个会被重复使用)
    responses: RefCell<HashMap<(String, String), Vec<(u16, Vec<u8>)>>>,
    // URL 集合：模拟网络失败
    unreachable: RefCell<Vec<String>>,
    pub requests: RefCell<Vec<RecordedRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            unreachable: RefCell::new(Vec::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.mock_raw(method, url, status, body.to_string().into_bytes());
    }

    pub fn mock_raw(&self, method: HttpMethod, url: &str, status: u16, body: Vec<u8>) {
        self.responses
            .borrow_mut()
            .entry((method.as_str().to_string(), url.to_string()))
            .or_default()
            .push((status, body));
    }

    pub fn mock_unreachable(&self, url: &str) {
        self.unreachable.borrow_mut().push(url.to_string());
    }

    pub fn requests_to(&self, method: HttpMethod, url: &str) -> Vec<RecordedRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        self.requests.borrow_mut().push(RecordedRequest {
            method: req.method,
            url: req.url.clone(),
            headers: req.headers.clone(),
            body: req.body.clone(),
        });

        if self.unreachable.borrow().contains(&req.url) {
            return Err(ApiError::transport("connection refused"));
        }

        let mut responses = self.responses.borrow_mut();
        let key = (req.method.as_str().to_string(), req.url.clone());
        match responses.get_mut(&key) {
            Some(queue) if !queue.is_empty() => {
                let (status, body) = if queue.len() > 1 {
                    queue.remove(0)
                } else {
                    queue[0].clone()
                };
                Ok(HttpResponse {
                    status,
                    content_type: Some("application/json".to_string()),
                    body,
                })
            }
            _ => Ok(HttpResponse::new(404, r#"{"detail":"Not Found"}"#)),
        }
    }
}
