use serde_json::Value;
use thiserror::Error;

// =========================================================
// 核心错误类型
// =========================================================

/// API 调用错误
///
/// 分类：
/// - `Transport`: 没有收到响应（网络错误、CORS、DNS 等）
/// - `Server`: 收到非 2xx 响应，`detail` 为服务端给出的可读消息
/// - `Decode` / `Encode`: 请求体序列化或响应体解析失败
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("server responded with {status}{}", detail_suffix(.detail))]
    Server { status: u16, detail: Option<String> },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("failed to encode request: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// 由响应状态码和响应体构造服务端错误
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        Self::Server {
            status,
            detail: extract_detail(body),
        }
    }

    /// 服务端提供的可读消息
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP 状态码（仅服务端错误）
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 面向用户的消息：优先使用服务端消息，否则使用该操作的兜底文案
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// 从错误响应体中提取 `detail`
///
/// - 字符串：原样返回
/// - 校验错误数组 `[{ "msg": ... }]`：以 `; ` 拼接
fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

// =========================================================
// 会话存储错误
// =========================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("failed to write `{key}` to storage")]
    Write { key: String },
    #[error("failed to serialize user: {0}")]
    Serialize(String),
}

// =========================================================
// 令牌解析错误
// =========================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenError {
    #[error("token is not a compact three-part token")]
    Malformed,
    #[error("token payload is not valid base64url")]
    Encoding,
    #[error("token payload is not a JSON object")]
    Payload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_used_verbatim() {
        let err = ApiError::from_response(400, br#"{"detail":"Email already registered"}"#);
        assert_eq!(err.detail(), Some("Email already registered"));
        assert_eq!(err.user_message("Registration failed"), "Email already registered");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn validation_array_is_flattened() {
        let body = br#"{"detail":[{"loc":["body","title"],"msg":"field required","type":"value_error.missing"},{"loc":["body","description"],"msg":"field required"}]}"#;
        let err = ApiError::from_response(422, body);
        assert_eq!(err.detail(), Some("field required; field required"));
    }

    #[test]
    fn missing_detail_falls_back() {
        let err = ApiError::from_response(500, b"Internal Server Error");
        assert_eq!(err.detail(), None);
        assert_eq!(err.user_message("Failed to load grievances"), "Failed to load grievances");

        let err = ApiError::transport("connection refused");
        assert_eq!(err.user_message("Login failed. Please try again."), "Login failed. Please try again.");
    }

    #[test]
    fn display_includes_detail() {
        let err = ApiError::Server { status: 404, detail: Some("Not found".into()) };
        assert_eq!(err.to_string(), "server responded with 404: Not found");
    }
}
