//! 令牌载荷解码
//!
//! 只做 base64url 解码与 JSON 解析，不校验签名。
//! 解出的声明仅用于界面展示，权限判断以服务端响应为准。

use crate::error::TokenError;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use grievance_shared::UserSummary;
use serde_json::{Map, Value};

/// 解码紧凑令牌（`header.payload.signature`）的载荷
pub fn decode_claims(token: &str) -> Result<Map<String, Value>, TokenError> {
    let mut parts = token.trim().split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
        _ => return Err(TokenError::Malformed),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| TokenError::Encoding)?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(TokenError::Payload),
    }
}

/// 合并登录邮箱与令牌声明
///
/// 提交的邮箱覆盖令牌中的 `email`；`is_admin` 缺失时为 false。
pub fn user_from_login(email: &str, mut claims: Map<String, Value>) -> UserSummary {
    claims.remove("email");
    let is_admin = match claims.remove("is_admin") {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    };

    UserSummary {
        email: email.to_string(),
        is_admin,
        claims,
    }
}

#[cfg(test)]
pub(crate) fn encode_test_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_payload_claims() {
        let token = encode_test_token(&json!({ "sub": "12", "is_admin": false, "exp": 1700000000 }));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims["sub"], json!("12"));
        assert_eq!(claims["is_admin"], json!(false));
    }

    #[test]
    fn tolerates_padding() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"sub":"1"}"#);
        let token = format!("h.{}.s", payload);
        assert_eq!(decode_claims(&token).unwrap()["sub"], json!("1"));
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert_eq!(decode_claims("opaque-token"), Err(TokenError::Malformed));
        assert_eq!(decode_claims("a..c"), Err(TokenError::Malformed));
        assert_eq!(decode_claims("a.%%%.c"), Err(TokenError::Encoding));
        let array = URL_SAFE_NO_PAD.encode("[1,2]");
        assert_eq!(decode_claims(&format!("a.{}.c", array)), Err(TokenError::Payload));
    }

    #[test]
    fn submitted_email_wins() {
        let claims = decode_claims(&encode_test_token(&json!({
            "sub": "3", "email": "other@college.edu", "is_admin": true
        })))
        .unwrap();
        let user = user_from_login("student@college.edu", claims);
        assert_eq!(user.email, "student@college.edu");
        assert!(user.is_admin);
        assert!(!user.claims.contains_key("email"));
        assert_eq!(user.subject().as_deref(), Some("3"));
    }
}
