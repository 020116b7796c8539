//! 认证状态
//!
//! 三个阶段：`Initializing`（启动时从存储恢复）、`Anonymous`、
//! `Authenticated(user)`。只有 `rehydrate` / `login` / `logout` 可以改变阶段，
//! 写入顺序为“先存储后内存”，状态变化的观察者总能读到一致的存储。

use crate::api::GrievanceApi;
use crate::error::{ApiError, SessionError, TokenError};
use crate::request::HttpClient;
use crate::session::{KeyValueStore, SessionStore};
use crate::token::{decode_claims, user_from_login};
use grievance_shared::UserSummary;
use thiserror::Error;

/// 认证阶段
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthPhase {
    #[default]
    Initializing,
    Anonymous,
    Authenticated(UserSummary),
}

impl AuthPhase {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Initializing)
    }

    pub fn user(&self) -> Option<&UserSummary> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// 认证状态持有者
///
/// 每个实例独立，测试中可随时新建。
#[derive(Debug, Clone)]
pub struct AuthStore<S> {
    sessions: SessionStore<S>,
    phase: AuthPhase,
}

impl<S: KeyValueStore> AuthStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            sessions: SessionStore::new(store),
            phase: AuthPhase::Initializing,
        }
    }

    pub fn phase(&self) -> &AuthPhase {
        &self.phase
    }

    pub fn sessions(&self) -> &SessionStore<S> {
        &self.sessions
    }

    /// 启动时恢复会话
    pub fn rehydrate(&mut self) -> &AuthPhase {
        self.phase = match self.sessions.load() {
            Some(session) => {
                log::info!("restored session for {}", session.user.email);
                AuthPhase::Authenticated(session.user)
            }
            None => AuthPhase::Anonymous,
        };
        &self.phase
    }

    /// 登录：先写存储，成功后再更新内存状态
    pub fn login(&mut self, user: UserSummary, token: &str) -> Result<&AuthPhase, SessionError> {
        self.sessions.save(&user, token)?;
        log::info!("signed in as {}", user.email);
        self.phase = AuthPhase::Authenticated(user);
        Ok(&self.phase)
    }

    /// 注销：先清存储，再清内存状态
    pub fn logout(&mut self) -> &AuthPhase {
        self.sessions.clear();
        if let AuthPhase::Authenticated(user) = &self.phase {
            log::info!("signed out {}", user.email);
        }
        self.phase = AuthPhase::Anonymous;
        &self.phase
    }
}

// =========================================================
// 登录流程
// =========================================================

/// 登录流程错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignInError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl SignInError {
    /// 面向用户的消息，只有服务端错误会带出具体原因
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(e) => e.user_message(fallback),
            Self::Token(_) => fallback.to_string(),
        }
    }
}

/// 登录并解码令牌声明，返回 `(user, token)`，由调用方交给 `AuthStore::login`
pub async fn sign_in<C: HttpClient>(
    api: &GrievanceApi<C>,
    email: &str,
    password: &str,
) -> Result<(UserSummary, String), SignInError> {
    let token = api.auth().login(email, password).await?.access_token;
    let claims = decode_claims(&token).inspect_err(|e| {
        log::warn!("login for {} returned an undecodable token: {}", email, e);
    })?;
    Ok((user_from_login(email, claims), token))
}

/// 注册结果
#[derive(Debug)]
pub enum Registration {
    /// 注册并登录成功
    SignedIn { user: UserSummary, token: String },
    /// 注册成功，但随后的登录失败
    RegisteredOnly(SignInError),
}

/// 注册后立即登录
///
/// 注册失败返回错误；登录失败不回滚注册，用户可以到登录页重试。
pub async fn register_and_sign_in<C: HttpClient>(
    api: &GrievanceApi<C>,
    email: &str,
    password: &str,
) -> Result<Registration, ApiError> {
    api.auth().register(email, password).await?;
    match sign_in(api, email, password).await {
        Ok((user, token)) => Ok(Registration::SignedIn { user, token }),
        Err(e) => {
            log::warn!("registered {} but sign-in failed: {}", email, e);
            Ok(Registration::RegisteredOnly(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::middleware::BearerAuth;
    use crate::request::{HttpMethod, MockHttpClient};
    use crate::session::{MemoryStore, STORAGE_TOKEN_KEY, STORAGE_USER_KEY};
    use crate::token::encode_test_token;
    use serde_json::json;

    const LOGIN_URL: &str = "http://api.test/api/v1/auth/login";
    const REGISTER_URL: &str = "http://api.test/api/v1/auth/register";

    fn test_api(mock: &MockHttpClient) -> GrievanceApi<&MockHttpClient> {
        GrievanceApi::new(mock, ClientConfig::new("http://api.test"))
    }

    #[test]
    fn starts_initializing() {
        let mem = MemoryStore::new();
        let store = AuthStore::new(&mem);
        assert_eq!(store.phase(), &AuthPhase::Initializing);
        assert!(!store.phase().is_authenticated());
    }

    #[test]
    fn rehydrate_without_session_is_anonymous() {
        let mem = MemoryStore::new();
        let mut store = AuthStore::new(&mem);
        assert_eq!(store.rehydrate(), &AuthPhase::Anonymous);
    }

    #[test]
    fn login_writes_storage_before_state() {
        let mem = MemoryStore::new();
        let mut store = AuthStore::new(&mem);
        store.rehydrate();

        let phase = store.login(UserSummary::new("student@college.edu"), "tok").unwrap().clone();
        assert!(phase.is_authenticated());
        assert_eq!(mem.get(STORAGE_TOKEN_KEY).as_deref(), Some("tok"));

        // 新实例（模拟刷新页面）恢复同一用户
        let mut reloaded = AuthStore::new(&mem);
        assert_eq!(reloaded.rehydrate(), &phase);
    }

    #[test]
    fn failed_write_leaves_state_anonymous() {
        let mem = MemoryStore::new();
        mem.fail_writes.borrow_mut().push(STORAGE_USER_KEY.to_string());
        let mut store = AuthStore::new(&mem);
        store.rehydrate();

        assert!(store.login(UserSummary::new("a@b.c"), "tok").is_err());
        assert_eq!(store.phase(), &AuthPhase::Anonymous);
    }

    #[test]
    fn logout_clears_both_fields_and_reload_is_anonymous() {
        let mem = MemoryStore::new();
        let mut store = AuthStore::new(&mem);
        store.login(UserSummary::new("student@college.edu"), "tok").unwrap();

        assert_eq!(store.logout(), &AuthPhase::Anonymous);
        assert!(mem.get(STORAGE_TOKEN_KEY).is_none());
        assert!(mem.get(STORAGE_USER_KEY).is_none());

        let mut reloaded = AuthStore::new(&mem);
        assert_eq!(reloaded.rehydrate(), &AuthPhase::Anonymous);
    }

    #[tokio::test]
    async fn sign_in_decodes_display_claims() {
        let mock = MockHttpClient::new();
        let token = encode_test_token(&json!({ "sub": "12", "is_admin": false }));
        mock.mock_response(HttpMethod::Post, LOGIN_URL, 200, json!({ "access_token": token }));

        let (user, returned) = sign_in(&test_api(&mock), "student@college.edu", "secret1")
            .await
            .unwrap();
        assert_eq!(user.email, "student@college.edu");
        assert!(!user.is_admin);
        assert_eq!(returned, token);
    }

    #[tokio::test]
    async fn sign_in_with_opaque_token_uses_fallback_message() {
        let mock = MockHttpClient::new();
        mock.mock_response(HttpMethod::Post, LOGIN_URL, 200, json!({ "access_token": "opaque" }));

        let err = sign_in(&test_api(&mock), "a@b.c", "secret1").await.unwrap_err();
        assert_eq!(err, SignInError::Token(TokenError::Malformed));
        assert_eq!(
            err.user_message("Login failed. Please try again."),
            "Login failed. Please try again."
        );
    }

    #[tokio::test]
    async fn sign_in_reports_rate_limit_detail() {
        let mock = MockHttpClient::new();
        mock.mock_response(
            HttpMethod::Post,
            LOGIN_URL,
            429,
            json!({ "detail": "Too many login attempts. Try again later." }),
        );
        let err = sign_in(&test_api(&mock), "a@b.c", "x").await.unwrap_err();
        assert_eq!(err.user_message("Login failed. Please try again."), "Too many login attempts. Try again later.");
    }

    #[tokio::test]
    async fn register_then_login_authenticates_submitted_email() {
        let mock = MockHttpClient::new();
        mock.mock_response(HttpMethod::Post, REGISTER_URL, 201, json!({ "id": 1, "email": "new@college.edu" }));
        let token = encode_test_token(&json!({ "sub": "1" }));
        mock.mock_response(HttpMethod::Post, LOGIN_URL, 200, json!({ "access_token": token }));

        let mem = MemoryStore::new();
        let mut store = AuthStore::new(&mem);
        store.rehydrate();

        let api = GrievanceApi::new(
            BearerAuth::new(&mock, store.sessions().clone()),
            ClientConfig::new("http://api.test"),
        );
        match register_and_sign_in(&api, "new@college.edu", "secret1").await.unwrap() {
            Registration::SignedIn { user, token } => {
                store.login(user, &token).unwrap();
            }
            Registration::RegisteredOnly(e) => panic!("unexpected sign-in failure: {e}"),
        }

        assert_eq!(
            store.phase().user().map(|u| u.email.as_str()),
            Some("new@college.edu")
        );
    }

    #[tokio::test]
    async fn register_failure_is_an_error() {
        let mock = MockHttpClient::new();
        mock.mock_response(HttpMethod::Post, REGISTER_URL, 400, json!({ "detail": "Email already registered" }));
        let err = register_and_sign_in(&test_api(&mock), "dup@college.edu", "secret1")
            .await
            .unwrap_err();
        assert_eq!(err.detail(), Some("Email already registered"));
        assert_eq!(mock.requests_to(HttpMethod::Post, LOGIN_URL).len(), 0);
    }

    #[tokio::test]
    async fn registered_only_when_login_fails() {
        let mock = MockHttpClient::new();
        mock.mock_response(HttpMethod::Post, REGISTER_URL, 201, json!({}));
        mock.mock_unreachable(LOGIN_URL);
        let outcome = register_and_sign_in(&test_api(&mock), "a@b.c", "secret1").await.unwrap();
        assert!(matches!(outcome, Registration::RegisteredOnly(SignInError::Api(ApiError::Transport(_)))));
    }
}
