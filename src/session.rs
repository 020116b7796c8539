//! 会话存储
//!
//! 令牌与用户信息成对保存在两个固定键下，读取时任何一项缺失或损坏
//! 都视为“无会话”，不会向上抛出错误。

use crate::error::SessionError;
use crate::middleware::TokenSource;
use grievance_shared::UserSummary;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

pub const STORAGE_TOKEN_KEY: &str = "access_token";
pub const STORAGE_USER_KEY: &str = "user";

/// 键值存储抽象（浏览器 localStorage / 内存）
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// 已认证会话
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserSummary,
}

/// 会话存储
#[derive(Debug, Clone, Default)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    /// 保存会话
    ///
    /// 先写用户再写令牌；令牌写入失败时回滚用户，避免留下半个会话。
    pub fn save(&self, user: &UserSummary, token: &str) -> Result<(), SessionError> {
        let user_json =
            serde_json::to_string(user).map_err(|e| SessionError::Serialize(e.to_string()))?;

        self.store.set(STORAGE_USER_KEY, &user_json)?;
        if let Err(e) = self.store.set(STORAGE_TOKEN_KEY, token) {
            self.store.remove(STORAGE_USER_KEY);
            return Err(e);
        }
        Ok(())
    }

    /// 读取会话
    pub fn load(&self) -> Option<Session> {
        let token = self.store.get(STORAGE_TOKEN_KEY).filter(|t| !t.trim().is_empty());
        let user = self
            .store
            .get(STORAGE_USER_KEY)
            .and_then(|raw| serde_json::from_str::<UserSummary>(&raw).ok());

        match (token, user) {
            (Some(token), Some(user)) => Some(Session { token, user }),
            (None, None) => None,
            _ => {
                log::warn!("discarding incomplete or corrupt stored session");
                self.clear();
                None
            }
        }
    }

    pub fn clear(&self) {
        self.store.remove(STORAGE_TOKEN_KEY);
        self.store.remove(STORAGE_USER_KEY);
    }
}

/// 只有完整会话中的令牌才会被附加到请求上
impl<S: KeyValueStore> TokenSource for SessionStore<S> {
    fn bearer_token(&self) -> Option<String> {
        self.load().map(|session| session.token)
    }
}

// =========================================================
// 测试工具: MemoryStore
// =========================================================

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    pub entries: RefCell<HashMap<String, String>>,
    /// 写入这些键时失败
    pub fail_writes: RefCell<Vec<String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        if self.fail_writes.borrow().iter().any(|k| k == key) {
            return Err(SessionError::Write { key: key.to_string() });
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}
