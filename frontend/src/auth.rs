//! 认证模块
//!
//! 在 Leptos Context 中共享核心库的 `AuthStore`。
//! 路由服务通过注入的阶段信号来执行守卫，与本模块解耦。

use crate::web::BrowserStorage;
use grievance_portal::shared::UserSummary;
use grievance_portal::{AuthPhase, AuthStore, SessionError};
use leptos::prelude::*;

/// 认证上下文
///
/// `store` 是唯一的写入者，`phase` 是它的可订阅镜像：
/// 每次写入存储成功后再更新信号。
#[derive(Clone, Copy)]
pub struct AuthContext {
    phase: RwSignal<AuthPhase>,
    store: StoredValue<AuthStore<BrowserStorage>>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self {
            phase: RwSignal::new(AuthPhase::Initializing),
            store: StoredValue::new(AuthStore::new(BrowserStorage)),
        }
    }

    /// 获取认证阶段信号（用于路由服务注入）
    pub fn phase_signal(&self) -> Signal<AuthPhase> {
        self.phase.into()
    }

    pub fn user(&self) -> Option<UserSummary> {
        self.phase.with(|p| p.user().cloned())
    }

    /// 从 localStorage 恢复会话
    pub fn init(&self) {
        if let Some(phase) = self.store.try_update_value(|s| s.rehydrate().clone()) {
            self.phase.set(phase);
        }
    }

    /// 登录并写入会话
    pub fn login(&self, user: UserSummary, token: &str) -> Result<(), SessionError> {
        let phase = self
            .store
            .try_update_value(|s| s.login(user, token).cloned())
            .ok_or(SessionError::Unavailable)??;
        self.phase.set(phase);
        Ok(())
    }

    /// 注销并清除会话
    ///
    /// 导航由路由守卫根据阶段变化自动处理。
    pub fn logout(&self) {
        if let Some(phase) = self.store.try_update_value(|s| s.logout().clone()) {
            self.phase.set(phase);
        }
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}
