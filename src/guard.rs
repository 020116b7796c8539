//! 路由守卫
//!
//! 纯函数：由认证阶段和目标路由决定渲染、等待或重定向。

use crate::auth::AuthPhase;
use crate::route::AppRoute;

/// 守卫结论
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// 渲染目标路由
    Render,
    /// 认证状态尚未恢复，显示占位并保留当前 URL
    Wait,
    /// 替换为另一个路由
    Redirect(AppRoute),
}

/// **核心守卫逻辑**
///
/// - `Initializing` 时一律等待，不丢弃深链接
/// - 匿名访问受保护路由 -> 登录页
/// - 已认证访问登录 / 注册页 -> 面板
/// - 非管理员访问管理页 -> 面板（仅影响界面，权限由服务端校验）
pub fn guard(route: &AppRoute, phase: &AuthPhase) -> GuardDecision {
    let user = match phase {
        AuthPhase::Initializing => return GuardDecision::Wait,
        AuthPhase::Anonymous => None,
        AuthPhase::Authenticated(user) => Some(user),
    };

    match user {
        None if route.requires_auth() => GuardDecision::Redirect(AppRoute::auth_failure_redirect()),
        Some(_) if route.should_redirect_when_authenticated() => {
            GuardDecision::Redirect(AppRoute::auth_success_redirect())
        }
        Some(user) if route.requires_admin() && !user.is_admin => {
            GuardDecision::Redirect(AppRoute::auth_success_redirect())
        }
        _ => GuardDecision::Render,
    }
}
