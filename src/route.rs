//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页 (默认路由)
    #[default]
    Home,
    /// 登录页面，`registered` 表示刚完成注册
    Login { registered: bool },
    /// 注册页面
    Register,
    /// 我的投诉列表 (需要认证)，`submitted` 表示刚提交成功
    Dashboard { submitted: bool },
    /// 提交投诉 (需要认证)
    Submit,
    /// 投诉详情 (需要认证)
    Grievance(i64),
    /// 管理页 (需要认证 + 管理员声明)
    Admin,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path + query 解析为路由枚举
    pub fn from_location(path: &str, search: &str) -> Self {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };

        match path {
            "/" => Self::Home,
            "/login" => Self::Login {
                registered: query_flag(search, "registered"),
            },
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard {
                submitted: query_flag(search, "submitted"),
            },
            "/submit" => Self::Submit,
            "/admin" => Self::Admin,
            _ => path
                .strip_prefix("/grievance/")
                .and_then(|id| id.parse::<i64>().ok())
                .map_or(Self::NotFound, Self::Grievance),
        }
    }

    /// 仅由 path 解析
    pub fn from_path(path_and_query: &str) -> Self {
        match path_and_query.split_once('?') {
            Some((path, search)) => Self::from_location(path, search),
            None => Self::from_location(path_and_query, ""),
        }
    }

    /// 获取路由对应的 URL（含 query）
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login { registered: false } => "/login".to_string(),
            Self::Login { registered: true } => "/login?registered=true".to_string(),
            Self::Register => "/register".to_string(),
            Self::Dashboard { submitted: false } => "/dashboard".to_string(),
            Self::Dashboard { submitted: true } => "/dashboard?submitted=true".to_string(),
            Self::Submit => "/submit".to_string(),
            Self::Grievance(id) => format!("/grievance/{id}"),
            Self::Admin => "/admin".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫属性：该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard { .. } | Self::Submit | Self::Grievance(_) | Self::Admin
        )
    }

    /// 是否需要管理员声明
    pub fn requires_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// 已认证用户是否应该离开此路由（登录 / 注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login { .. } | Self::Register)
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login { registered: false }
    }

    /// 认证成功时的重定向目标
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard { submitted: false }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// `?a=true&b=1` 中的布尔标志
fn query_flag(search: &str, name: &str) -> bool {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(k, v)| k == name && matches!(v, "true" | "1"))
}
