//! 导航栏链接

use crate::auth::AuthPhase;
use crate::route::AppRoute;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: AppRoute,
}

impl NavLink {
    fn new(label: &'static str, route: AppRoute) -> Self {
        Self { label, route }
    }
}

/// 当前认证阶段下显示的链接
///
/// `Admin` 仅依据令牌中的显示用声明，是否有权限由服务端决定。
pub fn nav_links(phase: &AuthPhase) -> Vec<NavLink> {
    let mut links = vec![NavLink::new("Home", AppRoute::Home)];
    if let Some(user) = phase.user() {
        links.push(NavLink::new("Submit", AppRoute::Submit));
        links.push(NavLink::new(
            "My Grievances",
            AppRoute::Dashboard { submitted: false },
        ));
        if user.is_admin {
            links.push(NavLink::new("Admin", AppRoute::Admin));
        }
    }
    links
}
