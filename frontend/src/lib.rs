//! 学生申诉门户前端
//!
//! 采用 Context-Driven 的架构：
//! - `grievance_portal::route` / `guard`: 路由定义与守卫规则（核心库，纯逻辑）
//! - `web::router`: 路由服务（History API）
//! - `auth`: 认证上下文
//! - `api`: 注入了 Bearer 中间件的 API 客户端
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod admin;
    pub mod alert;
    pub mod dashboard;
    pub mod grievance_detail;
    pub mod home;
    pub mod layout;
    pub mod login;
    pub mod register;
    pub mod submit_grievance;
}

use crate::api::portal_api;
use crate::auth::AuthContext;
use crate::components::admin::AdminPage;
use crate::components::dashboard::DashboardPage;
use crate::components::grievance_detail::GrievanceDetailPage;
use crate::components::home::HomePage;
use crate::components::layout::{Footer, Header};
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;
use crate::components::submit_grievance::SubmitGrievancePage;

use grievance_portal::AppRoute;
use leptos::prelude::*;

// 原生 Web API 封装模块
// 对浏览器 API 的轻量级封装，实现核心库的 HttpClient / KeyValueStore。
pub(crate) mod web {
    pub mod file;
    mod http;
    pub mod router;
    mod storage;

    pub use http::BrowserHttpClient;
    pub use storage::BrowserStorage;
}

use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件（守卫已在 RouterOutlet 中完成）。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login { registered } => view! { <LoginPage registered=registered /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard { submitted } => {
            view! { <DashboardPage submitted=submitted /> }.into_any()
        }
        AppRoute::Submit => view! { <SubmitGrievancePage /> }.into_any(),
        AppRoute::Grievance(id) => view! { <GrievanceDetailPage id=id /> }.into_any(),
        AppRoute::Admin => view! { <AdminPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="text-center py-16">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"Page not found"</p>
                <Link to=AppRoute::Home class="btn btn-primary mt-6">"Back to home"</Link>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. API 客户端（令牌在每次请求时从 localStorage 读取）
    provide_context(portal_api());

    // 3. 从 localStorage 恢复会话；在此之前守卫处于等待状态
    auth_ctx.init();

    view! {
        // 4. 路由器组件：注入认证阶段实现守卫
        <Router phase=auth_ctx.phase_signal()>
            <div class="min-h-screen flex flex-col bg-base-200">
                <Header />
                <main class="flex-1 container mx-auto px-4 py-6">
                    <RouterOutlet matcher=route_matcher />
                </main>
                <Footer />
            </div>
        </Router>
    }
}
