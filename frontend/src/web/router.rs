//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 导航流程："监听 -> 守卫 -> 处理 -> 加载"，守卫规则来自核心库的 `guard`。

use grievance_portal::{AppRoute, AuthPhase, GuardDecision, guard};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 从浏览器地址解析当前路由
fn current_route_from_location() -> AppRoute {
    let location = web_sys::window().map(|w| w.location());
    let path = location
        .as_ref()
        .and_then(|l| l.pathname().ok())
        .unwrap_or_else(|| "/".to_string());
    let search = location
        .as_ref()
        .and_then(|l| l.search().ok())
        .unwrap_or_default();
    AppRoute::from_location(&path, &search)
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window()
        && let Ok(history) = window.history()
    {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window()
        && let Ok(history) = window.history()
    {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新，认证阶段由外部注入。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// 认证阶段（注入的信号）
    phase: Signal<AuthPhase>,
}

impl RouterService {
    fn new(phase: Signal<AuthPhase>) -> Self {
        let (current_route, set_route) = signal(current_route_from_location());
        Self {
            current_route,
            set_route,
            phase,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 当前路由的守卫结论
    pub fn decision(&self) -> GuardDecision {
        guard(&self.current_route.get(), &self.phase.get())
    }

    /// 导航到指定路由（pushState）
    pub fn navigate(&self, target: AppRoute) {
        push_history_state(&target.to_path());
        self.set_route.set(target);
    }

    /// 导航到指定路由（replaceState，不产生历史记录）
    pub fn replace(&self, target: AppRoute) {
        replace_history_state(&target.to_path());
        self.set_route.set(target);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;

        let closure = Closure::<dyn Fn()>::new(move || {
            set_route.set(current_route_from_location());
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 路由或认证阶段变化时执行守卫重定向
    ///
    /// `Initializing` 期间不重定向，保留深链接。
    fn setup_guard_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let route = router.current_route.get();
            let phase = router.phase.get();

            if let GuardDecision::Redirect(target) = guard(&route, &phase) {
                log::info!("[Router] {} -> {}", route, target);
                router.replace(target);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(phase: Signal<AuthPhase>) -> RouterService {
    let router = RouterService::new(phase);

    router.init_popstate_listener();
    router.setup_guard_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    expect_context::<RouterService>()
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 认证阶段信号
    phase: Signal<AuthPhase>,
    children: Children,
) -> impl IntoView {
    provide_router(phase);

    children()
}

/// 路由出口组件
///
/// 只有守卫结论为 `Render` 时才渲染目标视图，其余情况显示占位。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || match router.decision() {
        GuardDecision::Render => matcher(router.current_route().get()),
        GuardDecision::Wait | GuardDecision::Redirect(_) => view! {
            <div class="flex justify-center py-12">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        }
        .into_any(),
    }
}

/// 站内链接，拦截点击改为 History 导航
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(into, optional)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let href = to.to_path();

    let on_click = move |ev: web_sys::MouseEvent| {
        // 保留新标签页打开等浏览器默认行为
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() || ev.button() != 0 {
            return;
        }
        ev.prevent_default();
        router.navigate(to.clone());
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}
