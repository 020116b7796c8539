use crate::auth::use_auth;
use crate::web::router::{Link, use_router};
use grievance_portal::AppRoute;
use grievance_portal::nav::nav_links;
use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let phase = auth.phase_signal();

    let on_logout = move |_| {
        auth.logout();
        router.navigate(AppRoute::Home);
    };

    view! {
        <header class="navbar bg-base-100 shadow-sm sticky top-0 z-20 px-4">
            <div class="flex-1 gap-3">
                <div class="w-12 h-12 rounded-full bg-primary text-primary-content flex items-center justify-center font-bold">
                    "SG"
                </div>
                <div>
                    <div class="text-lg font-bold">"Student Grievance Portal"</div>
                    <div class="text-xs opacity-60">"Transparent • Fast • Accountable"</div>
                </div>
            </div>

            <nav class="flex-none flex items-center gap-4">
                {move || {
                    nav_links(&phase.get())
                        .into_iter()
                        .map(|link| {
                            view! {
                                <Link to=link.route class="link link-hover text-sm">
                                    {link.label}
                                </Link>
                            }
                        })
                        .collect_view()
                }}

                {move || match auth.user() {
                    Some(user) => view! {
                        <div class="flex items-center gap-3">
                            <span class="text-sm opacity-70">{user.email}</span>
                            <button class="btn btn-sm btn-outline btn-error" on:click=on_logout>
                                "Logout"
                            </button>
                        </div>
                    }
                    .into_any(),
                    None => view! {
                        <Link to=AppRoute::Login { registered: false } class="btn btn-sm btn-primary">
                            "Login"
                        </Link>
                    }
                    .into_any(),
                }}
            </nav>
        </header>
    }
}

#[component]
pub fn Footer() -> impl IntoView {
    let year = js_sys::Date::new_0().get_full_year();

    view! {
        <footer class="mt-12 py-8 bg-base-100 border-t border-base-300">
            <div class="max-w-6xl mx-auto px-4 text-center text-sm opacity-70">
                {format!("© {year} Student Grievance Portal")}
            </div>
        </footer>
    }
}
