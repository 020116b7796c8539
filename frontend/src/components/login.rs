use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::alert::{Alert, AlertKind};
use crate::web::router::{Link, use_router};
use grievance_portal::AppRoute;
use grievance_portal::auth::sign_in;
use grievance_portal::forms::LoginForm;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

const LOGIN_FAILED: &str = "Login failed. Please try again.";

#[component]
pub fn LoginPage(
    /// 刚完成注册时显示成功提示
    registered: bool,
) -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let is_submitting = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let notice = Signal::derive(move || {
        registered.then(|| "Registration successful! Please sign in.".to_string())
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        let form = LoginForm {
            email: email.get(),
            password: password.get(),
        };
        let email = match form.validate() {
            Ok(email) => email.to_string(),
            Err(e) => {
                error_msg.set(Some(e.to_string()));
                return;
            }
        };

        is_submitting.set(true);
        error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match sign_in(&api, &email, &form.password).await {
                Ok((user, token)) => match auth.login(user, &token) {
                    Ok(()) => router.navigate(AppRoute::auth_success_redirect()),
                    Err(e) => {
                        log::error!("could not persist session: {}", e);
                        error_msg.set(Some(LOGIN_FAILED.to_string()));
                    }
                },
                Err(e) => error_msg.set(Some(e.user_message(LOGIN_FAILED))),
            }
            is_submitting.set(false);
        });
    };

    view! {
        <div class="card max-w-md mx-auto mt-12 bg-base-100 shadow-sm">
            <form class="card-body space-y-2" on:submit=on_submit>
                <h2 class="card-title text-2xl mb-2">"Login"</h2>

                <Alert message=notice kind=AlertKind::Success />
                <Alert message=error_msg on_dismiss=move |_: ()| error_msg.set(None) />

                <div class="form-control">
                    <label class="label" for="email">
                        <span class="label-text">"Email"</span>
                    </label>
                    <input
                        id="email"
                        type="email"
                        placeholder="student@college.edu"
                        on:input=move |ev| email.set(event_target_value(&ev))
                        prop:value=email
                        class="input input-bordered"
                        required
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="password">
                        <span class="label-text">"Password"</span>
                    </label>
                    <input
                        id="password"
                        type="password"
                        placeholder="••••••"
                        on:input=move |ev| password.set(event_target_value(&ev))
                        prop:value=password
                        class="input input-bordered"
                        required
                    />
                </div>
                <div class="form-control mt-4">
                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() {
                            view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                        } else {
                            "Sign In".into_any()
                        }}
                    </button>
                </div>

                <p class="text-center text-sm opacity-70">
                    "Don't have an account? "
                    <Link to=AppRoute::Register class="link link-primary">"Register here"</Link>
                </p>
            </form>
        </div>
    }
}
