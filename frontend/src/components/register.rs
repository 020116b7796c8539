use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::alert::Alert;
use crate::web::router::{Link, use_router};
use grievance_portal::AppRoute;
use grievance_portal::auth::{Registration, register_and_sign_in};
use grievance_portal::forms::RegisterForm;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";

/// 注册成功后立即登录；登录失败时转到登录页并提示注册成功
#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let is_submitting = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        error_msg.set(None);

        let form = RegisterForm {
            email: email.get(),
            password: password.get(),
            confirm_password: confirm_password.get(),
        };
        let email = match form.validate() {
            Ok(email) => email.to_string(),
            Err(e) => {
                error_msg.set(Some(e.to_string()));
                return;
            }
        };

        is_submitting.set(true);
        let api = api.clone();
        spawn_local(async move {
            match register_and_sign_in(&api, &email, &form.password).await {
                Ok(Registration::SignedIn { user, token }) => match auth.login(user, &token) {
                    Ok(()) => router.navigate(AppRoute::auth_success_redirect()),
                    Err(e) => {
                        log::error!("could not persist session: {}", e);
                        router.navigate(AppRoute::Login { registered: true });
                    }
                },
                Ok(Registration::RegisteredOnly(_)) => {
                    router.navigate(AppRoute::Login { registered: true });
                }
                Err(e) => error_msg.set(Some(e.user_message(REGISTRATION_FAILED))),
            }
            is_submitting.set(false);
        });
    };

    let input = move |id: &'static str, label: &'static str, kind: &'static str, placeholder: &'static str, value: RwSignal<String>| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    placeholder=placeholder
                    on:input=move |ev| value.set(event_target_value(&ev))
                    prop:value=value
                    class="input input-bordered"
                    required
                />
            </div>
        }
    };

    view! {
        <div class="card max-w-md mx-auto mt-12 bg-base-100 shadow-sm">
            <form class="card-body space-y-2" on:submit=on_submit>
                <h2 class="card-title text-2xl mb-2">"Register"</h2>

                <Alert message=error_msg on_dismiss=move |_: ()| error_msg.set(None) />

                {input("email", "Email", "email", "student@college.edu", email)}
                {input("password", "Password", "password", "••••••", password)}
                {input("confirm_password", "Confirm Password", "password", "••••••", confirm_password)}

                <div class="form-control mt-4">
                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() { "Registering..." } else { "Register" }}
                    </button>
                </div>

                <p class="text-center text-sm opacity-70">
                    "Already have an account? "
                    <Link to=AppRoute::Login { registered: false } class="link link-primary">
                        "Login here"
                    </Link>
                </p>
            </form>
        </div>
    }
}
