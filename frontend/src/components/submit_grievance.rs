//! 提交申诉页面
//!
//! 提交由 `SubmissionSaga` 驱动：附件上传失败时申诉已存在，
//! 页面显示“附件待上传”提示，可以重试上传或直接继续。

mod form_state;

use crate::api::use_api;
use crate::components::alert::{Alert, AlertKind};
use crate::web::file::selected_file;
use crate::web::router::use_router;
use form_state::FormState;
use grievance_portal::shared::{Category, DEPARTMENTS};
use grievance_portal::submit::CREATE_FAILED;
use grievance_portal::{AppRoute, SubmissionSaga, SubmissionStage};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn SubmitGrievancePage() -> impl IntoView {
    let api = use_api();
    let router = use_router();
    let state = FormState::new();

    let saga = RwSignal::new(Option::<SubmissionSaga>::None);
    let is_submitting = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let pending = Signal::derive(move || {
        saga.with(|s| match s.as_ref().map(SubmissionSaga::stage) {
            Some(SubmissionStage::AttachmentPending { grievance, error }) => Some(format!(
                "Grievance #{} was created, but the attachment could not be uploaded: {}",
                grievance.id, error
            )),
            _ => None,
        })
    });

    // 从当前阶段继续执行提交流程
    let submit = move || {
        let draft = state.to_draft();
        // 校验失败时保留已创建的流程
        let previous = saga.get_untracked();
        let mut current = match SubmissionSaga::prepare(previous, &draft) {
            Ok(current) => current,
            Err(e) => {
                error_msg.set(Some(e.to_string()));
                return;
            }
        };

        is_submitting.set(true);
        error_msg.set(None);
        let api = api.clone();
        spawn_local(async move {
            let outcome = current.run(&api).await.cloned();
            match outcome {
                Ok(stage) if stage.is_complete() => {
                    router.navigate(AppRoute::Dashboard { submitted: true });
                }
                Ok(_) => saga.set(Some(current)),
                Err(e) => {
                    error_msg.set(Some(e.user_message(CREATE_FAILED)));
                    saga.set(Some(current));
                }
            }
            is_submitting.set(false);
        });
    };

    let on_submit = {
        let submit = submit.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            submit();
        }
    };

    let on_continue = move |_| {
        saga.update(|s| {
            if let Some(s) = s {
                s.continue_without_attachment();
            }
        });
        router.navigate(AppRoute::Dashboard { submitted: true });
    };

    let on_file_change = move |ev: leptos::ev::Event| {
        let file = selected_file(&ev);
        spawn_local(async move { state.select_file(file).await });
    };

    view! {
        <div class="card max-w-3xl mx-auto mt-4 bg-base-100 shadow-sm">
            <div class="card-body">
                <h2 class="card-title text-2xl mb-4">"Submit a Grievance"</h2>

                <Alert message=error_msg on_dismiss=move |_: ()| error_msg.set(None) />

                <Show when=move || pending.with(Option::is_some)>
                    <div class="space-y-2">
                        <Alert message=pending kind=AlertKind::Warning />
                        <div class="flex gap-3">
                            <button type="button" class="btn btn-sm btn-warning"
                                disabled=move || is_submitting.get()
                                on:click={
                                    let submit = submit.clone();
                                    move |_| submit()
                                }>
                                "Retry upload"
                            </button>
                            <button type="button" class="btn btn-sm btn-ghost" on:click=on_continue>
                                "Continue without attachment"
                            </button>
                        </div>
                    </div>
                </Show>

                <form class="space-y-6" on:submit=on_submit>
                    <div class="form-control">
                        <label class="label" for="title">
                            <span class="label-text">"Title *"</span>
                        </label>
                        <input id="title" type="text" required
                            placeholder="Short descriptive title"
                            on:input=move |ev| state.title.set(event_target_value(&ev))
                            prop:value=move || state.title.get()
                            class="input input-bordered w-full"
                        />
                    </div>

                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label" for="category">
                                <span class="label-text">"Category *"</span>
                            </label>
                            <select id="category" class="select select-bordered w-full"
                                on:change=move |ev| state.category.set(Category::from_label(&event_target_value(&ev)))
                                prop:value=move || state.category.get().label().to_string()
                            >
                                {Category::KNOWN
                                    .into_iter()
                                    .map(|c| {
                                        let label = c.label().to_string();
                                        view! { <option value=label.clone()>{label}</option> }
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="form-control">
                            <label class="label" for="dept">
                                <span class="label-text">"Department"</span>
                            </label>
                            <select id="dept" class="select select-bordered w-full"
                                on:change=move |ev| state.dept_id.set(event_target_value(&ev))
                                prop:value=move || state.dept_id.get()
                            >
                                <option value="">"Select department"</option>
                                {DEPARTMENTS
                                    .iter()
                                    .map(|d| view! { <option value=d.id.to_string()>{d.name}</option> })
                                    .collect_view()}
                            </select>
                        </div>
                    </div>

                    <div class="form-control">
                        <label class="label" for="description">
                            <span class="label-text">"Description *"</span>
                        </label>
                        <textarea id="description" rows="6" required
                            class="textarea textarea-bordered w-full"
                            placeholder="Describe the issue with details, dates, and what actions you've already taken"
                            on:input=move |ev| state.description.set(event_target_value(&ev))
                            prop:value=move || state.description.get()
                        ></textarea>
                    </div>

                    <div class="form-control">
                        <label class="label" for="file">
                            <span class="label-text">"Attach file (optional)"</span>
                        </label>
                        <input id="file" type="file" accept=".pdf,.png,.jpg,.jpeg"
                            class="file-input file-input-bordered w-full"
                            on:change=on_file_change
                        />
                        <p class="text-xs opacity-60 mt-1">"Allowed: PDF, PNG, JPG. Max 5MB"</p>
                        <Alert message=state.attachment_error
                            on_dismiss=move |_: ()| state.attachment_error.set(None) />
                    </div>

                    <div class="flex gap-3 pt-4">
                        <button type="submit" class="btn btn-primary"
                            disabled=move || is_submitting.get() || pending.with(Option::is_some)>
                            {move || if is_submitting.get() { "Submitting..." } else { "Submit Grievance" }}
                        </button>
                        <button type="button" class="btn btn-outline"
                            on:click=move |_| router.navigate(AppRoute::Dashboard { submitted: false })>
                            "Cancel"
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
