//! 管理页
//!
//! 列出全部申诉并逐行修改状态。是否有权限由服务端决定，
//! 非管理员会收到服务端的拒绝消息。

use crate::api::use_api;
use crate::components::alert::{Alert, AlertKind};
use crate::web::router::Link;
use grievance_portal::AppRoute;
use grievance_portal::{Notice, ViewState};
use grievance_portal::dashboard::status_badge_class;
use grievance_portal::shared::{Grievance, GrievancePatch, GrievanceStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

const LOAD_FAILED: &str = "Failed to load grievances";
const UPDATE_FAILED: &str = "Failed to update status";

#[component]
pub fn AdminPage() -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(ViewState::<Vec<Grievance>>::new());
    let notification = RwSignal::new(Notice::new());

    // 3秒后清除通知
    let notify = move |message: String, is_err: bool| {
        let Some(ticket) = notification.try_update(|n| n.show(message, is_err)) else {
            return;
        };
        set_timeout(
            move || {
                notification.update(|n| {
                    n.expire(ticket);
                });
            },
            std::time::Duration::from_secs(3),
        );
    };

    Effect::new({
        let api = api.clone();
        move |_| {
            let Some(ticket) = state.try_update(|s| s.begin()) else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                let result = api.grievances().list().await;
                state.update(|s| {
                    s.finish(ticket, result, LOAD_FAILED);
                });
            });
        }
    });

    // `selected` 是该行下拉框的当前值，更新失败时恢复为 `previous`
    let change_status = move |id: i64, status: GrievanceStatus, selected: RwSignal<String>, previous: String| {
        let api = api.clone();
        spawn_local(async move {
            match api.grievances().update(id, &GrievancePatch::status(status)).await {
                Ok(updated) => {
                    let label = updated.status.label().to_string();
                    state.update(|s| {
                        if let Some(row) = s.data.as_mut().and_then(|list| list.iter_mut().find(|g| g.id == id)) {
                            *row = updated;
                        }
                    });
                    notify(format!("Grievance #{id} is now {label}"), false);
                }
                Err(e) => {
                    log::warn!("status update for grievance #{id} failed: {e}");
                    selected.set(previous);
                    notify(e.user_message(UPDATE_FAILED), true);
                }
            }
        });
    };

    let rows = Memo::new(move |_| state.with(|s| s.data.clone().unwrap_or_default()));
    let error = Signal::derive(move || state.with(|s| s.error.clone()));
    let success_msg = Signal::derive(move || notification.with(|n| n.success().map(str::to_string)));
    let failure_msg = Signal::derive(move || notification.with(|n| n.failure().map(str::to_string)));

    view! {
        <div class="max-w-6xl mx-auto mt-4 pb-8 space-y-6">
            <h2 class="text-2xl font-semibold">"All Grievances"</h2>

            <Alert message=success_msg kind=AlertKind::Success />
            <Alert message=failure_msg on_dismiss=move |_: ()| notification.update(Notice::dismiss) />
            <Alert message=error on_dismiss=move |_: ()| state.update(|s| s.dismiss_error()) />

            <Show when=move || state.with(|s| s.loading)>
                <div class="text-center py-12 opacity-70">"Loading grievances..."</div>
            </Show>

            <div class="overflow-x-auto bg-base-100 rounded-box">
                <table class="table w-full text-sm">
                    <thead>
                        <tr>
                            <th>"ID"</th>
                            <th>"Title"</th>
                            <th>"Category"</th>
                            <th>"Status"</th>
                            <th>"Change status"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || rows.get()
                            key=|g| (g.id, g.status.clone())
                            children=move |g| {
                                let id = g.id;
                                let current = g.status.label().to_string();
                                let selected = RwSignal::new(current.clone());
                                let change_status = change_status.clone();
                                view! {
                                    <tr>
                                        <td>
                                            <Link to=AppRoute::Grievance(id) class="link">{format!("#{id}")}</Link>
                                        </td>
                                        <td class="font-medium">{g.title.clone()}</td>
                                        <td>{g.category_label().to_string()}</td>
                                        <td>
                                            <span class=format!("px-2 py-1 rounded text-xs font-semibold {}", status_badge_class(&g.status))>
                                                {g.status.label().to_string()}
                                            </span>
                                        </td>
                                        <td>
                                            <select class="select select-bordered select-sm"
                                                prop:value=move || selected.get()
                                                on:change=move |ev| {
                                                    let value = event_target_value(&ev);
                                                    let status = GrievanceStatus::from_label(&value);
                                                    selected.set(value);
                                                    change_status(id, status, selected, current.clone());
                                                }
                                            >
                                                {GrievanceStatus::KNOWN
                                                    .into_iter()
                                                    .map(|s| {
                                                        let label = s.label().to_string();
                                                        view! { <option value=label.clone()>{label}</option> }
                                                    })
                                                    .collect_view()}
                                            </select>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </div>
        </div>
    }
}
