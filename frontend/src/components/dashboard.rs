use crate::api::use_api;
use crate::components::alert::{Alert, AlertKind};
use crate::web::router::Link;
use grievance_portal::AppRoute;
use grievance_portal::ViewState;
use grievance_portal::dashboard::{StatusCounts, StatusFilter, category_text_class, status_badge_class};
use grievance_portal::shared::Grievance;
use leptos::prelude::*;
use leptos::task::spawn_local;

const LOAD_FAILED: &str = "Failed to load grievances";

#[component]
pub fn DashboardPage(
    /// 刚提交成功时显示提示
    submitted: bool,
) -> impl IntoView {
    let api = use_api();

    let state = RwSignal::new(ViewState::<Vec<Grievance>>::new());
    let filter = RwSignal::new(StatusFilter::All);

    let load_grievances = move || {
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
    };

    // 初始加载；切换筛选时重新拉取
    Effect::new(move |_| {
        filter.track();
        load_grievances();
    });

    let rows = Memo::new(move |_| {
        let filter = filter.get();
        state.with(|s| {
            s.data
                .as_deref()
                .map(|list| filter.apply(list).into_iter().cloned().collect::<Vec<_>>())
                .unwrap_or_default()
        })
    });
    let counts = Memo::new(move |_| {
        state.with(|s| s.data.as_deref().map(StatusCounts::tally).unwrap_or_default())
    });
    let loading = move || state.with(|s| s.loading);
    let error = Signal::derive(move || state.with(|s| s.error.clone()));
    let success = Signal::derive(move || {
        submitted.then(|| {
            "Your grievance has been submitted successfully. You can track its status below."
                .to_string()
        })
    });

    view! {
        <div class="max-w-6xl mx-auto mt-4 pb-8 space-y-6">
            <Alert message=success kind=AlertKind::Success />

            <div class="flex flex-col md:flex-row md:items-center md:justify-between">
                <h2 class="text-2xl font-semibold">"My Grievances"</h2>
                <Link to=AppRoute::Submit class="btn btn-primary mt-4 md:mt-0">
                    "+ Submit New Grievance"
                </Link>
            </div>

            // 筛选
            <div class="flex gap-2 flex-wrap">
                {StatusFilter::chips()
                    .into_iter()
                    .map(|chip| {
                        let label = chip.label().to_string();
                        let active = {
                            let chip = chip.clone();
                            move || filter.get() == chip
                        };
                        view! {
                            <button
                                class=move || if active() { "btn btn-sm btn-primary rounded-full" } else { "btn btn-sm btn-ghost bg-base-300 rounded-full" }
                                on:click=move |_| filter.set(chip.clone())
                            >
                                {label}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>

            <Alert
                message=error
                on_dismiss=move |_: ()| state.update(|s| s.dismiss_error())
            />

            <Show when=loading>
                <div class="text-center py-12 opacity-70">"Loading grievances..."</div>
            </Show>

            <Show when=move || !loading() && rows.with(Vec::is_empty) && error.with(Option::is_none)>
                <div class="bg-base-100 rounded-box p-12 text-center">
                    <p class="opacity-70 mb-4">"No grievances found"</p>
                    <Link to=AppRoute::Submit class="btn btn-primary">"Submit your first grievance"</Link>
                </div>
            </Show>

            <Show when=move || !loading() && rows.with(|r| !r.is_empty())>
                <div class="overflow-x-auto bg-base-100 rounded-box">
                    <table class="table table-zebra w-full text-sm">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Title"</th>
                                <th>"Category"</th>
                                <th>"Status"</th>
                                <th>"Created"</th>
                                <th>"Action"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || rows.get()
                                key=|g| (g.id, g.status.clone())
                                children=move |g| {
                                    let created = g
                                        .created_at
                                        .as_ref()
                                        .map(|t| t.date_label())
                                        .unwrap_or_default();
                                    view! {
                                        <tr>
                                            <td class="opacity-70">{format!("#{}", g.id)}</td>
                                            <td class="font-medium">{g.title.clone()}</td>
                                            <td class=format!("font-medium {}", category_text_class(g.category.as_ref()))>
                                                {g.category_label().to_string()}
                                            </td>
                                            <td>
                                                <span class=format!("px-2 py-1 rounded text-xs font-semibold {}", status_badge_class(&g.status))>
                                                    {g.status.label().to_string()}
                                                </span>
                                            </td>
                                            <td class="opacity-70">{created}</td>
                                            <td>
                                                <Link to=AppRoute::Grievance(g.id) class="link link-primary font-medium">
                                                    "View"
                                                </Link>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </Show>

            // 统计
            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-title">"Open Grievances"</div>
                    <div class="stat-value">{move || counts.get().open}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"In Progress"</div>
                    <div class="stat-value">{move || counts.get().in_progress}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Resolved"</div>
                    <div class="stat-value">{move || counts.get().resolved}</div>
                </div>
            </div>
        </div>
    }
}
