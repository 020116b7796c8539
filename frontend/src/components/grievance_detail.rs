use crate::api::use_api;
use crate::components::alert::Alert;
use crate::web::file::save_bytes;
use crate::web::router::Link;
use grievance_portal::AppRoute;
use grievance_portal::ViewState;
use grievance_portal::dashboard::status_badge_class;
use grievance_portal::shared::{Attachment, AuditEntry, Grievance};
use leptos::prelude::*;
use leptos::task::spawn_local;

const LOAD_FAILED: &str = "Failed to load grievance";
const DOWNLOAD_FAILED: &str = "Failed to download attachment";

#[component]
pub fn GrievanceDetailPage(id: i64) -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(ViewState::<Grievance>::new());

    Effect::new({
        let api = api.clone();
        move |_| {
            let Some(ticket) = state.try_update(|s| s.begin()) else {
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                let result = api.grievances().get(id).await;
                state.update(|s| {
                    s.finish(ticket, result, LOAD_FAILED);
                });
            });
        }
    });

    let error = Signal::derive(move || state.with(|s| s.error.clone()));

    move || {
        let (loading, grievance) = state.with(|s| (s.loading, s.data.clone()));
        if loading {
            return view! { <div class="py-12 text-center opacity-70">"Loading grievance..."</div> }
                .into_any();
        }
        if error.with(Option::is_some) {
            return view! {
                <div class="max-w-4xl mx-auto space-y-4">
                    <Alert message=error on_dismiss=move |_: ()| state.update(|s| s.dismiss_error()) />
                    <BackLink />
                </div>
            }
            .into_any();
        }
        match grievance {
            Some(g) => view! { <GrievanceCard grievance=g api=api.clone() /> }.into_any(),
            None => view! { <div class="p-8 text-center opacity-70">"Grievance not found."</div> }
                .into_any(),
        }
    }
}

#[component]
fn BackLink() -> impl IntoView {
    view! {
        <Link to=AppRoute::Dashboard { submitted: false } class="btn btn-outline">
            "Back to dashboard"
        </Link>
    }
}

#[component]
fn GrievanceCard(grievance: Grievance, api: crate::api::PortalApi) -> impl IntoView {
    let created = grievance
        .created_at
        .as_ref()
        .map(|t| t.datetime_label())
        .unwrap_or_default();
    let subtitle = format!(
        "#{} • {} • {}",
        grievance.id,
        grievance.category_label(),
        grievance.department_name.as_deref().unwrap_or("N/A")
    );

    view! {
        <div class="card max-w-4xl mx-auto bg-base-100 shadow-sm">
            <div class="card-body">
                <div class="flex items-start justify-between">
                    <div>
                        <h1 class="text-2xl font-semibold mb-1">{grievance.title.clone()}</h1>
                        <p class="text-sm opacity-60">{subtitle}</p>
                    </div>
                    <div class="text-right">
                        <div class=format!("inline-block px-3 py-1 rounded text-sm font-semibold {}", status_badge_class(&grievance.status))>
                            {grievance.status.label().to_string()}
                        </div>
                        <div class="text-xs opacity-60 mt-1">{format!("Created: {created}")}</div>
                    </div>
                </div>

                <section class="mt-6">
                    <h2 class="text-sm font-medium opacity-80 mb-2">"Description"</h2>
                    <div class="whitespace-pre-wrap">{grievance.description.clone()}</div>
                </section>

                {grievance.attachment.clone().map(|attachment| view! {
                    <AttachmentSection attachment=attachment url=grievance.attachment_url.clone() api=api />
                })}

                {(!grievance.audits.is_empty()).then(|| view! { <AuditHistory audits=grievance.audits.clone() /> })}

                <div class="card-actions mt-6">
                    <BackLink />
                </div>
            </div>
        </div>
    }
}

/// 附件下载：带令牌请求文件后交给浏览器保存
#[component]
fn AttachmentSection(
    attachment: Attachment,
    url: Option<String>,
    api: crate::api::PortalApi,
) -> impl IntoView {
    let downloading = RwSignal::new(false);
    let download_error = RwSignal::new(Option::<String>::None);
    let filename = attachment.label().to_string();

    let action = match attachment.file_id() {
        Some(file_id) => {
            let on_download = move |_| {
                downloading.set(true);
                download_error.set(None);
                let api = api.clone();
                let filename = filename.clone();
                spawn_local(async move {
                    match api.files().download(file_id).await {
                        Ok(file) => {
                            let content_type = file
                                .content_type
                                .as_deref()
                                .unwrap_or("application/octet-stream");
                            if let Err(e) = save_bytes(&file.bytes, content_type, &filename) {
                                log::error!("saving {} failed: {:?}", filename, e);
                                download_error.set(Some(DOWNLOAD_FAILED.to_string()));
                            }
                        }
                        Err(e) => download_error.set(Some(e.user_message(DOWNLOAD_FAILED))),
                    }
                    downloading.set(false);
                });
            };
            view! {
                <button class="btn btn-sm btn-outline" disabled=move || downloading.get() on:click=on_download>
                    {move || if downloading.get() { "Downloading..." } else { "Download file" }}
                </button>
            }
            .into_any()
        }
        None => view! {
            <a href=url.unwrap_or_else(|| "#".to_string()) class="link link-primary">"Download file"</a>
        }
        .into_any(),
    };

    view! {
        <section class="mt-6 space-y-2">
            <h3 class="text-sm font-medium opacity-80">"Attachment"</h3>
            <p class="text-sm opacity-70">{attachment.label().to_string()}</p>
            {action}
            <Alert message=download_error on_dismiss=move |_: ()| download_error.set(None) />
        </section>
    }
}

/// 审计历史，按服务端返回顺序展示
#[component]
fn AuditHistory(audits: Vec<AuditEntry>) -> impl IntoView {
    view! {
        <section class="mt-6">
            <h3 class="text-sm font-medium opacity-80 mb-2">"History"</h3>
            <ul class="space-y-2">
                {audits
                    .into_iter()
                    .map(|a| {
                        let when = a.created_at.as_ref().map(|t| t.datetime_label()).unwrap_or_default();
                        view! {
                            <li class="p-3 bg-base-200 rounded">
                                <div class="text-sm">{a.note}</div>
                                <div class="text-xs opacity-60 mt-1">{when}</div>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </section>
    }
}
