//! 提示条

use leptos::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlertKind {
    #[default]
    Error,
    Success,
    Warning,
}

impl AlertKind {
    fn class(self) -> &'static str {
        match self {
            Self::Error => "alert alert-error text-sm",
            Self::Success => "alert alert-success text-sm",
            Self::Warning => "alert alert-warning text-sm",
        }
    }
}

/// 消息为 `None` 时不渲染；提供 `on_dismiss` 时显示关闭按钮
#[component]
pub fn Alert(
    #[prop(into)] message: Signal<Option<String>>,
    #[prop(optional)] kind: AlertKind,
    #[prop(optional, into)] on_dismiss: Option<Callback<()>>,
) -> impl IntoView {
    move || {
        message.get().map(|text| {
            view! {
                <div role="alert" class=kind.class()>
                    <span>{text}</span>
                    {on_dismiss.map(|dismiss| view! {
                        <button type="button" class="btn btn-ghost btn-xs" on:click=move |_| dismiss.run(())>
                            "✕"
                        </button>
                    })}
                </div>
            }
        })
    }
}
