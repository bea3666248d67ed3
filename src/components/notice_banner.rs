//! Notice Banner
//!
//! Errors block the screen until acknowledged; successes fade on their own.

use leptos::prelude::*;

use crate::context::{use_app_context, Notice};

#[component]
pub fn NoticeBanner() -> impl IntoView {
    let ctx = use_app_context();

    move || match ctx.notice.get() {
        Some(Notice::Error(message)) => view! {
            <div class="notice-overlay">
                <div class="notice notice-error" role="alertdialog">
                    <p>{message}</p>
                    <button class="confirm-btn" on:click=move |_| ctx.dismiss()>"OK"</button>
                </div>
            </div>
        }
        .into_any(),
        Some(Notice::Success(message)) => view! {
            <div class="notice notice-success" role="status">"✓ " {message}</div>
        }
        .into_any(),
        None => ().into_any(),
    }
}
