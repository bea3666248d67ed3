//! Login / Register Form

use leptos::prelude::*;
use leptos::task::spawn_local;
use rack_client::ApiOperation;

use crate::api;
use crate::context::use_app_context;
use crate::store::{store_sign_in, use_app_store};

#[component]
pub fn LoginForm() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (registering, set_registering) = signal(false);
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (name, set_name) = signal(String::new());
    let (busy, set_busy) = signal(false);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let email = email.get_untracked().trim().to_string();
        let password = password.get_untracked();
        let name = name.get_untracked().trim().to_string();
        let registering = registering.get_untracked();

        if email.is_empty() || password.is_empty() || (registering && name.is_empty()) {
            ctx.show_error("Please fill in every field.");
            return;
        }

        set_busy.set(true);
        spawn_local(async move {
            let operation = if registering { ApiOperation::Register } else { ApiOperation::Login };
            let result = match api::client() {
                Ok(client) if registering => client.register(&email, &password, &name).await,
                Ok(client) => client.login(&email, &password).await,
                Err(e) => Err(e),
            };
            set_busy.set(false);
            match result {
                Ok(auth) => {
                    set_password.set(String::new());
                    store_sign_in(&store, auth.user);
                    ctx.back_to_racks();
                }
                Err(e) => ctx.report(&e, operation),
            }
        });
    };

    view! {
        <form class="login-form" on:submit=submit>
            <h1>"Gecko Rack"</h1>
            <Show when=move || registering.get()>
                <input
                    type="text"
                    placeholder="Name"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
            </Show>
            <input
                type="email"
                placeholder="Email"
                autocomplete="username"
                prop:value=move || email.get()
                on:input=move |ev| set_email.set(event_target_value(&ev))
            />
            <input
                type="password"
                placeholder="Password"
                prop:value=move || password.get()
                on:input=move |ev| set_password.set(event_target_value(&ev))
            />
            <button type="submit" disabled=move || busy.get()>
                {move || match (registering.get(), busy.get()) {
                    (_, true) => "Please wait…",
                    (true, false) => "Create account",
                    (false, false) => "Sign in",
                }}
            </button>
            <button type="button" class="link-btn" on:click=move |_| set_registering.update(|r| *r = !*r)>
                {move || if registering.get() { "I already have an account" } else { "Create an account" }}
            </button>
        </form>
    }
}
