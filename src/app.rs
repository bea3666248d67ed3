//! Gecko Rack Frontend App
//!
//! Restores the session, then routes between the login form, the rack
//! list and the gecko screen.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::api;
use crate::components::{GeckoScreen, LoginForm, NoticeBanner, RackScreen};
use crate::context::{AppContext, Screen};
use crate::store::{store_sign_in, store_sign_out, AppState, AppStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let store = Store::new(AppState::default());
    provide_context(store);
    let ctx = AppContext::new(store);
    provide_context(ctx);

    // Session restore: only a stored token that the server still accepts counts
    Effect::new(move |_| {
        if !api::has_token() {
            store_sign_out(&store);
            return;
        }
        spawn_local(async move {
            let result = match api::client() {
                Ok(client) => client.current_user().await,
                Err(e) => Err(e),
            };
            match result {
                Ok(user) => {
                    tracing::info!(user_id = user.id, "session restored");
                    store_sign_in(&store, user);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "session restore failed");
                    api::clear_token();
                    store_sign_out(&store);
                }
            }
        });
    });

    view! {
        <div class="app-layout">
            <NoticeBanner />
            <Show
                when=move || store.session_checked().get()
                fallback=|| view! { <p class="loading">"Loading…"</p> }
            >
                <Show
                    when=move || store.user().with(|u| u.is_some())
                    fallback=|| view! { <LoginForm /> }
                >
                    {move || match ctx.screen.get() {
                        Screen::Racks => view! { <RackScreen /> }.into_any(),
                        Screen::NewGecko(position) => view! { <GeckoScreen position=Some(position) gecko_id=None /> }.into_any(),
                        Screen::Gecko(id) => view! { <GeckoScreen position=None gecko_id=Some(id) /> }.into_any(),
                    }}
                </Show>
            </Show>
        </div>
    }
}
