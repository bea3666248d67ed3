//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use rack_domain::{CollectionSummary, Rack, User};
use reactive_stores::Store;

/// Signed-in user and the rack collection, as last fetched
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    pub user: Option<User>,
    pub racks: Vec<Rack>,
    /// Set once the stored token has been checked on start-up
    pub session_checked: bool,
}

pub type AppStore = Store<AppState>;

pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_set_racks(store: &AppStore, racks: Vec<Rack>) {
    store.racks().set(racks);
}

pub fn store_sign_in(store: &AppStore, user: User) {
    store.user().set(Some(user));
    store.session_checked().set(true);
}

/// Forget the user and everything loaded for them
pub fn store_sign_out(store: &AppStore) {
    store.user().set(None);
    store.racks().set(Vec::new());
    store.session_checked().set(true);
}

pub fn store_find_rack(store: &AppStore, rack_id: u32) -> Option<Rack> {
    store.racks().with_untracked(|racks| racks.iter().find(|r| r.id == rack_id).cloned())
}

pub fn store_summary(store: &AppStore) -> CollectionSummary {
    store.racks().with(|racks| CollectionSummary::from_racks(racks, chrono::Utc::now()))
}
