//! Application Context
//!
//! Shared state provided via Leptos Context API.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use rack_client::{ApiError, ApiOperation};
use rack_domain::{GeckoId, Position};

use crate::store::{store_sign_out, AppStore};

/// How long a success indicator stays up
const SUCCESS_MS: u32 = 2000;

/// Which screen is showing
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Screen {
    Racks,
    /// Creation form for an empty cell
    NewGecko(Position),
    Gecko(GeckoId),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    /// Blocking; stays until dismissed
    Error(String),
    /// Transient
    Success(String),
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub screen: ReadSignal<Screen>,
    set_screen: WriteSignal<Screen>,
    pub notice: ReadSignal<Option<Notice>>,
    set_notice: WriteSignal<Option<Notice>>,
    /// Bumped to re-fetch racks
    pub reload_trigger: ReadSignal<u32>,
    set_reload_trigger: WriteSignal<u32>,
    store: AppStore,
}

impl AppContext {
    pub fn new(store: AppStore) -> Self {
        let (screen, set_screen) = signal(Screen::Racks);
        let (notice, set_notice) = signal(None::<Notice>);
        let (reload_trigger, set_reload_trigger) = signal(0u32);
        Self {
            screen,
            set_screen,
            notice,
            set_notice,
            reload_trigger,
            set_reload_trigger,
            store,
        }
    }

    pub fn open(&self, screen: Screen) {
        self.set_screen.set(screen);
    }

    /// Back to the rack list, refreshing it
    pub fn back_to_racks(&self) {
        self.set_screen.set(Screen::Racks);
        self.reload();
    }

    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    pub fn show_error(&self, message: impl Into<String>) {
        self.set_notice.set(Some(Notice::Error(message.into())));
    }

    pub fn flash_success(&self, message: impl Into<String>) {
        let notice = Notice::Success(message.into());
        self.set_notice.set(Some(notice.clone()));

        let current = self.notice;
        let set_notice = self.set_notice;
        spawn_local(async move {
            TimeoutFuture::new(SUCCESS_MS).await;
            // a newer notice may have replaced ours
            if current.get_untracked().as_ref() == Some(&notice) {
                set_notice.set(None);
            }
        });
    }

    pub fn dismiss(&self) {
        self.set_notice.set(None);
    }

    /// Surface a failed request; a rejected session returns to the login screen
    pub fn report(&self, err: &ApiError, operation: ApiOperation) {
        if err.is_unauthorized() {
            tracing::info!("session rejected, signing out");
            store_sign_out(&self.store);
            self.set_screen.set(Screen::Racks);
        }
        self.show_error(err.user_message(operation));
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
