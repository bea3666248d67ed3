//! Gecko Rack Frontend Entry Point

mod api;
mod app;
mod components;
mod context;
mod store;

use std::sync::Arc;

use app::App;
use leptos::prelude::*;
use rolling_logger::{LoggerConfig, Sink};
use tracing::Level;

fn console_sink() -> Sink {
    Arc::new(|level: Level, line: &str| {
        let line = wasm_bindgen::JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    })
}

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = rolling_logger::init(LoggerConfig::new("GeckoRack"), Some(console_sink())) {
        web_sys::console::error_1(&format!("logger init failed: {e}").into());
    }
    mount_to_body(App);
}
