//! Leptos DragDrop Utilities
//!
//! Tap, long-press and drag over grid cells using pointer events, so mouse
//! and touch behave the same. Cells carry their key in [`DROP_KEY_ATTR`];
//! the drop target is looked up under the pointer at release time, which
//! keeps working when touch input captures the pointer to the pressed cell.

mod tracker;

use std::fmt::Display;
use std::str::FromStr;

use leptos::ev;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

pub use tracker::{exceeds_threshold, GridGesture, PressPhase, PressTracker};

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 10;

/// Hold time before a press counts as a long press
pub const LONG_PRESS_MS: i32 = 500;

/// Attribute holding a cell's key, parsed back with `FromStr`
pub const DROP_KEY_ATTR: &str = "data-drop-key";

/// Keys a cell can be addressed by
pub trait DropKey: Clone + PartialEq + Display + FromStr + Send + Sync + 'static {}

impl<T: Clone + PartialEq + Display + FromStr + Send + Sync + 'static> DropKey for T {}

/// Gesture state shared by every cell of one screen
pub struct GridDnd<K: Send + Sync + 'static> {
    tracker: RwSignal<PressTracker<K>>,
    on_gesture: Callback<GridGesture<K>>,
}

impl<K: Send + Sync + 'static> Clone for GridDnd<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: Send + Sync + 'static> Copy for GridDnd<K> {}

impl<K: DropKey> GridDnd<K> {
    pub fn new(on_gesture: impl Fn(GridGesture<K>) + Send + Sync + 'static) -> Self {
        Self {
            tracker: RwSignal::new(PressTracker::new()),
            on_gesture: Callback::new(on_gesture),
        }
    }

    /// Key of the cell being dragged (tracked)
    pub fn dragging(&self) -> Option<K> {
        self.tracker.with(|t| t.dragging().cloned())
    }

    pub fn is_dragging(&self, key: &K) -> bool {
        self.tracker.with(|t| t.dragging() == Some(key))
    }

    /// Cell under a dragged pointer (tracked)
    pub fn is_hover(&self, key: &K) -> bool {
        self.tracker.with(|t| t.hover() == Some(key))
    }

    fn emit(&self, gesture: Option<GridGesture<K>>) {
        if let Some(gesture) = gesture {
            self.on_gesture.run(gesture);
        }
    }
}

/// Value for [`DROP_KEY_ATTR`]
pub fn drop_key_attr<K: Display>(key: &K) -> String {
    key.to_string()
}

/// Key of the cell under viewport point `(x, y)`
pub fn drop_key_at<K: FromStr>(x: i32, y: i32) -> Option<K> {
    let document = web_sys::window()?.document()?;
    let element = document.element_from_point(x as f32, y as f32)?;
    let cell = element.closest(&format!("[{DROP_KEY_ATTR}]")).ok()??;
    cell.get_attribute(DROP_KEY_ATTR)?.parse().ok()
}

/// pointerdown handler for one cell
///
/// `draggable` is false for cells that can be tapped but not picked up.
pub fn make_on_pointerdown<K: DropKey>(
    dnd: GridDnd<K>,
    key: K,
    draggable: bool,
) -> impl Fn(web_sys::PointerEvent) + 'static {
    move |ev: web_sys::PointerEvent| {
        if ev.button() != 0 || !ev.is_primary() {
            return;
        }
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
        }

        let Some(generation) = dnd
            .tracker
            .try_update(|t| t.press(key.clone(), draggable, ev.client_x(), ev.client_y()))
        else {
            return;
        };
        schedule_long_press(dnd, generation);
    }
}

fn schedule_long_press<K: DropKey>(dnd: GridDnd<K>, generation: u32) {
    let Some(win) = web_sys::window() else {
        return;
    };
    let fire = Closure::once_into_js(move || {
        let gesture = dnd.tracker.try_update(|t| t.long_press_elapsed(generation)).flatten();
        dnd.emit(gesture);
    });
    let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(fire.unchecked_ref(), LONG_PRESS_MS);
}

/// Suppress the touch context menu so a long press stays a long press
pub fn on_contextmenu(ev: web_sys::MouseEvent) {
    ev.prevent_default();
}

/// Bind window-level move / release handlers for the current owner
///
/// Listeners are removed when the owner is cleaned up.
pub fn bind_global_pointer<K: DropKey>(dnd: GridDnd<K>) {
    let on_move = window_event_listener(ev::pointermove, move |ev: web_sys::PointerEvent| {
        if !ev.is_primary() || dnd.tracker.with_untracked(|t| t.phase() == PressPhase::Idle) {
            return;
        }
        let (x, y) = (ev.client_x(), ev.client_y());
        let over = drop_key_at::<K>(x, y);
        let gesture = dnd.tracker.try_update(|t| t.movement(x, y, over)).flatten();
        dnd.emit(gesture);
    });

    let on_up = window_event_listener(ev::pointerup, move |ev: web_sys::PointerEvent| {
        if !ev.is_primary() || dnd.tracker.with_untracked(|t| t.phase() == PressPhase::Idle) {
            return;
        }
        let target = drop_key_at::<K>(ev.client_x(), ev.client_y());
        let gesture = dnd.tracker.try_update(|t| t.release(target)).flatten();
        dnd.emit(gesture);
    });

    let on_cancel = window_event_listener(ev::pointercancel, move |_ev: web_sys::PointerEvent| {
        let gesture = dnd.tracker.try_update(|t| t.cancel()).flatten();
        dnd.emit(gesture);
    });

    on_cleanup(move || {
        on_move.remove();
        on_up.remove();
        on_cancel.remove();
    });
}
