//! Rack Screen
//!
//! Header with counts, legend, every rack as a grid, and the placement
//! wiring: cell gestures go through the placement machine, moves and swaps
//! go to the server, and the collection is re-fetched afterwards.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{bind_global_pointer, GridDnd, GridGesture};
use rack_client::{operation_for, run_gesture, ApiOperation, MachineSlot, PlacementEvent};
use rack_domain::{Alert, CellTarget, Gesture, PlacementAction, PlacementMachine, Rack};

use super::rack_dialog::{RackDialog, RackDialogMode};
use super::rack_grid::{CellKey, RackCard};
use super::ConfirmButton;
use crate::api;
use crate::context::{use_app_context, AppContext, Screen};
use crate::store::{store_find_rack, store_set_racks, store_sign_out, store_summary, use_app_store, AppStateStoreFields, AppStore};

#[component]
pub fn RackScreen() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let machine = RwSignal::new(PlacementMachine::new());
    let (dialog, set_dialog) = signal(None::<RackDialogMode>);

    // Load racks on mount and whenever a reload is requested
    Effect::new(move |_| {
        let trigger = ctx.reload_trigger.get();
        spawn_local(async move {
            let result = match api::client() {
                Ok(client) => client.get_racks().await,
                Err(e) => Err(e),
            };
            match result {
                Ok(racks) => {
                    tracing::info!(count = racks.len(), trigger, "racks loaded");
                    store_set_racks(&store, racks);
                }
                Err(e) => ctx.report(&e, ApiOperation::LoadRacks),
            }
        });
    });

    let dnd = GridDnd::new(move |gesture: GridGesture<CellKey>| {
        if let Some(gesture) = to_gesture(&store, gesture) {
            apply_gesture(ctx, store, machine, gesture);
        }
    });
    bind_global_pointer(dnd);

    let summary = Memo::new(move |_| store_summary(&store));
    let greeting = move || store.user().with(|u| u.as_ref().map(|u| format!("Hello, {}", u.name)).unwrap_or_default());

    let logout = move |_: ()| {
        match api::client() {
            Ok(client) => client.logout(),
            Err(_) => api::clear_token(),
        }
        store_sign_out(&store);
    };

    view! {
        <div class="rack-screen">
            <header class="screen-header">
                <div>
                    <h1>{greeting}</h1>
                    <p class="collection-counts">
                        {move || format!("{} geckos", summary.get().total)}
                        <Show when=move || { summary.get().urgent > 0 }>
                            <span class="urgent-count">{move || format!(" · {} need care", summary.get().urgent)}</span>
                        </Show>
                    </p>
                </div>
                <div class="header-actions">
                    <button class="add-btn" on:click=move |_| set_dialog.set(Some(RackDialogMode::Add))>"+ Rack"</button>
                    <ConfirmButton button_class="logout-btn" label="Log out" prompt="Log out?".to_string() on_confirm=logout />
                </div>
            </header>

            <Legend />
            <AlertList />

            {move || {
                machine.with(|m| m.selection().cloned().map(|selection| (selection, m.is_pending())))
                    .map(|(selection, pending)| view! {
                        <div class="selection-bar">
                            <span>
                                {if pending {
                                    format!("Moving {}…", selection.gecko_name)
                                } else {
                                    format!("Moving {}: tap an empty cell to move, or another gecko to swap", selection.gecko_name)
                                }}
                            </span>
                            <button
                                class="cancel-btn"
                                disabled=pending
                                on:click=move |_| apply_gesture(ctx, store, machine, Gesture::Cancel)
                            >
                                "Cancel"
                            </button>
                        </div>
                    })
            }}

            <div class="rack-list">
                {move || {
                    let racks = store.racks().get();
                    if racks.is_empty() {
                        return view! { <p class="empty-state">"No racks yet. Add one to start placing geckos."</p> }.into_any();
                    }
                    racks
                        .into_iter()
                        .map(|rack| view! {
                            <RackCard
                                rack=rack
                                dnd=dnd
                                machine=machine
                                on_edit=move |rack: Rack| set_dialog.set(Some(RackDialogMode::Edit(rack)))
                            />
                        })
                        .collect_view()
                        .into_any()
                }}
            </div>

            {move || dialog.get().map(|mode| view! {
                <RackDialog mode=mode on_close=move |_: ()| set_dialog.set(None) />
            })}
        </div>
    }
}

#[component]
fn Legend() -> impl IntoView {
    view! {
        <ul class="legend">
            <li><span class="legend-swatch good"></span>"Cared for"</li>
            <li><span class="legend-swatch urgent"></span>"Needs feeding or cleaning (3+ days)"</li>
            <li><span class="legend-swatch empty"></span>"Empty"</li>
        </ul>
    }
}

/// Server-side alerts; tapping one opens the gecko
#[component]
fn AlertList() -> impl IntoView {
    let ctx = use_app_context();
    let alerts = RwSignal::new(Vec::<Alert>::new());

    Effect::new(move |_| {
        ctx.reload_trigger.track();
        spawn_local(async move {
            let result = match api::client() {
                Ok(client) => client.get_alerts().await,
                Err(e) => Err(e),
            };
            match result {
                Ok(loaded) => alerts.set(loaded),
                // alerts are secondary; the rack load reports session problems
                Err(e) => tracing::warn!(error = %e, "{}", ApiOperation::LoadAlerts.fallback()),
            }
        });
    });

    view! {
        <Show when=move || alerts.with(|a| !a.is_empty())>
            <ul class="alert-list">
                {move || alerts.get().into_iter().map(|alert| {
                    let gecko_id = alert.gecko_id;
                    view! {
                        <li class="alert-item" on:click=move |_| ctx.open(Screen::Gecko(gecko_id))>
                            {alert.message}
                        </li>
                    }
                }).collect_view()}
            </ul>
        </Show>
    }
}

/// The cell as currently stored
fn target_for(store: &AppStore, key: CellKey) -> Option<CellTarget> {
    let position = key.0;
    let rack = store_find_rack(store, position.rack_id)?;
    if !rack.contains(position.row, position.column) {
        return None;
    }
    Some(match rack.occupant_at(position.row, position.column) {
        Some(gecko) => CellTarget::occupied(position, gecko.id, gecko.name.clone()),
        None => CellTarget::empty(position),
    })
}

fn to_gesture(store: &AppStore, gesture: GridGesture<CellKey>) -> Option<Gesture> {
    Some(match gesture {
        GridGesture::Tap(key) => Gesture::Tap(target_for(store, key)?),
        GridGesture::LongPress(key) => Gesture::LongPress(target_for(store, key)?),
        GridGesture::DragStart(key) => Gesture::DragStart(target_for(store, key)?),
        GridGesture::Drop { target, .. } => Gesture::Drop(target.and_then(|key| target_for(store, key))),
    })
}

/// The screen's machine signal as the driver's slot
#[derive(Clone, Copy)]
struct ScreenMachine(RwSignal<PlacementMachine>);

impl MachineSlot for ScreenMachine {
    fn with_machine<R>(&self, f: impl FnOnce(&mut PlacementMachine) -> R) -> Option<R> {
        self.0.try_update(f)
    }
}

fn apply_gesture(ctx: AppContext, store: AppStore, machine: RwSignal<PlacementMachine>, gesture: Gesture) {
    spawn_local(async move {
        let client = match api::client() {
            Ok(client) => client,
            Err(e) => return ctx.report(&e, ApiOperation::LoadRacks),
        };

        match run_gesture(&client, &ScreenMachine(machine), gesture).await {
            PlacementEvent::OpenDetail { gecko_id, .. } => ctx.open(Screen::Gecko(gecko_id)),
            PlacementEvent::OpenCreate(position) => ctx.open(Screen::NewGecko(position)),
            PlacementEvent::Selected(selection) => {
                tracing::debug!(gecko_id = selection.gecko_id, "gecko selected for placement");
            }
            PlacementEvent::Completed { action, racks } => {
                store_set_racks(&store, racks);
                ctx.flash_success(match action {
                    PlacementAction::Move { .. } => "Moved",
                    PlacementAction::Swap { .. } => "Swapped",
                });
            }
            PlacementEvent::Unrefreshed { error, .. } => {
                ctx.report(&error, ApiOperation::LoadRacks);
                ctx.reload();
            }
            PlacementEvent::Failed { action, error, .. } => ctx.report(&error, operation_for(&action)),
            PlacementEvent::Cancelled | PlacementEvent::Ignored => {}
        }
    });
}
