//! Add / Edit Rack Dialog

use leptos::prelude::*;
use leptos::task::spawn_local;
use rack_client::{ApiError, ApiOperation};
use rack_domain::{parse_dimension, CreateRack, Rack, UpdateRack};

use super::ConfirmButton;
use crate::api;
use crate::context::use_app_context;

#[derive(Clone, Debug, PartialEq)]
pub enum RackDialogMode {
    Add,
    Edit(Rack),
}

#[component]
pub fn RackDialog(mode: RackDialogMode, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let ctx = use_app_context();

    let editing = match &mode {
        RackDialogMode::Edit(rack) => Some(rack.clone()),
        RackDialogMode::Add => None,
    };
    let (name, set_name) = signal(editing.as_ref().map(|r| r.name.clone()).unwrap_or_default());
    let (rows, set_rows) = signal(editing.as_ref().map(|r| r.rows.to_string()).unwrap_or_else(|| "4".into()));
    let (columns, set_columns) =
        signal(editing.as_ref().map(|r| r.columns.to_string()).unwrap_or_else(|| "6".into()));
    let (saving, set_saving) = signal(false);
    let editing = StoredValue::new(editing);

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let name = name.get_untracked();
        let parsed = parse_dimension("rows", &rows.get_untracked())
            .and_then(|r| parse_dimension("columns", &columns.get_untracked()).map(|c| (r, c)));
        let (rows, columns) = match parsed {
            Ok(dims) => dims,
            Err(e) => return ctx.show_error(e.detail()),
        };

        set_saving.set(true);
        let editing = editing.get_value();
        spawn_local(async move {
            let (result, operation) = match editing {
                Some(rack) => (update(&rack, &name, rows, columns).await, ApiOperation::UpdateRack),
                None => (create(&name, rows, columns).await, ApiOperation::CreateRack),
            };
            set_saving.set(false);
            match result {
                Ok(rack) => {
                    tracing::info!(rack_id = rack.id, "rack saved");
                    ctx.flash_success("Rack saved");
                    ctx.reload();
                    on_close.run(());
                }
                Err(e) => ctx.report(&e, operation),
            }
        });
    };

    let delete = move |_: ()| {
        let Some(rack) = editing.get_value() else {
            return;
        };
        spawn_local(async move {
            let result = match api::client() {
                Ok(client) => client.delete_rack(rack.id).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => {
                    tracing::info!(rack_id = rack.id, "rack deleted");
                    ctx.reload();
                    on_close.run(());
                }
                Err(e) => ctx.report(&e, ApiOperation::DeleteRack),
            }
        });
    };

    let delete_prompt = Signal::derive(move || {
        let count = editing.with_value(|r| r.as_ref().map_or(0, |r| r.geckos.len()));
        if count > 0 {
            format!("{count} gecko(s) and all their records will be deleted. Delete?")
        } else {
            "Delete this rack?".to_string()
        }
    });

    view! {
        <div class="modal-overlay">
            <form class="modal rack-dialog" on:submit=save>
                <h2>{if editing.with_value(|r| r.is_some()) { "Edit rack" } else { "New rack" }}</h2>
                <label>
                    "Name"
                    <input
                        type="text"
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                </label>
                <div class="dimension-row">
                    <label>
                        "Rows"
                        <input
                            type="number" min="1" max="20"
                            prop:value=move || rows.get()
                            on:input=move |ev| set_rows.set(event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Columns"
                        <input
                            type="number" min="1" max="20"
                            prop:value=move || columns.get()
                            on:input=move |ev| set_columns.set(event_target_value(&ev))
                        />
                    </label>
                </div>
                <div class="modal-actions">
                    <Show when=move || editing.with_value(|r| r.is_some())>
                        <ConfirmButton
                            button_class="delete-btn"
                            label="Delete"
                            prompt=delete_prompt
                            on_confirm=delete
                        />
                    </Show>
                    <button type="button" class="cancel-btn" on:click=move |_| on_close.run(())>"Cancel"</button>
                    <button type="submit" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving…" } else { "Save" }}
                    </button>
                </div>
            </form>
        </div>
    }
}

async fn create(name: &str, rows: u32, columns: u32) -> Result<Rack, ApiError> {
    let data = CreateRack::new(name, rows, columns)?;
    api::client()?.create_rack(&data).await
}

async fn update(rack: &Rack, name: &str, rows: u32, columns: u32) -> Result<Rack, ApiError> {
    let data = UpdateRack::for_rack(rack, name, rows, columns)?;
    api::client()?.update_rack(rack.id, &data).await
}
