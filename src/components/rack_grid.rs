//! Rack Grid Component
//!
//! One rack as a card: header, row labels (top shelf first) and cells
//! coloured by care status. Cells report gestures through `GridDnd`.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use leptos::prelude::*;
use leptos_dragdrop::{drop_key_attr, make_on_pointerdown, on_contextmenu, GridDnd};
use rack_domain::{GridCell, PlacementMachine, Position, Rack, RackGrid};

use crate::api;

/// Cell address carried in the `data-drop-key` attribute as `rack:row:column`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellKey(pub Position);

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.0.rack_id, self.0.row, self.0.column)
    }
}

impl FromStr for CellKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':').map(|p| p.parse::<u32>().map_err(|_| ()));
        let (Some(rack_id), Some(row), Some(column), None) = (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(());
        };
        Ok(CellKey(Position::new(rack_id?, row?, column?)))
    }
}

#[component]
pub fn RackCard(
    rack: Rack,
    dnd: GridDnd<CellKey>,
    machine: RwSignal<PlacementMachine>,
    #[prop(into)] on_edit: Callback<Rack>,
) -> impl IntoView {
    let header_rack = rack.clone();
    let occupied = rack.geckos.len();
    let capacity = rack.capacity();

    let body = match RackGrid::build(&rack) {
        Ok(grid) => grid
            .rows()
            .iter()
            .map(|shelf| {
                let cells = shelf
                    .cells
                    .iter()
                    .map(|cell| view! { <RackCell cell=cell.clone() dnd=dnd machine=machine /> })
                    .collect_view();
                view! {
                    <div class="rack-row">
                        <span class="row-label">{shelf.row}</span>
                        {cells}
                    </div>
                }
            })
            .collect_view()
            .into_any(),
        Err(e) => {
            tracing::error!(rack_id = rack.id, error = %e, "rack occupant data is inconsistent");
            view! {
                <p class="rack-error">"This rack could not be displayed: " {e.to_string()}</p>
            }
            .into_any()
        }
    };

    view! {
        <section class="rack-card">
            <header class="rack-header">
                <h2>{rack.name.clone()}</h2>
                <span class="rack-size">{format!("{}×{}", rack.rows, rack.columns)}</span>
                <span class="rack-occupancy">{format!("{occupied}/{capacity}")}</span>
                <button class="edit-btn" on:click=move |_| on_edit.run(header_rack.clone())>"Edit"</button>
            </header>
            <div class="rack-grid">{body}</div>
        </section>
    }
}

#[component]
fn RackCell(cell: GridCell, dnd: GridDnd<CellKey>, machine: RwSignal<PlacementMachine>) -> impl IntoView {
    let key = CellKey(cell.position());
    let status = cell.status(Utc::now());
    let draggable = !cell.is_empty();

    let class = move || {
        let mut class = format!("cell {}", status.as_str());
        machine.with(|m| {
            if let Some(selection) = m.selection() {
                class.push_str(if selection.source == key.0 { " selected" } else { " move-hint" });
            }
            if m.is_pending() {
                class.push_str(" pending");
            }
        });
        if dnd.is_dragging(&key) {
            class.push_str(" dragging");
        } else if dnd.is_hover(&key) {
            class.push_str(" drop-target");
        }
        class
    };

    let content = match cell.occupant {
        Some(gecko) => {
            let photo = gecko.photo_url.as_deref().map(api::image_url);
            view! {
                {photo.map(|src| view! { <img class="cell-photo" src=src alt="" draggable="false" /> })}
                <span class="cell-name">{gecko.name}</span>
                <span class="status-dot"></span>
            }
            .into_any()
        }
        None => view! { <span class="cell-empty">"+"</span> }.into_any(),
    };

    view! {
        <div
            class=class
            data-drop-key=drop_key_attr(&key)
            on:pointerdown=make_on_pointerdown(dnd, key, draggable)
            on:contextmenu=on_contextmenu
        >
            {content}
        </div>
    }
}
