//! Gecko Screen
//!
//! Create a gecko in an empty cell, or view / edit / delete an existing one
//! together with its care logs and photos.

use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;
use rack_client::{ApiError, ApiOperation};
use rack_domain::{
    days_since, sort_newest_first, weight_history, CareLog, CareReport, Gecko, GeckoId, GeckoProfile, Gender,
    Position, WeightSummary,
};

use super::{CareLogSection, ConfirmButton, PhotoList};
use crate::api;
use crate::context::{use_app_context, Screen};

#[component]
pub fn GeckoScreen(position: Option<Position>, gecko_id: Option<GeckoId>) -> impl IntoView {
    let ctx = use_app_context();

    let gecko = RwSignal::new(None::<Gecko>);
    let logs = RwSignal::new(Vec::<CareLog>::new());
    let profile = RwSignal::new(GeckoProfile::default());
    let (saving, set_saving) = signal(false);

    if let Some(id) = gecko_id {
        spawn_local(async move {
            match load(id).await {
                Ok((loaded, mut loaded_logs)) => {
                    sort_newest_first(&mut loaded_logs);
                    profile.set(GeckoProfile::from_gecko(&loaded));
                    gecko.set(Some(loaded));
                    logs.set(loaded_logs);
                }
                Err(e) => {
                    ctx.report(&e, ApiOperation::LoadGecko);
                    ctx.back_to_racks();
                }
            }
        });
    }

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let form = profile.get_untracked();
        set_saving.set(true);
        spawn_local(async move {
            let result = match (gecko_id, position) {
                (Some(id), _) => update(id, form).await,
                (None, Some(position)) => create(position, form).await,
                (None, None) => Err(ApiError::InvalidInput("no cell selected".to_string())),
            };
            set_saving.set(false);
            match result {
                Ok(saved) => {
                    tracing::info!(gecko_id = saved.id, "gecko saved");
                    ctx.flash_success("Saved");
                    if gecko_id.is_none() {
                        ctx.open(Screen::Gecko(saved.id));
                    } else {
                        profile.set(GeckoProfile::from_gecko(&saved));
                        gecko.set(Some(saved));
                    }
                }
                Err(e) => ctx.report(&e, ApiOperation::SaveGecko),
            }
        });
    };

    let delete = move |_: ()| {
        let Some(id) = gecko_id else {
            return;
        };
        spawn_local(async move {
            let result = match api::client() {
                Ok(client) => client.delete_gecko(id).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => {
                    tracing::info!(gecko_id = id, "gecko deleted");
                    ctx.back_to_racks();
                }
                Err(e) => ctx.report(&e, ApiOperation::DeleteGecko),
            }
        });
    };

    let title = move || match (gecko.with(|g| g.as_ref().map(|g| g.name.clone())), position) {
        (Some(name), _) => name,
        (None, Some(p)) => format!("New gecko · row {}, column {}", p.row, p.column),
        (None, None) => "Loading…".to_string(),
    };

    view! {
        <div class="gecko-screen">
            <header class="screen-header">
                <button class="back-btn" on:click=move |_| ctx.back_to_racks()>"← Racks"</button>
                <h1>{title}</h1>
            </header>

            {move || gecko.get().and_then(|g| g.photo_url).map(|path| view! {
                <img class="gecko-photo" src=api::image_url(&path) alt="" />
            })}

            <Show when=move || gecko_id.is_some()>
                <CareStatusPanel logs=logs />
            </Show>

            <form class="gecko-form" on:submit=save>
                <label>
                    "Name"
                    <input
                        type="text"
                        prop:value=move || profile.with(|p| p.name.clone())
                        on:input=move |ev| profile.update(|p| p.name = event_target_value(&ev))
                    />
                </label>
                <label>
                    "Morph"
                    <input
                        type="text"
                        prop:value=move || profile.with(|p| p.morph.clone())
                        on:input=move |ev| profile.update(|p| p.morph = event_target_value(&ev))
                    />
                </label>
                <label>
                    "Birth date"
                    <input
                        type="date"
                        prop:value=move || profile.with(|p| p.birth_date.clone())
                        on:input=move |ev| profile.update(|p| p.birth_date = event_target_value(&ev))
                    />
                </label>
                <div class="gender-row">
                    {Gender::ALL.iter().map(|&gender| view! {
                        <button
                            type="button"
                            class=move || if profile.with(|p| p.gender == gender) { "type-btn small active" } else { "type-btn small" }
                            on:click=move |_| profile.update(|p| p.gender = gender)
                        >
                            {gender.label()}
                        </button>
                    }).collect_view()}
                </div>
                <label>
                    "Weight (g)"
                    <input
                        type="text"
                        inputmode="decimal"
                        prop:value=move || profile.with(|p| p.weight.clone())
                        on:input=move |ev| profile.update(|p| p.weight = event_target_value(&ev))
                    />
                </label>
                <label>
                    "Notes"
                    <textarea
                        prop:value=move || profile.with(|p| p.notes.clone())
                        on:input=move |ev| profile.update(|p| p.notes = event_target_value(&ev))
                    ></textarea>
                </label>
                <button type="submit" disabled=move || saving.get()>
                    {move || if saving.get() { "Saving…" } else { "Save" }}
                </button>
            </form>

            {gecko_id.map(|id| view! {
                <CareLogSection gecko_id=id logs=logs />
                <WeightPanel logs=logs />
                <PhotoList
                    gecko_id=id
                    on_main={move |path: Option<String>| gecko.update(|g| {
                        if let Some(g) = g {
                            g.photo_url = path;
                        }
                    })}
                />
                <ConfirmButton
                    button_class="delete-btn"
                    label="Delete gecko"
                    prompt="All care logs and photos will be deleted. Delete?".to_string()
                    on_confirm=delete
                />
            })}
        </div>
    }
}

/// Last feeding and cleaning, flagged when overdue
#[component]
fn CareStatusPanel(logs: RwSignal<Vec<CareLog>>) -> impl IntoView {
    let report = move || logs.with(|logs| CareReport::for_logs(logs, Utc::now()));

    let describe = |label: &'static str, at: Option<chrono::DateTime<Utc>>| match at {
        None => format!("{label}: never"),
        Some(at) => match days_since(at, Utc::now()) {
            0 => format!("{label}: today"),
            1 => format!("{label}: yesterday"),
            days => format!("{label}: {days} days ago"),
        },
    };

    view! {
        <div class=move || format!("care-status {}", report().status().as_str())>
            <p class:overdue=move || report().feeding_overdue>{move || describe("Last fed", report().last_feeding)}</p>
            <p class:overdue=move || report().cleaning_overdue>{move || describe("Last cleaned", report().last_cleaning)}</p>
        </div>
    }
}

#[component]
fn WeightPanel(logs: RwSignal<Vec<CareLog>>) -> impl IntoView {
    let summary = move || logs.with(|logs| WeightSummary::from_points(&weight_history(logs)));

    move || {
        summary().map(|s| view! {
            <div class="weight-summary">
                <h3>"Weight"</h3>
                <p>{format!("Latest {:.1}g · average {:.1}g over {} records", s.latest, s.average, s.count)}</p>
                <p class="weight-change">{format!("{:+.1}g since first record ({:.1}g)", s.change, s.first)}</p>
            </div>
        })
    }
}

async fn load(id: GeckoId) -> Result<(Gecko, Vec<CareLog>), ApiError> {
    let client = api::client()?;
    let gecko = client.get_gecko(id).await?;
    let logs = client.get_logs(id).await?;
    Ok((gecko, logs))
}

async fn create(position: Position, form: GeckoProfile) -> Result<Gecko, ApiError> {
    let data = form.into_create(position)?;
    api::client()?.create_gecko(&data).await
}

async fn update(id: GeckoId, form: GeckoProfile) -> Result<Gecko, ApiError> {
    let data = form.into_update()?;
    api::client()?.update_gecko(id, &data).await
}
