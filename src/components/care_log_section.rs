//! Care Log Section
//!
//! Care buttons (one tap for feeding / cleaning / shedding, a small prompt
//! for the rest), optional backdating, and the recent log list.

use chrono::{DateTime, Utc};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use rack_client::{ApiError, ApiOperation};
use rack_domain::{
    days_since, parse_weight_input, sort_newest_first, CareLog, CareLogDraft, CareLogId, CareType, EggKind, GeckoId,
};
use wasm_bindgen::JsValue;

use super::ConfirmButton;
use crate::api;
use crate::context::use_app_context;

/// Logs shown before "Show all"
const RECENT_LIMIT: usize = 5;
const SUCCESS_MS: u32 = 2000;

/// Care type whose extra input is being asked for
#[derive(Clone, Copy, Debug, PartialEq)]
enum Prompt {
    Weight,
    Mating,
    Laying,
    Other,
}

impl Prompt {
    fn for_type(care_type: CareType) -> Option<Self> {
        match care_type {
            CareType::Weight => Some(Prompt::Weight),
            CareType::Mating => Some(Prompt::Mating),
            CareType::Laying => Some(Prompt::Laying),
            CareType::Other => Some(Prompt::Other),
            _ => None,
        }
    }
}

#[component]
pub fn CareLogSection(gecko_id: GeckoId, logs: RwSignal<Vec<CareLog>>) -> impl IntoView {
    let ctx = use_app_context();

    let (busy, set_busy) = signal(None::<CareType>);
    let (done, set_done) = signal(None::<CareType>);
    let (prompt, set_prompt) = signal(None::<Prompt>);
    let (prompt_input, set_prompt_input) = signal(String::new());
    let (backdate, set_backdate) = signal(false);
    let (backdate_at, set_backdate_at) = signal(String::new());
    let (show_all, set_show_all) = signal(false);

    // Builds the draft, applies the backdate and sends it
    let submit = move |care_type: CareType, draft: Result<CareLogDraft, ApiError>| {
        let draft = match draft {
            Ok(draft) if backdate.get_untracked() => match parse_local_datetime(&backdate_at.get_untracked()) {
                Some(at) => draft.backdated(at),
                None => return ctx.show_error("Enter a valid date and time."),
            },
            Ok(draft) => draft,
            Err(e) => return ctx.report(&e, ApiOperation::AddLog),
        };
        set_prompt.set(None);
        set_busy.set(Some(care_type));
        set_done.set(None);

        spawn_local(async move {
            let result = match api::client() {
                Ok(client) => client.create_log(gecko_id, &draft).await,
                Err(e) => Err(e),
            };
            set_busy.set(None);
            match result {
                Ok(log) => {
                    tracing::info!(gecko_id, log_id = log.id, care_type = care_type.as_str(), "care log added");
                    logs.update(|logs| {
                        logs.push(log);
                        sort_newest_first(logs);
                    });
                    set_backdate.set(false);
                    set_done.set(Some(care_type));
                    TimeoutFuture::new(SUCCESS_MS).await;
                    if done.get_untracked() == Some(care_type) {
                        set_done.set(None);
                    }
                }
                Err(e) => ctx.report(&e, ApiOperation::AddLog),
            }
        });
    };

    let on_care_button = move |care_type: CareType| {
        if care_type.is_one_tap() {
            submit(care_type, CareLogDraft::quick(care_type).map_err(ApiError::from));
        } else {
            set_prompt_input.set(String::new());
            set_prompt.set(Prompt::for_type(care_type));
        }
    };

    let submit_prompt = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let input = prompt_input.get_untracked();
        match prompt.get_untracked() {
            Some(Prompt::Weight) => submit(
                CareType::Weight,
                parse_weight_input(&input).and_then(CareLogDraft::weight).map_err(ApiError::from),
            ),
            Some(Prompt::Mating) => submit(CareType::Mating, Ok(CareLogDraft::mating(Some(&input)))),
            Some(Prompt::Other) => submit(CareType::Other, CareLogDraft::other(&input).map_err(ApiError::from)),
            Some(Prompt::Laying) | None => {}
        }
    };

    let delete = move |log_id: CareLogId| {
        spawn_local(async move {
            let result = match api::client() {
                Ok(client) => client.delete_log(log_id).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => logs.update(|logs| logs.retain(|l| l.id != log_id)),
                Err(e) => ctx.report(&e, ApiOperation::DeleteLog),
            }
        });
    };

    let visible = move || {
        logs.with(|logs| {
            let take = if show_all.get() { logs.len() } else { RECENT_LIMIT };
            logs.iter().take(take).cloned().collect::<Vec<_>>()
        })
    };

    view! {
        <section class="care-log-section">
            <h3>"Add care record"</h3>

            <label class="backdate-toggle">
                <input
                    type="checkbox"
                    prop:checked=move || backdate.get()
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        set_backdate.set(checked);
                        if checked && backdate_at.get_untracked().is_empty() {
                            set_backdate_at.set(now_local_input());
                        }
                    }
                />
                "Record at an earlier time"
            </label>
            <Show when=move || backdate.get()>
                <input
                    type="datetime-local"
                    class="backdate-input"
                    prop:value=move || backdate_at.get()
                    on:input=move |ev| set_backdate_at.set(event_target_value(&ev))
                />
            </Show>

            <div class="care-buttons">
                {CareType::ALL.iter().map(|&care_type| view! {
                    <button
                        type="button"
                        class=move || if done.get() == Some(care_type) { "care-btn success" } else { "care-btn" }
                        disabled=move || busy.get().is_some()
                        on:click=move |_| on_care_button(care_type)
                    >
                        <span class="care-icon">
                            {move || match (busy.get(), done.get()) {
                                (Some(t), _) if t == care_type => "⏳",
                                (_, Some(t)) if t == care_type => "✅",
                                _ => care_type.icon(),
                            }}
                        </span>
                        <span class="care-label">
                            {move || if done.get() == Some(care_type) { "Done!" } else { care_type.label() }}
                        </span>
                    </button>
                }).collect_view()}
            </div>

            {move || prompt.get().map(|current| view! {
                <div class="modal-overlay">
                    <form class="modal care-prompt" on:submit=submit_prompt>
                        {match current {
                            Prompt::Weight => view! {
                                <h2>"Weight"</h2>
                                <input
                                    type="text"
                                    inputmode="decimal"
                                    placeholder="grams"
                                    prop:value=move || prompt_input.get()
                                    on:input=move |ev| set_prompt_input.set(event_target_value(&ev))
                                />
                            }.into_any(),
                            Prompt::Mating => view! {
                                <h2>"Mating"</h2>
                                <input
                                    type="text"
                                    placeholder="Male (optional)"
                                    prop:value=move || prompt_input.get()
                                    on:input=move |ev| set_prompt_input.set(event_target_value(&ev))
                                />
                            }.into_any(),
                            Prompt::Other => view! {
                                <h2>"Other"</h2>
                                <textarea
                                    placeholder="What happened?"
                                    prop:value=move || prompt_input.get()
                                    on:input=move |ev| set_prompt_input.set(event_target_value(&ev))
                                ></textarea>
                            }.into_any(),
                            Prompt::Laying => view! {
                                <h2>"Laying"</h2>
                                <div class="egg-options">
                                    {EggKind::ALL.iter().map(|&kind| view! {
                                        <button
                                            type="button"
                                            on:click=move |_| submit(CareType::Laying, Ok(CareLogDraft::laying(kind)))
                                        >
                                            {kind.label()}
                                        </button>
                                    }).collect_view()}
                                </div>
                            }.into_any(),
                        }}
                        <div class="modal-actions">
                            <button type="button" class="cancel-btn" on:click=move |_| set_prompt.set(None)>"Cancel"</button>
                            <Show when=move || current != Prompt::Laying>
                                <button type="submit">"Save"</button>
                            </Show>
                        </div>
                    </form>
                </div>
            })}

            <h3>
                "Recent records "
                <span class="log-count">{move || format!("({})", logs.with(Vec::len))}</span>
            </h3>
            <Show
                when=move || logs.with(|l| !l.is_empty())
                fallback=|| view! { <p class="empty-state">"No care records yet."</p> }
            >
                <ul class="log-list">
                    {move || visible().into_iter().map(|log| {
                        let id = log.id;
                        let days = days_since(log.created_at, Utc::now());
                        view! {
                            <li class="log-item">
                                <span class="log-icon">{log.care_type.icon()}</span>
                                <div class="log-content">
                                    <span class="log-summary">{log.summary()}</span>
                                    <span class="log-date">{format_local(log.created_at)}</span>
                                </div>
                                <span class={if days >= 3 { "days-badge urgent" } else { "days-badge good" }}>
                                    {if days == 0 { "today".to_string() } else { format!("{days}d ago") }}
                                </span>
                                <ConfirmButton
                                    button_class="delete-btn small"
                                    label="✕"
                                    prompt="Delete this record?".to_string()
                                    on_confirm=move |_: ()| delete(id)
                                />
                            </li>
                        }
                    }).collect_view()}
                </ul>
                <Show when=move || logs.with(|l| l.len() > RECENT_LIMIT)>
                    <button class="show-all-btn" on:click=move |_| set_show_all.update(|v| *v = !*v)>
                        {move || if show_all.get() { "Show less".to_string() } else { format!("Show all ({})", logs.with(Vec::len)) }}
                    </button>
                </Show>
            </Show>
        </section>
    }
}

/// Parse a `datetime-local` value in the browser's time zone
fn parse_local_datetime(input: &str) -> Option<DateTime<Utc>> {
    if input.trim().is_empty() {
        return None;
    }
    let millis = js_sys::Date::new(&JsValue::from_str(input)).get_time();
    if millis.is_nan() {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// Current local time as a `datetime-local` value
fn now_local_input() -> String {
    let now = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}",
        now.get_full_year(),
        now.get_month() + 1,
        now.get_date(),
        now.get_hours(),
        now.get_minutes()
    )
}

fn format_local(at: DateTime<Utc>) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(at.timestamp_millis() as f64));
    date.to_locale_string("default", &JsValue::UNDEFINED).into()
}
