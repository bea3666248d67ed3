//! Photo List
//!
//! Gallery for one gecko: upload with an optional "taken" date, pick the
//! main photo, delete.

use chrono::{DateTime, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;
use rack_client::{ApiError, ApiOperation, PhotoUpload};
use rack_domain::{GeckoId, Photo, PhotoId};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlInputElement};

use super::ConfirmButton;
use crate::api;
use crate::context::use_app_context;

/// `on_main` receives the new main photo path (None once no main photo is left)
#[component]
pub fn PhotoList(gecko_id: GeckoId, #[prop(into)] on_main: Callback<Option<String>>) -> impl IntoView {
    let ctx = use_app_context();

    let photos = RwSignal::new(Vec::<Photo>::new());
    let (taken_on, set_taken_on) = signal(String::new());
    let (uploading, set_uploading) = signal(false);

    spawn_local(async move {
        let result = match api::client() {
            Ok(client) => client.get_photos(gecko_id).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(loaded) => photos.set(loaded),
            Err(e) => ctx.report(&e, ApiOperation::LoadPhotos),
        }
    });

    let on_file = move |ev: web_sys::Event| {
        let Some(input) = ev.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // let the same file be picked again
        input.set_value("");

        let taken_at = parse_local_date(&taken_on.get_untracked());
        set_uploading.set(true);
        spawn_local(async move {
            let result = upload(gecko_id, file, taken_at).await;
            set_uploading.set(false);
            match result {
                Ok(photo) => {
                    tracing::info!(gecko_id, photo_id = photo.id, "photo uploaded");
                    if photo.is_main {
                        on_main.run(Some(photo.photo_url.clone()));
                    }
                    photos.update(|list| {
                        if photo.is_main {
                            list.iter_mut().for_each(|p| p.is_main = false);
                        }
                        list.insert(0, photo);
                    });
                    set_taken_on.set(String::new());
                    ctx.flash_success("Photo uploaded");
                }
                Err(e) => ctx.report(&e, ApiOperation::UploadPhoto),
            }
        });
    };

    let make_main = move |photo_id: PhotoId| {
        spawn_local(async move {
            let result = match api::client() {
                Ok(client) => client.set_main_photo(photo_id).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(main) => {
                    photos.update(|list| list.iter_mut().for_each(|p| p.is_main = p.id == photo_id));
                    on_main.run(Some(main.photo_url));
                }
                Err(e) => ctx.report(&e, ApiOperation::SetMainPhoto),
            }
        });
    };

    let remove = move |photo_id: PhotoId| {
        spawn_local(async move {
            let result = match api::client() {
                Ok(client) => client.delete_photo(photo_id).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => {
                    let was_main = photos.with_untracked(|list| list.iter().any(|p| p.id == photo_id && p.is_main));
                    photos.update(|list| list.retain(|p| p.id != photo_id));
                    if was_main {
                        on_main.run(None);
                    }
                }
                Err(e) => ctx.report(&e, ApiOperation::DeletePhoto),
            }
        });
    };

    view! {
        <section class="photo-list">
            <h3>"Photos " <span class="photo-count">{move || format!("({})", photos.with(Vec::len))}</span></h3>

            <div class="photo-upload">
                <label>
                    "Taken on"
                    <input
                        type="date"
                        prop:value=move || taken_on.get()
                        on:input=move |ev| set_taken_on.set(event_target_value(&ev))
                    />
                </label>
                <label class=move || if uploading.get() { "upload-btn busy" } else { "upload-btn" }>
                    {move || if uploading.get() { "Uploading…" } else { "+ Add photo" }}
                    <input
                        type="file"
                        accept="image/*"
                        hidden=true
                        disabled=move || uploading.get()
                        on:change=on_file
                    />
                </label>
            </div>

            <ul class="photo-grid">
                {move || photos.get().into_iter().map(|photo| {
                    let id = photo.id;
                    let taken = photo.taken_at.or(photo.created_at).map(format_local_date).unwrap_or_default();
                    view! {
                        <li class="photo-item" class:main=photo.is_main>
                            <img src=api::image_url(&photo.photo_url) alt="" />
                            <span class="photo-date">{taken}</span>
                            {if photo.is_main {
                                view! { <span class="main-badge">"Main"</span> }.into_any()
                            } else {
                                view! {
                                    <button class="main-btn" on:click=move |_| make_main(id)>"Set as main"</button>
                                }.into_any()
                            }}
                            <ConfirmButton
                                button_class="delete-btn small"
                                label="✕"
                                prompt="Delete this photo?".to_string()
                                on_confirm=move |_: ()| remove(id)
                            />
                        </li>
                    }
                }).collect_view()}
            </ul>
        </section>
    }
}

async fn upload(gecko_id: GeckoId, file: File, taken_at: Option<DateTime<Utc>>) -> Result<Photo, ApiError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ApiError::InvalidInput(format!("could not read {}: {e:?}", file.name())))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let mime_type = match file.type_() {
        t if t.is_empty() => "image/jpeg".to_string(),
        t => t,
    };
    let upload = PhotoUpload {
        bytes,
        file_name: file.name(),
        mime_type,
        taken_at,
    };
    api::client()?.upload_photo(gecko_id, upload).await
}

/// `YYYY-MM-DD` from a date input, as local midnight
fn parse_local_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let millis = js_sys::Date::new(&JsValue::from_str(&format!("{input}T00:00"))).get_time();
    if millis.is_nan() {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

fn format_local_date(at: DateTime<Utc>) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(at.timestamp_millis() as f64));
    date.to_locale_date_string("default", &JsValue::UNDEFINED).into()
}
