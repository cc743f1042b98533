//! Inline editor that posts a new status for one tracking record.

#[cfg(test)]
#[path = "tracking_form_test.rs"]
mod tracking_form_test;

use leptos::prelude::*;

use super::banner::{Banner, BannerKind};
use crate::net::api::{self, Api, TrackingStatus, TrackingUpdate, UPDATE_TRACKING};
use crate::state::request::RequestState;
use crate::util::form::{FieldErrors, FieldMessage, TextField};

pub fn validate(status: &str, description: &str) -> FieldErrors {
    let mut errors = FieldErrors::required(&[
        ("status", "tracking status", status),
        ("description", "tracking description", description),
    ]);
    if !status.is_empty() && TrackingStatus::parse(status).is_none() {
        errors.insert("status", format!("Unknown tracking status {status}"));
    }
    errors
}

/// Build the update body, or `None` while the form is incomplete.
pub fn build_update(tracking_details_id: &str, status: &str, description: &str) -> Option<TrackingUpdate> {
    if !validate(status, description).is_empty() {
        return None;
    }
    Some(TrackingUpdate {
        tracking_details_id: tracking_details_id.to_owned(),
        status: TrackingStatus::parse(status)?,
        description: description.trim().to_owned(),
    })
}

#[component]
pub fn TrackingForm(tracking_details_id: String, on_update: Callback<()>, on_close: Callback<()>) -> impl IntoView {
    let update = expect_context::<Api>().controller::<serde_json::Value>();
    let status = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let errors = Memo::new(move |_| validate(&status.get(), &description.get()));

    let state = update.signal();
    let loading = Memo::new({
        let state = state.clone();
        move |_| state.with(RequestState::is_loading)
    });
    let failure = Memo::new({
        let state = state.clone();
        move |_| state.with(|s| s.error().map(|e| e.message.clone()))
    });
    Effect::new(move || {
        if state.with(|s| matches!(s, RequestState::Success(_))) {
            status.set(String::new());
            description.set(String::new());
            on_update.run(());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(body) =
            build_update(&tracking_details_id, &status.get_untracked(), &description.get_untracked())
        else {
            return;
        };
        update.invoke(UPDATE_TRACKING, api::update_tracking(&body));
    };

    view! {
        <form class="tracking-form" on:submit=on_submit>
            <label class="form__label">
                "Status"
                <select
                    class="form__select"
                    name="status"
                    prop:value=move || status.get()
                    on:change=move |ev| status.set(event_target_value(&ev))
                >
                    <option value="">"Select Status"</option>
                    {TrackingStatus::SELECTABLE
                        .into_iter()
                        .map(|option| view! { <option value=option.as_str()>{option.as_str()}</option> })
                        .collect::<Vec<_>>()}
                </select>
            </label>
            <FieldMessage errors=errors field="status"/>
            <TextField label="Description" field="description" value=description errors=errors/>
            <Show when=move || loading.get()>
                <p class="form__loading">"Loading..."</p>
            </Show>
            <div class="form__actions">
                <button
                    class="btn btn--primary"
                    type="submit"
                    disabled=move || loading.get() || !errors.get().is_empty()
                >
                    "Update Tracking Details"
                </button>
                <button class="btn" type="button" on:click=move |_| on_close.run(())>
                    "Close"
                </button>
            </div>
            {move || failure.get().map(|message| view! { <Banner kind=BannerKind::Error message=message/> })}
        </form>
    }
}
