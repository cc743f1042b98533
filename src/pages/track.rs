//! Public tracking lookup by tracking code. No session required.

#[cfg(test)]
#[path = "track_test.rs"]
mod track_test;

use leptos::prelude::*;

use crate::app::HOME_PATH;
use crate::components::banner::{Banner, BannerKind};
use crate::net::api::{self, Api, TRACK, TrackingSummary};
use crate::state::request::RequestState;
use crate::util::form::{FieldErrors, TextField};

pub fn validate(tracking_code: &str) -> FieldErrors {
    FieldErrors::required(&[("trackingCode", "tracking number", tracking_code)])
}

#[component]
pub fn TrackPage() -> impl IntoView {
    let lookup = expect_context::<Api>().controller::<TrackingSummary>();
    let code = RwSignal::new(String::new());
    let errors = Memo::new(move |_| validate(&code.get()));

    let state = lookup.signal();
    let summary = Memo::new({
        let state = state.clone();
        move |_| state.with(|s| s.data().cloned())
    });
    let loading = Memo::new({
        let state = state.clone();
        move |_| state.with(RequestState::is_loading)
    });
    let failure = Memo::new(move |_| state.with(|s| s.error().map(|e| e.message.clone())));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if !errors.get_untracked().is_empty() {
            return;
        }
        lookup.invoke(TRACK, api::track(&code.get_untracked()));
    };

    view! {
        <div class="track-page">
            <h2>"Track Shipment"</h2>
            <form class="track-form" on:submit=on_submit>
                <TextField label="Tracking Number" field="trackingCode" value=code errors=errors/>
                <button class="btn btn--primary" type="submit" disabled=move || loading.get()>
                    "Track"
                </button>
            </form>
            <Show when=move || loading.get()>
                <p class="track-page__loading">"Looking up shipment..."</p>
            </Show>
            {move || {
                summary
                    .get()
                    .map(|summary| {
                        view! {
                            <section class="track-page__result">
                                <h3>"Shipment Details"</h3>
                                <ul>
                                    <li>"Status: " {summary.status}</li>
                                    <li>"Description: " {summary.description}</li>
                                    <li>"Shipment Creator Name: " {summary.user_name}</li>
                                </ul>
                            </section>
                        }
                    })
            }}
            <a class="track-page__home" href=HOME_PATH>"Back"</a>
            {move || failure.get().map(|message| view! { <Banner kind=BannerKind::Error message=message/> })}
        </div>
    }
}
