//! Dashboard page: the signed-in user's shipments.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only reachable through the route guard. Loads the shipment list once on
//! mount, appends locally created shipments, and refetches after a tracking
//! edit. Logout clears the session before the server acknowledges.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::{HOME_PATH, TRACK_PATH};
use crate::components::banner::{Banner, BannerKind};
use crate::components::shipment_form::ShipmentForm;
use crate::components::shipment_list::ShipmentList;
use crate::net::api::{self, Api, LOGOUT, SHIPMENTS, Shipment};
use crate::state::request::RequestState;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = expect_context::<Api>();
    let session = api.session().clone();
    let list = api.controller::<Vec<Shipment>>();
    let logout = api.controller::<serde_json::Value>();
    let navigate = use_navigate();

    let shipments = RwSignal::new(Vec::<Shipment>::new());
    let show_form = RwSignal::new(false);

    let state = list.signal();
    let loading = Memo::new({
        let state = state.clone();
        move |_| state.with(RequestState::is_loading)
    });
    let failure = Memo::new({
        let state = state.clone();
        move |_| state.with(|s| s.error().map(|e| e.message.clone()))
    });
    Effect::new(move || {
        if let RequestState::Success(items) = state.get() {
            shipments.set(items);
        }
    });

    list.invoke(SHIPMENTS, api::list_shipments());

    let refetch = Callback::new(move |()| list.invoke(SHIPMENTS, api::list_shipments()));
    let on_created = Callback::new(move |shipment: Shipment| {
        shipments.update(|items| items.push(shipment));
        show_form.set(false);
    });
    let on_close = Callback::new(move |()| show_form.set(false));

    let on_logout = move |_| {
        // The bearer header is captured before the credential is dropped.
        logout.invoke(LOGOUT, api::logout());
        session.clear_credential();
        navigate(HOME_PATH, NavigateOptions::default());
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header toolbar">
                <h1 class="toolbar__title">"Welcome to Dashboard"</h1>
                <span class="toolbar__spacer"></span>
                <button class="btn toolbar__create" on:click=move |_| show_form.update(|open| *open = !*open)>
                    "Create Shipment"
                </button>
                <a class="btn toolbar__track" href=TRACK_PATH>
                    "Track"
                </a>
                <button class="btn toolbar__logout" on:click=on_logout title="Logout">
                    "Logout"
                </button>
            </header>
            <Show when=move || show_form.get()>
                <ShipmentForm on_created=on_created on_close=on_close/>
            </Show>
            <Show when=move || loading.get() && shipments.with(Vec::is_empty)>
                <p>"Loading..."</p>
            </Show>
            <ShipmentList shipments=shipments on_update=refetch/>
            {move || failure.get().map(|message| view! { <Banner kind=BannerKind::Error message=message/> })}
        </div>
    }
}
