//! Create-shipment form shown above the dashboard list.

#[cfg(test)]
#[path = "shipment_form_test.rs"]
mod shipment_form_test;

use leptos::prelude::*;

use super::banner::{Banner, BannerKind};
use crate::net::api::{self, Api, CREATE_SHIPMENT, NewShipment, Shipment};
use crate::state::request::RequestState;
use crate::util::form::{FieldErrors, TextField};

pub fn validate(draft: &NewShipment) -> FieldErrors {
    FieldErrors::required(&[
        ("senderName", "sender name", &draft.sender_name),
        ("senderAddress", "sender address", &draft.sender_address),
        ("recipientName", "recipient name", &draft.recipient_name),
        ("recipientAddress", "recipient address", &draft.recipient_address),
        ("description", "description", &draft.description),
    ])
}

/// `draft` with surrounding whitespace stripped from every field.
pub fn normalized(draft: &NewShipment) -> NewShipment {
    NewShipment {
        sender_name: draft.sender_name.trim().to_owned(),
        sender_address: draft.sender_address.trim().to_owned(),
        recipient_name: draft.recipient_name.trim().to_owned(),
        recipient_address: draft.recipient_address.trim().to_owned(),
        description: draft.description.trim().to_owned(),
    }
}

/// `on_created` receives the server's copy of the new shipment.
#[component]
pub fn ShipmentForm(on_created: Callback<Shipment>, on_close: Callback<()>) -> impl IntoView {
    let create = expect_context::<Api>().controller::<Shipment>();
    let sender_name = RwSignal::new(String::new());
    let sender_address = RwSignal::new(String::new());
    let recipient_name = RwSignal::new(String::new());
    let recipient_address = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let fields = [sender_name, sender_address, recipient_name, recipient_address, description];

    let draft = Memo::new(move |_| NewShipment {
        sender_name: sender_name.get(),
        sender_address: sender_address.get(),
        recipient_name: recipient_name.get(),
        recipient_address: recipient_address.get(),
        description: description.get(),
    });
    let errors = Memo::new(move |_| draft.with(validate));

    let state = create.signal();
    let loading = Memo::new({
        let state = state.clone();
        move |_| state.with(RequestState::is_loading)
    });
    let failure = Memo::new({
        let state = state.clone();
        move |_| state.with(|s| s.error().map(|e| e.message.clone()))
    });
    Effect::new(move || {
        if let RequestState::Success(shipment) = state.get() {
            for field in fields {
                field.set(String::new());
            }
            on_created.run(shipment);
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if !errors.get_untracked().is_empty() {
            return;
        }
        let body = normalized(&draft.get_untracked());
        create.invoke(CREATE_SHIPMENT, api::create_shipment(&body));
    };

    view! {
        <form class="shipment-form" on:submit=on_submit>
            <TextField label="Sender Name" field="senderName" value=sender_name errors=errors/>
            <TextField label="Sender Address" field="senderAddress" value=sender_address errors=errors/>
            <TextField label="Recipient Name" field="recipientName" value=recipient_name errors=errors/>
            <TextField label="Recipient Address" field="recipientAddress" value=recipient_address errors=errors/>
            <TextField label="Description" field="description" value=description errors=errors/>
            <Show when=move || loading.get()>
                <p class="form__loading">"Creating shipment..."</p>
            </Show>
            <div class="form__actions">
                <button
                    class="btn btn--primary"
                    type="submit"
                    disabled=move || loading.get() || !errors.get().is_empty()
                >
                    "Create Shipment"
                </button>
                <button class="btn" type="button" on:click=move |_| on_close.run(())>
                    "Close"
                </button>
            </div>
            {move || failure.get().map(|message| view! { <Banner kind=BannerKind::Error message=message/> })}
        </form>
    }
}
