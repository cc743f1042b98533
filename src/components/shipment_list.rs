//! Shipment cards with an inline tracking editor per card.

#[cfg(test)]
#[path = "shipment_list_test.rs"]
mod shipment_list_test;

use leptos::prelude::*;

use super::tracking_form::TrackingForm;
use crate::net::api::Shipment;

pub const NOT_AVAILABLE: &str = "Not available";

/// Display strings for a shipment's current tracking record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackingCells {
    pub status: String,
    pub description: String,
    pub code: String,
}

impl TrackingCells {
    pub fn of(shipment: &Shipment) -> Self {
        let Some(detail) = shipment.tracking() else {
            return Self {
                status: NOT_AVAILABLE.to_owned(),
                description: NOT_AVAILABLE.to_owned(),
                code: NOT_AVAILABLE.to_owned(),
            };
        };
        Self {
            status: detail.status.to_string(),
            description: or_not_available(&detail.description),
            code: or_not_available(&detail.tracking_code),
        }
    }
}

fn or_not_available(value: &str) -> String {
    if value.trim().is_empty() { NOT_AVAILABLE.to_owned() } else { value.to_owned() }
}

/// Every shipment in `shipments`; `on_update` fires after a tracking edit
/// lands so the owner can refetch.
#[component]
pub fn ShipmentList(#[prop(into)] shipments: Signal<Vec<Shipment>>, on_update: Callback<()>) -> impl IntoView {
    view! {
        <Show when=move || !shipments.with(Vec::is_empty)>
            <section class="shipment-list">
                <h2>"Shipment List"</h2>
                <ul class="shipment-list__items">
                    {move || {
                        shipments
                            .get()
                            .into_iter()
                            .map(|shipment| view! { <ShipmentCard shipment=shipment on_update=on_update/> })
                            .collect::<Vec<_>>()
                    }}
                </ul>
            </section>
        </Show>
    }
}

#[component]
fn ShipmentCard(shipment: Shipment, on_update: Callback<()>) -> impl IntoView {
    let editing = RwSignal::new(false);
    let cells = TrackingCells::of(&shipment);
    let details_id = shipment.tracking().map(|detail| detail.id.clone());

    let on_close = Callback::new(move |()| editing.set(false));
    let on_tracking_saved = Callback::new(move |()| {
        editing.set(false);
        on_update.run(());
    });

    view! {
        <li class="shipment-card">
            <DetailField label="Sender name" value=shipment.sender_name/>
            <DetailField label="Recipient name" value=shipment.recipient_name/>
            <DetailField label="Sender Address" value=shipment.sender_address/>
            <DetailField label="Recipient Address" value=shipment.recipient_address/>
            <DetailField label="Description" value=shipment.description/>
            <DetailField label="Tracking Status" value=cells.status/>
            <DetailField label="Tracking Description" value=cells.description/>
            <DetailField label="Tracking Code" value=cells.code/>
            {details_id
                .map(|id| {
                    view! {
                        <Show
                            when=move || editing.get()
                            fallback=move || {
                                view! {
                                    <button class="btn shipment-card__track" on:click=move |_| editing.set(true)>
                                        "Update Tracking"
                                    </button>
                                }
                            }
                        >
                            <TrackingForm
                                tracking_details_id=id.clone()
                                on_update=on_tracking_saved
                                on_close=on_close
                            />
                        </Show>
                    }
                })}
        </li>
    }
}

#[component]
fn DetailField(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="shipment-card__field">
            <span class="shipment-card__label">{label} ": "</span>
            {value}
        </div>
    }
}
