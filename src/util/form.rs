//! Required-field bookkeeping for the auth and shipment forms.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use std::collections::BTreeMap;

use leptos::prelude::*;

/// Map of field key to the message shown under that field.
///
/// Rebuilt from the current form values on every change rather than patched
/// field by field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Flag every `(key, label, value)` whose trimmed value is empty.
    pub fn required(fields: &[(&'static str, &str, &str)]) -> Self {
        let errors = fields
            .iter()
            .filter(|(_, _, value)| value.trim().is_empty())
            .map(|(key, label, _)| (*key, required_message(label)))
            .collect();
        Self(errors)
    }

    /// Flag `key` with a custom message, replacing any earlier one.
    pub fn insert(&mut self, key: &'static str, message: impl Into<String>) {
        self.0.insert(key, message.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

pub fn required_message(label: &str) -> String {
    format!("Please enter {label}")
}

/// Message line for one field, rendered only while that field is flagged.
#[component]
pub fn FieldMessage(errors: Memo<FieldErrors>, field: &'static str) -> impl IntoView {
    move || {
        errors
            .get()
            .get(field)
            .map(|message| view! { <p class="form__error">{message.to_owned()}</p> })
    }
}

/// Labelled text input bound to `value`, with its required-field message.
#[component]
pub fn TextField(
    label: &'static str,
    field: &'static str,
    value: RwSignal<String>,
    errors: Memo<FieldErrors>,
    #[prop(default = "text")] input_type: &'static str,
) -> impl IntoView {
    view! {
        <label class="form__label">
            {label}
            <input
                class="form__input"
                type=input_type
                name=field
                placeholder=label
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </label>
        <FieldMessage errors=errors field=field/>
    }
}
