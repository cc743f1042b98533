//! Registration page. A successful signup signs the user straight in.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;

use super::login::adopt_token;
use crate::app::HOME_PATH;
use crate::components::banner::{Banner, BannerKind};
use crate::net::api::{self, Api, SIGNUP, Signup, TokenResponse};
use crate::state::request::RequestState;
use crate::util::form::{FieldErrors, TextField};

pub fn validate(form: &Signup) -> FieldErrors {
    FieldErrors::required(&[
        ("name", "name", &form.name),
        ("email", "email", &form.email),
        ("password", "password", &form.password),
        ("role", "role", &form.role),
    ])
}

/// Trim everything but the password.
pub fn normalized(form: &Signup) -> Signup {
    Signup {
        name: form.name.trim().to_owned(),
        email: form.email.trim().to_owned(),
        password: form.password.clone(),
        role: form.role.trim().to_owned(),
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let api = expect_context::<Api>();
    let signup = api.controller::<TokenResponse>();
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let role = RwSignal::new(String::new());

    let form = Memo::new(move |_| Signup {
        name: name.get(),
        email: email.get(),
        password: password.get(),
        role: role.get(),
    });
    let errors = Memo::new(move |_| form.with(validate));

    let state = signup.signal();
    let loading = Memo::new({
        let state = state.clone();
        move |_| state.with(RequestState::is_loading)
    });
    let failure = Memo::new({
        let state = state.clone();
        move |_| state.with(|s| s.error().map(|e| e.message.clone()))
    });
    adopt_token(state, api.session().clone());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() || !errors.get_untracked().is_empty() {
            return;
        }
        signup.invoke(SIGNUP, api::signup(&normalized(&form.get_untracked())));
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Registration"</h1>
                <form class="login-form" on:submit=on_submit>
                    <TextField label="Name" field="name" value=name errors=errors/>
                    <TextField label="Email" field="email" input_type="email" value=email errors=errors/>
                    <TextField label="Password" field="password" input_type="password" value=password errors=errors/>
                    <TextField label="Role" field="role" value=role errors=errors/>
                    <button
                        class="login-button"
                        type="submit"
                        disabled=move || loading.get() || !errors.get().is_empty()
                    >
                        "Register"
                    </button>
                </form>
                <p class="login-card__links">
                    <a href=HOME_PATH>"Already registered? Login"</a>
                </p>
            </div>
            {move || failure.get().map(|message| view! { <Banner kind=BannerKind::Error message=message/> })}
        </div>
    }
}
