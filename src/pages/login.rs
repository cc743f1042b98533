//! Login page: email + password exchanged for a bearer token.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered as the unauthenticated branch of `/` and `/dashboard`. A
//! successful exchange hands the token to the session manager, which flips the
//! guards, then moves the browser to the dashboard route.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::{DASHBOARD_PATH, REGISTER_PATH, TRACK_PATH};
use crate::components::banner::{Banner, BannerKind};
use crate::net::api::{self, Api, Credentials, LOGIN, TokenResponse};
use crate::state::request::RequestState;
use crate::state::session::SessionManager;
use crate::util::form::{FieldErrors, TextField};

pub fn validate(email: &str, password: &str) -> FieldErrors {
    FieldErrors::required(&[("email", "email", email), ("password", "password", password)])
}

/// Email is trimmed; the password is sent exactly as typed.
pub fn credentials(email: &str, password: &str) -> Credentials {
    Credentials { email: email.trim().to_owned(), password: password.to_owned() }
}

/// Store the token from a successful login or signup and open the dashboard.
pub(crate) fn adopt_token(state: ArcReadSignal<RequestState<TokenResponse>>, session: SessionManager) {
    let navigate = use_navigate();
    Effect::new(move || {
        if let RequestState::Success(TokenResponse { token }) = state.get() {
            session.set_credential(&token);
            navigate(DASHBOARD_PATH, NavigateOptions::default());
        }
    });
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let api = expect_context::<Api>();
    let login = api.controller::<TokenResponse>();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let errors = Memo::new(move |_| validate(&email.get(), &password.get()));

    let state = login.signal();
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
        let body = credentials(&email.get_untracked(), &password.get_untracked());
        login.invoke(LOGIN, api::login(&body));
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Login"</h1>
                <form class="login-form" on:submit=on_submit>
                    <TextField label="Email" field="email" input_type="email" value=email errors=errors/>
                    <TextField label="Password" field="password" input_type="password" value=password errors=errors/>
                    <button
                        class="login-button"
                        type="submit"
                        disabled=move || loading.get() || !errors.get().is_empty()
                    >
                        {move || if loading.get() { "Signing in..." } else { "Login" }}
                    </button>
                </form>
                <p class="login-card__links">
                    <a href=REGISTER_PATH>"Create an account"</a>
                    " | "
                    <a href=TRACK_PATH>"Track a shipment"</a>
                </p>
            </div>
            {move || failure.get().map(|message| view! { <Banner kind=BannerKind::Error message=message/> })}
        </div>
    }
}
