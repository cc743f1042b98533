//! Root application component with routing and context providers.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::banner::{Banner, BannerKind};
use crate::config::ClientConfig;
use crate::net::api::Api;
use crate::pages::{dashboard::DashboardPage, login::LoginPage, register::RegisterPage, track::TrackPage};
use crate::util::auth::Protected;

pub const HOME_PATH: &str = "/";
pub const REGISTER_PATH: &str = "/register";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const TRACK_PATH: &str = "/track";

/// Shown in place of the routes when a view fails to render.
pub const RENDER_FAILURE_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Log every error caught by the root boundary. Returns how many there were.
pub fn report_render_failures(errors: &Errors) -> usize {
    let mut count = 0;
    for (_, error) in errors.iter() {
        log::error!("app: render failed: {error}");
        count += 1;
    }
    count
}

/// Root application component.
///
/// Builds the one `Api` handle (and with it the session) for the whole app
/// and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_build_env();
    log::info!("app: api endpoint {}", config.base_url);
    provide_context(Api::browser(config));

    view! {
        <Title text="ShipTrack"/>

        <Router>
            <ErrorBoundary fallback={|errors: ArcRwSignal<Errors>| {
                errors.with_untracked(report_render_failures);
                view! { <Banner kind=BannerKind::Error message=RENDER_FAILURE_MESSAGE/> }
            }}>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=HomeRoute/>
                    <Route path=StaticSegment("register") view=RegisterRoute/>
                    <Route path=StaticSegment("dashboard") view=DashboardRoute/>
                    <Route path=StaticSegment("track") view=TrackPage/>
                </Routes>
            </ErrorBoundary>
        </Router>
    }
}

#[component]
fn HomeRoute() -> impl IntoView {
    view! { <Protected view=DashboardPage fallback=LoginPage/> }
}

#[component]
fn RegisterRoute() -> impl IntoView {
    view! { <Protected view=DashboardPage fallback=RegisterPage/> }
}

#[component]
fn DashboardRoute() -> impl IntoView {
    view! { <Protected view=DashboardPage fallback=LoginPage/> }
}
