//! # shiptrack-client
//!
//! Leptos + WASM browser client for the shipment tracking service.
//!
//! The core is the session and request-lifecycle layer: `state::session` owns
//! the bearer credential, `net::controller` runs every API call through a
//! uniform `Idle -> Loading -> Success | Error` lifecycle, and `util::auth`
//! decides which branch a guarded route renders. Pages and components on top
//! consume only those contracts.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn mount() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
