//! # client
//!
//! Leptos + WASM browser client for the chat application.
//!
//! `state` holds plain state structs and the pure reconciliation/read
//! policies, `net` is the only boundary to the backend (REST façade and
//! realtime channel), `pages` are route screens, `components` reusable views.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entrypoint: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
