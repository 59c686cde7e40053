//! HACCP Desk front end
//!
//! Browser views of the temperature logbook built with Leptos (WASM).
//!
//! # Views
//!
//! - Dashboard with the entry counter and recent activity
//! - Temperature capture with a drawn signature
//! - Label and monthly report downloads
//! - Settings
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It talks to the local view server (`haccp-desk-api`) over HTTP.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
