//! API Client
//!
//! HTTP calls to the local view server.

pub mod client;

pub use client::*;
