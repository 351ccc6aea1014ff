//! # client
//!
//! Browser view-model for the Bed Ready printer-host plugin.
//!
//! This crate holds the plugin's settings model, the backend command client,
//! push-message parsing, the notification model, and the snapshot/debug-image
//! lists. It integrates with the `cropper` crate for the reference-image crop
//! editor. With the `web` feature it also exports the `wasm-bindgen` facade
//! the host page binds its DOM events to.

pub mod net;
pub mod state;

#[cfg(feature = "web")]
pub mod app;
