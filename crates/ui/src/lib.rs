#![deny(unsafe_code)]

/// Flint desktop chat shell.
///
/// Views are thin: composer state, sizing and gating come from `flint-composer`.
pub mod app;
/// Chat room and composer views.
pub mod chat;
pub mod error_panel;
