//! Backend runtime entry point and public API surface.
//!
//! This crate owns the backend lifecycle: it routes bridge messages to
//! services, talks to the laboratory REST API, keeps the notification layer
//! running and validates analysis data before it is submitted.

mod app;
mod config;
mod runtime;
mod services;
mod state;

pub mod api;
pub mod error;
pub mod notifications;
pub mod validation;

pub use crate::runtime::run;
