//! Backend service handlers for frontend-driven requests.
//!
//! Each handler operates on the shared `AppContext`, performs the network
//! side effects, and answers with data or a toast. Failures never escape a
//! handler: they are logged and shown to the user.

pub mod analysis_service;
pub mod catalog_service;
pub mod config_service;
pub mod lote_service;
pub mod notification_service;
pub mod user_service;

/// Represents a type that is used in all handlers as an application context.
pub(crate) type AppContextHandle = std::sync::Arc<crate::app::AppContext>;
