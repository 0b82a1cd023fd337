//! Notification layer: the data store, the WebSocket push channel and the
//! hub that ties both to the frontend.

pub mod channel;
pub mod hub;
pub mod store;

use async_trait::async_trait;
use seedlab_bridge::{notification::Notification, page::Page};

use crate::error::ApiError;

pub use channel::{ChannelConfig, ChannelError, NotificationChannel, PushEvent};
pub use hub::NotificationHub;
pub use store::{CountUpdate, NotificationStore};

/// REST operations the store needs. Implemented by
/// [`crate::api::ApiClient`]; tests provide in-memory fakes.
#[async_trait]
pub trait NotificationApi: Send + Sync {
    async fn fetch_page(&self, page: u32, size: u32) -> Result<Page<Notification>, ApiError>;
    async fn unread_count(&self) -> Result<u64, ApiError>;
    async fn mark_as_read(&self, id: i64) -> Result<(), ApiError>;
    async fn mark_all_as_read(&self) -> Result<(), ApiError>;
    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}
