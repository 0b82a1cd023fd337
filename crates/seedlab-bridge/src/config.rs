use serde::{Deserialize, Serialize};

/// Connection settings for the laboratory backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the REST API, without the `/api` prefix.
    pub base_url: String,
    /// URL of the WebSocket endpoint that pushes notifications.
    pub websocket_url: String,
    /// Timeout applied to every REST request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_owned(),
            websocket_url: "ws://localhost:8080/ws/notificaciones".to_owned(),
            request_timeout_secs: 30,
        }
    }
}

/// Credentials of the signed-in user. Both values are issued by the backend
/// login flow and copied here.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Bearer token sent with every REST request and the WebSocket handshake.
    pub token: Option<String>,
    /// Identifier of the signed-in user, used to key the WebSocket channel.
    pub user_id: Option<i64>,
}

/// Behaviour of the notification layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Whether the fallback poller may run while the WebSocket is down.
    pub polling_enabled: bool,
    /// Interval between fallback refreshes, in seconds.
    pub poll_interval_secs: u64,
    /// Amount of notifications fetched per page.
    pub page_size: u32,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            polling_enabled: true,
            poll_interval_secs: 30,
            page_size: 10,
        }
    }
}

/// Settings shared by the CRUD tables.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Amount of rows fetched per page.
    pub page_size: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

/// Global application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub notifications: NotificationsConfig,
    pub listing: ListingConfig,
}
