use seedlab_bridge::{
    catalog::EntityKind,
    config::Config,
    lote::LoteFilter,
    page::ListQuery,
    user::UserStatus,
};

use crate::api::ApiClient;

/// The core application state that holds configuration, the API client and
/// the last query of every table.
///
/// Services reload a table with its last query after a successful mutation,
/// so the frontend does not have to ask again.
#[derive(Debug, Clone)]
pub struct State {
    /// The loaded application configuration.
    pub config: Config,
    /// Authenticated client for the laboratory API.
    pub api: ApiClient,
    pub last_lotes: Option<LoteFilter>,
    pub last_catalog: Option<(EntityKind, ListQuery)>,
    pub last_users: Option<(ListQuery, Option<UserStatus>)>,
}

impl State {
    pub fn new(config: Config, api: ApiClient) -> Self {
        Self {
            config,
            api,
            last_lotes: None,
            last_catalog: None,
            last_users: None,
        }
    }
}

/// Thread-safe, async-friendly shared reference to the application [`State`].
pub type SharedState = std::sync::Arc<tokio::sync::RwLock<State>>;
