//! Backend runtime setup and orchestration.
//!
//! This module wires together configuration, shared state, the notification
//! layer and the message dispatch loop that listens to frontend bridge
//! requests.

use std::{sync::Arc, thread};

use seedlab_bridge::{
    MessageFromBackend, MessageToBackend,
    config::{ApiConfig, Config},
    notification::ToastKind,
};
use tokio::sync::{
    RwLock, mpsc,
    mpsc::{Receiver, Sender},
};

use crate::{
    api::ApiClient,
    app::AppContext,
    notifications::{ChannelConfig, NotificationChannel, NotificationHub, NotificationStore},
    state::State,
};

fn build_client(config: &Config) -> Option<ApiClient> {
    let token = config.session.token.clone();
    match ApiClient::new(&config.api, token.clone()) {
        Ok(api) => Some(api),
        Err(e) => {
            log::error!("Invalid API settings ({e}), falling back to defaults");
            ApiClient::new(&ApiConfig::default(), token)
                .inspect_err(|e| log::error!("Failed to build the HTTP client: {e}"))
                .ok()
        }
    }
}

/// Initialize backend state and start processing frontend messages.
async fn setup_backend(rx: Receiver<MessageToBackend>, tx: Sender<MessageFromBackend>) {
    let (config, config_error) = match crate::config::load_config().await {
        Ok(config) => (config, None),
        Err(e) => {
            log::error!("Failed to load config, using defaults: {e}");
            (Config::default(), Some(e))
        }
    };

    let Some(api) = build_client(&config) else {
        return;
    };

    let store = NotificationStore::new(Arc::new(api.clone()), config.notifications.page_size);
    let (channel, events) = NotificationChannel::spawn(ChannelConfig {
        url: config.api.websocket_url.clone(),
        token: config.session.token.clone(),
        user_id: config.session.user_id,
    });
    let (notifications, commands) = mpsc::channel(32);
    let hub = NotificationHub::new(
        store,
        channel,
        events,
        commands,
        tx.clone(),
        &config.notifications,
    );
    tokio::spawn(hub.run());

    let state = Arc::new(RwLock::new(State::new(config, api)));
    let context = Arc::new(AppContext {
        state,
        tx,
        notifications,
    });
    if config_error.is_some() {
        context
            .send_toast(
                ToastKind::Warning,
                "No se pudo leer la configuración; se usan los valores por defecto.",
            )
            .await;
    }
    context.consume_bridge_messages(rx).await;
}

/// Spawn the backend runtime and begin processing bridge messages.
pub fn run(rx: Receiver<MessageToBackend>, tx: Sender<MessageFromBackend>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                log::error!("Failed to build tokio runtime: {e}");
                return;
            }
        };
        runtime.block_on(async { setup_backend(rx, tx).await });
    });
}
