use seedlab_bridge::{MessageFromBackend, config::Config, notification::ToastKind};

/// Handles an incoming configuration request (see
/// [`seedlab_bridge::MessageToBackend::ConfigurationRequest`]).
pub async fn handle_config_request(context: super::AppContextHandle) {
    let config = {
        let state = context.state.read().await;
        state.config.clone()
    };
    context
        .send(MessageFromBackend::ConfigurationResponse(config))
        .await;
}

/// Persists a new configuration. The API client, the WebSocket channel and
/// the poller are built once at startup and keep their old settings until
/// the next launch; table page sizes apply right away.
pub async fn handle_save_configuration(context: super::AppContextHandle, config: Config) {
    if let Err(e) = crate::config::save_config(&config).await {
        log::error!("Failed to save config: {e}");
        context
            .send_toast(ToastKind::Error, "No se pudo guardar la configuración.")
            .await;
        return;
    }

    {
        let mut state = context.state.write().await;
        state.config = config.clone();
    }
    log::info!("Configuration saved");
    context
        .send_toast(
            ToastKind::Success,
            "Configuración guardada. Los cambios de conexión se aplican al reiniciar.",
        )
        .await;
    context
        .send(MessageFromBackend::ConfigurationResponse(config))
        .await;
}
