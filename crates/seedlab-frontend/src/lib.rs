use gpui::{App, AppContext, Application, Global, WindowOptions};
use gpui_component::{
    Root, WindowExt,
    notification::{Notification, NotificationType},
};
use seedlab_bridge::{MessageFromBackend, MessageToBackend, notification::ToastKind};
use tokio::sync::mpsc;

use crate::entities::{
    DataEntities,
    analysis_entity::AnalysisEntity,
    catalog_entity::CatalogEntity,
    lotes_entity::{LotesEntity, SpeciesOptionsEntity},
    notifications_entity::NotificationsEntity,
    settings_entity::SettingsEntity,
    users_entity::UsersEntity,
};

pub mod components;
pub mod entities;
pub mod formatting;
pub mod layout;
mod views;

#[derive(Clone)]
pub struct BackendBridge {
    pub to_backend: mpsc::Sender<MessageToBackend>,
}

impl BackendBridge {
    pub async fn send(&self, message: MessageToBackend) {
        if let Err(e) = self.to_backend.send(message).await {
            log::error!("Backend is gone, dropping {:?}", e.0);
        }
    }

    pub async fn request_config(&self) {
        self.send(MessageToBackend::ConfigurationRequest).await;
    }

    /// Sends `message` without waiting for room in the channel.
    pub fn dispatch(cx: &App, message: MessageToBackend) {
        let bridge = cx.global::<BackendBridge>().clone();
        cx.background_spawn(async move { bridge.send(message).await })
            .detach();
    }
}

impl Global for BackendBridge {}

fn notification_type(kind: ToastKind) -> NotificationType {
    match kind {
        ToastKind::Info => NotificationType::Info,
        ToastKind::Success => NotificationType::Success,
        ToastKind::Warning => NotificationType::Warning,
        ToastKind::Error => NotificationType::Error,
    }
}

pub fn run(
    mut rx: mpsc::Receiver<MessageFromBackend>,
    tx: mpsc::Sender<MessageToBackend>,
) -> anyhow::Result<()> {
    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(move |cx| {
        gpui_component::init(cx);

        let data = DataEntities {
            settings: cx.new(|_| SettingsEntity::default()),
            notifications: cx.new(|_| NotificationsEntity::default()),
            lotes: cx.new(|_| LotesEntity::default()),
            species: cx.new(|_| SpeciesOptionsEntity::default()),
            catalog: cx.new(|_| CatalogEntity::default()),
            users: cx.new(|_| UsersEntity::default()),
            analysis: cx.new(|_| AnalysisEntity::default()),
        };
        let listener_data = data.clone();

        let bridge = BackendBridge {
            to_backend: tx.clone(),
        };
        cx.set_global(bridge.clone());

        cx.spawn(async move |cx| {
            cx.open_window(WindowOptions::default(), |window, cx| {
                let window_handle = window.window_handle();
                cx.spawn(async move |cx| {
                    while let Some(message) = rx.recv().await {
                        log::trace!("Got a message from backend: {message:?}");
                        let data = &listener_data;
                        match message {
                            MessageFromBackend::Toast(toast) => {
                                let pushed = window_handle.update(cx, |_, window, cx| {
                                    let notification = Notification::new()
                                        .message(toast.message)
                                        .with_type(notification_type(toast.kind));
                                    window.push_notification(notification, cx);
                                });
                                if let Err(e) = pushed {
                                    log::warn!("Failed to show a toast: {e}");
                                }
                            }
                            MessageFromBackend::LoadFailed { page, message } => {
                                data.set_load_error(page, message, cx);
                            }
                            MessageFromBackend::ConfigurationResponse(config) => {
                                SettingsEntity::update(&data.settings, config, cx);
                            }
                            MessageFromBackend::NotificationsUpdated(snapshot) => {
                                NotificationsEntity::update(&data.notifications, snapshot, cx);
                            }
                            MessageFromBackend::LotesListResponse(page) => {
                                LotesEntity::update(&data.lotes, page, cx);
                            }
                            MessageFromBackend::LoteLoaded(lote) => {
                                LotesEntity::open(&data.lotes, lote, cx);
                            }
                            MessageFromBackend::CatalogListResponse { kind, page } => {
                                CatalogEntity::update(&data.catalog, kind, page, cx);
                            }
                            MessageFromBackend::SpeciesOptionsResponse(species) => {
                                SpeciesOptionsEntity::update(&data.species, species, cx);
                            }
                            MessageFromBackend::UsersListResponse(page) => {
                                UsersEntity::update(&data.users, page, cx);
                            }
                            MessageFromBackend::PendingUsersResponse(pending) => {
                                UsersEntity::update_pending(&data.users, pending, cx);
                            }
                            MessageFromBackend::AnalysisLoaded(editor) => {
                                AnalysisEntity::update(&data.analysis, editor, cx);
                            }
                            MessageFromBackend::EligibleLotesResponse { kind, lotes } => {
                                AnalysisEntity::update_eligible(&data.analysis, kind, lotes, cx);
                            }
                            MessageFromBackend::ExpectedRepetitionsClamped { kind, id, value } => {
                                AnalysisEntity::clamp_expected(&data.analysis, kind, id, value, cx);
                            }
                        }
                    }
                    log::info!("Backend channel closed");
                })
                .detach();

                cx.spawn(async move |_| {
                    bridge.request_config().await;
                })
                .detach();

                let view = cx.new(|cx| crate::views::FrontendUi::new(&data, window, cx));
                cx.new(|cx| Root::new(view, window, cx))
            })?;

            Ok::<_, anyhow::Error>(())
        })
        .detach();
    });

    Ok(())
}
