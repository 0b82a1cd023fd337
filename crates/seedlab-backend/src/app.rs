//! Application context and message dispatching utilities.
//!
//! The context contains the shared state and provides helpers for sending
//! responses and toasts back to the frontend bridge.

use std::sync::Arc;

use seedlab_bridge::{
    MessageFromBackend, MessageToBackend, NotificationCommand, PageKind,
    notification::{ToastKind, ToastMessage},
};
use tokio::sync::mpsc::{Receiver, Sender};

use crate::{api::ApiClient, error::ServiceError, services, state::SharedState};

/// Shared application context passed to services and message handlers.
pub(crate) struct AppContext {
    /// Mutable runtime application state shared across services.
    pub state: SharedState,
    /// Outbound channel to the frontend bridge.
    pub tx: Sender<MessageFromBackend>,
    /// Inbound commands of the notification hub.
    pub notifications: Sender<NotificationCommand>,
}

impl AppContext {
    /// Read and dispatch messages from the frontend bridge until it closes.
    ///
    /// Every message is handled in its own task so a slow request does not
    /// hold up the ones behind it.
    pub async fn consume_bridge_messages(self: &Arc<Self>, mut rx: Receiver<MessageToBackend>) {
        while let Some(message) = rx.recv().await {
            log::debug!("Got a frontend message: {message:?}");
            let context = self.clone();
            tokio::spawn(async move { context.dispatch_message(message).await });
        }
        log::info!("Frontend bridge closed");
    }

    /// Dispatches the received message from frontend down to individual
    /// service handlers.
    async fn dispatch_message(self: Arc<Self>, message: MessageToBackend) {
        use services::{
            analysis_service, catalog_service, config_service, lote_service,
            notification_service, user_service,
        };

        match message {
            MessageToBackend::ConfigurationRequest => {
                config_service::handle_config_request(self).await;
            }
            MessageToBackend::SaveConfiguration(config) => {
                config_service::handle_save_configuration(self, config).await;
            }
            MessageToBackend::Notifications(command) => {
                notification_service::handle_command(self, command).await;
            }
            MessageToBackend::LotesListRequest(filter) => {
                lote_service::handle_list_request(self, filter).await;
            }
            MessageToBackend::LoteLoadRequest(id) => {
                lote_service::handle_load(self, id).await;
            }
            MessageToBackend::SaveLote { id, request } => {
                lote_service::handle_save(self, id, request).await;
            }
            MessageToBackend::SetLoteActive { id, active } => {
                lote_service::handle_set_active(self, id, active).await;
            }
            MessageToBackend::CatalogListRequest { kind, query } => {
                catalog_service::handle_list_request(self, kind, query).await;
            }
            MessageToBackend::SpeciesOptionsRequest => {
                catalog_service::handle_species_options(self).await;
            }
            MessageToBackend::SaveCatalogEntry { id, form } => {
                catalog_service::handle_save(self, id, form).await;
            }
            MessageToBackend::SetCatalogEntryActive { kind, id, active } => {
                catalog_service::handle_set_active(self, kind, id, active).await;
            }
            MessageToBackend::UsersListRequest { query, status } => {
                user_service::handle_list_request(self, query, status).await;
            }
            MessageToBackend::PendingUsersRequest => {
                user_service::handle_pending_request(self).await;
            }
            MessageToBackend::UserActionRequest { id, action } => {
                user_service::handle_action(self, id, action).await;
            }
            MessageToBackend::EligibleLotesRequest(kind) => {
                analysis_service::handle_eligible_lotes(self, kind).await;
            }
            MessageToBackend::AnalysisLoadRequest { kind, id } => {
                analysis_service::handle_load(self, kind, id).await;
            }
            MessageToBackend::AddRepetition {
                analysis_id,
                seeds_per_repetition,
                input,
            } => {
                analysis_service::handle_add_repetition(
                    self,
                    analysis_id,
                    seeds_per_repetition,
                    input,
                )
                .await;
            }
            MessageToBackend::SetExpectedRepetitions { kind, id, value } => {
                analysis_service::handle_set_expected_repetitions(self, kind, id, value).await;
            }
            MessageToBackend::SubmitPercentages { kind, id } => {
                analysis_service::handle_submit_percentages(self, kind, id).await;
            }
            MessageToBackend::AddListado { dosn_id, input } => {
                analysis_service::handle_add_listado(self, dosn_id, input).await;
            }
            MessageToBackend::FinalizeAnalysis { kind, id } => {
                analysis_service::handle_finalize(self, kind, id).await;
            }
        }
    }

    /// Send a message to the frontend bridge.
    pub async fn send(&self, message: MessageFromBackend) {
        if self.tx.send(message).await.is_err() {
            log::warn!("Frontend bridge is closed, dropping message");
        }
    }

    /// Send a toast to the frontend bridge.
    pub async fn send_toast(&self, kind: ToastKind, content: impl Into<String>) {
        self.send(MessageFromBackend::Toast(ToastMessage {
            kind,
            message: content.into(),
        }))
        .await;
    }

    /// Logs a failed operation and shows it to the user.
    pub async fn report(&self, error: &ServiceError) {
        match error {
            ServiceError::Api(e) => log::error!("Request failed: {e}"),
            other => log::warn!("Operation rejected: {other}"),
        }
        self.send_toast(error.toast_kind(), error.user_message()).await;
    }

    /// Reports a failure that left a whole page without data.
    pub async fn report_load_failure(&self, page: PageKind, error: &ServiceError) {
        self.report(error).await;
        self.send(MessageFromBackend::LoadFailed {
            page,
            message: error.user_message(),
        })
        .await;
    }

    pub async fn api(&self) -> ApiClient {
        self.state.read().await.api.clone()
    }

    /// Rows per page of the CRUD tables.
    pub async fn page_size(&self) -> u32 {
        self.state.read().await.config.listing.page_size
    }
}
