//! Communication bridge between frontend and backend.
//!
//! This crate defines the types and protocols used to connect the graphical
//! administration client with the asynchronous backend that owns every
//! network connection to the laboratory API and the notification state.
//!
//! - The frontend sends commands (e.g., load a page of lotes, mark a
//!   notification as read, submit a repetition).
//! - The backend pushes events (e.g., page data, notification snapshots,
//!   toasts).
//!
//! Communication happens over bounded [`tokio::sync::mpsc`] channels wrapped
//! in [`BridgeChannels`].

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod lote;
pub mod notification;
pub mod page;
pub mod user;

use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::{
    analysis::{AnalysisEditorData, AnalysisKind, ListadoInput, RepetitionInput},
    catalog::{CatalogEntry, EntityForm, EntityKind, Species},
    lote::{Lote, LoteFilter, LoteListItem, LoteRequest, LoteSimple},
    notification::{NotificationSnapshot, ToastMessage},
    page::{ListQuery, Page},
    user::{User, UserAction, UserStatus},
};

/// Screens that load data and may fail as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Lotes,
    Catalogs,
    Users,
    Analysis,
    Notifications,
}

/// Operations on the notification provider.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationCommand {
    Refresh,
    GoToPage(u32),
    MarkAsRead(i64),
    MarkAllAsRead,
    Delete(i64),
    /// Opening the dropdown forces a refresh.
    SetDropdownOpen(bool),
    /// Manually retry the WebSocket connection.
    Reconnect,
}

/// Messages emitted by the backend to inform the frontend of state updates.
#[derive(Debug, Clone)]
pub enum MessageFromBackend {
    /// Transient feedback for the user.
    Toast(ToastMessage),
    /// A page could not be loaded at all; the view shows a retry action.
    LoadFailed { page: PageKind, message: String },
    /// Response to the configuration request from the frontend.
    ConfigurationResponse(config::Config),
    /// The notification provider state changed.
    NotificationsUpdated(NotificationSnapshot),
    LotesListResponse(Page<LoteListItem>),
    /// Full lote opened in the edit form.
    LoteLoaded(Lote),
    CatalogListResponse {
        kind: EntityKind,
        page: Page<CatalogEntry>,
    },
    /// Species offered by the cultivar form.
    SpeciesOptionsResponse(Vec<Species>),
    UsersListResponse(Page<User>),
    PendingUsersResponse(Vec<User>),
    AnalysisLoaded(AnalysisEditorData),
    /// Lotes that have the analysis kind assigned and may be worked on.
    EligibleLotesResponse {
        kind: AnalysisKind,
        lotes: Vec<LoteSimple>,
    },
    /// The requested expected-repetition count was rejected; the editor
    /// should show `value` instead.
    ExpectedRepetitionsClamped {
        kind: AnalysisKind,
        id: i64,
        value: u32,
    },
}

/// Commands issued by the frontend to control or query the backend.
#[derive(Debug, Clone)]
pub enum MessageToBackend {
    /// Request for the application configuration.
    ConfigurationRequest,
    /// Persist a new configuration. It applies on the next launch.
    SaveConfiguration(config::Config),
    Notifications(NotificationCommand),
    LotesListRequest(LoteFilter),
    LoteLoadRequest(i64),
    SaveLote {
        id: Option<i64>,
        request: LoteRequest,
    },
    /// Soft delete (`activo = false`) or reactivation of a lote.
    SetLoteActive {
        id: i64,
        active: bool,
    },
    CatalogListRequest {
        kind: EntityKind,
        query: ListQuery,
    },
    SpeciesOptionsRequest,
    SaveCatalogEntry {
        id: Option<i64>,
        form: EntityForm,
    },
    SetCatalogEntryActive {
        kind: EntityKind,
        id: i64,
        active: bool,
    },
    UsersListRequest {
        query: ListQuery,
        status: Option<UserStatus>,
    },
    PendingUsersRequest,
    UserActionRequest {
        id: i64,
        action: UserAction,
    },
    EligibleLotesRequest(AnalysisKind),
    AnalysisLoadRequest {
        kind: AnalysisKind,
        id: i64,
    },
    AddRepetition {
        analysis_id: i64,
        /// Seeds per repetition of the analysis the editor shows. The
        /// counts are checked against it before anything is requested.
        seeds_per_repetition: u32,
        input: RepetitionInput,
    },
    SetExpectedRepetitions {
        kind: AnalysisKind,
        id: i64,
        value: u32,
    },
    /// Compute rounded percentages from the recorded repetitions and submit
    /// them.
    SubmitPercentages {
        kind: AnalysisKind,
        id: i64,
    },
    AddListado {
        dosn_id: i64,
        input: ListadoInput,
    },
    FinalizeAnalysis {
        kind: AnalysisKind,
        id: i64,
    },
}

/// Paired `tokio::mpsc` channels for bidirectional communication between
/// frontend and backend.
pub struct BridgeChannels {
    /// Receiver used by the frontend to get messages from the backend.
    pub frontend_rx: Receiver<MessageFromBackend>,
    /// Sender used by the frontend to send commands to the backend.
    pub frontend_tx: Sender<MessageToBackend>,

    /// Receiver used by the backend to get commands from the frontend.
    pub backend_rx: Receiver<MessageToBackend>,
    /// Sender used by the backend to send events/responses to the frontend.
    pub backend_tx: Sender<MessageFromBackend>,
}

impl BridgeChannels {
    /// Creates a new pair of bridged channels with the given buffer capacity.
    pub fn new(buffer: usize) -> Self {
        let (to_backend_tx, to_backend_rx) = mpsc::channel(buffer);
        let (to_frontend_tx, to_frontend_rx) = mpsc::channel(buffer);
        Self {
            frontend_tx: to_backend_tx,
            frontend_rx: to_frontend_rx,
            backend_rx: to_backend_rx,
            backend_tx: to_frontend_tx,
        }
    }
}

impl Default for BridgeChannels {
    fn default() -> Self {
        Self::new(64)
    }
}
