use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a transient toast shown after an operation.
///
/// Toasts are fire-and-forget feedback; they are unrelated to the persisted
/// inbox [`Notification`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Neutral informational message that does not indicate success or failure.
    Info,
    /// Indicates a successful operation or positive outcome.
    Success,
    /// Indicates a non-critical issue that the user should be aware of, but
    /// does not prevent normal operation.
    Warning,
    /// Indicates an error or failure that may affect functionality.
    Error,
}

/// A toast payload intended for the user interface.
#[derive(Debug, Clone)]
pub struct ToastMessage {
    /// The type/severity of the toast, determining its visual style.
    pub kind: ToastKind,
    /// The text content to display to the user.
    pub message: String,
}

/// Classification of an inbox notification, as tagged by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum NotificationKind {
    /// A new user registered and waits for approval.
    #[serde(rename = "USUARIO_REGISTRO")]
    UserRegistration,
    #[serde(rename = "USUARIO_APROBADO")]
    UserApproved,
    #[serde(rename = "USUARIO_RECHAZADO")]
    UserRejected,
    /// An analyst finalized an analysis; it now waits for review.
    #[serde(rename = "ANALISIS_FINALIZADO")]
    AnalysisFinalized,
    #[serde(rename = "ANALISIS_APROBADO")]
    AnalysisApproved,
    /// A reviewer asked for the analysis to be repeated.
    #[serde(rename = "ANALISIS_REPETIR")]
    AnalysisRepeat,
    /// Any tag this client does not know about yet.
    #[serde(other)]
    Other,
}

/// A persisted notification addressed to the signed-in user.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub title: String,
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "tipo")]
    pub kind: NotificationKind,
    #[serde(rename = "leido", default)]
    pub read: bool,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
    /// Analysis the notification refers to, if any.
    #[serde(rename = "analisisId", default)]
    pub analysis_id: Option<i64>,
}

/// State of the WebSocket push channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
    Reconnecting,
}

impl ConnectionStatus {
    pub fn is_connected(self) -> bool {
        self == ConnectionStatus::Connected
    }
}

/// Everything the UI needs to render the notification badge, dropdown and
/// page. Published by the backend after every change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationSnapshot {
    /// Notifications of the current page, newest first.
    pub notifications: Vec<Notification>,
    /// Server-authoritative amount of unread notifications.
    pub unread_count: u64,
    /// Zero-based index of the current page.
    pub page: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub loading: bool,
    /// Message of the last failed operation, cleared by the next success.
    pub error: Option<String>,
    pub connection: ConnectionStatus,
    pub connection_error: Option<String>,
    pub dropdown_open: bool,
}

impl NotificationSnapshot {
    pub fn has_unread(&self) -> bool {
        self.unread_count > 0
    }

    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 0
    }

    pub fn has_next_page(&self) -> bool {
        self.page + 1 < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn deserializes_backend_notification() {
        let json = r#"{
            "id": 7,
            "nombre": "Análisis finalizado",
            "mensaje": "El análisis de germinación del lote L-12 fue finalizado",
            "tipo": "ANALISIS_FINALIZADO",
            "leido": false,
            "fechaCreacion": "2025-03-01T10:15:00Z",
            "analisisId": 31
        }"#;

        let notification: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(notification.id, 7);
        assert_eq!(notification.kind, NotificationKind::AnalysisFinalized);
        assert_eq!(notification.analysis_id, Some(31));
        assert!(!notification.read);
    }

    #[test]
    fn unknown_kind_falls_back_to_other() {
        let json = r#"{
            "id": 1,
            "nombre": "x",
            "mensaje": "y",
            "tipo": "ALGO_NUEVO",
            "fechaCreacion": "2025-03-01T10:15:00Z"
        }"#;

        let notification: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(notification.kind, NotificationKind::Other);
        assert_eq!(notification.analysis_id, None);
    }

    #[test]
    fn snapshot_derives_paging_flags() {
        let snapshot = NotificationSnapshot {
            page: 0,
            total_pages: 3,
            unread_count: 2,
            ..Default::default()
        };
        assert!(snapshot.has_unread());
        assert!(!snapshot.has_notifications());
        assert!(!snapshot.has_previous_page());
        assert!(snapshot.has_next_page());
    }
}
