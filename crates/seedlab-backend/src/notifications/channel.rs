//! WebSocket push channel for notification events.
//!
//! The channel connects once when spawned. When the connection fails or
//! drops it reports [`ConnectionStatus::Disconnected`] together with the
//! error and waits for an explicit [`NotificationChannel::reconnect`]; the
//! hub's polling covers the gap meanwhile.

use futures_util::StreamExt;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use seedlab_bridge::notification::{ConnectionStatus, Notification};
use tokio::{
    net::TcpStream,
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream,
    tungstenite::{
        self, Message,
        client::IntoClientRequest,
        http::{HeaderValue, header::AUTHORIZATION},
    },
};

use crate::api::notifications::parse_count;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Where to connect and as whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub url: String,
    pub token: Option<String>,
    pub user_id: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("no session token or user id configured")]
    MissingCredentials,
    #[error("invalid websocket url: {0}")]
    InvalidUrl(String),
    #[error("token is not a valid header value")]
    InvalidToken,
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    #[error("connection closed by the server")]
    Closed,
}

impl ChannelError {
    pub fn user_message(&self) -> String {
        match self {
            ChannelError::MissingCredentials => {
                "Inicie sesión para recibir notificaciones en tiempo real.".to_owned()
            }
            ChannelError::InvalidUrl(_) | ChannelError::InvalidToken => {
                "La configuración del canal de notificaciones no es válida.".to_owned()
            }
            ChannelError::WebSocket(_) => {
                "No se pudo conectar al servidor de notificaciones.".to_owned()
            }
            ChannelError::Closed => "Se perdió la conexión con el servidor de notificaciones.".to_owned(),
        }
    }
}

/// An event pushed by the server.
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    NewNotification(Notification),
    UnreadCount(u64),
    Read(i64),
    Deleted(i64),
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unknown event kind {0}")]
    UnknownKind(String),
    #[error("unexpected payload for {kind}: {payload}")]
    Payload { kind: &'static str, payload: Value },
}

#[derive(Debug, Deserialize)]
struct Frame {
    tipo: String,
    #[serde(default)]
    data: Value,
}

fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.parse().ok(),
        Value::Object(map) => ["id", "notificacionId"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_i64)),
        _ => None,
    }
}

impl PushEvent {
    /// Parses a text frame of the shape `{ "tipo": ..., "data": ... }`.
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let frame: Frame = serde_json::from_str(text)?;
        match frame.tipo.as_str() {
            "NUEVA_NOTIFICACION" => Ok(PushEvent::NewNotification(serde_json::from_value(
                frame.data,
            )?)),
            "CONTADOR_NO_LEIDAS" => parse_count(&frame.data)
                .map(PushEvent::UnreadCount)
                .ok_or(FrameError::Payload {
                    kind: "CONTADOR_NO_LEIDAS",
                    payload: frame.data,
                }),
            "NOTIFICACION_LEIDA" => parse_id(&frame.data)
                .map(PushEvent::Read)
                .ok_or(FrameError::Payload {
                    kind: "NOTIFICACION_LEIDA",
                    payload: frame.data,
                }),
            "NOTIFICACION_ELIMINADA" => parse_id(&frame.data)
                .map(PushEvent::Deleted)
                .ok_or(FrameError::Payload {
                    kind: "NOTIFICACION_ELIMINADA",
                    payload: frame.data,
                }),
            _ => Err(FrameError::UnknownKind(frame.tipo)),
        }
    }
}

/// Handle to the background task owning the WebSocket connection. Dropping
/// it stops the task.
pub struct NotificationChannel {
    status: watch::Receiver<ConnectionStatus>,
    error: watch::Receiver<Option<String>>,
    reconnect: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl NotificationChannel {
    /// Starts connecting in the background. Must be called within a tokio
    /// runtime. Parsed events arrive on the returned receiver.
    pub fn spawn(config: ChannelConfig) -> (Self, mpsc::Receiver<PushEvent>) {
        let (status_tx, status) = watch::channel(ConnectionStatus::Disconnected);
        let (error_tx, error) = watch::channel(None);
        let (reconnect, reconnect_rx) = mpsc::channel(1);
        let (events_tx, events_rx) = mpsc::channel(64);

        let task = tokio::spawn(run(config, status_tx, error_tx, events_tx, reconnect_rx));
        (
            Self {
                status,
                error,
                reconnect,
                task,
            },
            events_rx,
        )
    }

    pub fn status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.clone()
    }

    /// Message of the last connection failure, `None` while healthy.
    pub fn error(&self) -> watch::Receiver<Option<String>> {
        self.error.clone()
    }

    /// Asks the task to connect again. When connected, the current
    /// connection is closed and reopened.
    pub fn reconnect(&self) {
        if self.reconnect.try_send(()).is_err() {
            log::debug!("Reconnect already pending");
        }
    }
}

impl Drop for NotificationChannel {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The task side of a channel, driven by hand in tests.
#[cfg(test)]
pub(crate) struct ChannelDriver {
    pub status: watch::Sender<ConnectionStatus>,
    pub error: watch::Sender<Option<String>>,
    pub events: mpsc::Sender<PushEvent>,
    pub reconnects: mpsc::Receiver<()>,
}

#[cfg(test)]
impl NotificationChannel {
    pub(crate) fn detached() -> (Self, mpsc::Receiver<PushEvent>, ChannelDriver) {
        let (status_tx, status) = watch::channel(ConnectionStatus::Disconnected);
        let (error_tx, error) = watch::channel(None);
        let (reconnect, reconnects) = mpsc::channel(1);
        let (events_tx, events_rx) = mpsc::channel(64);
        let channel = Self {
            status,
            error,
            reconnect,
            task: tokio::spawn(async {}),
        };
        let driver = ChannelDriver {
            status: status_tx,
            error: error_tx,
            events: events_tx,
            reconnects,
        };
        (channel, events_rx, driver)
    }
}

fn build_request(
    config: &ChannelConfig,
) -> Result<tungstenite::handshake::client::Request, ChannelError> {
    let (Some(token), Some(user_id)) = (config.token.as_deref(), config.user_id) else {
        return Err(ChannelError::MissingCredentials);
    };

    let mut url = Url::parse(&config.url).map_err(|e| ChannelError::InvalidUrl(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("token", token)
        .append_pair("userId", &user_id.to_string());

    let mut request = url.as_str().into_client_request()?;
    let bearer =
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| ChannelError::InvalidToken)?;
    request.headers_mut().insert(AUTHORIZATION, bearer);
    Ok(request)
}

async fn connect(config: &ChannelConfig) -> Result<Socket, ChannelError> {
    let request = build_request(config)?;
    let (socket, _) = tokio_tungstenite::connect_async(request).await?;
    Ok(socket)
}

enum Disconnect {
    Failed(ChannelError),
    Restart,
    Shutdown,
}

async fn read_frames(
    socket: &mut Socket,
    events: &mpsc::Sender<PushEvent>,
    reconnect: &mut mpsc::Receiver<()>,
) -> Disconnect {
    loop {
        tokio::select! {
            frame = socket.next() => match frame {
                Some(Ok(Message::Text(text))) => match PushEvent::parse(&text) {
                    Ok(event) => {
                        if events.send(event).await.is_err() {
                            return Disconnect::Shutdown;
                        }
                    }
                    Err(e) => log::warn!("Skipping notification frame: {e}"),
                },
                Some(Ok(Message::Close(_))) | None => return Disconnect::Failed(ChannelError::Closed),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Disconnect::Failed(e.into()),
            },
            request = reconnect.recv() => {
                return match request {
                    Some(()) => Disconnect::Restart,
                    None => Disconnect::Shutdown,
                };
            }
        }
    }
}

async fn run(
    config: ChannelConfig,
    status: watch::Sender<ConnectionStatus>,
    error: watch::Sender<Option<String>>,
    events: mpsc::Sender<PushEvent>,
    mut reconnect: mpsc::Receiver<()>,
) {
    loop {
        status.send_replace(ConnectionStatus::Reconnecting);
        match connect(&config).await {
            Ok(mut socket) => {
                log::info!("Notification channel connected to {}", config.url);
                status.send_replace(ConnectionStatus::Connected);
                error.send_replace(None);

                match read_frames(&mut socket, &events, &mut reconnect).await {
                    Disconnect::Failed(e) => {
                        log::warn!("Notification channel dropped: {e}");
                        error.send_replace(Some(e.user_message()));
                    }
                    Disconnect::Restart => {
                        if let Err(e) = socket.close(None).await {
                            log::debug!("Closing notification channel failed: {e}");
                        }
                        continue;
                    }
                    Disconnect::Shutdown => {
                        status.send_replace(ConnectionStatus::Disconnected);
                        return;
                    }
                }
            }
            Err(e) => {
                log::warn!("Notification channel could not connect: {e}");
                error.send_replace(Some(e.user_message()));
            }
        }

        status.send_replace(ConnectionStatus::Disconnected);
        if reconnect.recv().await.is_none() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use seedlab_bridge::notification::NotificationKind;
    use tokio::{net::TcpListener, sync::oneshot};
    use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};

    use super::*;

    #[test]
    fn parses_every_event_kind() {
        let frame = r#"{"tipo":"NUEVA_NOTIFICACION","data":{"id":3,"nombre":"Nuevo usuario","mensaje":"Ana se registró","tipo":"USUARIO_REGISTRO","leido":false,"fechaCreacion":"2025-03-01T10:15:00Z"}}"#;
        match PushEvent::parse(frame).unwrap() {
            PushEvent::NewNotification(notification) => {
                assert_eq!(notification.id, 3);
                assert_eq!(notification.kind, NotificationKind::UserRegistration);
            }
            other => panic!("unexpected event {other:?}"),
        }

        assert_eq!(
            PushEvent::parse(r#"{"tipo":"CONTADOR_NO_LEIDAS","data":5}"#).unwrap(),
            PushEvent::UnreadCount(5)
        );
        assert_eq!(
            PushEvent::parse(r#"{"tipo":"NOTIFICACION_LEIDA","data":9}"#).unwrap(),
            PushEvent::Read(9)
        );
        assert_eq!(
            PushEvent::parse(r#"{"tipo":"NOTIFICACION_ELIMINADA","data":{"id":4}}"#).unwrap(),
            PushEvent::Deleted(4)
        );
    }

    #[test]
    fn rejects_unknown_and_malformed_frames() {
        assert!(matches!(
            PushEvent::parse(r#"{"tipo":"PING","data":null}"#),
            Err(FrameError::UnknownKind(kind)) if kind == "PING"
        ));
        assert!(matches!(
            PushEvent::parse("not json"),
            Err(FrameError::Malformed(_))
        ));
        assert!(matches!(
            PushEvent::parse(r#"{"tipo":"NOTIFICACION_LEIDA","data":[]}"#),
            Err(FrameError::Payload { .. })
        ));
    }

    #[test]
    fn request_carries_credentials() {
        let request = build_request(&ChannelConfig {
            url: "ws://localhost:8080/ws/notificaciones".to_owned(),
            token: Some("abc".to_owned()),
            user_id: Some(12),
        })
        .unwrap();
        assert_eq!(request.uri().query(), Some("token=abc&userId=12"));
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer abc");
    }

    #[tokio::test]
    async fn missing_credentials_stay_disconnected() {
        let (channel, _events) = NotificationChannel::spawn(ChannelConfig {
            url: "ws://127.0.0.1:9".to_owned(),
            token: None,
            user_id: Some(1),
        });
        let mut error = channel.error();
        error.wait_for(Option::is_some).await.unwrap();
        assert_eq!(*channel.status().borrow(), ConnectionStatus::Disconnected);
    }

    /// Accepts one connection, reports the request query, sends `frames`
    /// and closes.
    async fn serve_once(listener: &TcpListener, frames: Vec<&'static str>) -> Option<String> {
        let (stream, _) = listener.accept().await.unwrap();
        let (query_tx, query_rx) = oneshot::channel();
        let mut socket = tokio_tungstenite::accept_hdr_async(stream, |request: &Request, response: Response| {
            let _ = query_tx.send(request.uri().query().map(str::to_owned));
            Ok(response)
        })
        .await
        .unwrap();
        for frame in frames {
            futures_util::SinkExt::send(&mut socket, Message::text(frame)).await.unwrap();
        }
        socket.close(None).await.unwrap();
        query_rx.await.unwrap()
    }

    #[tokio::test]
    async fn forwards_events_and_waits_for_manual_reconnect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let (channel, mut events) = NotificationChannel::spawn(ChannelConfig {
            url: format!("ws://{address}/ws/notificaciones"),
            token: Some("secreto".to_owned()),
            user_id: Some(7),
        });

        let query = serve_once(
            &listener,
            vec![
                r#"{"tipo":"CONTADOR_NO_LEIDAS","data":3}"#,
                r#"{"tipo":"DESCONOCIDO","data":1}"#,
                r#"{"tipo":"NOTIFICACION_LEIDA","data":8}"#,
            ],
        )
        .await;
        assert_eq!(query.as_deref(), Some("token=secreto&userId=7"));

        assert_eq!(events.recv().await, Some(PushEvent::UnreadCount(3)));
        assert_eq!(events.recv().await, Some(PushEvent::Read(8)));

        let mut status = channel.status();
        status
            .wait_for(|status| *status == ConnectionStatus::Disconnected)
            .await
            .unwrap();
        assert!(channel.error().borrow().is_some());

        // Nothing reconnects on its own.
        let idle = tokio::time::timeout(Duration::from_millis(200), listener.accept()).await;
        assert!(idle.is_err());

        channel.reconnect();
        let serving = serve_once(&listener, vec![r#"{"tipo":"NOTIFICACION_ELIMINADA","data":2}"#]);
        let (_, event) = tokio::join!(serving, events.recv());
        assert_eq!(event, Some(PushEvent::Deleted(2)));
    }
}
