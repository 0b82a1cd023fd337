//! The notification provider: the single writer of notification state.
//!
//! The hub consumes frontend commands and pushed events, runs the fallback
//! poller and forwards every resulting snapshot to the frontend.

use std::time::Duration;

use seedlab_bridge::{
    MessageFromBackend, NotificationCommand,
    config::NotificationsConfig,
    notification::{ConnectionStatus, NotificationSnapshot, ToastKind, ToastMessage},
};
use tokio::{
    sync::mpsc,
    time::{Instant, MissedTickBehavior},
};

use super::{
    channel::{NotificationChannel, PushEvent},
    store::{CountUpdate, NotificationStore},
};

/// Whether the fallback poller should refresh now.
pub(crate) fn should_poll(polling_enabled: bool, status: ConnectionStatus) -> bool {
    polling_enabled && !status.is_connected()
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Refresh,
    GoToPage(u32),
    MarkAsRead(i64),
    MarkAllAsRead,
    Delete(i64),
}

pub struct NotificationHub {
    store: NotificationStore,
    channel: NotificationChannel,
    events: mpsc::Receiver<PushEvent>,
    commands: mpsc::Receiver<NotificationCommand>,
    frontend: mpsc::Sender<MessageFromBackend>,
    polling_enabled: bool,
    poll_interval: Duration,
    dropdown_open: bool,
}

impl NotificationHub {
    pub fn new(
        store: NotificationStore,
        channel: NotificationChannel,
        events: mpsc::Receiver<PushEvent>,
        commands: mpsc::Receiver<NotificationCommand>,
        frontend: mpsc::Sender<MessageFromBackend>,
        config: &NotificationsConfig,
    ) -> Self {
        Self {
            store,
            channel,
            events,
            commands,
            frontend,
            polling_enabled: config.polling_enabled,
            poll_interval: Duration::from_secs(config.poll_interval_secs.max(1)),
            dropdown_open: false,
        }
    }

    /// Runs until the command sender or the frontend goes away.
    pub async fn run(mut self) {
        let mut status = self.channel.status();
        let mut connection_error = self.channel.error();
        let mut snapshots = self.store.subscribe();
        status.borrow_and_update();
        connection_error.borrow_and_update();
        snapshots.borrow_and_update();

        let mut poll = tokio::time::interval_at(
            Instant::now() + self.poll_interval,
            self.poll_interval,
        );
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.spawn(Operation::Refresh, false);
        if !self.forward().await {
            return;
        }

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => {
                        if self.handle_command(command) && !self.forward().await {
                            break;
                        }
                    }
                    None => break,
                },
                Some(event) = self.events.recv() => self.apply_event(event),
                _ = poll.tick(), if self.polling_enabled => {
                    let current = *status.borrow();
                    if should_poll(self.polling_enabled, current) {
                        log::debug!("Polling notifications while channel is {current:?}");
                        self.spawn(Operation::Refresh, false);
                    }
                },
                Ok(()) = status.changed() => {
                    let current = *status.borrow_and_update();
                    log::info!("Notification channel is now {current:?}");
                    // Events may have been missed while disconnected.
                    if current.is_connected() {
                        self.spawn(Operation::Refresh, false);
                    }
                    if !self.forward().await {
                        break;
                    }
                },
                Ok(()) = connection_error.changed() => {
                    connection_error.borrow_and_update();
                    if !self.forward().await {
                        break;
                    }
                },
                Ok(()) = snapshots.changed() => {
                    snapshots.borrow_and_update();
                    if !self.forward().await {
                        break;
                    }
                },
            }
        }
        log::debug!("Notification hub stopped");
    }

    /// Returns whether state owned by the hub itself changed.
    fn handle_command(&mut self, command: NotificationCommand) -> bool {
        log::debug!("Notification command: {command:?}");
        match command {
            NotificationCommand::Refresh => self.spawn(Operation::Refresh, true),
            NotificationCommand::GoToPage(page) => self.spawn(Operation::GoToPage(page), true),
            NotificationCommand::MarkAsRead(id) => self.spawn(Operation::MarkAsRead(id), true),
            NotificationCommand::MarkAllAsRead => self.spawn(Operation::MarkAllAsRead, true),
            NotificationCommand::Delete(id) => self.spawn(Operation::Delete(id), true),
            NotificationCommand::SetDropdownOpen(open) => {
                let opened = open && !self.dropdown_open;
                self.dropdown_open = open;
                if opened {
                    self.spawn(Operation::Refresh, false);
                }
                return true;
            }
            NotificationCommand::Reconnect => self.channel.reconnect(),
        }
        false
    }

    fn apply_event(&self, event: PushEvent) {
        log::debug!("Notification event: {event:?}");
        match event {
            PushEvent::NewNotification(notification) => self.store.add_notification(notification),
            PushEvent::UnreadCount(count) => {
                self.store.update_unread_count(CountUpdate::Value(count))
            }
            PushEvent::Read(id) => self.store.apply_read_echo(id),
            PushEvent::Deleted(id) => self.store.remove_notification(id),
        }
    }

    /// Runs the request in its own task so pushed events keep flowing while
    /// it is in flight.
    fn spawn(&self, operation: Operation, report: bool) {
        let store = self.store.clone();
        let frontend = self.frontend.clone();
        tokio::spawn(async move {
            let result = match operation {
                Operation::Refresh => store.refresh().await,
                Operation::GoToPage(page) => store.go_to_page(page).await,
                Operation::MarkAsRead(id) => store.mark_as_read(id).await,
                Operation::MarkAllAsRead => store.mark_all_as_read().await,
                Operation::Delete(id) => store.delete_notification(id).await,
            };

            let toast = match (&result, operation) {
                (Err(e), _) if report => Some(ToastMessage {
                    kind: ToastKind::Error,
                    message: e.user_message(),
                }),
                (Ok(()), Operation::MarkAllAsRead) => Some(ToastMessage {
                    kind: ToastKind::Success,
                    message: "Todas las notificaciones fueron marcadas como leídas.".to_owned(),
                }),
                _ => None,
            };
            if let Some(toast) = toast {
                if frontend.send(MessageFromBackend::Toast(toast)).await.is_err() {
                    log::debug!("Frontend closed before a notification toast");
                }
            }
        });
    }

    fn snapshot(&self) -> NotificationSnapshot {
        NotificationSnapshot {
            connection: *self.channel.status().borrow(),
            connection_error: self.channel.error().borrow().clone(),
            dropdown_open: self.dropdown_open,
            ..self.store.snapshot()
        }
    }

    /// Sends the current snapshot. Returns `false` once the frontend is gone.
    async fn forward(&self) -> bool {
        let snapshot = self.snapshot();
        self.frontend
            .send(MessageFromBackend::NotificationsUpdated(snapshot))
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, atomic::Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::notifications::store::tests::{FakeApi, notification, page_of};

    struct Harness {
        api: Arc<FakeApi>,
        commands: mpsc::Sender<NotificationCommand>,
        frontend: mpsc::Receiver<MessageFromBackend>,
        driver: crate::notifications::channel::ChannelDriver,
    }

    fn start(polling_enabled: bool, status: ConnectionStatus) -> Harness {
        let api = Arc::new(FakeApi::default());
        api.pages
            .lock()
            .unwrap()
            .insert(0, page_of(vec![notification(1, false)], 0, 1, 10));
        *api.unread.lock().unwrap() = 1;

        let store = NotificationStore::new(api.clone(), 10);
        let (channel, events, driver) = NotificationChannel::detached();
        driver.status.send_replace(status);
        let (commands, commands_rx) = mpsc::channel(8);
        let (frontend_tx, frontend) = mpsc::channel(256);
        let hub = NotificationHub::new(
            store,
            channel,
            events,
            commands_rx,
            frontend_tx,
            &NotificationsConfig {
                polling_enabled,
                poll_interval_secs: 30,
                page_size: 10,
            },
        );
        tokio::spawn(hub.run());
        Harness {
            api,
            commands,
            frontend,
            driver,
        }
    }

    fn latest_snapshot(frontend: &mut mpsc::Receiver<MessageFromBackend>) -> Option<NotificationSnapshot> {
        let mut latest = None;
        while let Ok(message) = frontend.try_recv() {
            if let MessageFromBackend::NotificationsUpdated(snapshot) = message {
                latest = Some(snapshot);
            }
        }
        latest
    }

    #[test]
    fn polling_gate() {
        assert!(should_poll(true, ConnectionStatus::Disconnected));
        assert!(should_poll(true, ConnectionStatus::Reconnecting));
        assert!(!should_poll(true, ConnectionStatus::Connected));
        assert!(!should_poll(false, ConnectionStatus::Disconnected));
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_poll_while_connected() {
        let harness = start(true, ConnectionStatus::Connected);
        tokio::time::sleep(Duration::from_secs(1)).await;
        let initial = harness.api.fetches.load(Ordering::SeqCst);
        assert_eq!(initial, 1);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(harness.api.fetches.load(Ordering::SeqCst), initial);

        harness
            .driver
            .status
            .send_replace(ConnectionStatus::Disconnected);
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(harness.api.fetches.load(Ordering::SeqCst) >= initial + 2);
    }

    #[tokio::test(start_paused = true)]
    async fn polling_can_be_disabled() {
        let harness = start(false, ConnectionStatus::Disconnected);
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(harness.api.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn opening_the_dropdown_refreshes() {
        let mut harness = start(true, ConnectionStatus::Connected);
        tokio::time::sleep(Duration::from_secs(1)).await;

        harness
            .commands
            .send(NotificationCommand::SetDropdownOpen(true))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(harness.api.fetches.load(Ordering::SeqCst), 2);
        let snapshot = latest_snapshot(&mut harness.frontend).unwrap();
        assert!(snapshot.dropdown_open);
        assert_eq!(snapshot.connection, ConnectionStatus::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn pushed_events_reach_the_frontend() {
        let mut harness = start(true, ConnectionStatus::Connected);
        tokio::time::sleep(Duration::from_secs(1)).await;

        harness
            .driver
            .events
            .send(PushEvent::NewNotification(notification(2, false)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let snapshot = latest_snapshot(&mut harness.frontend).unwrap();
        let ids: Vec<i64> = snapshot.notifications.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(snapshot.unread_count, 2);
        assert!(snapshot.has_unread());
    }

    #[tokio::test]
    async fn reconnect_command_reaches_the_channel() {
        let mut harness = start(true, ConnectionStatus::Disconnected);
        harness
            .commands
            .send(NotificationCommand::Reconnect)
            .await
            .unwrap();
        assert_eq!(harness.driver.reconnects.recv().await, Some(()));
    }
}
