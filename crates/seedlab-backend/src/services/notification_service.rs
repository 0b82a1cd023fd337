use seedlab_bridge::NotificationCommand;

/// Forwards a notification command to the hub, which owns the notification
/// state.
pub async fn handle_command(context: super::AppContextHandle, command: NotificationCommand) {
    if context.notifications.send(command).await.is_err() {
        log::error!("Notification hub is not running");
    }
}
