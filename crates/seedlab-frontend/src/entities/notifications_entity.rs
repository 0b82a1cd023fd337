use gpui::{AppContext, Entity};
use seedlab_bridge::notification::NotificationSnapshot;

/// Latest notification state published by the backend.
#[derive(Debug, Clone, Default)]
pub struct NotificationsEntity {
    pub snapshot: NotificationSnapshot,
}

impl NotificationsEntity {
    pub fn update<C: AppContext>(
        entity: &Entity<Self>,
        snapshot: NotificationSnapshot,
        cx: &mut C,
    ) {
        entity.update(cx, |this, cx| {
            if this.snapshot != snapshot {
                this.snapshot = snapshot;
                cx.notify();
            }
        });
    }
}
