use chrono::Utc;
use gpui::{
    Context, Entity, EventEmitter, IntoElement, ParentElement, Render, Styled, Window, div,
    prelude::FluentBuilder,
};
use gpui_component::{
    ActiveTheme, Disableable, IconName,
    button::{Button, ButtonVariants},
};
use seedlab_bridge::{MessageToBackend, NotificationCommand};

use crate::{
    BackendBridge,
    components::{
        notification_dropdown::{NotificationNavigation, pager},
        notification_item::NotificationItem,
    },
    entities::{DataEntities, notifications_entity::NotificationsEntity},
};

/// Full-size list of the same notifications the dropdown shows.
pub struct NotificationsPage {
    notifications: Entity<NotificationsEntity>,
}

impl NotificationsPage {
    pub fn new(data: &DataEntities, cx: &mut Context<Self>) -> Self {
        cx.observe(&data.notifications, |_, _, cx| cx.notify()).detach();

        BackendBridge::dispatch(
            cx,
            MessageToBackend::Notifications(NotificationCommand::Refresh),
        );

        Self {
            notifications: data.notifications.clone(),
        }
    }
}

impl EventEmitter<NotificationNavigation> for NotificationsPage {}

impl Render for NotificationsPage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let snapshot = self.notifications.read(cx).snapshot.clone();
        let now = Utc::now();
        let page = cx.entity().downgrade();

        let items = snapshot
            .notifications
            .iter()
            .cloned()
            .map(|notification| {
                let page = page.clone();
                NotificationItem::new(notification, now).on_view_details(move |id, _, cx| {
                    let _ = page.update(cx, |_, cx| cx.emit(NotificationNavigation::Analysis(id)));
                })
            })
            .collect::<Vec<_>>();

        div()
            .flex()
            .flex_col()
            .gap_3()
            .child(
                div()
                    .flex()
                    .items_center()
                    .justify_between()
                    .child(
                        div()
                            .text_color(cx.theme().muted_foreground)
                            .child(format!(
                                "{} sin leer de {}",
                                snapshot.unread_count, snapshot.total_elements
                            )),
                    )
                    .child(
                        div()
                            .flex()
                            .gap_2()
                            .child(
                                Button::new("notifications-refresh")
                                    .ghost()
                                    .icon(IconName::Redo)
                                    .label("Actualizar")
                                    .loading(snapshot.loading)
                                    .on_click(|_, _, cx| {
                                        BackendBridge::dispatch(
                                            cx,
                                            MessageToBackend::Notifications(
                                                NotificationCommand::Refresh,
                                            ),
                                        );
                                    }),
                            )
                            .child(
                                Button::new("notifications-mark-all")
                                    .primary()
                                    .icon(IconName::Check)
                                    .label("Marcar todas como leídas")
                                    .disabled(!snapshot.has_unread())
                                    .on_click(|_, _, cx| {
                                        BackendBridge::dispatch(
                                            cx,
                                            MessageToBackend::Notifications(
                                                NotificationCommand::MarkAllAsRead,
                                            ),
                                        );
                                    }),
                            ),
                    ),
            )
            .when_some(snapshot.error.clone(), |this, error| {
                this.child(div().text_sm().text_color(cx.theme().danger).child(error))
            })
            .child(
                div()
                    .flex()
                    .flex_col()
                    .rounded_lg()
                    .border_1()
                    .border_color(cx.theme().border)
                    .when(!snapshot.has_notifications(), |this| {
                        this.child(
                            div()
                                .p_6()
                                .text_center()
                                .text_color(cx.theme().muted_foreground)
                                .child("No tienes notificaciones"),
                        )
                    })
                    .children(items),
            )
            .child(div().flex().justify_end().child(pager("notifications-page", &snapshot, cx)))
    }
}
