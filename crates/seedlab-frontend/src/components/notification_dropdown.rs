//! The header bell and its dropdown panel.
//!
//! Open state lives here; the backend is told about it so that opening the
//! panel refreshes the list. The panel is rendered through
//! `deferred(anchored())` and positioned with [`dropdown_position`] from the
//! bell's last painted bounds.

use chrono::Utc;
use gpui::{
    AnyElement, App, Bounds, Context, Entity, EventEmitter, FocusHandle, InteractiveElement,
    IntoElement, KeyDownEvent, MouseDownEvent, ParentElement, Pixels, Render,
    StatefulInteractiveElement, Styled, Window,
    anchored, canvas, deferred, div, point, prelude::FluentBuilder, px,
};
use gpui_component::{
    ActiveTheme, Disableable, IconName, Sizable, StyledExt,
    button::{Button, ButtonVariants},
};
use seedlab_bridge::{
    MessageToBackend, NotificationCommand,
    notification::{ConnectionStatus, NotificationSnapshot},
};

use crate::{
    BackendBridge,
    components::{notification_badge::NotificationBadge, notification_item::NotificationItem},
    entities::notifications_entity::NotificationsEntity,
    layout::{TriggerBounds, dropdown_position},
};

/// Navigation requested from a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationNavigation {
    Analysis(i64),
    AllNotifications,
}

fn command(cx: &App, command: NotificationCommand) {
    BackendBridge::dispatch(cx, MessageToBackend::Notifications(command));
}

pub struct NotificationBell {
    notifications: Entity<NotificationsEntity>,
    open: bool,
    trigger: Bounds<Pixels>,
    focus_handle: FocusHandle,
}

impl NotificationBell {
    pub fn new(notifications: &Entity<NotificationsEntity>, cx: &mut Context<Self>) -> Self {
        cx.observe(notifications, |_, _, cx| cx.notify()).detach();
        Self {
            notifications: notifications.clone(),
            open: false,
            trigger: Bounds::default(),
            focus_handle: cx.focus_handle(),
        }
    }

    fn set_open(&mut self, open: bool, window: &mut Window, cx: &mut Context<Self>) {
        if self.open == open {
            return;
        }
        self.open = open;
        if open {
            self.focus_handle.focus(window);
        }
        command(cx, NotificationCommand::SetDropdownOpen(open));
        cx.notify();
    }

    fn navigate(&mut self, to: NotificationNavigation, window: &mut Window, cx: &mut Context<Self>) {
        self.set_open(false, window, cx);
        cx.emit(to);
    }

    fn render_panel(&self, snapshot: &NotificationSnapshot, window: &mut Window, cx: &mut Context<Self>) -> AnyElement {
        let position = dropdown_position(
            TriggerBounds::from(self.trigger),
            f32::from(window.viewport_size().width),
        );
        let now = Utc::now();
        let bell = cx.entity().downgrade();

        let items = snapshot.notifications.iter().cloned().map(|notification| {
            let bell = bell.clone();
            NotificationItem::new(notification, now).on_view_details(move |id, window, cx| {
                let navigated = bell.update(cx, |this, cx| {
                    this.navigate(NotificationNavigation::Analysis(id), window, cx);
                });
                if navigated.is_err() {
                    log::debug!("Notification bell was dropped");
                }
            })
        });

        let panel = div()
            .id("notification-dropdown")
            .track_focus(&self.focus_handle)
            .w(px(position.width))
            .max_h(px(520.))
            .flex()
            .flex_col()
            .rounded_lg()
            .border_1()
            .border_color(cx.theme().border)
            .bg(cx.theme().popover)
            .shadow_lg()
            .occlude()
            .on_key_down(cx.listener(|this, event: &KeyDownEvent, window, cx| {
                if event.keystroke.key == "escape" {
                    this.set_open(false, window, cx);
                }
            }))
            .on_mouse_down_out(cx.listener(|this, event: &MouseDownEvent, window, cx| {
                if !this.trigger.contains(&event.position) {
                    this.set_open(false, window, cx);
                }
            }))
            .child(
                div()
                    .flex()
                    .items_center()
                    .justify_between()
                    .px_3()
                    .py_2()
                    .border_b_1()
                    .border_color(cx.theme().border)
                    .child(div().font_semibold().child("Notificaciones"))
                    .child(
                        Button::new("mark-all-read")
                            .ghost()
                            .small()
                            .label("Marcar todas como leídas")
                            .disabled(!snapshot.has_unread())
                            .on_click(|_, _, cx| command(cx, NotificationCommand::MarkAllAsRead)),
                    ),
            )
            .child(connection_status(snapshot, cx))
            .when_some(snapshot.error.clone(), |this, error| {
                this.child(
                    div()
                        .px_3()
                        .py_1()
                        .text_xs()
                        .text_color(cx.theme().danger)
                        .child(error),
                )
            })
            .child(
                div()
                    .id("notification-dropdown-list")
                    .flex_1()
                    .overflow_y_scroll()
                    .when(!snapshot.has_notifications(), |this| {
                        this.child(empty_state(snapshot, cx))
                    })
                    .children(items),
            )
            .child(
                div()
                    .flex()
                    .items_center()
                    .justify_between()
                    .px_3()
                    .py_2()
                    .border_t_1()
                    .border_color(cx.theme().border)
                    .child(pager("dropdown", snapshot, cx))
                    .child(
                        Button::new("view-all-notifications")
                            .link()
                            .small()
                            .label("Ver todas")
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.navigate(NotificationNavigation::AllNotifications, window, cx);
                            })),
                    ),
            );

        deferred(
            anchored()
                .position(point(px(position.left), px(position.top)))
                .snap_to_window()
                .child(panel),
        )
        .with_priority(1)
        .into_any_element()
    }
}

impl EventEmitter<NotificationNavigation> for NotificationBell {}

impl Render for NotificationBell {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let snapshot = self.notifications.read(cx).snapshot.clone();
        let bell = cx.entity().downgrade();

        div()
            .relative()
            .child(
                Button::new("notification-bell")
                    .ghost()
                    .icon(IconName::Bell)
                    .tooltip("Notificaciones")
                    .on_click(cx.listener(|this, _, window, cx| {
                        let open = !this.open;
                        this.set_open(open, window, cx);
                    })),
            )
            .child(NotificationBadge::new(snapshot.unread_count))
            .child(
                canvas(
                    move |bounds, _, cx| {
                        let _ = bell.update(cx, |this, _| this.trigger = bounds);
                    },
                    |_, _, _, _| {},
                )
                .absolute()
                .size_full(),
            )
            .when(self.open, |this| {
                this.child(self.render_panel(&snapshot, window, cx))
            })
    }
}

fn connection_status(snapshot: &NotificationSnapshot, cx: &App) -> impl IntoElement + use<> {
    let (label, color) = match snapshot.connection {
        ConnectionStatus::Connected => ("En vivo", cx.theme().success),
        ConnectionStatus::Reconnecting => ("Reconectando…", cx.theme().warning),
        ConnectionStatus::Disconnected => ("Sin conexión en tiempo real", cx.theme().muted_foreground),
    };

    div()
        .flex()
        .items_center()
        .justify_between()
        .gap_2()
        .px_3()
        .py_1()
        .text_xs()
        .text_color(cx.theme().muted_foreground)
        .child(
            div()
                .flex()
                .items_center()
                .gap_2()
                .child(div().size(px(6.)).rounded_full().bg(color))
                .child(label)
                .when_some(snapshot.connection_error.clone(), |this, error| {
                    this.child(div().truncate().child(error))
                }),
        )
        .when(snapshot.connection == ConnectionStatus::Disconnected, |this| {
            this.child(
                Button::new("notification-reconnect")
                    .outline()
                    .xsmall()
                    .icon(IconName::Redo)
                    .label("Reconectar")
                    .on_click(|_, _, cx| command(cx, NotificationCommand::Reconnect)),
            )
        })
}

fn empty_state(snapshot: &NotificationSnapshot, cx: &App) -> impl IntoElement + use<> {
    let text = if snapshot.loading {
        "Cargando notificaciones…"
    } else {
        "No tienes notificaciones"
    };
    div()
        .p_6()
        .text_sm()
        .text_center()
        .text_color(cx.theme().muted_foreground)
        .child(text)
}

/// Previous/next controls shared by the dropdown and the notifications page.
pub fn pager(id_prefix: &'static str, snapshot: &NotificationSnapshot, cx: &App) -> impl IntoElement + use<> {
    let page = snapshot.page;
    let total = snapshot.total_pages.max(1);

    div()
        .flex()
        .items_center()
        .gap_2()
        .child(
            Button::new((id_prefix, 0usize))
                .ghost()
                .xsmall()
                .icon(IconName::ChevronLeft)
                .disabled(!snapshot.has_previous_page())
                .on_click(move |_, _, cx| {
                    command(cx, NotificationCommand::GoToPage(page.saturating_sub(1)));
                }),
        )
        .child(
            div()
                .text_xs()
                .text_color(cx.theme().muted_foreground)
                .child(format!("Página {} de {total}", page + 1)),
        )
        .child(
            Button::new((id_prefix, 1usize))
                .ghost()
                .xsmall()
                .icon(IconName::ChevronRight)
                .disabled(!snapshot.has_next_page())
                .on_click(move |_, _, cx| command(cx, NotificationCommand::GoToPage(page + 1))),
        )
}
