use std::rc::Rc;

use chrono::{DateTime, Utc};
use gpui::{App, IntoElement, ParentElement, SharedString, Styled, Window, div, prelude::FluentBuilder, px};
use gpui_component::{
    ActiveTheme, IconName, Sizable, StyledExt,
    button::{Button, ButtonVariants},
};
use seedlab_bridge::{MessageToBackend, NotificationCommand, notification::Notification};

use crate::{BackendBridge, components::notification_icon::NotificationIcon, formatting::relative_time};

type ViewDetailsHandler = Rc<dyn Fn(i64, &mut Window, &mut App)>;

/// One row of the dropdown and of the notifications page.
#[derive(IntoElement)]
pub struct NotificationItem {
    notification: Notification,
    now: DateTime<Utc>,
    on_view_details: Option<ViewDetailsHandler>,
}

impl NotificationItem {
    pub fn new(notification: Notification, now: DateTime<Utc>) -> Self {
        Self {
            notification,
            now,
            on_view_details: None,
        }
    }

    /// Shows the "view details" action. It only appears for notifications
    /// that point at an analysis.
    pub fn on_view_details(mut self, handler: impl Fn(i64, &mut Window, &mut App) + 'static) -> Self {
        self.on_view_details = Some(Rc::new(handler));
        self
    }
}

impl gpui::RenderOnce for NotificationItem {
    fn render(self, _: &mut Window, cx: &mut App) -> impl IntoElement {
        let Notification {
            id,
            title,
            message,
            kind,
            read,
            created_at,
            analysis_id,
        } = self.notification;
        let element_id = |name: &str| SharedString::from(format!("notification-{id}-{name}"));
        let details = analysis_id.zip(self.on_view_details);

        div()
            .w_full()
            .flex()
            .gap_3()
            .px_3()
            .py_2()
            .border_b_1()
            .border_color(cx.theme().border)
            .when(!read, |this| this.bg(cx.theme().accent.opacity(0.4)))
            .child(NotificationIcon::new(kind))
            .child(
                div()
                    .flex_1()
                    .min_w_0()
                    .flex()
                    .flex_col()
                    .gap_1()
                    .child(
                        div()
                            .flex()
                            .items_center()
                            .gap_2()
                            .when(!read, |this| {
                                this.child(
                                    div()
                                        .size(px(8.))
                                        .flex_none()
                                        .rounded_full()
                                        .bg(cx.theme().primary),
                                )
                            })
                            .child(div().text_sm().font_semibold().truncate().child(title)),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(cx.theme().muted_foreground)
                            .line_clamp(2)
                            .child(message),
                    )
                    .child(
                        div()
                            .text_xs()
                            .text_color(cx.theme().muted_foreground)
                            .child(relative_time(created_at, self.now)),
                    ),
            )
            .child(
                div()
                    .flex()
                    .flex_none()
                    .items_start()
                    .gap_1()
                    .when_some(details, |this, (analysis_id, handler)| {
                        this.child(
                            Button::new(element_id("details"))
                                .ghost()
                                .xsmall()
                                .icon(IconName::Eye)
                                .tooltip("Ver análisis")
                                .on_click(move |_, window, cx| handler(analysis_id, window, cx)),
                        )
                    })
                    .when(!read, |this| {
                        this.child(
                            Button::new(element_id("read"))
                                .ghost()
                                .xsmall()
                                .icon(IconName::Check)
                                .tooltip("Marcar como leída")
                                .on_click(move |_, _, cx| {
                                    BackendBridge::dispatch(
                                        cx,
                                        MessageToBackend::Notifications(
                                            NotificationCommand::MarkAsRead(id),
                                        ),
                                    );
                                }),
                        )
                    })
                    .child(
                        Button::new(element_id("delete"))
                            .ghost()
                            .xsmall()
                            .icon(IconName::Delete)
                            .tooltip("Eliminar")
                            .on_click(move |_, _, cx| {
                                BackendBridge::dispatch(
                                    cx,
                                    MessageToBackend::Notifications(NotificationCommand::Delete(id)),
                                );
                            }),
                    ),
            )
    }
}
