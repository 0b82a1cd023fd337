use gpui::{IntoElement, ParentElement, Styled, div, prelude::FluentBuilder, px};
use gpui_component::ActiveTheme;

use crate::formatting::badge_label;

/// Unread counter drawn over the bell. Renders nothing at zero.
#[derive(IntoElement)]
pub struct NotificationBadge {
    unread: u64,
}

impl NotificationBadge {
    pub fn new(unread: u64) -> Self {
        Self { unread }
    }
}

impl gpui::RenderOnce for NotificationBadge {
    fn render(self, _: &mut gpui::Window, cx: &mut gpui::App) -> impl IntoElement {
        let label = badge_label(self.unread);
        div().when_some(label, |this, label| {
            this.child(
                div()
                    .absolute()
                    .top(px(-4.))
                    .right(px(-6.))
                    .min_w(px(18.))
                    .h(px(18.))
                    .px_1()
                    .flex()
                    .items_center()
                    .justify_center()
                    .rounded_full()
                    .bg(cx.theme().danger)
                    .text_color(cx.theme().danger_foreground)
                    .text_xs()
                    .child(label),
            )
        })
    }
}
