use gpui::{Hsla, IntoElement, ParentElement, Styled, div, px};
use gpui_component::{ActiveTheme, Icon, IconName, Theme};
use seedlab_bridge::notification::NotificationKind;

pub fn kind_icon(kind: NotificationKind) -> IconName {
    match kind {
        NotificationKind::UserRegistration => IconName::User,
        NotificationKind::UserApproved | NotificationKind::AnalysisApproved => {
            IconName::CircleCheck
        }
        NotificationKind::UserRejected => IconName::CircleX,
        NotificationKind::AnalysisFinalized => IconName::Inbox,
        NotificationKind::AnalysisRepeat => IconName::TriangleAlert,
        NotificationKind::Other => IconName::Info,
    }
}

pub fn kind_color(kind: NotificationKind, theme: &Theme) -> Hsla {
    match kind {
        NotificationKind::UserRegistration | NotificationKind::AnalysisFinalized => theme.info,
        NotificationKind::UserApproved | NotificationKind::AnalysisApproved => theme.success,
        NotificationKind::UserRejected => theme.danger,
        NotificationKind::AnalysisRepeat => theme.warning,
        NotificationKind::Other => theme.muted_foreground,
    }
}

#[derive(IntoElement)]
pub struct NotificationIcon {
    kind: NotificationKind,
}

impl NotificationIcon {
    pub fn new(kind: NotificationKind) -> Self {
        Self { kind }
    }
}

impl gpui::RenderOnce for NotificationIcon {
    fn render(self, _: &mut gpui::Window, cx: &mut gpui::App) -> impl IntoElement {
        let color = kind_color(self.kind, cx.theme());
        div()
            .size(px(32.))
            .flex_none()
            .flex()
            .items_center()
            .justify_center()
            .rounded_full()
            .bg(color.opacity(0.15))
            .child(Icon::new(kind_icon(self.kind)).text_color(color))
    }
}
