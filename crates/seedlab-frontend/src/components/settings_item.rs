use gpui::{IntoElement, ParentElement, SharedString, Styled, div, prelude::FluentBuilder};
use gpui_component::{ActiveTheme, StyledExt};

/// A labelled row of a form: label (and optional hint) on the left, the
/// control on the right.
#[derive(Default, IntoElement)]
pub struct SettingsItem {
    label: SharedString,
    description: Option<SharedString>,
    child: Option<gpui::AnyElement>,
}

impl SettingsItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<SharedString>) -> Self {
        self.label = label.into();
        self
    }

    pub fn description(mut self, description: impl Into<SharedString>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn child(mut self, child: impl IntoElement) -> Self {
        self.child = Some(child.into_any_element());
        self
    }
}

impl gpui::RenderOnce for SettingsItem {
    fn render(self, _: &mut gpui::Window, cx: &mut gpui::App) -> impl IntoElement {
        div()
            .w_full()
            .flex()
            .items_center()
            .justify_between()
            .gap_4()
            .child(
                div()
                    .flex()
                    .flex_col()
                    .child(div().child(self.label).font_semibold())
                    .when_some(self.description, |this, description| {
                        this.child(
                            div()
                                .text_sm()
                                .text_color(cx.theme().muted_foreground)
                                .child(description),
                        )
                    }),
            )
            .when_some(self.child, |this, child| this.child(child))
    }
}
