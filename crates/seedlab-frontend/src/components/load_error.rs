use std::rc::Rc;

use gpui::{App, ClickEvent, IntoElement, ParentElement, SharedString, Styled, Window, div};
use gpui_component::{ActiveTheme, IconName, StyledExt, button::Button};

/// Shown in place of a page whose data could not be loaded.
#[derive(IntoElement)]
pub struct LoadError {
    message: SharedString,
    on_retry: Rc<dyn Fn(&ClickEvent, &mut Window, &mut App)>,
}

impl LoadError {
    pub fn new(
        message: impl Into<SharedString>,
        on_retry: impl Fn(&ClickEvent, &mut Window, &mut App) + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            on_retry: Rc::new(on_retry),
        }
    }
}

impl gpui::RenderOnce for LoadError {
    fn render(self, _: &mut Window, cx: &mut App) -> impl IntoElement {
        let on_retry = self.on_retry;
        div()
            .w_full()
            .p_6()
            .flex()
            .flex_col()
            .items_center()
            .gap_3()
            .child(div().font_semibold().child("No se pudieron cargar los datos"))
            .child(
                div()
                    .text_sm()
                    .text_color(cx.theme().muted_foreground)
                    .child(self.message),
            )
            .child(
                Button::new("load-error-retry")
                    .icon(IconName::Redo)
                    .label("Reintentar")
                    .on_click(move |event, window, cx| on_retry(event, window, cx)),
            )
    }
}
