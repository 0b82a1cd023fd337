use std::rc::Rc;

use gpui::{App, IntoElement, ParentElement, Styled, Window, div};
use gpui_component::{
    ActiveTheme, Disableable, IconName, Sizable,
    button::{Button, ButtonVariants},
};
use seedlab_bridge::page::Page;

type PageHandler = Rc<dyn Fn(u32, &mut Window, &mut App)>;

/// Previous/next controls under a CRUD table.
#[derive(IntoElement)]
pub struct TablePager {
    id: &'static str,
    number: u32,
    total_pages: u32,
    total_elements: u64,
    on_change: PageHandler,
}

impl TablePager {
    pub fn new<T>(
        id: &'static str,
        page: &Page<T>,
        on_change: impl Fn(u32, &mut Window, &mut App) + 'static,
    ) -> Self {
        Self {
            id,
            number: page.number,
            total_pages: page.total_pages,
            total_elements: page.total_elements,
            on_change: Rc::new(on_change),
        }
    }
}

impl gpui::RenderOnce for TablePager {
    fn render(self, _: &mut Window, cx: &mut App) -> impl IntoElement {
        let number = self.number;
        let previous = self.on_change.clone();
        let next = self.on_change;

        div()
            .flex()
            .items_center()
            .justify_between()
            .pt_3()
            .text_sm()
            .text_color(cx.theme().muted_foreground)
            .child(format!("{} registros", self.total_elements))
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_2()
                    .child(
                        Button::new((self.id, 0usize))
                            .ghost()
                            .small()
                            .icon(IconName::ChevronLeft)
                            .disabled(number == 0)
                            .on_click(move |_, window, cx| previous(number.saturating_sub(1), window, cx)),
                    )
                    .child(format!("Página {} de {}", number + 1, self.total_pages.max(1)))
                    .child(
                        Button::new((self.id, 1usize))
                            .ghost()
                            .small()
                            .icon(IconName::ChevronRight)
                            .disabled(number + 1 >= self.total_pages)
                            .on_click(move |_, window, cx| next(number + 1, window, cx)),
                    ),
            )
    }
}
