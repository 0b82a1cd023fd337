mod analysis_page;
mod catalogs_page;
mod form;
mod lotes_page;
mod notifications_page;
mod settings_page;
mod users_page;

use gpui::{
    AnyView, AppContext, Context, Entity, InteractiveElement, IntoElement, ParentElement, Render,
    StatefulInteractiveElement, Styled, Window, div,
};
use gpui_component::{
    ActiveTheme, IconName, Root, Side, StyledExt,
    sidebar::{Sidebar, SidebarGroup, SidebarHeader, SidebarMenu, SidebarMenuItem},
};

use crate::{
    components::notification_dropdown::{NotificationBell, NotificationNavigation},
    entities::DataEntities,
    views::{
        analysis_page::AnalysisPage, catalogs_page::CatalogsPage, lotes_page::LotesPage,
        notifications_page::NotificationsPage, settings_page::SettingsPage,
        users_page::UsersPage,
    },
};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PageUi {
    Lotes,
    Catalogs,
    Users,
    Analysis,
    Notifications,
    Settings,
}

impl PageUi {
    fn title(self) -> &'static str {
        match self {
            PageUi::Lotes => "Lotes",
            PageUi::Catalogs => "Catálogos",
            PageUi::Users => "Usuarios",
            PageUi::Analysis => "Análisis",
            PageUi::Notifications => "Notificaciones",
            PageUi::Settings => "Configuración",
        }
    }

    fn icon(self) -> IconName {
        match self {
            PageUi::Lotes => IconName::LayoutDashboard,
            PageUi::Catalogs => IconName::BookOpen,
            PageUi::Users => IconName::User,
            PageUi::Analysis => IconName::Frame,
            PageUi::Notifications => IconName::Inbox,
            PageUi::Settings => IconName::Settings,
        }
    }
}

const NAVIGATION: [PageUi; 6] = [
    PageUi::Lotes,
    PageUi::Catalogs,
    PageUi::Users,
    PageUi::Analysis,
    PageUi::Notifications,
    PageUi::Settings,
];

pub struct FrontendUi {
    data: DataEntities,
    bell: Entity<NotificationBell>,
    active_page: PageUi,
    active_page_view: AnyView,
}

impl FrontendUi {
    pub fn new(data: &DataEntities, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let bell = cx.new(|cx| NotificationBell::new(&data.notifications, cx));
        cx.subscribe_in(&bell, window, |this, _, event: &NotificationNavigation, window, cx| {
            this.follow(*event, window, cx);
        })
        .detach();

        let initial_view = cx.new(|cx| LotesPage::new(data, window, cx)).into();
        Self {
            data: data.clone(),
            bell,
            active_page: PageUi::Lotes,
            active_page_view: initial_view,
        }
    }

    fn follow(&mut self, to: NotificationNavigation, window: &mut Window, cx: &mut Context<Self>) {
        match to {
            NotificationNavigation::Analysis(id) => {
                self.data.analysis.update(cx, |analysis, cx| {
                    analysis.requested_id = Some(id);
                    cx.notify();
                });
                self.change_page(PageUi::Analysis, window, cx);
            }
            NotificationNavigation::AllNotifications => {
                self.change_page(PageUi::Notifications, window, cx);
            }
        }
    }

    pub fn change_page(&mut self, page: PageUi, window: &mut Window, cx: &mut Context<Self>) {
        let new_page = match page {
            PageUi::Lotes => cx.new(|cx| LotesPage::new(&self.data, window, cx)).into(),
            PageUi::Catalogs => cx.new(|cx| CatalogsPage::new(&self.data, window, cx)).into(),
            PageUi::Users => cx.new(|cx| UsersPage::new(&self.data, window, cx)).into(),
            PageUi::Analysis => cx.new(|cx| AnalysisPage::new(&self.data, window, cx)).into(),
            PageUi::Notifications => {
                let view = cx.new(|cx| NotificationsPage::new(&self.data, cx));
                cx.subscribe_in(&view, window, |this, _, event: &NotificationNavigation, window, cx| {
                    this.follow(*event, window, cx);
                })
                .detach();
                view.into()
            }
            PageUi::Settings => cx.new(|cx| SettingsPage::new(&self.data, window, cx)).into(),
        };
        self.active_page = page;
        self.active_page_view = new_page;
        cx.notify();
    }
}

impl Render for FrontendUi {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let notification_layer = Root::render_notification_layer(window, cx);
        let menu = NAVIGATION.iter().fold(SidebarMenu::new(), |menu, &page| {
            menu.child(
                SidebarMenuItem::new(page.title())
                    .active(self.active_page == page)
                    .icon(page.icon())
                    .on_click(cx.listener(move |this, _, window, cx| {
                        this.change_page(page, window, cx);
                    })),
            )
        });

        div()
            .flex()
            .size_full()
            .child(
                Sidebar::new(Side::Left)
                    .header(SidebarHeader::new().child("Laboratorio de semillas"))
                    .child(SidebarGroup::new("Navegación").child(menu)),
            )
            .child(
                div()
                    .flex()
                    .flex_col()
                    .size_full()
                    .child(
                        div()
                            .flex()
                            .items_center()
                            .justify_between()
                            .px_5()
                            .py_3()
                            .border_b_1()
                            .border_color(cx.theme().border)
                            .child(div().text_xl().font_bold().child(self.active_page.title()))
                            .child(self.bell.clone()),
                    )
                    .child(
                        div()
                            .id("page-content")
                            .p_5()
                            .size_full()
                            .overflow_y_scroll()
                            .child(self.active_page_view.clone()),
                    ),
            )
            .children(notification_layer)
    }
}
