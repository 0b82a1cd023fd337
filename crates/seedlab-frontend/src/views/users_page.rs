use gpui::{
    Context, Entity, IntoElement, ParentElement, Render, SharedString, Styled, Window, div,
    prelude::FluentBuilder,
};
use gpui_component::{
    ActiveTheme, Sizable, StyledExt,
    button::{Button, ButtonVariants},
    group_box::{GroupBox, GroupBoxVariants},
    input::{Input, InputEvent, InputState},
};
use seedlab_bridge::{
    MessageToBackend,
    page::ListQuery,
    user::{Role, User, UserAction, UserStatus},
};

use crate::{
    BackendBridge,
    components::{load_error::LoadError, table_pager::TablePager},
    entities::{DataEntities, users_entity::UsersEntity},
    views::form::{text_input, value_of},
};

const STATUS_FILTERS: [Option<UserStatus>; 5] = [
    None,
    Some(UserStatus::Activo),
    Some(UserStatus::Inactivo),
    Some(UserStatus::Pendiente),
    Some(UserStatus::Rechazado),
];

fn status_label(status: Option<UserStatus>) -> &'static str {
    match status {
        None => "Todos",
        Some(UserStatus::Activo) => "Activos",
        Some(UserStatus::Inactivo) => "Inactivos",
        Some(UserStatus::Pendiente) => "Pendientes",
        Some(UserStatus::Rechazado) => "Rechazados",
    }
}

fn user_action(cx: &mut gpui::App, id: i64, action: UserAction) {
    BackendBridge::dispatch(cx, MessageToBackend::UserActionRequest { id, action });
}

pub struct UsersPage {
    users: Entity<UsersEntity>,
    search: Entity<InputState>,
}

impl UsersPage {
    pub fn new(data: &DataEntities, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let search = text_input("Buscar por nombre o email…", window, cx);
        cx.subscribe_in(&search, window, |this, _, event: &InputEvent, _, cx| {
            if let InputEvent::PressEnter { .. } = event {
                this.request_page(0, cx);
            }
        })
        .detach();
        cx.observe(&data.users, |_, _, cx| cx.notify()).detach();

        let mut page = Self {
            users: data.users.clone(),
            search,
        };
        page.request_page(0, cx);
        BackendBridge::dispatch(cx, MessageToBackend::PendingUsersRequest);
        page
    }

    fn request_page(&mut self, number: u32, cx: &mut Context<Self>) {
        let search = value_of(&self.search, cx);
        let (query, status) = self.users.update(cx, |users, _| {
            users.query = ListQuery {
                page: number,
                search: Some(search.trim().to_owned()).filter(|s| !s.is_empty()),
                ..users.query.clone()
            };
            (users.query.clone(), users.status)
        });
        BackendBridge::dispatch(cx, MessageToBackend::UsersListRequest { query, status });
    }

    fn set_status(&mut self, status: Option<UserStatus>, cx: &mut Context<Self>) {
        self.users.update(cx, |users, _| users.status = status);
        self.request_page(0, cx);
    }

    fn render_pending(&self, user: &User, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let id = user.id;
        let approve = Role::ALL.map(|role| {
            Button::new(SharedString::from(format!("pending-{id}-{}", role.label())))
                .small()
                .outline()
                .label(format!("Aprobar como {}", role.label()))
                .on_click(move |_, _, cx| user_action(cx, id, UserAction::Approve(role)))
        });

        div()
            .flex()
            .items_center()
            .gap_3()
            .py_2()
            .border_b_1()
            .border_color(cx.theme().border)
            .child(div().flex_1().font_semibold().child(user.nombre.clone()))
            .child(div().flex_1().text_sm().child(user.email.clone()))
            .children(approve)
            .child(
                Button::new(SharedString::from(format!("pending-{id}-reject")))
                    .small()
                    .danger()
                    .label("Rechazar")
                    .on_click(move |_, _, cx| user_action(cx, id, UserAction::Reject)),
            )
    }

    fn render_row(&self, user: &User, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let id = user.id;
        let current = user.rol;
        let roles = Role::ALL.map(|role| {
            let button = Button::new(SharedString::from(format!("user-{id}-{}", role.label())))
                .xsmall()
                .label(role.label())
                .on_click(move |_, _, cx| {
                    if current != Some(role) {
                        user_action(cx, id, UserAction::ChangeRole(role));
                    }
                });
            if current == Some(role) {
                button.primary()
            } else {
                button.ghost()
            }
        });
        let toggle = match user.estado {
            UserStatus::Activo => Some(("Desactivar", UserAction::Deactivate)),
            UserStatus::Inactivo => Some(("Reactivar", UserAction::Reactivate)),
            UserStatus::Pendiente | UserStatus::Rechazado => None,
        };

        div()
            .flex()
            .items_center()
            .gap_3()
            .py_2()
            .border_b_1()
            .border_color(cx.theme().border)
            .when(user.estado != UserStatus::Activo, |this| {
                this.text_color(cx.theme().muted_foreground)
            })
            .child(div().flex_1().font_semibold().child(user.nombre.clone()))
            .child(div().flex_1().text_sm().child(user.email.clone()))
            .child(div().w_24().text_sm().child(user.estado.as_str()))
            .child(
                div()
                    .flex()
                    .gap_1()
                    .when(user.estado == UserStatus::Activo, |this| this.children(roles)),
            )
            .when_some(toggle, |this, (label, action)| {
                this.child(
                    Button::new(SharedString::from(format!("user-{id}-toggle")))
                        .small()
                        .ghost()
                        .label(label)
                        .on_click(move |_, _, cx| user_action(cx, id, action.clone())),
                )
            })
    }
}

impl Render for UsersPage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let users = self.users.read(cx).clone();
        let page = cx.entity().downgrade();

        let filters = STATUS_FILTERS
            .iter()
            .enumerate()
            .map(|(index, &status)| {
                let button = Button::new(("user-status", index))
                    .small()
                    .label(status_label(status))
                    .on_click(cx.listener(move |this, _, _, cx| this.set_status(status, cx)));
                if status == users.status {
                    button.primary()
                } else {
                    button.ghost()
                }
            })
            .collect::<Vec<_>>();

        let pending = users
            .pending
            .iter()
            .map(|user| self.render_pending(user, cx))
            .collect::<Vec<_>>();

        let body = match &users.load_error {
            Some(message) => LoadError::new(
                message.clone(),
                cx.listener(|this, _, _, cx| this.request_page(0, cx)),
            )
            .into_any_element(),
            None => div()
                .flex()
                .flex_col()
                .children(
                    users
                        .page
                        .content
                        .iter()
                        .map(|user| self.render_row(user, cx))
                        .collect::<Vec<_>>(),
                )
                .when(users.page.is_empty(), |this| {
                    this.child(
                        div()
                            .p_4()
                            .text_color(cx.theme().muted_foreground)
                            .child("No hay usuarios para mostrar."),
                    )
                })
                .child(TablePager::new("users-pager", &users.page, move |number, _, cx| {
                    let _ = page.update(cx, |this, cx| this.request_page(number, cx));
                }))
                .into_any_element(),
        };

        div()
            .flex()
            .flex_col()
            .gap_4()
            .when(!pending.is_empty(), |this| {
                this.child(
                    GroupBox::new()
                        .outline()
                        .child(
                            div()
                                .text_xl()
                                .font_bold()
                                .child(format!("Solicitudes pendientes ({})", pending.len())),
                        )
                        .children(pending),
                )
            })
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_3()
                    .child(div().w_80().child(Input::new(&self.search)))
                    .children(filters),
            )
            .child(body)
    }
}
