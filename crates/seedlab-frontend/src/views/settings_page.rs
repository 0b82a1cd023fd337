use gpui::{
    Context, Entity, IntoElement, ParentElement, Render, Styled, Window, div,
    prelude::FluentBuilder,
};
use gpui_component::{
    ActiveTheme, StyledExt,
    button::{Button, ButtonVariants},
    group_box::{GroupBox, GroupBoxVariants},
    input::{Input, InputState},
    switch::Switch,
};
use seedlab_bridge::{MessageToBackend, config::Config};

use crate::{
    BackendBridge,
    components::settings_item::SettingsItem,
    entities::{DataEntities, settings_entity::SettingsEntity},
    formatting::parse_integer,
    views::form::{set_value, text_input, value_of, warn},
};

struct ConfigInputs {
    base_url: Entity<InputState>,
    websocket_url: Entity<InputState>,
    timeout: Entity<InputState>,
    token: Entity<InputState>,
    user_id: Entity<InputState>,
    poll_interval: Entity<InputState>,
    notifications_page_size: Entity<InputState>,
    listing_page_size: Entity<InputState>,
}

pub struct SettingsPage {
    settings: Entity<SettingsEntity>,
    inputs: ConfigInputs,
    polling_enabled: bool,
    /// Whether the inputs already hold the loaded configuration.
    filled: bool,
}

impl SettingsPage {
    pub fn new(data: &DataEntities, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let inputs = ConfigInputs {
            base_url: text_input("http://localhost:8080", window, cx),
            websocket_url: text_input("ws://localhost:8080/ws/notificaciones", window, cx),
            timeout: text_input("Segundos", window, cx),
            token: text_input("Token de sesión", window, cx),
            user_id: text_input("ID de usuario", window, cx),
            poll_interval: text_input("Segundos", window, cx),
            notifications_page_size: text_input("Cantidad", window, cx),
            listing_page_size: text_input("Cantidad", window, cx),
        };

        cx.observe_in(&data.settings, window, |this, _, window, cx| {
            this.fill(window, cx);
            cx.notify();
        })
        .detach();

        let mut page = Self {
            settings: data.settings.clone(),
            inputs,
            polling_enabled: true,
            filled: false,
        };
        page.fill(window, cx);
        page
    }

    /// Copies the loaded configuration into the inputs, once.
    fn fill(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let settings = self.settings.read(cx);
        if self.filled || !settings.loaded {
            return;
        }
        let config = settings.config.clone();
        let inputs = &self.inputs;

        set_value(&inputs.base_url, config.api.base_url, window, cx);
        set_value(&inputs.websocket_url, config.api.websocket_url, window, cx);
        set_value(&inputs.timeout, config.api.request_timeout_secs.to_string(), window, cx);
        set_value(&inputs.token, config.session.token.unwrap_or_default(), window, cx);
        set_value(
            &inputs.user_id,
            config.session.user_id.map(|id| id.to_string()).unwrap_or_default(),
            window,
            cx,
        );
        set_value(
            &inputs.poll_interval,
            config.notifications.poll_interval_secs.to_string(),
            window,
            cx,
        );
        set_value(
            &inputs.notifications_page_size,
            config.notifications.page_size.to_string(),
            window,
            cx,
        );
        set_value(
            &inputs.listing_page_size,
            config.listing.page_size.to_string(),
            window,
            cx,
        );
        self.polling_enabled = config.notifications.polling_enabled;
        self.filled = true;
    }

    fn read_config(&self, cx: &Context<Self>) -> Result<Config, &'static str> {
        let inputs = &self.inputs;
        let positive = |input: &Entity<InputState>| {
            parse_integer(&value_of(input, cx)).filter(|value| *value > 0)
        };
        let mut config = self.settings.read(cx).config.clone();

        let base_url = value_of(&inputs.base_url, cx).trim().to_owned();
        let websocket_url = value_of(&inputs.websocket_url, cx).trim().to_owned();
        if !base_url.starts_with("http") {
            return Err("La URL de la API debe empezar con http:// o https://.");
        }
        if !websocket_url.starts_with("ws") {
            return Err("La URL del WebSocket debe empezar con ws:// o wss://.");
        }
        config.api.base_url = base_url;
        config.api.websocket_url = websocket_url;
        config.api.request_timeout_secs = positive(&inputs.timeout)
            .and_then(|v| u64::try_from(v).ok())
            .ok_or("El tiempo de espera debe ser un número positivo.")?;

        let token = value_of(&inputs.token, cx).trim().to_owned();
        config.session.token = Some(token).filter(|token| !token.is_empty());
        let user_id = value_of(&inputs.user_id, cx);
        config.session.user_id = if user_id.trim().is_empty() {
            None
        } else {
            Some(parse_integer(&user_id).ok_or("El ID de usuario debe ser un número.")?)
        };

        config.notifications.polling_enabled = self.polling_enabled;
        config.notifications.poll_interval_secs = positive(&inputs.poll_interval)
            .and_then(|v| u64::try_from(v).ok())
            .ok_or("El intervalo de consulta debe ser un número positivo.")?;
        config.notifications.page_size = positive(&inputs.notifications_page_size)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or("El tamaño de página debe ser un número positivo.")?;
        config.listing.page_size = positive(&inputs.listing_page_size)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or("El tamaño de página debe ser un número positivo.")?;

        Ok(config)
    }

    fn save(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        match self.read_config(cx) {
            Ok(config) => BackendBridge::dispatch(cx, MessageToBackend::SaveConfiguration(config)),
            Err(message) => warn(message, window, cx),
        }
    }
}

fn field(label: &'static str, input: &Entity<InputState>) -> SettingsItem {
    SettingsItem::new()
        .label(label)
        .child(div().w_1_2().child(Input::new(input)))
}

impl Render for SettingsPage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let inputs = &self.inputs;

        div()
            .size_full()
            .flex()
            .flex_col()
            .gap_6()
            .when(!self.filled, |this| {
                this.child(
                    div()
                        .text_color(cx.theme().muted_foreground)
                        .child("Cargando configuración…"),
                )
            })
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("Servidor").text_xl().font_bold())
                    .child(field("URL de la API", &inputs.base_url))
                    .child(field("URL del WebSocket", &inputs.websocket_url))
                    .child(field("Tiempo de espera (s)", &inputs.timeout)),
            )
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("Sesión").text_xl().font_bold())
                    .child(field("Token", &inputs.token))
                    .child(field("ID de usuario", &inputs.user_id)),
            )
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("Notificaciones").text_xl().font_bold())
                    .child(
                        SettingsItem::new()
                            .label("Consultar periódicamente sin WebSocket")
                            .description("Solo mientras la conexión en tiempo real está caída.")
                            .child(
                                Switch::new("polling_enabled")
                                    .checked(self.polling_enabled)
                                    .on_click(cx.listener(|this, checked: &bool, _, cx| {
                                        this.polling_enabled = *checked;
                                        cx.notify();
                                    })),
                            ),
                    )
                    .child(field("Intervalo de consulta (s)", &inputs.poll_interval))
                    .child(field("Notificaciones por página", &inputs.notifications_page_size)),
            )
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("Tablas").text_xl().font_bold())
                    .child(field("Filas por página", &inputs.listing_page_size)),
            )
            .child(
                div()
                    .flex()
                    .items_center()
                    .justify_between()
                    .child(
                        div()
                            .text_sm()
                            .text_color(cx.theme().muted_foreground)
                            .child("Los cambios se aplican al reiniciar la aplicación."),
                    )
                    .child(
                        Button::new("settings-save")
                            .primary()
                            .label("Guardar")
                            .on_click(cx.listener(|this, _, window, cx| this.save(window, cx))),
                    ),
            )
    }
}
