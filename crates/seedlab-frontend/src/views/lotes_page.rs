use gpui::{
    AppContext, Context, Entity, IntoElement, ParentElement, Render, SharedString, Styled, Window,
    div, prelude::FluentBuilder,
};
use gpui_component::{
    ActiveTheme, IconName, Sizable, StyledExt,
    button::{Button, ButtonVariants},
    checkbox::Checkbox,
    group_box::{GroupBox, GroupBoxVariants},
    input::{Input, InputEvent, InputState},
};
use seedlab_bridge::{
    MessageToBackend,
    analysis::AnalysisKind,
    lote::{Lote, LoteFilter, LoteListItem, LoteRequest},
    page::{ActiveFilter, ListQuery},
};

use crate::{
    BackendBridge,
    components::{load_error::LoadError, settings_item::SettingsItem, table_pager::TablePager},
    entities::{
        DataEntities,
        lotes_entity::{LoteOpened, LotesEntity},
    },
    formatting::parse_decimal,
    views::form::{set_value, text_input, value_of, warn},
};

const ANALYSIS_KINDS: [AnalysisKind; 5] = [
    AnalysisKind::Germinacion,
    AnalysisKind::Tetrazolio,
    AnalysisKind::Dosn,
    AnalysisKind::Pureza,
    AnalysisKind::Pms,
];

pub(super) fn active_filter_label(filter: ActiveFilter) -> &'static str {
    match filter {
        ActiveFilter::Active => "Activos",
        ActiveFilter::Inactive => "Inactivos",
        ActiveFilter::All => "Todos",
    }
}

pub(super) const ACTIVE_FILTERS: [ActiveFilter; 3] =
    [ActiveFilter::Active, ActiveFilter::Inactive, ActiveFilter::All];

struct LoteForm {
    id: Option<i64>,
    /// Fields the form does not edit, kept from the loaded lote.
    base: Option<Lote>,
    ficha: Entity<InputState>,
    nombre: Entity<InputState>,
    kilos: Entity<InputState>,
    observaciones: Entity<InputState>,
    kinds: Vec<AnalysisKind>,
}

impl LoteForm {
    fn new(window: &mut Window, cx: &mut Context<LotesPage>) -> Self {
        Self {
            id: None,
            base: None,
            ficha: text_input("Ficha", window, cx),
            nombre: text_input("Nombre del lote", window, cx),
            kilos: text_input("Kilos limpios", window, cx),
            observaciones: text_input("Observaciones", window, cx),
            kinds: Vec::new(),
        }
    }

    fn fill(&mut self, lote: Lote, window: &mut Window, cx: &mut Context<LotesPage>) {
        set_value(&self.ficha, lote.ficha.clone(), window, cx);
        set_value(&self.nombre, lote.nom_lote.clone().unwrap_or_default(), window, cx);
        let kilos = lote
            .kilos_limpios
            .map(|kilos| kilos.to_string().replace('.', ","))
            .unwrap_or_default();
        set_value(&self.kilos, kilos, window, cx);
        set_value(
            &self.observaciones,
            lote.observaciones.clone().unwrap_or_default(),
            window,
            cx,
        );
        self.id = Some(lote.id);
        self.kinds = lote.tipos_analisis_asignados.clone();
        self.base = Some(lote);
    }

    /// Builds the request body. Trimming and the remaining checks happen in
    /// the backend.
    fn request(&self, cx: &gpui::App) -> Result<LoteRequest, &'static str> {
        let kilos_text = value_of(&self.kilos, cx);
        let kilos_limpios = if kilos_text.trim().is_empty() {
            None
        } else {
            Some(parse_decimal(&kilos_text).ok_or("Los kilos deben ser un número.")?)
        };

        Ok(LoteRequest {
            ficha: value_of(&self.ficha, cx),
            nom_lote: Some(value_of(&self.nombre, cx)),
            cultivar_id: self.base.as_ref().and_then(|lote| lote.cultivar_id),
            fecha_recibo: self.base.as_ref().and_then(|lote| lote.fecha_recibo),
            kilos_limpios,
            observaciones: Some(value_of(&self.observaciones, cx)),
            tipos_analisis_asignados: self.kinds.clone(),
        })
    }
}

pub struct LotesPage {
    lotes: Entity<LotesEntity>,
    search: Entity<InputState>,
    form: Option<LoteForm>,
    /// A save was sent; the next table reload closes the form.
    saving: bool,
}

impl LotesPage {
    pub fn new(data: &DataEntities, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let search = text_input("Buscar por ficha o nombre…", window, cx);
        cx.subscribe_in(&search, window, |this, _, event: &InputEvent, _, cx| {
            if let InputEvent::PressEnter { .. } = event {
                this.request_page(0, cx);
            }
        })
        .detach();

        cx.observe(&data.lotes, |this, _, cx| {
            if this.saving {
                this.saving = false;
                this.form = None;
            }
            cx.notify();
        })
        .detach();

        cx.subscribe_in(&data.lotes, window, |this, _, event: &LoteOpened, window, cx| {
            let mut form = LoteForm::new(window, cx);
            form.fill(event.0.clone(), window, cx);
            this.form = Some(form);
            cx.notify();
        })
        .detach();

        let mut page = Self {
            lotes: data.lotes.clone(),
            search,
            form: None,
            saving: false,
        };
        page.request_page(0, cx);
        page
    }

    fn request_page(&mut self, number: u32, cx: &mut Context<Self>) {
        let search = value_of(&self.search, cx);
        let active = self.lotes.read(cx).filter.query.active;
        self.request(
            LoteFilter {
                query: ListQuery {
                    page: number,
                    search: Some(search.trim().to_owned()).filter(|s| !s.is_empty()),
                    active,
                },
                cultivar: None,
                sort: Some("ficha,asc".to_owned()),
            },
            cx,
        );
    }

    fn request(&mut self, filter: LoteFilter, cx: &mut Context<Self>) {
        self.lotes.update(cx, |lotes, _| lotes.filter = filter.clone());
        BackendBridge::dispatch(cx, MessageToBackend::LotesListRequest(filter));
    }

    fn set_active_filter(&mut self, active: ActiveFilter, cx: &mut Context<Self>) {
        self.lotes.update(cx, |lotes, _| lotes.filter.query.active = active);
        self.request_page(0, cx);
    }

    fn submit(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(form) = &self.form else {
            return;
        };
        match form.request(cx) {
            Ok(request) => {
                self.saving = true;
                BackendBridge::dispatch(cx, MessageToBackend::SaveLote { id: form.id, request });
            }
            Err(message) => warn(message, window, cx),
        }
    }

    fn render_form(&self, form: &LoteForm, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let title = if form.id.is_some() {
            "Editar lote"
        } else {
            "Nuevo lote"
        };

        let kinds = ANALYSIS_KINDS.iter().enumerate().map(|(index, &kind)| {
            Checkbox::new(("lote-kind", index))
                .label(kind.label())
                .checked(form.kinds.contains(&kind))
                .on_click(cx.listener(move |this, checked: &bool, _, cx| {
                    if let Some(form) = &mut this.form {
                        form.kinds.retain(|k| *k != kind);
                        if *checked {
                            form.kinds.push(kind);
                        }
                    }
                    cx.notify();
                }))
        })
        .collect::<Vec<_>>();

        GroupBox::new()
            .outline()
            .child(div().child(title).text_xl().font_bold())
            .child(SettingsItem::new().label("Ficha").child(div().w_1_2().child(Input::new(&form.ficha))))
            .child(SettingsItem::new().label("Nombre").child(div().w_1_2().child(Input::new(&form.nombre))))
            .child(
                SettingsItem::new()
                    .label("Kilos limpios")
                    .child(div().w_1_2().child(Input::new(&form.kilos))),
            )
            .child(
                SettingsItem::new()
                    .label("Observaciones")
                    .child(div().w_1_2().child(Input::new(&form.observaciones))),
            )
            .child(
                SettingsItem::new()
                    .label("Análisis asignados")
                    .description("Solo se pueden quitar análisis que aún no se registraron.")
                    .child(div().flex().flex_wrap().gap_3().children(kinds)),
            )
            .child(
                div()
                    .flex()
                    .justify_end()
                    .gap_2()
                    .child(
                        Button::new("lote-cancel")
                            .ghost()
                            .label("Cancelar")
                            .on_click(cx.listener(|this, _, _, cx| {
                                this.form = None;
                                this.saving = false;
                                cx.notify();
                            })),
                    )
                    .child(
                        Button::new("lote-save")
                            .primary()
                            .label("Guardar")
                            .loading(self.saving)
                            .on_click(cx.listener(|this, _, window, cx| this.submit(window, cx))),
                    ),
            )
    }

    fn render_row(&self, lote: &LoteListItem, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let id = lote.id;
        let active = lote.activo;
        let kinds = lote
            .tipos_analisis_asignados
            .iter()
            .map(|kind| kind.label())
            .collect::<Vec<_>>()
            .join(", ");
        let cultivar = match (&lote.cultivar_nombre, &lote.especie_nombre) {
            (Some(cultivar), Some(especie)) => format!("{cultivar} ({especie})"),
            (Some(cultivar), None) => cultivar.clone(),
            (None, Some(especie)) => especie.clone(),
            (None, None) => "—".to_owned(),
        };

        div()
            .flex()
            .items_center()
            .gap_3()
            .py_2()
            .border_b_1()
            .border_color(cx.theme().border)
            .when(!active, |this| this.text_color(cx.theme().muted_foreground))
            .child(div().w_24().font_semibold().child(lote.ficha.clone()))
            .child(div().flex_1().child(lote.nom_lote.clone().unwrap_or_default()))
            .child(div().flex_1().child(cultivar))
            .child(div().flex_1().text_sm().child(kinds))
            .child(
                div()
                    .flex()
                    .gap_1()
                    .child(
                        Button::new(SharedString::from(format!("lote-{id}-edit")))
                            .ghost()
                            .small()
                            .icon(IconName::Settings)
                            .tooltip("Editar")
                            .on_click(move |_, _, cx| {
                                BackendBridge::dispatch(cx, MessageToBackend::LoteLoadRequest(id));
                            }),
                    )
                    .child(
                        Button::new(SharedString::from(format!("lote-{id}-active")))
                            .ghost()
                            .small()
                            .label(if active { "Desactivar" } else { "Reactivar" })
                            .on_click(move |_, _, cx| {
                                BackendBridge::dispatch(
                                    cx,
                                    MessageToBackend::SetLoteActive { id, active: !active },
                                );
                            }),
                    ),
            )
    }
}

impl Render for LotesPage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let lotes = self.lotes.read(cx).clone();
        let active = lotes.filter.query.active;
        let page = cx.entity().downgrade();

        let filters = ACTIVE_FILTERS.iter().map(|&filter| {
            let button = Button::new(active_filter_label(filter))
                .small()
                .label(active_filter_label(filter))
                .on_click(cx.listener(move |this, _, _, cx| this.set_active_filter(filter, cx)));
            if filter == active {
                button.primary()
            } else {
                button.ghost()
            }
        })
        .collect::<Vec<_>>();

        let body = match &lotes.load_error {
            Some(message) => LoadError::new(message.clone(), cx.listener(|this, _, _, cx| {
                this.request_page(0, cx);
            }))
            .into_any_element(),
            None => div()
                .flex()
                .flex_col()
                .children(lotes.page.content.iter().map(|lote| self.render_row(lote, cx)))
                .when(lotes.page.is_empty(), |this| {
                    this.child(
                        div()
                            .p_4()
                            .text_color(cx.theme().muted_foreground)
                            .child("No hay lotes para mostrar."),
                    )
                })
                .child(TablePager::new("lotes-pager", &lotes.page, move |number, _, cx| {
                    let _ = page.update(cx, |this, cx| this.request_page(number, cx));
                }))
                .into_any_element(),
        };

        let form = self.form.as_ref().map(|form| self.render_form(form, cx));
        div()
            .flex()
            .flex_col()
            .gap_4()
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_3()
                    .child(div().w_80().child(Input::new(&self.search)))
                    .children(filters)
                    .child(div().flex_1())
                    .child(
                        Button::new("lote-new")
                            .primary()
                            .icon(IconName::Plus)
                            .label("Nuevo lote")
                            .on_click(cx.listener(|this, _, window, cx| {
                                this.form = Some(LoteForm::new(window, cx));
                                cx.notify();
                            })),
                    ),
            )
            .children(form)
            .child(body)
    }
}
