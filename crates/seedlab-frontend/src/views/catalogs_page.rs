//! One page for every catalog-like table. The selected [`EntityKind`]
//! decides the columns, the form fields and which request body is built.

use gpui::{
    AppContext, Context, Entity, IntoElement, ParentElement, Render, SharedString,
    Styled, Window, div, prelude::FluentBuilder,
};
use gpui_component::{
    ActiveTheme, IconName, IndexPath, Sizable, StyledExt,
    button::{Button, ButtonVariants},
    group_box::{GroupBox, GroupBoxVariants},
    input::{Input, InputEvent, InputState},
    select::{Select, SelectItem, SelectState},
};
use seedlab_bridge::{
    MessageToBackend,
    catalog::{CatalogEntry, CatalogType, EntityForm, EntityKind, Species},
    page::{ActiveFilter, ListQuery},
};

use crate::{
    BackendBridge,
    components::{load_error::LoadError, settings_item::SettingsItem, table_pager::TablePager},
    entities::{
        DataEntities,
        catalog_entity::CatalogEntity,
        lotes_entity::SpeciesOptionsEntity,
    },
    views::{
        form::{set_value, text_input, value_of},
        lotes_page::{ACTIVE_FILTERS, active_filter_label},
    },
};

fn entity_kinds() -> impl Iterator<Item = EntityKind> {
    CatalogType::ALL
        .into_iter()
        .map(EntityKind::Lookup)
        .chain([EntityKind::Species, EntityKind::Cultivar, EntityKind::Weed])
}

/// Labels of the two text fields of the form, the second one optional.
fn field_labels(kind: EntityKind) -> (&'static str, Option<&'static str>) {
    match kind {
        EntityKind::Lookup(_) => ("Valor", None),
        EntityKind::Species | EntityKind::Weed => ("Nombre común", Some("Nombre científico")),
        EntityKind::Cultivar => ("Nombre", Some("Descripción")),
    }
}

/// Builds the form payload for `kind` from the raw field values.
fn entity_form(
    kind: EntityKind,
    primary: String,
    secondary: String,
    especie_id: Option<i64>,
) -> EntityForm {
    match kind {
        EntityKind::Lookup(tipo) => EntityForm::Lookup {
            tipo,
            valor: primary,
        },
        EntityKind::Species => EntityForm::Species {
            nombre_comun: primary,
            nombre_cientifico: secondary,
        },
        EntityKind::Cultivar => EntityForm::Cultivar {
            especie_id,
            nombre: primary,
            descripcion: secondary,
        },
        EntityKind::Weed => EntityForm::Weed {
            nombre_comun: primary,
            nombre_cientifico: secondary,
        },
    }
}

/// Field values of an existing row, in the order of [`field_labels`].
fn entry_fields(entry: &CatalogEntry) -> (String, String, Option<i64>) {
    match entry {
        CatalogEntry::Lookup(item) => (item.valor.clone(), String::new(), None),
        CatalogEntry::Species(species) => (
            species.nombre_comun.clone(),
            species.nombre_cientifico.clone().unwrap_or_default(),
            None,
        ),
        CatalogEntry::Cultivar(cultivar) => (
            cultivar.nombre.clone(),
            cultivar.descripcion.clone().unwrap_or_default(),
            Some(cultivar.especie_id),
        ),
        CatalogEntry::Weed(weed) => (
            weed.nombre_comun.clone(),
            weed.nombre_cientifico.clone().unwrap_or_default(),
            None,
        ),
    }
}

#[derive(Debug, Clone)]
struct SpeciesOption {
    id: i64,
    name: SharedString,
}

impl SelectItem for SpeciesOption {
    type Value = i64;

    fn title(&self) -> SharedString {
        self.name.clone()
    }

    fn value(&self) -> &Self::Value {
        &self.id
    }
}

fn species_options(species: &[Species]) -> Vec<SpeciesOption> {
    species
        .iter()
        .filter(|species| species.activo)
        .map(|species| SpeciesOption {
            id: species.id,
            name: species.nombre_comun.clone().into(),
        })
        .collect()
}

struct CatalogForm {
    id: Option<i64>,
    primary: Entity<InputState>,
    secondary: Entity<InputState>,
}

pub struct CatalogsPage {
    catalog: Entity<CatalogEntity>,
    species: Entity<SpeciesOptionsEntity>,
    search: Entity<InputState>,
    species_select: Entity<SelectState<Vec<SpeciesOption>>>,
    form: Option<CatalogForm>,
}

impl CatalogsPage {
    pub fn new(data: &DataEntities, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let search = text_input("Buscar…", window, cx);
        cx.subscribe_in(&search, window, |this, _, event: &InputEvent, _, cx| {
            if let InputEvent::PressEnter { .. } = event {
                this.request_page(0, cx);
            }
        })
        .detach();

        let species_select = cx.new(|cx| {
            let options = species_options(&data.species.read(cx).species);
            SelectState::new(options, None, window, cx)
        });

        cx.observe_in(&data.species, window, |this, species, window, cx| {
            let options = species_options(&species.read(cx).species);
            this.species_select.update(cx, |state, cx| {
                state.set_items(options, window, cx);
            });
        })
        .detach();
        cx.observe(&data.catalog, |_, _, cx| cx.notify()).detach();

        let mut page = Self {
            catalog: data.catalog.clone(),
            species: data.species.clone(),
            search,
            species_select,
            form: None,
        };
        BackendBridge::dispatch(cx, MessageToBackend::SpeciesOptionsRequest);
        page.request_page(0, cx);
        page
    }

    fn request_page(&mut self, number: u32, cx: &mut Context<Self>) {
        let search = value_of(&self.search, cx);
        let (kind, query) = self.catalog.update(cx, |catalog, _| {
            catalog.query.page = number;
            catalog.query.search = Some(search.trim().to_owned()).filter(|s| !s.is_empty());
            (catalog.kind, catalog.query.clone())
        });
        BackendBridge::dispatch(cx, MessageToBackend::CatalogListRequest { kind, query });
    }

    fn select_kind(&mut self, kind: EntityKind, window: &mut Window, cx: &mut Context<Self>) {
        self.catalog.update(cx, |catalog, cx| {
            catalog.kind = kind;
            catalog.query = ListQuery {
                active: catalog.query.active,
                ..Default::default()
            };
            catalog.page = Default::default();
            catalog.load_error = None;
            cx.notify();
        });
        self.form = None;
        set_value(&self.search, "", window, cx);
        self.request_page(0, cx);
    }

    fn set_active_filter(&mut self, active: ActiveFilter, cx: &mut Context<Self>) {
        self.catalog
            .update(cx, |catalog, _| catalog.query.active = active);
        self.request_page(0, cx);
    }

    fn open_form(&mut self, entry: Option<&CatalogEntry>, window: &mut Window, cx: &mut Context<Self>) {
        let kind = self.catalog.read(cx).kind;
        let (primary_label, secondary_label) = field_labels(kind);
        let form = CatalogForm {
            id: entry.map(CatalogEntry::id),
            primary: text_input(primary_label, window, cx),
            secondary: text_input(secondary_label.unwrap_or_default(), window, cx),
        };

        let especie_id = match entry {
            Some(entry) => {
                let (primary, secondary, especie_id) = entry_fields(entry);
                set_value(&form.primary, primary, window, cx);
                set_value(&form.secondary, secondary, window, cx);
                especie_id
            }
            None => None,
        };
        let index = especie_id.and_then(|id| {
            species_options(&self.species.read(cx).species)
                .iter()
                .position(|option| option.id == id)
        });
        self.species_select.update(cx, |state, cx| {
            state.set_selected_index(index.map(IndexPath::new), window, cx);
        });

        self.form = Some(form);
        cx.notify();
    }

    fn submit(&mut self, cx: &mut Context<Self>) {
        let Some(form) = &self.form else {
            return;
        };
        let kind = self.catalog.read(cx).kind;
        let especie_id = self.species_select.read(cx).selected_value().copied();
        let payload = entity_form(
            kind,
            value_of(&form.primary, cx),
            value_of(&form.secondary, cx),
            especie_id,
        );
        BackendBridge::dispatch(
            cx,
            MessageToBackend::SaveCatalogEntry {
                id: form.id,
                form: payload,
            },
        );
    }

    fn render_form(&self, form: &CatalogForm, kind: EntityKind, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let (primary_label, secondary_label) = field_labels(kind);
        let title = match form.id {
            Some(_) => format!("Editar: {}", kind.label()),
            None => format!("Nuevo: {}", kind.label()),
        };

        GroupBox::new()
            .outline()
            .child(div().child(title).text_xl().font_bold())
            .when(kind == EntityKind::Cultivar, |this| {
                this.child(
                    SettingsItem::new().label("Especie").child(
                        div()
                            .w_1_2()
                            .child(Select::new(&self.species_select).placeholder("Elegir especie…")),
                    ),
                )
            })
            .child(
                SettingsItem::new()
                    .label(primary_label)
                    .child(div().w_1_2().child(Input::new(&form.primary))),
            )
            .when_some(secondary_label, |this, label| {
                this.child(
                    SettingsItem::new()
                        .label(label)
                        .child(div().w_1_2().child(Input::new(&form.secondary))),
                )
            })
            .child(
                div()
                    .flex()
                    .justify_end()
                    .gap_2()
                    .child(
                        Button::new("catalog-close")
                            .ghost()
                            .label("Cerrar")
                            .on_click(cx.listener(|this, _, _, cx| {
                                this.form = None;
                                cx.notify();
                            })),
                    )
                    .child(
                        Button::new("catalog-save")
                            .primary()
                            .label("Guardar")
                            .on_click(cx.listener(|this, _, _, cx| this.submit(cx))),
                    ),
            )
    }

    fn render_row(&self, entry: &CatalogEntry, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let id = entry.id();
        let active = entry.active();
        let kind = self.catalog.read(cx).kind;
        let edited = entry.clone();

        div()
            .flex()
            .items_center()
            .gap_3()
            .py_2()
            .border_b_1()
            .border_color(cx.theme().border)
            .when(!active, |this| this.text_color(cx.theme().muted_foreground))
            .child(div().flex_1().font_semibold().child(entry.display_name()))
            .child(
                div()
                    .flex_1()
                    .text_sm()
                    .child(entry.secondary_text().unwrap_or_default()),
            )
            .child(div().w_20().text_sm().child(if active { "Activo" } else { "Inactivo" }))
            .child(
                div()
                    .flex()
                    .gap_1()
                    .child(
                        Button::new(SharedString::from(format!("catalog-{id}-edit")))
                            .ghost()
                            .small()
                            .icon(IconName::Settings)
                            .tooltip("Editar")
                            .on_click(cx.listener(move |this, _, window, cx| {
                                this.open_form(Some(&edited), window, cx);
                            })),
                    )
                    .child(
                        Button::new(SharedString::from(format!("catalog-{id}-active")))
                            .ghost()
                            .small()
                            .label(if active { "Desactivar" } else { "Reactivar" })
                            .on_click(move |_, _, cx| {
                                BackendBridge::dispatch(
                                    cx,
                                    MessageToBackend::SetCatalogEntryActive {
                                        kind,
                                        id,
                                        active: !active,
                                    },
                                );
                            }),
                    ),
            )
    }
}

impl Render for CatalogsPage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let catalog = self.catalog.read(cx).clone();
        let page = cx.entity().downgrade();

        let tabs = entity_kinds()
            .map(|kind| {
                let button = Button::new(SharedString::from(format!("catalog-kind-{}", kind.label())))
                    .small()
                    .label(kind.label())
                    .on_click(cx.listener(move |this, _, window, cx| this.select_kind(kind, window, cx)));
                if kind == catalog.kind {
                    button.primary()
                } else {
                    button.ghost()
                }
            })
            .collect::<Vec<_>>();

        let filters = ACTIVE_FILTERS
            .iter()
            .map(|&filter| {
                let button = Button::new(SharedString::from(format!("catalog-filter-{}", active_filter_label(filter))))
                    .small()
                    .label(active_filter_label(filter))
                    .on_click(cx.listener(move |this, _, _, cx| this.set_active_filter(filter, cx)));
                if filter == catalog.query.active {
                    button.primary()
                } else {
                    button.ghost()
                }
            })
            .collect::<Vec<_>>();

        let body = match &catalog.load_error {
            Some(message) => LoadError::new(
                message.clone(),
                cx.listener(|this, _, _, cx| this.request_page(0, cx)),
            )
            .into_any_element(),
            None => div()
                .flex()
                .flex_col()
                .children(
                    catalog
                        .page
                        .content
                        .iter()
                        .map(|entry| self.render_row(entry, cx))
                        .collect::<Vec<_>>(),
                )
                .when(catalog.page.is_empty(), |this| {
                    this.child(
                        div()
                            .p_4()
                            .text_color(cx.theme().muted_foreground)
                            .child("No hay registros para mostrar."),
                    )
                })
                .child(TablePager::new("catalog-pager", &catalog.page, move |number, _, cx| {
                    let _ = page.update(cx, |this, cx| this.request_page(number, cx));
                }))
                .into_any_element(),
        };

        let form = self
            .form
            .as_ref()
            .map(|form| self.render_form(form, catalog.kind, cx));

        div()
            .flex()
            .flex_col()
            .gap_4()
            .child(div().flex().flex_wrap().gap_2().children(tabs))
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_3()
                    .child(div().w_80().child(Input::new(&self.search)))
                    .children(filters)
                    .child(div().flex_1())
                    .child(
                        Button::new("catalog-new")
                            .primary()
                            .icon(IconName::Plus)
                            .label("Nuevo")
                            .on_click(cx.listener(|this, _, window, cx| this.open_form(None, window, cx))),
                    ),
            )
            .children(form)
            .child(body)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_entity_kind_is_offered() {
        let kinds = entity_kinds().collect::<Vec<_>>();
        assert_eq!(kinds.len(), 9);
        assert_eq!(kinds[0], EntityKind::Lookup(CatalogType::Humedad));
        assert_eq!(kinds[8], EntityKind::Weed);
    }

    #[test]
    fn form_shape_follows_the_kind() {
        assert_eq!(
            entity_form(
                EntityKind::Lookup(CatalogType::Deposito),
                "D1".into(),
                "ignored".into(),
                Some(3),
            ),
            EntityForm::Lookup {
                tipo: CatalogType::Deposito,
                valor: "D1".into(),
            }
        );
        assert_eq!(
            entity_form(EntityKind::Cultivar, "INIA".into(), "".into(), Some(3)),
            EntityForm::Cultivar {
                especie_id: Some(3),
                nombre: "INIA".into(),
                descripcion: "".into(),
            }
        );
        assert_eq!(field_labels(EntityKind::Weed).1, Some("Nombre científico"));
    }
}
