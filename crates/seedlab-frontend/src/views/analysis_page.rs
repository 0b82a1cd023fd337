//! Editors of germination, tetrazolio and DOSN analyses.
//!
//! The page only collects input. Tolerance, repetition limits, rounding and
//! listado rules are checked by the backend, which answers with a toast and,
//! on success, the reloaded analysis.

use gpui::{
    AppContext, Context, Entity, IntoElement, ParentElement, Render, SharedString, Styled, Window,
    div, prelude::FluentBuilder,
};
use gpui_component::{
    ActiveTheme, Disableable, IconName, Sizable, StyledExt,
    button::{Button, ButtonVariants},
    checkbox::Checkbox,
    group_box::{GroupBox, GroupBoxVariants},
    input::{Input, InputState},
    select::{Select, SelectItem, SelectState},
};
use seedlab_bridge::{
    MessageToBackend,
    analysis::{
        AnalysisEditorData, AnalysisKind, AnalysisStatus, GerminationRepetitionInput, ListadoInput,
        ListadoKind, RepetitionInput, TetrazolioRepetitionInput,
    },
    catalog::Species,
};

use crate::{
    BackendBridge,
    components::{load_error::LoadError, settings_item::SettingsItem},
    entities::{
        DataEntities,
        analysis_entity::{AnalysisEntity, ExpectedRepetitionsClamped},
        lotes_entity::SpeciesOptionsEntity,
    },
    formatting::parse_integer,
    views::form::{set_value, text_input, value_of, warn},
};

const TETRAZOLIO_FIELDS: [&str; 3] = ["Viables", "Duras", "No viables"];
const GERMINATION_FIELDS: [&str; 5] = ["Normales", "Anormales", "Duras", "Frescas", "Muertas"];

fn count_labels(kind: AnalysisKind) -> &'static [&'static str] {
    match kind {
        AnalysisKind::Tetrazolio => &TETRAZOLIO_FIELDS,
        AnalysisKind::Germinacion => &GERMINATION_FIELDS,
        _ => &[],
    }
}

/// Turns the typed counts into a repetition, in the order of
/// [`count_labels`]. `None` when a field is missing.
fn repetition_input(kind: AnalysisKind, counts: &[Option<i64>]) -> Option<RepetitionInput> {
    let counts = counts.iter().copied().collect::<Option<Vec<_>>>()?;
    match (kind, counts.as_slice()) {
        (AnalysisKind::Tetrazolio, &[viables_num, duras, no_viables_num]) => Some(
            RepetitionInput::Tetrazolio(TetrazolioRepetitionInput {
                viables_num,
                duras,
                no_viables_num,
            }),
        ),
        (AnalysisKind::Germinacion, &[normales, anormales, duras, frescas, muertas]) => Some(
            RepetitionInput::Germinacion(GerminationRepetitionInput {
                normales,
                anormales,
                duras,
                frescas,
                muertas,
            }),
        ),
        _ => None,
    }
}

fn status_label(status: AnalysisStatus) -> &'static str {
    match status {
        AnalysisStatus::Registrado => "Registrado",
        AnalysisStatus::EnProceso => "En proceso",
        AnalysisStatus::PendienteAprobacion => "Pendiente de aprobación",
        AnalysisStatus::Aprobado => "Aprobado",
        AnalysisStatus::ARepetir => "A repetir",
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
        .map(|species| SpeciesOption {
            id: species.id,
            name: species.nombre_comun.clone().into(),
        })
        .collect()
}

struct ListadoForm {
    tipo: Option<ListadoKind>,
    otra_especie: bool,
    catalogo: Entity<InputState>,
    especie: Entity<SelectState<Vec<SpeciesOption>>>,
    nombre: Entity<InputState>,
    cantidad: Entity<InputState>,
}

pub struct AnalysisPage {
    analysis: Entity<AnalysisEntity>,
    id_input: Entity<InputState>,
    expected: Entity<InputState>,
    counts: Vec<Entity<InputState>>,
    listado: ListadoForm,
    /// Editor the inputs were last reset for.
    shown: Option<AnalysisEditorData>,
}

impl AnalysisPage {
    pub fn new(data: &DataEntities, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let id_input = text_input("ID del análisis", window, cx);
        if let Some(id) = data.analysis.read(cx).requested_id {
            set_value(&id_input, id.to_string(), window, cx);
        }

        let especie = cx.new(|cx| {
            let options = species_options(&data.species.read(cx).species);
            SelectState::new(options, None, window, cx)
        });
        cx.observe_in(
            &data.species,
            window,
            |this, species: Entity<SpeciesOptionsEntity>, window, cx| {
                let options = species_options(&species.read(cx).species);
                this.listado.especie.update(cx, |state, cx| {
                    state.set_items(options, window, cx);
                });
            },
        )
        .detach();

        cx.observe_in(&data.analysis, window, |this, _, window, cx| {
            this.sync_editor(window, cx);
            cx.notify();
        })
        .detach();
        cx.subscribe_in(
            &data.analysis,
            window,
            |this, _, event: &ExpectedRepetitionsClamped, window, cx| {
                set_value(&this.expected, event.0.to_string(), window, cx);
            },
        )
        .detach();

        let listado = ListadoForm {
            tipo: None,
            otra_especie: false,
            catalogo: text_input("ID de maleza", window, cx),
            especie,
            nombre: text_input("Nombre de la especie", window, cx),
            cantidad: text_input("Cantidad", window, cx),
        };

        let mut page = Self {
            analysis: data.analysis.clone(),
            id_input,
            expected: text_input("Repeticiones esperadas", window, cx),
            counts: Vec::new(),
            listado,
            shown: None,
        };
        page.sync_editor(window, cx);

        let kind = page.analysis.read(cx).kind;
        BackendBridge::dispatch(cx, MessageToBackend::EligibleLotesRequest(kind));
        BackendBridge::dispatch(cx, MessageToBackend::SpeciesOptionsRequest);
        page
    }

    /// Resets the inputs when a different analysis (or a reloaded one) is
    /// shown.
    fn sync_editor(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let editor = self.analysis.read(cx).editor.clone();
        if editor == self.shown {
            return;
        }

        let expected = match &editor {
            Some(AnalysisEditorData::Germinacion { analysis, .. }) => {
                Some(analysis.num_repeticiones_esperadas)
            }
            Some(AnalysisEditorData::Tetrazolio { analysis, .. }) => {
                Some(analysis.num_repeticiones_esperadas)
            }
            _ => None,
        };
        if let Some(expected) = expected {
            set_value(&self.expected, expected.to_string(), window, cx);
        }

        let kind = editor.as_ref().map(AnalysisEditorData::kind);
        self.counts = kind
            .map(count_labels)
            .unwrap_or_default()
            .iter()
            .map(|label| text_input(*label, window, cx))
            .collect();
        set_value(&self.listado.cantidad, "", window, cx);
        set_value(&self.listado.nombre, "", window, cx);
        self.shown = editor;
    }

    fn select_kind(&mut self, kind: AnalysisKind, cx: &mut Context<Self>) {
        self.analysis.update(cx, |analysis, cx| {
            analysis.kind = kind;
            analysis.eligible.clear();
            cx.notify();
        });
        BackendBridge::dispatch(cx, MessageToBackend::EligibleLotesRequest(kind));
    }

    fn open(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(id) = parse_integer(&value_of(&self.id_input, cx)) else {
            warn("Ingresa el número del análisis.", window, cx);
            return;
        };
        let kind = self.analysis.update(cx, |analysis, _| {
            analysis.requested_id = Some(id);
            analysis.kind
        });
        BackendBridge::dispatch(cx, MessageToBackend::AnalysisLoadRequest { kind, id });
    }

    fn add_repetition(
        &mut self,
        kind: AnalysisKind,
        id: i64,
        seeds_per_repetition: u32,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let counts = self
            .counts
            .iter()
            .map(|input| parse_integer(&value_of(input, cx)))
            .collect::<Vec<_>>();
        match repetition_input(kind, &counts) {
            Some(input) => BackendBridge::dispatch(
                cx,
                MessageToBackend::AddRepetition {
                    analysis_id: id,
                    seeds_per_repetition,
                    input,
                },
            ),
            None => warn("Completa todos los conteos con números enteros.", window, cx),
        }
    }

    fn set_expected(&mut self, kind: AnalysisKind, id: i64, window: &mut Window, cx: &mut Context<Self>) {
        let value = parse_integer(&value_of(&self.expected, cx)).and_then(|v| u32::try_from(v).ok());
        match value {
            Some(value) => BackendBridge::dispatch(
                cx,
                MessageToBackend::SetExpectedRepetitions { kind, id, value },
            ),
            None => warn("Las repeticiones esperadas deben ser un número positivo.", window, cx),
        }
    }

    fn add_listado(&mut self, dosn_id: i64, window: &mut Window, cx: &mut Context<Self>) {
        let form = &self.listado;
        let Some(cantidad) = parse_integer(&value_of(&form.cantidad, cx)) else {
            warn("La cantidad debe ser un número entero.", window, cx);
            return;
        };
        let catalogo_text = value_of(&form.catalogo, cx);
        let catalogo_id = if catalogo_text.trim().is_empty() {
            None
        } else {
            match parse_integer(&catalogo_text) {
                Some(id) => Some(id),
                None => {
                    warn("El ID de maleza debe ser un número.", window, cx);
                    return;
                }
            }
        };

        let input = ListadoInput {
            tipo: form.tipo,
            catalogo_id,
            especie_id: form.especie.read(cx).selected_value().copied(),
            otra_especie: form.otra_especie,
            nombre_otra_especie: value_of(&form.nombre, cx),
            cantidad,
        };
        BackendBridge::dispatch(cx, MessageToBackend::AddListado { dosn_id, input });
    }

    fn render_counts_editor(
        &self,
        kind: AnalysisKind,
        id: i64,
        seeds_per_rep: u32,
        editable: bool,
        cx: &mut Context<Self>,
    ) -> impl IntoElement + use<> {
        let labels = count_labels(kind);
        let fields = labels
            .iter()
            .zip(&self.counts)
            .map(|(label, input)| {
                div()
                    .flex()
                    .flex_col()
                    .gap_1()
                    .child(div().text_sm().child(*label))
                    .child(div().w_24().child(Input::new(input)))
            })
            .collect::<Vec<_>>();

        GroupBox::new()
            .outline()
            .child(div().font_semibold().child("Nueva repetición"))
            .child(
                div()
                    .text_sm()
                    .text_color(cx.theme().muted_foreground)
                    .child(format!(
                        "El total debe estar dentro del 5 % de {seeds_per_rep} semillas."
                    )),
            )
            .child(div().flex().gap_3().children(fields))
            .child(
                div().flex().justify_end().child(
                    Button::new("analysis-add-repetition")
                        .primary()
                        .icon(IconName::Plus)
                        .label("Agregar repetición")
                        .disabled(!editable)
                        .on_click(cx.listener(move |this, _, window, cx| {
                            this.add_repetition(kind, id, seeds_per_rep, window, cx);
                        })),
                ),
            )
    }

    fn render_expected(&self, kind: AnalysisKind, id: i64, editable: bool, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        SettingsItem::new()
            .label("Repeticiones esperadas")
            .description("No puede ser menor a las repeticiones ya registradas ni menor a 2.")
            .child(
                div()
                    .flex()
                    .gap_2()
                    .child(div().w_24().child(Input::new(&self.expected)))
                    .child(
                        Button::new("analysis-set-expected")
                            .outline()
                            .label("Actualizar")
                            .disabled(!editable)
                            .on_click(cx.listener(move |this, _, window, cx| {
                                this.set_expected(kind, id, window, cx);
                            })),
                    ),
            )
    }

    fn render_listado_form(&self, dosn_id: i64, editable: bool, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let form = &self.listado;
        let kinds = ListadoKind::ALL
            .iter()
            .map(|&kind| {
                let button = Button::new(SharedString::from(format!("listado-kind-{kind:?}")))
                    .small()
                    .label(kind.label())
                    .on_click(cx.listener(move |this, _, _, cx| {
                        this.listado.tipo = Some(kind);
                        cx.notify();
                    }));
                if form.tipo == Some(kind) {
                    button.primary()
                } else {
                    button.ghost()
                }
            })
            .collect::<Vec<_>>();
        let weed = matches!(
            form.tipo,
            Some(ListadoKind::Maleza | ListadoKind::MalezaToleranciaCero)
        );

        GroupBox::new()
            .outline()
            .child(div().font_semibold().child("Nuevo listado"))
            .child(div().flex().flex_wrap().gap_2().children(kinds))
            .when(weed, |this| {
                this.child(
                    SettingsItem::new()
                        .label("Maleza")
                        .child(div().w_1_3().child(Input::new(&form.catalogo))),
                )
            })
            .when(!weed && form.tipo.is_some(), |this| {
                this.child(
                    SettingsItem::new().label("Otra especie").child(
                        Checkbox::new("listado-otra-especie")
                            .checked(form.otra_especie)
                            .on_click(cx.listener(|this, checked: &bool, _, cx| {
                                this.listado.otra_especie = *checked;
                                cx.notify();
                            })),
                    ),
                )
                .child(if form.otra_especie {
                    SettingsItem::new()
                        .label("Nombre")
                        .child(div().w_1_3().child(Input::new(&form.nombre)))
                } else {
                    SettingsItem::new().label("Especie").child(
                        div()
                            .w_1_3()
                            .child(Select::new(&form.especie).placeholder("Elegir especie…")),
                    )
                })
            })
            .child(
                SettingsItem::new()
                    .label("Cantidad")
                    .child(div().w_1_3().child(Input::new(&form.cantidad))),
            )
            .child(
                div().flex().justify_end().child(
                    Button::new("analysis-add-listado")
                        .primary()
                        .icon(IconName::Plus)
                        .label("Agregar listado")
                        .disabled(!editable)
                        .on_click(cx.listener(move |this, _, window, cx| {
                            this.add_listado(dosn_id, window, cx);
                        })),
                ),
            )
    }

    fn render_editor(&self, editor: &AnalysisEditorData, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let kind = editor.kind();
        let id = editor.id();
        let (ficha, status) = match editor {
            AnalysisEditorData::Germinacion { analysis, .. } => (analysis.ficha.clone(), analysis.estado),
            AnalysisEditorData::Tetrazolio { analysis, .. } => (analysis.ficha.clone(), analysis.estado),
            AnalysisEditorData::Dosn { analysis, .. } => (analysis.ficha.clone(), analysis.estado),
        };
        let editable = status.is_editable();

        let header = div()
            .flex()
            .items_center()
            .justify_between()
            .child(
                div()
                    .flex()
                    .flex_col()
                    .child(
                        div()
                            .text_xl()
                            .font_bold()
                            .child(format!("{} #{id}", kind.label())),
                    )
                    .child(
                        div()
                            .text_sm()
                            .text_color(cx.theme().muted_foreground)
                            .child(format!(
                                "Lote {} · {}",
                                ficha.unwrap_or_else(|| "sin ficha".to_owned()),
                                status_label(status)
                            )),
                    ),
            )
            .child(
                Button::new("analysis-finalize")
                    .danger()
                    .label("Finalizar análisis")
                    .disabled(!editable)
                    .on_click(move |_, _, cx| {
                        BackendBridge::dispatch(cx, MessageToBackend::FinalizeAnalysis { kind, id });
                    }),
            );

        let body = match editor {
            AnalysisEditorData::Tetrazolio {
                analysis,
                repetitions,
            } => {
                let rows = repetitions
                    .iter()
                    .map(|rep| {
                        vec![
                            rep.numero.to_string(),
                            rep.viables_num.to_string(),
                            rep.duras.to_string(),
                            rep.no_viables_num.to_string(),
                            (rep.viables_num + rep.duras + rep.no_viables_num).to_string(),
                        ]
                    })
                    .collect::<Vec<_>>();
                let percentages = analysis.porcentajes.map(|p| {
                    format!(
                        "Viables {} % · No viables {} % · Duras {} %",
                        p.viables, p.no_viables, p.duras
                    )
                });
                div()
                    .flex()
                    .flex_col()
                    .gap_4()
                    .child(self.render_expected(kind, id, editable, cx))
                    .child(repetition_table(
                        &["N.º", "Viables", "Duras", "No viables", "Total"],
                        rows,
                        cx,
                    ))
                    .child(self.render_counts_editor(kind, id, analysis.num_semillas_por_rep, editable, cx))
                    .child(percentages_row(kind, id, percentages, editable))
                    .into_any_element()
            }
            AnalysisEditorData::Germinacion {
                analysis,
                repetitions,
            } => {
                let rows = repetitions
                    .iter()
                    .map(|rep| {
                        vec![
                            rep.numero.to_string(),
                            rep.normales.to_string(),
                            rep.anormales.to_string(),
                            rep.duras.to_string(),
                            rep.frescas.to_string(),
                            rep.muertas.to_string(),
                        ]
                    })
                    .collect::<Vec<_>>();
                let percentages = analysis.porcentajes.map(|p| {
                    format!(
                        "Normales {} % · Anormales {} % · Duras {} % · Frescas {} % · Muertas {} %",
                        p.normales, p.anormales, p.duras, p.frescas, p.muertas
                    )
                });
                div()
                    .flex()
                    .flex_col()
                    .gap_4()
                    .child(self.render_expected(kind, id, editable, cx))
                    .child(repetition_table(
                        &["N.º", "Normales", "Anormales", "Duras", "Frescas", "Muertas"],
                        rows,
                        cx,
                    ))
                    .child(self.render_counts_editor(kind, id, analysis.num_semillas_por_rep, editable, cx))
                    .child(percentages_row(kind, id, percentages, editable))
                    .into_any_element()
            }
            AnalysisEditorData::Dosn { listados, .. } => {
                let rows = listados
                    .iter()
                    .map(|listado| {
                        vec![
                            listado.tipo.label().to_owned(),
                            listado.nombre.clone().unwrap_or_default(),
                            listado.cantidad.to_string(),
                        ]
                    })
                    .collect::<Vec<_>>();
                div()
                    .flex()
                    .flex_col()
                    .gap_4()
                    .child(repetition_table(&["Tipo", "Nombre", "Cantidad"], rows, cx))
                    .child(self.render_listado_form(id, editable, cx))
                    .into_any_element()
            }
        };

        div()
            .flex()
            .flex_col()
            .gap_4()
            .child(header)
            .when(!editable, |this| {
                this.child(
                    div()
                        .text_sm()
                        .text_color(cx.theme().warning)
                        .child("Este análisis ya fue finalizado y no se puede editar."),
                )
            })
            .child(body)
    }
}

fn repetition_table(headers: &[&'static str], rows: Vec<Vec<String>>, cx: &Context<AnalysisPage>) -> impl IntoElement + use<> {
    let row = |cells: Vec<SharedString>| {
        div()
            .flex()
            .py_1()
            .border_b_1()
            .border_color(cx.theme().border)
            .children(cells.into_iter().map(|cell| div().flex_1().child(cell)))
    };
    let empty = rows.is_empty();

    div()
        .flex()
        .flex_col()
        .child(row(headers.iter().map(|h| SharedString::from(*h)).collect()).font_semibold())
        .children(
            rows.into_iter()
                .map(|cells| row(cells.into_iter().map(SharedString::from).collect())),
        )
        .when(empty, |this| {
            this.child(
                div()
                    .py_2()
                    .text_sm()
                    .text_color(cx.theme().muted_foreground)
                    .child("Sin registros todavía."),
            )
        })
}

fn percentages_row(
    kind: AnalysisKind,
    id: i64,
    current: Option<String>,
    editable: bool,
) -> impl IntoElement + use<> {
    SettingsItem::new()
        .label("Porcentajes")
        .description(current.unwrap_or_else(|| "Todavía no se calcularon.".to_owned()))
        .child(
            Button::new("analysis-percentages")
                .outline()
                .label("Calcular y guardar")
                .disabled(!editable)
                .on_click(move |_, _, cx| {
                    BackendBridge::dispatch(cx, MessageToBackend::SubmitPercentages { kind, id });
                }),
        )
}

impl Render for AnalysisPage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let analysis = self.analysis.read(cx).clone();

        let kinds = AnalysisKind::EDITABLE
            .iter()
            .map(|&kind| {
                let button = Button::new(SharedString::from(format!("analysis-kind-{}", kind.as_str())))
                    .small()
                    .label(kind.label())
                    .on_click(cx.listener(move |this, _, _, cx| this.select_kind(kind, cx)));
                if kind == analysis.kind {
                    button.primary()
                } else {
                    button.ghost()
                }
            })
            .collect::<Vec<_>>();

        let eligible = analysis
            .eligible
            .iter()
            .map(|lote| match &lote.nom_lote {
                Some(nombre) => format!("{} ({nombre})", lote.ficha),
                None => lote.ficha.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");

        let body = match (&analysis.load_error, &analysis.editor) {
            (Some(message), _) => LoadError::new(
                message.clone(),
                cx.listener(|this, _, window, cx| this.open(window, cx)),
            )
            .into_any_element(),
            (None, Some(editor)) => self.render_editor(editor, cx).into_any_element(),
            (None, None) => div()
                .text_color(cx.theme().muted_foreground)
                .child("Elige un tipo de análisis e ingresa su número para abrirlo.")
                .into_any_element(),
        };

        div()
            .flex()
            .flex_col()
            .gap_4()
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_2()
                    .children(kinds)
                    .child(div().w_40().child(Input::new(&self.id_input)))
                    .child(
                        Button::new("analysis-open")
                            .primary()
                            .small()
                            .label("Abrir")
                            .on_click(cx.listener(|this, _, window, cx| this.open(window, cx))),
                    ),
            )
            .when(!eligible.is_empty(), |this| {
                this.child(
                    div()
                        .text_sm()
                        .text_color(cx.theme().muted_foreground)
                        .child(format!("Lotes con {} asignado: {eligible}", analysis.kind.label())),
                )
            })
            .child(body)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn counts_follow_the_field_order() {
        assert_eq!(
            repetition_input(AnalysisKind::Tetrazolio, &[Some(40), Some(5), Some(6)]),
            Some(RepetitionInput::Tetrazolio(TetrazolioRepetitionInput {
                viables_num: 40,
                duras: 5,
                no_viables_num: 6,
            }))
        );
        assert_eq!(
            repetition_input(
                AnalysisKind::Germinacion,
                &[Some(80), Some(10), Some(4), Some(3), Some(3)]
            ),
            Some(RepetitionInput::Germinacion(GerminationRepetitionInput {
                normales: 80,
                anormales: 10,
                duras: 4,
                frescas: 3,
                muertas: 3,
            }))
        );
    }

    #[test]
    fn missing_or_misplaced_counts_are_rejected() {
        assert_eq!(
            repetition_input(AnalysisKind::Tetrazolio, &[Some(40), None, Some(6)]),
            None
        );
        assert_eq!(repetition_input(AnalysisKind::Tetrazolio, &[Some(40)]), None);
        assert_eq!(repetition_input(AnalysisKind::Dosn, &[]), None);
        assert_eq!(count_labels(AnalysisKind::Germinacion).len(), 5);
    }
}
