use serde::{Deserialize, Serialize};

/// Analyses that can be assigned to a lote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisKind {
    Germinacion,
    Tetrazolio,
    Dosn,
    Pureza,
    Pms,
}

impl AnalysisKind {
    /// Analyses that have an editor in this client.
    pub const EDITABLE: [AnalysisKind; 3] = [
        AnalysisKind::Germinacion,
        AnalysisKind::Tetrazolio,
        AnalysisKind::Dosn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisKind::Germinacion => "GERMINACION",
            AnalysisKind::Tetrazolio => "TETRAZOLIO",
            AnalysisKind::Dosn => "DOSN",
            AnalysisKind::Pureza => "PUREZA",
            AnalysisKind::Pms => "PMS",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnalysisKind::Germinacion => "Germinación",
            AnalysisKind::Tetrazolio => "Tetrazolio",
            AnalysisKind::Dosn => "DOSN",
            AnalysisKind::Pureza => "Pureza",
            AnalysisKind::Pms => "PMS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    Registrado,
    EnProceso,
    PendienteAprobacion,
    Aprobado,
    ARepetir,
}

impl AnalysisStatus {
    /// Finalized analyses are read-only until a reviewer sends them back.
    pub fn is_editable(self) -> bool {
        matches!(
            self,
            AnalysisStatus::Registrado | AnalysisStatus::EnProceso | AnalysisStatus::ARepetir
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TetrazolioPercentages {
    pub viables: f64,
    pub no_viables: f64,
    pub duras: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tetrazolio {
    #[serde(rename = "analisisID")]
    pub id: i64,
    pub ficha: Option<String>,
    pub estado: AnalysisStatus,
    pub num_semillas_por_rep: u32,
    pub num_repeticiones_esperadas: u32,
    pub pretratamiento: Option<String>,
    pub concentracion: Option<String>,
    /// Rounded percentages, present once the analyst submitted them.
    pub porcentajes: Option<TetrazolioPercentages>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TetrazolioRepetition {
    #[serde(rename = "repTzID")]
    pub id: i64,
    pub numero: u32,
    pub viables_num: i64,
    pub duras: i64,
    pub no_viables_num: i64,
}

/// Body of a new or edited tetrazolio repetition. Counts are signed so that
/// negative input reaches validation instead of failing to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TetrazolioRepetitionInput {
    pub viables_num: i64,
    pub duras: i64,
    pub no_viables_num: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GerminationPercentages {
    pub normales: f64,
    pub anormales: f64,
    pub duras: f64,
    pub frescas: f64,
    pub muertas: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Germinacion {
    #[serde(rename = "analisisID")]
    pub id: i64,
    pub ficha: Option<String>,
    pub estado: AnalysisStatus,
    pub num_semillas_por_rep: u32,
    pub num_repeticiones_esperadas: u32,
    pub porcentajes: Option<GerminationPercentages>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GerminationRepetition {
    #[serde(rename = "repGermID")]
    pub id: i64,
    pub numero: u32,
    pub normales: i64,
    pub anormales: i64,
    pub duras: i64,
    pub frescas: i64,
    pub muertas: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GerminationRepetitionInput {
    pub normales: i64,
    pub anormales: i64,
    pub duras: i64,
    pub frescas: i64,
    pub muertas: i64,
}

/// Category of a DOSN listado entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListadoKind {
    Maleza,
    MalezaToleranciaCero,
    OtroCultivo,
    Brassica,
}

impl ListadoKind {
    pub const ALL: [ListadoKind; 4] = [
        ListadoKind::Maleza,
        ListadoKind::MalezaToleranciaCero,
        ListadoKind::OtroCultivo,
        ListadoKind::Brassica,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ListadoKind::Maleza => "Maleza",
            ListadoKind::MalezaToleranciaCero => "Maleza tolerancia cero",
            ListadoKind::OtroCultivo => "Otro cultivo",
            ListadoKind::Brassica => "Brassica",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listado {
    #[serde(rename = "listadoID")]
    pub id: i64,
    pub tipo: ListadoKind,
    /// Weed catalog entry, for weed listados.
    pub catalogo_id: Option<i64>,
    /// Species entry, for other-crop listados.
    pub especie_id: Option<i64>,
    /// Display name resolved by the backend, or the free-text name of an
    /// unlisted species.
    pub nombre: Option<String>,
    pub cantidad: i64,
}

/// A listado as typed by the analyst.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListadoInput {
    pub tipo: Option<ListadoKind>,
    pub catalogo_id: Option<i64>,
    pub especie_id: Option<i64>,
    /// The species is not in any catalog; `nombre_otra_especie` names it.
    pub otra_especie: bool,
    pub nombre_otra_especie: String,
    pub cantidad: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dosn {
    #[serde(rename = "analisisID")]
    pub id: i64,
    pub ficha: Option<String>,
    pub estado: AnalysisStatus,
    pub gramos_analizados: Option<f64>,
}

/// Everything an analysis editor renders.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisEditorData {
    Germinacion {
        analysis: Germinacion,
        repetitions: Vec<GerminationRepetition>,
    },
    Tetrazolio {
        analysis: Tetrazolio,
        repetitions: Vec<TetrazolioRepetition>,
    },
    Dosn {
        analysis: Dosn,
        listados: Vec<Listado>,
    },
}

impl AnalysisEditorData {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisEditorData::Germinacion { .. } => AnalysisKind::Germinacion,
            AnalysisEditorData::Tetrazolio { .. } => AnalysisKind::Tetrazolio,
            AnalysisEditorData::Dosn { .. } => AnalysisKind::Dosn,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            AnalysisEditorData::Germinacion { analysis, .. } => analysis.id,
            AnalysisEditorData::Tetrazolio { analysis, .. } => analysis.id,
            AnalysisEditorData::Dosn { analysis, .. } => analysis.id,
        }
    }
}

/// Repetition typed in one of the editors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepetitionInput {
    Germinacion(GerminationRepetitionInput),
    Tetrazolio(TetrazolioRepetitionInput),
}
