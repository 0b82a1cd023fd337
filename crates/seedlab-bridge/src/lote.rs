use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisKind;

/// Row of the lotes table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoteListItem {
    #[serde(rename = "loteID")]
    pub id: i64,
    pub ficha: String,
    pub nom_lote: Option<String>,
    pub cultivar_nombre: Option<String>,
    pub especie_nombre: Option<String>,
    pub activo: bool,
    #[serde(default)]
    pub tipos_analisis_asignados: Vec<AnalysisKind>,
}

/// Full lote as returned by `GET /api/lotes/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lote {
    #[serde(rename = "loteID")]
    pub id: i64,
    pub ficha: String,
    pub nom_lote: Option<String>,
    pub cultivar_id: Option<i64>,
    pub cultivar_nombre: Option<String>,
    pub fecha_recibo: Option<NaiveDate>,
    pub kilos_limpios: Option<f64>,
    pub observaciones: Option<String>,
    pub activo: bool,
    #[serde(default)]
    pub tipos_analisis_asignados: Vec<AnalysisKind>,
}

/// Body of `POST /api/lotes` and `PUT /api/lotes/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoteRequest {
    pub ficha: String,
    pub nom_lote: Option<String>,
    pub cultivar_id: Option<i64>,
    pub fecha_recibo: Option<NaiveDate>,
    pub kilos_limpios: Option<f64>,
    pub observaciones: Option<String>,
    pub tipos_analisis_asignados: Vec<AnalysisKind>,
}

/// Minimal lote reference returned by `GET /api/lotes/elegibles/{tipo}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoteSimple {
    #[serde(rename = "loteID")]
    pub id: i64,
    pub ficha: String,
    pub nom_lote: Option<String>,
}

/// Answer of `GET /api/lotes/{id}/puede-remover-tipo/{tipo}`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalCheck {
    pub puede_remover: bool,
    pub razon: Option<String>,
}

/// Filters of the lotes listing, on top of the common [`crate::page::ListQuery`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoteFilter {
    pub query: crate::page::ListQuery,
    pub cultivar: Option<String>,
    /// Sort expression forwarded as-is, e.g. `ficha,asc`.
    pub sort: Option<String>,
}
