use serde::Serialize;
use seedlab_bridge::analysis::{
    AnalysisKind, Dosn, Germinacion, GerminationPercentages, GerminationRepetition,
    GerminationRepetitionInput, Listado, ListadoInput, Tetrazolio, TetrazolioPercentages,
    TetrazolioRepetition, TetrazolioRepetitionInput,
};

use super::ApiClient;
use crate::error::{ApiError, OrEmpty};

fn base_path(kind: AnalysisKind) -> Result<&'static str, ApiError> {
    match kind {
        AnalysisKind::Germinacion => Ok("/api/germinaciones"),
        AnalysisKind::Tetrazolio => Ok("/api/tetrazolios"),
        AnalysisKind::Dosn => Ok("/api/dosn"),
        other => Err(ApiError::Unsupported(other.as_str().to_owned())),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExpectedRepetitionsBody {
    num_repeticiones_esperadas: u32,
}

pub async fn get_germinacion(client: &ApiClient, id: i64) -> Result<Germinacion, ApiError> {
    client.get_json(&format!("/api/germinaciones/{id}"), &[]).await
}

/// Repetitions of a germination. A freshly created analysis has none and the
/// backend answers 404, which is reported as an empty list.
pub async fn germination_repetitions(
    client: &ApiClient,
    id: i64,
) -> Result<Vec<GerminationRepetition>, ApiError> {
    client
        .get_json(&format!("/api/germinaciones/{id}/repeticiones"), &[])
        .await
        .or_empty()
}

pub async fn add_germination_repetition(
    client: &ApiClient,
    id: i64,
    input: &GerminationRepetitionInput,
) -> Result<GerminationRepetition, ApiError> {
    client
        .post_json(&format!("/api/germinaciones/{id}/repeticiones"), input)
        .await
}

pub async fn submit_germination_percentages(
    client: &ApiClient,
    id: i64,
    percentages: &GerminationPercentages,
) -> Result<Germinacion, ApiError> {
    client
        .put_json(&format!("/api/germinaciones/{id}/porcentajes"), percentages)
        .await
}

pub async fn get_tetrazolio(client: &ApiClient, id: i64) -> Result<Tetrazolio, ApiError> {
    client.get_json(&format!("/api/tetrazolios/{id}"), &[]).await
}

pub async fn tetrazolio_repetitions(
    client: &ApiClient,
    id: i64,
) -> Result<Vec<TetrazolioRepetition>, ApiError> {
    client
        .get_json(&format!("/api/tetrazolios/{id}/repeticiones"), &[])
        .await
        .or_empty()
}

pub async fn add_tetrazolio_repetition(
    client: &ApiClient,
    id: i64,
    input: &TetrazolioRepetitionInput,
) -> Result<TetrazolioRepetition, ApiError> {
    client
        .post_json(&format!("/api/tetrazolios/{id}/repeticiones"), input)
        .await
}

pub async fn submit_tetrazolio_percentages(
    client: &ApiClient,
    id: i64,
    percentages: &TetrazolioPercentages,
) -> Result<Tetrazolio, ApiError> {
    client
        .put_json(&format!("/api/tetrazolios/{id}/porcentajes"), percentages)
        .await
}

pub async fn get_dosn(client: &ApiClient, id: i64) -> Result<Dosn, ApiError> {
    client.get_json(&format!("/api/dosn/{id}"), &[]).await
}

pub async fn dosn_listados(client: &ApiClient, id: i64) -> Result<Vec<Listado>, ApiError> {
    client
        .get_json(&format!("/api/dosn/{id}/listados"), &[])
        .await
        .or_empty()
}

pub async fn add_listado(
    client: &ApiClient,
    id: i64,
    input: &ListadoInput,
) -> Result<Listado, ApiError> {
    client
        .post_json(&format!("/api/dosn/{id}/listados"), input)
        .await
}

/// Updates `numRepeticionesEsperadas` of a germination or tetrazolio.
pub async fn set_expected_repetitions(
    client: &ApiClient,
    kind: AnalysisKind,
    id: i64,
    value: u32,
) -> Result<(), ApiError> {
    let base = base_path(kind)?;
    let _: serde_json::Value = client
        .put_json(
            &format!("{base}/{id}"),
            &ExpectedRepetitionsBody {
                num_repeticiones_esperadas: value,
            },
        )
        .await?;
    Ok(())
}

/// Moves the analysis to review; it becomes read-only for the analyst.
pub async fn finalize_analysis(
    client: &ApiClient,
    kind: AnalysisKind,
    id: i64,
) -> Result<(), ApiError> {
    let base = base_path(kind)?;
    client.put_no_content(&format!("{base}/{id}/finalizar")).await
}
