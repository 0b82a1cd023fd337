//! Handlers of the analysis editors.
//!
//! Checks that only need the typed values run before any request. Every
//! mutation then re-reads the analysis and its repetitions, so limits and
//! editability are checked against server state rather than whatever the
//! editor last rendered. After a successful change the editor receives
//! fresh data.

use seedlab_bridge::{
    MessageFromBackend, PageKind,
    analysis::{AnalysisEditorData, AnalysisKind, AnalysisStatus, ListadoInput, RepetitionInput},
    notification::ToastKind,
};

use super::AppContextHandle;
use crate::{
    api::{ApiClient, analysis, lotes},
    error::{ApiError, ServiceError},
    validation::{
        ValidationError,
        forms::validate_listado,
        percentages::{germination_percentages, tetrazolio_percentages},
        repetitions::{
            check_expected_repetitions, check_germination_counts, check_tetrazolio_counts,
            validate_germination_repetition, validate_tetrazolio_repetition,
        },
    },
};

/// Loads an analysis together with its repetitions or listados.
pub(crate) async fn load_editor(
    api: &ApiClient,
    kind: AnalysisKind,
    id: i64,
) -> Result<AnalysisEditorData, ApiError> {
    match kind {
        AnalysisKind::Germinacion => {
            let (analysis, repetitions) = tokio::try_join!(
                analysis::get_germinacion(api, id),
                analysis::germination_repetitions(api, id)
            )?;
            Ok(AnalysisEditorData::Germinacion {
                analysis,
                repetitions,
            })
        }
        AnalysisKind::Tetrazolio => {
            let (analysis, repetitions) = tokio::try_join!(
                analysis::get_tetrazolio(api, id),
                analysis::tetrazolio_repetitions(api, id)
            )?;
            Ok(AnalysisEditorData::Tetrazolio {
                analysis,
                repetitions,
            })
        }
        AnalysisKind::Dosn => {
            let (analysis, listados) = tokio::try_join!(
                analysis::get_dosn(api, id),
                analysis::dosn_listados(api, id)
            )?;
            Ok(AnalysisEditorData::Dosn { analysis, listados })
        }
        other => Err(ApiError::Unsupported(other.as_str().to_owned())),
    }
}

fn status_of(data: &AnalysisEditorData) -> AnalysisStatus {
    match data {
        AnalysisEditorData::Germinacion { analysis, .. } => analysis.estado,
        AnalysisEditorData::Tetrazolio { analysis, .. } => analysis.estado,
        AnalysisEditorData::Dosn { analysis, .. } => analysis.estado,
    }
}

async fn load_editable(
    api: &ApiClient,
    kind: AnalysisKind,
    id: i64,
) -> Result<AnalysisEditorData, ServiceError> {
    let data = load_editor(api, kind, id).await?;
    if !status_of(&data).is_editable() {
        return Err(ValidationError::NotEditable.into());
    }
    Ok(data)
}

/// Sends the outcome of an editor mutation: a success toast and the
/// reloaded editor, or the error.
async fn finish(
    context: &AppContextHandle,
    kind: AnalysisKind,
    id: i64,
    result: Result<&'static str, ServiceError>,
) {
    match result {
        Ok(message) => {
            context.send_toast(ToastKind::Success, message).await;
            let api = context.api().await;
            match load_editor(&api, kind, id).await {
                Ok(data) => context.send(MessageFromBackend::AnalysisLoaded(data)).await,
                Err(e) => context.report(&e.into()).await,
            }
        }
        Err(e) => context.report(&e).await,
    }
}

pub async fn handle_eligible_lotes(context: AppContextHandle, kind: AnalysisKind) {
    let api = context.api().await;
    match lotes::eligible_lotes(&api, kind).await {
        Ok(lotes) => {
            context
                .send(MessageFromBackend::EligibleLotesResponse { kind, lotes })
                .await;
        }
        Err(e) => context.report(&e.into()).await,
    }
}

pub async fn handle_load(context: AppContextHandle, kind: AnalysisKind, id: i64) {
    let api = context.api().await;
    match load_editor(&api, kind, id).await {
        Ok(data) => context.send(MessageFromBackend::AnalysisLoaded(data)).await,
        Err(e) => {
            context
                .report_load_failure(PageKind::Analysis, &e.into())
                .await;
        }
    }
}

async fn add_repetition(
    api: &ApiClient,
    id: i64,
    seeds_per_repetition: u32,
    input: RepetitionInput,
) -> Result<&'static str, ServiceError> {
    match &input {
        RepetitionInput::Tetrazolio(input) => check_tetrazolio_counts(input, seeds_per_repetition)?,
        RepetitionInput::Germinacion(input) => {
            check_germination_counts(input, seeds_per_repetition)?
        }
    }

    match input {
        RepetitionInput::Tetrazolio(input) => {
            let AnalysisEditorData::Tetrazolio {
                analysis: tetrazolio,
                repetitions,
            } = load_editable(api, AnalysisKind::Tetrazolio, id).await?
            else {
                return Err(ApiError::Unsupported("TETRAZOLIO".to_owned()).into());
            };
            validate_tetrazolio_repetition(
                &input,
                tetrazolio.num_semillas_por_rep,
                repetitions.len(),
                tetrazolio.num_repeticiones_esperadas,
            )?;
            analysis::add_tetrazolio_repetition(api, id, &input).await?;
        }
        RepetitionInput::Germinacion(input) => {
            let AnalysisEditorData::Germinacion {
                analysis: germinacion,
                repetitions,
            } = load_editable(api, AnalysisKind::Germinacion, id).await?
            else {
                return Err(ApiError::Unsupported("GERMINACION".to_owned()).into());
            };
            validate_germination_repetition(
                &input,
                germinacion.num_semillas_por_rep,
                repetitions.len(),
                germinacion.num_repeticiones_esperadas,
            )?;
            analysis::add_germination_repetition(api, id, &input).await?;
        }
    }
    Ok("Repetición registrada.")
}

pub async fn handle_add_repetition(
    context: AppContextHandle,
    id: i64,
    seeds_per_repetition: u32,
    input: RepetitionInput,
) {
    let kind = match input {
        RepetitionInput::Germinacion(_) => AnalysisKind::Germinacion,
        RepetitionInput::Tetrazolio(_) => AnalysisKind::Tetrazolio,
    };
    let api = context.api().await;
    let result = add_repetition(&api, id, seeds_per_repetition, input).await;
    finish(&context, kind, id, result).await;
}

fn repetition_count(data: &AnalysisEditorData) -> u32 {
    let count = match data {
        AnalysisEditorData::Germinacion { repetitions, .. } => repetitions.len(),
        AnalysisEditorData::Tetrazolio { repetitions, .. } => repetitions.len(),
        AnalysisEditorData::Dosn { .. } => 0,
    };
    u32::try_from(count).unwrap_or(u32::MAX)
}

pub async fn handle_set_expected_repetitions(
    context: AppContextHandle,
    kind: AnalysisKind,
    id: i64,
    value: u32,
) {
    let api = context.api().await;
    let result: Result<&'static str, ServiceError> = async {
        let data = load_editable(&api, kind, id).await?;
        let value = check_expected_repetitions(value, repetition_count(&data))?;
        analysis::set_expected_repetitions(&api, kind, id, value).await?;
        Ok("Repeticiones esperadas actualizadas.")
    }
    .await;

    if let Err(ServiceError::Validation(e)) = &result {
        if let Some(clamped) = e.clamped_value() {
            context
                .send(MessageFromBackend::ExpectedRepetitionsClamped {
                    kind,
                    id,
                    value: clamped,
                })
                .await;
        }
    }
    finish(&context, kind, id, result).await;
}

/// Computes the rounded percentages from the recorded repetitions and
/// submits them.
pub async fn handle_submit_percentages(context: AppContextHandle, kind: AnalysisKind, id: i64) {
    let api = context.api().await;
    let result: Result<&'static str, ServiceError> = async {
        match load_editable(&api, kind, id).await? {
            AnalysisEditorData::Germinacion { repetitions, .. } => {
                let percentages = germination_percentages(&repetitions)?;
                analysis::submit_germination_percentages(&api, id, &percentages).await?;
            }
            AnalysisEditorData::Tetrazolio { repetitions, .. } => {
                let percentages = tetrazolio_percentages(&repetitions)?;
                analysis::submit_tetrazolio_percentages(&api, id, &percentages).await?;
            }
            AnalysisEditorData::Dosn { .. } => {
                return Err(ApiError::Unsupported("DOSN".to_owned()).into());
            }
        }
        Ok("Porcentajes guardados.")
    }
    .await;
    finish(&context, kind, id, result).await;
}

pub async fn handle_add_listado(context: AppContextHandle, dosn_id: i64, input: ListadoInput) {
    let api = context.api().await;
    let result: Result<&'static str, ServiceError> = async {
        let listado = validate_listado(&input)?;
        load_editable(&api, AnalysisKind::Dosn, dosn_id).await?;
        analysis::add_listado(&api, dosn_id, &listado).await?;
        Ok("Listado agregado.")
    }
    .await;
    finish(&context, AnalysisKind::Dosn, dosn_id, result).await;
}

pub async fn handle_finalize(context: AppContextHandle, kind: AnalysisKind, id: i64) {
    let api = context.api().await;
    let result: Result<&'static str, ServiceError> = async {
        load_editable(&api, kind, id).await?;
        analysis::finalize_analysis(&api, kind, id).await?;
        log::info!("Finalized {kind:?} analysis {id}");
        Ok("Análisis finalizado. Queda pendiente de aprobación.")
    }
    .await;
    finish(&context, kind, id, result).await;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use seedlab_bridge::analysis::TetrazolioRepetitionInput;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{any, method, path},
    };

    use super::*;

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), &server.uri(), None).unwrap()
    }

    fn tz(viables_num: i64, duras: i64, no_viables_num: i64) -> RepetitionInput {
        RepetitionInput::Tetrazolio(TetrazolioRepetitionInput {
            viables_num,
            duras,
            no_viables_num,
        })
    }

    #[tokio::test]
    async fn out_of_tolerance_counts_never_reach_the_server() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let api = client(&server);
        let result = add_repetition(&api, 3, 50, tz(40, 5, 10)).await;
        assert!(matches!(
            result,
            Err(ServiceError::Validation(ValidationError::OutOfTolerance { total: 55, .. }))
        ));

        let result = add_repetition(&api, 3, 50, tz(i64::MAX, 1, 0)).await;
        assert!(matches!(
            result,
            Err(ServiceError::Validation(ValidationError::CountTooLarge))
        ));
    }

    #[tokio::test]
    async fn accepted_counts_are_checked_against_server_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tetrazolios/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "analisisID": 3,
                "ficha": "L-003",
                "estado": "EN_PROCESO",
                "numSemillasPorRep": 50,
                "numRepeticionesEsperadas": 2
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tetrazolios/3/repeticiones"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/tetrazolios/3/repeticiones"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "repTzID": 1,
                "numero": 1,
                "viablesNum": 40,
                "duras": 5,
                "noViablesNum": 6
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server);
        let result = add_repetition(&api, 3, 50, tz(40, 5, 6)).await;
        assert_eq!(result.ok(), Some("Repetición registrada."));
    }
}
