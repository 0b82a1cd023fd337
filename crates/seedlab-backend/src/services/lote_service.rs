use seedlab_bridge::{
    MessageFromBackend, PageKind,
    lote::{LoteFilter, LoteRequest},
    notification::ToastKind,
};

use super::AppContextHandle;
use crate::{
    api::{ApiClient, lotes},
    error::ServiceError,
    validation::forms::validate_lote,
};

pub async fn handle_list_request(context: AppContextHandle, filter: LoteFilter) {
    {
        let mut state = context.state.write().await;
        state.last_lotes = Some(filter.clone());
    }
    load(&context, &filter).await;
}

async fn load(context: &AppContextHandle, filter: &LoteFilter) {
    let (api, size) = (context.api().await, context.page_size().await);
    match lotes::list_lotes(&api, filter, size).await {
        Ok(page) => {
            context
                .send(MessageFromBackend::LotesListResponse(page))
                .await;
        }
        Err(e) => {
            context
                .report_load_failure(PageKind::Lotes, &e.into())
                .await;
        }
    }
}

pub async fn handle_load(context: AppContextHandle, id: i64) {
    let api = context.api().await;
    match lotes::get_lote(&api, id).await {
        Ok(lote) => context.send(MessageFromBackend::LoteLoaded(lote)).await,
        Err(e) => context.report(&e.into()).await,
    }
}

/// Reloads the table with the last filter the user applied.
async fn reload(context: &AppContextHandle) {
    let filter = context.state.read().await.last_lotes.clone();
    if let Some(filter) = filter {
        load(context, &filter).await;
    }
}

/// Refuses to drop analysis kinds that already have analyses on the lote.
async fn check_removed_kinds(
    api: &ApiClient,
    id: i64,
    request: &LoteRequest,
) -> Result<(), ServiceError> {
    let current = lotes::get_lote(api, id).await?;
    let removed = current
        .tipos_analisis_asignados
        .iter()
        .filter(|kind| !request.tipos_analisis_asignados.contains(kind));

    for kind in removed {
        let check = lotes::can_remove_analysis_kind(api, id, *kind).await?;
        if !check.puede_remover {
            return Err(ServiceError::Rejected(check.razon.unwrap_or_else(|| {
                format!(
                    "No se puede quitar {} del lote: ya tiene análisis registrados.",
                    kind.label()
                )
            })));
        }
    }
    Ok(())
}

async fn save(
    api: &ApiClient,
    id: Option<i64>,
    request: LoteRequest,
) -> Result<&'static str, ServiceError> {
    let request = validate_lote(&request)?;
    match id {
        Some(id) => {
            check_removed_kinds(api, id, &request).await?;
            lotes::update_lote(api, id, &request).await?;
            Ok("Lote actualizado correctamente.")
        }
        None => {
            lotes::create_lote(api, &request).await?;
            Ok("Lote creado correctamente.")
        }
    }
}

pub async fn handle_save(context: AppContextHandle, id: Option<i64>, request: LoteRequest) {
    let api = context.api().await;
    match save(&api, id, request).await {
        Ok(message) => {
            log::info!("Saved lote {id:?}");
            context.send_toast(ToastKind::Success, message).await;
            reload(&context).await;
        }
        Err(e) => context.report(&e).await,
    }
}

/// Soft-deletes (`active = false`) or reactivates a lote.
pub async fn handle_set_active(context: AppContextHandle, id: i64, active: bool) {
    let api = context.api().await;
    let result = if active {
        lotes::reactivate_lote(&api, id).await.map(|_| "Lote reactivado.")
    } else {
        lotes::deactivate_lote(&api, id)
            .await
            .map(|()| "Lote desactivado.")
    };

    match result {
        Ok(message) => {
            context.send_toast(ToastKind::Success, message).await;
            reload(&context).await;
        }
        Err(e) => context.report(&e.into()).await,
    }
}
