use seedlab_bridge::{
    MessageFromBackend, PageKind,
    catalog::{EntityForm, EntityKind},
    notification::ToastKind,
    page::ListQuery,
};

use super::AppContextHandle;
use crate::{
    api::catalogs,
    error::ServiceError,
    validation::forms::build_catalog_request,
};

pub async fn handle_list_request(context: AppContextHandle, kind: EntityKind, query: ListQuery) {
    {
        let mut state = context.state.write().await;
        state.last_catalog = Some((kind, query.clone()));
    }
    load(&context, kind, &query).await;
}

async fn load(context: &AppContextHandle, kind: EntityKind, query: &ListQuery) {
    let (api, size) = (context.api().await, context.page_size().await);
    match catalogs::list_entries(&api, kind, query, size).await {
        Ok(page) => {
            context
                .send(MessageFromBackend::CatalogListResponse { kind, page })
                .await;
        }
        Err(e) => {
            context
                .report_load_failure(PageKind::Catalogs, &e.into())
                .await;
        }
    }
}

/// Reloads the catalog table if it still shows `kind`.
async fn reload(context: &AppContextHandle, kind: EntityKind) {
    let last = context.state.read().await.last_catalog.clone();
    if let Some((shown, query)) = last {
        if shown == kind {
            load(context, kind, &query).await;
        }
    }
}

pub async fn handle_species_options(context: AppContextHandle) {
    let api = context.api().await;
    match catalogs::species_options(&api).await {
        Ok(species) => {
            context
                .send(MessageFromBackend::SpeciesOptionsResponse(species))
                .await;
        }
        Err(e) => context.report(&e.into()).await,
    }
}

pub async fn handle_save(context: AppContextHandle, id: Option<i64>, form: EntityForm) {
    let kind = form.kind();
    let result: Result<_, ServiceError> = async {
        let request = build_catalog_request(&form)?;
        let api = context.api().await;
        Ok(catalogs::save_entry(&api, id, &request).await?)
    }
    .await;

    match result {
        Ok(entry) => {
            log::info!("Saved {kind:?} entry {}", entry.id());
            let verb = if id.is_some() { "actualizado" } else { "creado" };
            context
                .send_toast(
                    ToastKind::Success,
                    format!("{} {verb}: {}", kind.label(), entry.display_name()),
                )
                .await;
            reload(&context, kind).await;
        }
        Err(e) => context.report(&e).await,
    }
}

pub async fn handle_set_active(context: AppContextHandle, kind: EntityKind, id: i64, active: bool) {
    let api = context.api().await;
    match catalogs::set_entry_active(&api, kind, id, active).await {
        Ok(()) => {
            let message = if active {
                "Registro reactivado."
            } else {
                "Registro desactivado."
            };
            context.send_toast(ToastKind::Success, message).await;
            reload(&context, kind).await;
        }
        Err(e) => context.report(&e.into()).await,
    }
}
