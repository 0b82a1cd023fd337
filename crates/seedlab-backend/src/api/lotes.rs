use seedlab_bridge::{
    analysis::AnalysisKind,
    lote::{Lote, LoteFilter, LoteListItem, LoteRequest, LoteSimple, RemovalCheck},
    page::Page,
};

use super::{
    ApiClient,
    pagination::{PageQuery, extract_page},
};
use crate::error::ApiError;

pub async fn list_lotes(
    client: &ApiClient,
    filter: &LoteFilter,
    size: u32,
) -> Result<Page<LoteListItem>, ApiError> {
    let query = PageQuery::from_list(&filter.query, size)
        .sort(filter.sort.as_deref())
        .optional("cultivar", filter.cultivar.as_deref());
    let value = client
        .get_json::<serde_json::Value>("/api/lotes/listado", query.as_pairs())
        .await?;
    extract_page(value)
}

pub async fn get_lote(client: &ApiClient, id: i64) -> Result<Lote, ApiError> {
    client.get_json(&format!("/api/lotes/{id}"), &[]).await
}

pub async fn create_lote(client: &ApiClient, request: &LoteRequest) -> Result<Lote, ApiError> {
    client.post_json("/api/lotes", request).await
}

pub async fn update_lote(
    client: &ApiClient,
    id: i64,
    request: &LoteRequest,
) -> Result<Lote, ApiError> {
    client.put_json(&format!("/api/lotes/{id}"), request).await
}

/// Soft delete: the backend flips `activo` to false and keeps the row.
pub async fn deactivate_lote(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client.delete(&format!("/api/lotes/{id}")).await
}

pub async fn reactivate_lote(client: &ApiClient, id: i64) -> Result<Lote, ApiError> {
    client.put_empty(&format!("/api/lotes/{id}/reactivar")).await
}

/// Lotes that may receive a new analysis of the given kind.
pub async fn eligible_lotes(
    client: &ApiClient,
    kind: AnalysisKind,
) -> Result<Vec<LoteSimple>, ApiError> {
    client
        .get_json(&format!("/api/lotes/elegibles/{}", kind.as_str()), &[])
        .await
}

/// Whether an analysis kind can be unassigned from the lote, i.e. no
/// analysis of that kind was started yet.
pub async fn can_remove_analysis_kind(
    client: &ApiClient,
    id: i64,
    kind: AnalysisKind,
) -> Result<RemovalCheck, ApiError> {
    client
        .get_json(
            &format!("/api/lotes/{id}/puede-remover-tipo/{}", kind.as_str()),
            &[],
        )
        .await
}
