//! Catalog-like resources: lookup tables, species, cultivars and weeds.
//!
//! They share one listing/create/update/deactivate/reactivate shape, so the
//! functions here dispatch on [`EntityKind`] to pick the endpoint and the row
//! type.

use serde::Serialize;
use seedlab_bridge::{
    catalog::{CatalogEntry, CatalogItem, CatalogType, Cultivar, EntityKind, Species, Weed},
    page::{ListQuery, Page},
};

use super::{
    ApiClient,
    pagination::{PageQuery, extract_page},
};
use crate::error::ApiError;

/// Request body of a catalog-like entity, already validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CatalogRequest {
    Lookup(LookupRequest),
    Species(SpeciesRequest),
    Cultivar(CultivarRequest),
    Weed(WeedRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub tipo: CatalogType,
    pub valor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesRequest {
    pub nombre_comun: String,
    pub nombre_cientifico: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CultivarRequest {
    pub especie_id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeedRequest {
    pub nombre_comun: String,
    pub nombre_cientifico: Option<String>,
}

impl CatalogRequest {
    pub fn kind(&self) -> EntityKind {
        match self {
            CatalogRequest::Lookup(request) => EntityKind::Lookup(request.tipo),
            CatalogRequest::Species(_) => EntityKind::Species,
            CatalogRequest::Cultivar(_) => EntityKind::Cultivar,
            CatalogRequest::Weed(_) => EntityKind::Weed,
        }
    }
}

fn base_path(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Lookup(_) => "/api/catalogo",
        EntityKind::Species => "/api/especie",
        EntityKind::Cultivar => "/api/cultivar",
        EntityKind::Weed => "/api/malezas",
    }
}

fn decode_entry(kind: EntityKind, value: serde_json::Value) -> Result<CatalogEntry, ApiError> {
    Ok(match kind {
        EntityKind::Lookup(_) => CatalogEntry::Lookup(serde_json::from_value::<CatalogItem>(value)?),
        EntityKind::Species => CatalogEntry::Species(serde_json::from_value::<Species>(value)?),
        EntityKind::Cultivar => CatalogEntry::Cultivar(serde_json::from_value::<Cultivar>(value)?),
        EntityKind::Weed => CatalogEntry::Weed(serde_json::from_value::<Weed>(value)?),
    })
}

pub async fn list_entries(
    client: &ApiClient,
    kind: EntityKind,
    query: &ListQuery,
    size: u32,
) -> Result<Page<CatalogEntry>, ApiError> {
    let mut page_query = PageQuery::from_list(query, size);
    if let EntityKind::Lookup(tipo) = kind {
        page_query = page_query.param("tipo", tipo.as_str());
    }

    let value = client
        .get_json::<serde_json::Value>(
            &format!("{}/listado", base_path(kind)),
            page_query.as_pairs(),
        )
        .await?;
    let page: Page<serde_json::Value> = extract_page(value)?;

    let content = page
        .content
        .into_iter()
        .map(|row| decode_entry(kind, row))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page {
        content,
        total_elements: page.total_elements,
        total_pages: page.total_pages,
        number: page.number,
        first: page.first,
        last: page.last,
    })
}

/// Creates the entity when `id` is `None`, updates it otherwise.
pub async fn save_entry(
    client: &ApiClient,
    id: Option<i64>,
    request: &CatalogRequest,
) -> Result<CatalogEntry, ApiError> {
    let kind = request.kind();
    let base = base_path(kind);
    let value: serde_json::Value = match id {
        Some(id) => client.put_json(&format!("{base}/{id}"), request).await?,
        None => client.post_json(base, request).await?,
    };
    decode_entry(kind, value)
}

pub async fn set_entry_active(
    client: &ApiClient,
    kind: EntityKind,
    id: i64,
    active: bool,
) -> Result<(), ApiError> {
    let base = base_path(kind);
    if active {
        client.put_no_content(&format!("{base}/{id}/reactivar")).await
    } else {
        client.delete(&format!("{base}/{id}")).await
    }
}

/// Every active species, for the cultivar form.
pub async fn species_options(client: &ApiClient) -> Result<Vec<Species>, ApiError> {
    let page = list_entries(client, EntityKind::Species, &ListQuery::default(), 1000).await?;
    Ok(page
        .content
        .into_iter()
        .filter_map(|entry| match entry {
            CatalogEntry::Species(species) => Some(species),
            _ => None,
        })
        .collect())
}
