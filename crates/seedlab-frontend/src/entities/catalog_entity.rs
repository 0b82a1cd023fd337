use gpui::{AppContext, Entity};
use seedlab_bridge::{
    catalog::{CatalogEntry, CatalogType, EntityKind},
    page::{ListQuery, Page},
};

#[derive(Debug, Clone)]
pub struct CatalogEntity {
    pub kind: EntityKind,
    pub query: ListQuery,
    pub page: Page<CatalogEntry>,
    pub load_error: Option<String>,
}

impl Default for CatalogEntity {
    fn default() -> Self {
        Self {
            kind: EntityKind::Lookup(CatalogType::Humedad),
            query: ListQuery::default(),
            page: Page::default(),
            load_error: None,
        }
    }
}

impl CatalogEntity {
    /// Stores a page unless the user already switched to another entity.
    pub fn update<C: AppContext>(
        entity: &Entity<Self>,
        kind: EntityKind,
        page: Page<CatalogEntry>,
        cx: &mut C,
    ) {
        entity.update(cx, |this, cx| {
            if this.kind != kind {
                log::debug!("Dropping stale {kind:?} page");
                return;
            }
            this.page = page;
            this.load_error = None;
            cx.notify();
        });
    }
}
