use gpui::{AppContext, Entity};
use seedlab_bridge::{
    catalog::Species,
    lote::{Lote, LoteFilter, LoteListItem},
    page::Page,
};

#[derive(Debug, Clone, Default)]
pub struct LotesEntity {
    pub page: Page<LoteListItem>,
    /// Filter of the last request, reused by pagination.
    pub filter: LoteFilter,
    pub load_error: Option<String>,
}

impl LotesEntity {
    pub fn update<C: AppContext>(entity: &Entity<Self>, page: Page<LoteListItem>, cx: &mut C) {
        entity.update(cx, |this, cx| {
            this.page = page;
            this.load_error = None;
            cx.notify();
        });
    }
}

/// A lote was loaded for editing.
#[derive(Debug, Clone)]
pub struct LoteOpened(pub Lote);

impl LotesEntity {
    pub fn open<C: AppContext>(entity: &Entity<Self>, lote: Lote, cx: &mut C) {
        entity.update(cx, |_, cx| cx.emit(LoteOpened(lote)));
    }
}

impl gpui::EventEmitter<LoteOpened> for LotesEntity {}

/// Options offered by the species select of the cultivar form.
#[derive(Debug, Clone, Default)]
pub struct SpeciesOptionsEntity {
    pub species: Vec<Species>,
}

impl SpeciesOptionsEntity {
    pub fn update<C: AppContext>(entity: &Entity<Self>, species: Vec<Species>, cx: &mut C) {
        entity.update(cx, |this, cx| {
            this.species = species;
            cx.notify();
        });
    }
}
