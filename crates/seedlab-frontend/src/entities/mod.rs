use gpui::{AppContext, Entity};
use seedlab_bridge::PageKind;

pub mod analysis_entity;
pub mod catalog_entity;
pub mod lotes_entity;
pub mod notifications_entity;
pub mod settings_entity;
pub mod users_entity;

#[derive(Debug, Clone)]
pub struct DataEntities {
    pub settings: Entity<settings_entity::SettingsEntity>,
    pub notifications: Entity<notifications_entity::NotificationsEntity>,
    pub lotes: Entity<lotes_entity::LotesEntity>,
    pub species: Entity<lotes_entity::SpeciesOptionsEntity>,
    pub catalog: Entity<catalog_entity::CatalogEntity>,
    pub users: Entity<users_entity::UsersEntity>,
    pub analysis: Entity<analysis_entity::AnalysisEntity>,
}

impl DataEntities {
    /// Records that a page failed to load so it can offer a retry.
    pub fn set_load_error<C: AppContext>(&self, page: PageKind, message: String, cx: &mut C) {
        match page {
            PageKind::Lotes => {
                self.lotes.update(cx, |this, cx| {
                    this.load_error = Some(message);
                    cx.notify();
                });
            }
            PageKind::Catalogs => {
                self.catalog.update(cx, |this, cx| {
                    this.load_error = Some(message);
                    cx.notify();
                });
            }
            PageKind::Users => {
                self.users.update(cx, |this, cx| {
                    this.load_error = Some(message);
                    cx.notify();
                });
            }
            PageKind::Analysis => {
                self.analysis.update(cx, |this, cx| {
                    this.editor = None;
                    this.load_error = Some(message);
                    cx.notify();
                });
            }
            // The notification layer reports its own failures in the snapshot.
            PageKind::Notifications => log::warn!("Notifications failed to load: {message}"),
        }
    }
}
