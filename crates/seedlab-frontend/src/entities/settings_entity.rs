use gpui::{AppContext, Entity};
use seedlab_bridge::config::Config;

#[derive(Debug, Clone, Default)]
pub struct SettingsEntity {
    pub config: Config,
    /// Set once the backend answered; the settings form waits for it.
    pub loaded: bool,
}

impl SettingsEntity {
    pub fn update<C: AppContext>(entity: &Entity<Self>, config: Config, cx: &mut C) {
        entity.update(cx, |this, cx| {
            this.config = config;
            this.loaded = true;
            cx.notify();
        });
    }
}
