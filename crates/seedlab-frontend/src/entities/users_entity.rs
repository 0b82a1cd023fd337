use gpui::{AppContext, Entity};
use seedlab_bridge::{
    page::{ListQuery, Page},
    user::{User, UserStatus},
};

#[derive(Debug, Clone, Default)]
pub struct UsersEntity {
    pub page: Page<User>,
    pub pending: Vec<User>,
    pub query: ListQuery,
    pub status: Option<UserStatus>,
    pub load_error: Option<String>,
}

impl UsersEntity {
    pub fn update<C: AppContext>(entity: &Entity<Self>, page: Page<User>, cx: &mut C) {
        entity.update(cx, |this, cx| {
            this.page = page;
            this.load_error = None;
            cx.notify();
        });
    }

    pub fn update_pending<C: AppContext>(entity: &Entity<Self>, pending: Vec<User>, cx: &mut C) {
        entity.update(cx, |this, cx| {
            this.pending = pending;
            cx.notify();
        });
    }
}
