pub mod load_error;
pub mod notification_badge;
pub mod notification_dropdown;
pub mod notification_icon;
pub mod notification_item;
pub mod settings_item;
pub mod table_pager;
