//! Small helpers shared by the page forms.

use gpui::{App, AppContext, Context, Entity, SharedString, Window};
use gpui_component::{
    WindowExt,
    input::InputState,
    notification::{Notification, NotificationType},
};

pub fn text_input<T>(
    placeholder: impl Into<SharedString>,
    window: &mut Window,
    cx: &mut Context<T>,
) -> Entity<InputState> {
    let placeholder = placeholder.into();
    cx.new(|cx| InputState::new(window, cx).placeholder(placeholder))
}

/// Current text of an input, untrimmed.
pub fn value_of(input: &Entity<InputState>, cx: &App) -> String {
    input.read(cx).value().to_string()
}

pub fn set_value<T>(
    input: &Entity<InputState>,
    value: impl Into<SharedString>,
    window: &mut Window,
    cx: &mut Context<T>,
) {
    let value = value.into();
    input.update(cx, |state, cx| state.set_value(value, window, cx));
}

/// Shows a form problem that was caught before anything reached the backend.
pub fn warn(message: impl Into<SharedString>, window: &mut Window, cx: &mut App) {
    window.push_notification(
        Notification::new()
            .message(message)
            .with_type(NotificationType::Warning),
        cx,
    );
}
