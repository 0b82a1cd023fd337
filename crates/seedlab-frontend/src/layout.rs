//! Placement of the notification dropdown relative to the bell.

/// Viewports narrower than this get a full-width panel.
pub const NARROW_VIEWPORT: f32 = 640.0;
/// Gap kept between the panel and the viewport edges or the trigger.
pub const EDGE_MARGIN: f32 = 8.0;
/// Width of the panel on regular viewports.
pub const PANEL_WIDTH: f32 = 380.0;

/// Window-relative bounds of the element that opened the dropdown.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TriggerBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl TriggerBounds {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

impl From<gpui::Bounds<gpui::Pixels>> for TriggerBounds {
    fn from(bounds: gpui::Bounds<gpui::Pixels>) -> Self {
        Self {
            left: f32::from(bounds.origin.x),
            top: f32::from(bounds.origin.y),
            width: f32::from(bounds.size.width),
            height: f32::from(bounds.size.height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropdownPosition {
    pub left: f32,
    pub top: f32,
    pub width: f32,
}

/// Computes where the dropdown opens.
///
/// Narrow viewports get a panel spanning the viewport minus the margins.
/// Otherwise the panel's right edge aligns with the trigger's right edge and
/// is then clamped so that it stays inside the viewport.
pub fn dropdown_position(trigger: TriggerBounds, viewport_width: f32) -> DropdownPosition {
    let top = trigger.bottom() + EDGE_MARGIN;

    if viewport_width < NARROW_VIEWPORT {
        return DropdownPosition {
            left: EDGE_MARGIN,
            top,
            width: (viewport_width - 2.0 * EDGE_MARGIN).max(0.0),
        };
    }

    let width = PANEL_WIDTH.min(viewport_width - 2.0 * EDGE_MARGIN);
    let max_left = viewport_width - width - EDGE_MARGIN;
    let left = (trigger.right() - width).clamp(EDGE_MARGIN, max_left);

    DropdownPosition { left, top, width }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn bell_at(left: f32) -> TriggerBounds {
        TriggerBounds {
            left,
            top: 12.0,
            width: 32.0,
            height: 32.0,
        }
    }

    #[test]
    fn narrow_viewport_spans_the_width() {
        let position = dropdown_position(bell_at(500.0), 600.0);
        assert_eq!(
            position,
            DropdownPosition {
                left: 8.0,
                top: 52.0,
                width: 584.0
            }
        );
    }

    #[test]
    fn right_aligns_with_the_trigger() {
        let position = dropdown_position(bell_at(900.0), 1280.0);
        assert_eq!(position.left, 932.0 - PANEL_WIDTH);
        assert_eq!(position.top, 52.0);
        assert_eq!(position.width, PANEL_WIDTH);
    }

    #[test]
    fn clamped_inside_the_viewport() {
        let near_left = dropdown_position(bell_at(20.0), 1024.0);
        assert_eq!(near_left.left, EDGE_MARGIN);

        let past_right = dropdown_position(bell_at(1010.0), 1024.0);
        assert_eq!(past_right.left, 1024.0 - PANEL_WIDTH - EDGE_MARGIN);
    }
}
