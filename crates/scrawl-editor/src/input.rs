//! Input abstraction layer.
//!
//! Normalizes browser pointer, wheel, keyboard, and lifecycle events into a
//! single `InputEvent` enum consumed by the session. All positions are in
//! screen space (pixels relative to the drawing surface).

use scrawl_core::geometry::Point;

/// Which pointer button started a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    /// Right mouse button. Always pans.
    Secondary,
    Other(i16),
}

impl PointerButton {
    /// Map a DOM `PointerEvent.button` code.
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            n => Self::Other(n),
        }
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start, pen contact).
    PointerDown { x: f64, y: f64, button: PointerButton },

    PointerMove { x: f64, y: f64 },

    PointerUp { x: f64, y: f64 },

    /// Wheel step anchored at the cursor. Only the sign of `delta_y`
    /// matters: negative zooms in.
    Wheel { x: f64, y: f64, delta_y: f64 },

    KeyDown {
        key: String,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    },

    KeyUp { key: String },

    /// Double click; enters text editing on a text object under the cursor.
    DoubleClick { x: f64, y: f64 },

    /// The container was resized; `container` and `surface` are
    /// `(width, height)` pairs.
    Resize {
        container: (f64, f64),
        surface: (f64, f64),
    },

    /// The page is going away (page-hide). Pending saves flush now.
    Teardown,
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64, button: i16) -> Self {
        Self::PointerDown {
            x,
            y,
            button: PointerButton::from_dom(button),
        }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp { x, y }
    }

    /// Extract the screen position if this event carries one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y }
            | Self::Wheel { x, y, .. }
            | Self::DoubleClick { x, y } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }
}
