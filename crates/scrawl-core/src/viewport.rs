//! Pan + zoom state and the screen ↔ world mapping.
//!
//! The forward map is `screen = world * scale + pan`. The board is
//! unbounded, so panning is never clamped; only the scale is.

use crate::geometry::Point;
use kurbo::Affine;

/// Allowed zoom range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self { min: 0.1, max: 4.0 }
    }
}

/// Wheel direction, already decoded from the delta sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Negative wheel delta (scrolling up) zooms in.
    pub fn from_wheel_delta(delta_y: f64) -> Self {
        if delta_y < 0.0 {
            ZoomDirection::In
        } else {
            ZoomDirection::Out
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Screen-space offset of the world origin.
    pub pan: Point,
    /// Zoom factor, always within `limits`.
    pub scale: f64,
    pub limits: ScaleLimits,
    /// Multipliers applied per zoom step.
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Point::ORIGIN,
            scale: 1.0,
            limits: ScaleLimits::default(),
            zoom_in_factor: 1.1,
            zoom_out_factor: 0.9,
        }
    }
}

impl Viewport {
    pub fn new(limits: ScaleLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn to_world(&self, screen: Point) -> Point {
        (screen - self.pan) / self.scale
    }

    pub fn to_screen(&self, world: Point) -> Point {
        world * self.scale + self.pan
    }

    /// Convert a screen-space length (e.g. a hit radius in pixels) to world
    /// units at the current zoom.
    pub fn world_length(&self, screen_px: f64) -> f64 {
        screen_px / self.scale
    }

    /// Zoom one step around `anchor` (screen space). The world point under
    /// the anchor stays under the anchor.
    pub fn zoom(&mut self, anchor: Point, direction: ZoomDirection) {
        let factor = match direction {
            ZoomDirection::In => self.zoom_in_factor,
            ZoomDirection::Out => self.zoom_out_factor,
        };
        let new_scale = (self.scale * factor).clamp(self.limits.min, self.limits.max);
        let world = self.to_world(anchor);
        self.pan = anchor - world * new_scale;
        self.scale = new_scale;
        log::trace!("zoom {direction:?} → scale {new_scale:.3}");
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    /// Re-center a drawing surface of `surface` size inside a container of
    /// `container` size. Scale is left alone.
    pub fn recenter(&mut self, container: (f64, f64), surface: (f64, f64)) {
        self.pan = Point::new((container.0 - surface.0) / 2.0, (container.1 - surface.1) / 2.0);
    }

    /// The world → screen map as an affine transform, for the render pass.
    pub fn transform(&self) -> Affine {
        Affine::translate((self.pan.x, self.pan.y)) * Affine::scale(self.scale)
    }
}
