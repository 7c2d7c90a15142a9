//! Hit testing: point → object, point → control handle.
//!
//! Tolerances are given in world units. Callers derive them from a fixed
//! screen-space radius via `Viewport::world_length`, so the clickable area
//! stays the same size on screen at every zoom level.

use scrawl_core::geometry::{Point, point_to_segment};
use scrawl_core::model::{Bounds, DrawObject, ObjectIndex, Scene};
use smallvec::{SmallVec, smallvec};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Screen-space distance within which a line or path counts as hit.
pub const HIT_TOLERANCE_PX: f64 = 6.0;

/// Screen-space radius of a grabbable handle.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// A named control point on an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Start,
    End,
    /// Path vertex by index.
    Vertex(usize),
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::TopLeft => f.write_str("tl"),
            Handle::TopRight => f.write_str("tr"),
            Handle::BottomLeft => f.write_str("bl"),
            Handle::BottomRight => f.write_str("br"),
            Handle::Start => f.write_str("start"),
            Handle::End => f.write_str("end"),
            Handle::Vertex(i) => write!(f, "p{i}"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown handle id {0:?}")]
pub struct HandleParseError(pub String);

impl FromStr for Handle {
    type Err = HandleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tl" => Ok(Handle::TopLeft),
            "tr" => Ok(Handle::TopRight),
            "bl" => Ok(Handle::BottomLeft),
            "br" => Ok(Handle::BottomRight),
            "start" => Ok(Handle::Start),
            "end" => Ok(Handle::End),
            _ => s
                .strip_prefix('p')
                .and_then(|n| n.parse().ok())
                .map(Handle::Vertex)
                .ok_or_else(|| HandleParseError(s.to_string())),
        }
    }
}

/// Control points of `obj`, in hit-test priority order.
///
/// Box corners are taken from the signed anchor + size, so after a sign
/// flip `TopLeft` is no longer visually top-left; it is always the anchor.
pub fn handles(obj: &DrawObject) -> SmallVec<[(Handle, Point); 4]> {
    match obj {
        DrawObject::Rect { x, y, w, h } | DrawObject::Text { x, y, w, h, .. } => smallvec![
            (Handle::TopLeft, Point::new(*x, *y)),
            (Handle::TopRight, Point::new(x + w, *y)),
            (Handle::BottomLeft, Point::new(*x, y + h)),
            (Handle::BottomRight, Point::new(x + w, y + h)),
        ],
        DrawObject::Line { x1, y1, x2, y2 } => smallvec![
            (Handle::Start, Point::new(*x1, *y1)),
            (Handle::End, Point::new(*x2, *y2)),
        ],
        DrawObject::Path { points } => points
            .iter()
            .enumerate()
            .map(|(i, p)| (Handle::Vertex(i), *p))
            .collect(),
    }
}

/// First handle of `obj` within `radius` of `p`.
pub fn hit_test_handle(obj: &DrawObject, p: Point, radius: f64) -> Option<Handle> {
    let r_sq = radius * radius;
    handles(obj)
        .into_iter()
        .find(|(_, hp)| p.distance_squared(*hp) <= r_sq)
        .map(|(h, _)| h)
}

/// Whether `p` touches `obj`.
///
/// Boxes use inclusive containment of the normalized box; lines and paths
/// use segment distance against `tolerance`.
pub fn hit_test_object(obj: &DrawObject, p: Point, tolerance: f64) -> bool {
    match obj {
        DrawObject::Rect { x, y, w, h } | DrawObject::Text { x, y, w, h, .. } => {
            Bounds::from_signed(*x, *y, *w, *h).contains(p)
        }
        DrawObject::Line { x1, y1, x2, y2 } => {
            point_to_segment(p, Point::new(*x1, *y1), Point::new(*x2, *y2)) <= tolerance
        }
        DrawObject::Path { points } => points
            .windows(2)
            .any(|seg| point_to_segment(p, seg[0], seg[1]) <= tolerance),
    }
}

/// Find the topmost object at `p`. Returns `None` over empty board.
pub fn hit_test(scene: &Scene, p: Point, tolerance: f64) -> Option<ObjectIndex> {
    scene
        .iter_topmost_first()
        .find(|(_, obj)| hit_test_object(obj, p, tolerance))
        .map(|(idx, _)| idx)
}
