//! In-place edit operations on a single object.
//!
//! Each operation is one exhaustive match over the variants. A handle that
//! does not belong to the object's variant, or a vertex index past the end
//! of a path, leaves the object untouched and reports `false`.

use scrawl_core::geometry::Point;
use scrawl_core::model::DrawObject;
use scrawl_render::hit::Handle;

/// Drag handle `handle` of `obj` to world point `p`.
///
/// Box corners keep the opposite corner fixed. Width and height are
/// recomputed as signed differences, so dragging past the opposite corner
/// flips their sign.
pub fn reshape(obj: &mut DrawObject, handle: Handle, p: Point) -> bool {
    match obj {
        DrawObject::Rect { x, y, w, h } | DrawObject::Text { x, y, w, h, .. } => {
            let far_x = *x + *w;
            let far_y = *y + *h;
            match handle {
                Handle::TopLeft => {
                    *x = p.x;
                    *y = p.y;
                    *w = far_x - p.x;
                    *h = far_y - p.y;
                }
                Handle::TopRight => {
                    *y = p.y;
                    *w = p.x - *x;
                    *h = far_y - p.y;
                }
                Handle::BottomLeft => {
                    *x = p.x;
                    *w = far_x - p.x;
                    *h = p.y - *y;
                }
                Handle::BottomRight => {
                    *w = p.x - *x;
                    *h = p.y - *y;
                }
                Handle::Start | Handle::End | Handle::Vertex(_) => return false,
            }
            true
        }
        DrawObject::Line { x1, y1, x2, y2 } => match handle {
            Handle::Start => {
                *x1 = p.x;
                *y1 = p.y;
                true
            }
            Handle::End => {
                *x2 = p.x;
                *y2 = p.y;
                true
            }
            _ => false,
        },
        DrawObject::Path { points } => match handle {
            Handle::Vertex(i) => match points.get_mut(i) {
                Some(pt) => {
                    *pt = p;
                    true
                }
                None => {
                    log::debug!("ignoring reshape of vertex {i} on a {}-point path", points.len());
                    false
                }
            },
            _ => false,
        },
    }
}

/// Replace the content of a text object. Other variants are left alone.
pub fn set_text(obj: &mut DrawObject, content: &str) -> bool {
    match obj {
        DrawObject::Text { text, .. } => {
            if text != content {
                *text = content.to_string();
            }
            true
        }
        _ => false,
    }
}

/// Recolour a text object. Other variants have no colour.
pub fn set_text_color(obj: &mut DrawObject, new_color: &str) -> bool {
    match obj {
        DrawObject::Text { color, .. } => {
            *color = new_color.to_string();
            true
        }
        _ => false,
    }
}
