//! Board → immediate-mode drawing commands.
//!
//! The paint pass is backend-agnostic: it drives any [`Surface`] exposing
//! canvas-style primitives. The browser bridge implements it on top of
//! `CanvasRenderingContext2d`; tests record the calls.

use crate::hit::handles;
use kurbo::Affine;
use scrawl_core::model::{Bounds, DrawObject, ObjectIndex, Scene, TextAlign};
use scrawl_core::viewport::Viewport;

/// Stroke width of every shape, in screen pixels.
const STROKE_PX: f64 = 2.0;

/// Radius of a drawn handle dot, in screen pixels.
const HANDLE_DOT_PX: f64 = 6.0;

/// Font and colour for a single `fill_text` call. Text is drawn with a
/// top baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle<'a> {
    pub font_px: f64,
    pub align: TextAlign,
    pub color: &'a str,
}

/// An immediate-mode 2D drawing target.
pub trait Surface {
    /// Replace the current transform with `[a, b, c, d, e, f]`.
    fn set_transform(&mut self, coeffs: [f64; 6]);

    /// Fill the whole surface (in the current transform) with `color`.
    fn clear(&mut self, width: f64, height: f64, color: &str);

    /// Stroke colour and width for following strokes. Caps are round.
    fn set_stroke(&mut self, color: &str, width: f64);

    fn set_fill(&mut self, color: &str);

    fn begin_path(&mut self);

    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    fn stroke(&mut self);

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64);

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle<'_>);
}

/// Theme-dependent colors for the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: &'static str,
    pub ink: &'static str,
    pub handle: &'static str,
}

impl Theme {
    /// Plain white paper.
    pub fn light() -> Self {
        Self {
            background: "#FFFFFF",
            ink: "#000000",
            handle: "orange",
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#1C1C1E",
            ink: "#F5F5F7",
            handle: "orange",
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// Everything one paint pass reads.
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub viewport: &'a Viewport,
    /// In-progress object that is not in the scene yet.
    pub current: Option<&'a DrawObject>,
    pub selected: Option<ObjectIndex>,
    /// Text object whose glyphs are hidden behind the host's text input.
    pub editing: Option<ObjectIndex>,
    pub width: f64,
    pub height: f64,
    pub theme: &'a Theme,
}

/// Paint the whole board.
///
/// Call on every state change with the full surface size; the pass clears
/// first, so it does not depend on what was drawn before.
pub fn paint_board<S: Surface + ?Sized>(surface: &mut S, frame: &Frame<'_>) {
    surface.set_transform(Affine::IDENTITY.as_coeffs());
    surface.clear(frame.width, frame.height, frame.theme.background);
    surface.set_transform(frame.viewport.transform().as_coeffs());

    let line_width = frame.viewport.world_length(STROKE_PX);
    for (i, obj) in frame.scene.iter().enumerate() {
        let idx = ObjectIndex(i);
        let outlined = frame.selected == Some(idx) || frame.editing == Some(idx);
        paint_object(surface, obj, frame.theme, line_width, outlined, frame.editing == Some(idx));
    }
    if let Some(current) = frame.current {
        paint_object(surface, current, frame.theme, line_width, false, false);
    }

    if let Some(obj) = frame.selected.and_then(|idx| frame.scene.get(idx)) {
        paint_handles(surface, obj, frame.theme, frame.viewport);
    }
    log::trace!("painted {} object(s)", frame.scene.len());
}

fn paint_object<S: Surface + ?Sized>(
    surface: &mut S,
    obj: &DrawObject,
    theme: &Theme,
    line_width: f64,
    outlined: bool,
    editing: bool,
) {
    surface.set_stroke(theme.ink, line_width);
    match obj {
        DrawObject::Path { points } => {
            let Some((first, rest)) = points.split_first() else {
                return;
            };
            surface.begin_path();
            surface.move_to(first.x, first.y);
            for p in rest {
                surface.line_to(p.x, p.y);
            }
            surface.stroke();
        }
        DrawObject::Rect { x, y, w, h } => surface.stroke_rect(*x, *y, *w, *h),
        DrawObject::Line { x1, y1, x2, y2 } => {
            surface.begin_path();
            surface.move_to(*x1, *y1);
            surface.line_to(*x2, *y2);
            surface.stroke();
        }
        DrawObject::Text {
            x,
            y,
            w,
            h,
            text,
            align,
            color,
        } => {
            let b = Bounds::from_signed(*x, *y, *w, *h);
            if outlined {
                surface.stroke_rect(b.min.x, b.min.y, b.width(), b.height());
            }
            if editing || text.is_empty() {
                return;
            }
            let anchor_x = match align {
                TextAlign::Left => b.min.x,
                TextAlign::Center => (b.min.x + b.max.x) / 2.0,
                TextAlign::Right => b.max.x,
            };
            let style = TextStyle {
                font_px: h.abs(),
                align: *align,
                color: color.as_str(),
            };
            surface.fill_text(text, anchor_x, b.min.y, &style);
        }
    }
}

fn paint_handles<S: Surface + ?Sized>(
    surface: &mut S,
    obj: &DrawObject,
    theme: &Theme,
    viewport: &Viewport,
) {
    let r = viewport.world_length(HANDLE_DOT_PX);
    surface.set_fill(theme.handle);
    for (_, p) in handles(obj) {
        surface.fill_circle(p.x, p.y, r);
    }
}
