//! Core scene data model for Scrawl boards.
//!
//! A board is a flat, ordered list of drawable objects. Order is paint
//! order: the last object is drawn on top and is the first one hit-tested.
//! Objects are a closed set of variants; every operation over them is a
//! single exhaustive `match`.

use crate::geometry::{Point, span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Colour given to text objects that were saved before text had a colour.
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

fn default_text_color() -> String {
    DEFAULT_TEXT_COLOR.to_string()
}

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`. The leading `#` is required,
    /// matching what the colour palette hands us.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let bytes = hex.strip_prefix('#')?.as_bytes();
        let pair =
            |i: usize| -> Option<u8> { Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) };

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgba(r * 17, g * 17, b * 17, 255))
            }
            6 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, 255)),
            8 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
            _ => None,
        }
    }
}

// ─── Text alignment ──────────────────────────────────────────────────────

/// Horizontal alignment of text inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    #[serde(alias = "start")]
    Left,
    Center,
    #[serde(alias = "end")]
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

// ─── Draw objects ────────────────────────────────────────────────────────

/// Discriminant of a [`DrawObject`]. Fixed for the lifetime of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Path,
    Rect,
    Line,
    Text,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjectKind::Path => "path",
            ObjectKind::Rect => "rect",
            ObjectKind::Line => "line",
            ObjectKind::Text => "text",
        })
    }
}

/// A drawable object in world space.
///
/// `Rect` and `Text` carry a signed size: negative `w`/`h` mean the box
/// extends left/up from `(x, y)`. The sign is never normalized away, so
/// every consumer must go through [`DrawObject::bounds`] or [`span`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DrawObject {
    /// Freehand stroke through the points, in order.
    Path { points: Vec<Point> },
    Rect { x: f64, y: f64, w: f64, h: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Text box. Glyph height follows `|h|`.
    Text {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        text: String,
        #[serde(default)]
        align: TextAlign,
        #[serde(default = "default_text_color")]
        color: String,
    },
}

/// Axis-aligned box with `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Normalize a box given as an anchor plus signed size.
    pub fn from_signed(x: f64, y: f64, w: f64, h: f64) -> Self {
        let (x0, x1) = span(x, w);
        let (y0, y1) = span(y, h);
        Self {
            min: Point::new(x0, y0),
            max: Point::new(x1, y1),
        }
    }

    /// Inclusive containment on all four edges.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

impl DrawObject {
    /// A one-point freehand stroke.
    pub fn path_at(p: Point) -> Self {
        DrawObject::Path { points: vec![p] }
    }

    /// A zero-size rectangle anchored at `p`.
    pub fn rect_at(p: Point) -> Self {
        DrawObject::Rect {
            x: p.x,
            y: p.y,
            w: 0.0,
            h: 0.0,
        }
    }

    /// A zero-length line starting and ending at `p`.
    pub fn line_at(p: Point) -> Self {
        DrawObject::Line {
            x1: p.x,
            y1: p.y,
            x2: p.x,
            y2: p.y,
        }
    }

    /// An empty, zero-size text box anchored at `p`.
    pub fn text_at(p: Point, color: &str) -> Self {
        DrawObject::Text {
            x: p.x,
            y: p.y,
            w: 0.0,
            h: 0.0,
            text: String::new(),
            align: TextAlign::Left,
            color: color.to_string(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            DrawObject::Path { .. } => ObjectKind::Path,
            DrawObject::Rect { .. } => ObjectKind::Rect,
            DrawObject::Line { .. } => ObjectKind::Line,
            DrawObject::Text { .. } => ObjectKind::Text,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, DrawObject::Text { .. })
    }

    /// Grow an in-progress object toward `p`: paths append, boxes resize
    /// from their anchor (size may go negative), lines move their end.
    pub fn extend_to(&mut self, p: Point) {
        match self {
            DrawObject::Path { points } => points.push(p),
            DrawObject::Rect { x, y, w, h } | DrawObject::Text { x, y, w, h, .. } => {
                *w = p.x - *x;
                *h = p.y - *y;
            }
            DrawObject::Line { x2, y2, .. } => {
                *x2 = p.x;
                *y2 = p.y;
            }
        }
    }

    /// Translate every coordinate by `d`. Boxes move rigidly.
    pub fn translate(&mut self, d: Point) {
        match self {
            DrawObject::Path { points } => {
                for pt in points {
                    *pt += d;
                }
            }
            DrawObject::Rect { x, y, .. } | DrawObject::Text { x, y, .. } => {
                *x += d.x;
                *y += d.y;
            }
            DrawObject::Line { x1, y1, x2, y2 } => {
                *x1 += d.x;
                *y1 += d.y;
                *x2 += d.x;
                *y2 += d.y;
            }
        }
    }

    /// Normalized bounding box. `None` for a path without points.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            DrawObject::Rect { x, y, w, h } | DrawObject::Text { x, y, w, h, .. } => {
                Some(Bounds::from_signed(*x, *y, *w, *h))
            }
            DrawObject::Line { x1, y1, x2, y2 } => {
                Some(Bounds::from_signed(*x1, *y1, x2 - x1, y2 - y1))
            }
            DrawObject::Path { points } => {
                let first = points.first()?;
                let init = Bounds {
                    min: *first,
                    max: *first,
                };
                Some(points.iter().fold(init, |b, p| Bounds {
                    min: Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
                    max: Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
                }))
            }
        }
    }
}

// ─── Scene ───────────────────────────────────────────────────────────────

/// Position of an object in the [`Scene`]. Stays valid until the scene is
/// replaced wholesale (undo, redo, load, clear).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIndex(pub usize);

impl fmt::Display for ObjectIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The ordered object list that makes up a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scene {
    objects: Vec<DrawObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_objects(objects: Vec<DrawObject>) -> Self {
        Self { objects }
    }

    /// Append an object on top and return its index.
    pub fn push(&mut self, obj: DrawObject) -> ObjectIndex {
        self.objects.push(obj);
        ObjectIndex(self.objects.len() - 1)
    }

    pub fn get(&self, idx: ObjectIndex) -> Option<&DrawObject> {
        self.objects.get(idx.0)
    }

    pub fn get_mut(&mut self, idx: ObjectIndex) -> Option<&mut DrawObject> {
        self.objects.get_mut(idx.0)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Bottom-to-top (paint order).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &DrawObject> {
        self.objects.iter()
    }

    /// Top-to-bottom with indices (hit-test order).
    pub fn iter_topmost_first(&self) -> impl Iterator<Item = (ObjectIndex, &DrawObject)> {
        self.objects
            .iter()
            .enumerate()
            .rev()
            .map(|(i, o)| (ObjectIndex(i), o))
    }

    pub fn objects(&self) -> &[DrawObject] {
        &self.objects
    }

    pub(crate) fn objects_mut(&mut self) -> &mut Vec<DrawObject> {
        &mut self.objects
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
