//! Drawing tools.
//!
//! The active tool decides what a primary pointer-down on the board does:
//! the creation tools start a new object at the pointer, `Select` picks or
//! pans.

use scrawl_core::geometry::Point;
use scrawl_core::model::DrawObject;
use std::fmt;

/// The active tool determines how pointer input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    /// Freehand pen.
    #[default]
    Draw,
    Rect,
    Line,
    Text,
    Select,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Draw,
        ToolKind::Rect,
        ToolKind::Line,
        ToolKind::Text,
        ToolKind::Select,
    ];

    /// Parse a toolbar name. Unknown names return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "draw" | "pen" => Some(ToolKind::Draw),
            "rect" => Some(ToolKind::Rect),
            "line" => Some(ToolKind::Line),
            "text" => Some(ToolKind::Text),
            "select" => Some(ToolKind::Select),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Draw => "draw",
            ToolKind::Rect => "rect",
            ToolKind::Line => "line",
            ToolKind::Text => "text",
            ToolKind::Select => "select",
        }
    }

    /// Whether pointer-down with this tool creates an object.
    pub fn creates(self) -> bool {
        self != ToolKind::Select
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Start a zero-size object of the variant matching `tool` at `p` (world
/// space). `Select` creates nothing.
pub fn begin_object(tool: ToolKind, p: Point, text_color: &str) -> Option<DrawObject> {
    match tool {
        ToolKind::Draw => Some(DrawObject::path_at(p)),
        ToolKind::Rect => Some(DrawObject::rect_at(p)),
        ToolKind::Line => Some(DrawObject::line_at(p)),
        ToolKind::Text => Some(DrawObject::text_at(p, text_color)),
        ToolKind::Select => None,
    }
}
