//! Integration tests: board → paint commands.
//!
//! Drives `paint_board` against a surface that records every call, then
//! checks the command stream the canvas would receive.

use pretty_assertions::assert_eq;
use scrawl_core::geometry::Point;
use scrawl_core::model::{DrawObject, ObjectIndex, Scene, TextAlign};
use scrawl_core::viewport::Viewport;
use scrawl_render::{Frame, Surface, TextStyle, Theme, paint_board};

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Transform([f64; 6]),
    Clear(String),
    Stroke(String, f64),
    Fill(String),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    StrokePath,
    StrokeRect(f64, f64, f64, f64),
    Circle(f64, f64, f64),
    Text(String, f64, f64, f64, TextAlign, String),
}

#[derive(Default)]
struct Recorder {
    ops: Vec<Op>,
}

impl Surface for Recorder {
    fn set_transform(&mut self, coeffs: [f64; 6]) {
        self.ops.push(Op::Transform(coeffs));
    }
    fn clear(&mut self, _width: f64, _height: f64, color: &str) {
        self.ops.push(Op::Clear(color.to_string()));
    }
    fn set_stroke(&mut self, color: &str, width: f64) {
        self.ops.push(Op::Stroke(color.to_string(), width));
    }
    fn set_fill(&mut self, color: &str) {
        self.ops.push(Op::Fill(color.to_string()));
    }
    fn begin_path(&mut self) {
        self.ops.push(Op::BeginPath);
    }
    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::MoveTo(x, y));
    }
    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(Op::LineTo(x, y));
    }
    fn stroke(&mut self) {
        self.ops.push(Op::StrokePath);
    }
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(Op::StrokeRect(x, y, w, h));
    }
    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64) {
        self.ops.push(Op::Circle(cx, cy, r));
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle<'_>) {
        self.ops.push(Op::Text(
            text.to_string(),
            x,
            y,
            style.font_px,
            style.align,
            style.color.to_string(),
        ));
    }
}

fn frame<'a>(scene: &'a Scene, viewport: &'a Viewport, theme: &'a Theme) -> Frame<'a> {
    Frame {
        scene,
        viewport,
        current: None,
        selected: None,
        editing: None,
        width: 800.0,
        height: 600.0,
        theme,
    }
}

fn text(w: f64, h: f64, align: TextAlign) -> DrawObject {
    DrawObject::Text {
        x: 100.0,
        y: 50.0,
        w,
        h,
        text: "hello".into(),
        align,
        color: "#E53935".into(),
    }
}

#[test]
fn clears_then_applies_viewport_transform() {
    let scene = Scene::new();
    let viewport = Viewport {
        pan: Point::new(10.0, 20.0),
        scale: 2.0,
        ..Viewport::default()
    };
    let theme = Theme::light();
    let mut rec = Recorder::default();
    paint_board(&mut rec, &frame(&scene, &viewport, &theme));

    assert_eq!(
        rec.ops,
        vec![
            Op::Transform([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]),
            Op::Clear("#FFFFFF".into()),
            Op::Transform([2.0, 0.0, 0.0, 2.0, 10.0, 20.0]),
        ]
    );
}

#[test]
fn shapes_use_canvas_primitives_with_zoom_invariant_width() {
    let mut scene = Scene::new();
    scene.push(DrawObject::Path {
        points: vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)],
    });
    scene.push(DrawObject::Rect {
        x: 1.0,
        y: 2.0,
        w: -3.0,
        h: 4.0,
    });
    scene.push(DrawObject::Line {
        x1: 0.0,
        y1: 0.0,
        x2: 9.0,
        y2: 9.0,
    });
    let viewport = Viewport {
        scale: 4.0,
        ..Viewport::default()
    };
    let theme = Theme::light();
    let mut rec = Recorder::default();
    paint_board(&mut rec, &frame(&scene, &viewport, &theme));

    let body: Vec<Op> = rec.ops.into_iter().skip(3).collect();
    assert_eq!(
        body,
        vec![
            Op::Stroke("#000000".into(), 0.5),
            Op::BeginPath,
            Op::MoveTo(0.0, 0.0),
            Op::LineTo(5.0, 5.0),
            Op::StrokePath,
            Op::Stroke("#000000".into(), 0.5),
            Op::StrokeRect(1.0, 2.0, -3.0, 4.0),
            Op::Stroke("#000000".into(), 0.5),
            Op::BeginPath,
            Op::MoveTo(0.0, 0.0),
            Op::LineTo(9.0, 9.0),
            Op::StrokePath,
        ]
    );
}

#[test]
fn text_is_aligned_inside_normalized_box() {
    let mut scene = Scene::new();
    scene.push(text(-40.0, -20.0, TextAlign::Right));
    scene.push(text(40.0, 20.0, TextAlign::Center));
    let viewport = Viewport::default();
    let theme = Theme::light();
    let mut rec = Recorder::default();
    paint_board(&mut rec, &frame(&scene, &viewport, &theme));

    let texts: Vec<Op> = rec
        .ops
        .into_iter()
        .filter(|op| matches!(op, Op::Text(..)))
        .collect();
    assert_eq!(
        texts,
        vec![
            Op::Text("hello".into(), 100.0, 30.0, 20.0, TextAlign::Right, "#E53935".into()),
            Op::Text("hello".into(), 120.0, 50.0, 20.0, TextAlign::Center, "#E53935".into()),
        ]
    );
}

#[test]
fn editing_text_shows_outline_but_hides_glyphs() {
    let mut scene = Scene::new();
    scene.push(text(40.0, 20.0, TextAlign::Left));
    let viewport = Viewport::default();
    let theme = Theme::light();
    let mut f = frame(&scene, &viewport, &theme);
    f.editing = Some(ObjectIndex(0));
    let mut rec = Recorder::default();
    paint_board(&mut rec, &f);

    assert!(rec.ops.contains(&Op::StrokeRect(100.0, 50.0, 40.0, 20.0)));
    assert!(!rec.ops.iter().any(|op| matches!(op, Op::Text(..))));
}

#[test]
fn selected_object_gets_handle_dots() {
    let mut scene = Scene::new();
    scene.push(DrawObject::Line {
        x1: 0.0,
        y1: 0.0,
        x2: 10.0,
        y2: 0.0,
    });
    let viewport = Viewport {
        scale: 2.0,
        ..Viewport::default()
    };
    let theme = Theme::light();
    let mut f = frame(&scene, &viewport, &theme);
    f.selected = Some(ObjectIndex(0));
    let mut rec = Recorder::default();
    paint_board(&mut rec, &f);

    let tail: Vec<Op> = rec.ops.iter().rev().take(3).rev().cloned().collect();
    assert_eq!(
        tail,
        vec![
            Op::Fill("orange".into()),
            Op::Circle(0.0, 0.0, 3.0),
            Op::Circle(10.0, 0.0, 3.0),
        ]
    );
}

#[test]
fn in_progress_object_is_painted_last() {
    let scene = Scene::new();
    let current = DrawObject::rect_at(Point::new(5.0, 5.0));
    let viewport = Viewport::default();
    let theme = Theme::dark();
    let mut f = frame(&scene, &viewport, &theme);
    f.current = Some(&current);
    let mut rec = Recorder::default();
    paint_board(&mut rec, &f);

    assert_eq!(rec.ops[1], Op::Clear("#1C1C1E".into()));
    assert_eq!(rec.ops.last(), Some(&Op::StrokeRect(5.0, 5.0, 0.0, 0.0)));
}
