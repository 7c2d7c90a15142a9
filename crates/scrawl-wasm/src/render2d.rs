//! Canvas2D surface.
//!
//! Forwards the paint pass to an HTML `<canvas>` via
//! `CanvasRenderingContext2d`.

use scrawl_render::paint::{Surface, TextStyle};
use web_sys::CanvasRenderingContext2d;

pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Surface for CanvasSurface<'_> {
    fn set_transform(&mut self, [a, b, c, d, e, f]: [f64; 6]) {
        let _ = self.ctx.set_transform(a, b, c, d, e, f);
    }

    fn clear(&mut self, width: f64, height: f64, color: &str) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, width, height);
    }

    fn set_stroke(&mut self, color: &str, width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
    }

    fn set_fill(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.stroke_rect(x, y, w, h);
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(cx, cy, r, 0.0, std::f64::consts::TAU);
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle<'_>) {
        self.ctx.set_font(&format!("{}px sans-serif", style.font_px));
        self.ctx.set_text_align(style.align.as_str());
        self.ctx.set_text_baseline("top");
        self.ctx.set_fill_style_str(style.color);
        let _ = self.ctx.fill_text(text, x, y);
    }
}
