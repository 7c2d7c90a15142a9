//! WASM bridge for Scrawl — exposes the drawing session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page forwards DOM
//! events with `performance.now()` as the clock, calls `tick` from a timer
//! so autosaves land, and repaints with `render` whenever a call returns
//! `true`.

mod render2d;
mod storage;

use render2d::CanvasSurface;
use scrawl_editor::{BoardConfig, InputEvent, Session};
use scrawl_render::paint::{Theme, paint_board};
use serde_json::json;
use storage::LocalStorage;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The main WASM-facing board controller.
///
/// Owns the session (scene, viewport, history, autosave, saved drawings)
/// plus the surface size and theme used for painting.
#[wasm_bindgen]
pub struct ScrawlBoard {
    session: Session<LocalStorage>,
    width: f64,
    height: f64,
    /// `false` = light (default), `true` = dark.
    dark_mode: bool,
}

#[wasm_bindgen]
impl ScrawlBoard {
    /// Open the board stored in `localStorage`. `config_json` may carry a
    /// partial `BoardConfig` (camelCase keys).
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, config_json: Option<String>) -> Self {
        console_error_panic_hook_setup();
        init_logging();

        let config = config_json
            .as_deref()
            .map(BoardConfig::from_json)
            .unwrap_or_default();
        Self {
            session: Session::open(LocalStorage::open(), config),
            width,
            height,
            dark_mode: false,
        }
    }

    /// Paint the whole board to a Canvas2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let theme = if self.dark_mode { Theme::dark() } else { Theme::light() };
        let frame = self.session.frame(&theme, self.width, self.height);
        paint_board(&mut CanvasSurface::new(ctx), &frame);
    }

    pub fn set_theme(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
    }

    /// The window or the canvas changed size. Re-centers the surface.
    pub fn resize(
        &mut self,
        container_width: f64,
        container_height: f64,
        width: f64,
        height: f64,
    ) -> bool {
        self.width = width;
        self.height = height;
        self.session.handle(
            &InputEvent::Resize {
                container: (container_width, container_height),
                surface: (width, height),
            },
            0.0,
        )
    }

    /// `button` is `PointerEvent.button`. Returns true if a repaint is due.
    pub fn handle_pointer_down(&mut self, x: f64, y: f64, button: i16, now: f64) -> bool {
        self.session.handle(&InputEvent::pointer_down(x, y, button), now)
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64, now: f64) -> bool {
        self.session.handle(&InputEvent::pointer_move(x, y), now)
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64, now: f64) -> bool {
        self.session.handle(&InputEvent::pointer_up(x, y), now)
    }

    pub fn handle_wheel(&mut self, x: f64, y: f64, delta_y: f64, now: f64) -> bool {
        self.session.handle(&InputEvent::Wheel { x, y, delta_y }, now)
    }

    pub fn handle_key_down(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        now: f64,
    ) -> bool {
        self.session.handle(
            &InputEvent::KeyDown {
                key: key.to_string(),
                ctrl,
                shift,
                alt,
                meta,
            },
            now,
        )
    }

    pub fn handle_key_up(&mut self, key: &str, now: f64) -> bool {
        self.session.handle(&InputEvent::KeyUp { key: key.to_string() }, now)
    }

    pub fn handle_double_click(&mut self, x: f64, y: f64, now: f64) -> bool {
        self.session.handle(&InputEvent::DoubleClick { x, y }, now)
    }

    /// Page is hiding: write everything now.
    pub fn teardown(&mut self) {
        self.session.handle(&InputEvent::Teardown, 0.0);
    }

    /// Advance the autosave clock. Returns true if a write was attempted.
    pub fn tick(&mut self, now: f64) -> bool {
        self.session.tick(now)
    }

    /// When the pending autosave is due (ms), for scheduling `tick`.
    pub fn autosave_deadline(&self) -> Option<f64> {
        self.session.autosave_deadline()
    }

    // ─── Toolbar ─────────────────────────────────────────────────────────

    /// Switch tool by name (`draw`, `rect`, `line`, `text`, `select`).
    pub fn set_tool(&mut self, name: &str, now: f64) -> bool {
        self.session.set_tool_by_name(name, now)
    }

    pub fn get_tool_name(&self) -> String {
        self.session.tool().name().to_string()
    }

    pub fn undo(&mut self, now: f64) -> bool {
        self.session.undo(now)
    }

    pub fn redo(&mut self, now: f64) -> bool {
        self.session.redo(now)
    }

    pub fn clear_board(&mut self, now: f64) -> bool {
        self.session.clear_board(now)
    }

    // ─── Saved drawings ──────────────────────────────────────────────────

    /// Save under `title`. Returns the entry id, which is taken from the
    /// wall clock so it stays unique across page loads.
    pub fn save_current(&mut self, title: &str, now: f64) -> String {
        self.session.save_current_stamped(title, now, js_sys::Date::now())
    }

    pub fn load_save(&mut self, id: &str, now: f64) -> bool {
        self.session.load_save(id, now)
    }

    pub fn new_board(&mut self, now: f64) {
        self.session.new_board(now);
    }

    /// The save picker as JSON:
    /// `{"current":"id"|null,"title":"..."|null,"saves":[{"id","title"}]}`.
    pub fn saves_json(&self) -> String {
        json!({
            "current": self.session.current_save_id(),
            "title": self.session.current_save_title(),
            "saves": self.session.saves(),
        })
        .to_string()
    }

    // ─── Text editing ────────────────────────────────────────────────────

    /// Placement of the text input as JSON, or `null` when not editing.
    pub fn text_edit_json(&self) -> String {
        match self.session.text_edit_frame() {
            Some(frame) => serde_json::to_string(&frame).unwrap_or_else(|_| "null".to_string()),
            None => "null".to_string(),
        }
    }

    pub fn set_text_draft(&mut self, text: &str) -> bool {
        self.session.set_text_draft(text)
    }

    pub fn commit_text_edit(&mut self, text: &str, now: f64) -> bool {
        self.session.commit_text_edit(text, now)
    }

    pub fn set_text_color(&mut self, color: &str, now: f64) -> bool {
        self.session.set_text_color(color, now)
    }

    pub fn get_text_color(&self) -> String {
        self.session.text_color().to_string()
    }

    /// Current scene in its stored form.
    pub fn document_json(&self) -> String {
        scrawl_core::format::encode_scene(self.session.scene()).unwrap_or_else(|e| {
            log::warn!("could not encode board: {e}");
            "[]".to_string()
        })
    }
}

fn init_logging() {
    // A second board on the same page finds the logger already set.
    let _ = console_log::init_with_level(log::Level::Debug);
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Scrawl WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
