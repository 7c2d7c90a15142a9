//! The document session: one board, its viewport, and the interaction
//! state machine that turns input events into edits.
//!
//! A session owns everything that used to be ambient page state: the
//! scene, the viewport, the active tool, the in-progress gesture, the
//! selection, the undo history, the autosave timer, and the save library.
//! Hosts feed it [`InputEvent`]s plus a millisecond clock and repaint
//! whenever [`Session::handle`] returns `true`.
//!
//! ## Gestures
//!
//! | pointer-down on…                 | gesture        | checkpoint |
//! |----------------------------------|----------------|------------|
//! | secondary button / space held    | pan            | no         |
//! | a handle of the selection        | reshape        | on down    |
//! | an object (select tool)          | move           | on down    |
//! | empty space (select tool)        | pan            | no         |
//! | anywhere (creation tools)        | draw           | on commit  |

use crate::autosave::Debouncer;
use crate::config::BoardConfig;
use crate::history::History;
use crate::input::{InputEvent, PointerButton};
use crate::ops;
use crate::persist::{Library, SaveSummary};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{ToolKind, begin_object};
use scrawl_core::geometry::Point;
use scrawl_core::model::{Color, DrawObject, ObjectIndex, Scene};
use scrawl_core::store::KeyValueStore;
use scrawl_core::viewport::{Viewport, ZoomDirection};
use scrawl_render::hit::{Handle, hit_test, hit_test_handle, hit_test_object};
use scrawl_render::paint::{Frame, Theme};
use serde::Serialize;

/// The pointer gesture in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    /// Dragging the view. `last` is in screen space.
    Panning { last: Point },
    /// Creating an object that is not in the scene yet.
    Drawing(DrawObject),
    /// Dragging a handle of the selected object.
    Reshaping(Handle),
    /// Dragging the selected object. `last` is in world space.
    Moving { last: Point },
}

/// Where the host should place its text input while a text object is
/// being edited. Screen space.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEditFrame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub color: String,
    pub text: String,
}

pub struct Session<S: KeyValueStore> {
    scene: Scene,
    viewport: Viewport,
    tool: ToolKind,
    gesture: Gesture,
    selected: Option<ObjectIndex>,
    editing: Option<ObjectIndex>,
    text_color: String,
    space_held: bool,
    history: History,
    autosave: Debouncer,
    library: Library<S>,
    config: BoardConfig,
}

impl<S: KeyValueStore> Session<S> {
    /// Open a session over `store`, resuming whatever it holds.
    pub fn open(store: S, config: BoardConfig) -> Self {
        let config = config.validate().unwrap_or_else(|reason| {
            log::warn!("invalid board config ({reason}), using defaults");
            BoardConfig::default()
        });
        let (library, scene) = Library::open(store);
        let mut viewport = Viewport::new(config.scale_limits());
        viewport.zoom_in_factor = config.zoom_in_factor;
        viewport.zoom_out_factor = config.zoom_out_factor;
        log::debug!(
            "session opened with {} objects, current save {:?}",
            scene.len(),
            library.current_id()
        );
        Self {
            scene,
            viewport,
            tool: ToolKind::default(),
            gesture: Gesture::Idle,
            selected: None,
            editing: None,
            text_color: config.default_text_color.clone(),
            space_held: false,
            history: History::new(config.history_depth),
            autosave: Debouncer::new(config.autosave_quiet_ms),
            library,
            config,
        }
    }

    // ─── Input dispatch ──────────────────────────────────────────────────

    /// Apply one input event at time `now` (ms). Returns whether the board
    /// needs repainting.
    pub fn handle(&mut self, event: &InputEvent, now: f64) -> bool {
        self.tick(now);
        let at = event.position().unwrap_or_default();
        match event {
            InputEvent::PointerDown { button, .. } => self.pointer_down(at, *button, now),
            InputEvent::PointerMove { .. } => self.pointer_move(at),
            InputEvent::PointerUp { .. } => self.pointer_up(now),
            InputEvent::Wheel { delta_y, .. } => {
                self.viewport.zoom(at, ZoomDirection::from_wheel_delta(*delta_y));
                true
            }
            InputEvent::KeyDown {
                key,
                ctrl,
                shift,
                alt,
                meta,
            } => self.key_down(key, *ctrl, *shift, *alt, *meta, now),
            InputEvent::KeyUp { key } => {
                if key == " " {
                    self.space_held = false;
                }
                false
            }
            InputEvent::DoubleClick { .. } => self.double_click(at, now),
            InputEvent::Resize { container, surface } => {
                self.viewport.recenter(*container, *surface);
                true
            }
            InputEvent::Teardown => {
                self.teardown();
                false
            }
        }
    }

    fn pointer_down(&mut self, screen: Point, button: PointerButton, now: f64) -> bool {
        self.finish_text_edit(now);
        if button == PointerButton::Secondary || self.space_held {
            self.gesture = Gesture::Panning { last: screen };
            return true;
        }

        let world = self.viewport.to_world(screen);
        let radius = self.viewport.world_length(self.config.handle_radius_px);
        let tolerance = self.viewport.world_length(self.config.hit_tolerance_px);

        if let Some(obj) = self.selected.and_then(|idx| self.scene.get(idx))
            && let Some(handle) = hit_test_handle(obj, world, radius)
        {
            self.history.record_checkpoint(&self.scene);
            self.gesture = Gesture::Reshaping(handle);
            log::debug!("reshape {handle} on {:?}", self.selected);
            return true;
        }

        if !self.tool.creates() {
            let on_selection = self
                .selected
                .and_then(|idx| self.scene.get(idx))
                .is_some_and(|obj| hit_test_object(obj, world, tolerance));
            if !on_selection {
                self.selected = hit_test(&self.scene, world, tolerance);
            }
            self.gesture = match self.selected {
                Some(_) => {
                    self.history.record_checkpoint(&self.scene);
                    Gesture::Moving { last: world }
                }
                None => Gesture::Panning { last: screen },
            };
            return true;
        }

        self.selected = None;
        self.gesture = match begin_object(self.tool, world, &self.text_color) {
            Some(obj) => Gesture::Drawing(obj),
            None => Gesture::Idle,
        };
        true
    }

    fn pointer_move(&mut self, screen: Point) -> bool {
        let world = self.viewport.to_world(screen);
        match &mut self.gesture {
            Gesture::Idle => false,
            Gesture::Panning { last } => {
                let d = screen - *last;
                *last = screen;
                self.viewport.pan_by(d.x, d.y);
                true
            }
            Gesture::Drawing(obj) => {
                obj.extend_to(world);
                true
            }
            Gesture::Reshaping(handle) => {
                let handle = *handle;
                self.selected
                    .and_then(|idx| self.scene.get_mut(idx))
                    .is_some_and(|obj| ops::reshape(obj, handle, world))
            }
            Gesture::Moving { last } => {
                let d = world - *last;
                *last = world;
                match self.selected.and_then(|idx| self.scene.get_mut(idx)) {
                    Some(obj) => {
                        obj.translate(d);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    fn pointer_up(&mut self, now: f64) -> bool {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => false,
            Gesture::Panning { .. } => true,
            Gesture::Reshaping(_) | Gesture::Moving { .. } => {
                self.schedule_save(now);
                true
            }
            Gesture::Drawing(obj) => {
                self.commit_object(obj, now);
                true
            }
        }
    }

    fn key_down(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        now: f64,
    ) -> bool {
        // Keys typed into the host's text input belong to the text.
        if self.editing.is_some() {
            return false;
        }
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return false;
        };
        match action {
            ShortcutAction::ToolDraw => self.set_tool(ToolKind::Draw, now),
            ShortcutAction::ToolRect => self.set_tool(ToolKind::Rect, now),
            ShortcutAction::ToolLine => self.set_tool(ToolKind::Line, now),
            ShortcutAction::ToolText => self.set_tool(ToolKind::Text, now),
            ShortcutAction::ToolSelect => self.set_tool(ToolKind::Select, now),
            ShortcutAction::Undo => return self.undo(now),
            ShortcutAction::Redo => return self.redo(now),
            ShortcutAction::PanStart => {
                self.space_held = true;
                return false;
            }
            ShortcutAction::Deselect => {
                self.selected = None;
                if matches!(self.gesture, Gesture::Reshaping(_) | Gesture::Moving { .. }) {
                    self.cancel_gesture(now);
                }
            }
        }
        true
    }

    fn double_click(&mut self, screen: Point, now: f64) -> bool {
        let world = self.viewport.to_world(screen);
        let tolerance = self.viewport.world_length(self.config.hit_tolerance_px);
        match self.selected {
            Some(idx)
                if self
                    .scene
                    .get(idx)
                    .is_some_and(|obj| obj.is_text() && hit_test_object(obj, world, tolerance)) =>
            {
                self.begin_text_edit(idx, now)
            }
            _ => false,
        }
    }

    // ─── Edit operations ─────────────────────────────────────────────────

    /// Append a finished object: checkpoint, push, select. New text goes
    /// straight into text editing.
    pub fn commit_object(&mut self, obj: DrawObject, now: f64) -> ObjectIndex {
        self.history.record_checkpoint(&self.scene);
        let is_text = obj.is_text();
        let kind = obj.kind();
        let idx = self.scene.push(obj);
        self.selected = Some(idx);
        log::debug!("committed {kind} at {idx}");
        if is_text {
            self.begin_text_edit(idx, now);
        }
        self.schedule_save(now);
        idx
    }

    /// Remove every object. No-op (and no checkpoint) on an empty board.
    pub fn clear_board(&mut self, now: f64) -> bool {
        self.finish_text_edit(now);
        if self.scene.is_empty() {
            return false;
        }
        self.history.record_checkpoint(&self.scene);
        self.scene.clear();
        self.selected = None;
        if matches!(self.gesture, Gesture::Reshaping(_) | Gesture::Moving { .. }) {
            self.cancel_gesture(now);
        }
        self.schedule_save(now);
        log::debug!("board cleared");
        true
    }

    pub fn undo(&mut self, now: f64) -> bool {
        self.finish_text_edit(now);
        if !self.history.undo(&mut self.scene) {
            return false;
        }
        self.after_history_step(now);
        log::debug!("undo → {} objects", self.scene.len());
        true
    }

    pub fn redo(&mut self, now: f64) -> bool {
        self.finish_text_edit(now);
        if !self.history.redo(&mut self.scene) {
            return false;
        }
        self.after_history_step(now);
        log::debug!("redo → {} objects", self.scene.len());
        true
    }

    fn after_history_step(&mut self, now: f64) {
        // Indices into the replaced scene are meaningless now.
        self.selected = None;
        if !matches!(self.gesture, Gesture::Drawing(_) | Gesture::Panning { .. }) {
            self.gesture = Gesture::Idle;
        }
        self.schedule_save(now);
    }

    /// Switch tools, dropping the in-progress object and the selection.
    pub fn set_tool(&mut self, tool: ToolKind, now: f64) {
        self.finish_text_edit(now);
        self.tool = tool;
        self.selected = None;
        self.cancel_gesture(now);
        log::debug!("tool → {tool}");
    }

    /// Drop the gesture in progress. A drag has already changed the scene,
    /// so it still schedules a save.
    fn cancel_gesture(&mut self, now: f64) {
        let dropped = std::mem::replace(&mut self.gesture, Gesture::Idle);
        if matches!(dropped, Gesture::Reshaping(_) | Gesture::Moving { .. }) {
            self.schedule_save(now);
        }
    }

    /// Select by toolbar name. Unknown names are ignored.
    pub fn set_tool_by_name(&mut self, name: &str, now: f64) -> bool {
        match ToolKind::from_name(name) {
            Some(tool) => {
                self.set_tool(tool, now);
                true
            }
            None => {
                log::warn!("unknown tool {name:?}");
                false
            }
        }
    }

    // ─── Text editing ────────────────────────────────────────────────────

    /// Enter text editing on the text object at `idx`. Any other edit is
    /// finished first.
    pub fn begin_text_edit(&mut self, idx: ObjectIndex, now: f64) -> bool {
        if !self.scene.get(idx).is_some_and(DrawObject::is_text) {
            return false;
        }
        if self.editing != Some(idx) {
            self.finish_text_edit(now);
        }
        self.editing = Some(idx);
        true
    }

    /// Live-update the content of the edited text.
    pub fn set_text_draft(&mut self, text: &str) -> bool {
        self.editing
            .and_then(|idx| self.scene.get_mut(idx))
            .is_some_and(|obj| ops::set_text(obj, text))
    }

    /// Leave text editing. Always schedules a save, changed or not.
    pub fn finish_text_edit(&mut self, now: f64) -> bool {
        if self.editing.take().is_none() {
            return false;
        }
        self.schedule_save(now);
        true
    }

    /// Store `text` in the edited object and leave text editing.
    pub fn commit_text_edit(&mut self, text: &str, now: f64) -> bool {
        self.set_text_draft(text);
        self.finish_text_edit(now)
    }

    /// Pick the colour for new text. While editing, the edited object is
    /// recoloured too. Rejects anything that is not a hex colour.
    pub fn set_text_color(&mut self, color: &str, now: f64) -> bool {
        if Color::from_hex(color).is_none() {
            log::warn!("ignoring text colour {color:?}");
            return false;
        }
        self.text_color = color.to_string();
        let recoloured = self
            .editing
            .and_then(|idx| self.scene.get_mut(idx))
            .is_some_and(|obj| ops::set_text_color(obj, color));
        if recoloured {
            self.schedule_save(now);
        }
        true
    }

    /// Screen-space placement for the host's text input.
    pub fn text_edit_frame(&self) -> Option<TextEditFrame> {
        let obj = self.scene.get(self.editing?)?;
        let DrawObject::Text { text, color, .. } = obj else {
            return None;
        };
        let bounds = obj.bounds()?;
        let top_left = self.viewport.to_screen(bounds.min);
        let height = bounds.height() * self.viewport.scale;
        Some(TextEditFrame {
            left: top_left.x,
            top: top_left.y,
            width: bounds.width() * self.viewport.scale,
            height,
            font_size: height,
            color: color.clone(),
            text: text.clone(),
        })
    }

    // ─── Saved drawings ──────────────────────────────────────────────────

    /// Save the board into the directory. An empty title becomes the
    /// configured untitled title. Returns the entry id.
    pub fn save_current(&mut self, title: &str, now: f64) -> String {
        self.save_current_stamped(title, now, now)
    }

    /// Like [`Session::save_current`], but a new entry's id comes from
    /// `stamp_ms` (wall-clock ms) instead of the event clock.
    pub fn save_current_stamped(&mut self, title: &str, now: f64, stamp_ms: f64) -> String {
        self.finish_text_edit(now);
        let title = match title.trim() {
            "" => self.config.untitled_title.clone(),
            t => t.to_string(),
        };
        let id = match self.library.save(&title, &self.scene, stamp_ms) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("saving {title:?} failed, keeping it in memory: {e}");
                self.library.current_id().map(str::to_string).unwrap_or_default()
            }
        };
        self.selected = None;
        self.gesture = Gesture::Idle;
        self.schedule_save(now);
        log::debug!("saved {title:?} as {id}");
        id
    }

    /// Open a saved drawing. Unknown ids change nothing.
    pub fn load_save(&mut self, id: &str, now: f64) -> bool {
        if !self.library.directory().contains(id) {
            log::warn!("no saved drawing with id {id:?}");
            return false;
        }
        self.finish_text_edit(now);
        let Some(scene) = self.library.open_entry(id) else {
            return false;
        };
        self.replace_document(scene, now);
        log::debug!("opened saved drawing {id}");
        true
    }

    /// Start an empty, unsaved board.
    pub fn new_board(&mut self, now: f64) {
        self.finish_text_edit(now);
        self.library.detach();
        self.replace_document(Scene::new(), now);
        log::debug!("new board");
    }

    fn replace_document(&mut self, scene: Scene, now: f64) {
        self.scene = scene;
        self.history.clear();
        self.selected = None;
        self.gesture = Gesture::Idle;
        self.schedule_save(now);
    }

    pub fn saves(&self) -> Vec<SaveSummary> {
        self.library.summaries()
    }

    pub fn current_save_id(&self) -> Option<&str> {
        self.library.current_id()
    }

    pub fn current_save_title(&self) -> Option<&str> {
        self.library.current_title()
    }

    // ─── Autosave ────────────────────────────────────────────────────────

    fn schedule_save(&mut self, now: f64) {
        self.autosave.touch(now);
    }

    /// Advance the clock; writes the board if the quiet period is over.
    /// Returns whether a write was attempted.
    pub fn tick(&mut self, now: f64) -> bool {
        if !self.autosave.take_due(now) {
            return false;
        }
        self.flush();
        true
    }

    /// When the pending autosave is due, if any.
    pub fn autosave_deadline(&self) -> Option<f64> {
        self.autosave.deadline()
    }

    fn flush(&mut self) {
        if let Err(e) = self.library.write_board(&self.scene) {
            log::warn!("autosave failed, board kept in memory: {e}");
        }
    }

    /// Session is ending: finish text editing and write synchronously.
    pub fn teardown(&mut self) {
        self.editing = None;
        self.autosave.cancel();
        self.flush();
        log::debug!("session torn down");
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Everything the paint pass needs for one frame.
    pub fn frame<'a>(&'a self, theme: &'a Theme, width: f64, height: f64) -> Frame<'a> {
        Frame {
            scene: &self.scene,
            viewport: &self.viewport,
            current: match &self.gesture {
                Gesture::Drawing(obj) => Some(obj),
                _ => None,
            },
            selected: self.selected,
            editing: self.editing,
            width,
            height,
            theme,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn selected(&self) -> Option<ObjectIndex> {
        self.selected
    }

    pub fn editing(&self) -> Option<ObjectIndex> {
        self.editing
    }

    pub fn text_color(&self) -> &str {
        &self.text_color
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        self.library.store()
    }
}

impl<S: KeyValueStore> Drop for Session<S> {
    fn drop(&mut self) {
        if self.autosave.cancel() {
            self.flush();
        }
    }
}
