//! Integration tests: autosave, saved drawings, and load-time migration
//! (scrawl-editor + scrawl-core storage).

use pretty_assertions::assert_eq;
use scrawl_core::error::StoreError;
use scrawl_core::format::{decode_scene, keys};
use scrawl_core::model::DrawObject;
use scrawl_core::store::{KeyValueStore, MemoryStore};
use scrawl_editor::{BoardConfig, InputEvent, SaveSummary, Session, ToolKind};
use std::cell::RefCell;
use std::rc::Rc;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A store the test keeps a handle to after the session is gone.
#[derive(Clone, Default)]
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.0.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.0.borrow_mut().remove(key)
    }
}

fn draw_rect<S: KeyValueStore>(s: &mut Session<S>, x: f64, now: f64) {
    s.set_tool(ToolKind::Rect, now);
    s.handle(&InputEvent::pointer_down(x, 0.0, 0), now);
    s.handle(&InputEvent::pointer_move(x + 10.0, 10.0), now);
    s.handle(&InputEvent::pointer_up(x + 10.0, 10.0), now);
}

fn stored_board(store: &impl KeyValueStore) -> Vec<DrawObject> {
    store
        .get(keys::BOARD)
        .and_then(|text| decode_scene(&text).ok())
        .map(|scene| scene.objects().to_vec())
        .unwrap_or_default()
}

fn board_len(store: &impl KeyValueStore) -> Option<usize> {
    store
        .get(keys::BOARD)
        .and_then(|text| decode_scene(&text).ok())
        .map(|scene| scene.len())
}

// ─── Debounced autosave ──────────────────────────────────────────────────

#[test]
fn burst_of_edits_writes_once_after_quiet_period() {
    init_logger();
    let mut s = Session::open(MemoryStore::new(), BoardConfig::default());
    draw_rect(&mut s, 0.0, 0.0);
    draw_rect(&mut s, 100.0, 1000.0);
    draw_rect(&mut s, 200.0, 2000.0);
    assert_eq!(s.autosave_deadline(), Some(7000.0));

    assert!(!s.tick(6999.0));
    assert_eq!(s.store().write_count(), 0);
    assert!(s.tick(7000.0));
    assert_eq!(s.store().write_count(), 1);
    assert_eq!(board_len(s.store()), Some(3));

    assert!(!s.tick(60_000.0));
    assert_eq!(s.store().write_count(), 1);
}

#[test]
fn any_event_advances_the_timer() {
    let mut s = Session::open(MemoryStore::new(), BoardConfig::default());
    draw_rect(&mut s, 0.0, 0.0);
    s.handle(&InputEvent::pointer_move(1.0, 1.0), 5000.0);
    assert_eq!(s.store().write_count(), 1);
}

#[test]
fn teardown_flushes_immediately() {
    let shared = SharedStore::default();
    let mut s = Session::open(shared.clone(), BoardConfig::default());
    draw_rect(&mut s, 0.0, 0.0);
    s.handle(&InputEvent::Teardown, 10.0);
    assert_eq!(board_len(&shared), Some(1));
    assert_eq!(s.autosave_deadline(), None);

    drop(s);
    assert_eq!(shared.0.borrow().write_count(), 1);
}

#[test]
fn dropping_with_pending_save_flushes() {
    let shared = SharedStore::default();
    {
        let mut s = Session::open(shared.clone(), BoardConfig::default());
        draw_rect(&mut s, 0.0, 0.0);
        draw_rect(&mut s, 50.0, 1.0);
    }
    assert_eq!(board_len(&shared), Some(2));
    assert_eq!(shared.0.borrow().write_count(), 1);
}

#[test]
fn storage_failure_is_not_fatal() {
    init_logger();
    let mut s = Session::open(MemoryStore::with_quota(32), BoardConfig::default());
    for i in 0..5 {
        draw_rect(&mut s, i as f64 * 50.0, 0.0);
    }
    assert!(s.tick(10_000.0));
    assert_eq!(s.store().write_count(), 0);
    assert_eq!(s.scene().len(), 5);
    assert!(s.undo(10_000.0));
    assert_eq!(s.scene().len(), 4);
}

#[test]
fn drag_interrupted_by_tool_switch_is_still_saved() {
    let mut s = Session::open(MemoryStore::new(), BoardConfig::default());
    draw_rect(&mut s, 0.0, 0.0);
    s.tick(5000.0);

    s.set_tool(ToolKind::Select, 6000.0);
    s.handle(&InputEvent::pointer_down(5.0, 5.0, 0), 6000.0);
    s.handle(&InputEvent::pointer_move(105.0, 105.0), 6100.0);
    s.set_tool(ToolKind::Select, 6200.0);
    s.handle(&InputEvent::pointer_up(105.0, 105.0), 6300.0);
    assert!(s.tick(100_000.0));

    assert_eq!(
        stored_board(s.store()),
        vec![DrawObject::Rect {
            x: 100.0,
            y: 100.0,
            w: 10.0,
            h: 10.0
        }]
    );
}

#[test]
fn drag_interrupted_by_escape_is_still_saved() {
    let mut s = Session::open(MemoryStore::new(), BoardConfig::default());
    draw_rect(&mut s, 0.0, 0.0);
    s.tick(5000.0);

    s.set_tool(ToolKind::Select, 6000.0);
    s.handle(&InputEvent::pointer_down(5.0, 5.0, 0), 6000.0);
    s.handle(&InputEvent::pointer_move(25.0, 5.0), 6100.0);
    s.handle(
        &InputEvent::KeyDown {
            key: "Escape".into(),
            ctrl: false,
            shift: false,
            alt: false,
            meta: false,
        },
        6200.0,
    );
    s.handle(&InputEvent::pointer_up(25.0, 5.0), 6300.0);
    assert_eq!(s.autosave_deadline(), Some(11_200.0));
    assert!(s.tick(11_200.0));

    assert_eq!(
        stored_board(s.store()),
        vec![DrawObject::Rect {
            x: 20.0,
            y: 0.0,
            w: 10.0,
            h: 10.0
        }]
    );
}

// ─── Load and migration ──────────────────────────────────────────────────

#[test]
fn legacy_text_without_color_loads_black() {
    let mut store = MemoryStore::new();
    store
        .set(
            keys::BOARD,
            r#"[{"type":"text","x":0,"y":0,"w":80,"h":20,"text":"hi","align":"center"}]"#,
        )
        .unwrap();
    let s = Session::open(store, BoardConfig::default());
    match &s.scene().objects()[0] {
        DrawObject::Text { color, text, .. } => {
            assert_eq!(color, "#000000");
            assert_eq!(text, "hi");
        }
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn malformed_board_starts_empty() {
    init_logger();
    let mut store = MemoryStore::new();
    store.set(keys::BOARD, "not json at all").unwrap();
    let mut s = Session::open(store, BoardConfig::default());
    assert!(s.scene().is_empty());
    draw_rect(&mut s, 0.0, 0.0);
    assert_eq!(s.scene().len(), 1);
}

// ─── Saved drawings ──────────────────────────────────────────────────────

#[test]
fn save_new_and_switch_between_drawings() {
    let mut s = Session::open(MemoryStore::new(), BoardConfig::default());
    draw_rect(&mut s, 0.0, 0.0);
    let first = s.save_current("   ", 1000.0);
    assert_eq!(first, "1000");
    assert_eq!(s.current_save_title(), Some("Untitled drawing"));
    assert_eq!(s.selected(), None);
    assert!(s.history().can_undo());

    s.new_board(1500.0);
    assert!(s.scene().is_empty());
    assert!(!s.history().can_undo());
    assert_eq!(s.current_save_id(), None);
    assert_eq!(s.store().get(keys::CURRENT_SAVE), None);

    draw_rect(&mut s, 0.0, 1600.0);
    draw_rect(&mut s, 50.0, 1700.0);
    let second = s.save_current(" Floor plan ", 2000.0);
    assert_eq!(second, "2000");
    assert_eq!(
        s.saves(),
        vec![
            SaveSummary {
                id: "1000".into(),
                title: "Untitled drawing".into()
            },
            SaveSummary {
                id: "2000".into(),
                title: "Floor plan".into()
            },
        ]
    );

    assert!(s.load_save("1000", 3000.0));
    assert_eq!(s.scene().len(), 1);
    assert!(!s.history().can_undo());
    assert!(!s.history().can_redo());
    assert_eq!(s.current_save_id(), Some("1000"));

    assert!(!s.load_save("missing", 3100.0));
    assert_eq!(s.current_save_id(), Some("1000"));
    assert_eq!(s.scene().len(), 1);
}

#[test]
fn saving_an_open_drawing_updates_it_in_place() {
    let mut s = Session::open(MemoryStore::new(), BoardConfig::default());
    draw_rect(&mut s, 0.0, 0.0);
    let id = s.save_current("Sketch", 100.0);
    draw_rect(&mut s, 50.0, 200.0);
    assert_eq!(s.save_current("Sketch", 300.0), id);
    assert_eq!(s.saves().len(), 1);
}

#[test]
fn reload_resumes_last_open_drawing() {
    let mut s = Session::open(MemoryStore::new(), BoardConfig::default());
    draw_rect(&mut s, 0.0, 0.0);
    s.save_current("Kept", 42.0);
    s.new_board(50.0);
    draw_rect(&mut s, 0.0, 60.0);
    draw_rect(&mut s, 40.0, 70.0);
    s.save_current("Latest", 80.0);
    s.handle(&InputEvent::Teardown, 90.0);

    let reopened = Session::open(s.store().clone(), BoardConfig::default());
    assert_eq!(reopened.current_save_id(), Some("80"));
    assert_eq!(reopened.current_save_title(), Some("Latest"));
    assert_eq!(reopened.scene().len(), 2);
    assert_eq!(reopened.saves().len(), 2);
}

#[test]
fn unreadable_saved_drawing_does_not_cost_the_others() {
    init_logger();
    let mut store = MemoryStore::new();
    store
        .set(
            keys::SAVES,
            r#"[{"id":"1","title":"Good","data":[{"type":"rect","x":0,"y":0,"w":5,"h":5}]},{"id":"2","data":[{"type":"ellipse"}]}]"#,
        )
        .unwrap();

    let mut s = Session::open(store, BoardConfig::default());
    assert_eq!(
        s.saves(),
        vec![SaveSummary {
            id: "1".into(),
            title: "Good".into()
        }]
    );
    assert_eq!(s.save_current("New", 10.0), "10");

    let mut reopened = Session::open(s.store().clone(), BoardConfig::default());
    let ids: Vec<String> = reopened.saves().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["1".to_string(), "10".to_string()]);
    assert!(s.store().get(keys::SAVES).unwrap().contains("ellipse"));
    assert!(reopened.load_save("1", 20.0));
    assert_eq!(reopened.scene().len(), 1);
}
