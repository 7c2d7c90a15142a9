//! Persistence bridge between a session and its key-value store.
//!
//! Three keys are used (see [`scrawl_core::format::keys`]):
//! - the autosaved board blob, written by the debounced autosave;
//! - the save directory, written on every explicit save;
//! - the id of the open directory entry, so a reload resumes it.
//!
//! Reads never fail: malformed data is logged and treated as absent. A
//! directory that could not be read at all is never written over.

use scrawl_core::error::{FormatError, StoreError};
use scrawl_core::format::{SaveDirectory, SaveEntry, decode_scene, encode_scene, keys};
use scrawl_core::model::Scene;
use scrawl_core::store::KeyValueStore;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stored directory could not be read on open, so writing ours
    /// would replace it.
    #[error("stored save directory is unreadable; not overwriting it")]
    DirectoryUnreadable,
}

/// One row of the "open drawing" picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveSummary {
    pub id: String,
    pub title: String,
}

/// Owns the store and the in-memory copy of the save directory.
pub struct Library<S: KeyValueStore> {
    store: S,
    directory: SaveDirectory,
    /// False when the stored directory exists but did not parse.
    directory_writable: bool,
    current_id: Option<String>,
}

impl<S: KeyValueStore> Library<S> {
    /// Read the directory and resume the last document.
    ///
    /// The open entry named by the current-id key wins when it exists;
    /// otherwise the autosaved board blob is used and no entry is open.
    pub fn open(store: S) -> (Self, Scene) {
        let (directory, directory_writable) = match store.get(keys::SAVES) {
            Some(text) => match SaveDirectory::decode(&text) {
                Ok(dir) => (dir, true),
                Err(e) => {
                    log::warn!("save directory is unreadable, saves stay in memory: {e}");
                    (SaveDirectory::new(), false)
                }
            },
            None => (SaveDirectory::new(), true),
        };

        let wanted = store.get(keys::CURRENT_SAVE).filter(|id| !id.is_empty());
        let resumed = wanted
            .as_deref()
            .and_then(|id| directory.get(id))
            .map(|entry| (entry.id.clone(), entry.data.clone()));

        let mut lib = Self {
            store,
            directory,
            directory_writable,
            current_id: None,
        };
        let scene = match resumed {
            Some((id, scene)) => {
                log::debug!("resuming saved drawing {id} ({} objects)", scene.len());
                lib.current_id = Some(id);
                scene
            }
            None => {
                if let Some(id) = wanted {
                    log::debug!("current save {id} no longer exists, using the board blob");
                }
                lib.read_board()
            }
        };
        (lib, scene)
    }

    fn read_board(&self) -> Scene {
        let Some(text) = self.store.get(keys::BOARD) else {
            return Scene::new();
        };
        decode_scene(&text).unwrap_or_else(|e| {
            log::warn!("autosaved board is malformed, starting empty: {e}");
            Scene::new()
        })
    }

    /// Write `scene` to the board blob.
    pub fn write_board(&mut self, scene: &Scene) -> Result<(), PersistError> {
        let text = encode_scene(scene)?;
        self.store.set(keys::BOARD, &text)?;
        log::debug!("autosaved {} objects ({} bytes)", scene.len(), text.len());
        Ok(())
    }

    /// Store `scene` under `title`: in place when an entry is open,
    /// otherwise as a new entry that becomes the open one. Returns the id.
    ///
    /// The in-memory directory is updated even if writing it fails.
    pub fn save(
        &mut self,
        title: &str,
        scene: &Scene,
        now_ms: f64,
    ) -> Result<String, PersistError> {
        let open = self
            .current_id
            .as_deref()
            .and_then(|id| self.directory.get_mut(id));
        let id = match open {
            Some(entry) => {
                entry.title = title.to_string();
                entry.data = scene.clone();
                entry.id.clone()
            }
            None => {
                let id = self.directory.fresh_id(now_ms);
                self.directory.push(SaveEntry {
                    id: id.clone(),
                    title: title.to_string(),
                    data: scene.clone(),
                });
                id
            }
        };
        self.current_id = Some(id.clone());
        if !self.directory_writable {
            return Err(PersistError::DirectoryUnreadable);
        }
        self.store.set(keys::SAVES, &self.directory.encode()?)?;
        self.store.set(keys::CURRENT_SAVE, &id)?;
        Ok(id)
    }

    /// Make `id` the open entry and return a copy of its scene.
    pub fn open_entry(&mut self, id: &str) -> Option<Scene> {
        let scene = self.directory.get(id)?.data.clone();
        self.current_id = Some(id.to_string());
        if let Err(e) = self.store.set(keys::CURRENT_SAVE, id) {
            log::warn!("could not remember the open drawing: {e}");
        }
        Some(scene)
    }

    /// Close the open entry; the board becomes an unsaved scratch board.
    pub fn detach(&mut self) {
        self.current_id = None;
        if let Err(e) = self.store.remove(keys::CURRENT_SAVE) {
            log::warn!("could not clear the open drawing: {e}");
        }
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    pub fn current_title(&self) -> Option<&str> {
        let id = self.current_id.as_deref()?;
        self.directory.get(id).map(|e| e.title.as_str())
    }

    pub fn summaries(&self) -> Vec<SaveSummary> {
        self.directory
            .entries()
            .iter()
            .map(|e| SaveSummary {
                id: e.id.clone(),
                title: e.title.clone(),
            })
            .collect()
    }

    pub fn directory(&self) -> &SaveDirectory {
        &self.directory
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scrawl_core::geometry::Point;
    use scrawl_core::model::DrawObject;
    use scrawl_core::store::MemoryStore;

    fn one_rect() -> Scene {
        Scene::from_objects(vec![DrawObject::rect_at(Point::new(1.0, 2.0))])
    }

    #[test]
    fn empty_store_opens_empty_board() {
        let (lib, scene) = Library::open(MemoryStore::new());
        assert!(scene.is_empty());
        assert_eq!(lib.current_id(), None);
        assert!(lib.summaries().is_empty());
    }

    #[test]
    fn first_save_appends_then_updates_in_place() {
        let (mut lib, _) = Library::open(MemoryStore::new());
        let id = lib.save("Plan", &one_rect(), 1000.0).unwrap();
        assert_eq!(id, "1000");
        assert_eq!(lib.store().get(keys::CURRENT_SAVE).as_deref(), Some("1000"));

        let again = lib.save("Plan v2", &Scene::new(), 2000.0).unwrap();
        assert_eq!(again, "1000");
        assert_eq!(
            lib.summaries(),
            vec![SaveSummary {
                id: "1000".into(),
                title: "Plan v2".into()
            }]
        );
    }

    #[test]
    fn reopen_resumes_current_entry() {
        let (mut lib, _) = Library::open(MemoryStore::new());
        lib.save("Plan", &one_rect(), 5.0).unwrap();
        lib.write_board(&Scene::new()).unwrap();
        let store = lib.store().clone();

        let (lib, scene) = Library::open(store);
        assert_eq!(lib.current_id(), Some("5"));
        assert_eq!(lib.current_title(), Some("Plan"));
        assert_eq!(scene, one_rect());
    }

    #[test]
    fn dangling_current_id_falls_back_to_board() {
        let mut store = MemoryStore::new();
        store.set(keys::CURRENT_SAVE, "404").unwrap();
        store.set(keys::BOARD, &encode_scene(&one_rect()).unwrap()).unwrap();

        let (lib, scene) = Library::open(store);
        assert_eq!(lib.current_id(), None);
        assert_eq!(scene, one_rect());
    }

    #[test]
    fn malformed_data_is_treated_as_absent() {
        let mut store = MemoryStore::new();
        store.set(keys::SAVES, "{oops").unwrap();
        store.set(keys::BOARD, r#"[{"type":"hexagon"}]"#).unwrap();

        let (lib, scene) = Library::open(store);
        assert!(scene.is_empty());
        assert!(lib.directory().is_empty());
    }

    #[test]
    fn unreadable_directory_is_never_overwritten() {
        let mut store = MemoryStore::new();
        store.set(keys::SAVES, "{oops").unwrap();

        let (mut lib, _) = Library::open(store);
        let err = lib.save("Plan", &one_rect(), 7.0).unwrap_err();
        assert!(matches!(err, PersistError::DirectoryUnreadable));
        assert_eq!(lib.current_id(), Some("7"));
        assert_eq!(lib.store().get(keys::SAVES).as_deref(), Some("{oops"));
        assert_eq!(lib.store().get(keys::CURRENT_SAVE), None);
    }

    #[test]
    fn one_bad_entry_keeps_the_others_on_save() {
        let mut store = MemoryStore::new();
        let good = encode_scene(&one_rect()).unwrap();
        store
            .set(
                keys::SAVES,
                &format!(
                    r#"[{{"id":"1","title":"Good","data":{good}}},{{"id":"2","title":"Odd","data":[{{"type":"ellipse"}}]}}]"#
                ),
            )
            .unwrap();

        let (mut lib, _) = Library::open(store);
        assert_eq!(
            lib.summaries(),
            vec![SaveSummary {
                id: "1".into(),
                title: "Good".into()
            }]
        );
        let id = lib.save("New", &Scene::new(), 10.0).unwrap();
        assert_eq!(id, "10");

        let stored = lib.store().get(keys::SAVES).unwrap();
        let reread = SaveDirectory::decode(&stored).unwrap();
        assert_eq!(reread.get("1").map(|e| e.data.clone()), Some(one_rect()));
        assert!(reread.contains("10"));
        assert_eq!(reread.unreadable_len(), 1);
        assert!(stored.contains(r#""type":"ellipse""#));
    }

    #[test]
    fn detach_forgets_current_entry() {
        let (mut lib, _) = Library::open(MemoryStore::new());
        lib.save("A", &one_rect(), 1.0).unwrap();
        lib.detach();
        assert_eq!(lib.current_id(), None);
        assert_eq!(lib.store().get(keys::CURRENT_SAVE), None);

        assert_eq!(lib.open_entry("1"), Some(one_rect()));
        assert_eq!(lib.open_entry("2"), None);
        assert_eq!(lib.current_id(), Some("1"));
    }

    #[test]
    fn quota_failure_keeps_directory_in_memory() {
        let (mut lib, _) = Library::open(MemoryStore::with_quota(16));
        let err = lib.save("Too big", &one_rect(), 1.0).unwrap_err();
        assert!(matches!(err, PersistError::Store(StoreError::QuotaExceeded { .. })));
        assert_eq!(lib.directory().len(), 1);
    }
}
