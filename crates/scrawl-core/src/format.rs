//! Persisted board format.
//!
//! Boards are stored as JSON arrays of tagged objects
//! (`{"type":"rect","x":..,"y":..,"w":..,"h":..}`). The same encoding is
//! used for the autosave blob and for every entry of the save directory.
//!
//! Loading applies forward migrations for data written by older versions:
//! - text objects without a colour (or with an empty one) get
//!   [`DEFAULT_TEXT_COLOR`];
//! - paths without any points are dropped.

use crate::error::FormatError;
use crate::model::{DEFAULT_TEXT_COLOR, DrawObject, Scene};
use serde::{Deserialize, Serialize};

/// Storage keys.
pub mod keys {
    /// Autosaved scratch board (also the legacy single-document slot).
    pub const BOARD: &str = "draw-data";
    /// The save directory: JSON array of [`super::SaveEntry`].
    pub const SAVES: &str = "draw-saves";
    /// Id of the directory entry that is currently open.
    pub const CURRENT_SAVE: &str = "current-save";
}

/// Serialize a scene to its stored text form.
pub fn encode_scene(scene: &Scene) -> Result<String, FormatError> {
    Ok(serde_json::to_string(scene)?)
}

/// Parse a stored scene and apply forward migrations.
///
/// # Errors
/// Returns [`FormatError::Malformed`] if the text is not a JSON array of
/// known object variants.
pub fn decode_scene(text: &str) -> Result<Scene, FormatError> {
    let mut scene: Scene = serde_json::from_str(text)?;
    migrate_scene(&mut scene);
    Ok(scene)
}

/// Bring a freshly decoded scene up to the current format.
pub fn migrate_scene(scene: &mut Scene) {
    let objects = scene.objects_mut();
    let before = objects.len();
    objects.retain(|o| !matches!(o, DrawObject::Path { points } if points.is_empty()));
    if objects.len() != before {
        log::warn!("dropped {} empty path(s) while loading", before - objects.len());
    }
    for obj in objects.iter_mut() {
        if let DrawObject::Text { color, .. } = obj
            && color.is_empty()
        {
            *color = DEFAULT_TEXT_COLOR.to_string();
        }
    }
}

// ─── Save directory ──────────────────────────────────────────────────────

/// A named, explicitly saved drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEntry {
    pub id: String,
    pub title: String,
    pub data: Scene,
}

/// All named drawings, in creation order.
///
/// Stored entries that do not decode (an unknown object variant, a missing
/// field) are kept verbatim and written back after the readable ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveDirectory {
    entries: Vec<SaveEntry>,
    unreadable: Vec<serde_json::Value>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum StoredSlot<'a> {
    Entry(&'a SaveEntry),
    Raw(&'a serde_json::Value),
}

impl SaveDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stored directory, migrating every entry's scene.
    ///
    /// # Errors
    /// Fails only if the text is not a JSON array. Entries that do not
    /// decode are set aside (see [`SaveDirectory::unreadable_len`]).
    pub fn decode(text: &str) -> Result<Self, FormatError> {
        let raw: Vec<serde_json::Value> = serde_json::from_str(text)?;
        let mut dir = Self::new();
        for value in raw {
            match SaveEntry::deserialize(&value) {
                Ok(mut entry) => {
                    migrate_scene(&mut entry.data);
                    dir.entries.push(entry);
                }
                Err(e) => {
                    log::warn!("keeping unreadable saved drawing {}: {e}", value["id"]);
                    dir.unreadable.push(value);
                }
            }
        }
        Ok(dir)
    }

    pub fn encode(&self) -> Result<String, FormatError> {
        let slots: Vec<StoredSlot<'_>> = self
            .entries
            .iter()
            .map(StoredSlot::Entry)
            .chain(self.unreadable.iter().map(StoredSlot::Raw))
            .collect();
        Ok(serde_json::to_string(&slots)?)
    }

    /// Stored entries that could not be read and are carried along as-is.
    pub fn unreadable_len(&self) -> usize {
        self.unreadable.len()
    }

    pub fn get(&self, id: &str) -> Option<&SaveEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut SaveEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn push(&mut self, entry: SaveEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[SaveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A time-based id derived from `now_ms`, bumped until it is unused.
    pub fn fresh_id(&self, now_ms: f64) -> String {
        let mut n = now_ms.max(0.0).floor() as u64;
        loop {
            let id = n.to_string();
            if !self.contains(&id) && !self.unreadable.iter().any(|v| v["id"] == id.as_str()) {
                return id;
            }
            n += 1;
        }
    }
}
