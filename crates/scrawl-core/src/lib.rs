pub mod error;
pub mod format;
pub mod geometry;
pub mod model;
pub mod store;
pub mod viewport;

pub use error::{FormatError, StoreError};
pub use format::{SaveDirectory, SaveEntry, decode_scene, encode_scene};
pub use geometry::{Point, point_to_segment};
pub use model::*;
pub use store::{KeyValueStore, MemoryStore};
pub use viewport::{ScaleLimits, Viewport, ZoomDirection};
