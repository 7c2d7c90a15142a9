pub mod autosave;
pub mod config;
pub mod history;
pub mod input;
pub mod ops;
pub mod persist;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use autosave::Debouncer;
pub use config::BoardConfig;
pub use history::History;
pub use input::{InputEvent, PointerButton};
pub use persist::{Library, PersistError, SaveSummary};
pub use session::{Gesture, Session, TextEditFrame};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::ToolKind;
