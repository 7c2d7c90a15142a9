//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so every host gets the same bindings.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    ToolDraw,
    ToolRect,
    ToolLine,
    ToolText,
    ToolSelect,

    // ── Edit ──
    Undo,
    Redo,

    // ── View ──
    /// Space held: pointer-down pans instead of using the tool.
    PanStart,

    Deselect,
}

/// Resolves key events into shortcut actions.
///
/// Platform-aware: on macOS `meta` is ⌘, elsewhere `ctrl` plays the
/// same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Escape"`).
    /// Returns `None` if the combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        match key {
            "d" | "D" => Some(ShortcutAction::ToolDraw),
            "r" | "R" => Some(ShortcutAction::ToolRect),
            "l" | "L" => Some(ShortcutAction::ToolLine),
            "t" | "T" => Some(ShortcutAction::ToolText),
            "v" | "V" => Some(ShortcutAction::ToolSelect),
            "Escape" => Some(ShortcutAction::Deselect),
            " " => Some(ShortcutAction::PanStart),
            _ => None,
        }
    }
}
