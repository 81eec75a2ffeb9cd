//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. On macOS
//! `meta` is ⌘; elsewhere `ctrl` plays the same role.
//!
//! | Keys | Action |
//! |------|--------|
//! | ⌘Z | Undo |
//! | ⌘⇧Z, ⌘Y | Redo |
//! | ⌘A | Select all |
//! | ⌘D | Duplicate |
//! | ⌘' | Toggle grid |
//! | ⌘⇧] / ⌘⇧[ | Bring to front / send to back |
//! | Delete, Backspace | Delete selection |
//! | Escape | Deselect |
//!
//! The map is never consulted while a text element is being edited; those
//! keys go to the text instead.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    SelectAll,
    Duplicate,
    Delete,
    Deselect,
    ToggleGrid,
    BringToFront,
    SendToBack,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // Most specific combos first.
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                // Shift turns brackets into braces on US layouts.
                "]" | "}" => Some(ShortcutAction::BringToFront),
                "[" | "{" => Some(ShortcutAction::SendToBack),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "'" => Some(ShortcutAction::ToggleGrid),
                _ => None,
            };
        }

        if shift {
            return None;
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
