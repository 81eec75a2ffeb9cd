pub mod editor;
pub mod history;
pub mod input;
pub mod interaction;
pub mod shortcuts;

pub use editor::Editor;
pub use history::History;
pub use input::{InputEvent, Modifiers};
pub use interaction::{Interaction, InteractionState};
pub use shortcuts::{ShortcutAction, ShortcutMap};
