//! Undo/redo history.
//!
//! A bounded list of deep-copied scene snapshots plus a cursor. Saving after
//! an undo discards the redo branch; saving past the limit evicts the oldest
//! snapshot. Undo/redo hand back clones, so a restored scene can be mutated
//! freely without touching what is stored here.

use pc_core::{EventBus, SceneEvent, SceneSnapshot};

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug)]
pub struct History {
    snapshots: Vec<SceneSnapshot>,
    /// Position of the current state. Meaningless while `snapshots` is empty.
    index: usize,
    limit: usize,
    pub events: EventBus,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            index: 0,
            limit: limit.max(1),
            events: EventBus::new(),
        }
    }

    /// Record `snapshot` as the newest state.
    pub fn save_state(&mut self, snapshot: SceneSnapshot) {
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.index + 1);
        }
        self.snapshots.push(snapshot);
        self.index = self.snapshots.len() - 1;

        if self.snapshots.len() > self.limit {
            self.snapshots.remove(0);
            self.index -= 1;
        }
        log::debug!("history: saved state {}/{}", self.index + 1, self.snapshots.len());
        self.notify();
    }

    /// Step back. `None` when already at the oldest state.
    pub fn undo(&mut self) -> Option<SceneSnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        log::debug!("history: undo to {}", self.index);
        self.notify();
        self.snapshots.get(self.index).cloned()
    }

    /// Step forward. `None` when already at the newest state.
    pub fn redo(&mut self) -> Option<SceneSnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        log::debug!("history: redo to {}", self.index);
        self.notify();
        self.snapshots.get(self.index).cloned()
    }

    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty() && self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.index = 0;
        self.notify();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The state the cursor points at.
    pub fn current(&self) -> Option<&SceneSnapshot> {
        self.snapshots.get(self.index)
    }

    fn notify(&mut self) {
        let event = SceneEvent::HistoryChanged {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        };
        self.events.emit(event);
    }
}
