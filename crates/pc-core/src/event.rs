//! Change notifications for UI synchronization.

/// The fixed set of notifications the editor core emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// Elements were added, removed, reordered, or changed geometry/content.
    ElementsChanged,
    /// The selection set changed.
    SelectionChanged,
    /// The undo/redo availability after a history operation.
    HistoryChanged { can_undo: bool, can_redo: bool },
}

type Listener = Box<dyn FnMut(&SceneEvent)>;

/// Synchronous observer list. Listeners run in subscription order.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SceneEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: SceneEvent) {
        log::trace!("emit {event:?} to {} listener(s)", self.listeners.len());
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
