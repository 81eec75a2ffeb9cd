//! The editor facade: one scene, its history, and the gesture in progress.
//!
//! Hosts feed it `InputEvent`s and call the command methods; every command
//! that changes the document records exactly one history snapshot after the
//! change completes.

use crate::history::History;
use crate::input::{InputEvent, Modifiers};
use crate::interaction::Interaction;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use pc_core::{
    ApproxMeasure, EditorConfig, Element, ElementId, ImportError, Scene, SceneEvent, TextMeasure,
    Validation, Viewport,
};
use pc_layout::{LayoutProposal, RefineConfig, Suggestion, boxes_of, brainstorm, suggest_refinements};
use std::cell::RefCell;
use std::rc::Rc;

pub struct Editor {
    scene: Scene,
    history: History,
    interaction: Interaction,
    config: EditorConfig,
    viewport: Viewport,
    refine: RefineConfig,
    measure: Box<dyn TextMeasure>,
}

impl Editor {
    pub fn new(config: EditorConfig, viewport: Viewport) -> Self {
        Self::with_measure(config, viewport, Box::new(ApproxMeasure))
    }

    /// Editor whose text heights come from `measure` (e.g. a canvas context).
    pub fn with_measure(
        config: EditorConfig,
        viewport: Viewport,
        measure: Box<dyn TextMeasure>,
    ) -> Self {
        let mut scene = Scene::new();
        scene.grid_size = config.grid_size;
        let mut editor = Self {
            scene,
            history: History::new(config.history_limit),
            interaction: Interaction::new(),
            config,
            viewport,
            refine: RefineConfig::default(),
            measure,
        };
        // The empty document is the oldest undo target.
        editor.commit();
        editor
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Direct scene access. Changes made here are not recorded until
    /// `commit` is called.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_measure(&mut self, measure: Box<dyn TextMeasure>) {
        self.measure = measure;
    }

    pub fn set_refine_config(&mut self, refine: RefineConfig) {
        self.refine = refine;
    }

    /// Listen to scene and history notifications through one callback.
    pub fn subscribe(&mut self, listener: impl FnMut(&SceneEvent) + 'static) {
        let shared = Rc::new(RefCell::new(listener));
        let for_history = Rc::clone(&shared);
        self.scene.events.subscribe(move |event| {
            let mut listener = shared.borrow_mut();
            (*listener)(event);
        });
        self.history.events.subscribe(move |event| {
            let mut listener = for_history.borrow_mut();
            (*listener)(event);
        });
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Record the current scene as a new history state.
    pub fn commit(&mut self) {
        self.history.save_state(self.scene.snapshot());
    }

    pub fn undo(&mut self) -> bool {
        self.interaction.reset(&mut self.scene);
        match self.history.undo() {
            Some(snapshot) => {
                self.scene.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.interaction.reset(&mut self.scene);
        match self.history.redo() {
            Some(snapshot) => {
                self.scene.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Dispatch a normalized input event. Returns whether to repaint.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y, modifiers } => {
                self.pointer_down(*x, *y, *modifiers);
                true
            }
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(*x, *y),
            InputEvent::PointerUp { x, y } => {
                self.pointer_up(*x, *y);
                true
            }
            InputEvent::DoubleClick { x, y } => self.double_click(*x, *y),
            InputEvent::Key { key, modifiers } => self.key_down(key, *modifiers),
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, modifiers: Modifiers) {
        if let Some(id) = self.interaction.editing_id() {
            if self.scene.get(id).is_some_and(|el| el.contains(x, y)) {
                return;
            }
            self.finish_text_editing();
        }
        self.interaction
            .pointer_down(&mut self.scene, &self.config, x, y, modifiers);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.interaction
            .pointer_move(&mut self.scene, &self.config, x, y)
    }

    /// Finish the gesture. A drag or resize that moved something is
    /// committed before the gesture state is cleared.
    pub fn pointer_up(&mut self, x: f32, y: f32) {
        if self.interaction.has_uncommitted_change(&self.scene) {
            log::debug!("commit transform");
            self.commit();
        }
        self.interaction.pointer_up(&mut self.scene, x, y);
    }

    /// Enter text editing on the text element under the point.
    pub fn double_click(&mut self, x: f32, y: f32) -> bool {
        if self.interaction.editing_id().is_some() {
            return false;
        }
        self.interaction.begin_text_editing(&mut self.scene, x, y)
    }

    /// Route a key press to the text being edited, or else to a shortcut.
    /// Returns whether the key did anything.
    pub fn key_down(&mut self, key: &str, modifiers: Modifiers) -> bool {
        if self.interaction.editing_id().is_some() {
            if key == "Escape" {
                self.finish_text_editing();
                return true;
            }
            if modifiers.command() {
                return false;
            }
            return self.interaction.edit_text(
                &mut self.scene,
                &self.config,
                self.measure.as_ref(),
                key,
            );
        }

        let Some(action) = ShortcutMap::resolve(
            key,
            modifiers.ctrl,
            modifiers.shift,
            modifiers.alt,
            modifiers.meta,
        ) else {
            return false;
        };
        log::debug!("shortcut {action:?}");
        self.run(action)
    }

    pub fn run(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::SelectAll => {
                self.scene.select_all();
                true
            }
            ShortcutAction::Duplicate => !self.duplicate_selected().is_empty(),
            ShortcutAction::Delete => self.delete_selected() > 0,
            ShortcutAction::Deselect => {
                self.scene.clear_selection();
                true
            }
            ShortcutAction::ToggleGrid => {
                self.toggle_grid();
                true
            }
            ShortcutAction::BringToFront => self.bring_to_front(),
            ShortcutAction::SendToBack => self.send_to_back(),
        }
    }

    /// Leave text editing, committing when the content changed.
    pub fn finish_text_editing(&mut self) {
        if self.interaction.end_text_editing(&mut self.scene) {
            self.commit();
        }
    }

    pub fn blink_cursor(&mut self) -> bool {
        self.interaction.blink_cursor(&mut self.scene)
    }

    // ─── Commands ────────────────────────────────────────────────────────

    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = self.scene.add_element(element);
        self.commit();
        id
    }

    pub fn delete_selected(&mut self) -> usize {
        let ids = self.scene.selected().to_vec();
        if ids.is_empty() {
            return 0;
        }
        let removed = self.scene.remove_elements(&ids);
        self.commit();
        removed
    }

    /// Duplicate the selection and select the copies.
    pub fn duplicate_selected(&mut self) -> Vec<ElementId> {
        let ids = self.scene.selected().to_vec();
        let copies = self
            .scene
            .duplicate_elements(&ids, self.config.duplicate_offset);
        if !copies.is_empty() {
            self.scene.set_selection(&copies);
            self.commit();
        }
        copies
    }

    /// Show or hide the grid. Grid visibility lives in snapshots, so the
    /// toggle is its own undo step. Returns the new visibility.
    pub fn toggle_grid(&mut self) -> bool {
        self.scene.show_grid = !self.scene.show_grid;
        self.commit();
        self.scene.show_grid
    }

    pub fn bring_to_front(&mut self) -> bool {
        let ids = self.scene.selected().to_vec();
        if ids.is_empty() {
            return false;
        }
        self.scene.bring_to_front(&ids);
        self.commit();
        true
    }

    pub fn send_to_back(&mut self) -> bool {
        let ids = self.scene.selected().to_vec();
        if ids.is_empty() {
            return false;
        }
        self.scene.send_to_back(&ids);
        self.commit();
        true
    }

    // ─── Layout assistance ───────────────────────────────────────────────

    /// The element refinements target: the first selected, if unlocked.
    fn refine_target(&self) -> Option<(ElementId, usize)> {
        let id = *self.scene.selected().first()?;
        self.scene.get(id).filter(|el| !el.locked)?;
        Some((id, self.scene.index_of(id)?))
    }

    /// Ranked single-element refinements for the current selection.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        let Some((_, index)) = self.refine_target() else {
            return Vec::new();
        };
        let boxes = boxes_of(self.scene.elements());
        suggest_refinements(index, &boxes, self.viewport, &self.refine)
    }

    /// Apply a suggestion from `suggestions` to the selected element.
    pub fn apply_suggestion(&mut self, suggestion: &Suggestion) -> bool {
        let Some((id, _)) = self.refine_target() else {
            return false;
        };
        let Some(el) = self.scene.get_mut(id) else {
            return false;
        };
        suggestion.apply(el);
        log::debug!("applied {:?} to {id}", suggestion.kind);
        self.scene.notify_elements_changed();
        self.commit();
        true
    }

    /// Whole-layout alternatives for the current scene. Nothing changes
    /// until one is passed to `apply_layout`.
    pub fn brainstorm(&self) -> Vec<LayoutProposal> {
        brainstorm(self.scene.elements(), self.viewport, self.measure.as_ref())
    }

    /// Adopt a proposal's geometry. Elements the proposal left out (trimmed
    /// by overflow) are removed, so the result matches the preview.
    pub fn apply_layout(&mut self, proposal: &LayoutProposal) {
        let ids: Vec<ElementId> = self.scene.elements().iter().map(|el| el.id).collect();
        let mut dropped = Vec::new();
        for id in ids {
            let placed = proposal.elements.iter().find(|p| p.id == id);
            match (placed, self.scene.get_mut(id)) {
                (Some(p), Some(el)) => el.set_bounds(p.bounds()),
                _ => dropped.push(id),
            }
        }
        if !dropped.is_empty() {
            self.scene.remove_elements(&dropped);
        }
        log::debug!("applied layout {}", proposal.name);
        self.scene.notify_elements_changed();
        self.commit();
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Replace the document with a serialized layout. Atomic on error.
    pub fn import_layout(&mut self, json: &str, mode: Validation) -> Result<usize, ImportError> {
        let count = self.scene.import_layout(json, mode)?;
        self.interaction.reset(&mut self.scene);
        self.commit();
        Ok(count)
    }

    pub fn load_template(
        &mut self,
        records: Vec<Element>,
        mode: Validation,
    ) -> Result<usize, ImportError> {
        let count = self.scene.load_template(records, mode)?;
        self.interaction.reset(&mut self.scene);
        self.commit();
        Ok(count)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default(), Viewport::default())
    }
}
