//! Scene state: the ordered element list, selection, and view settings.
//!
//! Element order is paint order: the last element is drawn on top and wins
//! hit tests. The scene exclusively owns its elements; snapshots are deep
//! copies, so mutating the live scene never alters a stored snapshot.
//!
//! Invariant: every id in `selected` names an element in `elements`, and an
//! element's `is_selected` flag is set exactly when its id is selected.

use crate::element::Element;
use crate::error::ImportError;
use crate::event::{EventBus, SceneEvent};
use crate::geometry::Bounds;
use crate::id::ElementId;
use smallvec::SmallVec;
use std::collections::HashSet;

pub type Selection = SmallVec<[ElementId; 4]>;

/// How strictly imported records are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    /// Reject the whole import if any element fails validation.
    #[default]
    Strict,
    /// Accept invalid geometry for backward compatibility.
    Lenient,
}

/// Immutable deep copy of scene state, used for undo/redo.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSnapshot {
    pub elements: Vec<Element>,
    pub selected: Selection,
    pub zoom: f32,
    pub grid_size: f32,
    pub show_grid: bool,
}

#[derive(Debug)]
pub struct Scene {
    elements: Vec<Element>,
    selected: Selection,
    pub zoom: f32,
    pub grid_size: f32,
    pub show_grid: bool,
    pub events: EventBus,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            selected: Selection::new(),
            zoom: 1.0,
            grid_size: 10.0,
            show_grid: false,
            events: EventBus::new(),
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|el| el.id == id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    /// Mutable access for in-place edits. Callers emit
    /// `notify_elements_changed` once the edit is complete.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id == id)
    }

    pub fn selected(&self) -> &[ElementId] {
        &self.selected
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected elements in paint order.
    pub fn selected_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|el| el.is_selected)
    }

    /// Topmost element containing the point.
    pub fn element_at(&self, x: f32, y: f32) -> Option<&Element> {
        self.elements.iter().rev().find(|el| el.contains(x, y))
    }

    /// Elements whose bounds intersect the rectangle spanned by two corners.
    pub fn elements_in_area(&self, x1: f32, y1: f32, x2: f32, y2: f32) -> Vec<ElementId> {
        let area = Bounds::from_corners(x1, y1, x2, y2);
        self.elements
            .iter()
            .filter(|el| el.bounds().intersects(&area))
            .map(|el| el.id)
            .collect()
    }

    // ─── Mutation ────────────────────────────────────────────────────────

    /// Append an element on top of the paint order.
    ///
    /// An id already present in the scene is replaced with a fresh one, so
    /// the returned id is the one to use.
    pub fn add_element(&mut self, mut element: Element) -> ElementId {
        if self.get(element.id).is_some() {
            element.id = ElementId::with_prefix(element.element_type().as_str());
        }
        element.clear_transient();
        let id = element.id;
        log::debug!("add {} {id}", element.element_type().as_str());
        self.elements.push(element);
        self.events.emit(SceneEvent::ElementsChanged);
        id
    }

    /// Remove the listed elements. Ids not in the scene are ignored.
    pub fn remove_elements(&mut self, ids: &[ElementId]) -> usize {
        let before = self.elements.len();
        self.elements.retain(|el| !ids.contains(&el.id));
        let removed = before - self.elements.len();

        let selected_before = self.selected.len();
        self.selected.retain(|id| !ids.contains(id));
        let selection_changed = self.selected.len() != selected_before;

        log::debug!("removed {removed} element(s)");
        self.events.emit(SceneEvent::ElementsChanged);
        if selection_changed {
            self.events.emit(SceneEvent::SelectionChanged);
        }
        removed
    }

    /// Append offset copies of the listed elements; returns the new ids in
    /// the order the originals were listed.
    pub fn duplicate_elements(&mut self, ids: &[ElementId], offset: f32) -> Vec<ElementId> {
        let copies: Vec<Element> = ids
            .iter()
            .filter_map(|id| self.get(*id))
            .map(|el| el.duplicate(offset))
            .collect();
        let new_ids: Vec<ElementId> = copies.iter().map(|el| el.id).collect();
        if copies.is_empty() {
            return new_ids;
        }
        self.elements.extend(copies);
        self.events.emit(SceneEvent::ElementsChanged);
        new_ids
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        let had_selection = !self.selected.is_empty();
        self.elements.clear();
        self.selected.clear();
        self.events.emit(SceneEvent::ElementsChanged);
        if had_selection {
            self.events.emit(SceneEvent::SelectionChanged);
        }
    }

    /// Move the listed elements to the top of the paint order, keeping
    /// their relative order.
    pub fn bring_to_front(&mut self, ids: &[ElementId]) {
        let (front, mut rest): (Vec<Element>, Vec<Element>) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|el| ids.contains(&el.id));
        rest.extend(front);
        self.elements = rest;
        self.events.emit(SceneEvent::ElementsChanged);
    }

    /// Move the listed elements to the bottom of the paint order.
    pub fn send_to_back(&mut self, ids: &[ElementId]) {
        let (mut back, rest): (Vec<Element>, Vec<Element>) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|el| ids.contains(&el.id));
        back.extend(rest);
        self.elements = back;
        self.events.emit(SceneEvent::ElementsChanged);
    }

    pub fn notify_elements_changed(&mut self) {
        self.events.emit(SceneEvent::ElementsChanged);
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Make `id` the only selected element.
    pub fn select_element(&mut self, id: ElementId) {
        if self.get(id).is_none() {
            return;
        }
        self.selected.clear();
        self.selected.push(id);
        self.sync_selection_flags();
    }

    /// Add `id` to the selection, or remove it if already selected.
    pub fn toggle_element_selection(&mut self, id: ElementId) {
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
        } else if self.get(id).is_some() {
            self.selected.push(id);
        } else {
            return;
        }
        self.sync_selection_flags();
    }

    pub fn select_all(&mut self) {
        self.selected = self.elements.iter().map(|el| el.id).collect();
        self.sync_selection_flags();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.sync_selection_flags();
    }

    /// Replace the selection. Unknown ids and repeats are dropped.
    pub fn set_selection(&mut self, ids: &[ElementId]) {
        let mut next = Selection::new();
        for id in ids {
            if !next.contains(id) && self.get(*id).is_some() {
                next.push(*id);
            }
        }
        self.selected = next;
        self.sync_selection_flags();
    }

    fn sync_selection_flags(&mut self) {
        for el in &mut self.elements {
            el.is_selected = self.selected.contains(&el.id);
        }
        self.events.emit(SceneEvent::SelectionChanged);
    }

    // ─── Snapshots ───────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            elements: self.elements.clone(),
            selected: self.selected.clone(),
            zoom: self.zoom,
            grid_size: self.grid_size,
            show_grid: self.show_grid,
        }
    }

    /// Adopt a snapshot wholesale. Selection flags are rebuilt from the
    /// snapshot's selected ids; editing flags are cleared.
    pub fn restore(&mut self, snapshot: SceneSnapshot) {
        self.elements = snapshot.elements;
        for el in &mut self.elements {
            el.clear_transient();
        }
        self.selected = snapshot.selected;
        let present: HashSet<ElementId> = self.elements.iter().map(|el| el.id).collect();
        self.selected.retain(|id| present.contains(&*id));
        self.zoom = snapshot.zoom;
        self.grid_size = snapshot.grid_size;
        self.show_grid = snapshot.show_grid;
        self.events.emit(SceneEvent::ElementsChanged);
        self.sync_selection_flags();
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Persisted records of every element, in paint order.
    pub fn export_layout(&self) -> Vec<Element> {
        self.elements
            .iter()
            .cloned()
            .map(|mut el| {
                el.clear_transient();
                el
            })
            .collect()
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.export_layout())
    }

    /// Replace the scene's elements with a serialized layout.
    ///
    /// Atomic: on error the scene is unchanged.
    pub fn import_layout(&mut self, json: &str, mode: Validation) -> Result<usize, ImportError> {
        let records: Vec<Element> = serde_json::from_str(json).inspect_err(|e| {
            log::warn!("rejected layout import: {e}");
        })?;
        self.load_template(records, mode)
    }

    /// Instantiate template records as the scene's elements.
    ///
    /// Records without an id get a generated one, as do repeated ids.
    pub fn load_template(
        &mut self,
        records: Vec<Element>,
        mode: Validation,
    ) -> Result<usize, ImportError> {
        if mode == Validation::Strict {
            for (index, el) in records.iter().enumerate() {
                if let Some(source) = el.validation_error() {
                    log::warn!("rejected layout import: element {index}: {source}");
                    return Err(ImportError::InvalidElement { index, source });
                }
            }
        }

        let mut seen = HashSet::new();
        let elements: Vec<Element> = records
            .into_iter()
            .map(|mut el| {
                if !seen.insert(el.id) {
                    el.id = ElementId::generated();
                    seen.insert(el.id);
                }
                el.clear_transient();
                el
            })
            .collect();

        let count = elements.len();
        log::debug!("loaded {count} element(s)");
        self.elements = elements;
        self.selected.clear();
        self.events.emit(SceneEvent::ElementsChanged);
        self.sync_selection_flags();
        Ok(count)
    }
}
