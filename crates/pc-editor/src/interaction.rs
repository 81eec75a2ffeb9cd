//! Pointer and text-entry state machine.
//!
//! ```text
//!            pointer-down on handle            pointer-down on element
//!   Resizing ◄────────────────────── Idle ──────────────────────► Dragging
//!      │                            ▲ │ ▲                            │
//!      └──────── pointer-up ────────┘ │ └──────── pointer-up ────────┘
//!                                     │
//!          pointer-down on empty ─────┤───── double-click on text
//!                   ▼                 │               ▼
//!          MarqueeSelecting ──────────┘         TextEditing
//!                                          (Escape / click outside → Idle)
//! ```
//!
//! Locked elements can be selected but never enter Dragging, Resizing, or
//! TextEditing. Pointer positions are snapped to the grid before they touch
//! geometry. Releasing the pointer always keeps the transform; there is no
//! cancel gesture.
//!
//! The state machine mutates the scene directly but never records history;
//! the editor asks `has_uncommitted_change` before `pointer_up` so the
//! snapshot is taken while the gesture is still live.

use crate::input::{Modifiers, printable_char};
use pc_core::text::text_height;
use pc_core::{Bounds, EditorConfig, ElementId, Handle, Point, Scene, TextMeasure};
use smallvec::SmallVec;

/// Pre-gesture bounds of every element a gesture moves.
pub type Originals = SmallVec<[(ElementId, Bounds); 4]>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging {
        start: Point,
        originals: Originals,
    },
    Resizing {
        /// Element whose handle was grabbed.
        target: ElementId,
        handle: Handle,
        originals: Originals,
    },
    MarqueeSelecting {
        anchor: Point,
        current: Point,
        /// Selection kept from before the marquee (shift-marquee adds to it).
        base: Vec<ElementId>,
    },
    TextEditing {
        id: ElementId,
        /// Content when editing began; decides whether finishing commits.
        original: String,
        /// Height when editing began. Wrapping grows the box past it but
        /// never shrinks it below.
        base_height: f32,
    },
}

#[derive(Debug, Default)]
pub struct Interaction {
    state: InteractionState,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    /// Element currently in text-edit mode.
    pub fn editing_id(&self) -> Option<ElementId> {
        match &self.state {
            InteractionState::TextEditing { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Live rubber-band rectangle, for the renderer.
    pub fn marquee_rect(&self) -> Option<Bounds> {
        match &self.state {
            InteractionState::MarqueeSelecting { anchor, current, .. } => Some(
                Bounds::from_corners(anchor.x, anchor.y, current.x, current.y),
            ),
            _ => None,
        }
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    pub fn pointer_down(
        &mut self,
        scene: &mut Scene,
        config: &EditorConfig,
        x: f32,
        y: f32,
        modifiers: Modifiers,
    ) {
        if let Some((target, handle)) = handle_hit(scene, config, x, y) {
            log::debug!("resize {target} from {handle:?}");
            self.state = InteractionState::Resizing {
                target,
                handle,
                originals: movable_selection(scene),
            };
            return;
        }

        let hit = scene.element_at(x, y).map(|el| (el.id, el.locked));
        let Some((id, locked)) = hit else {
            if !modifiers.shift {
                scene.clear_selection();
            }
            let anchor = Point::new(x, y);
            self.state = InteractionState::MarqueeSelecting {
                anchor,
                current: anchor,
                base: scene.selected().to_vec(),
            };
            return;
        };

        if modifiers.shift {
            scene.toggle_element_selection(id);
        } else if !scene.is_selected(id) {
            scene.select_element(id);
        }

        if locked || !scene.is_selected(id) {
            self.state = InteractionState::Idle;
            return;
        }

        let originals = movable_selection(scene);
        self.state = if originals.is_empty() {
            InteractionState::Idle
        } else {
            InteractionState::Dragging {
                start: Point::new(x, y),
                originals,
            }
        };
    }

    /// Apply a pointer move. Returns whether anything needs repainting.
    pub fn pointer_move(&mut self, scene: &mut Scene, config: &EditorConfig, x: f32, y: f32) -> bool {
        let grid = scene.grid_size;
        let snap = |v: f32| config.snap_to(v, grid);
        match &mut self.state {
            InteractionState::Dragging { start, originals } => {
                let (dx, dy) = (x - start.x, y - start.y);
                for (id, b) in originals.iter() {
                    if let Some(el) = scene.get_mut(*id) {
                        el.x = snap(b.x + dx).max(0.0);
                        el.y = snap(b.y + dy).max(0.0);
                    }
                }
                scene.notify_elements_changed();
                true
            }
            InteractionState::Resizing {
                target,
                handle,
                originals,
            } => {
                let Some(anchor) = originals
                    .iter()
                    .find(|(id, _)| *id == *target)
                    .map(|(_, b)| *b)
                else {
                    return false;
                };
                let min = config.min_element_size;
                let resized = resize_from_handle(anchor, *handle, snap(x), snap(y), min);
                let sx = scale(resized.width, anchor.width);
                let sy = scale(resized.height, anchor.height);

                for (id, b) in originals.iter() {
                    let next = if *id == *target {
                        resized
                    } else {
                        anchored(*b, *handle, (b.width * sx).max(min), (b.height * sy).max(min))
                    };
                    if let Some(el) = scene.get_mut(*id) {
                        el.set_bounds(next);
                    }
                }
                scene.notify_elements_changed();
                true
            }
            InteractionState::MarqueeSelecting { current, .. } => {
                *current = Point::new(x, y);
                true
            }
            InteractionState::Idle | InteractionState::TextEditing { .. } => false,
        }
    }

    /// Whether the in-progress drag or resize moved anything.
    pub fn has_uncommitted_change(&self, scene: &Scene) -> bool {
        match &self.state {
            InteractionState::Dragging { originals, .. }
            | InteractionState::Resizing { originals, .. } => originals
                .iter()
                .any(|(id, b)| scene.get(*id).is_some_and(|el| el.bounds() != *b)),
            _ => false,
        }
    }

    /// End the gesture. A marquee settles the selection here.
    pub fn pointer_up(&mut self, scene: &mut Scene, x: f32, y: f32) {
        match std::mem::take(&mut self.state) {
            InteractionState::MarqueeSelecting { anchor, base, .. } => {
                let mut ids = base;
                for id in scene.elements_in_area(anchor.x, anchor.y, x, y) {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                log::debug!("marquee selected {} element(s)", ids.len());
                scene.set_selection(&ids);
            }
            editing @ InteractionState::TextEditing { .. } => self.state = editing,
            _ => {}
        }
    }

    // ─── Text editing ────────────────────────────────────────────────────

    /// Enter text-edit mode on the unlocked text element under the point.
    pub fn begin_text_editing(&mut self, scene: &mut Scene, x: f32, y: f32) -> bool {
        let target = scene
            .element_at(x, y)
            .filter(|el| !el.locked)
            .and_then(|el| {
                el.text_attrs()
                    .map(|attrs| (el.id, attrs.content.clone(), el.height))
            });
        let Some((id, original, base_height)) = target else {
            return false;
        };

        scene.select_element(id);
        if let Some(el) = scene.get_mut(id) {
            el.is_editing = true;
            el.cursor_visible = true;
        }
        scene.notify_elements_changed();
        log::debug!("editing text {id}");
        self.state = InteractionState::TextEditing {
            id,
            original,
            base_height,
        };
        true
    }

    /// Feed one key to the element being edited. Returns whether the
    /// content changed.
    pub fn edit_text(
        &mut self,
        scene: &mut Scene,
        config: &EditorConfig,
        measure: &dyn TextMeasure,
        key: &str,
    ) -> bool {
        let InteractionState::TextEditing { id, base_height, .. } = self.state else {
            return false;
        };
        let Some(el) = scene.get_mut(id) else {
            return false;
        };
        let width = el.width;
        let Some(attrs) = el.text_attrs_mut() else {
            return false;
        };

        match key {
            "Backspace" => {
                if attrs.content.pop().is_none() {
                    return false;
                }
            }
            "Enter" => attrs.content.push('\n'),
            _ => match printable_char(key) {
                Some(c) => attrs.content.push(c),
                None => return false,
            },
        }

        el.height = text_height(attrs, width, measure)
            .max(base_height)
            .max(config.min_element_size);
        el.cursor_visible = true;
        scene.notify_elements_changed();
        true
    }

    /// Leave text-edit mode. Returns whether the content differs from when
    /// editing began.
    pub fn end_text_editing(&mut self, scene: &mut Scene) -> bool {
        match std::mem::take(&mut self.state) {
            InteractionState::TextEditing { id, original, .. } => {
                let Some(el) = scene.get_mut(id) else {
                    return false;
                };
                el.is_editing = false;
                el.cursor_visible = false;
                let changed = el.text_attrs().is_some_and(|attrs| attrs.content != original);
                scene.notify_elements_changed();
                log::debug!("finished editing {id} (changed: {changed})");
                changed
            }
            other => {
                self.state = other;
                false
            }
        }
    }

    /// Flip the caret of the element being edited. Hosts call this on a timer.
    pub fn blink_cursor(&mut self, scene: &mut Scene) -> bool {
        let Some(el) = self.editing_id().and_then(|id| scene.get_mut(id)) else {
            return false;
        };
        el.cursor_visible = !el.cursor_visible;
        scene.notify_elements_changed();
        true
    }

    /// Drop any gesture without touching history. Used when the scene is
    /// replaced underneath the interaction (undo, import).
    pub fn reset(&mut self, scene: &mut Scene) {
        if let Some(el) = self.editing_id().and_then(|id| scene.get_mut(id)) {
            el.is_editing = false;
            el.cursor_visible = false;
        }
        self.state = InteractionState::Idle;
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// Bounds after dragging `handle` of `original` to `(px, py)`.
///
/// Width and height are clamped to `min`; the corner opposite the handle
/// stays fixed even when clamped.
pub fn resize_from_handle(original: Bounds, handle: Handle, px: f32, py: f32, min: f32) -> Bounds {
    let (right, bottom) = (original.right(), original.bottom());
    let (w, h) = match handle {
        Handle::TopLeft => (right - px, bottom - py),
        Handle::TopRight => (px - original.x, bottom - py),
        Handle::BottomLeft => (right - px, py - original.y),
        Handle::BottomRight => (px - original.x, py - original.y),
    };
    anchored(original, handle, w.max(min), h.max(min))
}

/// `original` resized to `width × height` with the corner opposite `handle`
/// held in place.
fn anchored(original: Bounds, handle: Handle, width: f32, height: f32) -> Bounds {
    let x = match handle {
        Handle::TopLeft | Handle::BottomLeft => original.right() - width,
        Handle::TopRight | Handle::BottomRight => original.x,
    };
    let y = match handle {
        Handle::TopLeft | Handle::TopRight => original.bottom() - height,
        Handle::BottomLeft | Handle::BottomRight => original.y,
    };
    Bounds::new(x, y, width, height)
}

fn scale(next: f32, original: f32) -> f32 {
    if original > 0.0 { next / original } else { 1.0 }
}

/// Topmost selected, unlocked element with a handle under the point.
fn handle_hit(scene: &Scene, config: &EditorConfig, x: f32, y: f32) -> Option<(ElementId, Handle)> {
    scene
        .elements()
        .iter()
        .rev()
        .filter(|el| el.is_selected && !el.locked)
        .find_map(|el| {
            el.resize_handle_at(x, y, config.handle_size, config.handle_margin)
                .map(|handle| (el.id, handle))
        })
}

fn movable_selection(scene: &Scene) -> Originals {
    scene
        .selected_elements()
        .filter(|el| !el.locked)
        .map(|el| (el.id, el.bounds()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc_core::element::DEFAULT_FILL;
    use pc_core::{ApproxMeasure, Element};
    use pretty_assertions::assert_eq;

    fn scene_with(bounds: &[Bounds]) -> (Scene, Vec<ElementId>) {
        let mut scene = Scene::new();
        let ids = bounds
            .iter()
            .map(|b| scene.add_element(Element::rect(*b, DEFAULT_FILL)))
            .collect();
        (scene, ids)
    }

    #[test]
    fn bottom_right_resize_keeps_origin() {
        let b = Bounds::new(40.0, 60.0, 100.0, 80.0);
        for (px, py) in [(200.0, 200.0), (90.0, 170.0), (300.0, 110.0)] {
            let r = resize_from_handle(b, Handle::BottomRight, px, py, 20.0);
            assert_eq!((r.x, r.y), (40.0, 60.0));
            assert_eq!((r.right(), r.bottom()), (px, py));
        }
    }

    #[test]
    fn top_left_resize_keeps_bottom_right_corner() {
        let b = Bounds::new(40.0, 60.0, 100.0, 80.0);
        for (px, py) in [(0.0, 0.0), (100.0, 90.0), (20.0, 110.0)] {
            let r = resize_from_handle(b, Handle::TopLeft, px, py, 20.0);
            assert_eq!((r.right(), r.bottom()), (140.0, 140.0));
            assert_eq!((r.x, r.y), (px, py));
        }
    }

    #[test]
    fn side_corners_fix_the_opposite_edges() {
        let b = Bounds::new(100.0, 100.0, 100.0, 100.0);
        let tr = resize_from_handle(b, Handle::TopRight, 250.0, 50.0, 20.0);
        assert_eq!(tr, Bounds::new(100.0, 50.0, 150.0, 150.0));
        let bl = resize_from_handle(b, Handle::BottomLeft, 50.0, 250.0, 20.0);
        assert_eq!(bl, Bounds::new(50.0, 100.0, 150.0, 150.0));
    }

    #[test]
    fn min_size_clamp_preserves_the_anchor() {
        let b = Bounds::new(100.0, 100.0, 100.0, 100.0);
        // Dragged far past the opposite corner.
        let r = resize_from_handle(b, Handle::TopLeft, 500.0, 500.0, 20.0);
        assert_eq!(r, Bounds::new(180.0, 180.0, 20.0, 20.0));
        let r = resize_from_handle(b, Handle::BottomRight, 0.0, 0.0, 20.0);
        assert_eq!(r, Bounds::new(100.0, 100.0, 20.0, 20.0));
    }

    #[test]
    fn drag_snaps_and_clamps_positions() {
        let (mut scene, ids) = scene_with(&[Bounds::new(100.0, 100.0, 50.0, 50.0)]);
        let config = EditorConfig::default();
        let mut ix = Interaction::new();

        ix.pointer_down(&mut scene, &config, 110.0, 110.0, Modifiers::NONE);
        assert!(matches!(ix.state(), InteractionState::Dragging { .. }));

        ix.pointer_move(&mut scene, &config, 143.0, 127.0);
        let el = scene.get(ids[0]).unwrap();
        assert_eq!((el.x, el.y), (130.0, 120.0));

        ix.pointer_move(&mut scene, &config, -500.0, 110.0);
        let el = scene.get(ids[0]).unwrap();
        assert_eq!((el.x, el.y), (0.0, 100.0));
        assert!(ix.has_uncommitted_change(&scene));
    }

    #[test]
    fn drag_snaps_to_the_scene_grid() {
        let (mut scene, ids) = scene_with(&[Bounds::new(100.0, 100.0, 50.0, 50.0)]);
        scene.grid_size = 25.0;
        let config = EditorConfig::default();
        let mut ix = Interaction::new();

        ix.pointer_down(&mut scene, &config, 110.0, 110.0, Modifiers::NONE);
        ix.pointer_move(&mut scene, &config, 143.0, 127.0);
        let el = scene.get(ids[0]).unwrap();
        assert_eq!((el.x, el.y), (125.0, 125.0));
    }

    #[test]
    fn multi_resize_scales_each_from_its_own_bounds() {
        let (mut scene, ids) = scene_with(&[
            Bounds::new(0.0, 0.0, 100.0, 100.0),
            Bounds::new(300.0, 300.0, 50.0, 40.0),
        ]);
        scene.select_all();
        let config = EditorConfig::default();
        let mut ix = Interaction::new();

        // Grab the first element's bottom-right corner and double its size.
        ix.pointer_down(&mut scene, &config, 100.0, 100.0, Modifiers::NONE);
        assert!(matches!(
            ix.state(),
            InteractionState::Resizing { handle: Handle::BottomRight, .. }
        ));
        ix.pointer_move(&mut scene, &config, 200.0, 200.0);

        assert_eq!(scene.get(ids[0]).unwrap().bounds(), Bounds::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(scene.get(ids[1]).unwrap().bounds(), Bounds::new(300.0, 300.0, 100.0, 80.0));
    }

    #[test]
    fn locked_elements_only_select() {
        let (mut scene, ids) = scene_with(&[Bounds::new(0.0, 0.0, 100.0, 100.0)]);
        if let Some(el) = scene.get_mut(ids[0]) {
            el.locked = true;
        }
        let config = EditorConfig::default();
        let mut ix = Interaction::new();

        ix.pointer_down(&mut scene, &config, 50.0, 50.0, Modifiers::NONE);
        assert!(scene.is_selected(ids[0]));
        assert!(ix.is_idle());

        // Handles of a locked element are not grabbable either.
        ix.pointer_down(&mut scene, &config, 100.0, 100.0, Modifiers::NONE);
        assert!(ix.is_idle());
    }

    #[test]
    fn shift_click_toggles_without_dragging_a_deselected_element() {
        let (mut scene, ids) = scene_with(&[
            Bounds::new(0.0, 0.0, 50.0, 50.0),
            Bounds::new(100.0, 0.0, 50.0, 50.0),
        ]);
        let config = EditorConfig::default();
        let mut ix = Interaction::new();

        ix.pointer_down(&mut scene, &config, 25.0, 25.0, Modifiers::NONE);
        ix.pointer_up(&mut scene, 25.0, 25.0);
        ix.pointer_down(&mut scene, &config, 125.0, 25.0, Modifiers::SHIFT);
        assert_eq!(scene.selected(), &[ids[0], ids[1]]);
        ix.pointer_up(&mut scene, 125.0, 25.0);

        ix.pointer_down(&mut scene, &config, 125.0, 25.0, Modifiers::SHIFT);
        assert_eq!(scene.selected(), &[ids[0]]);
        assert!(ix.is_idle());
    }

    #[test]
    fn marquee_selects_intersecting_elements() {
        let (mut scene, ids) = scene_with(&[
            Bounds::new(0.0, 0.0, 50.0, 50.0),
            Bounds::new(100.0, 100.0, 50.0, 50.0),
            Bounds::new(400.0, 400.0, 50.0, 50.0),
        ]);
        let config = EditorConfig::default();
        let mut ix = Interaction::new();

        ix.pointer_down(&mut scene, &config, 200.0, 200.0, Modifiers::NONE);
        ix.pointer_move(&mut scene, &config, 40.0, 40.0);
        assert_eq!(ix.marquee_rect(), Some(Bounds::new(40.0, 40.0, 160.0, 160.0)));
        ix.pointer_up(&mut scene, 40.0, 40.0);

        assert_eq!(scene.selected(), &[ids[0], ids[1]]);
        assert!(ix.is_idle());
    }

    #[test]
    fn text_editing_appends_and_grows() {
        let mut scene = Scene::new();
        let id = scene.add_element(Element::text(Bounds::new(0.0, 0.0, 200.0, 20.0), "Hi"));
        let config = EditorConfig::default();
        let mut ix = Interaction::new();

        assert!(ix.begin_text_editing(&mut scene, 10.0, 10.0));
        assert!(scene.get(id).unwrap().is_editing);

        assert!(ix.edit_text(&mut scene, &config, &ApproxMeasure, "!"));
        assert!(ix.edit_text(&mut scene, &config, &ApproxMeasure, "Enter"));
        assert!(ix.edit_text(&mut scene, &config, &ApproxMeasure, "x"));
        assert!(!ix.edit_text(&mut scene, &config, &ApproxMeasure, "ArrowLeft"));

        let el = scene.get(id).unwrap();
        assert_eq!(el.text_attrs().unwrap().content, "Hi!\nx");
        // two lines of 16px text
        assert!((el.height - 2.0 * 16.0 * 1.2).abs() < 0.01);

        assert!(ix.edit_text(&mut scene, &config, &ApproxMeasure, "Backspace"));
        assert!(ix.edit_text(&mut scene, &config, &ApproxMeasure, "Backspace"));
        // one line is 19.2, below the minimum size
        assert_eq!(scene.get(id).unwrap().height, 20.0);

        assert!(ix.end_text_editing(&mut scene));
        assert!(!scene.get(id).unwrap().is_editing);
        assert!(ix.is_idle());
    }

    #[test]
    fn typing_keeps_the_height_the_user_chose() {
        let mut scene = Scene::new();
        let id = scene.add_element(Element::text(Bounds::new(0.0, 0.0, 300.0, 200.0), "Hi"));
        let config = EditorConfig::default();
        let mut ix = Interaction::new();

        assert!(ix.begin_text_editing(&mut scene, 10.0, 10.0));
        assert!(ix.edit_text(&mut scene, &config, &ApproxMeasure, "!"));
        assert_eq!(scene.get(id).unwrap().height, 200.0);

        // 12 lines of 19.2 outgrow the box
        for _ in 0..11 {
            assert!(ix.edit_text(&mut scene, &config, &ApproxMeasure, "Enter"));
        }
        assert!((scene.get(id).unwrap().height - 12.0 * 16.0 * 1.2).abs() < 0.01);

        for _ in 0..11 {
            assert!(ix.edit_text(&mut scene, &config, &ApproxMeasure, "Backspace"));
        }
        assert_eq!(scene.get(id).unwrap().height, 200.0);
    }

    #[test]
    fn unchanged_text_edit_reports_no_change() {
        let mut scene = Scene::new();
        scene.add_element(Element::text(Bounds::new(0.0, 0.0, 200.0, 20.0), "Hi"));
        let config = EditorConfig::default();
        let mut ix = Interaction::new();

        ix.begin_text_editing(&mut scene, 10.0, 10.0);
        ix.edit_text(&mut scene, &config, &ApproxMeasure, "a");
        ix.edit_text(&mut scene, &config, &ApproxMeasure, "Backspace");
        assert!(!ix.end_text_editing(&mut scene));
    }

    #[test]
    fn only_unlocked_text_enters_editing() {
        let (mut scene, _) = scene_with(&[Bounds::new(0.0, 0.0, 100.0, 100.0)]);
        let mut ix = Interaction::new();
        assert!(!ix.begin_text_editing(&mut scene, 50.0, 50.0));

        let mut locked = Element::text(Bounds::new(200.0, 0.0, 100.0, 20.0), "x");
        locked.locked = true;
        scene.add_element(locked);
        assert!(!ix.begin_text_editing(&mut scene, 250.0, 10.0));
        assert!(ix.is_idle());
    }
}
