//! Integration tests: undo/redo history (pc-editor).
//!
//! Drives the `Editor` through real commands and checks that history
//! restores the scene exactly, across crate boundaries.

use pc_core::{Bounds, Color, Element, ElementId, Scene, SceneSnapshot, Validation};
use pc_editor::{Editor, History, Modifiers};
use pretty_assertions::assert_eq;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn template_editor() -> Editor {
    let mut editor = Editor::default();
    editor
        .import_layout(include_str!("fixtures/landing_page.json"), Validation::Strict)
        .unwrap();
    editor
}

fn snapshot_of(n: usize) -> SceneSnapshot {
    let mut scene = Scene::new();
    for i in 0..n {
        scene.add_element(Element::rect(Bounds::new(i as f32, 0.0, 10.0, 10.0), Color::BLACK));
    }
    scene.snapshot()
}

// ─── History engine ─────────────────────────────────────────────────────

#[test]
fn n_saves_then_undo_redo_round_trip() {
    let mut history = History::default();
    let states: Vec<SceneSnapshot> = (0..8).map(snapshot_of).collect();
    for s in &states {
        history.save_state(s.clone());
    }

    let mut last = None;
    for _ in 0..states.len() - 1 {
        last = history.undo();
    }
    assert_eq!(last.as_ref(), Some(&states[0]));

    for _ in 0..states.len() - 1 {
        last = history.redo();
    }
    assert_eq!(last.as_ref(), states.last());
}

#[test]
fn history_never_exceeds_its_bound() {
    let mut history = History::default();
    for n in 0..75 {
        history.save_state(snapshot_of(n % 3));
        assert!(history.len() <= 50);
    }
    assert_eq!(history.len(), 50);

    let mut steps = 0;
    while history.undo().is_some() {
        steps += 1;
    }
    assert_eq!(steps, 49);
    assert!(!history.can_undo());
}

#[test]
fn undo_on_fresh_history_returns_none() {
    let mut history = History::new(10);
    assert_eq!(history.undo(), None);
    assert!(history.is_empty());
}

// ─── Through the editor ─────────────────────────────────────────────────

#[test]
fn undo_restores_template_after_delete() {
    init_logs();
    let mut editor = template_editor();
    let original = editor.scene().export_layout();

    editor.scene_mut().select_all();
    assert_eq!(editor.delete_selected(), 4);
    assert!(editor.scene().is_empty());

    assert!(editor.undo());
    assert_eq!(editor.scene().export_layout(), original);
    assert!(editor.scene().selected().is_empty());
}

#[test]
fn undo_walks_back_through_import() {
    init_logs();
    let mut editor = template_editor();
    assert!(editor.undo());
    assert!(editor.scene().is_empty());
    assert!(!editor.can_undo());
    assert!(editor.can_redo());
    assert!(editor.redo());
    assert_eq!(editor.scene().len(), 4);
}

#[test]
fn new_action_after_undo_discards_redo() {
    init_logs();
    let mut editor = template_editor();
    let headline = ElementId::intern("headline");

    editor.scene_mut().select_element(headline);
    editor.bring_to_front();
    editor.undo();
    assert!(editor.can_redo());

    // Undo also restored the empty selection of the imported state.
    editor.scene_mut().select_element(headline);
    editor.duplicate_selected();
    assert!(!editor.can_redo());
}

#[test]
fn restored_selection_matches_flags() {
    init_logs();
    let mut editor = template_editor();
    let tagline = ElementId::intern("tagline");

    editor.scene_mut().select_element(tagline);
    let copies = editor.duplicate_selected();
    assert_eq!(copies.len(), 1);

    // Selection at the time of the snapshot is restored along with it.
    editor.key_down("Delete", Modifiers::NONE);
    assert!(editor.scene().selected().is_empty());
    editor.undo();
    assert_eq!(editor.scene().selected(), copies.as_slice());
    for el in editor.scene().elements() {
        assert_eq!(el.is_selected, copies.contains(&el.id));
    }
}

#[test]
fn mutating_after_undo_leaves_history_intact() {
    init_logs();
    let mut editor = template_editor();
    let headline = ElementId::intern("headline");
    editor.scene_mut().select_element(headline);
    editor.bring_to_front();
    editor.undo();

    if let Some(el) = editor.scene_mut().get_mut(headline) {
        el.x = 999.0;
    }
    editor.redo();
    assert_eq!(editor.scene().get(headline).map(|el| el.x), Some(60.0));
}
