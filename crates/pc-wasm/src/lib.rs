//! WASM bridge for PageCraft: exposes the editor core to the browser host.
//!
//! Compiled via `wasm-pack build --target web`. The host owns the DOM and
//! painting; it forwards pointer/keyboard events here and reads the scene
//! back as JSON.

mod measure;

use measure::CanvasMeasure;
use pc_core::{
    EditorConfig, Element, ElementKind, ImageCache, ImageStatus, MemoryImageCache, SceneEvent,
    Validation, Viewport,
};
use pc_editor::{Editor, Modifiers};
use pc_layout::{EnergyWeights, boxes_of, energy_breakdown};
use serde_json::{Value, json};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The main WASM-facing canvas controller.
///
/// Holds the editor (scene, history, gesture state) and the decoded images
/// the host has handed back. All interaction from the page goes through
/// this struct.
#[wasm_bindgen]
pub struct PageCanvas {
    editor: Editor,
    images: MemoryImageCache<JsValue>,
}

#[wasm_bindgen]
impl PageCanvas {
    /// Create a controller for a canvas of the given size. `config_json` is
    /// an optional partial `EditorConfig`; unknown or invalid input falls
    /// back to defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, config_json: Option<String>) -> Self {
        console_error_panic_hook_setup();

        let config = match config_json.as_deref().map(EditorConfig::from_json) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                log::warn!("ignoring invalid editor config: {e}");
                EditorConfig::default()
            }
            None => EditorConfig::default(),
        };
        Self {
            editor: Editor::new(config, Viewport { width, height }),
            images: MemoryImageCache::new(),
        }
    }

    /// Measure text with the page's canvas instead of the approximation.
    pub fn set_measure_context(&mut self, ctx: CanvasRenderingContext2d) {
        self.editor.set_measure(Box::new(CanvasMeasure::new(ctx)));
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.editor.set_viewport(Viewport { width, height });
    }

    /// Register a callback receiving each change notification as a JSON
    /// string, e.g. `{"type":"historyChanged","canUndo":true,"canRedo":false}`.
    pub fn on_change(&mut self, callback: js_sys::Function) {
        self.editor.subscribe(move |event| {
            let payload = event_json(event).to_string();
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&payload)) {
                log::warn!("change listener threw: {e:?}");
            }
        });
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Returns true if the canvas needs repainting.
    pub fn handle_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        self.editor.pointer_down(x, y, modifiers);
        true
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.editor.pointer_move(x, y)
    }

    pub fn handle_pointer_up(&mut self, x: f32, y: f32) -> bool {
        self.editor.pointer_up(x, y);
        true
    }

    pub fn handle_double_click(&mut self, x: f32, y: f32) -> bool {
        self.editor.double_click(x, y)
    }

    /// Handle a keyboard event. Returns true if it was consumed; the host
    /// should then call `preventDefault`.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        self.editor.key_down(key, modifiers)
    }

    /// Call on the caret blink timer while a text element is being edited.
    pub fn blink_cursor(&mut self) -> bool {
        self.editor.blink_cursor()
    }

    // ─── Commands ────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    pub fn delete_selected(&mut self) -> u32 {
        self.editor.delete_selected() as u32
    }

    pub fn duplicate_selected(&mut self) -> bool {
        !self.editor.duplicate_selected().is_empty()
    }

    pub fn select_all(&mut self) {
        self.editor.scene_mut().select_all();
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.editor.toggle_grid()
    }

    /// Add an element from a JSON record; returns its id, or an empty
    /// string when the record does not parse.
    pub fn add_element(&mut self, record_json: &str) -> String {
        match serde_json::from_str::<Element>(record_json) {
            Ok(element) => self.editor.add_element(element).to_string(),
            Err(e) => {
                log::warn!("rejected element record: {e}");
                String::new()
            }
        }
    }

    // ─── State for rendering ─────────────────────────────────────────────

    /// Elements in paint order, with their interaction flags.
    pub fn get_elements_json(&self) -> String {
        let elements: Vec<Value> = self
            .editor
            .scene()
            .elements()
            .iter()
            .map(|el| element_view(el, &self.images))
            .collect();
        Value::Array(elements).to_string()
    }

    pub fn get_selected_ids(&self) -> String {
        let ids: Vec<&str> = self.editor.scene().selected().iter().map(|id| id.as_str()).collect();
        json!(ids).to_string()
    }

    /// Live marquee rectangle as `{x,y,width,height}`, or `null`.
    pub fn get_marquee_json(&self) -> String {
        match self.editor.interaction().marquee_rect() {
            Some(b) => json!(b).to_string(),
            None => "null".to_string(),
        }
    }

    pub fn get_view_json(&self) -> String {
        let scene = self.editor.scene();
        json!({
            "zoom": scene.zoom,
            "gridSize": scene.grid_size,
            "showGrid": scene.show_grid,
        })
        .to_string()
    }

    // ─── Images ──────────────────────────────────────────────────────────

    /// Image URLs the host has not been asked to load yet. Each is marked
    /// pending, so it is reported once.
    pub fn take_image_requests(&mut self) -> String {
        let mut urls: Vec<String> = Vec::new();
        for el in self.editor.scene().elements() {
            if let ElementKind::Image { content } = &el.kind {
                if self.images.status(content).is_none() && !urls.contains(content) {
                    urls.push(content.clone());
                }
            }
        }
        for url in &urls {
            self.images.mark(url, ImageStatus::Pending);
        }
        json!(urls).to_string()
    }

    /// Hand over a decoded image (e.g. an `HTMLImageElement`) for `url`.
    pub fn set_image(&mut self, url: &str, image: JsValue) {
        self.images.set(url, image);
    }

    pub fn set_image_failed(&mut self, url: &str) {
        log::warn!("image failed to load: {url}");
        self.images.mark(url, ImageStatus::Failed);
    }

    /// The decoded image for `url`, or `undefined` while it is not ready.
    pub fn get_image(&self, url: &str) -> JsValue {
        self.images.get(url).cloned().unwrap_or(JsValue::UNDEFINED)
    }

    // ─── Layout assistance ───────────────────────────────────────────────

    /// Ranked refinements for the selected element.
    pub fn get_suggestions_json(&self) -> String {
        json!(self.editor.suggestions()).to_string()
    }

    /// Apply the suggestion at `index` of `get_suggestions_json`.
    pub fn apply_suggestion(&mut self, index: usize) -> bool {
        match self.editor.suggestions().get(index) {
            Some(suggestion) => self.editor.apply_suggestion(suggestion),
            None => false,
        }
    }

    /// Whole-layout previews; nothing changes until `apply_layout`.
    pub fn brainstorm_json(&self) -> String {
        json!(self.editor.brainstorm()).to_string()
    }

    pub fn apply_layout(&mut self, index: usize) -> bool {
        match self.editor.brainstorm().get(index) {
            Some(proposal) => {
                self.editor.apply_layout(proposal);
                true
            }
            None => false,
        }
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn export_layout(&self) -> String {
        self.editor.scene().export_json().unwrap_or_else(|e| {
            log::warn!("layout export failed: {e}");
            "[]".to_string()
        })
    }

    /// Replace the document. Returns `{"ok":true,"count":n}` or
    /// `{"ok":false,"error":"..."}`; on error the document is unchanged.
    pub fn import_layout(&mut self, json: &str, lenient: bool) -> String {
        let mode = if lenient {
            Validation::Lenient
        } else {
            Validation::Strict
        };
        match self.editor.import_layout(json, mode) {
            Ok(count) => json!({ "ok": true, "count": count }).to_string(),
            Err(e) => json!({ "ok": false, "error": e.to_string() }).to_string(),
        }
    }
}

fn element_view(el: &Element, images: &MemoryImageCache<JsValue>) -> Value {
    let mut value = serde_json::to_value(el).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.insert("isSelected".into(), el.is_selected.into());
        map.insert("isEditing".into(), el.is_editing.into());
        map.insert("cursorVisible".into(), el.cursor_visible.into());
        if let ElementKind::Image { content } = &el.kind {
            map.insert("imageStatus".into(), json!(images.status(content)));
        }
    }
    value
}

fn event_json(event: &SceneEvent) -> Value {
    match event {
        SceneEvent::ElementsChanged => json!({ "type": "elementsChanged" }),
        SceneEvent::SelectionChanged => json!({ "type": "selectionChanged" }),
        SceneEvent::HistoryChanged { can_undo, can_redo } => json!({
            "type": "historyChanged",
            "canUndo": can_undo,
            "canRedo": can_redo,
        }),
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("PageCraft WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Check a layout without loading it. Returns
/// `{"ok":bool,"errors":[{"index":n,"error":"..."}]}`, or
/// `{"ok":false,"error":"..."}` when the JSON itself is malformed.
#[wasm_bindgen]
pub fn validate_layout(json: &str) -> String {
    match serde_json::from_str::<Vec<Element>>(json) {
        Ok(records) => {
            let errors: Vec<Value> = records
                .iter()
                .enumerate()
                .filter_map(|(index, el)| {
                    el.validation_error()
                        .map(|e| json!({ "index": index, "error": e.to_string() }))
                })
                .collect();
            json!({ "ok": errors.is_empty(), "errors": errors }).to_string()
        }
        Err(e) => json!({ "ok": false, "error": e.to_string() }).to_string(),
    }
}

/// Score a layout. Returns the per-term breakdown and the total.
#[wasm_bindgen]
pub fn energy_json(json: &str, width: f32, height: f32) -> String {
    match serde_json::from_str::<Vec<Element>>(json) {
        Ok(records) => {
            let e = energy_breakdown(
                &boxes_of(&records),
                Viewport { width, height },
                &EnergyWeights::default(),
            );
            json!({
                "ok": true,
                "alignment": e.alignment,
                "overlap": e.overlap,
                "symmetry": e.symmetry,
                "total": e.total(),
            })
            .to_string()
        }
        Err(e) => json!({ "ok": false, "error": e.to_string() }).to_string(),
    }
}
