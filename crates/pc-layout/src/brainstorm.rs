//! Whole-layout alternatives ("brainstorming").
//!
//! Each strategy maps the full element list to a rearranged copy. Inputs are
//! never mutated and ids are preserved, so a proposal can be previewed,
//! discarded, or committed over the live scene.

use crate::energy::{EnergyWeights, boxes_of, energy_breakdown};
use pc_core::text::text_height;
use pc_core::{Bounds, Element, TextMeasure, Viewport};
use serde::Serialize;
use std::f32::consts::TAU;

const GRID_PAD: f32 = 40.0;
const GRID_GAP: f32 = 20.0;
const GRID_FILL: f32 = 0.9;

const FOCUS_SCALE: f32 = 1.5;
const FOCUS_MAX_FRACTION: f32 = 0.6;
const ORBIT_FRACTION: f32 = 0.2;

const COLUMN_PAD: f32 = 50.0;
const COLUMN_GAP: f32 = 20.0;
const COLUMN_MIN_HEIGHT: f32 = 20.0;

/// A whole-layout rearrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    Grid,
    CenterFocus,
    SingleColumn,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Grid, Strategy::CenterFocus, Strategy::SingleColumn];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Grid => "Grid",
            Strategy::CenterFocus => "Center focus",
            Strategy::SingleColumn => "Single column",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Strategy::Grid => "Arrange every element in an evenly spaced grid",
            Strategy::CenterFocus => "Enlarge the first element and orbit the rest around it",
            Strategy::SingleColumn => "Stack text first, then media, in one full-width column",
        }
    }

    pub fn apply(
        self,
        elements: &[Element],
        viewport: Viewport,
        measure: &dyn TextMeasure,
    ) -> Vec<Element> {
        match self {
            Strategy::Grid => grid(elements, viewport, measure),
            Strategy::CenterFocus => center_focus(elements, viewport, measure),
            Strategy::SingleColumn => single_column(elements, viewport, measure),
        }
    }
}

/// A named, non-destructive layout preview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutProposal {
    pub strategy: Strategy,
    pub name: &'static str,
    pub description: &'static str,
    pub elements: Vec<Element>,
    pub energy: f32,
}

/// Run every strategy over the current layout.
pub fn brainstorm(
    elements: &[Element],
    viewport: Viewport,
    measure: &dyn TextMeasure,
) -> Vec<LayoutProposal> {
    if elements.is_empty() {
        return Vec::new();
    }
    Strategy::ALL
        .into_iter()
        .map(|strategy| {
            let arranged = strategy.apply(elements, viewport, measure);
            let energy =
                energy_breakdown(&boxes_of(&arranged), viewport, &EnergyWeights::default()).total();
            log::debug!("brainstorm {}: energy {energy:.2}", strategy.name());
            LayoutProposal {
                strategy,
                name: strategy.name(),
                description: strategy.description(),
                elements: arranged,
                energy,
            }
        })
        .collect()
}

/// Height a text element needs at `width`, or `None` for other kinds.
fn reflowed_height(el: &Element, width: f32, measure: &dyn TextMeasure) -> Option<f32> {
    el.text_attrs().map(|attrs| text_height(attrs, width, measure))
}

// ─── Grid ────────────────────────────────────────────────────────────────

pub fn grid(elements: &[Element], viewport: Viewport, measure: &dyn TextMeasure) -> Vec<Element> {
    let n = elements.len();
    if n == 0 {
        return Vec::new();
    }
    let cols = (n as f32).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);

    let cell_w = (viewport.width - 2.0 * GRID_PAD - (cols - 1) as f32 * GRID_GAP) / cols as f32;
    let cell_h = (viewport.height - 2.0 * GRID_PAD - (rows - 1) as f32 * GRID_GAP) / rows as f32;
    let (max_w, max_h) = (cell_w * GRID_FILL, cell_h * GRID_FILL);

    elements
        .iter()
        .enumerate()
        .map(|(i, el)| {
            let (col, row) = (i % cols, i / cols);
            let cell_x = GRID_PAD + col as f32 * (cell_w + GRID_GAP);
            let cell_y = GRID_PAD + row as f32 * (cell_h + GRID_GAP);

            let (w, h) = match reflowed_height(el, el.width.min(max_w), measure) {
                Some(text_h) => (el.width.min(max_w), text_h.min(max_h)),
                None => {
                    let scale = (max_w / el.width).min(max_h / el.height).min(1.0);
                    (el.width * scale, el.height * scale)
                }
            };

            let mut out = el.clone();
            out.set_bounds(Bounds::new(
                cell_x + (cell_w - w) / 2.0,
                cell_y + (cell_h - h) / 2.0,
                w,
                h,
            ));
            out
        })
        .collect()
}

// ─── Center focus ────────────────────────────────────────────────────────

pub fn center_focus(
    elements: &[Element],
    viewport: Viewport,
    measure: &dyn TextMeasure,
) -> Vec<Element> {
    let Some((focal, rest)) = elements.split_first() else {
        return Vec::new();
    };
    let center = viewport.center();

    let w = (focal.width * FOCUS_SCALE).min(viewport.width * FOCUS_MAX_FRACTION);
    let h = reflowed_height(focal, w, measure)
        .unwrap_or(focal.height * FOCUS_SCALE)
        .min(viewport.height * FOCUS_MAX_FRACTION);
    let mut hero = focal.clone();
    hero.set_bounds(Bounds::new(center.x - w / 2.0, center.y - h / 2.0, w, h));

    let radius = viewport.width.min(viewport.height) * ORBIT_FRACTION;
    let step = TAU / rest.len().max(1) as f32;

    let mut out = Vec::with_capacity(elements.len());
    out.push(hero);
    out.extend(rest.iter().enumerate().map(|(i, el)| {
        let angle = step * i as f32;
        let cx = center.x + radius * angle.cos();
        let cy = center.y + radius * angle.sin();
        let mut moved = el.clone();
        moved.x = clamp_start(cx - el.width / 2.0, el.width, viewport.width);
        moved.y = clamp_start(cy - el.height / 2.0, el.height, viewport.height);
        moved
    }));
    out
}

/// Clamp a start coordinate so `[start, start + size]` stays in `[0, limit]`,
/// pinning to 0 when the element is larger than the canvas.
fn clamp_start(start: f32, size: f32, limit: f32) -> f32 {
    start.min(limit - size).max(0.0)
}

// ─── Single column ───────────────────────────────────────────────────────

pub fn single_column(
    elements: &[Element],
    viewport: Viewport,
    measure: &dyn TextMeasure,
) -> Vec<Element> {
    let mut ordered: Vec<&Element> = elements.iter().collect();
    // Stable: equal keys keep their original order.
    ordered.sort_by(|a, b| {
        (!a.is_text())
            .cmp(&!b.is_text())
            .then(a.y.total_cmp(&b.y))
    });

    let width = viewport.width - 2.0 * COLUMN_PAD;
    let bottom = viewport.height - COLUMN_PAD;
    let max_media_h = viewport.height / 3.0;
    let mut y = COLUMN_PAD;
    let mut out = Vec::with_capacity(ordered.len());

    for el in ordered {
        let remaining = bottom - y;
        if remaining < COLUMN_MIN_HEIGHT {
            break;
        }
        let natural = reflowed_height(el, width, measure)
            .unwrap_or_else(|| (el.height * width / el.width).min(max_media_h));
        let h = natural.min(remaining);

        let mut placed = el.clone();
        placed.set_bounds(Bounds::new(COLUMN_PAD, y, width, h));
        out.push(placed);
        y += h + COLUMN_GAP;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc_core::element::DEFAULT_FILL;
    use pc_core::{ApproxMeasure, ElementId};
    use pretty_assertions::assert_eq;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Element {
        Element::rect(Bounds::new(x, y, w, h), DEFAULT_FILL)
    }

    fn ids(els: &[Element]) -> Vec<ElementId> {
        els.iter().map(|el| el.id).collect()
    }

    #[test]
    fn grid_places_each_element_inside_its_cell() {
        let els: Vec<Element> = (0..5).map(|i| rect(i as f32 * 10.0, 0.0, 500.0, 400.0)).collect();
        let vp = Viewport { width: 800.0, height: 600.0 };
        let out = grid(&els, vp, &ApproxMeasure);

        assert_eq!(ids(&out), ids(&els));
        // 5 elements → 3 columns × 2 rows
        let cell_w = (800.0 - 80.0 - 40.0) / 3.0;
        let cell_h = (600.0 - 80.0 - 20.0) / 2.0;
        for (i, el) in out.iter().enumerate() {
            assert!(el.width <= cell_w * 0.9 + 0.01);
            assert!(el.height <= cell_h * 0.9 + 0.01);
            let cell_x = 40.0 + (i % 3) as f32 * (cell_w + 20.0);
            let cell_y = 40.0 + (i / 3) as f32 * (cell_h + 20.0);
            assert!((el.bounds().center().x - (cell_x + cell_w / 2.0)).abs() < 0.01);
            assert!((el.bounds().center().y - (cell_y + cell_h / 2.0)).abs() < 0.01);
        }
        // inputs untouched
        assert_eq!(els[0].width, 500.0);
    }

    #[test]
    fn grid_keeps_small_elements_at_natural_size() {
        let els = vec![rect(0.0, 0.0, 50.0, 30.0)];
        let out = grid(&els, Viewport::default(), &ApproxMeasure);
        assert_eq!((out[0].width, out[0].height), (50.0, 30.0));
    }

    #[test]
    fn center_focus_enlarges_first_and_orbits_rest() {
        let els = vec![
            rect(0.0, 0.0, 200.0, 100.0),
            rect(0.0, 0.0, 40.0, 40.0),
            rect(0.0, 0.0, 40.0, 40.0),
        ];
        let vp = Viewport { width: 800.0, height: 600.0 };
        let out = center_focus(&els, vp, &ApproxMeasure);

        assert_eq!((out[0].width, out[0].height), (300.0, 150.0));
        assert_eq!(out[0].bounds().center(), vp.center());

        // radius = 600 * 0.2 = 120; first satellite at angle 0
        let c1 = out[1].bounds().center();
        assert!((c1.x - 520.0).abs() < 0.01 && (c1.y - 300.0).abs() < 0.01);
        let c2 = out[2].bounds().center();
        assert!((c2.x - 280.0).abs() < 0.01 && (c2.y - 300.0).abs() < 0.01);
    }

    #[test]
    fn center_focus_caps_focal_size_and_clamps_satellites() {
        let els = vec![rect(0.0, 0.0, 700.0, 500.0), rect(0.0, 0.0, 300.0, 300.0)];
        let vp = Viewport { width: 400.0, height: 300.0 };
        let out = center_focus(&els, vp, &ApproxMeasure);

        // 60% of the canvas on each axis
        assert!((out[0].width - 240.0).abs() < 0.01);
        assert!((out[0].height - 180.0).abs() < 0.01);
        // a satellite as tall as the canvas is pinned to the top edge
        assert!(out[1].x >= 0.0 && out[1].x + out[1].width <= 400.0);
        assert_eq!(out[1].y, 0.0);
    }

    #[test]
    fn single_column_puts_text_first_and_drops_overflow() {
        // Font size chosen so one line is 40 units tall.
        let text = |y: f32, s: &str| {
            let mut el = Element::text(Bounds::new(0.0, y, 100.0, 40.0), s);
            if let Some(attrs) = el.text_attrs_mut() {
                attrs.font_size = 40.0 / 1.2;
            }
            el
        };
        let els = vec![
            rect(0.0, 0.0, 100.0, 100.0),
            text(90.0, "second"),
            text(10.0, "first"),
            text(200.0, "third"),
        ];
        let vp = Viewport { width: 600.0, height: 200.0 };
        let out = single_column(&els, vp, &ApproxMeasure);

        // 50..90, 110..150, then the third would start at 170, past 150.
        let contents: Vec<&str> = out
            .iter()
            .filter_map(|el| el.text_attrs().map(|a| a.content.as_str()))
            .collect();
        assert_eq!(contents, ["first", "second"]);
        assert_eq!(out[0].y, 50.0);
        assert!((out[0].height - 40.0).abs() < 0.01);
        assert!((out[1].y - 110.0).abs() < 0.01);
        assert!(out.iter().all(|el| el.x == 50.0 && el.width == 500.0));
        assert!(out.iter().all(|el| el.y + el.height <= 150.0 + 0.01));
    }

    #[test]
    fn single_column_trims_or_drops_at_the_bottom() {
        // Three 40-high media boxes in a 200-high canvas with 50 padding:
        // 50..90, 110..150, and the third starts at 170 > 150 → dropped.
        let els: Vec<Element> = (0..3).map(|i| rect(0.0, i as f32 * 50.0, 100.0, 40.0)).collect();
        let vp = Viewport { width: 200.0, height: 200.0 };
        let out = single_column(&els, vp, &ApproxMeasure);

        assert_eq!(out.len(), 2);
        assert_eq!((out[0].y, out[0].height), (50.0, 40.0));
        assert_eq!((out[1].y, out[1].height), (110.0, 40.0));
    }

    #[test]
    fn single_column_cuts_last_element_to_fit() {
        let els = vec![rect(0.0, 0.0, 100.0, 150.0), rect(0.0, 10.0, 100.0, 150.0)];

        // Media height caps at 200 / 3. The second element would start at
        // 136.67 with 13.33 left before the bottom padding, so it is dropped.
        let out = single_column(&els, Viewport { width: 200.0, height: 200.0 }, &ApproxMeasure);
        assert_eq!(out.len(), 1);
        assert!((out[0].height - 200.0 / 3.0).abs() < 0.01);

        // Cap 76.67: 50..126.67, then 146.67..180 leaves 33.33, so it is cut.
        let out = single_column(&els, Viewport { width: 200.0, height: 230.0 }, &ApproxMeasure);
        assert_eq!(out.len(), 2);
        assert!((out[1].y - (50.0 + 230.0 / 3.0 + 20.0)).abs() < 0.01);
        assert!((out[1].y + out[1].height - 180.0).abs() < 0.01);
    }

    #[test]
    fn brainstorm_offers_every_strategy_without_mutating_input() {
        let els = vec![rect(10.0, 10.0, 100.0, 100.0), rect(400.0, 300.0, 100.0, 50.0)];
        let before = els.clone();
        let out = brainstorm(&els, Viewport::default(), &ApproxMeasure);

        let strategies: Vec<Strategy> = out.iter().map(|p| p.strategy).collect();
        assert_eq!(strategies, Strategy::ALL.to_vec());
        assert_eq!(els, before);
    }
}
