//! Refinement suggestions for a single selected element.
//!
//! Each candidate is a partial override of the selected element's box.
//! Candidates are scored by re-running the energy model on a hypothetical
//! layout where only the selected box changed; those that do not lower the
//! energy by more than `min_improvement` are discarded.

use crate::energy::{ElementBox, EnergyWeights, energy_breakdown};
use pc_core::{Element, Viewport};
use serde::Serialize;

/// Tunables for `suggest_refinements`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineConfig {
    /// Candidates must improve energy by strictly more than this. Default: **0.5**.
    pub min_improvement: f32,
    /// Maximum suggestions returned. Default: **6**.
    pub max_suggestions: usize,
    /// Clearance left by de-overlap moves. Default: **10**.
    pub deoverlap_gap: f32,
    pub weights: EnergyWeights,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            min_improvement: 0.5,
            max_suggestions: 6,
            deoverlap_gap: 10.0,
            weights: EnergyWeights::default(),
        }
    }
}

/// The family a candidate move belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
    AlignLeft,
    AlignRight,
    AlignCenterX,
    AlignTop,
    AlignBottom,
    AlignCenterY,
    PlaceRightOf,
    PlaceLeftOf,
    PlaceBelow,
    PlaceAbove,
    CenterCanvas,
    CenterHorizontally,
    CenterVertically,
}

/// Fields a suggestion overrides on the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Preview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
}

impl Preview {
    fn x(x: f32) -> Self {
        Self {
            x: Some(x),
            ..Self::default()
        }
    }

    fn y(y: f32) -> Self {
        Self {
            y: Some(y),
            ..Self::default()
        }
    }

    fn xy(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: None,
        }
    }

    pub fn apply_to_box(&self, b: &ElementBox) -> ElementBox {
        ElementBox {
            x: self.x.unwrap_or(b.x),
            y: self.y.unwrap_or(b.y),
            width: self.width.unwrap_or(b.width),
            ..*b
        }
    }

    pub fn apply(&self, element: &mut Element) {
        if let Some(x) = self.x {
            element.x = x;
        }
        if let Some(y) = self.y {
            element.y = y;
        }
        if let Some(width) = self.width {
            element.width = width;
        }
    }
}

/// A ranked candidate modification of the selected element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub description: String,
    /// Index of the neighbor the move is relative to, if any.
    pub neighbor: Option<usize>,
    pub preview: Preview,
    pub energy_improvement: f32,
}

impl Suggestion {
    /// Apply the override to the real element in place.
    pub fn apply(&self, element: &mut Element) {
        self.preview.apply(element);
    }
}

struct Candidate {
    kind: SuggestionKind,
    description: String,
    neighbor: Option<usize>,
    preview: Preview,
}

/// Rank single-element moves for `boxes[selected]`, best first.
///
/// Returns at most `config.max_suggestions`, every one improving the energy
/// by more than `config.min_improvement`. An empty result means the layout
/// is already locally good.
pub fn suggest_refinements(
    selected: usize,
    boxes: &[ElementBox],
    viewport: Viewport,
    config: &RefineConfig,
) -> Vec<Suggestion> {
    let Some(current) = boxes.get(selected).copied() else {
        return Vec::new();
    };

    let baseline = energy_breakdown(boxes, viewport, &config.weights).total();
    let mut hypothetical = boxes.to_vec();

    let mut candidates = Vec::new();
    for (j, other) in boxes.iter().enumerate() {
        if j == selected {
            continue;
        }
        alignment_candidates(&current, j, other, &mut candidates);
        deoverlap_candidates(&current, j, other, viewport, config.deoverlap_gap, &mut candidates);
    }
    centering_candidates(&current, viewport, &mut candidates);

    let mut suggestions: Vec<Suggestion> = candidates
        .into_iter()
        .filter_map(|c| {
            hypothetical[selected] = c.preview.apply_to_box(&current);
            let score = energy_breakdown(&hypothetical, viewport, &config.weights).total();
            let improvement = baseline - score;
            (improvement > config.min_improvement).then(|| Suggestion {
                kind: c.kind,
                description: c.description,
                neighbor: c.neighbor,
                preview: c.preview,
                energy_improvement: improvement,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| b.energy_improvement.total_cmp(&a.energy_improvement));
    suggestions.truncate(config.max_suggestions);
    log::debug!(
        "{} refinement(s) for element {selected} (baseline {baseline:.2})",
        suggestions.len()
    );
    suggestions
}

fn alignment_candidates(current: &ElementBox, j: usize, other: &ElementBox, out: &mut Vec<Candidate>) {
    let o = other.bounds();
    let c = o.center();
    let name = other.kind.as_str();
    let moves = [
        (SuggestionKind::AlignLeft, Preview::x(o.x), "Align left edge with"),
        (SuggestionKind::AlignRight, Preview::x(o.right() - current.width), "Align right edge with"),
        (SuggestionKind::AlignCenterX, Preview::x(c.x - current.width / 2.0), "Center horizontally on"),
        (SuggestionKind::AlignTop, Preview::y(o.y), "Align top edge with"),
        (SuggestionKind::AlignBottom, Preview::y(o.bottom() - current.height), "Align bottom edge with"),
        (SuggestionKind::AlignCenterY, Preview::y(c.y - current.height / 2.0), "Center vertically on"),
    ];
    out.extend(moves.into_iter().map(|(kind, preview, text)| Candidate {
        kind,
        description: format!("{text} {name} element"),
        neighbor: Some(j),
        preview,
    }));
}

fn deoverlap_candidates(
    current: &ElementBox,
    j: usize,
    other: &ElementBox,
    viewport: Viewport,
    gap: f32,
    out: &mut Vec<Candidate>,
) {
    let o = other.bounds();
    if current.bounds().overlap_area(&o) <= 0.0 {
        return;
    }
    let name = other.kind.as_str();
    let moves = [
        (SuggestionKind::PlaceRightOf, Preview::x(o.right() + gap), "Move right of overlapping"),
        (SuggestionKind::PlaceLeftOf, Preview::x(o.x - current.width - gap), "Move left of overlapping"),
        (SuggestionKind::PlaceBelow, Preview::y(o.bottom() + gap), "Move below overlapping"),
        (SuggestionKind::PlaceAbove, Preview::y(o.y - current.height - gap), "Move above overlapping"),
    ];
    out.extend(
        moves
            .into_iter()
            .filter(|(_, preview, _)| preview.apply_to_box(current).bounds().fits_within(viewport))
            .map(|(kind, preview, text)| Candidate {
                kind,
                description: format!("{text} {name} element"),
                neighbor: Some(j),
                preview,
            }),
    );
}

fn centering_candidates(current: &ElementBox, viewport: Viewport, out: &mut Vec<Candidate>) {
    let cx = (viewport.width - current.width) / 2.0;
    let cy = (viewport.height - current.height) / 2.0;
    let moves = [
        (SuggestionKind::CenterCanvas, Preview::xy(cx, cy), "Center on canvas"),
        (SuggestionKind::CenterHorizontally, Preview::x(cx), "Center horizontally on canvas"),
        (SuggestionKind::CenterVertically, Preview::y(cy), "Center vertically on canvas"),
    ];
    out.extend(moves.into_iter().map(|(kind, preview, text)| Candidate {
        kind,
        description: text.to_string(),
        neighbor: None,
        preview,
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc_core::ElementType;

    const CANVAS: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    fn bx(x: f32, y: f32, width: f32, height: f32, kind: ElementType) -> ElementBox {
        ElementBox {
            x,
            y,
            width,
            height,
            kind,
        }
    }

    #[test]
    fn lone_element_has_nothing_to_gain() {
        // A single element carries its full area on one side of each midline
        // wherever it sits, so centering cannot lower the symmetry penalty.
        for (x, y) in [(10.0, 10.0), (350.0, 250.0), (600.0, 20.0)] {
            let boxes = [bx(x, y, 100.0, 100.0, ElementType::Box)];
            assert!(suggest_refinements(0, &boxes, CANVAS, &RefineConfig::default()).is_empty());
        }
    }

    #[test]
    fn vertical_centering_fixes_top_heavy_layout() {
        let boxes = [
            bx(100.0, 50.0, 100.0, 100.0, ElementType::Box),
            bx(600.0, 50.0, 100.0, 100.0, ElementType::Box),
        ];
        let out = suggest_refinements(0, &boxes, CANVAS, &RefineConfig::default());

        let best = &out[0];
        assert_eq!(best.kind, SuggestionKind::CenterVertically);
        assert_eq!(best.preview.y, Some(250.0));
        assert_eq!(best.neighbor, None);
        assert!((best.energy_improvement - 165.0).abs() < 0.01);
    }

    #[test]
    fn suggestions_are_capped_sorted_and_meaningful() {
        let boxes = [
            bx(37.0, 41.0, 120.0, 60.0, ElementType::Text),
            bx(200.0, 300.0, 150.0, 90.0, ElementType::Image),
            bx(90.0, 80.0, 200.0, 100.0, ElementType::Box),
            bx(500.0, 120.0, 80.0, 80.0, ElementType::Box),
        ];
        let config = RefineConfig::default();
        let out = suggest_refinements(0, &boxes, CANVAS, &config);

        assert!(out.len() <= config.max_suggestions);
        assert!(out.iter().all(|s| s.energy_improvement > 0.5));
        assert!(
            out.windows(2)
                .all(|w| w[0].energy_improvement >= w[1].energy_improvement)
        );
    }

    #[test]
    fn overlapping_neighbor_produces_in_canvas_deoverlap_moves() {
        // Selected box sits in the top-left corner, overlapping a neighbor:
        // left-of and above would leave the canvas and must not be offered.
        let boxes = [
            bx(0.0, 0.0, 200.0, 200.0, ElementType::Box),
            bx(100.0, 100.0, 200.0, 200.0, ElementType::Image),
        ];
        let config = RefineConfig {
            max_suggestions: usize::MAX,
            ..RefineConfig::default()
        };
        let out = suggest_refinements(0, &boxes, CANVAS, &config);

        assert!(out.iter().any(|s| s.kind == SuggestionKind::PlaceRightOf));
        assert!(out.iter().any(|s| s.kind == SuggestionKind::PlaceBelow));
        assert!(!out.iter().any(|s| s.kind == SuggestionKind::PlaceLeftOf));
        assert!(!out.iter().any(|s| s.kind == SuggestionKind::PlaceAbove));

        let right = out
            .iter()
            .find(|s| s.kind == SuggestionKind::PlaceRightOf)
            .unwrap();
        assert_eq!(right.preview.x, Some(310.0));
        assert_eq!(right.description, "Move right of overlapping image element");
    }

    #[test]
    fn apply_mutates_the_element() {
        let mut el = Element::text(pc_core::Bounds::new(10.0, 10.0, 100.0, 20.0), "hi");
        let s = Suggestion {
            kind: SuggestionKind::AlignLeft,
            description: String::new(),
            neighbor: Some(1),
            preview: Preview::x(42.0),
            energy_improvement: 10.0,
        };
        s.apply(&mut el);
        assert_eq!((el.x, el.y), (42.0, 10.0));
    }

    #[test]
    fn out_of_range_selection_is_empty() {
        let boxes = [bx(0.0, 0.0, 10.0, 10.0, ElementType::Box)];
        assert!(suggest_refinements(3, &boxes, CANVAS, &RefineConfig::default()).is_empty());
    }
}
