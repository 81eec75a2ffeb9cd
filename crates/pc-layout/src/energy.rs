//! Layout energy: a scalar score over element boxes, lower is better.
//!
//! Three independent terms are summed:
//!
//! | Term | Sign | Per pair / global |
//! |------|------|-------------------|
//! | Alignment | reward (≤ 0) | edge and center coincidences within a threshold |
//! | Overlap | penalty (≥ 0) | intersection area × weight |
//! | Symmetry | penalty (≥ 0) | area imbalance across the canvas midlines |
//!
//! The function is pure arithmetic: identical inputs give bit-identical
//! results.

use pc_core::{Bounds, Element, ElementType, Viewport};
use serde::Serialize;

/// The geometry the scorer needs; `kind` only feeds suggestion text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElementBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ElementType,
}

impl ElementBox {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}

impl From<&Element> for ElementBox {
    fn from(el: &Element) -> Self {
        Self {
            x: el.x,
            y: el.y,
            width: el.width,
            height: el.height,
            kind: el.element_type(),
        }
    }
}

/// Project a slice of elements onto scorer boxes.
pub fn boxes_of(elements: &[Element]) -> Vec<ElementBox> {
    elements.iter().map(ElementBox::from).collect()
}

/// Tunable constants of the energy function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyWeights {
    /// Max distance for two edges/centers to count as aligned. Default: **5**.
    pub align_threshold: f32,
    /// Reward per aligned edge pair. Default: **10**.
    pub edge_reward: f32,
    /// Reward per aligned center pair. Default: **15**.
    pub center_reward: f32,
    /// Penalty per unit of overlapping area. Default: **0.1**.
    pub overlap_weight: f32,
    /// Penalty per unit of mass imbalance. Default: **0.01**.
    pub symmetry_weight: f32,
}

impl Default for EnergyWeights {
    fn default() -> Self {
        Self {
            align_threshold: 5.0,
            edge_reward: 10.0,
            center_reward: 15.0,
            overlap_weight: 0.1,
            symmetry_weight: 0.01,
        }
    }
}

/// Per-term contributions; `total()` is the energy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EnergyBreakdown {
    pub alignment: f32,
    pub overlap: f32,
    pub symmetry: f32,
}

impl EnergyBreakdown {
    pub fn total(&self) -> f32 {
        self.alignment + self.overlap + self.symmetry
    }
}

/// Energy with default weights.
pub fn energy(boxes: &[ElementBox], canvas_width: f32, canvas_height: f32) -> f32 {
    let viewport = Viewport {
        width: canvas_width,
        height: canvas_height,
    };
    energy_breakdown(boxes, viewport, &EnergyWeights::default()).total()
}

pub fn energy_breakdown(
    boxes: &[ElementBox],
    viewport: Viewport,
    weights: &EnergyWeights,
) -> EnergyBreakdown {
    let mut alignment = 0.0;
    let mut overlap = 0.0;

    for (i, a) in boxes.iter().enumerate() {
        for b in &boxes[i + 1..] {
            alignment += alignment_term(a, b, weights);
            overlap += a.bounds().overlap_area(&b.bounds()) * weights.overlap_weight;
        }
    }

    EnergyBreakdown {
        alignment,
        overlap,
        symmetry: symmetry_term(boxes, viewport, weights),
    }
}

fn alignment_term(a: &ElementBox, b: &ElementBox, weights: &EnergyWeights) -> f32 {
    let (ab, bb) = (a.bounds(), b.bounds());
    let (ac, bc) = (ab.center(), bb.center());
    let aligned = |d: f32| d.abs() < weights.align_threshold;

    let edges = [
        ab.x - bb.x,
        ab.right() - bb.right(),
        ab.y - bb.y,
        ab.bottom() - bb.bottom(),
    ];
    let centers = [ac.x - bc.x, ac.y - bc.y];

    let edge_hits = edges.into_iter().filter(|d| aligned(*d)).count() as f32;
    let center_hits = centers.into_iter().filter(|d| aligned(*d)).count() as f32;
    -(edge_hits * weights.edge_reward + center_hits * weights.center_reward)
}

/// Area-weighted imbalance across the vertical and horizontal midlines.
/// A center lying exactly on a midline counts toward right/bottom.
fn symmetry_term(boxes: &[ElementBox], viewport: Viewport, weights: &EnergyWeights) -> f32 {
    let mid = viewport.center();
    let (mut left, mut right, mut top, mut bottom) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);

    for b in boxes {
        let bounds = b.bounds();
        let c = bounds.center();
        let mass = bounds.area();
        if c.x < mid.x {
            left += mass;
        } else {
            right += mass;
        }
        if c.y < mid.y {
            top += mass;
        } else {
            bottom += mass;
        }
    }

    ((left - right).abs() + (top - bottom).abs()) * weights.symmetry_weight
}
