//! Layout scoring and assistance for PageCraft.
//!
//! Everything here is a pure function of element geometry and canvas size:
//! the energy model scores a layout, the refiner proposes single-element
//! moves that lower it, and brainstorming remaps the whole page at once.

pub mod brainstorm;
pub mod energy;
pub mod refine;

pub use brainstorm::{LayoutProposal, Strategy, brainstorm};
pub use energy::{ElementBox, EnergyBreakdown, EnergyWeights, boxes_of, energy, energy_breakdown};
pub use refine::{Preview, RefineConfig, Suggestion, SuggestionKind, suggest_refinements};
