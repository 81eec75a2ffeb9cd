//! Editor tuning knobs.

use serde::{Deserialize, Serialize};

/// Configuration shared by the scene, history, and interaction layers.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Grid pitch a new scene starts with. Default: **10**.
    pub grid_size: f32,
    /// Snap drag/resize pointer positions to the grid. Default: **true**.
    pub snap_to_grid: bool,
    /// Smallest width/height a resize may produce. Default: **20**.
    pub min_element_size: f32,
    /// Maximum number of undo snapshots kept. Default: **50**.
    pub history_limit: usize,
    /// Offset applied on both axes to duplicated elements. Default: **20**.
    pub duplicate_offset: f32,
    /// Side of the square drawn for each resize handle. Default: **8**.
    pub handle_size: f32,
    /// Extra grab tolerance around each handle. Default: **8**.
    pub handle_margin: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: 10.0,
            snap_to_grid: true,
            min_element_size: 20.0,
            history_limit: 50,
            duplicate_offset: 20.0,
            handle_size: 8.0,
            handle_margin: 8.0,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Round `value` to the nearest grid line when snapping is on.
    pub fn snap(&self, value: f32) -> f32 {
        self.snap_to(value, self.grid_size)
    }

    /// Like `snap`, against a grid pitch other than the configured one.
    pub fn snap_to(&self, value: f32, grid_size: f32) -> f32 {
        if self.snap_to_grid && grid_size > 0.0 {
            (value / grid_size).round() * grid_size
        } else {
            value
        }
    }
}
