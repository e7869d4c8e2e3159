//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, CanvasResult};
use crate::history::DEFAULT_MAX_HISTORY;
use crate::spatial::DEFAULT_CELL_SIZE;

/// Configuration for a [`CanvasEditor`](crate::editor::CanvasEditor).
///
/// Missing fields take their defaults when parsed from JSON:
///
/// ```
/// use canvas_engine::EditorConfig;
///
/// let config = EditorConfig::from_json(r#"{"maxHistorySize": 20}"#).unwrap();
/// assert_eq!(config.max_history_size, 20);
/// assert_eq!(config.nudge_step, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum undoable entries kept.
    pub max_history_size: usize,
    /// Initial container width in screen pixels.
    pub container_width: f64,
    /// Initial container height in screen pixels.
    pub container_height: f64,
    /// Screen-space margin left around content by `fit_to_view`.
    pub fit_margin: f64,
    /// Arrow-key nudge distance in document units.
    pub nudge_step: f64,
    /// Shift+arrow nudge distance in document units.
    pub nudge_step_large: f64,
    /// Spatial index cell size in document units.
    pub spatial_cell_size: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history_size: DEFAULT_MAX_HISTORY,
            container_width: 800.0,
            container_height: 600.0,
            fit_margin: 50.0,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            spatial_cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`] if the JSON is malformed.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CanvasError::validation(format!("invalid editor config: {e}")))
    }

    /// Set the history bound.
    #[must_use]
    pub const fn with_max_history_size(mut self, size: usize) -> Self {
        self.max_history_size = size;
        self
    }

    /// Set the initial container size.
    #[must_use]
    pub const fn with_container_size(mut self, width: f64, height: f64) -> Self {
        self.container_width = width;
        self.container_height = height;
        self
    }

    /// Set the fit-to-view margin.
    #[must_use]
    pub const fn with_fit_margin(mut self, margin: f64) -> Self {
        self.fit_margin = margin;
        self
    }

    /// Set the arrow-key nudge distances.
    #[must_use]
    pub const fn with_nudge_steps(mut self, step: f64, large_step: f64) -> Self {
        self.nudge_step = step;
        self.nudge_step_large = large_step;
        self
    }

    /// Set the spatial index cell size.
    #[must_use]
    pub const fn with_spatial_cell_size(mut self, cell_size: f64) -> Self {
        self.spatial_cell_size = cell_size;
        self
    }
}
