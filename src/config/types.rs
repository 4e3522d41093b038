//! Configuration type definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Gesture classification thresholds.
///
/// Controls how raw pointer downs and ups are turned into clicks, double
/// clicks and drags.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InputConfig {
    /// Maximum delay between two clicks that still counts as a double click,
    /// in milliseconds (valid range: 50 - 2000)
    #[serde(default = "default_click_duration_ms")]
    pub click_duration_ms: u64,

    /// How long a button must be held before moving starts a drag,
    /// in milliseconds (valid range: 0 - 2000)
    #[serde(default = "default_drag_duration_ms")]
    pub drag_duration_ms: u64,

    /// Maximum pointer travel between the two clicks of a double click,
    /// in pixels (valid range: 0.0 - 50.0)
    #[serde(default = "default_click_distance")]
    pub click_distance: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            click_duration_ms: default_click_duration_ms(),
            drag_duration_ms: default_drag_duration_ms(),
            click_distance: default_click_distance(),
        }
    }
}

fn default_click_duration_ms() -> u64 {
    400
}

fn default_drag_duration_ms() -> u64 {
    100
}

fn default_click_distance() -> f64 {
    3.0
}
