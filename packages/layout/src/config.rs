use serde::{Deserialize, Serialize};
use whiteboard_graph::Size;

/// Spacing constants for the mindmap layout.
///
/// One convention only: these values are the single source of truth for
/// every pass, and nothing computes gaps dynamically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Vertical gap between adjacent sibling subtrees.
    pub sibling_gap: f64,

    /// Horizontal gap between a parent's edge and its children's column.
    pub level_gap: f64,

    /// Box size assumed for nodes the host has not measured yet.
    pub fallback_size: Size,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sibling_gap: 20.0,
            level_gap: 60.0,
            fallback_size: Size::new(160.0, 40.0),
        }
    }
}
