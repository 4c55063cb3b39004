//! Renderer and interaction settings.
//!
//! Hosts either build a [`FlowConfig`] in code or hand over a JSON object;
//! every field is optional and falls back to its default.

use crate::error::{FlowError, FlowResult};
use crate::model::{ConnectionLineType, ConnectionMode};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MARKER_COLOR: &str = "#b1b1b7";
pub const DEFAULT_EDGE_UPDATER_RADIUS: f32 = 10.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowConfig {
    pub connection_mode: ConnectionMode,
    pub connection_line_type: ConnectionLineType,
    pub connection_line_style: Option<String>,
    /// Skip edges whose endpoint nodes are both outside the viewport.
    pub only_render_visible_elements: bool,
    /// Lift selected/animated/dragged edges into a higher tier.
    pub elevate_edges_on_select: bool,
    pub default_marker_color: String,
    pub edge_updater_radius: f32,
    /// Render the reconnect hit targets at both edge ends.
    pub edges_updatable: bool,
    pub elements_selectable: bool,
    pub nodes_connectable: bool,
    /// Prefix for generated marker ids when several flows share a document.
    pub flow_id: Option<String>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        FlowConfig {
            connection_mode: ConnectionMode::Strict,
            connection_line_type: ConnectionLineType::Bezier,
            connection_line_style: None,
            only_render_visible_elements: false,
            elevate_edges_on_select: false,
            default_marker_color: DEFAULT_MARKER_COLOR.to_string(),
            edge_updater_radius: DEFAULT_EDGE_UPDATER_RADIUS,
            edges_updatable: false,
            elements_selectable: true,
            nodes_connectable: true,
            flow_id: None,
        }
    }
}

impl FlowConfig {
    pub fn from_json_str(s: &str) -> FlowResult<Self> {
        let cfg: FlowConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_value(v: serde_json::Value) -> FlowResult<Self> {
        let cfg: FlowConfig = serde_json::from_value(v)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> FlowResult<()> {
        let r = self.edge_updater_radius;
        if !r.is_finite() || r < 0.0 {
            return Err(FlowError::InvalidValue {
                param: "edgeUpdaterRadius",
                reason: format!("expected a finite, non-negative radius, got {}", r),
            });
        }
        if self.default_marker_color.trim().is_empty() {
            return Err(FlowError::InvalidValue {
                param: "defaultMarkerColor",
                reason: "color must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
