//! HTML overlay collecting edge labels for one frame.
//!
//! Labels are positioned absolutely over the edge layer so they can hold
//! arbitrary markup; the host mounts [`LabelPortal::to_html`] at
//! [`LABEL_PORTAL_ID`].

use crate::svg::{escape_attr, num};
use std::fmt::Write;

pub const LABEL_PORTAL_ID: &str = "edgelabel-portal";

#[derive(Clone, Debug, PartialEq)]
pub struct LabelBackground {
    pub style: Option<String>,
    /// Horizontal and vertical padding in pixels.
    pub padding: (f32, f32),
    pub border_radius: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PortalLabel {
    pub edge_id: String,
    pub x: f32,
    pub y: f32,
    /// Ready-to-insert markup; plain text labels are escaped before they get here.
    pub content: String,
    pub z_index: i32,
    pub style: Option<String>,
    pub background: Option<LabelBackground>,
}

impl PortalLabel {
    fn write_html(&self, out: &mut String) {
        let _ = write!(
            out,
            "<div class=\"edgeflow__edge-label\" data-edge-id=\"{}\" style=\"position: absolute; \
             transform: translate(-50%, -50%) translate({}px,{}px); z-index: {}; pointer-events: all",
            escape_attr(&self.edge_id),
            num(self.x),
            num(self.y),
            self.z_index,
        );
        if let Some(bg) = &self.background {
            let _ = write!(
                out,
                "; padding: {}px {}px; border-radius: {}px",
                num(bg.padding.1),
                num(bg.padding.0),
                num(bg.border_radius)
            );
            if let Some(s) = &bg.style {
                let _ = write!(out, "; {}", escape_attr(s));
            }
        }
        if let Some(s) = &self.style {
            let _ = write!(out, "; {}", escape_attr(s));
        }
        let _ = write!(out, "\">{}</div>", self.content);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelPortal {
    pub labels: Vec<PortalLabel>,
}

impl LabelPortal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: PortalLabel) {
        self.labels.push(label);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, edge_id: &str) -> Option<&PortalLabel> {
        self.labels.iter().find(|l| l.edge_id == edge_id)
    }

    pub fn to_html(&self) -> String {
        let mut out = format!("<div id=\"{}\">", LABEL_PORTAL_ID);
        for label in &self.labels {
            label.write_html(&mut out);
        }
        out.push_str("</div>");
        out
    }
}
