//! Edge components: one per edge type, turning resolved geometry into markup.

use super::labels::{LabelBackground, LabelPortal, PortalLabel};
use super::memo::{PathKey, PathMemo};
use crate::model::{Edge, EdgeLabel, Position};
use crate::paths::{
    bezier_path, simple_bezier_path, smooth_step_path, step_path, straight_path, EdgePath, PathParams, StepOptions,
};
use crate::svg::{class_list, escape_attr, escape_text, num};
use std::fmt::Write;

/// Inputs handed to an edge component for one frame.
#[derive(Clone, Debug)]
pub struct EdgeProps<'a> {
    pub edge: &'a Edge,
    /// Registered tag the edge renders as, after unknown-type fallback.
    pub edge_type: &'a str,
    pub position: PathParams,
    /// Either endpoint node is being dragged.
    pub connected_node_dragging: bool,
    pub elements_selectable: bool,
    pub updatable: bool,
    pub updater_radius: f32,
    /// Marker ids, without the `url(#…)` wrapping.
    pub marker_start: Option<String>,
    pub marker_end: Option<String>,
}

/// Per-frame state shared by every component call.
pub struct RenderContext<'r> {
    labels: &'r mut LabelPortal,
    memo: &'r mut PathMemo,
}

impl<'r> RenderContext<'r> {
    pub fn new(labels: &'r mut LabelPortal, memo: &'r mut PathMemo) -> Self {
        RenderContext { labels, memo }
    }

    pub fn labels(&mut self) -> &mut LabelPortal {
        &mut *self.labels
    }

    /// Path for `props`, reusing last frame's result when the type, anchors
    /// and path options are unchanged.
    pub fn memoized_path(&mut self, props: &EdgeProps<'_>, compute: impl FnOnce() -> EdgePath) -> EdgePath {
        let key = PathKey {
            edge_type: props.edge_type.to_string(),
            params: props.position,
            options: props.edge.path_options,
        };
        self.memo.get_or_compute(&props.edge.id, key, compute)
    }
}

pub trait EdgeComponent {
    /// Path data and label point. Must depend only on `props.position`,
    /// `props.edge_type` and the edge's path options, or results will be
    /// reused when they should not be.
    fn path(&self, props: &EdgeProps<'_>) -> EdgePath;

    fn render(&self, props: &EdgeProps<'_>, ctx: &mut RenderContext<'_>) -> String {
        let path = ctx.memoized_path(props, || self.path(props));
        render_edge(props, &path, ctx.labels())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BezierEdge;

impl EdgeComponent for BezierEdge {
    fn path(&self, props: &EdgeProps<'_>) -> EdgePath {
        bezier_path(&props.position, props.edge.path_options.curvature)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleBezierEdge;

impl EdgeComponent for SimpleBezierEdge {
    fn path(&self, props: &EdgeProps<'_>) -> EdgePath {
        simple_bezier_path(&props.position)
    }
}

/// Orthogonal edge; `sharp` draws the plain step variant.
#[derive(Clone, Copy, Debug, Default)]
pub struct SmoothStepEdge {
    pub sharp: bool,
}

impl EdgeComponent for SmoothStepEdge {
    fn path(&self, props: &EdgeProps<'_>) -> EdgePath {
        let options = StepOptions::from(&props.edge.path_options);
        if self.sharp {
            step_path(&props.position, &options)
        } else {
            smooth_step_path(&props.position, &options)
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StraightEdge;

impl EdgeComponent for StraightEdge {
    fn path(&self, props: &EdgeProps<'_>) -> EdgePath {
        straight_path(&props.position)
    }
}

// Updater circles sit just outside the node side they belong to.
fn updater_center(x: f32, y: f32, position: Position, radius: f32) -> (f32, f32) {
    let d = position.direction();
    (x + d.x * radius, y + d.y * radius)
}

fn write_updater(out: &mut String, end: &str, x: f32, y: f32, position: Position, radius: f32) {
    let (cx, cy) = updater_center(x, y, position, radius);
    let _ = write!(
        out,
        "<circle class=\"edgeflow__edgeupdater edgeflow__edgeupdater-{}\" data-handle-type=\"{}\" \
         cx=\"{}\" cy=\"{}\" r=\"{}\" stroke=\"transparent\" fill=\"transparent\"/>",
        end,
        end,
        num(cx),
        num(cy),
        num(radius)
    );
}

fn portal_label(props: &EdgeProps<'_>, path: &EdgePath, label: &EdgeLabel) -> PortalLabel {
    let edge = props.edge;
    let content = match label {
        EdgeLabel::Text(text) => escape_text(text),
        EdgeLabel::Custom(markup) => markup.clone(),
    };
    let background = edge.label_show_bg.then(|| LabelBackground {
        style: edge.label_bg_style.clone(),
        padding: edge.label_bg_padding,
        border_radius: edge.label_bg_border_radius,
    });
    PortalLabel {
        edge_id: edge.id.clone(),
        x: path.label_x,
        y: path.label_y,
        content,
        z_index: if props.connected_node_dragging { 0 } else { 1 },
        style: edge.label_style.clone(),
        background,
    }
}

/// Shared markup for the built-in edge types: wrapper group, the path with
/// markers, optional updater hit targets, and the label pushed to `labels`.
pub fn render_edge(props: &EdgeProps<'_>, path: &EdgePath, labels: &mut LabelPortal) -> String {
    let edge = props.edge;
    let type_class = format!("edgeflow__edge-{}", props.edge_type);
    let classes = class_list([
        "edgeflow__edge",
        type_class.as_str(),
        if edge.selected { "selected" } else { "" },
        if edge.animated { "animated" } else { "" },
        if props.elements_selectable { "" } else { "inactive" },
        if props.connected_node_dragging { "dragging" } else { "" },
        edge.class_name.as_deref().unwrap_or(""),
    ]);

    let mut out = format!("<g class=\"{}\"", classes);
    if props.connected_node_dragging {
        out.push_str(" style=\"opacity: 0.5\"");
    }
    out.push('>');

    let _ = write!(
        out,
        "<path id=\"{}\" class=\"edgeflow__edge-path\" d=\"{}\"",
        escape_attr(&edge.id),
        path.path
    );
    if let Some(m) = &props.marker_start {
        let _ = write!(out, " marker-start=\"url(#{})\"", escape_attr(m));
    }
    if let Some(m) = &props.marker_end {
        let _ = write!(out, " marker-end=\"url(#{})\"", escape_attr(m));
    }
    if let Some(style) = &edge.style {
        let _ = write!(out, " style=\"{}\"", escape_attr(style));
    }
    out.push_str("/>");

    if props.updatable {
        let p = &props.position;
        write_updater(&mut out, "source", p.source_x, p.source_y, p.source_position, props.updater_radius);
        write_updater(&mut out, "target", p.target_x, p.target_y, p.target_position, props.updater_radius);
    }
    out.push_str("</g>");

    if let Some(label) = &edge.label {
        labels.push(portal_label(props, path, label));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props<'a>(edge: &'a Edge, edge_type: &'a str) -> EdgeProps<'a> {
        EdgeProps {
            edge,
            edge_type,
            position: PathParams::new(0.0, 0.0, Position::Right, 100.0, 0.0, Position::Left),
            connected_node_dragging: false,
            elements_selectable: true,
            updatable: false,
            updater_radius: 10.0,
            marker_start: None,
            marker_end: None,
        }
    }

    fn render(component: &dyn EdgeComponent, props: &EdgeProps<'_>) -> (String, LabelPortal) {
        let mut labels = LabelPortal::new();
        let mut memo = PathMemo::new();
        let markup = component.render(props, &mut RenderContext::new(&mut labels, &mut memo));
        (markup, labels)
    }

    #[test]
    fn path_carries_edge_id_and_markers() {
        let edge = Edge::new("e1", "a", "b");
        let mut p = props(&edge, "straight");
        p.marker_end = Some("type=arrow".into());
        let (markup, labels) = render(&StraightEdge, &p);
        assert!(markup.starts_with("<g class=\"edgeflow__edge edgeflow__edge-straight\">"));
        assert!(markup.contains("<path id=\"e1\" class=\"edgeflow__edge-path\" d=\"M0,0 L100,0\""));
        assert!(markup.contains("marker-end=\"url(#type=arrow)\""));
        assert!(!markup.contains("marker-start"));
        assert!(labels.is_empty());
    }

    #[test]
    fn state_classes() {
        let mut edge = Edge::new("e1", "a", "b");
        edge.selected = true;
        edge.animated = true;
        edge.class_name = Some("mine".into());
        let mut p = props(&edge, "bezier");
        p.elements_selectable = false;
        let (markup, _) = render(&BezierEdge, &p);
        assert!(markup.starts_with("<g class=\"edgeflow__edge edgeflow__edge-bezier selected animated inactive mine\">"));
    }

    #[test]
    fn dragging_dims_edge_and_lowers_label() {
        let edge = Edge::new("e1", "a", "b").with_label(EdgeLabel::Text("a < b".into()));
        let mut p = props(&edge, "default");
        let (_, labels) = render(&BezierEdge, &p);
        assert_eq!(labels.labels[0].z_index, 1);
        assert_eq!(labels.labels[0].content, "a &lt; b");

        p.connected_node_dragging = true;
        let (markup, labels) = render(&BezierEdge, &p);
        assert!(markup.contains(" dragging\" style=\"opacity: 0.5\">"));
        assert_eq!(labels.labels[0].z_index, 0);
    }

    #[test]
    fn label_sits_on_the_kernel_label_point() {
        let edge = Edge::new("e1", "a", "b").with_label(EdgeLabel::Custom("<b>x</b>".into()));
        let p = props(&edge, "straight");
        let (_, labels) = render(&StraightEdge, &p);
        let l = &labels.labels[0];
        assert_eq!((l.x, l.y), (50.0, 0.0));
        assert_eq!(l.content, "<b>x</b>");
        assert!(l.background.is_none());
    }

    #[test]
    fn updaters_are_shifted_outward() {
        let edge = Edge::new("e1", "a", "b");
        let mut p = props(&edge, "straight");
        p.updatable = true;
        let (markup, _) = render(&StraightEdge, &p);
        assert!(markup.contains("edgeflow__edgeupdater-source\" data-handle-type=\"source\" cx=\"10\" cy=\"0\" r=\"10\""));
        assert!(markup.contains("edgeflow__edgeupdater-target\" data-handle-type=\"target\" cx=\"90\" cy=\"0\" r=\"10\""));
    }

    #[test]
    fn step_variants_differ_only_in_corners() {
        let edge = Edge::new("e1", "a", "b");
        let mut p = props(&edge, "step");
        p.position = PathParams::new(0.0, 0.0, Position::Right, 200.0, 100.0, Position::Left);
        let sharp = SmoothStepEdge { sharp: true }.path(&p);
        let smooth = SmoothStepEdge { sharp: false }.path(&p);
        assert_eq!(sharp.path, "M0,0 L100,0 L100,100 L200,100");
        assert!(smooth.path.contains('Q'));
        assert_eq!((sharp.label_x, sharp.label_y), (smooth.label_x, smooth.label_y));
    }
}
