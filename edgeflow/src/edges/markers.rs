//! Arrowhead `<marker>` definitions shared by all edges of a frame.

use crate::model::{Edge, EdgeMarker, MarkerSpec, MarkerType};
use crate::svg::{escape_attr, num};
use std::collections::HashSet;
use std::fmt::Write;

pub const DEFAULT_MARKER_SIZE: f32 = 12.5;
pub const DEFAULT_MARKER_STROKE_WIDTH: f32 = 1.0;

/// Stable id for a marker. Named markers are used verbatim; specs are keyed
/// by their set fields in sorted order, prefixed with the flow id when one
/// is configured.
pub fn marker_id(marker: &EdgeMarker, flow_id: Option<&str>) -> String {
    let spec = match marker {
        EdgeMarker::Named(id) => return id.clone(),
        EdgeMarker::Spec(spec) => spec,
    };

    // Sorted by key name.
    let mut pairs: Vec<(&str, String)> = Vec::with_capacity(7);
    if let Some(c) = &spec.color {
        pairs.push(("color", c.clone()));
    }
    if let Some(h) = spec.height {
        pairs.push(("height", num(h)));
    }
    if let Some(u) = &spec.marker_units {
        pairs.push(("markerUnits", u.clone()));
    }
    if let Some(o) = &spec.orient {
        pairs.push(("orient", o.clone()));
    }
    if let Some(s) = spec.stroke_width {
        pairs.push(("strokeWidth", num(s)));
    }
    pairs.push(("type", spec.marker_type.as_str().to_string()));
    if let Some(w) = spec.width {
        pairs.push(("width", num(w)));
    }

    let mut id = String::new();
    if let Some(prefix) = flow_id.filter(|f| !f.is_empty()) {
        id.push_str(prefix);
        id.push_str("__");
    }
    for (i, (k, v)) in pairs.iter().enumerate() {
        if i > 0 {
            id.push('&');
        }
        let _ = write!(id, "{}={}", k, v);
    }
    id
}

/// One `<marker>` with every optional field resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerDefinition {
    pub id: String,
    pub marker_type: MarkerType,
    pub color: String,
    pub width: f32,
    pub height: f32,
    pub stroke_width: f32,
    pub orient: String,
    pub marker_units: String,
}

impl MarkerDefinition {
    fn resolve(id: String, spec: &MarkerSpec, default_color: &str) -> Self {
        MarkerDefinition {
            id,
            marker_type: spec.marker_type,
            color: spec.color.clone().unwrap_or_else(|| default_color.to_string()),
            width: spec.width.unwrap_or(DEFAULT_MARKER_SIZE),
            height: spec.height.unwrap_or(DEFAULT_MARKER_SIZE),
            stroke_width: spec.stroke_width.unwrap_or(DEFAULT_MARKER_STROKE_WIDTH),
            orient: spec.orient.clone().unwrap_or_else(|| "auto".to_string()),
            marker_units: spec.marker_units.clone().unwrap_or_else(|| "strokeWidth".to_string()),
        }
    }

    fn write_svg(&self, out: &mut String) {
        let color = escape_attr(&self.color);
        let _ = write!(
            out,
            "<marker id=\"{}\" class=\"edgeflow__arrowhead\" markerWidth=\"{}\" markerHeight=\"{}\" \
             viewBox=\"-10 -10 20 20\" markerUnits=\"{}\" orient=\"{}\" refX=\"0\" refY=\"0\">",
            escape_attr(&self.id),
            num(self.width),
            num(self.height),
            escape_attr(&self.marker_units),
            escape_attr(&self.orient),
        );
        let (fill, points) = match self.marker_type {
            MarkerType::Arrow => ("none".to_string(), "-5,-4 0,0 -5,4"),
            MarkerType::ArrowClosed => (color.clone(), "-5,-4 0,0 -5,4 -5,-4"),
        };
        let _ = write!(
            out,
            "<polyline stroke=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\" \
             stroke-width=\"{}\" fill=\"{}\" points=\"{}\"/></marker>",
            color,
            num(self.stroke_width),
            fill,
            points,
        );
    }
}

/// Distinct marker definitions used by a set of edges, in first-use order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkerDefinitions {
    pub markers: Vec<MarkerDefinition>,
}

impl MarkerDefinitions {
    pub fn collect<'a>(
        edges: impl IntoIterator<Item = &'a Edge>,
        flow_id: Option<&str>,
        default_color: &str,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut markers = Vec::new();
        for edge in edges {
            for marker in [&edge.marker_start, &edge.marker_end].into_iter().flatten() {
                // Named markers are defined by the host.
                let EdgeMarker::Spec(spec) = marker else { continue };
                let id = marker_id(marker, flow_id);
                if seen.insert(id.clone()) {
                    markers.push(MarkerDefinition::resolve(id, spec, default_color));
                }
            }
        }
        MarkerDefinitions { markers }
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::from("<defs>");
        for m in &self.markers {
            m.write_svg(&mut out);
        }
        out.push_str("</defs>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed(color: Option<&str>) -> EdgeMarker {
        let mut spec = MarkerSpec::new(MarkerType::ArrowClosed);
        spec.color = color.map(str::to_string);
        EdgeMarker::Spec(spec)
    }

    #[test]
    fn spec_ids_list_sorted_keys() {
        let mut spec = MarkerSpec::new(MarkerType::Arrow);
        spec.width = Some(20.0);
        spec.color = Some("red".into());
        let id = marker_id(&EdgeMarker::Spec(spec), None);
        assert_eq!(id, "color=red&type=arrow&width=20");
    }

    #[test]
    fn flow_id_prefixes_spec_ids_only() {
        assert_eq!(marker_id(&closed(None), Some("f1")), "f1__type=arrowclosed");
        assert_eq!(marker_id(&EdgeMarker::Named("mine".into()), Some("f1")), "mine");
    }

    #[test]
    fn shared_markers_are_defined_once() {
        let mut a = Edge::new("a", "n1", "n2");
        a.marker_end = Some(closed(None));
        let mut b = Edge::new("b", "n2", "n3");
        b.marker_end = Some(closed(None));
        b.marker_start = Some(closed(Some("#f00")));
        let mut c = Edge::new("c", "n1", "n3");
        c.marker_end = Some(EdgeMarker::Named("external".into()));

        let defs = MarkerDefinitions::collect([&a, &b, &c], None, "#b1b1b7");
        let ids: Vec<&str> = defs.markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["type=arrowclosed", "color=#f00&type=arrowclosed"]);
        assert_eq!(defs.markers[0].color, "#b1b1b7");
        assert_eq!(defs.markers[0].width, DEFAULT_MARKER_SIZE);
    }

    #[test]
    fn svg_contains_one_marker_per_definition() {
        let mut a = Edge::new("a", "n1", "n2");
        a.marker_end = Some(EdgeMarker::Spec(MarkerSpec::new(MarkerType::Arrow)));
        let svg = MarkerDefinitions::collect([&a], None, "#222").to_svg();
        assert!(svg.starts_with("<defs><marker id=\"type=arrow\""));
        assert_eq!(svg.matches("<marker ").count(), 1);
        assert!(svg.contains("fill=\"none\""));
        assert!(svg.contains("stroke=\"#222\""));
        assert!(svg.ends_with("</marker></defs>"));
    }

    #[test]
    fn empty_set_still_renders_defs() {
        let defs = MarkerDefinitions::collect(std::iter::empty(), None, "#000");
        assert!(defs.is_empty());
        assert_eq!(defs.to_svg(), "<defs></defs>");
    }
}
