//! Per-frame composition of the edge layer.
//!
//! A frame walks the z-tiers from [`select_visible`], resolves both handles
//! of every edge, and dispatches to the component registered for its type.
//! Marker definitions go into the topmost tier only. While a connect drag is
//! active the preview line is rendered on top.

use super::components::{EdgeProps, RenderContext};
use super::handles::{handles_for_source, handles_for_target, normalize_handle_id, resolve_handle};
use super::labels::LabelPortal;
use super::markers::{marker_id, MarkerDefinitions};
use super::memo::{MemoStats, PathMemo};
use super::positions::edge_positions;
use super::registry::{EdgeTypeRegistry, DEFAULT_EDGE_TYPE};
use super::visible::{select_visible, EdgeTier};
use crate::connection::line::{render_connection_line, ConnectionLineComponent};
use crate::model::{Edge, HandleBounds, NodeInternals};
use crate::paths::PathParams;
use crate::store::FlowStore;
use crate::svg::num;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashSet};
use std::fmt::Write;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedEdge {
    pub id: String,
    /// Type the edge was rendered as.
    pub edge_type: String,
    pub markup: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedTier {
    pub level: i32,
    pub is_max_level: bool,
    /// `<defs>` block; present on the max-level tier only.
    pub defs: Option<String>,
    pub edges: Vec<RenderedEdge>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderedFrame {
    pub width: f32,
    pub height: f32,
    pub tiers: Vec<RenderedTier>,
    pub connection_line: Option<String>,
    pub labels: LabelPortal,
}

impl RenderedFrame {
    pub fn edge(&self, id: &str) -> Option<&RenderedEdge> {
        self.tiers.iter().flat_map(|t| t.edges.iter()).find(|e| e.id == id)
    }

    pub fn edge_count(&self) -> usize {
        self.tiers.iter().map(|t| t.edges.len()).sum()
    }

    /// One `<svg>` per tier, then the connection line layer.
    pub fn to_svg(&self) -> String {
        let (w, h) = (num(self.width), num(self.height));
        let mut out = String::new();
        for tier in &self.tiers {
            let _ = write!(
                out,
                "<svg class=\"edgeflow__edges\" width=\"{}\" height=\"{}\" style=\"z-index: {}\">",
                w, h, tier.level
            );
            if let Some(defs) = &tier.defs {
                out.push_str(defs);
            }
            out.push_str("<g>");
            for e in &tier.edges {
                out.push_str(&e.markup);
            }
            out.push_str("</g></svg>");
        }
        if let Some(line) = &self.connection_line {
            let _ = write!(
                out,
                "<svg class=\"edgeflow__connectionline\" width=\"{}\" height=\"{}\">{}</svg>",
                w, h, line
            );
        }
        out
    }

    /// Label overlay markup.
    pub fn to_html(&self) -> String {
        self.labels.to_html()
    }
}

pub struct EdgeRenderer {
    registry: EdgeTypeRegistry,
    connection_line: Option<Rc<dyn ConnectionLineComponent>>,
    warned_types: RefCell<BTreeSet<String>>,
    warnings: RefCell<Vec<String>>,
    memo: RefCell<PathMemo>,
}

impl Default for EdgeRenderer {
    fn default() -> Self {
        Self::new(EdgeTypeRegistry::default())
    }
}

struct ResolvedEnds<'a> {
    source: &'a NodeInternals,
    target: &'a NodeInternals,
    source_handle: &'a HandleBounds,
    target_handle: &'a HandleBounds,
}

impl EdgeRenderer {
    pub fn new(registry: EdgeTypeRegistry) -> Self {
        EdgeRenderer {
            registry,
            connection_line: None,
            warned_types: RefCell::new(BTreeSet::new()),
            warnings: RefCell::new(Vec::new()),
            memo: RefCell::new(PathMemo::new()),
        }
    }

    pub fn registry(&self) -> &EdgeTypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EdgeTypeRegistry {
        self.memo.borrow_mut().clear();
        &mut self.registry
    }

    pub fn set_connection_line_component(&mut self, component: Option<Rc<dyn ConnectionLineComponent>>) {
        self.connection_line = component;
    }

    /// Configuration warnings raised so far, oldest first.
    pub fn diagnostics(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }

    pub fn memo_stats(&self) -> MemoStats {
        self.memo.borrow().stats()
    }

    // Unknown types render as the default type; each tag is reported once.
    fn resolve_type<'e>(&self, edge: &'e Edge) -> &'e str {
        let tag = edge.edge_type.as_deref().unwrap_or(DEFAULT_EDGE_TYPE);
        if self.registry.contains(tag) {
            return tag;
        }
        if self.warned_types.borrow_mut().insert(tag.to_string()) {
            let msg = format!("Edge type \"{}\" not found. Using fallback type \"{}\".", tag, DEFAULT_EDGE_TYPE);
            log::warn!("{}", msg);
            self.warnings.borrow_mut().push(msg);
        }
        DEFAULT_EDGE_TYPE
    }

    fn resolve_ends<'s>(&self, store: &'s FlowStore, edge: &Edge) -> Option<ResolvedEnds<'s>> {
        let source = store.node(&edge.source)?;
        let target = store.node(&edge.target)?;
        if !source.is_ready() || !target.is_ready() {
            log::trace!("edge {} skipped: endpoint node not ready", edge.id);
            return None;
        }
        let source_bounds = source.handle_bounds.as_ref()?;
        let target_bounds = target.handle_bounds.as_ref()?;

        let source_handle = resolve_handle(
            handles_for_source(source_bounds),
            normalize_handle_id(edge.source_handle.as_deref()),
        );
        let target_handle = resolve_handle(
            handles_for_target(target_bounds, store.connection_mode()),
            normalize_handle_id(edge.target_handle.as_deref()),
        );
        match (source_handle, target_handle) {
            (Some(source_handle), Some(target_handle)) => Some(ResolvedEnds {
                source,
                target,
                source_handle,
                target_handle,
            }),
            _ => {
                log::trace!(
                    "edge {} skipped: handle {:?} -> {:?} not resolved",
                    edge.id,
                    edge.source_handle,
                    edge.target_handle
                );
                None
            }
        }
    }

    fn edge_params(ends: &ResolvedEnds<'_>) -> PathParams {
        edge_positions(
            &ends.source.rect(),
            Some(ends.source_handle),
            ends.source_handle.position,
            &ends.target.rect(),
            Some(ends.target_handle),
            ends.target_handle.position,
        )
        .with_positions(ends.source_handle.position, ends.target_handle.position)
    }

    fn render_tier(
        &self,
        store: &FlowStore,
        tier: &EdgeTier<'_>,
        ctx: &mut RenderContext<'_>,
        live: &mut HashSet<String>,
    ) -> Vec<RenderedEdge> {
        let config = store.config();
        let flow_id = config.flow_id.as_deref();
        let mut out = Vec::with_capacity(tier.edges.len());

        for edge in tier.edges.iter().copied() {
            if edge.hidden {
                continue;
            }
            let edge_type = self.resolve_type(edge);
            let Some(ends) = self.resolve_ends(store, edge) else { continue };
            let Some(component) = self.registry.get(edge_type) else { continue };

            let props = EdgeProps {
                edge,
                edge_type,
                position: Self::edge_params(&ends),
                connected_node_dragging: ends.source.dragging || ends.target.dragging,
                elements_selectable: config.elements_selectable,
                updatable: config.edges_updatable,
                updater_radius: config.edge_updater_radius,
                marker_start: edge.marker_start.as_ref().map(|m| marker_id(m, flow_id)),
                marker_end: edge.marker_end.as_ref().map(|m| marker_id(m, flow_id)),
            };
            let markup = component.render(&props, ctx);
            live.insert(edge.id.clone());
            out.push(RenderedEdge {
                id: edge.id.clone(),
                edge_type: edge_type.to_string(),
                markup,
            });
        }
        out
    }

    pub fn render(&self, store: &FlowStore) -> RenderedFrame {
        let viewport = store.viewport();
        if viewport.width <= 0.0 {
            return RenderedFrame::default();
        }
        let config = store.config();

        #[cfg(feature = "render_prof")]
        let t_all = std::time::Instant::now();
        let tiers = select_visible(
            store.edges(),
            store.nodes(),
            config.only_render_visible_elements,
            viewport,
            config.elevate_edges_on_select,
        );

        #[cfg(feature = "render_prof")]
        let select_ms = t_all.elapsed().as_secs_f64() * 1000.0;

        let mut labels = LabelPortal::new();
        let mut live = HashSet::new();
        let mut rendered = Vec::with_capacity(tiers.len());
        {
            let mut memo = self.memo.borrow_mut();
            let mut ctx = RenderContext::new(&mut labels, &mut memo);
            for tier in &tiers {
                let defs = tier.is_max_level.then(|| {
                    MarkerDefinitions::collect(
                        store.edges().iter().filter(|e| !e.hidden),
                        config.flow_id.as_deref(),
                        &config.default_marker_color,
                    )
                    .to_svg()
                });
                rendered.push(RenderedTier {
                    level: tier.level,
                    is_max_level: tier.is_max_level,
                    defs,
                    edges: self.render_tier(store, tier, &mut ctx, &mut live),
                });
            }
        }
        self.memo.borrow_mut().retain(&live.iter().map(String::as_str).collect());

        #[cfg(feature = "render_prof")]
        eprintln!(
            "render_frame edges={} tiers={} select_ms={:.3} total_ms={:.3}",
            live.len(),
            rendered.len(),
            select_ms,
            t_all.elapsed().as_secs_f64() * 1000.0
        );

        RenderedFrame {
            width: viewport.width,
            height: viewport.height,
            tiers: rendered,
            connection_line: render_connection_line(store, self.connection_line.as_deref()),
            labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeMarker, HandleKind, MarkerSpec, MarkerType, NodeHandleBounds, Position, Viewport};

    fn node(id: &str, x: f32) -> NodeInternals {
        let bounds = NodeHandleBounds {
            source: vec![HandleBounds::new(None, Position::Right, 96.0, 16.0, 8.0, 8.0)],
            target: vec![HandleBounds::new(None, Position::Left, -4.0, 16.0, 8.0, 8.0)],
        };
        NodeInternals::new(id, x, 0.0).with_size(100.0, 40.0).with_handles(bounds)
    }

    fn store() -> FlowStore {
        let mut s = FlowStore::default();
        s.set_viewport(Viewport::new(800.0, 600.0)).unwrap();
        s.upsert_node(node("a", 0.0)).unwrap();
        s.upsert_node(node("b", 300.0)).unwrap();
        s
    }

    #[test]
    fn unmeasured_pane_renders_nothing() {
        let mut s = store();
        s.add_edge(Edge::new("e1", "a", "b")).unwrap();
        s.set_viewport(Viewport::default()).unwrap();
        let frame = EdgeRenderer::default().render(&s);
        assert!(frame.tiers.is_empty());
        assert_eq!(frame.to_svg(), "");
    }

    #[test]
    fn straight_edge_between_handle_centers() {
        let mut s = store();
        s.add_edge(Edge::new("e1", "a", "b").with_type("straight")).unwrap();
        let frame = EdgeRenderer::default().render(&s);
        let e = frame.edge("e1").unwrap();
        assert!(e.markup.contains("d=\"M100,20 L300,20\""));
    }

    #[test]
    fn unknown_type_warns_once_and_uses_default() {
        let mut s = store();
        s.add_edge(Edge::new("e1", "a", "b").with_type("fancy")).unwrap();
        s.add_edge(Edge::new("e2", "b", "a").with_type("fancy")).unwrap();
        let r = EdgeRenderer::default();
        let f1 = r.render(&s);
        let f2 = r.render(&s);
        assert_eq!(r.diagnostics().len(), 1);
        assert!(r.diagnostics()[0].contains("\"fancy\""));
        assert_eq!(f1.edge("e1").map(|e| e.edge_type.as_str()), Some("default"));
        assert_eq!(f1, f2);
    }

    #[test]
    fn unresolved_handle_skips_only_that_edge() {
        let mut s = store();
        s.add_edge(Edge::new("ok", "a", "b")).unwrap();
        s.add_edge(Edge::new("bad", "a", "b").with_handles(Some("nope"), None)).unwrap();
        let mut unmeasured = NodeInternals::new("c", 600.0, 0.0);
        unmeasured.handle_bounds = Some(NodeHandleBounds::default());
        s.upsert_node(unmeasured).unwrap();
        s.add_edge(Edge::new("pending", "a", "c")).unwrap();
        let frame = EdgeRenderer::default().render(&s);
        assert_eq!(frame.edge_count(), 1);
        assert!(frame.edge("ok").is_some());
    }

    #[test]
    fn hidden_edges_are_not_drawn() {
        let mut s = store();
        let mut e = Edge::new("e1", "a", "b");
        e.hidden = true;
        s.add_edge(e).unwrap();
        assert_eq!(EdgeRenderer::default().render(&s).edge_count(), 0);
    }

    #[test]
    fn markers_are_defined_in_the_top_tier_only() {
        let mut s = store();
        let mut cfg = s.config().clone();
        cfg.elevate_edges_on_select = true;
        s.set_config(cfg).unwrap();
        let mut e1 = Edge::new("e1", "a", "b");
        e1.marker_end = Some(EdgeMarker::Spec(MarkerSpec::new(MarkerType::ArrowClosed)));
        let mut e2 = Edge::new("e2", "b", "a");
        e2.selected = true;
        s.add_edge(e1).unwrap();
        s.add_edge(e2).unwrap();

        let frame = EdgeRenderer::default().render(&s);
        assert_eq!(frame.tiers.len(), 2);
        assert!(frame.tiers[0].defs.is_none());
        let defs = frame.tiers[1].defs.as_deref().unwrap();
        assert!(defs.contains("<marker id=\"type=arrowclosed\""));
        assert!(frame.edge("e1").unwrap().markup.contains("marker-end=\"url(#type=arrowclosed)\""));

        let svg = frame.to_svg();
        assert_eq!(svg.matches("<defs>").count(), 1);
        assert!(svg.contains("style=\"z-index: 1000\""));
    }

    #[test]
    fn loose_mode_attaches_to_source_handles() {
        let mut s = store();
        let only_sources = NodeHandleBounds {
            source: vec![HandleBounds::new(None, Position::Bottom, 46.0, 36.0, 8.0, 8.0)],
            target: vec![],
        };
        s.set_handle_bounds("b", only_sources).unwrap();
        s.add_edge(Edge::new("e1", "a", "b")).unwrap();
        assert_eq!(EdgeRenderer::default().render(&s).edge_count(), 0);

        s.set_connection_mode(crate::model::ConnectionMode::Loose);
        let frame = EdgeRenderer::default().render(&s);
        assert_eq!(frame.edge_count(), 1);
    }

    #[test]
    fn active_drag_adds_one_connection_line() {
        let mut s = store();
        s.set_connection_drag(Some(crate::model::ConnectionDrag {
            node_id: "a".into(),
            handle_kind: HandleKind::Source,
            handle_id: None,
            pointer: crate::model::Vec2::new(200.0, 100.0),
            updating: None,
        }));
        let frame = EdgeRenderer::default().render(&s);
        let svg = frame.to_svg();
        assert_eq!(svg.matches("edgeflow__connection-path").count(), 1);
    }

    #[test]
    fn unchanged_edges_reuse_their_paths() {
        let mut s = store();
        s.add_edge(Edge::new("e1", "a", "b")).unwrap();
        s.add_edge(Edge::new("e2", "b", "a")).unwrap();
        let r = EdgeRenderer::default();
        r.render(&s);
        s.move_node("b", 320.0, 0.0).unwrap();
        s.upsert_node(node("c", 900.0)).unwrap();
        r.render(&s);
        // Both edges touch b, so both miss again.
        assert_eq!(r.memo_stats().misses, 4);
        s.set_node_selected("c", true).unwrap();
        r.render(&s);
        assert_eq!(r.memo_stats().hits, 2);
    }
}
