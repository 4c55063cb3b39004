//! Edge filtering and z-tiering for one frame.

use crate::model::{Edge, NodeInternals, Viewport};
use std::collections::{BTreeMap, HashMap};

/// Z offset given to elevated edges when neither endpoint node sits higher.
pub const ELEVATED_Z: i32 = 1000;

/// Decides whether a node is on screen.
pub trait NodeVisibility {
    fn is_visible(&self, node: &NodeInternals) -> bool;
}

impl<F: Fn(&NodeInternals) -> bool> NodeVisibility for F {
    fn is_visible(&self, node: &NodeInternals) -> bool {
        self(node)
    }
}

impl NodeVisibility for Viewport {
    fn is_visible(&self, node: &NodeInternals) -> bool {
        self.flow_rect().intersects(&node.rect())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeTier<'a> {
    pub level: i32,
    pub edges: Vec<&'a Edge>,
    /// Topmost tier; carries the shared marker definitions.
    pub is_max_level: bool,
}

fn is_elevated(edge: &Edge, source: &NodeInternals, target: &NodeInternals) -> bool {
    edge.selected
        || edge.animated
        || source.selected
        || target.selected
        || source.dragging
        || target.dragging
}

/// Filters `edges` down to the renderable ones and groups them by z level.
///
/// Tiers come out in ascending level order and keep the input order of the
/// edges inside each tier. Exactly one tier has `is_max_level` set; with no
/// edges a single empty base tier is returned.
pub fn select_visible<'a>(
    edges: &'a [Edge],
    nodes: &HashMap<String, NodeInternals>,
    only_render_visible: bool,
    visibility: &dyn NodeVisibility,
    elevate_on_select: bool,
) -> Vec<EdgeTier<'a>> {
    let mut levels: BTreeMap<i32, Vec<&'a Edge>> = BTreeMap::new();

    for edge in edges {
        let (source, target) = match (nodes.get(&edge.source), nodes.get(&edge.target)) {
            (Some(s), Some(t)) => (s, t),
            _ => continue,
        };
        if only_render_visible && !visibility.is_visible(source) && !visibility.is_visible(target) {
            continue;
        }

        let base = edge.z_index.unwrap_or(0);
        let level = if elevate_on_select && is_elevated(edge, source, target) {
            base.saturating_add(source.z.max(target.z).max(ELEVATED_Z))
        } else {
            base
        };
        levels.entry(level).or_default().push(edge);
    }

    if levels.is_empty() {
        return vec![EdgeTier {
            level: 0,
            edges: Vec::new(),
            is_max_level: true,
        }];
    }

    let max_level = levels.keys().next_back().copied();
    levels
        .into_iter()
        .map(|(level, edges)| EdgeTier {
            level,
            edges,
            is_max_level: Some(level) == max_level,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(ids: &[&str]) -> HashMap<String, NodeInternals> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                let n = NodeInternals::new(*id, i as f32 * 200.0, 0.0).with_size(100.0, 40.0);
                (id.to_string(), n)
            })
            .collect()
    }

    fn ids<'a>(tier: &EdgeTier<'a>) -> Vec<&'a str> {
        tier.edges.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn edges_with_missing_nodes_are_dropped() {
        let n = nodes(&["a", "b"]);
        let edges = vec![Edge::new("e1", "a", "b"), Edge::new("e2", "a", "ghost")];
        let tiers = select_visible(&edges, &n, false, &|_: &NodeInternals| true, false);
        assert_eq!(tiers.len(), 1);
        assert_eq!(ids(&tiers[0]), vec!["e1"]);
    }

    #[test]
    fn no_edges_gives_one_empty_max_tier() {
        let tiers = select_visible(&[], &HashMap::new(), false, &|_: &NodeInternals| true, true);
        assert_eq!(tiers.len(), 1);
        assert!(tiers[0].is_max_level);
        assert_eq!(tiers[0].level, 0);
        assert!(tiers[0].edges.is_empty());
    }

    #[test]
    fn selected_and_animated_edges_are_elevated() {
        let n = nodes(&["a", "b", "c"]);
        let mut e2 = Edge::new("e2", "b", "c");
        e2.selected = true;
        let mut e4 = Edge::new("e4", "a", "c");
        e4.animated = true;
        let edges = vec![Edge::new("e1", "a", "b"), e2, Edge::new("e3", "a", "c"), e4];

        let tiers = select_visible(&edges, &n, false, &|_: &NodeInternals| true, true);
        assert_eq!(tiers.len(), 2);
        assert_eq!((tiers[0].level, ids(&tiers[0])), (0, vec!["e1", "e3"]));
        assert_eq!((tiers[1].level, ids(&tiers[1])), (ELEVATED_Z, vec!["e2", "e4"]));
        assert!(!tiers[0].is_max_level && tiers[1].is_max_level);

        // Without elevation everything stays in the base tier.
        let flat = select_visible(&edges, &n, false, &|_: &NodeInternals| true, false);
        assert_eq!(flat.len(), 1);
        assert_eq!(ids(&flat[0]), vec!["e1", "e2", "e3", "e4"]);
    }

    #[test]
    fn dragging_node_lifts_its_edges_above_node_z() {
        let mut n = nodes(&["a", "b", "c"]);
        if let Some(b) = n.get_mut("b") {
            b.dragging = true;
            b.z = 2000;
        }
        let edges = vec![Edge::new("e1", "a", "b"), Edge::new("e2", "a", "c")];
        let tiers = select_visible(&edges, &n, false, &|_: &NodeInternals| true, true);
        assert_eq!(tiers.last().map(|t| t.level), Some(2000));
        assert_eq!(ids(tiers.last().unwrap()), vec!["e1"]);
    }

    #[test]
    fn z_index_hints_order_tiers_ascending() {
        let n = nodes(&["a", "b"]);
        let mut hi = Edge::new("hi", "a", "b");
        hi.z_index = Some(5);
        let mut lo = Edge::new("lo", "a", "b");
        lo.z_index = Some(-3);
        let edges = vec![hi, Edge::new("mid", "a", "b"), lo];
        let tiers = select_visible(&edges, &n, false, &|_: &NodeInternals| true, false);
        let levels: Vec<i32> = tiers.iter().map(|t| t.level).collect();
        assert_eq!(levels, vec![-3, 0, 5]);
        assert_eq!(tiers.iter().filter(|t| t.is_max_level).count(), 1);
        assert!(tiers[2].is_max_level);
    }

    #[test]
    fn viewport_culling_needs_one_visible_endpoint() {
        let mut n = nodes(&["a", "b"]);
        n.insert("far".into(), NodeInternals::new("far", 5000.0, 5000.0).with_size(10.0, 10.0));
        n.insert("far2".into(), NodeInternals::new("far2", 6000.0, 5000.0).with_size(10.0, 10.0));
        let edges = vec![
            Edge::new("near", "a", "b"),
            Edge::new("half", "a", "far"),
            Edge::new("gone", "far", "far2"),
        ];
        let vp = Viewport::new(800.0, 600.0);
        let tiers = select_visible(&edges, &n, true, &vp, false);
        assert_eq!(ids(&tiers[0]), vec!["near", "half"]);

        // Culling is opt-in.
        let all = select_visible(&edges, &n, false, &vp, false);
        assert_eq!(all[0].edges.len(), 3);
    }

    #[test]
    fn rerunning_is_stable() {
        let n = nodes(&["a", "b", "c"]);
        let mut sel = Edge::new("s", "b", "c");
        sel.selected = true;
        let edges = vec![Edge::new("e1", "a", "b"), sel, Edge::new("e3", "c", "a")];
        let first = select_visible(&edges, &n, false, &|_: &NodeInternals| true, true);
        let second = select_visible(&edges, &n, false, &|_: &NodeInternals| true, true);
        assert_eq!(first, second);
    }
}
