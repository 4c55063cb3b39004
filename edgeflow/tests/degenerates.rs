use edgeflow::geometry::tolerance::SELF_LOOP_SIZE;
use edgeflow::svg::parse_path;
use edgeflow::{
    bezier_path, edge_center, simple_bezier_path, smooth_step_path, step_path, straight_path, Edge, EdgeRenderer,
    FlowStore, HandleBounds, NodeHandleBounds, NodeInternals, PathParams, Position, StepOptions, Viewport,
};

#[test]
fn coincident_anchors_draw_a_loop_in_every_style() {
    let p = PathParams::new(40.0, 40.0, Position::Bottom, 40.0, 40.0, Position::Top);
    let o = StepOptions::default();
    for path in [
        bezier_path(&p, None),
        simple_bezier_path(&p),
        step_path(&p, &o),
        smooth_step_path(&p, &o),
        straight_path(&p),
    ] {
        let cmds = parse_path(&path.path).unwrap();
        assert_eq!(cmds.len(), 2, "{}", path.path);
        assert_eq!(cmds[1].0, 'C');
        assert!((path.label_y - (40.0 + 0.75 * SELF_LOOP_SIZE)).abs() < 1e-3);
    }
}

#[test]
fn non_finite_inputs_are_sanitised() {
    let p = PathParams::new(f32::NAN, 0.0, Position::Right, f32::INFINITY, 10.0, Position::Left);
    for path in [bezier_path(&p, Some(f32::NAN)), step_path(&p, &StepOptions::default()), straight_path(&p)] {
        assert!(path.label_x.is_finite() && path.label_y.is_finite());
        assert!(!path.path.contains("NaN") && !path.path.contains("inf"));
    }
}

#[test]
fn zero_offset_step_still_routes() {
    let p = PathParams::new(0.0, 0.0, Position::Right, 100.0, 60.0, Position::Left);
    let o = StepOptions { offset: 0.0, border_radius: 0.0, ..StepOptions::default() };
    assert_eq!(step_path(&p, &o).path, "M0,0 L50,0 L50,60 L100,60");
}

#[test]
fn center_of_identical_points_is_that_point() {
    assert_eq!(edge_center(3.0, 4.0, 3.0, 4.0), (3.0, 4.0, 0.0, 0.0));
}

#[test]
fn self_connected_node_renders_a_loop_edge() {
    let handle = HandleBounds::new(None, Position::Right, 96.0, 16.0, 8.0, 8.0);
    let bounds = NodeHandleBounds {
        source: vec![handle.clone()],
        target: vec![handle],
    };
    let mut s = FlowStore::default();
    s.set_viewport(Viewport::new(500.0, 500.0)).unwrap();
    s.upsert_node(NodeInternals::new("a", 0.0, 0.0).with_size(100.0, 40.0).with_handles(bounds)).unwrap();
    s.add_edge(Edge::new("loop", "a", "a")).unwrap();
    let frame = EdgeRenderer::default().render(&s);
    assert!(frame.edge("loop").unwrap().markup.contains("d=\"M100,20 C"));
}

#[test]
fn zero_sized_node_is_not_ready() {
    let mut s = FlowStore::default();
    s.set_viewport(Viewport::new(500.0, 500.0)).unwrap();
    let bounds = NodeHandleBounds {
        source: vec![HandleBounds::new(None, Position::Bottom, 0.0, 0.0, 0.0, 0.0)],
        target: vec![HandleBounds::new(None, Position::Top, 0.0, 0.0, 0.0, 0.0)],
    };
    s.upsert_node(NodeInternals::new("a", 0.0, 0.0).with_size(0.0, 0.0).with_handles(bounds.clone()))
        .unwrap();
    s.upsert_node(NodeInternals::new("b", 0.0, 100.0).with_size(10.0, 10.0).with_handles(bounds))
        .unwrap();
    s.add_edge(Edge::new("e", "a", "b")).unwrap();
    assert_eq!(EdgeRenderer::default().render(&s).edge_count(), 0);
}

#[test]
fn huge_curvature_keeps_the_curve_finite() {
    let p = PathParams::new(0.0, 0.0, Position::Right, 1000.0, 0.0, Position::Right);
    for c in [1e36, -1e36, f32::MAX] {
        let path = bezier_path(&p, Some(c));
        assert!(path.label_x.is_finite() && path.label_y.is_finite(), "{:?}", path);
        for (_, nums) in parse_path(&path.path).unwrap() {
            assert!(nums.iter().all(|v| v.is_finite() && v.abs() <= 2e7), "{}", path.path);
        }
    }
    // Curvature is capped, so the controls sit a bounded distance out.
    assert_eq!(bezier_path(&p, Some(1e36)).path, "M0,0 C100000,0 101000,0 1000,0");
}
