use edgeflow::{
    Edge, EdgeRenderer, FlowConfig, FlowStore, HandleBounds, NodeHandleBounds, NodeInternals, Position, Viewport,
};
use std::time::Instant;

const EDGE_TYPES: [&str; 5] = ["default", "straight", "step", "smoothstep", "simplebezier"];

fn build_grid_flow(edges_target: usize, config: FlowConfig) -> FlowStore {
    let mut s = FlowStore::new(config);
    let _ = s.set_viewport(Viewport::new(1920.0, 1080.0));
    let bounds = NodeHandleBounds {
        source: vec![HandleBounds::new(None, Position::Right, 36.0, 8.0, 8.0, 8.0)],
        target: vec![HandleBounds::new(None, Position::Left, -4.0, 8.0, 8.0, 8.0)],
    };
    // Grid of nodes wired left to right until ~edges_target
    let w = 120usize; let h = 120usize;
    for j in 0..h { for i in 0..w {
        let n = NodeInternals::new(format!("n{}_{}", i, j), i as f32 * 80.0, j as f32 * 40.0)
            .with_size(40.0, 24.0)
            .with_handles(bounds.clone());
        let _ = s.upsert_node(n);
    } }
    let mut ecount = 0usize;
    'outer: for j in 0..h { for i in 0..(w-1) {
        let e = Edge::new(format!("e{}", ecount), format!("n{}_{}", i, j), format!("n{}_{}", i + 1, j))
            .with_type(EDGE_TYPES[ecount % EDGE_TYPES.len()]);
        let _ = s.add_edge(e);
        ecount += 1;
        if ecount >= edges_target { break 'outer; }
    } }
    s
}

struct BenchArgs {
    edges: usize,
    frames: usize,
    cull: bool,
    assert_ms: Option<f64>,
    min_hit_rate: Option<f64>,
}

impl BenchArgs {
    fn parse(args: impl Iterator<Item = String>) -> Self {
        let mut out = BenchArgs { edges: 5000, frames: 200, cull: false, assert_ms: None, min_hit_rate: None };
        for a in args {
            let (key, val) = a.split_once('=').unwrap_or((a.as_str(), ""));
            match key {
                "--edges" => out.edges = val.parse().unwrap_or(out.edges),
                "--frames" => out.frames = val.parse().unwrap_or(out.frames),
                "--cull" => out.cull = true,
                "--assert-ms" => out.assert_ms = val.parse().ok(),
                "--min-hit-rate" => out.min_hit_rate = val.parse().ok(),
                other => eprintln!("ignoring unknown argument {}", other),
            }
        }
        out
    }
}

/// Nearest-rank value of an ascending sample.
fn nearest_rank(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        n => sorted[(((n - 1) as f64) * q).round() as usize],
    }
}

fn main() {
    let args = BenchArgs::parse(std::env::args().skip(1));
    let config = FlowConfig {
        only_render_visible_elements: args.cull,
        elevate_edges_on_select: true,
        ..FlowConfig::default()
    };
    let mut s = build_grid_flow(args.edges, config);
    let renderer = EdgeRenderer::default();
    // Warm-up fills the path memo
    let _ = renderer.render(&s);
    let warm = renderer.memo_stats();

    // Each frame drags one node so a few edges miss the memo
    let mut frame_ms: Vec<f64> = Vec::with_capacity(args.frames);
    let mut rendered = 0usize;
    for k in 0..args.frames {
        let (i, j) = (k % 100, (k / 100) % 100);
        let _ = s.move_node(&format!("n{}_{}", i, j), i as f32 * 80.0 + (k % 7) as f32, j as f32 * 40.0);
        let t0 = Instant::now();
        rendered += renderer.render(&s).edge_count();
        frame_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
    }
    frame_ms.sort_by(|a, b| a.total_cmp(b));
    let total_ms: f64 = frame_ms.iter().sum();
    let median = nearest_rank(&frame_ms, 0.5);

    // Hit rate of the timed frames only; the warm-up pass is all misses.
    let stats = renderer.memo_stats();
    let (hits, misses) = (stats.hits - warm.hits, stats.misses - warm.misses);
    let hit_rate = if hits + misses == 0 { 1.0 } else { hits as f64 / (hits + misses) as f64 };

    println!(
        "edges={} frames={} cull={} rendered={} memo_hits={} memo_misses={} hit_rate={:.4} total_ms={:.3} median_ms={:.4} p90_ms={:.4} p99_ms={:.4}",
        args.edges, args.frames, args.cull, rendered, hits, misses, hit_rate, total_ms, median,
        nearest_rank(&frame_ms, 0.9), nearest_rank(&frame_ms, 0.99)
    );

    let mut failed = false;
    if let Some(limit) = args.assert_ms.filter(|&l| median > l) {
        eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", median, limit);
        failed = true;
    }
    if let Some(floor) = args.min_hit_rate.filter(|&f| hit_rate < f) {
        eprintln!("FAIL: memo hit rate {:.4} < {:.4}", hit_rate, floor);
        failed = true;
    }
    if failed {
        std::process::exit(1);
    }
}
