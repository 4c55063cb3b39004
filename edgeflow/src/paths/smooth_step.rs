//! Orthogonal (Manhattan) routing for the step and smooth-step styles.
//!
//! A route always starts with a short "gap" segment leaving the source
//! perpendicular to its side and ends with one entering the target the same
//! way. Between the gap points the route bends once or twice depending on
//! how the two facings relate:
//!
//! * opposite facings on one axis split at the center line,
//! * equal facings wrap around the farther gap point,
//! * facings on different axes meet in a single corner.
//!
//! Routing is done in a frame where the source faces along x; vertical
//! sources are transposed in and out.

use super::self_loop::self_loop_path;
use super::{edge_center, EdgePath, PathParams};
use crate::geometry::limits::{clamp_coord, clamp_radius};
use crate::geometry::path_length::polyline_midpoint;
use crate::geometry::tolerance::{approx_eq, norm2, EPS_POS};
use crate::model::{PathOptions, Position, Vec2};
use crate::svg::PathData;

pub const DEFAULT_BORDER_RADIUS: f32 = 5.0;
pub const DEFAULT_STEP_OFFSET: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOptions {
    /// Corner rounding; 0 draws sharp corners.
    pub border_radius: f32,
    /// Length of the gap segments at both ends.
    pub offset: f32,
    /// Override for the split line of opposite-facing routes.
    pub center_x: Option<f32>,
    pub center_y: Option<f32>,
}

impl Default for StepOptions {
    fn default() -> Self {
        StepOptions {
            border_radius: DEFAULT_BORDER_RADIUS,
            offset: DEFAULT_STEP_OFFSET,
            center_x: None,
            center_y: None,
        }
    }
}

impl From<&PathOptions> for StepOptions {
    fn from(o: &PathOptions) -> Self {
        let d = StepOptions::default();
        StepOptions {
            border_radius: o.border_radius.unwrap_or(d.border_radius),
            offset: o.offset.unwrap_or(d.offset),
            center_x: o.center_x,
            center_y: o.center_y,
        }
    }
}

#[inline]
fn transpose(v: Vec2) -> Vec2 {
    Vec2::new(v.y, v.x)
}

#[inline]
fn same_point(a: Vec2, b: Vec2) -> bool {
    approx_eq(a.x, b.x, EPS_POS) && approx_eq(a.y, b.y, EPS_POS)
}

// b lies on the straight run from a to c, without doubling back
fn passes_through(a: Vec2, b: Vec2, c: Vec2) -> bool {
    let between = |a: f32, b: f32, c: f32| (b - a) * (c - b) >= 0.0;
    let same_x = approx_eq(a.x, b.x, EPS_POS) && approx_eq(b.x, c.x, EPS_POS);
    let same_y = approx_eq(a.y, b.y, EPS_POS) && approx_eq(b.y, c.y, EPS_POS);
    (same_x && between(a.y, b.y, c.y)) || (same_y && between(a.x, b.x, c.x))
}

fn simplify(points: impl IntoIterator<Item = Vec2>) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = Vec::new();
    for p in points {
        if out.last().map_or(false, |&last| same_point(last, p)) {
            continue;
        }
        if out.len() >= 2 && passes_through(out[out.len() - 2], out[out.len() - 1], p) {
            out.pop();
        }
        out.push(p);
    }
    out
}

/// Corner points of the orthogonal route from source to target, both
/// anchors included.
pub fn step_route(params: &PathParams, options: &StepOptions) -> Vec<Vec2> {
    let p = params.sanitized();
    let offset = clamp_radius(options.offset);
    let (default_cx, default_cy, _, _) = edge_center(p.source_x, p.source_y, p.target_x, p.target_y);
    let center = Vec2::new(
        options.center_x.map_or(default_cx, clamp_coord),
        options.center_y.map_or(default_cy, clamp_coord),
    );

    let swap = !p.source_position.is_horizontal();
    let tr = |v: Vec2| if swap { transpose(v) } else { v };
    let tp = |pos: Position| if swap { pos.transposed() } else { pos };

    let (s, t, c) = (tr(p.source()), tr(p.target()), tr(center));
    let (sp, tpos) = (tp(p.source_position), tp(p.target_position));
    let (ds, dt) = (sp.direction(), tpos.direction());
    let sg = Vec2::new(s.x + ds.x * offset, s.y + ds.y * offset);
    let tg = Vec2::new(t.x + dt.x * offset, t.y + dt.y * offset);

    let mids: Vec<Vec2> = if tpos.is_horizontal() {
        if tpos == sp.opposite() {
            let ahead = (tg.x - sg.x) * ds.x >= 0.0;
            if ahead {
                let cx = c.x.clamp(sg.x.min(tg.x), sg.x.max(tg.x));
                vec![Vec2::new(cx, s.y), Vec2::new(cx, t.y)]
            } else {
                vec![Vec2::new(sg.x, c.y), Vec2::new(tg.x, c.y)]
            }
        } else {
            let m = if ds.x > 0.0 { sg.x.max(tg.x) } else { sg.x.min(tg.x) };
            vec![Vec2::new(m, s.y), Vec2::new(m, t.y)]
        }
    } else {
        let corner = Vec2::new(tg.x, sg.y);
        let keeps_heading = (corner.x - sg.x) * ds.x >= 0.0 && (tg.y - corner.y) * -dt.y >= 0.0;
        if keeps_heading {
            vec![corner]
        } else {
            vec![Vec2::new(sg.x, tg.y)]
        }
    };

    let route = [s, sg].into_iter().chain(mids).chain([tg, t]);
    simplify(route.map(tr))
}

/// Rounding applied at each interior corner of `points`: never more than
/// half of either adjacent segment.
pub(crate) fn corner_radii(points: &[Vec2], radius: f32) -> Vec<f32> {
    let radius = clamp_radius(radius);
    points
        .windows(3)
        .map(|w| radius.min(w[0].distance(w[1]) / 2.0).min(w[1].distance(w[2]) / 2.0))
        .collect()
}

pub fn smooth_step_path(params: &PathParams, options: &StepOptions) -> EdgePath {
    let p = params.sanitized();
    if p.anchors_coincide() {
        return self_loop_path(p.source_x, p.source_y, p.source_position);
    }
    let points = step_route(&p, options);
    let (first, last) = match (points.first(), points.last()) {
        (Some(&f), Some(&l)) if points.len() >= 2 => (f, l),
        _ => return super::straight_path(&p),
    };

    let mut d = PathData::new();
    d.move_to(first);
    for (w, bend) in points.windows(3).zip(corner_radii(&points, options.border_radius)) {
        let (a, b, c) = (w[0], w[1], w[2]);
        if bend <= EPS_POS {
            d.line_to(b);
            continue;
        }
        let ((ux, uy), _) = norm2(b.x - a.x, b.y - a.y);
        let ((vx, vy), _) = norm2(c.x - b.x, c.y - b.y);
        d.line_to(Vec2::new(b.x - ux * bend, b.y - uy * bend));
        d.quad_to(b, Vec2::new(b.x + vx * bend, b.y + vy * bend));
    }
    d.line_to(last);

    let label = polyline_midpoint(&points).unwrap_or(first);
    EdgePath {
        path: d.finish(),
        label_x: label.x,
        label_y: label.y,
    }
}

/// Smooth-step with sharp corners.
pub fn step_path(params: &PathParams, options: &StepOptions) -> EdgePath {
    smooth_step_path(params, &StepOptions { border_radius: 0.0, ..*options })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(sx: f32, sy: f32, sp: Position, tx: f32, ty: f32, tp: Position) -> PathParams {
        PathParams::new(sx, sy, sp, tx, ty, tp)
    }

    #[test]
    fn right_to_left_splits_at_center() {
        let p = params(0.0, 0.0, Position::Right, 200.0, 100.0, Position::Left);
        let step = step_path(&p, &StepOptions::default());
        assert_eq!(step.path, "M0,0 L100,0 L100,100 L200,100");
        assert_eq!((step.label_x, step.label_y), (100.0, 50.0));

        let smooth = smooth_step_path(&p, &StepOptions::default());
        assert_eq!(smooth.path, "M0,0 L95,0 Q100,0 100,5 L100,95 Q100,100 105,100 L200,100");
    }

    #[test]
    fn aligned_vertical_pair_is_a_straight_drop() {
        let p = params(0.0, 0.0, Position::Bottom, 0.0, 100.0, Position::Top);
        let step = step_path(&p, &StepOptions::default());
        assert_eq!(step.path, "M0,0 L0,100");
        assert_eq!((step.label_x, step.label_y), (0.0, 50.0));
    }

    #[test]
    fn same_facing_wraps_around_the_farther_gap() {
        let p = params(0.0, 0.0, Position::Right, 100.0, 50.0, Position::Right);
        let route = step_route(&p, &StepOptions::default());
        assert_eq!(
            route,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(120.0, 0.0),
                Vec2::new(120.0, 50.0),
                Vec2::new(100.0, 50.0),
            ]
        );
    }

    #[test]
    fn target_behind_source_routes_around() {
        let p = params(0.0, 0.0, Position::Bottom, 50.0, -100.0, Position::Top);
        let route = step_route(&p, &StepOptions::default());
        assert_eq!(route.first(), Some(&Vec2::new(0.0, 0.0)));
        assert_eq!(route[1], Vec2::new(0.0, 20.0));
        let n = route.len();
        // last leg moves down into the top side
        assert_eq!(route[n - 2], Vec2::new(50.0, -120.0));
        assert_eq!(route[n - 1], Vec2::new(50.0, -100.0));
    }

    #[test]
    fn mixed_axes_use_one_corner() {
        let p = params(0.0, 0.0, Position::Right, 100.0, 100.0, Position::Top);
        let route = step_route(&p, &StepOptions::default());
        assert_eq!(
            route,
            vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), Vec2::new(100.0, 100.0)]
        );
    }

    #[test]
    fn corner_radius_is_clamped_on_short_hops() {
        let p = params(0.0, 0.0, Position::Right, 10.0, 4.0, Position::Left);
        let route = step_route(&p, &StepOptions { border_radius: 50.0, ..Default::default() });
        let radii = corner_radii(&route, 50.0);
        assert!(!radii.is_empty());
        for (w, r) in route.windows(3).zip(radii) {
            assert!(r <= w[0].distance(w[1]) / 2.0 + 1e-5);
            assert!(r <= w[1].distance(w[2]) / 2.0 + 1e-5);
        }
    }

    #[test]
    fn center_override_moves_the_split() {
        let p = params(0.0, 0.0, Position::Right, 200.0, 100.0, Position::Left);
        let o = StepOptions { center_x: Some(60.0), border_radius: 0.0, ..Default::default() };
        assert_eq!(step_path(&p, &o).path, "M0,0 L60,0 L60,100 L200,100");
    }
}
