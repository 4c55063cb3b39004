//! Polyline length and point sampling by arc length.
//!
//! Step routes are polylines before their corners get rounded; their label
//! sits halfway along the route measured by length.

use crate::model::Vec2;

/// Sum of segment lengths.
pub fn polyline_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Point at `distance` along the polyline. Clamps to the first/last point.
pub fn point_at_length(points: &[Vec2], distance: f32) -> Option<Vec2> {
    let first = *points.first()?;
    if distance <= 0.0 {
        return Some(first);
    }
    let mut accum = 0.0;
    for w in points.windows(2) {
        let (start, end) = (w[0], w[1]);
        let seg_len = start.distance(end);
        if seg_len > 0.0 && accum + seg_len >= distance {
            let t = (distance - accum) / seg_len;
            return Some(Vec2 {
                x: start.x + (end.x - start.x) * t,
                y: start.y + (end.y - start.y) * t,
            });
        }
        accum += seg_len;
    }
    points.last().copied()
}

/// Halfway point by length.
pub fn polyline_midpoint(points: &[Vec2]) -> Option<Vec2> {
    point_at_length(points, polyline_length(points) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polyline_length() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        assert!((polyline_length(&pts) - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_midpoint_by_length_not_by_coordinates() {
        // L-shaped: 30 across, 10 down. Halfway (20) lies on the first leg.
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(30.0, 0.0), Vec2::new(30.0, 10.0)];
        let m = polyline_midpoint(&pts).unwrap();
        assert!((m.x - 20.0).abs() < 0.001);
        assert!(m.y.abs() < 0.001);
    }

    #[test]
    fn test_zero_length_segments_are_skipped() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0)];
        let m = polyline_midpoint(&pts).unwrap();
        assert!((m.y - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_out_of_range_distance_clamps() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)];
        assert_eq!(point_at_length(&pts, 50.0), Some(Vec2::new(10.0, 0.0)));
        assert_eq!(point_at_length(&pts, -1.0), Some(Vec2::new(0.0, 0.0)));
        assert_eq!(point_at_length(&[], 1.0), None);
    }
}
