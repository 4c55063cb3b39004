//! Cubic Bézier helpers shared by the curved edge styles.

use crate::model::Vec2;

/// Control points of a cubic Bézier curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBezier {
    pub p0: Vec2, // Start point
    pub p1: Vec2, // First control point
    pub p2: Vec2, // Second control point
    pub p3: Vec2, // End point
}

impl CubicBezier {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate the curve at parameter t ∈ [0, 1].
    pub fn eval(&self, t: f32) -> Vec2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        Vec2 {
            x: mt3 * self.p0.x + 3.0 * mt2 * t * self.p1.x + 3.0 * mt * t2 * self.p2.x + t3 * self.p3.x,
            y: mt3 * self.p0.y + 3.0 * mt2 * t * self.p1.y + 3.0 * mt * t2 * self.p2.y + t3 * self.p3.y,
        }
    }

    /// Point at t = 0.5. Written out so the weights stay exact (1/8, 3/8).
    pub fn midpoint(&self) -> Vec2 {
        Vec2 {
            x: self.p0.x * 0.125 + self.p1.x * 0.375 + self.p2.x * 0.375 + self.p3.x * 0.125,
            y: self.p0.y * 0.125 + self.p1.y * 0.375 + self.p2.y * 0.375 + self.p3.y * 0.125,
        }
    }

    /// SVG path data for the curve.
    pub fn to_path(&self) -> String {
        let mut d = crate::svg::PathData::new();
        d.move_to(self.p0);
        d.cubic_to(self.p1, self.p2, self.p3);
        d.finish()
    }
}
