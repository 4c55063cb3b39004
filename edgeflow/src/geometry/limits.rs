// Numeric bounds applied to every coordinate entering the path kernels

pub const COORD_MIN: f32 = -10_000_000.0;
pub const COORD_MAX: f32 =  10_000_000.0;
pub const RADIUS_MAX: f32 = 10_000.0;
pub const CURVATURE_MAX: f32 = 100.0;

/// Clamp into the coordinate range; NaN maps to 0.
#[inline]
pub fn clamp_coord(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(COORD_MIN, COORD_MAX) }
}

#[inline]
pub fn clamp_radius(r: f32) -> f32 {
    if r.is_nan() { 0.0 } else { r.clamp(0.0, RADIUS_MAX) }
}

/// Bound the bezier curvature magnitude; non-finite values map to `fallback`.
#[inline]
pub fn clamp_curvature(c: f32, fallback: f32) -> f32 {
    if c.is_finite() { c.clamp(-CURVATURE_MAX, CURVATURE_MAX) } else { fallback }
}
