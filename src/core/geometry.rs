// Joint geometry on normalized 2D landmark positions

/// Angle returned when a ray is degenerate (treated as a fully extended joint)
pub const EXTENDED_ANGLE: f32 = 180.0;

const MIN_RAY_LENGTH: f32 = 1e-6;

/// Angle at `vertex` between the rays to `p1` and `p2`, in degrees [0, 180].
///
/// Uses cos(θ) = (v1 · v2) / (|v1| × |v2|). Returns 180° when either ray
/// has zero length.
pub fn angle_at(p1: (f32, f32), vertex: (f32, f32), p2: (f32, f32)) -> f32 {
    let v1 = (p1.0 - vertex.0, p1.1 - vertex.1);
    let v2 = (p2.0 - vertex.0, p2.1 - vertex.1);

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();

    if !(mag1 > MIN_RAY_LENGTH && mag2 > MIN_RAY_LENGTH) {
        return EXTENDED_ANGLE;
    }

    // Rounding can push the cosine just outside [-1, 1]
    let cos_angle = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Mean vertical coordinate of two points (0 = top of frame)
pub fn average_height(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.1 + b.1) / 2.0
}
