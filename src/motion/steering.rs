use crate::math::{lerp_heading, normalize_angle, Polyline, PolylineProjection};

/// The largest wheel rotation that will be commanded, in radians (35°).
pub const MAX_STEERING_ANGLE: f64 = 0.61;

/// The distance before the end of a segment over which the reference heading
/// blends into the next segment's heading, in m.
const BLEND_DISTANCE: f64 = 5.0;

/// The heading a car at the projected position should follow, in radians.
/// Looks no further ahead than the next segment.
pub fn reference_heading(polyline: &Polyline, projection: &PolylineProjection) -> f64 {
    let segment = projection.segment;
    let here = polyline.heading(segment);
    if segment + 1 >= polyline.segment_count() {
        return here;
    }

    let remaining = polyline.segment_end(segment) - projection.pos;
    if remaining >= BLEND_DISTANCE {
        return here;
    }

    let next = polyline.heading(segment + 1);
    lerp_heading(here, next, 1.0 - f64::max(remaining, 0.0) / BLEND_DISTANCE)
}

/// The wheel rotation that turns a car with the given heading towards the reference heading.
pub fn wheel_rotation(heading: f64, reference: f64) -> f64 {
    normalize_angle(reference - heading).clamp(-MAX_STEERING_ANGLE, MAX_STEERING_ANGLE)
}
