use super::{Point2d, Vector2d};
use std::f64::consts::{PI, TAU};

/// The heading of a vector in radians, counter-clockwise from the positive x-axis.
pub fn heading(vec: Vector2d) -> f64 {
    vec.y.atan2(vec.x)
}

/// Wraps an angle in radians into the interval (-π, π].
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Interpolates between two headings along the shorter arc.
///
/// # Parameters
/// * `from` - The heading at `t = 0`
/// * `to` - The heading at `t = 1`
/// * `t` - The interpolation parameter, expected in `[0, 1]`
pub fn lerp_heading(from: f64, to: f64, t: f64) -> f64 {
    normalize_angle(from + t * normalize_angle(to - from))
}

/// The orientation of the triangle `(a, b, c)`: positive when counter-clockwise,
/// negative when clockwise and zero when the points are collinear.
pub fn orientation(a: Point2d, b: Point2d, c: Point2d) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Checks whether two closed line segments `p1-p2` and `q1-q2` share at least one point.
pub fn segments_intersect(p1: Point2d, p2: Point2d, q1: Point2d, q2: Point2d) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// The parameter along `p1-p2` at which it crosses the segment `q1-q2`,
/// or `None` if the segments are parallel or do not meet.
pub fn segment_crossing(p1: Point2d, p2: Point2d, q1: Point2d, q2: Point2d) -> Option<f64> {
    let r = p2 - p1;
    let s = q2 - q1;
    let denom = cross(r, s);
    if denom == 0.0 {
        return None;
    }
    let qp = q1 - p1;
    let t = cross(qp, s) / denom;
    let u = cross(qp, r) / denom;
    ((0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)).then_some(t)
}

fn cross(a: Vector2d, b: Vector2d) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Whether `p`, known to be collinear with `a-b`, lies within the segment's bounding box.
fn on_segment(a: Point2d, b: Point2d, p: Point2d) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn normalize_angle_wraps_into_half_open_interval() {
        assert_approx_eq!(normalize_angle(0.0), 0.0);
        assert_approx_eq!(normalize_angle(3.0 * PI), PI);
        assert_approx_eq!(normalize_angle(-PI), PI);
        assert_approx_eq!(normalize_angle(1.5 * PI), -0.5 * PI);
    }

    #[test]
    fn lerp_heading_takes_shorter_arc() {
        let from = 0.9 * PI;
        let to = -0.9 * PI;
        assert_approx_eq!(lerp_heading(from, to, 0.5).abs(), PI);
    }

    #[test]
    fn crossing_and_touching_segments() {
        let p = |x, y| Point2d::new(x, y);
        assert!(segments_intersect(p(0.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(2.0, 0.0)));
        assert!(segments_intersect(p(0.0, 0.0), p(2.0, 0.0), p(2.0, 0.0), p(3.0, 1.0)));
        assert!(!segments_intersect(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)));
        assert!(!segments_intersect(p(0.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.4, 0.6)));
    }

    #[test]
    fn crossing_parameter() {
        let p = |x, y| Point2d::new(x, y);
        let t = segment_crossing(p(-10.0, 0.0), p(0.0, 0.0), p(-2.0, 2.0), p(-2.0, -2.0));
        assert_approx_eq!(t.unwrap(), 0.8);
        assert_eq!(segment_crossing(p(-10.0, 0.0), p(0.0, 0.0), p(1.0, 2.0), p(1.0, -2.0)), None);
        assert_eq!(segment_crossing(p(0.0, 0.0), p(4.0, 0.0), p(0.0, 1.0), p(4.0, 1.0)), None);
    }
}
