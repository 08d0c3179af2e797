use super::{heading, Point2d, Vector2d};
use cgmath::prelude::*;

/// A piecewise linear curve, parameterised by arc length.
#[derive(Clone, Debug)]
pub struct Polyline {
    /// The vertices, with consecutive duplicates removed.
    points: Vec<Point2d>,
    /// The cumulative arc length at each vertex.
    arc: Vec<f64>,
    /// The unit tangent of each segment.
    tangents: Vec<Vector2d>,
}

/// The result of projecting a point onto a [Polyline].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolylineProjection {
    /// The arc length position of the nearest point.
    pub pos: f64,
    /// The index of the segment containing the nearest point.
    pub segment: usize,
}

impl Polyline {
    /// Creates a polyline from its vertices.
    ///
    /// Returns `None` if any coordinate is not finite, or if fewer than two
    /// distinct vertices remain, in which case the polyline would have no length.
    pub fn new(mut points: Vec<Point2d>) -> Option<Self> {
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return None;
        }
        points.dedup();
        if points.len() < 2 {
            return None;
        }

        let mut arc = Vec::with_capacity(points.len());
        let mut tangents = Vec::with_capacity(points.len() - 1);
        let mut total = 0.0;
        arc.push(total);
        for pair in points.windows(2) {
            let delta = pair[1] - pair[0];
            let len = delta.magnitude();
            total += len;
            arc.push(total);
            tangents.push(delta / len);
        }

        Some(Self {
            points,
            arc,
            tangents,
        })
    }

    /// The total length of the polyline in m.
    pub fn length(&self) -> f64 {
        self.arc[self.arc.len() - 1]
    }

    /// The vertices of the polyline.
    pub fn points(&self) -> &[Point2d] {
        &self.points
    }

    /// The number of segments.
    pub fn segment_count(&self) -> usize {
        self.tangents.len()
    }

    /// The cumulative arc length at each vertex.
    pub fn arc_lengths(&self) -> &[f64] {
        &self.arc
    }

    /// The arc length position of the end of the given segment.
    pub fn segment_end(&self, segment: usize) -> f64 {
        self.arc[segment + 1]
    }

    /// The heading of the given segment in radians.
    pub fn heading(&self, segment: usize) -> f64 {
        heading(self.tangents[segment])
    }

    /// Projects a point onto the polyline, locating the nearest point on it.
    ///
    /// A point lying exactly on a vertex projects to that vertex's cumulative arc length.
    pub fn project(&self, point: Point2d) -> PolylineProjection {
        let mut best: Option<(f64, PolylineProjection)> = None;

        for (segment, pair) in self.points.windows(2).enumerate() {
            let (a, b) = (pair[0], pair[1]);
            let delta = b - a;
            let t = ((point - a).dot(delta) / delta.magnitude2()).clamp(0.0, 1.0);
            let nearest = a + delta * t;
            let dist2 = (point - nearest).magnitude2();

            if best.as_ref().map_or(true, |(d, _)| dist2 < *d) {
                let pos = if t == 1.0 {
                    self.arc[segment + 1]
                } else {
                    self.arc[segment] + t * delta.magnitude()
                };
                best = Some((dist2, PolylineProjection { pos, segment }));
            }
        }

        // `new` guarantees at least one segment
        best.map_or(PolylineProjection { pos: 0.0, segment: 0 }, |(_, projection)| projection)
    }
}
