use super::{orientation, segment_crossing, segments_intersect, Point2d, Polyline};
use cgmath::prelude::*;

/// A simple closed polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point2d>,
}

impl Polygon {
    /// Creates a polygon from its vertices, in either winding order.
    /// A closing vertex equal to the first one is dropped.
    ///
    /// Returns `None` unless the vertices describe a simple polygon: at least three
    /// distinct finite vertices, no zero-length edges and no self intersections.
    pub fn new(mut vertices: Vec<Point2d>) -> Option<Self> {
        if vertices.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return None;
        }
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return None;
        }
        let polygon = Self { vertices };
        polygon.is_simple().then_some(polygon)
    }

    /// Creates the axis-aligned square with the given centre and side length.
    pub fn square(centre: Point2d, side: f64) -> Self {
        let h = 0.5 * side;
        Self {
            vertices: vec![
                Point2d::new(centre.x - h, centre.y - h),
                Point2d::new(centre.x + h, centre.y - h),
                Point2d::new(centre.x + h, centre.y + h),
                Point2d::new(centre.x - h, centre.y + h),
            ],
        }
    }

    /// The vertices of the polygon.
    pub fn vertices(&self) -> &[Point2d] {
        &self.vertices
    }

    /// Checks whether the point lies inside or on the boundary of the polygon.
    pub fn contains(&self, point: Point2d) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if segments_intersect(a, b, point, point) {
                return true;
            }
            if (a.y > point.y) != (b.y > point.y) {
                let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// The arc length position at which a polyline last crosses into the polygon.
    ///
    /// This is the polyline's length if it ends outside the polygon, and zero if
    /// it never crosses the boundary while ending inside.
    pub fn entry_position(&self, polyline: &Polyline) -> f64 {
        let points = polyline.points();
        match points.last() {
            Some(&end) if self.contains(end) => {}
            _ => return polyline.length(),
        }

        let arc = polyline.arc_lengths();
        let mut entry = 0.0;
        for (segment, pair) in points.windows(2).enumerate() {
            let len = arc[segment + 1] - arc[segment];
            for (c, d) in self.edges() {
                if let Some(t) = segment_crossing(pair[0], pair[1], c, d) {
                    entry = f64::max(entry, arc[segment] + t * len);
                }
            }
        }
        entry
    }

    /// Iterates over the edges of the polygon, including the closing edge.
    fn edges(&self) -> impl Iterator<Item = (Point2d, Point2d)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Checks that no two edges meet except adjacent edges at their shared vertex.
    fn is_simple(&self) -> bool {
        let n = self.vertices.len();
        let edges = self.edges().collect::<Vec<_>>();

        for (i, &(a, b)) in edges.iter().enumerate() {
            if a == b {
                return false;
            }
            for (j, &(c, d)) in edges.iter().enumerate().skip(i + 1) {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                if adjacent {
                    // Adjacent edges may only fold back onto each other when collinear
                    let (shared, p, q) = if j == i + 1 { (b, a, d) } else { (a, b, c) };
                    if orientation(p, shared, q) == 0.0 && (p - shared).dot(q - shared) > 0.0 {
                        return false;
                    }
                } else if segments_intersect(a, b, c, d) {
                    return false;
                }
            }
        }
        true
    }
}
