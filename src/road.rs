use crate::math::{Point2d, Polyline, PolylineProjection};
use crate::{JunctionId, RoadId};

/// A directed road between two junctions. Traffic flows from start to end.
#[derive(Clone, Debug)]
pub struct Road {
    /// The internal key.
    key: RoadId,
    /// The external identifier.
    id: String,
    /// The centre line of the road.
    polyline: Polyline,
    /// Recommended speed in m/s.
    recommended_speed: f64,
    /// The junction traffic leaves from.
    start: JunctionId,
    /// The junction traffic approaches.
    end: JunctionId,
    /// The arc length position where the road enters the footprint of its end junction.
    entry: f64,
}

/// The attributes of a road, as supplied at setup.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadAttributes {
    /// The external identifier.
    pub id: String,
    /// The centre line, in the direction of travel.
    pub polyline: Vec<Point2d>,
    /// Recommended speed in m/s.
    pub recommended_speed: f64,
    /// The identifier of the junction at the start of the road.
    pub junction_start_id: String,
    /// The identifier of the junction at the end of the road.
    pub junction_end_id: String,
}

impl Road {
    pub(crate) fn new(
        key: RoadId,
        id: String,
        polyline: Polyline,
        recommended_speed: f64,
        start: JunctionId,
        end: JunctionId,
        entry: f64,
    ) -> Self {
        Self {
            key,
            id,
            polyline,
            recommended_speed,
            start,
            end,
            entry,
        }
    }

    /// Gets the road's internal key.
    pub fn key(&self) -> RoadId {
        self.key
    }

    /// Gets the road's external identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Gets the length of the road in m.
    pub fn length(&self) -> f64 {
        self.polyline.length()
    }

    /// Gets the polyline representing the road's centre line.
    pub fn polyline(&self) -> &Polyline {
        &self.polyline
    }

    /// The recommended speed in m/s.
    pub fn recommended_speed(&self) -> f64 {
        self.recommended_speed
    }

    /// The junction at the start of the road.
    pub fn start(&self) -> JunctionId {
        self.start
    }

    /// The junction at the end of the road, which its traffic approaches.
    pub fn end(&self) -> JunctionId {
        self.end
    }

    /// The arc length position at which the road enters its end junction's footprint.
    pub fn entry(&self) -> f64 {
        self.entry
    }

    /// Projects a point onto the road.
    pub fn project(&self, point: Point2d) -> PolylineProjection {
        self.polyline.project(point)
    }

    /// The remaining distance from an arc length position to the end junction, in m.
    pub fn distance_to_end(&self, pos: f64) -> f64 {
        f64::max(self.length() - pos, 0.0)
    }

    /// The remaining distance from an arc length position to the boundary of the end junction, in m.
    pub fn distance_to_entry(&self, pos: f64) -> f64 {
        f64::max(self.entry - pos, 0.0)
    }
}
