use crate::math::{Point2d, Polygon};
use crate::{JunctionId, RoadId};
use smallvec::SmallVec;

/// A network node where two or more roads meet.
#[derive(Clone, Debug)]
pub struct Junction {
    /// The internal key.
    key: JunctionId,
    /// The external identifier.
    id: String,
    /// The centre of the junction.
    position: Point2d,
    /// The junction radius in m.
    size: f64,
    /// The physical footprint.
    polygon: Polygon,
    /// The roads declared as connected to this junction.
    connected: SmallVec<[RoadId; 4]>,
    /// The roads ending at this junction, i.e. whose traffic approaches it.
    roads_in: SmallVec<[RoadId; 4]>,
}

/// The attributes of a junction, as supplied at setup.
#[derive(Clone, Debug, PartialEq)]
pub struct JunctionAttributes {
    /// The external identifier.
    pub id: String,
    /// The centre of the junction.
    pub position: Point2d,
    /// The junction radius in m.
    pub junction_size: f64,
    /// The footprint; defaults to a square of side `junction_size`.
    pub polygon: Option<Vec<Point2d>>,
    /// The declared number of connected roads.
    pub connected_roads_count: usize,
    /// The identifiers of the connected roads.
    pub connected_roads_ids: Vec<String>,
}

impl Junction {
    /// Creates a new junction. Connectivity is filled in by the network builder.
    pub(crate) fn new(key: JunctionId, id: String, position: Point2d, size: f64, polygon: Polygon) -> Self {
        Self {
            key,
            id,
            position,
            size,
            polygon,
            connected: SmallVec::new(),
            roads_in: SmallVec::new(),
        }
    }

    /// Gets the junction's internal key.
    pub fn key(&self) -> JunctionId {
        self.key
    }

    /// Gets the junction's external identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The centre of the junction.
    pub fn position(&self) -> Point2d {
        self.position
    }

    /// The junction radius in m.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// The physical footprint of the junction.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Checks whether a point lies within the junction's footprint.
    pub fn contains(&self, point: Point2d) -> bool {
        self.polygon.contains(point)
    }

    /// The roads declared as connected to this junction.
    pub fn connected_roads(&self) -> &[RoadId] {
        &self.connected
    }

    /// The roads whose traffic approaches this junction.
    pub fn incoming_roads(&self) -> &[RoadId] {
        &self.roads_in
    }

    pub(crate) fn add_connected_road(&mut self, road: RoadId) {
        self.connected.push(road);
    }

    pub(crate) fn add_incoming_road(&mut self, road: RoadId) {
        self.roads_in.push(road);
    }
}
