use crate::car::Car;
use crate::config::SlowdownConfig;
use crate::error::{ConflictError, NotFoundError, ValidationError};
use crate::junction::{Junction, JunctionAttributes};
use crate::math::{Polygon, Polyline, PolylineProjection};
use crate::road::{Road, RoadAttributes};
use crate::{JunctionId, JunctionSet, RoadId, RoadSet};
use itertools::Itertools;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;

/// An immutable road network: the junctions and roads of one setup.
#[derive(Clone, Debug, Default)]
pub struct Network {
    /// The junctions in the network.
    junctions: JunctionSet,
    /// The roads in the network.
    roads: RoadSet,
    /// Maps external junction identifiers to keys.
    junction_index: HashMap<String, JunctionId>,
    /// Maps external road identifiers to keys.
    road_index: HashMap<String, RoadId>,
    /// The network-wide slowdown behaviour.
    slowdown: SlowdownConfig,
    /// Default target roads by car identifier.
    car_targets: HashMap<String, RoadId>,
}

/// Where a car sits on the network.
#[derive(Clone, Copy, Debug)]
pub struct Location<'a> {
    /// The road the car is travelling on.
    pub road: &'a Road,
    /// The junction at the end of that road.
    pub junction: &'a Junction,
    /// The car's position projected onto the road.
    pub projection: PolylineProjection,
}

impl Location<'_> {
    /// The arc length position of the car along its road, in m.
    pub fn pos(&self) -> f64 {
        self.projection.pos
    }

    /// The remaining distance to the junction the car approaches, in m.
    pub fn distance_to_junction(&self) -> f64 {
        self.road.distance_to_end(self.projection.pos)
    }

    /// The remaining distance to the boundary of the junction's footprint, in m.
    pub fn distance_to_entry(&self) -> f64 {
        self.road.distance_to_entry(self.projection.pos)
    }
}

impl Network {
    /// Builds a network, validating every cross-reference and geometric precondition.
    pub fn build(
        junctions: &[JunctionAttributes],
        roads: &[RoadAttributes],
    ) -> Result<Self, ValidationError> {
        let mut network = Self::default();

        for attribs in junctions {
            network.add_junction(attribs)?;
        }
        for attribs in roads {
            network.add_road(attribs)?;
        }
        for attribs in junctions {
            network.connect_roads(attribs)?;
        }

        info!(
            "Built network with {} junctions and {} roads",
            network.junctions.len(),
            network.roads.len()
        );
        Ok(network)
    }

    /// Sets the network-wide slowdown behaviour.
    pub fn set_slowdown(&mut self, slowdown: SlowdownConfig) {
        self.slowdown = slowdown;
    }

    /// Assigns default target roads to cars, replacing any previous assignment.
    /// A car's own `target_road_id` takes precedence over these at dispatch time.
    pub fn assign_targets<'a>(
        &mut self,
        targets: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<(), ValidationError> {
        let mut car_targets = HashMap::new();
        for (car, road) in targets {
            let key = self.road_index.get(road).copied().ok_or_else(|| {
                ValidationError::UnknownTargetRoad {
                    car: car.to_string(),
                    road: road.to_string(),
                }
            })?;
            car_targets.insert(car.to_string(), key);
        }
        self.car_targets = car_targets;
        Ok(())
    }

    /// The network-wide slowdown behaviour.
    pub fn slowdown(&self) -> &SlowdownConfig {
        &self.slowdown
    }

    /// Returns an iterator over all the junctions in the network.
    pub fn iter_junctions(&self) -> impl Iterator<Item = &Junction> {
        self.junctions.values()
    }

    /// Returns an iterator over all the roads in the network.
    pub fn iter_roads(&self) -> impl Iterator<Item = &Road> {
        self.roads.values()
    }

    /// Gets a reference to the junction with the given key.
    pub fn junction(&self, key: JunctionId) -> Option<&Junction> {
        self.junctions.get(key)
    }

    /// Gets a reference to the road with the given key.
    pub fn road(&self, key: RoadId) -> Option<&Road> {
        self.roads.get(key)
    }

    /// Looks up a junction by its external identifier.
    pub fn junction_by_id(&self, id: &str) -> Option<&Junction> {
        self.junction_index.get(id).map(|key| &self.junctions[*key])
    }

    /// Looks up a road by its external identifier.
    pub fn road_by_id(&self, id: &str) -> Option<&Road> {
        self.road_index.get(id).map(|key| &self.roads[*key])
    }

    /// Finds the road a car is travelling on and how far along it the car sits.
    pub fn locate(&self, car: &Car) -> Result<Location<'_>, NotFoundError> {
        let road = match car.target_road_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => self
                .road_by_id(id)
                .ok_or_else(|| NotFoundError::UnknownRoad {
                    car: car.id.clone(),
                    road: id.to_string(),
                })?,
            None => self
                .car_targets
                .get(&car.id)
                .and_then(|key| self.roads.get(*key))
                .ok_or_else(|| NotFoundError::NoTargetRoad {
                    car: car.id.clone(),
                })?,
        };

        let junction =
            self.junctions
                .get(road.end())
                .ok_or_else(|| NotFoundError::UnknownJunction {
                    car: car.id.clone(),
                    road: road.id().to_string(),
                })?;

        Ok(Location {
            road,
            junction,
            projection: road.project(car.position),
        })
    }

    fn add_junction(&mut self, attribs: &JunctionAttributes) -> Result<(), ValidationError> {
        let id = &attribs.id;
        if self.junction_index.contains_key(id) {
            return Err(ValidationError::DuplicateJunction(id.clone()));
        }
        if !attribs.position.x.is_finite() || !attribs.position.y.is_finite() {
            return Err(ValidationError::InvalidPosition(id.clone()));
        }
        if !(attribs.junction_size.is_finite() && attribs.junction_size > 0.0) {
            return Err(ValidationError::InvalidJunctionSize(id.clone()));
        }

        let polygon = match &attribs.polygon {
            Some(vertices) => Polygon::new(vertices.clone())
                .ok_or_else(|| ValidationError::InvalidPolygon(id.clone()))?,
            None => Polygon::square(attribs.position, attribs.junction_size),
        };

        let key = self.junctions.insert_with_key(|key| {
            Junction::new(
                key,
                id.clone(),
                attribs.position,
                attribs.junction_size,
                polygon,
            )
        });
        self.junction_index.insert(id.clone(), key);
        Ok(())
    }

    fn add_road(&mut self, attribs: &RoadAttributes) -> Result<(), ValidationError> {
        let id = &attribs.id;
        if self.road_index.contains_key(id) {
            return Err(ValidationError::DuplicateRoad(id.clone()));
        }

        let resolve = |junction: &String| {
            self.junction_index
                .get(junction)
                .copied()
                .ok_or_else(|| ValidationError::UnknownJunction {
                    road: id.clone(),
                    junction: junction.clone(),
                })
        };
        let start = resolve(&attribs.junction_start_id)?;
        let end = resolve(&attribs.junction_end_id)?;

        let speed = attribs.recommended_speed;
        if !(speed.is_finite() && speed >= 0.0) {
            return Err(ValidationError::InvalidRecommendedSpeed(id.clone()));
        }

        let polyline = Polyline::new(attribs.polyline.clone())
            .ok_or_else(|| ValidationError::DegeneratePolyline(id.clone()))?;

        let entry = self.junctions[end].polygon().entry_position(&polyline);
        let key = self.roads.insert_with_key(|key| {
            Road::new(key, id.clone(), polyline, speed, start, end, entry)
        });
        self.road_index.insert(id.clone(), key);
        self.junctions[end].add_incoming_road(key);
        debug!("Road `{}` approaches junction `{}`", id, attribs.junction_end_id);
        Ok(())
    }

    fn connect_roads(&mut self, attribs: &JunctionAttributes) -> Result<(), ValidationError> {
        let junction = self.junction_index[&attribs.id];
        let listed = attribs.connected_roads_ids.iter().unique().collect::<Vec<_>>();

        if listed.len() != attribs.connected_roads_count {
            return Err(ValidationError::ConnectedRoadsCount {
                junction: attribs.id.clone(),
                declared: attribs.connected_roads_count,
                listed: listed.len(),
            });
        }

        for road_id in listed {
            let road = self.road_by_id(road_id).ok_or_else(|| {
                ValidationError::UnknownConnectedRoad {
                    junction: attribs.id.clone(),
                    road: road_id.clone(),
                }
            })?;
            if road.start() != junction && road.end() != junction {
                return Err(ValidationError::RoadNotIncident {
                    junction: attribs.id.clone(),
                    road: road_id.clone(),
                });
            }
            let key = road.key();
            self.junctions[junction].add_connected_road(key);
        }
        Ok(())
    }
}

/// Swaps in a new network, unless one is active and `overwrite` was not requested.
pub fn replace(
    existing: Option<&Arc<Network>>,
    new: Network,
    overwrite: bool,
) -> Result<Arc<Network>, ConflictError> {
    if existing.is_some() && !overwrite {
        return Err(ConflictError);
    }
    Ok(Arc::new(new))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Point2d;
    use assert_approx_eq::assert_approx_eq;

    fn junction(id: &str, x: f64, y: f64, roads: &[&str]) -> JunctionAttributes {
        JunctionAttributes {
            id: id.to_string(),
            position: Point2d::new(x, y),
            junction_size: 4.0,
            polygon: None,
            connected_roads_count: roads.len(),
            connected_roads_ids: roads.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn road(id: &str, from: &str, to: &str, points: &[(f64, f64)]) -> RoadAttributes {
        RoadAttributes {
            id: id.to_string(),
            polyline: points.iter().map(|(x, y)| Point2d::new(*x, *y)).collect(),
            recommended_speed: 10.0,
            junction_start_id: from.to_string(),
            junction_end_id: to.to_string(),
        }
    }

    fn pair() -> (Vec<JunctionAttributes>, Vec<RoadAttributes>) {
        (
            vec![
                junction("a", 0.0, 0.0, &["ab"]),
                junction("b", 100.0, 0.0, &["ab"]),
            ],
            vec![road("ab", "a", "b", &[(0.0, 0.0), (100.0, 0.0)])],
        )
    }

    #[test]
    fn builds_adjacency() {
        let (junctions, roads) = pair();
        let network = Network::build(&junctions, &roads).unwrap();
        let ab = network.road_by_id("ab").unwrap();
        let b = network.junction_by_id("b").unwrap();
        assert_eq!(b.incoming_roads(), &[ab.key()]);
        assert_eq!(b.connected_roads(), &[ab.key()]);
        assert!(network.junction_by_id("a").unwrap().incoming_roads().is_empty());
        assert_eq!(ab.end(), b.key());
    }

    #[test]
    fn rejects_dangling_junction_reference() {
        let (junctions, mut roads) = pair();
        roads[0].junction_end_id = "nowhere".to_string();
        assert_eq!(
            Network::build(&junctions, &roads).unwrap_err(),
            ValidationError::UnknownJunction {
                road: "ab".to_string(),
                junction: "nowhere".to_string()
            }
        );
    }

    #[test]
    fn rejects_connected_roads_count_mismatch() {
        let (mut junctions, roads) = pair();
        junctions[0].connected_roads_count = 2;
        assert!(matches!(
            Network::build(&junctions, &roads),
            Err(ValidationError::ConnectedRoadsCount { declared: 2, listed: 1, .. })
        ));
    }

    #[test]
    fn duplicate_listing_counts_once() {
        let (mut junctions, roads) = pair();
        junctions[1].connected_roads_ids.push("ab".to_string());
        assert!(Network::build(&junctions, &roads).is_ok());
    }

    #[test]
    fn rejects_road_not_terminating_at_junction() {
        let (mut junctions, mut roads) = pair();
        junctions.push(junction("c", 0.0, 50.0, &["ab"]));
        roads.push(road("cb", "c", "b", &[(0.0, 50.0), (100.0, 0.0)]));
        assert_eq!(
            Network::build(&junctions, &roads).unwrap_err(),
            ValidationError::RoadNotIncident {
                junction: "c".to_string(),
                road: "ab".to_string()
            }
        );
    }

    #[test]
    fn rejects_degenerate_geometry() {
        let (junctions, mut roads) = pair();
        roads[0].polyline = vec![Point2d::new(3.0, 3.0), Point2d::new(3.0, 3.0)];
        assert_eq!(
            Network::build(&junctions, &roads).unwrap_err(),
            ValidationError::DegeneratePolyline("ab".to_string())
        );

        let (mut junctions, roads) = pair();
        junctions[0].polygon = Some(vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(2.0, 2.0),
            Point2d::new(2.0, 0.0),
            Point2d::new(0.0, 2.0),
        ]);
        assert_eq!(
            Network::build(&junctions, &roads).unwrap_err(),
            ValidationError::InvalidPolygon("a".to_string())
        );
    }

    #[test]
    fn rejects_duplicates() {
        let (mut junctions, roads) = pair();
        junctions.push(junction("a", 5.0, 5.0, &[]));
        assert_eq!(
            Network::build(&junctions, &roads).unwrap_err(),
            ValidationError::DuplicateJunction("a".to_string())
        );
    }

    #[test]
    fn locate_uses_assigned_target_as_fallback() {
        let (junctions, roads) = pair();
        let mut network = Network::build(&junctions, &roads).unwrap();
        network.assign_targets([("car", "ab")]).unwrap();

        let car = Car::new("car", Point2d::new(40.0, 3.0));
        let location = network.locate(&car).unwrap();
        assert_eq!(location.road.id(), "ab");
        assert_eq!(location.junction.id(), "b");
        assert_approx_eq!(location.distance_to_junction(), 60.0);
        // The default 4 m footprint of `b` starts 2 m before its centre
        assert_approx_eq!(location.distance_to_entry(), 58.0);
        assert_approx_eq!(location.road.entry(), 98.0);

        let stray = Car::new("stray", Point2d::new(40.0, 3.0));
        assert_eq!(
            network.locate(&stray).unwrap_err(),
            NotFoundError::NoTargetRoad {
                car: "stray".to_string()
            }
        );
    }

    #[test]
    fn assigning_unknown_target_fails() {
        let (junctions, roads) = pair();
        let mut network = Network::build(&junctions, &roads).unwrap();
        assert!(matches!(
            network.assign_targets([("car", "zz")]),
            Err(ValidationError::UnknownTargetRoad { .. })
        ));
    }

    #[test]
    fn replace_guards_active_network() {
        let existing = Arc::new(Network::default());
        assert_eq!(
            replace(Some(&existing), Network::default(), false).unwrap_err(),
            ConflictError
        );
        assert!(replace(Some(&existing), Network::default(), true).is_ok());
        assert!(replace(None, Network::default(), false).is_ok());
    }
}
