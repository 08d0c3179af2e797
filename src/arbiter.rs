//! First-come-first-served right-of-way at junctions.
//!
//! Every dispatch cycle builds a fresh [JunctionArbiter]. Cars are registered with the
//! junction at the end of their road, then [JunctionArbiter::arbitrate] hands each
//! junction's token to one incoming road. Every queued car on that road may proceed;
//! the cars on all other roads must stop a safety margin short of the junction's footprint.
//!
//! A road whose head car is already crossing keeps the token. A car only counts as
//! crossing once it is inside the footprint and past the stop line a denied car is given,
//! so a car waiting at its stop line can never take the token from a road being served.

use crate::config::SlowdownConfig;
use crate::junction::Junction;
use crate::math::Point2d;
use crate::network::Location;
use crate::road::Road;
use crate::{JunctionId, RoadId};
use itertools::Itertools;
use log::{debug, trace};
use slotmap::SecondaryMap;
use std::cmp::Ordering;

/// The gap kept between a denied car's stopping point and the junction, in m.
pub const SAFETY_MARGIN: f64 = 1.0;

/// Cars closer than this to the end of their road have crossed into the junction, in m.
const CROSSED_EPSILON: f64 = 1e-6;

/// The arbitration state of a junction within one dispatch cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JunctionState {
    /// No car is approaching within the junction's influence radius.
    Idle,
    /// Cars are registered on incoming roads but no token has been handed out.
    Queued,
    /// The incoming road holding the right-of-way token.
    Granted(RoadId),
}

/// The arbitration outcome for one car.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    /// Whether the car may cross the junction this cycle.
    pub clear_to_proceed: bool,
    /// Where a denied car must come to a stop, as a distance from its current position in m.
    pub stop_distance: Option<f64>,
}

impl Decision {
    /// The decision for a car that may proceed.
    pub const CLEAR: Self = Self {
        clear_to_proceed: true,
        stop_distance: None,
    };

    /// The decision for a car `distance` metres short of the junction's footprint that must stop.
    pub fn stop(distance: f64) -> Self {
        Self {
            clear_to_proceed: false,
            stop_distance: Some(f64::max(distance - SAFETY_MARGIN, 0.0)),
        }
    }
}

/// A car registered in a junction's approach queue.
#[derive(Clone, Copy, Debug)]
struct Approach<'a> {
    /// Index of the car within the dispatch batch.
    car: usize,
    car_id: &'a str,
    road: &'a Road,
    /// Remaining distance to the end of the road in m.
    distance: f64,
    /// Remaining distance to the junction's footprint in m.
    to_entry: f64,
    /// Whether the car is already crossing the junction.
    committed: bool,
}

#[derive(Debug)]
struct JunctionQueue<'a> {
    junction: &'a Junction,
    approaches: Vec<Approach<'a>>,
}

/// Per-cycle right-of-way arbitration for every junction of a network.
pub struct JunctionArbiter<'a> {
    slowdown_zone: f64,
    queues: SecondaryMap<JunctionId, JunctionQueue<'a>>,
}

/// The decisions of one arbitration cycle.
#[derive(Debug)]
pub struct Arbitration {
    decisions: Vec<Decision>,
    states: SecondaryMap<JunctionId, JunctionState>,
}

impl<'a> JunctionArbiter<'a> {
    /// Creates an arbiter with empty approach queues.
    pub fn new(slowdown: &SlowdownConfig) -> Self {
        Self {
            slowdown_zone: slowdown.zone,
            queues: SecondaryMap::new(),
        }
    }

    /// Registers a car with the junction it approaches, if it is within that junction's
    /// influence radius and has not yet crossed. Returns whether the car was queued.
    ///
    /// # Parameters
    /// * `car` - The index of the car within the dispatch batch
    /// * `car_id` - The car's identifier, used to break ties
    /// * `position` - The car's world space position
    /// * `location` - Where the car sits on the network
    pub fn register(
        &mut self,
        car: usize,
        car_id: &'a str,
        position: Point2d,
        location: &Location<'a>,
    ) -> bool {
        let junction = location.junction;
        let distance = location.distance_to_junction();
        let influence = junction.size() + self.slowdown_zone;

        if distance <= CROSSED_EPSILON || distance > influence {
            trace!(
                "Car `{}` is {:.2} m from junction `{}`, outside its influence",
                car_id,
                distance,
                junction.id()
            );
            return false;
        }

        let road = location.road;
        let stop_line = road.entry() - SAFETY_MARGIN;
        let approach = Approach {
            car,
            car_id,
            road,
            distance,
            to_entry: location.distance_to_entry(),
            committed: location.pos() > stop_line && junction.contains(position),
        };
        if let Some(entry) = self.queues.entry(junction.key()) {
            entry
                .or_insert_with(|| JunctionQueue {
                    junction,
                    approaches: vec![],
                })
                .approaches
                .push(approach);
        }
        true
    }

    /// The state of a junction before arbitration.
    pub fn state(&self, junction: JunctionId) -> JunctionState {
        match self.queues.get(junction) {
            Some(queue) if !queue.approaches.is_empty() => JunctionState::Queued,
            _ => JunctionState::Idle,
        }
    }

    /// Hands out the right-of-way token at every junction with queued cars.
    ///
    /// # Parameters
    /// * `car_count` - The number of cars in the dispatch batch
    pub fn arbitrate(self, car_count: usize) -> Arbitration {
        let mut decisions = vec![Decision::CLEAR; car_count];
        let mut states = SecondaryMap::new();

        for (key, queue) in self.queues {
            let junction = queue.junction;
            let lanes = queue
                .approaches
                .into_iter()
                .into_group_map_by(|approach| approach.road.key())
                .into_iter()
                .map(|(road, mut cars)| {
                    cars.sort_by(arrival_order);
                    (road, cars)
                })
                .collect::<Vec<_>>();

            let granted = lanes
                .iter()
                .min_by(|(road_a, a), (road_b, b)| {
                    token_priority(&a[0], &b[0]).then_with(|| road_a.cmp(road_b))
                })
                .map(|(road, _)| *road);

            let Some(granted) = granted else {
                states.insert(key, JunctionState::Idle);
                continue;
            };

            for (road, cars) in &lanes {
                let clear = *road == granted;
                if clear {
                    debug!(
                        "Junction `{}` grants road `{}` ({} queued, head `{}` at {:.2} m)",
                        junction.id(),
                        cars[0].road.id(),
                        cars.len(),
                        cars[0].car_id,
                        cars[0].distance,
                    );
                }
                for approach in cars {
                    decisions[approach.car] = if clear {
                        Decision::CLEAR
                    } else {
                        Decision::stop(approach.to_entry)
                    };
                    trace!(
                        "Car `{}` at junction `{}`: {:?}",
                        approach.car_id,
                        junction.id(),
                        decisions[approach.car]
                    );
                }
            }
            states.insert(key, JunctionState::Granted(granted));
        }

        Arbitration { decisions, states }
    }
}

impl Arbitration {
    /// The decision for the car at the given batch index.
    /// Cars that were never queued may proceed.
    pub fn decision(&self, car: usize) -> Decision {
        self.decisions.get(car).copied().unwrap_or(Decision::CLEAR)
    }

    /// The state of a junction after arbitration.
    pub fn state(&self, junction: JunctionId) -> JunctionState {
        self.states
            .get(junction)
            .copied()
            .unwrap_or(JunctionState::Idle)
    }
}

/// Orders cars on the same road: closer cars arrive first, ties broken by identifier.
fn arrival_order(a: &Approach, b: &Approach) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.car_id.cmp(b.car_id))
}

/// Orders the head cars of competing roads. A head car already crossing keeps its
/// road's token; otherwise the car closest to the footprint wins.
fn token_priority(a: &Approach, b: &Approach) -> Ordering {
    b.committed
        .cmp(&a.committed)
        .then_with(|| a.to_entry.total_cmp(&b.to_entry))
        .then_with(|| arrival_order(a, b))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::car::Car;
    use crate::junction::JunctionAttributes;
    use crate::network::Network;
    use crate::road::RoadAttributes;
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

    fn road(id: &str, from: &str, start: (f64, f64)) -> RoadAttributes {
        RoadAttributes {
            id: id.to_string(),
            polyline: vec![Point2d::new(start.0, start.1), Point2d::new(0.0, 0.0)],
            recommended_speed: 10.0,
            junction_start_id: from.to_string(),
            junction_end_id: "centre".to_string(),
        }
    }

    /// Two roads, from the west and from the south, meeting at a junction at the origin.
    fn crossroads(polygon: Option<Vec<Point2d>>) -> Network {
        let mut centre = junction("centre", 0.0, 0.0, &["west", "south"]);
        centre.polygon = polygon;
        Network::build(
            &[
                centre,
                junction("w", -100.0, 0.0, &["west"]),
                junction("s", 0.0, -100.0, &["south"]),
            ],
            &[road("west", "w", (-100.0, 0.0)), road("south", "s", (0.0, -100.0))],
        )
        .unwrap()
    }

    fn arbitrate(network: &Network, cars: &[Car]) -> Arbitration {
        let mut arbiter = JunctionArbiter::new(network.slowdown());
        for (idx, car) in cars.iter().enumerate() {
            let location = network.locate(car).unwrap();
            arbiter.register(idx, &car.id, car.position, &location);
        }
        arbiter.arbitrate(cars.len())
    }

    #[test]
    fn closest_head_car_wins_the_token() {
        let network = crossroads(None);
        let cars = [
            Car::new("a", Point2d::new(-5.0, 0.0)).on_road("west"),
            Car::new("b", Point2d::new(0.0, -10.0)).on_road("south"),
        ];
        let result = arbitrate(&network, &cars);

        assert_eq!(result.decision(0), Decision::CLEAR);
        // The footprint starts 2 m before the road end, the stop point 1 m before that
        let denied = result.decision(1);
        assert!(!denied.clear_to_proceed);
        assert_approx_eq!(denied.stop_distance.unwrap(), 7.0);

        let centre = network.junction_by_id("centre").unwrap().key();
        let west = network.road_by_id("west").unwrap().key();
        assert_eq!(result.state(centre), JunctionState::Granted(west));
    }

    #[test]
    fn granted_road_drains_its_whole_queue() {
        let network = crossroads(None);
        let cars = [
            Car::new("a", Point2d::new(-5.0, 0.0)).on_road("west"),
            Car::new("c", Point2d::new(-15.0, 0.0)).on_road("west"),
            Car::new("b", Point2d::new(0.0, -8.0)).on_road("south"),
        ];
        let result = arbitrate(&network, &cars);

        assert!(result.decision(0).clear_to_proceed);
        assert!(result.decision(1).clear_to_proceed);
        assert!(!result.decision(2).clear_to_proceed);
    }

    /// A wide, flat junction footprint: the west approach enters it 3 m before the road end,
    /// the south approach 0.5 m before.
    fn flat_footprint() -> Vec<Point2d> {
        vec![
            Point2d::new(-3.0, -0.5),
            Point2d::new(3.0, -0.5),
            Point2d::new(3.0, 0.5),
            Point2d::new(-3.0, 0.5),
        ]
    }

    #[test]
    fn committed_car_keeps_the_token() {
        let network = crossroads(Some(flat_footprint()));
        let cars = [
            Car::new("a", Point2d::new(-2.5, 0.0)).on_road("west"),
            // Past its own footprint boundary but drifted off the road, outside the footprint
            Car::new("b", Point2d::new(4.0, -0.4)).on_road("south"),
        ];
        let result = arbitrate(&network, &cars);

        // Both are at the footprint and b is closer to the road end, but only a is crossing
        assert!(result.decision(0).clear_to_proceed);
        assert!(!result.decision(1).clear_to_proceed);
        assert_eq!(result.decision(1).stop_distance, Some(0.0));
    }

    #[test]
    fn denied_car_stops_short_of_the_footprint() {
        let network = crossroads(None);
        for (y, stop) in [(-12.0, 9.0), (-4.0, 1.0), (-3.0, 0.0), (-2.5, 0.0)] {
            let cars = [
                Car::new("a", Point2d::new(-1.0, 0.0)).on_road("west"),
                Car::new("b", Point2d::new(0.0, y)).on_road("south"),
            ];
            let result = arbitrate(&network, &cars);
            assert!(result.decision(0).clear_to_proceed);
            assert_approx_eq!(result.decision(1).stop_distance.unwrap(), stop);
        }
    }

    #[test]
    fn ties_are_broken_by_car_id() {
        let network = crossroads(None);
        let cars = [
            Car::new("zed", Point2d::new(-7.0, 0.0)).on_road("west"),
            Car::new("amy", Point2d::new(0.0, -7.0)).on_road("south"),
        ];
        let result = arbitrate(&network, &cars);

        assert!(!result.decision(0).clear_to_proceed);
        assert!(result.decision(1).clear_to_proceed);
    }

    #[test]
    fn crossed_and_distant_cars_are_not_queued() {
        let network = crossroads(None);
        let cars = [
            Car::new("crossed", Point2d::new(0.0, 0.0)).on_road("west"),
            Car::new("far", Point2d::new(0.0, -90.0)).on_road("south"),
        ];
        let mut arbiter = JunctionArbiter::new(network.slowdown());
        let centre = network.junction_by_id("centre").unwrap().key();

        for (idx, car) in cars.iter().enumerate() {
            let location = network.locate(car).unwrap();
            assert!(!arbiter.register(idx, &car.id, car.position, &location));
        }
        assert_eq!(arbiter.state(centre), JunctionState::Idle);

        let result = arbiter.arbitrate(cars.len());
        assert_eq!(result.state(centre), JunctionState::Idle);
        assert_eq!(result.decision(0), Decision::CLEAR);
        assert_eq!(result.decision(1), Decision::CLEAR);
    }

    #[test]
    fn registered_junction_is_queued_until_arbitrated() {
        let network = crossroads(None);
        let car = Car::new("a", Point2d::new(-5.0, 0.0)).on_road("west");
        let centre = network.junction_by_id("centre").unwrap().key();

        let mut arbiter = JunctionArbiter::new(network.slowdown());
        let location = network.locate(&car).unwrap();
        assert!(arbiter.register(0, &car.id, car.position, &location));
        assert_eq!(arbiter.state(centre), JunctionState::Queued);
    }
}
