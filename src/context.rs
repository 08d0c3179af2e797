use crate::config::SlowdownConfig;
use crate::error::SetupError;
use crate::junction::JunctionAttributes;
use crate::network::{self, Network};
use crate::road::RoadAttributes;
use log::info;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Everything a setup call carries.
#[derive(Clone, Debug, Default)]
pub struct NetworkSetup {
    /// The junctions of the new network.
    pub junctions: Vec<JunctionAttributes>,
    /// The roads of the new network.
    pub roads: Vec<RoadAttributes>,
    /// Default target road identifiers by car identifier.
    pub car_targets: HashMap<String, String>,
    /// Whether an active network may be replaced.
    pub overwrite: bool,
    /// Overrides the default slowdown zone length, in m.
    pub slowdown_zone: Option<f64>,
    /// Overrides the default slowdown rate.
    pub slowdown_rate: Option<f64>,
}

/// The active network, shared between concurrent setup and dispatch calls.
///
/// Dispatch calls only hold the lock long enough to clone a snapshot, so a
/// setup never changes the network out from under a running dispatch.
#[derive(Debug, Default)]
pub struct SharedNetwork {
    inner: RwLock<Option<Arc<Network>>>,
}

impl SharedNetwork {
    /// Creates an empty context with no active network.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active network, if one has been set up.
    pub fn snapshot(&self) -> Option<Arc<Network>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validates and installs a new network.
    /// On failure the active network is left untouched.
    ///
    /// # Parameters
    /// * `setup` - The setup payload
    /// * `defaults` - The slowdown behaviour used where the payload gives none
    pub fn setup(
        &self,
        setup: NetworkSetup,
        defaults: SlowdownConfig,
    ) -> Result<Arc<Network>, SetupError> {
        let slowdown = SlowdownConfig::resolve(setup.slowdown_zone, setup.slowdown_rate, defaults)?;
        let mut network = Network::build(&setup.junctions, &setup.roads)?;
        network.set_slowdown(slowdown);
        network.assign_targets(
            setup
                .car_targets
                .iter()
                .map(|(car, road)| (car.as_str(), road.as_str())),
        )?;

        let mut active = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let network = network::replace(active.as_ref(), network, setup.overwrite)?;
        *active = Some(network.clone());
        info!(
            "Activated network (zone {} m, rate {})",
            slowdown.zone, slowdown.rate
        );
        Ok(network)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::{ConflictError, ValidationError};
    use crate::math::Point2d;

    fn setup(overwrite: bool, end: &str) -> NetworkSetup {
        let junction = |id: &str, x: f64| JunctionAttributes {
            id: id.to_string(),
            position: Point2d::new(x, 0.0),
            junction_size: 2.0,
            polygon: None,
            connected_roads_count: 1,
            connected_roads_ids: vec!["r".to_string()],
        };
        NetworkSetup {
            junctions: vec![junction("a", 0.0), junction("b", 50.0)],
            roads: vec![RoadAttributes {
                id: "r".to_string(),
                polyline: vec![Point2d::new(0.0, 0.0), Point2d::new(50.0, 0.0)],
                recommended_speed: 10.0,
                junction_start_id: "a".to_string(),
                junction_end_id: end.to_string(),
            }],
            overwrite,
            ..Default::default()
        }
    }

    #[test]
    fn first_setup_activates_network() {
        let shared = SharedNetwork::new();
        assert!(shared.snapshot().is_none());
        shared.setup(setup(false, "b"), SlowdownConfig::default()).unwrap();
        let network = shared.snapshot().unwrap();
        assert!(network.road_by_id("r").is_some());
        assert_eq!(*network.slowdown(), SlowdownConfig::default());
    }

    #[test]
    fn overwrite_guard() {
        let shared = SharedNetwork::new();
        let first = shared.setup(setup(false, "b"), SlowdownConfig::default()).unwrap();
        assert_eq!(
            shared.setup(setup(false, "b"), SlowdownConfig::default()).err(),
            Some(SetupError::Conflict(ConflictError))
        );
        assert!(Arc::ptr_eq(&first, &shared.snapshot().unwrap()));

        let second = shared.setup(setup(true, "b"), SlowdownConfig::default()).unwrap();
        assert!(Arc::ptr_eq(&second, &shared.snapshot().unwrap()));
    }

    #[test]
    fn invalid_setup_keeps_previous_network() {
        let shared = SharedNetwork::new();
        let first = shared.setup(setup(false, "b"), SlowdownConfig::default()).unwrap();
        let result = shared.setup(setup(true, "nowhere"), SlowdownConfig::default());
        assert_eq!(
            result.err(),
            Some(SetupError::Validation(ValidationError::UnknownJunction {
                road: "r".to_string(),
                junction: "nowhere".to_string(),
            }))
        );
        assert!(Arc::ptr_eq(&first, &shared.snapshot().unwrap()));
    }

    #[test]
    fn unknown_car_target_is_rejected() {
        let shared = SharedNetwork::new();
        let mut payload = setup(false, "b");
        payload.car_targets.insert("car".to_string(), "ghost".to_string());
        assert!(matches!(
            shared.setup(payload, SlowdownConfig::default()),
            Err(SetupError::Validation(ValidationError::UnknownTargetRoad { .. }))
        ));
        assert!(shared.snapshot().is_none());
    }
}
