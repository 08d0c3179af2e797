//! Named dispatch strategies and the process-wide registry that selects them.

use crate::arbiter::JunctionArbiter;
use crate::car::{Car, CarCommand};
use crate::config::SlowdownConfig;
use crate::error::{DispatchError, NotFoundError};
use crate::motion::MotionController;
use crate::network::Network;
use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// The name the FIFO strategy is registered under.
pub const FIFO: &str = "fifo";

/// The outcome of running a strategy over one batch of cars.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dispatched {
    /// One command per car that resolved, in batch order.
    pub commands: Vec<CarCommand>,
    /// The cars that could not be resolved against the network.
    pub failures: Vec<NotFoundError>,
}

/// A swappable policy turning a batch of car states into control commands.
///
/// Implementations must be a pure function of their inputs: no state may carry
/// over from one call to the next.
pub trait DispatchStrategy: Send + Sync {
    /// Computes commands for every car in the batch that can be resolved.
    ///
    /// # Parameters
    /// * `network` - The active road network
    /// * `slowdown` - The slowdown behaviour near junctions
    /// * `cars` - The car states of this cycle
    /// * `horizon` - The time until the next dispatch, in s
    fn dispatch(
        &self,
        network: &Network,
        slowdown: &SlowdownConfig,
        cars: &[Car],
        horizon: f64,
    ) -> Dispatched;
}

/// First-come-first-served junction arbitration.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fifo;

impl DispatchStrategy for Fifo {
    fn dispatch(
        &self,
        network: &Network,
        slowdown: &SlowdownConfig,
        cars: &[Car],
        horizon: f64,
    ) -> Dispatched {
        let mut failures = vec![];
        let mut arbiter = JunctionArbiter::new(slowdown);

        let locations = cars
            .iter()
            .enumerate()
            .map(|(idx, car)| match network.locate(car) {
                Ok(location) => {
                    arbiter.register(idx, &car.id, car.position, &location);
                    Some(location)
                }
                Err(err) => {
                    debug!("Skipping car: {}", err);
                    failures.push(err);
                    None
                }
            })
            .collect::<Vec<_>>();

        let arbitration = arbiter.arbitrate(cars.len());
        let controller = MotionController::new(slowdown, horizon);

        let commands = cars
            .iter()
            .zip(&locations)
            .enumerate()
            .filter_map(|(idx, (car, location))| {
                let location = location.as_ref()?;
                Some(controller.compute(car, location, arbitration.decision(idx)))
            })
            .collect::<Vec<_>>();

        debug!(
            "FIFO dispatched {} of {} cars",
            commands.len(),
            cars.len()
        );
        Dispatched { commands, failures }
    }
}

/// Maps algorithm names to strategies.
#[derive(Clone, Default)]
pub struct Registry {
    strategies: HashMap<String, Arc<dyn DispatchStrategy>>,
}

impl Registry {
    /// Creates a registry holding the built-in strategies.
    pub fn with_builtins() -> Self {
        let mut registry = Self::default();
        registry.insert(FIFO, Arc::new(Fifo));
        registry
    }

    /// Adds a strategy, replacing any strategy registered under the same name.
    /// Names are case-insensitive.
    pub fn insert(&mut self, name: &str, strategy: Arc<dyn DispatchStrategy>) {
        self.strategies.insert(name.to_lowercase(), strategy);
    }

    /// Looks up a strategy by name, ignoring case.
    pub fn get(&self, name: &str) -> Result<Arc<dyn DispatchStrategy>, DispatchError> {
        self.strategies
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| DispatchError::UnknownAlgorithm(name.to_string()))
    }

    /// The registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.strategies.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}

static REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::with_builtins()));

/// Registers a strategy in the process-wide registry.
pub fn register(name: &str, strategy: Arc<dyn DispatchStrategy>) {
    debug!("Registering dispatch strategy `{}`", name);
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name, strategy);
}

/// Looks up a strategy in the process-wide registry.
pub fn lookup(name: &str) -> Result<Arc<dyn DispatchStrategy>, DispatchError> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
}

/// The names in the process-wide registry, sorted.
pub fn registered_names() -> Vec<String> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .names()
        .into_iter()
        .map(str::to_string)
        .collect()
}
