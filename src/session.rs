use crate::car::Car;
use crate::error::DispatchError;
use crate::network::Network;
use crate::strategy::{self, DispatchStrategy, Dispatched};
use log::{debug, warn};
use std::sync::Arc;

/// The horizon used when a request does not say when the next one will arrive, in s.
pub const DEFAULT_HORIZON: f64 = 1.0;

/// One dispatch call: a strategy bound to a network snapshot.
pub struct DispatchSession<'a> {
    network: &'a Network,
    strategy: Arc<dyn DispatchStrategy>,
}

impl<'a> DispatchSession<'a> {
    /// Opens a session with the named strategy.
    ///
    /// # Parameters
    /// * `algorithm_name` - The registered strategy name, case-insensitive
    /// * `network` - The network snapshot to dispatch against
    pub fn open(algorithm_name: &str, network: &'a Network) -> Result<Self, DispatchError> {
        let strategy = strategy::lookup(algorithm_name)?;
        Ok(Self { network, strategy })
    }

    /// Runs the strategy over a batch of cars.
    /// Cars that can not be resolved are reported in the failures and get no command.
    pub fn run(&self, cars: &[Car], next_request_in_seconds: Option<f64>) -> Dispatched {
        let horizon = next_request_in_seconds
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .unwrap_or(DEFAULT_HORIZON);

        let dispatched =
            self.strategy
                .dispatch(self.network, self.network.slowdown(), cars, horizon);
        for failure in &dispatched.failures {
            warn!("No command for car `{}`: {}", failure.car_id(), failure);
        }
        debug!(
            "Dispatched {} cars with a {:.2} s horizon, {} unresolved",
            dispatched.commands.len(),
            horizon,
            dispatched.failures.len()
        );
        dispatched
    }
}

/// Computes commands for a batch of cars with the named strategy.
pub fn dispatch(
    algorithm_name: &str,
    network: &Network,
    cars: &[Car],
    next_request_in_seconds: Option<f64>,
) -> Result<Dispatched, DispatchError> {
    let session = DispatchSession::open(algorithm_name, network)?;
    Ok(session.run(cars, next_request_in_seconds))
}
