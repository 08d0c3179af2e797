//! Converts arbitration decisions and road geometry into speed and steering commands.

use self::speed::{ModelParams, SpeedModel};
use crate::arbiter::{Decision, SAFETY_MARGIN};
use crate::car::{Car, CarCommand};
use crate::config::SlowdownConfig;
use crate::network::Location;
use log::trace;

pub mod speed;
pub mod steering;

/// Computes per-car control commands for one decision interval.
#[derive(Clone, Debug)]
pub struct MotionController {
    slowdown: SlowdownConfig,
    /// The length of the decision interval in s.
    horizon: f64,
}

impl MotionController {
    /// Creates a motion controller.
    ///
    /// # Parameters
    /// * `slowdown` - The network-wide slowdown behaviour
    /// * `horizon` - The time until the next decision, in s
    pub fn new(slowdown: &SlowdownConfig, horizon: f64) -> Self {
        Self {
            slowdown: *slowdown,
            horizon,
        }
    }

    /// Computes the target speed and wheel rotation of a car.
    pub fn compute(&self, car: &Car, location: &Location, decision: Decision) -> CarCommand {
        let road = location.road;
        let recommended = road.recommended_speed();
        let distance = location.distance_to_junction();
        // Slowdown ends at the stop line and can not start before the road does
        let stop_line = f64::max(road.entry() - SAFETY_MARGIN, 0.0);
        let zone = self.slowdown.effective_zone(stop_line);

        let model = SpeedModel::new(&ModelParams {
            acceleration: car.acceleration,
            braking: car.braking,
            horizon: self.horizon,
        });

        let speed = match decision.stop_distance {
            None => model.free_speed(car.speed, recommended),
            Some(stop) if stop <= zone || zone <= 0.0 => {
                model.approach_speed(recommended, stop, zone, self.slowdown.rate)
            }
            Some(stop) => f64::min(
                model.free_speed(car.speed, recommended),
                model.stopping_speed(stop),
            ),
        };

        let reference = steering::reference_heading(road.polyline(), &location.projection);
        let wheel_rotation = steering::wheel_rotation(car.rotation, reference);

        trace!(
            "Car `{}` on road `{}`, {:.2} m to junction: speed {:.2}, wheel {:.3}",
            car.id,
            road.id(),
            distance,
            speed,
            wheel_rotation
        );

        CarCommand {
            car_id: car.id.clone(),
            speed,
            wheel_rotation,
        }
    }
}
