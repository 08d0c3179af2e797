use crate::util::Interval;

/// Allowance added to a braking distance to absorb the error of a discrete update.
const BRAKE_EPSILON: f64 = 0.25;

/// The speed model of a car for one decision interval.
#[derive(Clone, Debug)]
pub struct SpeedModel {
    max_acc: f64,
    max_brake: f64,
    horizon: f64,
}

/// The parameters of the speed model.
pub struct ModelParams {
    /// The car's maximum acceleration in m/s<sup>2</sup>, non-positive if unknown.
    pub acceleration: f64,
    /// The car's maximum braking deceleration in m/s<sup>2</sup>, non-positive if unknown.
    pub braking: f64,
    /// The length of the decision interval in s.
    pub horizon: f64,
}

impl SpeedModel {
    /// Creates a new speed model.
    pub fn new(params: &ModelParams) -> Self {
        Self {
            max_acc: params.acceleration,
            max_brake: params.braking,
            horizon: params.horizon,
        }
    }

    /// The highest speed the car can reach by the end of the interval.
    /// Unbounded when the acceleration is unknown.
    pub fn max_reachable(&self, vel: f64) -> f64 {
        if self.max_acc > 0.0 {
            f64::max(vel, 0.0) + self.max_acc * self.horizon
        } else {
            f64::INFINITY
        }
    }

    /// The target speed for a car not held back by a junction.
    /// Never above the recommended speed, even when the car is already faster.
    ///
    /// # Arguments
    /// * `vel` - The current speed (m/s).
    /// * `recommended` - The road's recommended speed (m/s).
    pub fn free_speed(&self, vel: f64, recommended: f64) -> f64 {
        f64::min(recommended, self.max_reachable(vel))
    }

    /// The target speed for a car inside the slowdown zone of a junction it may not cross.
    /// Decays linearly from `recommended` at the edge of the zone to zero at the junction.
    ///
    /// # Arguments
    /// * `recommended` - The road's recommended speed (m/s).
    /// * `distance` - The remaining distance to the junction (m).
    /// * `zone` - The length of the slowdown zone (m).
    /// * `rate` - The slowdown rate multiplier.
    pub fn approach_speed(&self, recommended: f64, distance: f64, zone: f64, rate: f64) -> f64 {
        if zone <= 0.0 || distance <= 0.0 {
            return 0.0;
        }
        let progress = Interval::new(0.0, zone).inv_lerp(distance);
        let fraction = Interval::new(0.0, 1.0).clamp(rate * progress);
        let profile = recommended * fraction;
        f64::min(profile, self.stopping_speed(distance))
    }

    /// The highest speed from which the car can comfortably stop within `distance`.
    /// Unbounded when the braking force is unknown.
    pub fn stopping_speed(&self, distance: f64) -> f64 {
        if self.max_brake <= 0.0 {
            return f64::INFINITY;
        }
        let distance = f64::max(distance, 0.0);
        (2.0 * self.max_brake * distance / (1.0 + BRAKE_EPSILON)).sqrt()
    }
}
