use crate::math::Point2d;
use serde::{Deserialize, Serialize};

/// The kinematic state of a car, as reported for one dispatch cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct Car {
    /// The car's identifier.
    pub id: String,
    /// The world space coordinates of the car.
    pub position: Point2d,
    /// The current speed in m/s.
    pub speed: f64,
    /// The current wheel rotation in radians, positive to the left.
    pub wheel_rotation: f64,
    /// The heading in radians, counter-clockwise from the positive x-axis.
    pub rotation: f64,
    /// The maximum acceleration in m/s^2, or a non-positive value if unknown.
    pub acceleration: f64,
    /// The maximum braking deceleration in m/s^2, or a non-positive value if unknown.
    pub braking: f64,
    /// The road the car is travelling on. Falls back to the setup's target map when absent.
    pub target_road_id: Option<String>,
}

/// The control command for one car for the next interval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarCommand {
    /// The car's identifier.
    pub car_id: String,
    /// The target speed in m/s.
    pub speed: f64,
    /// The target wheel rotation in radians, positive to the left.
    pub wheel_rotation: f64,
}

impl Car {
    /// Creates a stationary car heading along the positive x-axis.
    pub fn new(id: impl Into<String>, position: Point2d) -> Self {
        Self {
            id: id.into(),
            position,
            speed: 0.0,
            wheel_rotation: 0.0,
            rotation: 0.0,
            acceleration: 0.0,
            braking: 0.0,
            target_road_id: None,
        }
    }

    /// Sets the road the car is travelling on.
    pub fn on_road(mut self, road_id: impl Into<String>) -> Self {
        self.target_road_id = Some(road_id.into());
        self
    }

    /// Sets the car's speed and heading.
    pub fn moving(mut self, speed: f64, rotation: f64) -> Self {
        self.speed = speed;
        self.rotation = rotation;
        self
    }

    /// Sets the car's acceleration and braking limits.
    pub fn with_limits(mut self, acceleration: f64, braking: f64) -> Self {
        self.acceleration = acceleration;
        self.braking = braking;
        self
    }
}
