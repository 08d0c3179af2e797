//! Error types surfaced by the network model and the dispatch path.

use thiserror::Error;

/// A setup payload that is malformed or refers to entities that do not exist.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("duplicate junction id `{0}`")]
    DuplicateJunction(String),

    #[error("duplicate road id `{0}`")]
    DuplicateRoad(String),

    #[error("road `{road}` references unknown junction `{junction}`")]
    UnknownJunction { road: String, junction: String },

    #[error("junction `{junction}` lists unknown road `{road}`")]
    UnknownConnectedRoad { junction: String, road: String },

    #[error("junction `{junction}` lists road `{road}`, which neither starts nor ends there")]
    RoadNotIncident { junction: String, road: String },

    #[error("junction `{junction}` declares {declared} connected roads but lists {listed}")]
    ConnectedRoadsCount {
        junction: String,
        declared: usize,
        listed: usize,
    },

    #[error("road `{0}` needs at least two distinct points and a non-zero length")]
    DegeneratePolyline(String),

    #[error("junction `{0}` has a polygon that is not a simple closed polygon")]
    InvalidPolygon(String),

    #[error("junction `{0}` must have a positive, finite junction_size")]
    InvalidJunctionSize(String),

    #[error("junction `{0}` has a non-finite position")]
    InvalidPosition(String),

    #[error("road `{0}` must have a non-negative, finite recommended_speed")]
    InvalidRecommendedSpeed(String),

    #[error("{name} must be a non-negative, finite number, got {value}")]
    InvalidSlowdown { name: &'static str, value: f64 },

    #[error("car `{car}` is assigned unknown target road `{road}`")]
    UnknownTargetRoad { car: String, road: String },
}

/// A setup was attempted without `overwrite` while a network is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a network is already active and overwrite was not requested")]
pub struct ConflictError;

/// The reasons a setup call can fail. The active network is unchanged in both cases.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),
}

/// A single car could not be resolved against the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    #[error("car `{car}` has no target road")]
    NoTargetRoad { car: String },

    #[error("car `{car}` targets unknown road `{road}`")]
    UnknownRoad { car: String, road: String },

    #[error("car `{car}` approaches unknown junction on road `{road}`")]
    UnknownJunction { car: String, road: String },
}

impl NotFoundError {
    /// The identifier of the car the error is about.
    pub fn car_id(&self) -> &str {
        match self {
            Self::NoTargetRoad { car }
            | Self::UnknownRoad { car, .. }
            | Self::UnknownJunction { car, .. } => car,
        }
    }
}

/// The reasons a whole dispatch call can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),

    #[error("no network has been set up")]
    NoNetwork,
}
