pub use car::{Car, CarCommand};
pub use cgmath;
pub use config::SlowdownConfig;
pub use context::{NetworkSetup, SharedNetwork};
pub use error::{ConflictError, DispatchError, NotFoundError, SetupError, ValidationError};
pub use junction::{Junction, JunctionAttributes};
pub use network::{Location, Network};
pub use road::{Road, RoadAttributes};
pub use session::{dispatch, DispatchSession};
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use strategy::{register, DispatchStrategy, Dispatched, Fifo};
pub use util::Interval;

pub mod api;
pub mod arbiter;
mod car;
pub mod config;
mod context;
mod error;
mod junction;
pub mod math;
pub mod motion;
pub mod network;
mod road;
mod session;
pub mod strategy;
mod util;

new_key_type! {
    /// Unique ID of a [Junction].
    pub struct JunctionId;
    /// Unique ID of a [Road].
    pub struct RoadId;
}

type JunctionSet = SlotMap<JunctionId, Junction>;
type RoadSet = SlotMap<RoadId, Road>;
