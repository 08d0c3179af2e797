use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// The default length of the slowdown zone before a junction, in m.
pub const DEFAULT_SLOWDOWN_ZONE: f64 = 30.0;

/// The default slowdown rate, a unitless multiplier.
pub const DEFAULT_SLOWDOWN_RATE: f64 = 1.0;

/// Network-wide slowdown behaviour near junctions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlowdownConfig {
    /// The distance before a junction within which denied cars decelerate, in m.
    pub zone: f64,
    /// A multiplier on the deceleration applied per unit distance inside the zone.
    pub rate: f64,
}

impl Default for SlowdownConfig {
    fn default() -> Self {
        Self {
            zone: DEFAULT_SLOWDOWN_ZONE,
            rate: DEFAULT_SLOWDOWN_RATE,
        }
    }
}

impl SlowdownConfig {
    /// Creates a validated slowdown configuration.
    pub fn new(zone: f64, rate: f64) -> Result<Self, ValidationError> {
        check_non_negative("slowdown_zone", zone)?;
        check_non_negative("slowdown_rate", rate)?;
        Ok(Self { zone, rate })
    }

    /// Resolves optional setup parameters against a set of defaults.
    pub fn resolve(
        zone: Option<f64>,
        rate: Option<f64>,
        defaults: SlowdownConfig,
    ) -> Result<Self, ValidationError> {
        Self::new(zone.unwrap_or(defaults.zone), rate.unwrap_or(defaults.rate))
    }

    /// The slowdown zone length for a road whose stop line lies `approach` metres
    /// from its start. The zone can not begin before the road does.
    pub fn effective_zone(&self, approach: f64) -> f64 {
        f64::min(self.zone, approach)
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidSlowdown { name, value })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn resolve_falls_back_to_defaults() {
        let defaults = SlowdownConfig::new(12.0, 2.0).unwrap();
        let config = SlowdownConfig::resolve(None, Some(0.5), defaults).unwrap();
        assert_eq!(config, SlowdownConfig { zone: 12.0, rate: 0.5 });
    }

    #[test]
    fn rejects_negative_parameters() {
        assert_eq!(
            SlowdownConfig::new(-1.0, 1.0),
            Err(ValidationError::InvalidSlowdown {
                name: "slowdown_zone",
                value: -1.0
            })
        );
        assert!(SlowdownConfig::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn zone_is_clamped_to_road_length() {
        let config = SlowdownConfig::default();
        assert_eq!(config.effective_zone(100.0), DEFAULT_SLOWDOWN_ZONE);
        assert_eq!(config.effective_zone(10.0), 10.0);
    }
}
