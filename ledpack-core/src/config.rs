//! Driver configuration
//!
//! Identifies the controller and the brightness applied during bring-up.

use ledpack_hal::{BusId, DeviceAddress};

use crate::state::Brightness;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriverConfig {
    /// Bus to open
    pub bus: BusId,
    /// Controller address on that bus
    pub address: DeviceAddress,
    /// Brightness set during bring-up
    pub initial_brightness: Brightness,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            bus: BusId(1),
            address: DeviceAddress::HT16K33_DEFAULT,
            initial_brightness: Brightness::default(),
        }
    }
}

impl DriverConfig {
    /// Configuration for `address` on `bus` with the default brightness
    pub fn new(bus: BusId, address: DeviceAddress) -> Self {
        Self {
            bus,
            address,
            ..Self::default()
        }
    }

    pub fn with_brightness(mut self, level: impl Into<Brightness>) -> Self {
        self.initial_brightness = level.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DriverConfig::default();
        assert_eq!(config.bus, BusId(1));
        assert_eq!(config.address.get(), 0x70);
        assert_eq!(config.initial_brightness.get(), 10);
    }

    #[test]
    fn test_with_brightness_clamps() {
        let address = DeviceAddress::new(0x72).unwrap();
        let config = DriverConfig::new(BusId(0), address).with_brightness(42);
        assert_eq!(config.address, address);
        assert_eq!(config.initial_brightness, Brightness::MAX);
    }
}
