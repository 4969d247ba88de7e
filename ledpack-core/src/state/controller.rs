//! Controller state: display power, blink rate and brightness
//!
//! These values compose into the display setup and dimming command bytes.
//! Out-of-range inputs are coerced to the nearest valid value rather than
//! rejected.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Display output on or off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DisplayPower {
    #[default]
    On,
    Off,
}

impl DisplayPower {
    /// Bit 0 of the display setup command
    pub const fn bit(self) -> u8 {
        match self {
            DisplayPower::On => 0x01,
            DisplayPower::Off => 0x00,
        }
    }
}

/// Hardware blink rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum BlinkRate {
    #[default]
    Off = 0,
    /// ~2 Hz
    Double = 1,
    /// ~1 Hz
    Normal = 2,
    /// ~0.5 Hz
    Half = 3,
}

impl BlinkRate {
    /// Interpret a raw rate value; anything outside 0..=3 becomes `Off`
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            1 => BlinkRate::Double,
            2 => BlinkRate::Normal,
            3 => BlinkRate::Half,
            _ => BlinkRate::Off,
        }
    }

    /// Two-bit field value
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Dimming level, always within 0..=15
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "i32", into = "i32"))]
pub struct Brightness(u8);

impl Brightness {
    /// Dimmest level (1/16 duty)
    pub const MIN: Self = Self(0);
    /// Brightest level (16/16 duty)
    pub const MAX: Self = Self(15);

    /// Create a brightness level, clamping into 0..=15
    pub const fn new(level: i32) -> Self {
        if level < 0 {
            Self::MIN
        } else if level > 15 {
            Self::MAX
        } else {
            Self(level as u8)
        }
    }

    /// Level as the 4-bit dimming field
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self(10)
    }
}

impl From<i32> for Brightness {
    fn from(level: i32) -> Self {
        Self::new(level)
    }
}

impl From<Brightness> for i32 {
    fn from(level: Brightness) -> i32 {
        level.0 as i32
    }
}

/// Last state confirmed written to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControllerState {
    pub power: DisplayPower,
    pub blink: BlinkRate,
    /// `None` until a brightness command has been acknowledged
    pub brightness: Option<Brightness>,
}
