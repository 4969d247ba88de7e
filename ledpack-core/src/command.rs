//! HT16K33 command encoding
//!
//! Every setup command is a single byte: a register tag in the high
//! nibble OR'd with the setting bits. On the wire each command is sent as
//! `write_byte(address, command, 0x00)`.

use crate::state::{BlinkRate, Brightness, DisplayPower};

/// HT16K33 register tags
pub mod reg {
    /// Display RAM, 16 bytes starting here
    pub const DISPLAY_RAM: u8 = 0x00;
    /// System setup (oscillator)
    pub const SYSTEM_SETUP: u8 = 0x20;
    /// Key scan data (not used by the driver)
    pub const KEY_DATA: u8 = 0x40;
    /// Display setup (power + blink)
    pub const DISPLAY_SETUP: u8 = 0x80;
    /// Dimming set
    pub const DIMMING: u8 = 0xE0;
}

/// Payload byte sent with every command
pub const COMMAND_ARG: u8 = 0x00;

const OSCILLATOR_ON: u8 = 0x01;
const OSCILLATOR_OFF: u8 = 0x00;

/// System setup: start or stop the internal oscillator
pub const fn oscillator_command(on: bool) -> u8 {
    reg::SYSTEM_SETUP | if on { OSCILLATOR_ON } else { OSCILLATOR_OFF }
}

/// Display setup: power bit in bit 0, blink rate in bits 1..=2
pub const fn display_command(power: DisplayPower, blink: BlinkRate) -> u8 {
    reg::DISPLAY_SETUP | power.bit() | (blink.bits() << 1)
}

/// Dimming set: level in the low nibble
pub const fn brightness_command(level: Brightness) -> u8 {
    reg::DIMMING | level.get()
}

/// A logical controller command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Oscillator(bool),
    Display(DisplayPower, BlinkRate),
    Brightness(Brightness),
}

impl Command {
    /// Wire byte for this command
    pub const fn encode(self) -> u8 {
        match self {
            Command::Oscillator(on) => oscillator_command(on),
            Command::Display(power, blink) => display_command(power, blink),
            Command::Brightness(level) => brightness_command(level),
        }
    }

    /// Short label for logs
    pub const fn name(self) -> &'static str {
        match self {
            Command::Oscillator(true) => "oscillator-on",
            Command::Oscillator(false) => "oscillator-off",
            Command::Display(..) => "display-setup",
            Command::Brightness(_) => "brightness",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_oscillator_command() {
        assert_eq!(oscillator_command(true), 0x21);
        assert_eq!(oscillator_command(false), 0x20);
    }

    #[test]
    fn test_display_command() {
        assert_eq!(display_command(DisplayPower::On, BlinkRate::Off), 0x81);
        assert_eq!(display_command(DisplayPower::Off, BlinkRate::Off), 0x80);
        assert_eq!(display_command(DisplayPower::On, BlinkRate::Double), 0x83);
        assert_eq!(display_command(DisplayPower::On, BlinkRate::Normal), 0x85);
        assert_eq!(display_command(DisplayPower::On, BlinkRate::Half), 0x87);
    }

    #[test]
    fn test_invalid_blink_rate_encodes_as_off() {
        assert_eq!(
            display_command(DisplayPower::On, BlinkRate::from_raw(99)),
            display_command(DisplayPower::On, BlinkRate::Off)
        );
    }

    #[test]
    fn test_brightness_command_clamps() {
        assert_eq!(
            brightness_command(Brightness::new(20)),
            brightness_command(Brightness::new(15))
        );
        assert_eq!(
            brightness_command(Brightness::new(-5)),
            brightness_command(Brightness::new(0))
        );
        assert_eq!(brightness_command(Brightness::new(15)), 0xEF);
        assert_eq!(brightness_command(Brightness::new(0)), 0xE0);
    }

    #[test]
    fn test_command_encode_matches_free_functions() {
        assert_eq!(Command::Oscillator(true).encode(), 0x21);
        assert_eq!(
            Command::Display(DisplayPower::On, BlinkRate::Half).encode(),
            0x87
        );
        assert_eq!(Command::Brightness(Brightness::new(10)).encode(), 0xEA);
        assert_eq!(Command::Oscillator(true).name(), "oscillator-on");
    }

    proptest! {
        /// Brightness never leaks outside the dimming nibble.
        #[test]
        fn brightness_stays_in_dimming_register(level in any::<i32>()) {
            let cmd = brightness_command(Brightness::new(level));
            prop_assert_eq!(cmd & 0xF0, reg::DIMMING);
            prop_assert_eq!(cmd & 0x0F, level.clamp(0, 15) as u8);
        }

        /// Any raw blink rate yields a display setup byte; unknown rates equal Off.
        #[test]
        fn display_command_coerces_unknown_rates(raw in any::<i32>()) {
            let cmd = display_command(DisplayPower::On, BlinkRate::from_raw(raw));
            prop_assert_eq!(cmd & 0xF8, reg::DISPLAY_SETUP);
            if !(0..=3).contains(&raw) {
                prop_assert_eq!(cmd, display_command(DisplayPower::On, BlinkRate::Off));
            }
        }
    }
}
