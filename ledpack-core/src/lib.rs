//! Board-agnostic core of the HT16K33 LED backpack driver
//!
//! This crate contains everything that does not touch the bus:
//!
//! - Command encoding (oscillator, display setup, dimming)
//! - The 8 x 16-bit display buffer and its wire serialization
//! - Controller state (power, blink rate, brightness)
//! - The driver lifecycle state machine
//! - Error and configuration types

#![no_std]
#![deny(unsafe_code)]

pub mod buffer;
pub mod command;
pub mod config;
pub mod error;
pub mod state;

pub use buffer::{BufferError, DisplayBuffer, BUFFER_ROWS, DECIMAL_POINT, FRAME_BYTES};
pub use command::Command;
pub use config::DriverConfig;
pub use error::{Error, Operation};
pub use state::{
    BlinkRate, Brightness, ControllerState, DisplayPower, InitStep, Lifecycle, LifecycleEvent,
};
