//! ledpack Hardware Abstraction Layer
//!
//! This crate defines the bus transport contract the LED backpack driver
//! talks through. The driver never opens a bus or moves bytes itself; it
//! only needs something that can write a command byte and a block of
//! display RAM to a 7-bit device address.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  ledpack-drivers (HT16K33 driver core)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ledpack-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │    HalBus     │       │ host-specific │
//! │ (embedded-hal)│       │   transport   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cTransport`] - Command byte and block writes
//! - [`i2c::BusOpener`] - Turning a bus identifier into a transport

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;

// Re-export key items at crate root for convenience
pub use i2c::{
    AddressError, BusId, BusOpener, DeviceAddress, HalBus, HalBusError, I2cTransport,
    SingleBusOpener,
};
