//! Hardware driver implementations
//!
//! This crate provides the driver core for HT16K33-based LED backpacks:
//!
//! - Bring-up sequencing (oscillator, blink, brightness, clear)
//! - Buffer mutation and single-transaction flushes
//! - Ready/error notification for the host layer
//!
//! The bus itself is supplied through the `ledpack-hal` transport traits.

#![no_std]
#![deny(unsafe_code)]

pub mod display;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use display::{EventLog, Ht16k33, LifecycleObserver};
