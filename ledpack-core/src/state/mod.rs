//! Controller state and driver lifecycle
//!
//! The controller state is what the device was last told; the lifecycle
//! tracks whether the driver may talk to the device at all.

pub mod controller;
pub mod lifecycle;

pub use controller::{BlinkRate, Brightness, ControllerState, DisplayPower};
pub use lifecycle::{InitStep, Lifecycle, LifecycleEvent};
