//! LED display controller drivers

pub mod ht16k33;
pub mod observer;

pub use ht16k33::Ht16k33;
pub use observer::{EventLog, LifecycleObserver};
